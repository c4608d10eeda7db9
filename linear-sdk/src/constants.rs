// ABOUTME: Centralized constants for the Linear SDK
// ABOUTME: Contains endpoint URLs, timeouts, schema cache policy and reference heuristics

/// HTTP and request timeouts
pub mod timeouts {
    use std::time::Duration;

    /// Default timeout for HTTP requests
    pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Linear API URLs
pub mod urls {
    /// GraphQL endpoint of the Linear API
    pub const LINEAR_API_GRAPHQL: &str = "https://api.linear.app/graphql";

    /// Host serving uploaded files
    pub const UPLOADS_HOST: &str = "uploads.linear.app";

    /// Where API keys are created
    pub const API_KEY_SETTINGS: &str = "https://linear.app/settings/api";
}

/// Schema cache policy
pub mod schema {
    use std::time::Duration;

    /// Age after which a persisted snapshot is refreshed
    pub const SCHEMA_TTL: Duration = Duration::from_secs(24 * 60 * 60);

    pub const SCHEMA_FILE_NAME: &str = "schema.json";

    /// GraphQL type used for `$id` when the schema is unavailable
    pub const DEFAULT_ID_TYPE: &str = "ID";
}

/// Heuristics for telling opaque IDs from human aliases
pub mod references {
    pub const ID_MIN_LENGTH: usize = 30;
    pub const ID_MIN_HYPHENS: usize = 4;

    pub const ME: &str = "me";
    pub const CURRENT: &str = "current";
}

/// Storage locations under the data directory
pub mod storage {
    pub const APP_DIR: &str = "linear";
    pub const AUTH_FILE_NAME: &str = "auth.json";
}

/// Relation bookkeeping
pub mod relations {
    /// Relation type managed by the synchronizer
    pub const BLOCKS: &str = "blocks";

    /// Page size used when reading existing relations before editing
    pub const EXISTING_RELATIONS_LIMIT: i64 = 200;
}
