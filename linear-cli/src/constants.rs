// ABOUTME: Centralized constants for the Linear CLI application
// ABOUTME: Contains command defaults, timeouts, file locations and environment variable names

/// Default limits for list and scan commands
pub mod limits {
    pub const DEFAULT_ISSUE_LIMIT: i64 = 50;
    pub const DEFAULT_CYCLE_LIMIT: i64 = 20;
    pub const DEFAULT_COMMENTS_LIMIT: i64 = 20;
    pub const DEFAULT_UPLOADS_LIMIT: i64 = 50;

    /// Comments scanned when looking for attachments
    pub const DEFAULT_ATTACHMENT_SCAN_LIMIT: i64 = 50;
}

/// Timeout configurations for various operations
pub mod timeouts {
    use std::time::Duration;

    /// Default timeout for API requests and downloads
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Progress spinner tick interval
    pub const PROGRESS_BAR_TICK_MS: u64 = 80;
}

/// Environment variables read by the CLI
pub mod env {
    pub const API_KEY: &str = "LINEAR_API_KEY";
    pub const XDG_DATA_HOME: &str = "XDG_DATA_HOME";
    pub const XDG_CONFIG_HOME: &str = "XDG_CONFIG_HOME";
    pub const NO_COLOR: &str = "NO_COLOR";
}

/// Config file names
pub mod files {
    pub const PROJECT_CONFIG: &str = "linear-cli.toml";
    pub const CONFIG_DIR: &str = "linear-cli";
    pub const USER_CONFIG: &str = "config.toml";

    /// Download directory used when `--dir` is not given
    pub const DEFAULT_DOWNLOAD_DIR: &str = "attachments";

    /// Prefix of in-flight download files
    pub const DOWNLOAD_TEMP_PREFIX: &str = ".linear-download-";
}

/// UI strings
pub mod ui {
    pub const UNASSIGNED: &str = "Unassigned";

    /// Longest title shown in list tables before truncation
    pub const TITLE_MAX_CHARS: usize = 60;
}
