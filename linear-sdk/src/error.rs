// ABOUTME: Error taxonomy for the Linear SDK with user-friendly messages
// ABOUTME: Classifies auth, lookup, throttling, validation, transport and GraphQL failures

use std::fmt;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum LinearError {
    #[error("Authentication failed. Check your Linear API key")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Rate limit exceeded. Please wait before making more requests")]
    RateLimited,

    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error(transparent)]
    GraphQL(#[from] GraphQLErrors),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl LinearError {
    pub fn not_found(what: impl Into<String>) -> Self {
        LinearError::NotFound(what.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        LinearError::Validation(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        LinearError::Transport {
            message: message.into(),
            source: None,
        }
    }

    pub fn transport_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        LinearError::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// True when the server rejected the document because `field` is not part of its schema.
    pub fn is_unknown_field(&self, field: &str) -> bool {
        match self {
            LinearError::GraphQL(errors) => errors.has_unknown_field(field),
            _ => false,
        }
    }

    pub fn help_text(&self) -> Option<&'static str> {
        match self {
            LinearError::Unauthorized => Some(
                "Run 'linear auth login' or set LINEAR_API_KEY. Keys are created at https://linear.app/settings/api",
            ),
            LinearError::NotFound(_) => {
                Some("Check the identifier, key or name (e.g., ENG-123, ENG, user@example.com)")
            }
            LinearError::RateLimited => Some("Wait a moment before making another request"),
            LinearError::Transport { .. } => {
                Some("Check your internet connection and try again")
            }
            _ => None,
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            LinearError::Validation(_) => 2,
            LinearError::Unauthorized => 3,
            LinearError::NotFound(_) => 4,
            LinearError::RateLimited => 5,
            _ => 1,
        }
    }
}

/// One or more errors reported in a GraphQL response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQLErrors {
    errors: Vec<graphql_client::Error>,
}

impl GraphQLErrors {
    pub fn new(errors: Vec<graphql_client::Error>) -> Self {
        Self { errors }
    }

    pub fn from_messages<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let errors = messages
            .into_iter()
            .map(|message| graphql_client::Error {
                message: message.into(),
                locations: None,
                path: None,
                extensions: None,
            })
            .collect();
        Self { errors }
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|err| err.message.as_str())
    }

    pub fn errors(&self) -> &[graphql_client::Error] {
        &self.errors
    }

    pub fn has_unknown_field(&self, field: &str) -> bool {
        let needle = format!("Cannot query field \"{field}\"");
        self.messages().any(|message| message.contains(&needle))
    }
}

impl fmt::Display for GraphQLErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self.messages().collect::<Vec<_>>().join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for GraphQLErrors {}

impl From<reqwest::Error> for LinearError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_decode() {
            format!("decode response: {err}")
        } else {
            format!("request failed: {err}")
        };
        LinearError::transport_with(message, err)
    }
}

impl From<serde_json::Error> for LinearError {
    fn from(err: serde_json::Error) -> Self {
        LinearError::transport_with(format!("decode data: {err}"), err)
    }
}
