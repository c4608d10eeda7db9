// ABOUTME: GraphQL request construction and wire-level helpers
// ABOUTME: Builds {query, variables} payloads, normalizes tokens and classifies HTTP status

use http::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::LinearError;

/// Builder for a single GraphQL document plus its variables
#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest {
    query: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    variables: Map<String, Value>,
}

impl GraphQLRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: Map::new(),
        }
    }

    /// Add a variable to the request
    pub fn variable<T: Serialize>(mut self, name: impl Into<String>, value: T) -> Self {
        self.variables.insert(
            name.into(),
            serde_json::to_value(value).unwrap_or(Value::Null),
        );
        self
    }

    /// Add a variable only when `value` is present
    pub fn optional_variable<T: Serialize>(self, name: impl Into<String>, value: Option<T>) -> Self {
        match value {
            Some(value) => self.variable(name, value),
            None => self,
        }
    }

    /// `first` is only sent for positive limits
    pub fn first(self, limit: i64) -> Self {
        self.optional_variable("first", (limit > 0).then_some(limit))
    }

    /// `after` is only sent for non-empty cursors
    pub fn after(self, cursor: Option<&str>) -> Self {
        let cursor = cursor.filter(|cursor| !cursor.is_empty());
        self.optional_variable("after", cursor)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn variables(&self) -> &Map<String, Value> {
        &self.variables
    }
}

/// Trim the token and strip a leading case-insensitive `Bearer ` prefix.
pub fn normalize_token(token: &str) -> Option<String> {
    let trimmed = token.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let normalized = match trimmed.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => trimmed[7..].trim(),
        _ => trimmed,
    };
    (!normalized.is_empty()).then(|| normalized.to_string())
}

/// Map HTTP status codes that short-circuit envelope decoding.
pub fn classify_status(status: StatusCode) -> Option<LinearError> {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Some(LinearError::Unauthorized),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => Some(LinearError::RateLimited),
        _ => None,
    }
}
