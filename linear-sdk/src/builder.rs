// ABOUTME: Builder pattern implementation for LinearClient configuration
// ABOUTME: Provides type-safe configuration with compile-time validation

use crate::LinearClient;
use crate::constants::timeouts::HTTP_REQUEST_TIMEOUT;
use crate::error::LinearError;
use crate::schema::{Clock, SystemClock};
use secrecy::SecretString;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use typed_builder::TypedBuilder;
use url::Url;

#[derive(Debug, TypedBuilder)]
#[builder(build_method(into = Result<LinearClient, LinearError>))]
pub struct LinearClientConfig {
    pub auth_token: SecretString,

    #[builder(default = HTTP_REQUEST_TIMEOUT)]
    pub timeout: Duration,

    #[builder(default = None)]
    pub base_url: Option<String>,

    /// Where the introspected schema is cached; `None` always introspects live
    #[builder(default = None)]
    pub schema_path: Option<PathBuf>,

    #[builder(default = Arc::new(SystemClock) as Arc<dyn Clock>)]
    pub clock: Arc<dyn Clock>,
}

impl From<LinearClientConfig> for Result<LinearClient, LinearError> {
    fn from(config: LinearClientConfig) -> Self {
        LinearClient::from_config(config)
    }
}

impl LinearClient {
    pub fn builder() -> LinearClientConfigBuilder<((), (), (), (), ())> {
        LinearClientConfig::builder()
    }

    pub(crate) fn parse_base_url(url: &str) -> Result<Url, LinearError> {
        let parsed = Url::parse(url)
            .map_err(|e| LinearError::Configuration(format!("Invalid API URL: {}", e)))?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            scheme => Err(LinearError::Configuration(format!(
                "Invalid API URL: unsupported scheme '{}'",
                scheme
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LinearClient;
    use crate::error::LinearError;
    use crate::schema::FixedClock;
    use chrono::Utc;
    use secrecy::SecretString;
    use std::time::Duration;

    #[test]
    fn test_builder_with_minimal_config() {
        let api_key = SecretString::new("test-api-key".to_string().into_boxed_str());
        let client_result = LinearClient::builder().auth_token(api_key).build();

        assert!(client_result.is_ok());
    }

    #[test]
    fn test_builder_with_all_options() {
        let api_key = SecretString::new("test-api-key".to_string().into_boxed_str());

        let client_result = LinearClient::builder()
            .auth_token(api_key)
            .timeout(Duration::from_secs(60))
            .base_url(Some("http://localhost:8080/graphql".to_string()))
            .schema_path(Some(PathBuf::from("/tmp/linear-schema.json")))
            .clock(Arc::new(FixedClock(Utc::now())))
            .build();

        assert!(client_result.is_ok());
    }

    #[test]
    fn test_builder_accepts_empty_token() {
        let api_key = SecretString::new(String::new().into_boxed_str());
        assert!(LinearClient::builder().auth_token(api_key).build().is_ok());
    }

    #[test]
    fn test_config_uses_secrecy_for_sensitive_data() {
        let api_key = SecretString::new("test-api-key".to_string().into_boxed_str());
        let config = LinearClientConfig {
            auth_token: api_key,
            timeout: Duration::from_secs(1),
            base_url: None,
            schema_path: None,
            clock: Arc::new(SystemClock),
        };

        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("test-api-key"));
    }

    #[test]
    fn test_builder_validates_base_url() {
        let api_key = SecretString::new("test-api-key".to_string().into_boxed_str());
        let result = LinearClient::builder()
            .auth_token(api_key)
            .base_url(Some("not-a-url".to_string()))
            .build();

        match result {
            Err(LinearError::Configuration(msg)) => {
                assert!(msg.contains("Invalid API URL"));
            }
            _ => panic!("Expected configuration error"),
        }
    }

    #[test]
    fn test_builder_rejects_non_http_scheme() {
        let result = LinearClient::parse_base_url("ftp://api.linear.app/graphql");
        assert!(matches!(result, Err(LinearError::Configuration(_))));
    }
}
