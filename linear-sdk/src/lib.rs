// ABOUTME: Linear SDK library providing a schema-aware GraphQL client for the Linear API
// ABOUTME: Includes transport, reference resolution, entity operations and attachment parsing

use graphql_client::Response;
use log::{debug, warn};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::Url;

pub mod api;
pub mod attachments;
pub mod builder;
pub mod constants;
pub mod cycles;
pub mod error;
pub mod fake;
pub mod filter;
pub mod graphql;
pub mod issues;
pub mod queries;
pub mod relations;
pub mod resolve;
pub mod responses;
pub mod schema;
pub mod storage;
pub mod types;
pub mod workflow;
pub mod workspace;

#[cfg(test)]
mod test_helpers;

pub use api::LinearApi;
pub use builder::LinearClientConfig;
pub use error::{GraphQLErrors, LinearError};
pub use fake::FakeLinearApi;
pub use graphql::GraphQLRequest;
pub use relations::{RelationEdits, RelationReport};
pub use schema::{Clock, FixedClock, SchemaCache, SchemaField, SchemaSnapshot, SystemClock, TypeInfo};
pub use storage::{CredentialStore, StoredCredential};
pub use types::*;

use constants::schema::DEFAULT_ID_TYPE;
use constants::urls::LINEAR_API_GRAPHQL;
use graphql::classify_status;
use queries::introspection;
use responses::{SchemaData, TypeData};
use schema::SchemaGuard;

pub type Result<T> = std::result::Result<T, LinearError>;

const CLIENT_USER_AGENT: &str = concat!("linear-cli/", env!("CARGO_PKG_VERSION"));

#[derive(Debug)]
pub struct LinearClient {
    http: reqwest::Client,
    api_url: Url,
    schema_cache: SchemaCache,
    schema: SchemaGuard,
}

impl LinearClient {
    pub(crate) fn from_config(config: LinearClientConfig) -> Result<Self> {
        let api_url = Self::parse_base_url(config.base_url.as_deref().unwrap_or(LINEAR_API_GRAPHQL))?;

        let mut headers = HeaderMap::new();
        if let Some(token) = graphql::normalize_token(config.auth_token.expose_secret()) {
            let mut value = HeaderValue::from_str(&token).map_err(|_| {
                LinearError::Configuration("API key contains invalid characters".to_string())
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| LinearError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_url,
            schema_cache: SchemaCache::new(config.schema_path, config.clock),
            schema: SchemaGuard::default(),
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// POST one document and decode the `data` envelope into `T`.
    pub async fn execute<T: DeserializeOwned>(&self, request: &GraphQLRequest) -> Result<T> {
        debug!(
            "POST {} with {} variable(s)",
            self.api_url,
            request.variables().len()
        );

        let response = self
            .http
            .post(self.api_url.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if let Some(err) = classify_status(status) {
            debug!("HTTP {} classified as {:?}", status, err);
            return Err(err);
        }

        let body = response.bytes().await?;
        let envelope: Response<Value> = serde_json::from_slice(&body).map_err(|err| {
            LinearError::transport_with(format!("decode response (HTTP {}): {}", status, err), err)
        })?;

        if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
            debug!("GraphQL response carried {} error(s)", errors.len());
            return Err(GraphQLErrors::new(errors).into());
        }

        let data = match envelope.data {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(data) => data,
        };
        Ok(serde_json::from_value(data)?)
    }

    async fn fetch_schema(&self) -> Result<SchemaSnapshot> {
        let data: SchemaData = self
            .execute(&GraphQLRequest::new(introspection::SCHEMA))
            .await?;
        let query = data
            .query
            .ok_or_else(|| LinearError::not_found("schema query type"))?;

        let mut snapshot = SchemaSnapshot::new(self.schema_cache.now());
        snapshot.query = TypeInfo::new(query.fields);
        if let Some(issue) = data.issue {
            snapshot.issue = TypeInfo::new(issue.fields);
        }
        if let Some(comment) = data.comment {
            snapshot.comment = TypeInfo::new(comment.fields);
        }
        if let Some(user) = data.user {
            snapshot.user = TypeInfo::new(user.fields);
        }
        Ok(snapshot)
    }

    async fn schema_ready(&self) -> bool {
        self.schema
            .ensure(|| async {
                match self.schema_cache.load(|| self.fetch_schema()).await {
                    Ok(snapshot) => Some(snapshot),
                    Err(err) => {
                        warn!("schema introspection unavailable: {}", err);
                        None
                    }
                }
            })
            .await
    }

    /// Drop the loaded schema; the next schema lookup loads it again.
    pub fn invalidate_schema(&self) {
        self.schema.invalidate();
    }

    pub async fn schema_arg_base_type(&self, field: &str, arg: &str) -> Option<String> {
        if !self.schema_ready().await {
            return None;
        }
        self.schema
            .with_snapshot(|snapshot| snapshot.arg_base_type(field, arg))
            .flatten()
    }

    /// GraphQL type for the `$id` variable of root field `field`.
    pub(crate) async fn id_type(&self, field: &str) -> String {
        self.schema_arg_base_type(field, "id")
            .await
            .unwrap_or_else(|| DEFAULT_ID_TYPE.to_string())
    }

    /// Introspect one type and record it in the snapshot's per-type map.
    /// A type the server does not know is recorded with no fields.
    async fn introspect_type(&self, type_name: &str) -> Option<TypeInfo> {
        let request = GraphQLRequest::new(introspection::TYPE_FIELDS).variable("name", type_name);
        let info = match self.execute::<TypeData>(&request).await {
            Ok(TypeData {
                type_info: Some(type_info),
            }) => TypeInfo::new(type_info.fields),
            Ok(TypeData { type_info: None }) => {
                debug!("schema has no type named {}", type_name);
                TypeInfo::default()
            }
            Err(err) => {
                warn!("introspection of type {} failed: {}", type_name, err);
                return None;
            }
        };

        let updated = self
            .schema
            .update(|snapshot| snapshot.insert_type(type_name, info.clone()));
        if let Some(snapshot) = updated {
            self.schema_cache.persist(&snapshot);
        }
        Some(info)
    }

    /// Field list of `type_name`; introspects and caches types outside the snapshot buckets.
    pub async fn schema_type(&self, type_name: &str) -> Option<TypeInfo> {
        if !self.schema_ready().await {
            return None;
        }
        let (known, introspected) = self.schema.with_snapshot(|snapshot| {
            (
                snapshot.type_info(type_name).cloned(),
                snapshot.extension(type_name).is_some(),
            )
        })?;
        if known.is_some() || introspected {
            return known;
        }
        self.introspect_type(type_name)
            .await
            .filter(|info| !info.fields.is_empty())
    }

    /// Look in the snapshot first, then introspect `type_name` once on a miss.
    async fn lookup_field(&self, type_name: &str, field: &str) -> Option<Option<SchemaField>> {
        if !self.schema_ready().await {
            return None;
        }
        let (found, introspected, bucket) = self.schema.with_snapshot(|snapshot| {
            (
                snapshot.field(type_name, field).cloned(),
                snapshot.extension(type_name).is_some(),
                snapshot.bucket(type_name).is_some(),
            )
        })?;
        if found.is_some() || introspected {
            return Some(found);
        }
        match self.introspect_type(type_name).await {
            Some(info) => Some(info.field(field).cloned()),
            None if bucket => Some(None),
            None => None,
        }
    }

    pub async fn schema_field(&self, type_name: &str, field: &str) -> Option<SchemaField> {
        self.lookup_field(type_name, field).await.flatten()
    }

    /// `None` when no schema is available to answer.
    pub async fn schema_has_field(&self, type_name: &str, field: &str) -> Option<bool> {
        self.lookup_field(type_name, field)
            .await
            .map(|found| found.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responses::ViewerData;
    use crate::test_helpers::*;
    use mockito::Matcher;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_execute_sends_normalized_token() {
        let mut server = mock_linear_server().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_header("authorization", "lin_api_123")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"query": queries::workspace::VIEWER})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(mock_viewer_response().to_string())
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server, "  Bearer lin_api_123 ");
        let data: ViewerData = client
            .execute(&GraphQLRequest::new(queries::workspace::VIEWER))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(data.viewer.unwrap().email, "test@example.com");
    }

    #[tokio::test]
    async fn test_empty_token_omits_authorization_header() {
        let mut server = mock_linear_server().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(mock_viewer_response().to_string())
            .create_async()
            .await;

        let client = client_for(&server, "   ");
        let _: ViewerData = client
            .execute(&GraphQLRequest::new(queries::workspace::VIEWER))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_regardless_of_body() {
        let mut server = mock_linear_server().await;
        let _mock = server
            .mock("POST", "/graphql")
            .with_status(401)
            .with_body(mock_viewer_response().to_string())
            .create_async()
            .await;

        let client = client_for(&server, "bad-key");
        let result: Result<ViewerData> = client
            .execute(&GraphQLRequest::new(queries::workspace::VIEWER))
            .await;
        assert!(matches!(result, Err(LinearError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_forbidden_is_unauthorized() {
        let mut server = mock_linear_server().await;
        let _mock = server
            .mock("POST", "/graphql")
            .with_status(403)
            .create_async()
            .await;

        let client = client_for(&server, "key");
        let result: Result<ViewerData> = client
            .execute(&GraphQLRequest::new(queries::workspace::VIEWER))
            .await;
        assert!(matches!(result, Err(LinearError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_throttling_statuses_are_rate_limited() {
        for status in [429, 503, 504] {
            let mut server = mock_linear_server().await;
            let _mock = server
                .mock("POST", "/graphql")
                .with_status(status)
                .create_async()
                .await;

            let client = client_for(&server, "key");
            let result: Result<ViewerData> = client
                .execute(&GraphQLRequest::new(queries::workspace::VIEWER))
                .await;
            assert!(
                matches!(result, Err(LinearError::RateLimited)),
                "status {status}"
            );
        }
    }

    #[tokio::test]
    async fn test_graphql_errors_are_preserved() {
        let mut server = mock_linear_server().await;
        let _mock = server
            .mock("POST", "/graphql")
            .with_status(400)
            .with_body(
                mock_graphql_errors(&["Cannot query field \"viewer\" on type \"Query\".", "second"])
                    .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server, "key");
        let err = client
            .execute::<ViewerData>(&GraphQLRequest::new(queries::workspace::VIEWER))
            .await
            .unwrap_err();
        assert!(err.is_unknown_field("viewer"));
        assert_eq!(
            err.to_string(),
            "Cannot query field \"viewer\" on type \"Query\".; second"
        );
    }

    #[tokio::test]
    async fn test_null_data_decodes_as_empty_object() {
        let mut server = mock_linear_server().await;
        let _mock = server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(json!({"data": null}).to_string())
            .create_async()
            .await;

        let client = client_for(&server, "key");
        let data: ViewerData = client
            .execute(&GraphQLRequest::new(queries::workspace::VIEWER))
            .await
            .unwrap();
        assert!(data.viewer.is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_is_transport_error() {
        let mut server = mock_linear_server().await;
        let _mock = server
            .mock("POST", "/graphql")
            .with_status(500)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let client = client_for(&server, "key");
        let result: Result<ViewerData> = client
            .execute(&GraphQLRequest::new(queries::workspace::VIEWER))
            .await;
        assert!(matches!(result, Err(LinearError::Transport { .. })));
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        let client = LinearClient::builder()
            .auth_token(secret("key"))
            .base_url(Some("http://127.0.0.1:9/graphql".to_string()))
            .build()
            .unwrap();
        let result: Result<ViewerData> = client
            .execute(&GraphQLRequest::new(queries::workspace::VIEWER))
            .await;
        assert!(matches!(result, Err(LinearError::Transport { .. })));
    }

    #[tokio::test]
    async fn test_schema_is_introspected_once_per_client() {
        let mut server = mock_linear_server().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex(r#"__type\(name: \\"Query\\"\)"#.to_string()))
            .with_status(200)
            .with_body(mock_schema_response().to_string())
            .expect(1)
            .create_async()
            .await;
        let issue_type = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({"variables": {"name": "Issue"}})))
            .with_status(200)
            .with_body(mock_type_response(&["id", "title"]).to_string())
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server, "key");
        assert_eq!(
            client.schema_arg_base_type("team", "id").await,
            Some("String".to_string())
        );
        assert_eq!(client.schema_has_field("Comment", "bodyData").await, Some(true));
        assert_eq!(client.schema_has_field("Issue", "attachments").await, Some(false));
        assert_eq!(client.schema_has_field("Issue", "attachments").await, Some(false));
        mock.assert_async().await;
        issue_type.assert_async().await;
    }

    #[tokio::test]
    async fn test_bucket_miss_falls_through_to_type_introspection() {
        let dir = TempDir::new().unwrap();
        let schema_path = dir.path().join("linear").join("schema.json");
        let mut server = mock_linear_server().await;
        let _schema = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex(r#"__type\(name: \\"Query\\"\)"#.to_string()))
            .with_status(200)
            .with_body(mock_schema_response().to_string())
            .expect(1)
            .create_async()
            .await;
        let issue_type = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({"variables": {"name": "Issue"}})))
            .with_status(200)
            .with_body(mock_type_response(&["id", "attachments", "descriptionData"]).to_string())
            .expect(1)
            .create_async()
            .await;

        let client = LinearClient::builder()
            .auth_token(secret("key"))
            .base_url(Some(format!("{}/graphql", server.url())))
            .schema_path(Some(schema_path.clone()))
            .build()
            .unwrap();

        assert_eq!(client.schema_has_field("Issue", "title").await, Some(true));
        assert_eq!(client.schema_has_field("Issue", "attachments").await, Some(true));
        assert_eq!(
            client.schema_field("issue", "descriptionData").await.map(|f| f.name),
            Some("descriptionData".to_string())
        );
        assert_eq!(client.schema_has_field("Issue", "subscribers").await, Some(false));
        issue_type.assert_async().await;

        let persisted = SchemaCache::new(Some(schema_path), std::sync::Arc::new(SystemClock))
            .read()
            .unwrap();
        assert!(persisted.has_field("Issue", "attachments"));
    }

    #[tokio::test]
    async fn test_failed_type_introspection_answers_from_bucket() {
        let mut server = mock_linear_server().await;
        let _schema = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex(r#"__type\(name: \\"Query\\"\)"#.to_string()))
            .with_status(200)
            .with_body(mock_schema_response().to_string())
            .create_async()
            .await;
        let _type = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({"variables": {"name": "Issue"}})))
            .with_status(500)
            .with_body("not json")
            .create_async()
            .await;

        let client = client_for(&server, "key");
        assert_eq!(client.schema_has_field("Issue", "attachments").await, Some(false));
    }

    #[tokio::test]
    async fn test_failed_introspection_is_remembered_until_invalidated() {
        let mut server = mock_linear_server().await;
        let failing = server
            .mock("POST", "/graphql")
            .with_status(500)
            .with_body("not json")
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server, "key");
        assert_eq!(client.schema_arg_base_type("team", "id").await, None);
        assert_eq!(client.schema_has_field("Comment", "bodyData").await, None);
        assert_eq!(client.id_type("team").await, "ID");
        failing.assert_async().await;
        failing.remove_async().await;

        let healthy = server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(mock_schema_response().to_string())
            .expect(1)
            .create_async()
            .await;
        client.invalidate_schema();
        assert_eq!(client.id_type("team").await, "String");
        healthy.assert_async().await;
    }

    #[tokio::test]
    async fn test_unknown_type_is_introspected_and_cached() {
        let dir = TempDir::new().unwrap();
        let schema_path = dir.path().join("linear").join("schema.json");
        let mut server = mock_linear_server().await;
        let _schema = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex(r#"__type\(name: \\"Query\\"\)"#.to_string()))
            .with_status(200)
            .with_body(mock_schema_response().to_string())
            .expect(1)
            .create_async()
            .await;
        let type_mock = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({"variables": {"name": "Project"}})))
            .with_status(200)
            .with_body(mock_type_response(&["id", "name", "slugId"]).to_string())
            .expect(1)
            .create_async()
            .await;

        let client = LinearClient::builder()
            .auth_token(secret("key"))
            .base_url(Some(format!("{}/graphql", server.url())))
            .schema_path(Some(schema_path.clone()))
            .build()
            .unwrap();

        assert_eq!(client.schema_has_field("Project", "slugId").await, Some(true));
        assert_eq!(client.schema_has_field("Project", "archived").await, Some(false));
        type_mock.assert_async().await;

        let persisted = SchemaCache::new(Some(schema_path), std::sync::Arc::new(SystemClock))
            .read()
            .unwrap();
        assert!(persisted.has_field("Project", "slugId"));
    }
}
