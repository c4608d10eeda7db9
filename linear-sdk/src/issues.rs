// ABOUTME: Issue reads and mutations: detail, comments, attachments, uploads, relations
// ABOUTME: Optional selections follow the introspected schema when one is available

use log::debug;
use serde_json::{Map, Value};

use crate::attachments::{
    extract_from_comments, extract_from_description, merge_uploads, structured_attachment,
};
use crate::error::LinearError;
use crate::filter::build_issue_filter;
use crate::graphql::GraphQLRequest;
use crate::queries::issues;
use crate::responses::{
    CommentCreateData, IssueAttachmentsData, IssueCommentsData, IssueCreateData,
    IssueDescriptionData, IssueDetailData, IssueRelationsData, IssueUpdateData, IssuesData, Nodes,
    RelationCreateData, RelationDeleteData, WireRelation,
};
use crate::types::{
    Attachment, Comment, IssueDetail, IssueFilter, IssuePage, IssueRelation, IssueRelationSet,
    IssueSummary,
};
use crate::{LinearClient, Result};

/// Rejects empty or whitespace-only comment bodies.
pub fn validate_comment_body(body: &str) -> Result<()> {
    if body.trim().is_empty() {
        return Err(LinearError::validation("comment body is required"));
    }
    Ok(())
}

/// Splits the issue id out of a flat update input.
pub fn split_update_input(mut input: Map<String, Value>) -> Result<(String, Map<String, Value>)> {
    let id = match input.remove("id") {
        Some(Value::String(id)) if !id.is_empty() => id,
        _ => return Err(LinearError::validation("issue id is required")),
    };
    Ok((id, input))
}

fn relation_nodes(nodes: Option<Nodes<WireRelation>>) -> Vec<IssueRelation> {
    nodes
        .unwrap_or_default()
        .nodes
        .into_iter()
        .map(IssueRelation::from)
        .collect()
}

fn issue_not_found(reference: &str) -> LinearError {
    LinearError::not_found(format!("issue {reference}"))
}

impl LinearClient {
    pub async fn issue(&self, reference: &str) -> Result<IssueDetail> {
        let request = GraphQLRequest::new(issues::ISSUE).variable("id", reference);
        let data: IssueDetailData = self.execute(&request).await?;
        data.issue
            .map(IssueDetail::from)
            .ok_or_else(|| issue_not_found(reference))
    }

    pub async fn issue_comments(&self, issue_id: &str, limit: i64) -> Result<Vec<Comment>> {
        let include_body_data = self
            .schema_has_field("Comment", "bodyData")
            .await
            .unwrap_or(true);
        let request = GraphQLRequest::new(issues::issue_comments(include_body_data))
            .variable("id", issue_id)
            .first(limit);
        let data: IssueCommentsData = self.execute(&request).await?;
        let issue = data.issue.ok_or_else(|| issue_not_found(issue_id))?;
        Ok(issue.comments.nodes.into_iter().map(Comment::from).collect())
    }

    /// Structured attachments, or uploads linked from comments when there are none.
    pub async fn issue_attachments(&self, issue_id: &str, limit: i64) -> Result<Vec<Attachment>> {
        let mut attachments = Vec::new();
        if self.schema_has_field("Issue", "attachments").await == Some(false) {
            debug!("schema has no Issue.attachments, using comment uploads");
        } else {
            let request = GraphQLRequest::new(issues::ISSUE_ATTACHMENTS)
                .variable("id", issue_id)
                .first(limit);
            let data: IssueAttachmentsData = self.execute(&request).await?;
            let issue = data.issue.ok_or_else(|| issue_not_found(issue_id))?;
            attachments.extend(issue.attachments.nodes.into_iter().map(|node| {
                structured_attachment(node.id, node.title, node.url, node.source.as_ref(), node.created_at)
            }));
        }

        if attachments.is_empty() {
            match self.issue_comments(issue_id, limit).await {
                Ok(comments) => attachments = extract_from_comments(&comments),
                Err(err) => debug!("comment uploads for {issue_id} unavailable: {err}"),
            }
        }
        Ok(attachments)
    }

    /// Uploads linked from the description (and its document model), then from comments.
    pub async fn issue_uploads(&self, issue_id: &str, limit: i64) -> Result<Vec<Attachment>> {
        let include_description_data =
            self.schema_has_field("Issue", "descriptionData").await == Some(true);
        let request = GraphQLRequest::new(issues::issue_description(include_description_data))
            .variable("id", issue_id);
        let data: IssueDescriptionData = self.execute(&request).await?;
        let issue = data.issue.ok_or_else(|| issue_not_found(issue_id))?;
        let from_description =
            extract_from_description(&issue.description, issue.description_data.as_deref());

        let comments = self.issue_comments(issue_id, limit).await?;
        Ok(merge_uploads(from_description, extract_from_comments(&comments)))
    }

    pub async fn issue_relations(&self, issue_id: &str, limit: i64) -> Result<IssueRelationSet> {
        let request = GraphQLRequest::new(issues::ISSUE_RELATIONS)
            .variable("id", issue_id)
            .first(limit);
        let data: IssueRelationsData = self.execute(&request).await?;
        let issue = data.issue.ok_or_else(|| issue_not_found(issue_id))?;
        Ok(IssueRelationSet {
            relations: relation_nodes(issue.relations),
            inverse_relations: relation_nodes(issue.inverse_relations),
        })
    }

    pub async fn issues(&self, filter: &IssueFilter, limit: i64, after: Option<&str>) -> Result<IssuePage> {
        let request = GraphQLRequest::new(issues::ISSUES)
            .optional_variable("filter", build_issue_filter(filter))
            .first(limit)
            .after(after);
        let data: IssuesData = self.execute(&request).await?;
        Ok(IssuePage {
            nodes: data.issues.nodes.into_iter().map(IssueSummary::from).collect(),
            page_info: data.issues.page_info.into(),
        })
    }

    pub async fn issue_create(&self, input: Map<String, Value>) -> Result<IssueSummary> {
        let request = GraphQLRequest::new(issues::ISSUE_CREATE).variable("input", input);
        let data: IssueCreateData = self.execute(&request).await?;
        data.issue_create
            .and_then(|payload| payload.issue)
            .map(IssueSummary::from)
            .ok_or_else(|| LinearError::not_found("created issue"))
    }

    pub async fn issue_update(&self, input: Map<String, Value>) -> Result<IssueSummary> {
        let (id, input) = split_update_input(input)?;
        let request = GraphQLRequest::new(issues::ISSUE_UPDATE)
            .variable("id", &id)
            .variable("input", input);
        let data: IssueUpdateData = self.execute(&request).await?;
        data.issue_update
            .and_then(|payload| payload.issue)
            .map(IssueSummary::from)
            .ok_or_else(|| issue_not_found(&id))
    }

    /// Returns the new comment's id.
    pub async fn issue_comment(&self, issue_id: &str, body: &str) -> Result<String> {
        validate_comment_body(body)?;
        let request = GraphQLRequest::new(issues::COMMENT_CREATE).variable(
            "input",
            serde_json::json!({"issueId": issue_id, "body": body}),
        );
        let data: CommentCreateData = self.execute(&request).await?;
        data.comment_create
            .and_then(|payload| payload.comment)
            .map(|comment| comment.id)
            .ok_or_else(|| LinearError::not_found("created comment"))
    }

    pub async fn issue_relation_create(
        &self,
        issue_id: &str,
        related_issue_id: &str,
        relation_type: &str,
    ) -> Result<IssueRelation> {
        let request = GraphQLRequest::new(issues::RELATION_CREATE).variable(
            "input",
            serde_json::json!({
                "issueId": issue_id,
                "relatedIssueId": related_issue_id,
                "type": relation_type,
            }),
        );
        let data: RelationCreateData = self.execute(&request).await?;
        data.issue_relation_create
            .and_then(|payload| payload.issue_relation)
            .map(IssueRelation::from)
            .ok_or_else(|| LinearError::not_found("created relation"))
    }

    pub async fn issue_relation_delete(&self, relation_id: &str) -> Result<()> {
        let request = GraphQLRequest::new(issues::RELATION_DELETE).variable("id", relation_id);
        let data: RelationDeleteData = self.execute(&request).await?;
        match data.issue_relation_delete {
            Some(payload) if payload.success => Ok(()),
            Some(_) => Err(LinearError::transport(format!(
                "relation delete failed for {relation_id}"
            ))),
            None => Err(LinearError::not_found(format!("relation {relation_id}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use mockito::Matcher;
    use serde_json::json;

    fn input(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_split_update_input() {
        let (id, rest) = split_update_input(input(json!({"id": "i-1", "title": "New"}))).unwrap();
        assert_eq!(id, "i-1");
        assert_eq!(Value::Object(rest), json!({"title": "New"}));

        for bad in [json!({"title": "x"}), json!({"id": ""}), json!({"id": 7})] {
            assert!(matches!(
                split_update_input(input(bad)),
                Err(LinearError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_validate_comment_body() {
        assert!(validate_comment_body("Looks good").is_ok());
        assert!(validate_comment_body(" \n\t ").is_err());
    }

    #[tokio::test]
    async fn test_issue_detail() {
        let mut server = mock_linear_server().await;
        let _mock = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({"variables": {"id": "ENG-123"}})))
            .with_status(200)
            .with_body(mock_issue_detail_response().to_string())
            .create_async()
            .await;

        let client = client_for(&server, "key");
        let issue = client.issue("ENG-123").await.unwrap();
        assert_eq!(issue.identifier, "ENG-123");
        assert_eq!(issue.team_id, TEAM_ID);
        assert_eq!(issue.cycle, "");
        assert_eq!(issue.labels, vec!["bug", "p1"]);
    }

    #[tokio::test]
    async fn test_missing_issue_is_not_found() {
        let mut server = mock_linear_server().await;
        let _mock = server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(json!({"data": {"issue": null}}).to_string())
            .create_async()
            .await;

        let client = client_for(&server, "key");
        assert!(matches!(
            client.issue("ENG-404").await,
            Err(LinearError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_issues_omits_unset_arguments() {
        let mut server = mock_linear_server().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Json(json!({"query": issues::ISSUES})))
            .with_status(200)
            .with_body(mock_issues_response().to_string())
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server, "key");
        let page = client.issues(&IssueFilter::default(), 0, Some("")).await.unwrap();
        mock.assert_async().await;
        assert_eq!(page.nodes.len(), 2);
        assert_eq!(page.nodes[0].cycle, "Cycle 3");
        assert_eq!(page.nodes[1].assignee, "");
        assert!(page.page_info.has_next_page);
        assert_eq!(page.page_info.end_cursor, "cursor-2");
    }

    #[tokio::test]
    async fn test_issues_sends_filter_and_paging() {
        let mut server = mock_linear_server().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Json(json!({
                "query": issues::ISSUES,
                "variables": {
                    "filter": {"team": {"id": {"eq": TEAM_ID}}, "priority": {"eq": 0}},
                    "first": 25,
                    "after": "cursor-1"
                }
            })))
            .with_status(200)
            .with_body(mock_issues_response().to_string())
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server, "key");
        let filter = IssueFilter {
            team_id: Some(TEAM_ID.to_string()),
            ..IssueFilter::default()
        }
        .with_priority(0);
        client.issues(&filter, 25, Some("cursor-1")).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_comments_select_body_data_without_schema() {
        let mut server = mock_linear_server().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex("bodyData".to_string()))
            .with_status(200)
            .with_body(
                json!({"data": {"issue": {"comments": {"nodes": [
                    {"id": "c1", "body": "hi", "bodyData": {"type": "doc"}, "createdAt": "2024-01-01", "user": {"name": "Ada", "email": "ada@acme.io"}},
                    {"id": "c2", "body": null, "createdAt": "2024-01-02", "user": null}
                ]}}}})
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server, "key");
        let comments = client.issue_comments(ISSUE_ID, 10).await.unwrap();
        mock.assert_async().await;
        assert_eq!(comments[0].body_data.as_deref(), Some(r#"{"type":"doc"}"#));
        assert_eq!(comments[0].user_name, "Ada");
        assert_eq!(comments[1].body, "");
        assert_eq!(comments[1].user_email, "");
    }

    #[tokio::test]
    async fn test_comments_drop_body_data_when_schema_lacks_it() {
        let mut server = mock_linear_server().await;
        let mut schema = mock_schema_response();
        schema["data"]["comment"] = json!({"fields": [{"name": "body", "type": {"kind": "SCALAR", "name": "String", "ofType": null}}]});
        let _schema = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex(r#"__type\(name: \\"Query\\"\)"#.to_string()))
            .with_status(200)
            .with_body(schema.to_string())
            .create_async()
            .await;
        let comments = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex(r"comments\(first".to_string()))
            .with_status(200)
            .with_body(json!({"data": {"issue": {"comments": {"nodes": []}}}}).to_string())
            .expect(1)
            .create_async()
            .await;
        let with_body_data = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex("bodyData createdAt".to_string()))
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server, "key");
        assert!(client.issue_comments(ISSUE_ID, 0).await.unwrap().is_empty());
        comments.assert_async().await;
        with_body_data.assert_async().await;
    }

    #[tokio::test]
    async fn test_structured_attachments_fall_back_to_source() {
        let mut server = mock_linear_server().await;
        let _mock = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex(r"attachments\(first".to_string()))
            .with_status(200)
            .with_body(
                json!({"data": {"issue": {"attachments": {"nodes": [
                    {"id": "a1", "title": "PR #1", "url": "https://github.com/acme/repo/pull/1", "source": null, "createdAt": "2024-01-01"},
                    {"id": "a2", "title": "dump.sql", "url": null, "source": "https://uploads.linear.app/x/y/z", "createdAt": "2024-01-02"}
                ]}}}})
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server, "key");
        let attachments = client.issue_attachments(ISSUE_ID, 5).await.unwrap();
        assert_eq!(attachments.len(), 2);
        assert_eq!(attachments[1].url, "https://uploads.linear.app/x/y/z");
        assert_eq!(attachments[1].file_name, "dump.sql");
    }

    #[tokio::test]
    async fn test_empty_attachments_fall_back_to_comment_uploads() {
        let mut server = mock_linear_server().await;
        let _attachments = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex(r"attachments\(first".to_string()))
            .with_status(200)
            .with_body(json!({"data": {"issue": {"attachments": {"nodes": []}}}}).to_string())
            .create_async()
            .await;
        let _comments = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex(r"comments\(first".to_string()))
            .with_status(200)
            .with_body(
                json!({"data": {"issue": {"comments": {"nodes": [
                    {"id": "c1", "body": "[file.sql](https://uploads.linear.app/abc/def/ghi)", "createdAt": "2024-01-01"}
                ]}}}})
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server, "key");
        let attachments = client.issue_attachments(ISSUE_ID, 5).await.unwrap();
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].file_name, "file.sql");
        assert_eq!(attachments[0].comment_id.as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn test_attachments_skip_structured_path_when_schema_lacks_it() {
        let mut server = mock_linear_server().await;
        let _schema = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex(r#"__type\(name: \\"Query\\"\)"#.to_string()))
            .with_status(200)
            .with_body(mock_schema_response().to_string())
            .create_async()
            .await;
        let structured = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex(r"attachments\(first".to_string()))
            .expect(0)
            .create_async()
            .await;
        let _comments = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex(r"comments\(first".to_string()))
            .with_status(200)
            .with_body(json!({"data": {"issue": {"comments": {"nodes": []}}}}).to_string())
            .create_async()
            .await;

        let _issue_type = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({"variables": {"name": "Issue"}})))
            .with_status(200)
            .with_body(mock_type_response(&["id", "title"]).to_string())
            .create_async()
            .await;

        let client = client_for(&server, "key");
        assert!(client.issue_attachments(ISSUE_ID, 5).await.unwrap().is_empty());
        structured.assert_async().await;
    }

    #[tokio::test]
    async fn test_attachments_found_by_type_introspection() {
        let mut server = mock_linear_server().await;
        let _schema = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex(r#"__type\(name: \\"Query\\"\)"#.to_string()))
            .with_status(200)
            .with_body(mock_schema_response().to_string())
            .create_async()
            .await;
        let issue_type = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({"variables": {"name": "Issue"}})))
            .with_status(200)
            .with_body(mock_type_response(&["id", "attachments"]).to_string())
            .expect(1)
            .create_async()
            .await;
        let structured = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex(r"attachments\(first".to_string()))
            .with_status(200)
            .with_body(
                json!({"data": {"issue": {"attachments": {"nodes": [
                    {"id": "a1", "title": "dump.sql", "url": "https://uploads.linear.app/x/y/z", "createdAt": "2024-01-02"}
                ]}}}})
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server, "key");
        let attachments = client.issue_attachments(ISSUE_ID, 5).await.unwrap();
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].file_name, "dump.sql");
        issue_type.assert_async().await;
        structured.assert_async().await;
    }

    #[tokio::test]
    async fn test_uploads_merge_description_and_comments() {
        let mut server = mock_linear_server().await;
        let _description = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex(r"issue\(id: \$id\) \{ id description".to_string()))
            .with_status(200)
            .with_body(
                json!({"data": {"issue": {
                    "id": ISSUE_ID,
                    "description": "See [trace.log](https://uploads.linear.app/a/b/c)"
                }}})
                .to_string(),
            )
            .create_async()
            .await;
        let _comments = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex(r"comments\(first".to_string()))
            .with_status(200)
            .with_body(
                json!({"data": {"issue": {"comments": {"nodes": [
                    {"id": "c1", "body": "again https://uploads.linear.app/a/b/c and https://uploads.linear.app/d/e/shot.png", "createdAt": "2024-01-01"}
                ]}}}})
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server, "key");
        let uploads = client.issue_uploads(ISSUE_ID, 0).await.unwrap();
        assert_eq!(uploads.len(), 2);
        assert_eq!(uploads[0].file_name, "trace.log");
        assert_eq!(uploads[0].comment_id, None);
        assert_eq!(uploads[1].file_name, "shot.png");
        assert_eq!(uploads[1].comment_id.as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn test_relations() {
        let mut server = mock_linear_server().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({"variables": {"id": ISSUE_ID, "first": 200}})))
            .with_status(200)
            .with_body(mock_relations_response().to_string())
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server, "key");
        let set = client.issue_relations(ISSUE_ID, 200).await.unwrap();
        mock.assert_async().await;
        assert_eq!(set.relations.len(), 2);
        assert_eq!(set.relations[0].related_issue_id, OTHER_ISSUE_ID);
        assert_eq!(set.inverse_relations[0].issue_id, "blocker-id");
    }

    #[tokio::test]
    async fn test_update_sends_id_separately() {
        let mut server = mock_linear_server().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Json(json!({
                "query": issues::ISSUE_UPDATE,
                "variables": {"id": ISSUE_ID, "input": {"title": "Renamed"}}
            })))
            .with_status(200)
            .with_body(
                json!({"data": {"issueUpdate": {"issue": {"id": ISSUE_ID, "identifier": "ENG-123", "title": "Renamed", "url": "u"}}}})
                    .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server, "key");
        let updated = client
            .issue_update(input(json!({"id": ISSUE_ID, "title": "Renamed"})))
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(updated.title, "Renamed");
    }

    #[tokio::test]
    async fn test_update_without_id_makes_no_call() {
        let mut server = mock_linear_server().await;
        let mock = server.mock("POST", "/graphql").expect(0).create_async().await;

        let client = client_for(&server, "key");
        let err = client
            .issue_update(input(json!({"title": "x"})))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_blank_comment_makes_no_call() {
        let mut server = mock_linear_server().await;
        let mock = server.mock("POST", "/graphql").expect(0).create_async().await;

        let client = client_for(&server, "key");
        assert!(matches!(
            client.issue_comment(ISSUE_ID, "   ").await,
            Err(LinearError::Validation(_))
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_comment_and_create() {
        let mut server = mock_linear_server().await;
        let _comment = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({"variables": {"input": {"issueId": ISSUE_ID, "body": "Done"}}})))
            .with_status(200)
            .with_body(json!({"data": {"commentCreate": {"comment": {"id": "c-9"}}}}).to_string())
            .create_async()
            .await;
        let _create = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({"variables": {"input": {"teamId": TEAM_ID, "title": "New"}}})))
            .with_status(200)
            .with_body(
                json!({"data": {"issueCreate": {"issue": {"id": "i-9", "identifier": "ENG-9", "title": "New", "url": "u"}}}})
                    .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server, "key");
        assert_eq!(client.issue_comment(ISSUE_ID, "Done").await.unwrap(), "c-9");
        let created = client
            .issue_create(input(json!({"teamId": TEAM_ID, "title": "New"})))
            .await
            .unwrap();
        assert_eq!(created.identifier, "ENG-9");
    }

    #[tokio::test]
    async fn test_relation_create_and_delete() {
        let mut server = mock_linear_server().await;
        let _create = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex("issueRelationCreate".to_string()))
            .with_status(200)
            .with_body(
                json!({"data": {"issueRelationCreate": {"issueRelation": {
                    "id": "rel-1", "type": "blocks", "issue": {"id": ISSUE_ID}, "relatedIssue": {"id": OTHER_ISSUE_ID}
                }}}})
                .to_string(),
            )
            .create_async()
            .await;
        let _delete_ok = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({"variables": {"id": "rel-1"}})))
            .with_status(200)
            .with_body(json!({"data": {"issueRelationDelete": {"success": true}}}).to_string())
            .create_async()
            .await;
        let _delete_failed = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({"variables": {"id": "rel-2"}})))
            .with_status(200)
            .with_body(json!({"data": {"issueRelationDelete": {"success": false}}}).to_string())
            .create_async()
            .await;
        let _delete_null = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({"variables": {"id": "rel-3"}})))
            .with_status(200)
            .with_body(json!({"data": {"issueRelationDelete": null}}).to_string())
            .create_async()
            .await;

        let client = client_for(&server, "key");
        let relation = client
            .issue_relation_create(ISSUE_ID, OTHER_ISSUE_ID, "blocks")
            .await
            .unwrap();
        assert_eq!(relation.related_issue_id, OTHER_ISSUE_ID);
        assert!(client.issue_relation_delete("rel-1").await.is_ok());
        assert!(matches!(
            client.issue_relation_delete("rel-2").await,
            Err(LinearError::Transport { .. })
        ));
        assert!(matches!(
            client.issue_relation_delete("rel-3").await,
            Err(LinearError::NotFound(_))
        ));
    }
}
