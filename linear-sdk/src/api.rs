// ABOUTME: LinearApi trait describing every entity operation the CLI depends on
// ABOUTME: Implemented by the live LinearClient and by the in-memory FakeLinearApi

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::types::{
    Attachment, Comment, Cycle, CyclePage, IssueDetail, IssueFilter, IssuePage, IssueRelation,
    IssueRelationSet, IssueSummary, Team, User, WorkflowState,
};
use crate::{LinearClient, Result};

/// Entity operations against a Linear workspace.
///
/// Limits are forwarded as `first` only when positive; cursors only when non-empty.
#[async_trait]
pub trait LinearApi: Send + Sync {
    async fn me(&self) -> Result<User>;
    async fn teams(&self) -> Result<Vec<Team>>;
    async fn workflow_states(&self, team_id: &str) -> Result<Vec<WorkflowState>>;

    async fn resolve_team_id(&self, key_or_id: &str) -> Result<String>;
    async fn resolve_user_id(&self, value: &str) -> Result<String>;
    async fn resolve_state_id(&self, team_id: &str, value: &str) -> Result<String>;
    async fn resolve_label_ids(&self, labels: &[String]) -> Result<Vec<String>>;
    async fn resolve_project_id(&self, value: &str) -> Result<String>;
    async fn resolve_cycle_id(&self, team_id: &str, value: &str) -> Result<String>;
    async fn resolve_issue_id(&self, value: &str) -> Result<String>;

    async fn issue(&self, reference: &str) -> Result<IssueDetail>;
    async fn issue_comments(&self, issue_id: &str, limit: i64) -> Result<Vec<Comment>>;
    async fn issue_attachments(&self, issue_id: &str, limit: i64) -> Result<Vec<Attachment>>;
    async fn issue_uploads(&self, issue_id: &str, limit: i64) -> Result<Vec<Attachment>>;
    async fn issue_relations(&self, issue_id: &str, limit: i64) -> Result<IssueRelationSet>;
    async fn issues(&self, filter: &IssueFilter, limit: i64, after: Option<&str>) -> Result<IssuePage>;

    async fn issue_create(&self, input: Map<String, Value>) -> Result<IssueSummary>;
    /// `input` must carry a non-empty string `id`.
    async fn issue_update(&self, input: Map<String, Value>) -> Result<IssueSummary>;
    async fn issue_comment(&self, issue_id: &str, body: &str) -> Result<String>;
    async fn issue_relation_create(
        &self,
        issue_id: &str,
        related_issue_id: &str,
        relation_type: &str,
    ) -> Result<IssueRelation>;
    async fn issue_relation_delete(&self, relation_id: &str) -> Result<()>;

    async fn cycles(
        &self,
        team_id: &str,
        current_only: bool,
        limit: i64,
        after: Option<&str>,
    ) -> Result<CyclePage>;
    async fn cycle(&self, id: &str) -> Result<Cycle>;
}

#[async_trait]
impl LinearApi for LinearClient {
    async fn me(&self) -> Result<User> {
        LinearClient::me(self).await
    }

    async fn teams(&self) -> Result<Vec<Team>> {
        LinearClient::teams(self).await
    }

    async fn workflow_states(&self, team_id: &str) -> Result<Vec<WorkflowState>> {
        LinearClient::workflow_states(self, team_id).await
    }

    async fn resolve_team_id(&self, key_or_id: &str) -> Result<String> {
        LinearClient::resolve_team_id(self, key_or_id).await
    }

    async fn resolve_user_id(&self, value: &str) -> Result<String> {
        LinearClient::resolve_user_id(self, value).await
    }

    async fn resolve_state_id(&self, team_id: &str, value: &str) -> Result<String> {
        LinearClient::resolve_state_id(self, team_id, value).await
    }

    async fn resolve_label_ids(&self, labels: &[String]) -> Result<Vec<String>> {
        LinearClient::resolve_label_ids(self, labels).await
    }

    async fn resolve_project_id(&self, value: &str) -> Result<String> {
        LinearClient::resolve_project_id(self, value).await
    }

    async fn resolve_cycle_id(&self, team_id: &str, value: &str) -> Result<String> {
        LinearClient::resolve_cycle_id(self, team_id, value).await
    }

    async fn resolve_issue_id(&self, value: &str) -> Result<String> {
        LinearClient::resolve_issue_id(self, value).await
    }

    async fn issue(&self, reference: &str) -> Result<IssueDetail> {
        LinearClient::issue(self, reference).await
    }

    async fn issue_comments(&self, issue_id: &str, limit: i64) -> Result<Vec<Comment>> {
        LinearClient::issue_comments(self, issue_id, limit).await
    }

    async fn issue_attachments(&self, issue_id: &str, limit: i64) -> Result<Vec<Attachment>> {
        LinearClient::issue_attachments(self, issue_id, limit).await
    }

    async fn issue_uploads(&self, issue_id: &str, limit: i64) -> Result<Vec<Attachment>> {
        LinearClient::issue_uploads(self, issue_id, limit).await
    }

    async fn issue_relations(&self, issue_id: &str, limit: i64) -> Result<IssueRelationSet> {
        LinearClient::issue_relations(self, issue_id, limit).await
    }

    async fn issues(&self, filter: &IssueFilter, limit: i64, after: Option<&str>) -> Result<IssuePage> {
        LinearClient::issues(self, filter, limit, after).await
    }

    async fn issue_create(&self, input: Map<String, Value>) -> Result<IssueSummary> {
        LinearClient::issue_create(self, input).await
    }

    async fn issue_update(&self, input: Map<String, Value>) -> Result<IssueSummary> {
        LinearClient::issue_update(self, input).await
    }

    async fn issue_comment(&self, issue_id: &str, body: &str) -> Result<String> {
        LinearClient::issue_comment(self, issue_id, body).await
    }

    async fn issue_relation_create(
        &self,
        issue_id: &str,
        related_issue_id: &str,
        relation_type: &str,
    ) -> Result<IssueRelation> {
        LinearClient::issue_relation_create(self, issue_id, related_issue_id, relation_type).await
    }

    async fn issue_relation_delete(&self, relation_id: &str) -> Result<()> {
        LinearClient::issue_relation_delete(self, relation_id).await
    }

    async fn cycles(
        &self,
        team_id: &str,
        current_only: bool,
        limit: i64,
        after: Option<&str>,
    ) -> Result<CyclePage> {
        LinearClient::cycles(self, team_id, current_only, limit, after).await
    }

    async fn cycle(&self, id: &str) -> Result<Cycle> {
        LinearClient::cycle(self, id).await
    }
}
