// ABOUTME: Resolves human-friendly references (keys, emails, names, aliases) to Linear IDs
// ABOUTME: ID-shaped inputs pass through without a lookup except team IDs, which are verified

use log::debug;

use crate::constants::references::{CURRENT, ID_MIN_HYPHENS, ID_MIN_LENGTH, ME};
use crate::error::LinearError;
use crate::graphql::GraphQLRequest;
use crate::queries::{issues, workspace};
use crate::responses::{IssueIdData, IssueLabelsData, ProjectsData, TeamData, TeamsData, UsersData};
use crate::types::Team;
use crate::{LinearClient, Result};

/// Opaque Linear IDs are UUID-like: long, with at least four hyphens.
pub fn is_likely_id(value: &str) -> bool {
    value.len() >= ID_MIN_LENGTH && value.matches('-').count() >= ID_MIN_HYPHENS
}

pub(crate) fn eq_fold(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Splits a comma-separated list, trimming entries and dropping empty ones.
pub fn split_comma(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

impl LinearClient {
    pub async fn team_by_id(&self, id: &str) -> Result<Team> {
        let id_type = self.id_type("team").await;
        let request = GraphQLRequest::new(workspace::team_by_id(&id_type)).variable("id", id);
        let data: TeamData = self.execute(&request).await?;
        data.team
            .ok_or_else(|| LinearError::not_found(format!("team {id}")))
    }

    pub async fn team_by_key(&self, key: &str) -> Result<Team> {
        let request = GraphQLRequest::new(workspace::TEAM_BY_KEY).variable("key", key);
        let data: TeamsData = self.execute(&request).await?;
        data.teams
            .nodes
            .into_iter()
            .next()
            .ok_or_else(|| LinearError::not_found(format!("team {key}")))
    }

    pub async fn resolve_team_id(&self, key_or_id: &str) -> Result<String> {
        if is_likely_id(key_or_id) {
            match self.team_by_id(key_or_id).await {
                Ok(team) => return Ok(team.id),
                Err(err) => debug!("team id lookup for {key_or_id} failed, trying key: {err}"),
            }
        }
        Ok(self.team_by_key(key_or_id).await?.id)
    }

    pub async fn resolve_user_id(&self, value: &str) -> Result<String> {
        if value == ME {
            return Ok(self.me().await?.id);
        }
        if is_likely_id(value) {
            return Ok(value.to_string());
        }
        if value.contains('@') {
            let request = GraphQLRequest::new(workspace::USER_BY_EMAIL).variable("email", value);
            let data: UsersData = self.execute(&request).await?;
            return data
                .users
                .nodes
                .into_iter()
                .next()
                .map(|user| user.id)
                .ok_or_else(|| LinearError::not_found(format!("user {value}")));
        }
        Err(LinearError::validation(
            "assignee must be 'me', an id, or an email",
        ))
    }

    pub async fn resolve_state_id(&self, team_id: &str, value: &str) -> Result<String> {
        if is_likely_id(value) {
            return Ok(value.to_string());
        }
        self.workflow_states(team_id)
            .await?
            .into_iter()
            .find(|state| eq_fold(&state.name, value))
            .map(|state| state.id)
            .ok_or_else(|| LinearError::not_found(format!("workflow state {value}")))
    }

    /// All-or-nothing: one unknown label fails the batch.
    pub async fn resolve_label_ids(&self, labels: &[String]) -> Result<Vec<String>> {
        let mut ids = Vec::with_capacity(labels.len());
        for label in labels.iter().filter(|label| !label.is_empty()) {
            if is_likely_id(label) {
                ids.push(label.clone());
                continue;
            }
            let request = GraphQLRequest::new(workspace::LABEL_BY_NAME).variable("name", label);
            let data: IssueLabelsData = self.execute(&request).await?;
            let id = data
                .issue_labels
                .nodes
                .into_iter()
                .next()
                .map(|node| node.id)
                .ok_or_else(|| LinearError::not_found(format!("label {label}")))?;
            ids.push(id);
        }
        Ok(ids)
    }

    pub async fn resolve_project_id(&self, value: &str) -> Result<String> {
        if is_likely_id(value) {
            return Ok(value.to_string());
        }
        let request = GraphQLRequest::new(workspace::PROJECT_BY_NAME).variable("name", value);
        let data: ProjectsData = self.execute(&request).await?;
        data.projects
            .nodes
            .into_iter()
            .next()
            .map(|node| node.id)
            .ok_or_else(|| LinearError::not_found(format!("project {value}")))
    }

    pub async fn resolve_cycle_id(&self, team_id: &str, value: &str) -> Result<String> {
        if value == CURRENT {
            let page = self.cycles(team_id, true, 1, None).await?;
            return page
                .nodes
                .into_iter()
                .next()
                .map(|cycle| cycle.id)
                .ok_or_else(|| LinearError::not_found("current cycle"));
        }
        if is_likely_id(value) {
            return Ok(value.to_string());
        }
        Err(LinearError::validation("cycle must be an id or 'current'"))
    }

    pub async fn resolve_issue_id(&self, value: &str) -> Result<String> {
        if is_likely_id(value) {
            return Ok(value.to_string());
        }
        let request = GraphQLRequest::new(issues::ISSUE_ID).variable("id", value);
        let data: IssueIdData = self.execute(&request).await?;
        data.issue
            .map(|issue| issue.id)
            .ok_or_else(|| LinearError::not_found(format!("issue {value}")))
    }
}
