// ABOUTME: In-memory LinearApi implementation for tests of code built on the SDK
// ABOUTME: Seeded workspace, call log and one-shot scripted failures per operation

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::api::LinearApi;
use crate::attachments::{extract_from_comments, extract_from_description, merge_uploads};
use crate::constants::references::{CURRENT, ME};
use crate::error::LinearError;
use crate::issues::{split_update_input, validate_comment_body};
use crate::resolve::{eq_fold, is_likely_id};
use crate::types::{
    Attachment, Comment, Cycle, CyclePage, IssueDetail, IssueFilter, IssuePage, IssueRelation,
    IssueRelationSet, IssueSummary, PageInfo, Team, User, WorkflowState,
};
use crate::Result;

pub const SEED_TEAM_ID: &str = "0d6a3c52-5b1e-4f8a-9e7c-2a4b6c8d0e1f";
pub const SEED_USER_ID: &str = "1e7b4d63-6c2f-4a9b-8f8d-3b5c7d9e1f20";
pub const SEED_ISSUE_ID: &str = "2f8c5e74-7d30-4bac-9a9e-4c6d8eaf2031";
pub const SEED_OTHER_ISSUE_ID: &str = "3a9d6f85-8e41-4cbd-8baf-5d7e9fb03142";
pub const SEED_THIRD_ISSUE_ID: &str = "4bae7a96-9f52-4dce-9cb0-6e8fa0c14253";
pub const SEED_CYCLE_ID: &str = "5cbf8ba7-a063-4edf-8dc1-7f9ab1d25364";

#[derive(Debug, Clone)]
struct FakeIssue {
    id: String,
    identifier: String,
    title: String,
    description: String,
    priority: i64,
    team_id: String,
    state_id: String,
    assignee_id: Option<String>,
    label_ids: Vec<String>,
    project_id: Option<String>,
    cycle_id: Option<String>,
    created_at: String,
    updated_at: String,
}

#[derive(Debug, Clone)]
struct Named {
    id: String,
    name: String,
}

#[derive(Default)]
struct FakeState {
    viewer: Option<User>,
    users: Vec<User>,
    teams: Vec<Team>,
    states: HashMap<String, Vec<WorkflowState>>,
    labels: Vec<Named>,
    projects: Vec<Named>,
    issues: Vec<FakeIssue>,
    comments: HashMap<String, Vec<Comment>>,
    attachments: HashMap<String, Vec<Attachment>>,
    relations: Vec<IssueRelation>,
    cycles: HashMap<String, Vec<Cycle>>,
    calls: Vec<String>,
    failures: HashMap<String, LinearError>,
    last_issue_filter: Option<IssueFilter>,
    next_id: u64,
}

/// `LinearApi` backed by in-memory state.
#[derive(Default)]
pub struct FakeLinearApi {
    state: Mutex<FakeState>,
}

fn fake_id(sequence: u64) -> String {
    format!("00000000-0000-4000-8000-{sequence:012}")
}

fn string_field(input: &Map<String, Value>, key: &str) -> Option<String> {
    input
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn string_list(input: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    input.get(key).and_then(Value::as_array).map(|values| {
        values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}

fn page_window<T: Clone>(items: &[T], limit: i64, after: Option<&str>, key: impl Fn(&T) -> &str) -> (Vec<T>, PageInfo) {
    let start = after
        .filter(|cursor| !cursor.is_empty())
        .and_then(|cursor| items.iter().position(|item| key(item) == cursor))
        .map(|index| index + 1)
        .unwrap_or(0);
    let rest = items.get(start..).unwrap_or_default();
    let take = if limit > 0 { limit as usize } else { rest.len() };
    let nodes: Vec<T> = rest.iter().take(take).cloned().collect();
    let page_info = PageInfo {
        has_next_page: rest.len() > nodes.len(),
        end_cursor: nodes.last().map(|node| key(node).to_string()).unwrap_or_default(),
    };
    (nodes, page_info)
}

impl FakeState {
    fn next_sequence(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn find_issue(&self, reference: &str) -> Result<&FakeIssue> {
        self.issues
            .iter()
            .find(|issue| issue.id == reference || issue.identifier == reference)
            .ok_or_else(|| LinearError::not_found(format!("issue {reference}")))
    }

    fn state_of(&self, issue: &FakeIssue) -> Option<&WorkflowState> {
        self.states
            .get(&issue.team_id)
            .and_then(|states| states.iter().find(|state| state.id == issue.state_id))
    }

    fn name_of(items: &[Named], id: Option<&String>) -> String {
        id.and_then(|id| items.iter().find(|item| &item.id == id))
            .map(|item| item.name.clone())
            .unwrap_or_default()
    }

    fn team_key(&self, team_id: &str) -> String {
        self.teams
            .iter()
            .find(|team| team.id == team_id)
            .map(|team| team.key.clone())
            .unwrap_or_default()
    }

    fn assignee_name(&self, issue: &FakeIssue) -> String {
        issue
            .assignee_id
            .as_ref()
            .and_then(|id| self.users.iter().find(|user| &user.id == id))
            .map(|user| user.name.clone())
            .unwrap_or_default()
    }

    fn cycle_name(&self, issue: &FakeIssue) -> String {
        issue
            .cycle_id
            .as_ref()
            .and_then(|id| self.cycles.values().flatten().find(|cycle| &cycle.id == id))
            .map(|cycle| cycle.name.clone())
            .unwrap_or_default()
    }

    fn summary(&self, issue: &FakeIssue) -> IssueSummary {
        IssueSummary {
            id: issue.id.clone(),
            identifier: issue.identifier.clone(),
            title: issue.title.clone(),
            url: format!("https://linear.app/fake/issue/{}", issue.identifier),
            state: self.state_of(issue).map(|state| state.name.clone()).unwrap_or_default(),
            assignee: self.assignee_name(issue),
            team_key: self.team_key(&issue.team_id),
            cycle: self.cycle_name(issue),
            priority: issue.priority,
        }
    }

    fn detail(&self, issue: &FakeIssue) -> IssueDetail {
        let summary = self.summary(issue);
        IssueDetail {
            id: summary.id,
            identifier: summary.identifier,
            title: summary.title,
            url: summary.url,
            description: issue.description.clone(),
            priority: issue.priority,
            state: summary.state,
            assignee: summary.assignee,
            team_id: issue.team_id.clone(),
            team_key: summary.team_key,
            cycle: summary.cycle,
            project: Self::name_of(&self.projects, issue.project_id.as_ref()),
            labels: issue
                .label_ids
                .iter()
                .map(|id| Self::name_of(&self.labels, Some(id)))
                .collect(),
            comments: Vec::new(),
            uploads: Vec::new(),
            created_at: issue.created_at.clone(),
            updated_at: issue.updated_at.clone(),
        }
    }

    fn matches(issue: &FakeIssue, filter: &IssueFilter) -> bool {
        let eq = |wanted: &Option<String>, actual: Option<&String>| {
            wanted.as_ref().is_none_or(|wanted| actual == Some(wanted))
        };
        eq(&filter.team_id, Some(&issue.team_id))
            && eq(&filter.assignee_id, issue.assignee_id.as_ref())
            && eq(&filter.state_id, Some(&issue.state_id))
            && eq(&filter.project_id, issue.project_id.as_ref())
            && eq(&filter.cycle_id, issue.cycle_id.as_ref())
            && (filter.label_ids.is_empty()
                || filter.label_ids.iter().any(|id| issue.label_ids.contains(id)))
            && filter.search.as_ref().is_none_or(|search| {
                issue.title.to_lowercase().contains(&search.to_lowercase())
            })
            && filter.priority.is_none_or(|priority| issue.priority == priority)
    }

    fn apply_fields(issue: &mut FakeIssue, input: &Map<String, Value>) {
        if let Some(title) = string_field(input, "title") {
            issue.title = title;
        }
        if let Some(description) = input.get("description").and_then(Value::as_str) {
            issue.description = description.to_string();
        }
        if let Some(priority) = input.get("priority").and_then(Value::as_i64) {
            issue.priority = priority;
        }
        if let Some(team_id) = string_field(input, "teamId") {
            issue.team_id = team_id;
        }
        if let Some(state_id) = string_field(input, "stateId") {
            issue.state_id = state_id;
        }
        if let Some(assignee_id) = string_field(input, "assigneeId") {
            issue.assignee_id = Some(assignee_id);
        }
        if let Some(label_ids) = string_list(input, "labelIds") {
            issue.label_ids = label_ids;
        }
        if let Some(project_id) = string_field(input, "projectId") {
            issue.project_id = Some(project_id);
        }
        if let Some(cycle_id) = string_field(input, "cycleId") {
            issue.cycle_id = Some(cycle_id);
        }
    }
}

impl FakeLinearApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// One team `ENG` with three issues, workflow states, labels, a project and two cycles.
    pub fn seeded() -> Self {
        let viewer = User {
            id: SEED_USER_ID.into(),
            name: "Ada Lovelace".into(),
            email: "ada@acme.io".into(),
        };
        let workflow_state = |id: &str, name: &str, state_type: &str| WorkflowState {
            id: id.into(),
            name: name.into(),
            state_type: state_type.into(),
        };
        let cycle = |id: &str, number: i64, is_active: bool| Cycle {
            id: id.into(),
            name: format!("Cycle {number}"),
            number,
            starts_at: format!("2024-01-{:02}T00:00:00.000Z", number * 7),
            ends_at: format!("2024-01-{:02}T00:00:00.000Z", number * 7 + 6),
            is_active,
        };
        let issue = |id: &str, number: u32, title: &str, state_id: &str, priority: i64| FakeIssue {
            id: id.into(),
            identifier: format!("ENG-{number}"),
            title: title.into(),
            description: String::new(),
            priority,
            team_id: SEED_TEAM_ID.into(),
            state_id: state_id.into(),
            assignee_id: None,
            label_ids: Vec::new(),
            project_id: None,
            cycle_id: None,
            created_at: "2024-01-01T00:00:00.000Z".into(),
            updated_at: "2024-01-01T00:00:00.000Z".into(),
        };

        let mut first = issue(SEED_ISSUE_ID, 1, "Fix login redirect", "state-todo", 2);
        first.description = "Repro in [trace.log](https://uploads.linear.app/org/1/trace.log)".into();
        first.assignee_id = Some(SEED_USER_ID.into());
        first.label_ids = vec!["label-bug".into()];
        first.project_id = Some("project-auth".into());
        first.cycle_id = Some(SEED_CYCLE_ID.into());

        let mut comments = HashMap::new();
        comments.insert(
            SEED_ISSUE_ID.to_string(),
            vec![Comment {
                id: "comment-1".into(),
                body: "Query plan: [file.sql](https://uploads.linear.app/abc/def/ghi)".into(),
                body_data: None,
                created_at: "2024-01-02T00:00:00.000Z".into(),
                user_name: viewer.name.clone(),
                user_email: viewer.email.clone(),
            }],
        );
        let mut attachments = HashMap::new();
        attachments.insert(
            SEED_OTHER_ISSUE_ID.to_string(),
            vec![Attachment {
                id: "attachment-1".into(),
                title: Some("PR #42".into()),
                url: "https://github.com/acme/app/pull/42".into(),
                file_name: "42".into(),
                content_type: None,
                created_at: "2024-01-03T00:00:00.000Z".into(),
                comment_id: None,
            }],
        );

        let state = FakeState {
            viewer: Some(viewer.clone()),
            users: vec![
                viewer,
                User {
                    id: "6dc09cb8-b174-4fe0-9ed2-80abc2e36475".into(),
                    name: "Grace Hopper".into(),
                    email: "grace@acme.io".into(),
                },
            ],
            teams: vec![Team {
                id: SEED_TEAM_ID.into(),
                key: "ENG".into(),
                name: "Engineering".into(),
            }],
            states: HashMap::from([(
                SEED_TEAM_ID.to_string(),
                vec![
                    workflow_state("state-todo", "Todo", "unstarted"),
                    workflow_state("state-doing", "In Progress", "started"),
                    workflow_state("state-done", "Done", "completed"),
                ],
            )]),
            labels: vec![
                Named { id: "label-bug".into(), name: "bug".into() },
                Named { id: "label-feature".into(), name: "feature".into() },
            ],
            projects: vec![Named { id: "project-auth".into(), name: "Auth".into() }],
            issues: vec![
                first,
                issue(SEED_OTHER_ISSUE_ID, 2, "Add SSO", "state-doing", 1),
                issue(SEED_THIRD_ISSUE_ID, 3, "Write docs", "state-done", 0),
            ],
            comments,
            attachments,
            cycles: HashMap::from([(
                SEED_TEAM_ID.to_string(),
                vec![cycle("cycle-2", 2, false), cycle(SEED_CYCLE_ID, 3, true)],
            )]),
            next_id: 100,
            ..FakeState::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    /// Operation names in call order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// The next call to `operation` fails with `error`.
    pub fn fail_next(&self, operation: &str, error: LinearError) {
        self.state.lock().failures.insert(operation.to_string(), error);
    }

    pub fn last_issue_filter(&self) -> Option<IssueFilter> {
        self.state.lock().last_issue_filter.clone()
    }

    pub fn set_viewer(&self, viewer: Option<User>) {
        self.state.lock().viewer = viewer;
    }

    pub fn set_states(&self, team_id: &str, states: Vec<WorkflowState>) {
        self.state.lock().states.insert(team_id.to_string(), states);
    }

    pub fn add_comment(&self, issue_id: &str, comment: Comment) {
        self.state
            .lock()
            .comments
            .entry(issue_id.to_string())
            .or_default()
            .push(comment);
    }

    pub fn add_attachment(&self, issue_id: &str, attachment: Attachment) {
        self.state
            .lock()
            .attachments
            .entry(issue_id.to_string())
            .or_default()
            .push(attachment);
    }

    fn enter(&self, operation: &str) -> Result<parking_lot::MutexGuard<'_, FakeState>> {
        let mut state = self.state.lock();
        state.calls.push(operation.to_string());
        match state.failures.remove(operation) {
            Some(error) => Err(error),
            None => Ok(state),
        }
    }
}

#[async_trait]
impl LinearApi for FakeLinearApi {
    async fn me(&self) -> Result<User> {
        self.enter("me")?
            .viewer
            .clone()
            .ok_or_else(|| LinearError::not_found("viewer"))
    }

    async fn teams(&self) -> Result<Vec<Team>> {
        Ok(self.enter("teams")?.teams.clone())
    }

    async fn workflow_states(&self, team_id: &str) -> Result<Vec<WorkflowState>> {
        self.enter("workflow_states")?
            .states
            .get(team_id)
            .cloned()
            .ok_or_else(|| LinearError::not_found(format!("team {team_id}")))
    }

    async fn resolve_team_id(&self, key_or_id: &str) -> Result<String> {
        self.enter("resolve_team_id")?
            .teams
            .iter()
            .find(|team| team.id == key_or_id || team.key == key_or_id)
            .map(|team| team.id.clone())
            .ok_or_else(|| LinearError::not_found(format!("team {key_or_id}")))
    }

    async fn resolve_user_id(&self, value: &str) -> Result<String> {
        let state = self.enter("resolve_user_id")?;
        if value == ME {
            return state
                .viewer
                .as_ref()
                .map(|viewer| viewer.id.clone())
                .ok_or_else(|| LinearError::not_found("viewer"));
        }
        if is_likely_id(value) {
            return Ok(value.to_string());
        }
        if value.contains('@') {
            return state
                .users
                .iter()
                .find(|user| user.email == value)
                .map(|user| user.id.clone())
                .ok_or_else(|| LinearError::not_found(format!("user {value}")));
        }
        Err(LinearError::validation(
            "assignee must be 'me', an id, or an email",
        ))
    }

    async fn resolve_state_id(&self, team_id: &str, value: &str) -> Result<String> {
        let state = self.enter("resolve_state_id")?;
        if is_likely_id(value) {
            return Ok(value.to_string());
        }
        state
            .states
            .get(team_id)
            .ok_or_else(|| LinearError::not_found(format!("team {team_id}")))?
            .iter()
            .find(|workflow_state| eq_fold(&workflow_state.name, value))
            .map(|workflow_state| workflow_state.id.clone())
            .ok_or_else(|| LinearError::not_found(format!("workflow state {value}")))
    }

    async fn resolve_label_ids(&self, labels: &[String]) -> Result<Vec<String>> {
        let state = self.enter("resolve_label_ids")?;
        labels
            .iter()
            .filter(|label| !label.is_empty())
            .map(|label| {
                if is_likely_id(label) {
                    return Ok(label.clone());
                }
                state
                    .labels
                    .iter()
                    .find(|known| &known.name == label)
                    .map(|known| known.id.clone())
                    .ok_or_else(|| LinearError::not_found(format!("label {label}")))
            })
            .collect()
    }

    async fn resolve_project_id(&self, value: &str) -> Result<String> {
        let state = self.enter("resolve_project_id")?;
        if is_likely_id(value) {
            return Ok(value.to_string());
        }
        state
            .projects
            .iter()
            .find(|project| project.name == value)
            .map(|project| project.id.clone())
            .ok_or_else(|| LinearError::not_found(format!("project {value}")))
    }

    async fn resolve_cycle_id(&self, team_id: &str, value: &str) -> Result<String> {
        let state = self.enter("resolve_cycle_id")?;
        if value == CURRENT {
            return state
                .cycles
                .get(team_id)
                .and_then(|cycles| cycles.iter().find(|cycle| cycle.is_active))
                .map(|cycle| cycle.id.clone())
                .ok_or_else(|| LinearError::not_found("current cycle"));
        }
        if is_likely_id(value) {
            return Ok(value.to_string());
        }
        Err(LinearError::validation("cycle must be an id or 'current'"))
    }

    async fn resolve_issue_id(&self, value: &str) -> Result<String> {
        let state = self.enter("resolve_issue_id")?;
        if is_likely_id(value) {
            return Ok(value.to_string());
        }
        Ok(state.find_issue(value)?.id.clone())
    }

    async fn issue(&self, reference: &str) -> Result<IssueDetail> {
        let state = self.enter("issue")?;
        let issue = state.find_issue(reference)?;
        Ok(state.detail(issue))
    }

    async fn issue_comments(&self, issue_id: &str, limit: i64) -> Result<Vec<Comment>> {
        let state = self.enter("issue_comments")?;
        let issue = state.find_issue(issue_id)?;
        let comments = state.comments.get(&issue.id).cloned().unwrap_or_default();
        let (nodes, _) = page_window(&comments, limit, None, |comment| &comment.id);
        Ok(nodes)
    }

    async fn issue_attachments(&self, issue_id: &str, limit: i64) -> Result<Vec<Attachment>> {
        let state = self.enter("issue_attachments")?;
        let issue = state.find_issue(issue_id)?;
        let structured = state.attachments.get(&issue.id).cloned().unwrap_or_default();
        let (nodes, _) = page_window(&structured, limit, None, |attachment| &attachment.id);
        if !nodes.is_empty() {
            return Ok(nodes);
        }
        let comments = state.comments.get(&issue.id).cloned().unwrap_or_default();
        Ok(extract_from_comments(&comments))
    }

    async fn issue_uploads(&self, issue_id: &str, _limit: i64) -> Result<Vec<Attachment>> {
        let state = self.enter("issue_uploads")?;
        let issue = state.find_issue(issue_id)?;
        let comments = state.comments.get(&issue.id).cloned().unwrap_or_default();
        Ok(merge_uploads(
            extract_from_description(&issue.description, None),
            extract_from_comments(&comments),
        ))
    }

    async fn issue_relations(&self, issue_id: &str, _limit: i64) -> Result<IssueRelationSet> {
        let state = self.enter("issue_relations")?;
        let id = state.find_issue(issue_id)?.id.clone();
        Ok(IssueRelationSet {
            relations: state
                .relations
                .iter()
                .filter(|rel| rel.issue_id == id)
                .cloned()
                .collect(),
            inverse_relations: state
                .relations
                .iter()
                .filter(|rel| rel.related_issue_id == id)
                .cloned()
                .collect(),
        })
    }

    async fn issues(&self, filter: &IssueFilter, limit: i64, after: Option<&str>) -> Result<IssuePage> {
        let mut state = self.enter("issues")?;
        state.last_issue_filter = Some(filter.clone());
        let matching: Vec<FakeIssue> = state
            .issues
            .iter()
            .filter(|issue| FakeState::matches(issue, filter))
            .cloned()
            .collect();
        let (nodes, page_info) = page_window(&matching, limit, after, |issue| &issue.id);
        Ok(IssuePage {
            nodes: nodes.iter().map(|issue| state.summary(issue)).collect(),
            page_info,
        })
    }

    async fn issue_create(&self, input: Map<String, Value>) -> Result<IssueSummary> {
        let mut state = self.enter("issue_create")?;
        let team_id = string_field(&input, "teamId")
            .ok_or_else(|| LinearError::validation("teamId is required"))?;
        if string_field(&input, "title").is_none() {
            return Err(LinearError::validation("title is required"));
        }
        let team_key = state.team_key(&team_id);
        if team_key.is_empty() {
            return Err(LinearError::not_found(format!("team {team_id}")));
        }
        let default_state = state
            .states
            .get(&team_id)
            .and_then(|states| states.iter().find(|s| eq_fold(&s.state_type, "unstarted")))
            .map(|s| s.id.clone())
            .unwrap_or_default();

        let sequence = state.next_sequence();
        let now = Utc::now().to_rfc3339();
        let mut issue = FakeIssue {
            id: fake_id(sequence),
            identifier: format!("{team_key}-{sequence}"),
            title: String::new(),
            description: String::new(),
            priority: 0,
            team_id,
            state_id: default_state,
            assignee_id: None,
            label_ids: Vec::new(),
            project_id: None,
            cycle_id: None,
            created_at: now.clone(),
            updated_at: now,
        };
        FakeState::apply_fields(&mut issue, &input);
        let summary = state.summary(&issue);
        state.issues.push(issue);
        Ok(summary)
    }

    async fn issue_update(&self, input: Map<String, Value>) -> Result<IssueSummary> {
        let mut state = self.enter("issue_update")?;
        let (id, input) = split_update_input(input)?;
        let index = state
            .issues
            .iter()
            .position(|issue| issue.id == id)
            .ok_or_else(|| LinearError::not_found(format!("issue {id}")))?;
        let updated = {
            let issue = &mut state.issues[index];
            FakeState::apply_fields(issue, &input);
            issue.updated_at = Utc::now().to_rfc3339();
            issue.clone()
        };
        Ok(state.summary(&updated))
    }

    async fn issue_comment(&self, issue_id: &str, body: &str) -> Result<String> {
        let mut state = self.enter("issue_comment")?;
        validate_comment_body(body)?;
        let issue_id = state.find_issue(issue_id)?.id.clone();
        let id = format!("comment-{}", state.next_sequence());
        let (user_name, user_email) = state
            .viewer
            .as_ref()
            .map(|viewer| (viewer.name.clone(), viewer.email.clone()))
            .unwrap_or_default();
        state.comments.entry(issue_id).or_default().push(Comment {
            id: id.clone(),
            body: body.to_string(),
            body_data: None,
            created_at: Utc::now().to_rfc3339(),
            user_name,
            user_email,
        });
        Ok(id)
    }

    async fn issue_relation_create(
        &self,
        issue_id: &str,
        related_issue_id: &str,
        relation_type: &str,
    ) -> Result<IssueRelation> {
        let mut state = self.enter("issue_relation_create")?;
        let relation = IssueRelation {
            id: format!("relation-{}", state.next_sequence()),
            issue_id: issue_id.to_string(),
            related_issue_id: related_issue_id.to_string(),
            relation_type: relation_type.to_string(),
        };
        state.relations.push(relation.clone());
        Ok(relation)
    }

    async fn issue_relation_delete(&self, relation_id: &str) -> Result<()> {
        let mut state = self.enter("issue_relation_delete")?;
        let before = state.relations.len();
        state.relations.retain(|rel| rel.id != relation_id);
        if state.relations.len() == before {
            return Err(LinearError::not_found(format!("relation {relation_id}")));
        }
        Ok(())
    }

    async fn cycles(
        &self,
        team_id: &str,
        current_only: bool,
        limit: i64,
        after: Option<&str>,
    ) -> Result<CyclePage> {
        let state = self.enter("cycles")?;
        let cycles: Vec<Cycle> = state
            .cycles
            .get(team_id)
            .ok_or_else(|| LinearError::not_found(format!("team {team_id}")))?
            .iter()
            .filter(|cycle| !current_only || cycle.is_active)
            .cloned()
            .collect();
        let (nodes, page_info) = page_window(&cycles, limit, after, |cycle| &cycle.id);
        Ok(CyclePage {
            nodes,
            page_info,
            truncated: false,
        })
    }

    async fn cycle(&self, id: &str) -> Result<Cycle> {
        self.enter("cycle")?
            .cycles
            .values()
            .flatten()
            .find(|cycle| cycle.id == id)
            .cloned()
            .ok_or_else(|| LinearError::not_found(format!("cycle {id}")))
    }
}
