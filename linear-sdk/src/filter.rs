// ABOUTME: Builds GraphQL filter payloads from resolved issue criteria
// ABOUTME: An issue filter with no criteria produces no filter argument at all

use serde_json::{Map, Value, json};

use crate::types::IssueFilter;

fn id_eq(id: &str) -> Value {
    json!({"id": {"eq": id}})
}

/// `None` when every criterion is unset.
pub fn build_issue_filter(filter: &IssueFilter) -> Option<Value> {
    if filter.is_empty() {
        return None;
    }

    let mut out = Map::new();
    if let Some(team_id) = &filter.team_id {
        out.insert("team".into(), id_eq(team_id));
    }
    if let Some(assignee_id) = &filter.assignee_id {
        out.insert("assignee".into(), id_eq(assignee_id));
    }
    if let Some(state_id) = &filter.state_id {
        out.insert("state".into(), id_eq(state_id));
    }
    if !filter.label_ids.is_empty() {
        out.insert("labels".into(), json!({"id": {"in": filter.label_ids}}));
    }
    if let Some(project_id) = &filter.project_id {
        out.insert("project".into(), id_eq(project_id));
    }
    if let Some(cycle_id) = &filter.cycle_id {
        out.insert("cycle".into(), id_eq(cycle_id));
    }
    if let Some(search) = &filter.search {
        out.insert("title".into(), json!({"contains": search}));
    }
    if let Some(priority) = filter.priority {
        out.insert("priority".into(), json!({"eq": priority}));
    }
    Some(Value::Object(out))
}

/// Team scope for `cycles`, narrowed to the active cycle when requested.
pub fn build_cycle_filter(team_id: &str, current_only: bool) -> Value {
    let mut out = Map::new();
    out.insert("team".into(), id_eq(team_id));
    if current_only {
        out.insert("isActive".into(), json!({"eq": true}));
    }
    Value::Object(out)
}
