// ABOUTME: Domain records returned by Linear operations
// ABOUTME: Request-scoped values with stable snake_case JSON for rendering

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub state_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub id: String,
    pub identifier: String,
    pub title: String,
    pub url: String,
    pub state: String,
    pub assignee: String,
    pub team_key: String,
    pub cycle: String,
    pub priority: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDetail {
    pub id: String,
    pub identifier: String,
    pub title: String,
    pub url: String,
    pub description: String,
    pub priority: i64,
    pub state: String,
    pub assignee: String,
    pub team_id: String,
    pub team_key: String,
    pub cycle: String,
    pub project: String,
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uploads: Vec<Attachment>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_data: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Structured attachment id, or the URL itself when recovered from text
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub url: String,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRelation {
    pub id: String,
    pub issue_id: String,
    pub related_issue_id: String,
    #[serde(rename = "type")]
    pub relation_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRelationSet {
    /// Outgoing: this issue -> related issue
    pub relations: Vec<IssueRelation>,
    /// Incoming: other issue -> this issue
    pub inverse_relations: Vec<IssueRelation>,
}

/// Criteria for `issues`. Unset criteria are left out of the query filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    pub team_id: Option<String>,
    pub assignee_id: Option<String>,
    pub state_id: Option<String>,
    pub label_ids: Vec<String>,
    pub project_id: Option<String>,
    pub cycle_id: Option<String>,
    pub search: Option<String>,
    pub priority: Option<i64>,
}

impl IssueFilter {
    /// Negative priorities mean "no priority criterion".
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = (priority >= 0).then_some(priority);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.team_id.is_none()
            && self.assignee_id.is_none()
            && self.state_id.is_none()
            && self.label_ids.is_empty()
            && self.project_id.is_none()
            && self.cycle_id.is_none()
            && self.search.is_none()
            && self.priority.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuePage {
    pub nodes: Vec<IssueSummary>,
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    pub id: String,
    pub name: String,
    pub number: i64,
    pub starts_at: String,
    pub ends_at: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclePage {
    pub nodes: Vec<Cycle>,
    pub page_info: PageInfo,
    /// Client-side filtering dropped nodes and more pages exist
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_filter_priority_mapping() {
        assert_eq!(IssueFilter::default().with_priority(-1).priority, None);
        assert_eq!(IssueFilter::default().with_priority(0).priority, Some(0));
        assert_eq!(IssueFilter::default().with_priority(4).priority, Some(4));
    }

    #[test]
    fn test_issue_filter_emptiness() {
        assert!(IssueFilter::default().is_empty());
        assert!(IssueFilter::default().with_priority(-5).is_empty());
        assert!(!IssueFilter::default().with_priority(0).is_empty());

        let filter = IssueFilter {
            label_ids: vec!["label".into()],
            ..Default::default()
        };
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_record_json_shape() {
        let state = WorkflowState {
            id: "s1".into(),
            name: "Done".into(),
            state_type: "completed".into(),
        };
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["type"], "completed");

        let page = CyclePage::default();
        let value = serde_json::to_value(&page).unwrap();
        assert!(value.get("truncated").is_none());
        assert_eq!(value["page_info"]["has_next_page"], false);
    }
}
