// ABOUTME: Typed response payloads decoded from GraphQL `data` envelopes
// ABOUTME: One struct per operation plus conversions into domain records

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::schema::SchemaField;
use crate::types::{Cycle, CyclePage, IssueRelation, IssueSummary, PageInfo, Team, User, WorkflowState};

/// Linear encodes priorities and cycle numbers as floats.
fn number_as_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.map(|number| number as i64).unwrap_or_default())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Document-model fields arrive either as JSON strings or as embedded objects.
fn json_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) if text.is_empty() => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Nodes<T> {
    #[serde(default)]
    pub nodes: Vec<T>,
}

impl<T> Default for Nodes<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_cursor: String,
}

impl From<WirePageInfo> for PageInfo {
    fn from(info: WirePageInfo) -> Self {
        PageInfo {
            has_next_page: info.has_next_page,
            end_cursor: info.end_cursor,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    #[serde(default)]
    pub nodes: Vec<T>,
    #[serde(default, rename = "pageInfo")]
    pub page_info: WirePageInfo,
}

#[derive(Debug, Deserialize)]
pub struct IdOnly {
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Named {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

fn name_of(named: Option<Named>) -> String {
    named.map(|named| named.name).unwrap_or_default()
}

// workspace

#[derive(Debug, Deserialize)]
pub struct ViewerData {
    pub viewer: Option<User>,
}

#[derive(Debug, Deserialize)]
pub struct MeData {
    pub me: Option<User>,
}

#[derive(Debug, Deserialize)]
pub struct TeamsData {
    #[serde(default)]
    pub teams: Nodes<Team>,
}

#[derive(Debug, Deserialize)]
pub struct TeamData {
    pub team: Option<Team>,
}

#[derive(Debug, Deserialize)]
pub struct StatesTeam {
    #[serde(default)]
    pub states: Nodes<WorkflowState>,
}

#[derive(Debug, Deserialize)]
pub struct WorkflowStatesData {
    pub team: Option<StatesTeam>,
}

#[derive(Debug, Deserialize)]
pub struct UsersData {
    #[serde(default)]
    pub users: Nodes<IdOnly>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueLabelsData {
    #[serde(default)]
    pub issue_labels: Nodes<IdOnly>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectsData {
    #[serde(default)]
    pub projects: Nodes<IdOnly>,
}

// issues

#[derive(Debug, Deserialize)]
pub struct IssueIdData {
    pub issue: Option<IdOnly>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TeamRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireIssueDetail {
    pub id: String,
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "number_as_i64")]
    pub priority: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team: TeamRef,
    pub state: Option<Named>,
    pub assignee: Option<Named>,
    pub cycle: Option<Named>,
    pub project: Option<Named>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Nodes<Named>,
}

impl From<WireIssueDetail> for crate::types::IssueDetail {
    fn from(issue: WireIssueDetail) -> Self {
        crate::types::IssueDetail {
            id: issue.id,
            identifier: issue.identifier,
            title: issue.title,
            url: issue.url,
            description: issue.description,
            priority: issue.priority,
            state: name_of(issue.state),
            assignee: name_of(issue.assignee),
            team_id: issue.team.id,
            team_key: issue.team.key,
            cycle: name_of(issue.cycle),
            project: name_of(issue.project),
            labels: issue.labels.nodes.into_iter().map(|label| label.name).collect(),
            comments: Vec::new(),
            uploads: Vec::new(),
            created_at: issue.created_at,
            updated_at: issue.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IssueDetailData {
    pub issue: Option<WireIssueDetail>,
}

#[derive(Debug, Deserialize)]
pub struct CommentUser {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireComment {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default, deserialize_with = "json_text")]
    pub body_data: Option<String>,
    #[serde(default)]
    pub created_at: String,
    pub user: Option<CommentUser>,
}

impl From<WireComment> for crate::types::Comment {
    fn from(comment: WireComment) -> Self {
        let (user_name, user_email) = comment
            .user
            .map(|user| (user.name, user.email))
            .unwrap_or_default();
        crate::types::Comment {
            id: comment.id,
            body: comment.body,
            body_data: comment.body_data,
            created_at: comment.created_at,
            user_name,
            user_email,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentsIssue {
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Nodes<WireComment>,
}

#[derive(Debug, Deserialize)]
pub struct IssueCommentsData {
    pub issue: Option<CommentsIssue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAttachment {
    pub id: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub source: Option<Value>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct AttachmentsIssue {
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Nodes<WireAttachment>,
}

#[derive(Debug, Deserialize)]
pub struct IssueAttachmentsData {
    pub issue: Option<AttachmentsIssue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionIssue {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "json_text")]
    pub description_data: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IssueDescriptionData {
    pub issue: Option<DescriptionIssue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRelation {
    pub id: String,
    #[serde(rename = "type", default)]
    pub relation_type: String,
    pub issue: Option<IdOnly>,
    pub related_issue: Option<IdOnly>,
}

impl From<WireRelation> for IssueRelation {
    fn from(relation: WireRelation) -> Self {
        IssueRelation {
            id: relation.id,
            issue_id: relation.issue.map(|issue| issue.id).unwrap_or_default(),
            related_issue_id: relation
                .related_issue
                .map(|issue| issue.id)
                .unwrap_or_default(),
            relation_type: relation.relation_type,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationsIssue {
    pub relations: Option<Nodes<WireRelation>>,
    pub inverse_relations: Option<Nodes<WireRelation>>,
}

#[derive(Debug, Deserialize)]
pub struct IssueRelationsData {
    pub issue: Option<RelationsIssue>,
}

#[derive(Debug, Deserialize)]
pub struct WireIssueSummary {
    pub id: String,
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, deserialize_with = "number_as_i64")]
    pub priority: i64,
    pub state: Option<Named>,
    pub assignee: Option<Named>,
    pub team: Option<TeamRef>,
    pub cycle: Option<Named>,
}

impl From<WireIssueSummary> for IssueSummary {
    fn from(issue: WireIssueSummary) -> Self {
        IssueSummary {
            id: issue.id,
            identifier: issue.identifier,
            title: issue.title,
            url: issue.url,
            state: name_of(issue.state),
            assignee: name_of(issue.assignee),
            team_key: issue.team.map(|team| team.key).unwrap_or_default(),
            cycle: name_of(issue.cycle),
            priority: issue.priority,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IssuesData {
    pub issues: Connection<WireIssueSummary>,
}

#[derive(Debug, Deserialize)]
pub struct IssuePayload {
    pub issue: Option<WireIssueSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCreateData {
    pub issue_create: Option<IssuePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueUpdateData {
    pub issue_update: Option<IssuePayload>,
}

#[derive(Debug, Deserialize)]
pub struct CommentPayload {
    pub comment: Option<IdOnly>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentCreateData {
    pub comment_create: Option<CommentPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationPayload {
    pub issue_relation: Option<WireRelation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationCreateData {
    pub issue_relation_create: Option<RelationPayload>,
}

#[derive(Debug, Deserialize)]
pub struct SuccessPayload {
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationDeleteData {
    pub issue_relation_delete: Option<SuccessPayload>,
}

// cycles

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCycle {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "number_as_i64")]
    pub number: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub starts_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ends_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_active: bool,
}

impl From<WireCycle> for Cycle {
    fn from(cycle: WireCycle) -> Self {
        Cycle {
            id: cycle.id,
            name: cycle.name,
            number: cycle.number,
            starts_at: cycle.starts_at,
            ends_at: cycle.ends_at,
            is_active: cycle.is_active,
        }
    }
}

impl From<Connection<WireCycle>> for CyclePage {
    fn from(connection: Connection<WireCycle>) -> Self {
        CyclePage {
            nodes: connection.nodes.into_iter().map(Cycle::from).collect(),
            page_info: connection.page_info.into(),
            truncated: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CyclesData {
    pub cycles: Connection<WireCycle>,
}

#[derive(Debug, Deserialize)]
pub struct CyclesTeam {
    pub cycles: Connection<WireCycle>,
}

#[derive(Debug, Deserialize)]
pub struct TeamCyclesData {
    pub team: Option<CyclesTeam>,
}

#[derive(Debug, Deserialize)]
pub struct CycleData {
    pub cycle: Option<WireCycle>,
}

// introspection

#[derive(Debug, Deserialize)]
pub struct TypeFields {
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Vec<SchemaField>,
}

#[derive(Debug, Deserialize)]
pub struct SchemaData {
    #[serde(rename = "__type")]
    pub query: Option<TypeFields>,
    pub issue: Option<TypeFields>,
    pub comment: Option<TypeFields>,
    pub user: Option<TypeFields>,
}

#[derive(Debug, Deserialize)]
pub struct TypeData {
    #[serde(rename = "__type")]
    pub type_info: Option<TypeFields>,
}
