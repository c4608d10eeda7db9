// ABOUTME: Handlers for the issue subcommands: list, view, create, update, close, reopen, comment
// ABOUTME: Resolves flag references to ids, builds inputs, syncs relations and downloads files

use anyhow::{Context, Result};
use linear_sdk::issues::validate_comment_body;
use linear_sdk::relations::sync_relations;
use linear_sdk::resolve::{is_likely_id, split_comma};
use linear_sdk::workflow::{close_issue, reopen_issue};
use linear_sdk::{Attachment, IssueDetail, IssueFilter, LinearApi, LinearError};
use log::debug;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::io::{Read, Write};

use super::{print_issue_link, read_optional_body, relation_edits};
use crate::cli::{
    DownloadArgs, IssueCommentArgs, IssueCreateArgs, IssueListArgs, IssueUpdateArgs,
    IssueViewArgs,
};
use crate::download::{attachment_file_name, unique_path, Downloader};
use crate::output::{DownloadRow, Renderer};

#[derive(Debug, Clone, Copy)]
enum TeamScoped {
    State,
    Cycle,
}

impl TeamScoped {
    fn missing_team(self) -> &'static str {
        match self {
            TeamScoped::State => "--state requires --team to resolve state name",
            TeamScoped::Cycle => "--cycle requires --team to resolve 'current'",
        }
    }
}

/// Names need a team to resolve against; ID-shaped values pass through without one.
async fn resolve_team_scoped(
    api: &dyn LinearApi,
    team_id: Option<&str>,
    value: &str,
    kind: TeamScoped,
) -> Result<String> {
    let Some(team_id) = team_id else {
        if is_likely_id(value) {
            return Ok(value.to_string());
        }
        return Err(LinearError::validation(kind.missing_team()).into());
    };
    let id = match kind {
        TeamScoped::State => api.resolve_state_id(team_id, value).await?,
        TeamScoped::Cycle => api.resolve_cycle_id(team_id, value).await?,
    };
    Ok(id)
}

async fn resolve_labels(api: &dyn LinearApi, labels: Option<&str>) -> Result<Option<Vec<String>>> {
    let names = labels.map(split_comma).unwrap_or_default();
    if names.is_empty() {
        return Ok(None);
    }
    Ok(Some(api.resolve_label_ids(&names).await?))
}

pub async fn list<W: Write>(api: &dyn LinearApi, args: &IssueListArgs, out: &mut Renderer<W>) -> Result<()> {
    let mut filter = IssueFilter::default();

    if let Some(team) = &args.team {
        filter.team_id = Some(api.resolve_team_id(team).await?);
    }
    if let Some(assignee) = &args.assignee {
        filter.assignee_id = Some(api.resolve_user_id(assignee).await?);
    }
    if let Some(state) = &args.state {
        filter.state_id =
            Some(resolve_team_scoped(api, filter.team_id.as_deref(), state, TeamScoped::State).await?);
    }
    if let Some(label_ids) = resolve_labels(api, args.labels.as_deref()).await? {
        filter.label_ids = label_ids;
    }
    if let Some(project) = &args.project {
        filter.project_id = Some(api.resolve_project_id(project).await?);
    }
    if let Some(cycle) = &args.cycle {
        filter.cycle_id =
            Some(resolve_team_scoped(api, filter.team_id.as_deref(), cycle, TeamScoped::Cycle).await?);
    }
    filter.search = args.search.clone().filter(|search| !search.is_empty());
    if let Some(priority) = args.priority {
        filter = filter.with_priority(priority);
    }

    let page = api.issues(&filter, args.limit, args.after.as_deref()).await?;

    if out.is_json() {
        return out.json(&page);
    }
    let rows = out.issue_rows(&page.nodes);
    out.table(rows)?;
    if page.page_info.has_next_page {
        out.line(format!("\nNext page: --after {}", page.page_info.end_cursor))?;
    }
    Ok(())
}

fn upload_label(upload: &Attachment) -> String {
    [
        upload.title.as_deref().unwrap_or_default(),
        upload.file_name.as_str(),
        upload.url.as_str(),
        upload.id.as_str(),
    ]
    .into_iter()
    .find(|name| !name.is_empty())
    .unwrap_or_default()
    .to_string()
}

fn print_issue_detail<W: Write>(out: &mut Renderer<W>, issue: &IssueDetail, args: &IssueViewArgs) -> Result<()> {
    let row = out.issue_detail_row(issue);
    out.table(vec![row])?;

    if !issue.url.is_empty() {
        out.line(format!("\nURL: {}", issue.url))?;
    }
    if !issue.labels.is_empty() {
        out.line(format!("Labels: {}", issue.labels.join(", ")))?;
    }
    if !issue.description.is_empty() {
        out.line(format!("\nDescription:\n{}", issue.description))?;
    }

    if args.uploads {
        if issue.uploads.is_empty() {
            out.line("\nUploads: none")?;
        } else {
            out.line("\nUploads:")?;
            for upload in &issue.uploads {
                let name = upload_label(upload);
                if !upload.url.is_empty() && upload.url != name {
                    out.line(format!("- {} ({})", name, upload.url))?;
                } else {
                    out.line(format!("- {}", name))?;
                }
            }
        }
    }

    if !issue.created_at.is_empty() || !issue.updated_at.is_empty() {
        out.line(format!(
            "\nCreated: {}\nUpdated: {}",
            issue.created_at, issue.updated_at
        ))?;
    }

    if args.comments && !issue.comments.is_empty() {
        out.line("\nComments:")?;
        for comment in &issue.comments {
            let author = if comment.user_name.is_empty() {
                comment.user_email.as_str()
            } else {
                comment.user_name.as_str()
            };
            let body = if comment.body.is_empty() {
                comment.body_data.as_deref().unwrap_or_default()
            } else {
                comment.body.as_str()
            };
            if author.is_empty() {
                out.line(format!("- {}: {}", comment.created_at, body))?;
            } else {
                out.line(format!("- {} ({}): {}", author, comment.created_at, body))?;
            }
        }
    }
    Ok(())
}

pub async fn view<W: Write>(api: &dyn LinearApi, args: &IssueViewArgs, out: &mut Renderer<W>) -> Result<()> {
    let mut issue = api.issue(&args.issue_id).await?;

    if args.comments {
        issue.comments = api.issue_comments(&issue.id, args.comments_limit).await?;
    }
    if args.uploads {
        issue.uploads = api.issue_uploads(&issue.id, args.uploads_limit).await?;
    }

    if out.is_json() {
        return out.json(&issue);
    }
    print_issue_detail(out, &issue, args)
}

fn insert_str(input: &mut Map<String, Value>, key: &str, value: impl Into<String>) {
    input.insert(key.to_string(), Value::String(value.into()));
}

pub async fn create<W: Write>(
    api: &dyn LinearApi,
    args: &IssueCreateArgs,
    stdin: &mut dyn Read,
    out: &mut Renderer<W>,
) -> Result<()> {
    let team = args
        .team
        .as_deref()
        .filter(|team| !team.is_empty())
        .ok_or_else(|| LinearError::validation("--team is required"))?;
    let title = args
        .title
        .as_deref()
        .filter(|title| !title.trim().is_empty())
        .ok_or_else(|| LinearError::validation("--title is required"))?;

    let team_id = api.resolve_team_id(team).await?;
    let mut input = Map::new();
    insert_str(&mut input, "teamId", team_id.as_str());
    insert_str(&mut input, "title", title);

    if let Some(description) = read_optional_body(args.description.as_deref(), stdin)? {
        insert_str(&mut input, "description", description);
    }
    if let Some(assignee) = &args.assignee {
        insert_str(&mut input, "assigneeId", api.resolve_user_id(assignee).await?);
    }
    if let Some(state) = &args.state {
        insert_str(&mut input, "stateId", api.resolve_state_id(&team_id, state).await?);
    }
    if let Some(priority) = args.priority {
        input.insert("priority".to_string(), Value::from(priority));
    }
    if let Some(project) = &args.project {
        insert_str(&mut input, "projectId", api.resolve_project_id(project).await?);
    }
    if let Some(cycle) = &args.cycle {
        insert_str(&mut input, "cycleId", api.resolve_cycle_id(&team_id, cycle).await?);
    }
    if let Some(label_ids) = resolve_labels(api, args.labels.as_deref()).await? {
        input.insert("labelIds".to_string(), json!(label_ids));
    }

    let issue = api.issue_create(input).await?;

    let edits = relation_edits(args.blocks.as_deref(), args.blocked_by.as_deref(), None, None);
    let report = sync_relations(api, &issue.id, edits, false).await?;
    debug!(
        "{}: {} relation(s) created",
        issue.identifier,
        report.created.len()
    );

    print_issue_link(out, &issue)
}

pub async fn update<W: Write>(
    api: &dyn LinearApi,
    args: &IssueUpdateArgs,
    stdin: &mut dyn Read,
    out: &mut Renderer<W>,
) -> Result<()> {
    let issue_id = api.resolve_issue_id(&args.issue_id).await?;

    let mut team_id = match &args.team {
        Some(team) => Some(api.resolve_team_id(team).await?),
        None => None,
    };
    if team_id.is_none() && (args.state.is_some() || args.cycle.is_some()) {
        team_id = Some(api.issue(&issue_id).await?.team_id);
    }
    let team_id = team_id.unwrap_or_default();

    let mut input = Map::new();
    insert_str(&mut input, "id", issue_id.as_str());
    if let Some(title) = args.title.as_deref().filter(|title| !title.is_empty()) {
        insert_str(&mut input, "title", title);
    }
    if let Some(description) = read_optional_body(args.description.as_deref(), stdin)? {
        insert_str(&mut input, "description", description);
    }
    if let Some(assignee) = &args.assignee {
        insert_str(&mut input, "assigneeId", api.resolve_user_id(assignee).await?);
    }
    if let Some(state) = &args.state {
        insert_str(&mut input, "stateId", api.resolve_state_id(&team_id, state).await?);
    }
    if let Some(priority) = args.priority {
        input.insert("priority".to_string(), Value::from(priority));
    }
    if let Some(project) = &args.project {
        insert_str(&mut input, "projectId", api.resolve_project_id(project).await?);
    }
    if let Some(cycle) = &args.cycle {
        insert_str(&mut input, "cycleId", api.resolve_cycle_id(&team_id, cycle).await?);
    }
    if let Some(label_ids) = resolve_labels(api, args.labels.as_deref()).await? {
        input.insert("labelIds".to_string(), json!(label_ids));
    }

    let issue = api.issue_update(input).await?;

    let edits = relation_edits(
        args.blocks.as_deref(),
        args.blocked_by.as_deref(),
        args.remove_blocks.as_deref(),
        args.remove_blocked_by.as_deref(),
    );
    let report = sync_relations(api, &issue_id, edits, true).await?;
    debug!(
        "{}: {} relation(s) created, {} deleted",
        issue.identifier,
        report.created.len(),
        report.deleted.len()
    );

    print_issue_link(out, &issue)
}

pub async fn close<W: Write>(api: &dyn LinearApi, reference: &str, out: &mut Renderer<W>) -> Result<()> {
    let issue = close_issue(api, reference).await?;
    print_issue_link(out, &issue)
}

pub async fn reopen<W: Write>(api: &dyn LinearApi, reference: &str, out: &mut Renderer<W>) -> Result<()> {
    let issue = reopen_issue(api, reference).await?;
    print_issue_link(out, &issue)
}

pub async fn comment<W: Write>(
    api: &dyn LinearApi,
    args: &IssueCommentArgs,
    stdin: &mut dyn Read,
    out: &mut Renderer<W>,
) -> Result<()> {
    let body = read_optional_body(args.body.as_deref(), stdin)?.unwrap_or_default();
    validate_comment_body(&body)?;

    let issue_id = api.resolve_issue_id(&args.issue_id).await?;
    let comment_id = api.issue_comment(&issue_id, &body).await?;

    if out.is_json() {
        return out.json(&json!({"id": comment_id}));
    }
    out.line(format!("Comment added: {}", comment_id))
}

/// A downloaded attachment and where it was written.
#[derive(Debug, Serialize)]
pub struct SavedAttachment {
    #[serde(flatten)]
    pub attachment: Attachment,
    pub path: String,
}

async fn save_all<W: Write>(
    attachments: Vec<Attachment>,
    args: &DownloadArgs,
    downloader: &Downloader,
    out: &mut Renderer<W>,
) -> Result<()> {
    let attachments: Vec<Attachment> = attachments
        .into_iter()
        .filter(|attachment| !attachment.url.is_empty())
        .collect();
    if attachments.is_empty() {
        if out.is_json() {
            return out.json(&Vec::<SavedAttachment>::new());
        }
        return out.line("No attachments found");
    }

    std::fs::create_dir_all(&args.dir)
        .with_context(|| format!("create dir {}", args.dir.display()))?;

    let mut saved = Vec::with_capacity(attachments.len());
    for attachment in attachments {
        let path = unique_path(&args.dir.join(attachment_file_name(&attachment)), args.overwrite);
        downloader.download(&attachment.url, &path).await?;
        saved.push(SavedAttachment {
            attachment,
            path: path.display().to_string(),
        });
    }

    if out.is_json() {
        return out.json(&saved);
    }
    out.table(
        saved
            .iter()
            .map(|item| DownloadRow {
                id: item.attachment.id.clone(),
                title: item.attachment.title.clone().unwrap_or_default(),
                path: item.path.clone(),
            })
            .collect(),
    )
}

pub async fn attachments<W: Write>(
    api: &dyn LinearApi,
    args: &DownloadArgs,
    downloader: &Downloader,
    out: &mut Renderer<W>,
) -> Result<()> {
    let attachments = api.issue_attachments(&args.issue_id, args.limit).await?;
    save_all(attachments, args, downloader, out).await
}

pub async fn uploads<W: Write>(
    api: &dyn LinearApi,
    args: &DownloadArgs,
    downloader: &Downloader,
    out: &mut Renderer<W>,
) -> Result<()> {
    let uploads = api.issue_uploads(&args.issue_id, args.limit).await?;
    save_all(uploads, args, downloader, out).await
}
