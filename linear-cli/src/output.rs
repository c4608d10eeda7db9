// ABOUTME: This module renders command results for the Linear CLI
// ABOUTME: Pretty JSON or psql-style tables with optional color, written to any writer

use anyhow::Result;
use linear_sdk::{Cycle, IssueDetail, IssueSummary, Team, User};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::fmt::Display;
use std::io::Write;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::constants::ui::{TITLE_MAX_CHARS, UNASSIGNED};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Table,
    Json,
}

/// Result sink for command handlers.
pub struct Renderer<W: Write> {
    format: Format,
    use_color: bool,
    writer: W,
}

impl<W: Write> Renderer<W> {
    pub fn new(format: Format, use_color: bool, writer: W) -> Self {
        Self {
            format,
            use_color,
            writer,
        }
    }

    pub fn is_json(&self) -> bool {
        self.format == Format::Json
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Two-space indented JSON followed by a newline.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, value)?;
        writeln!(self.writer)?;
        Ok(())
    }

    pub fn table<R: Tabled>(&mut self, rows: Vec<R>) -> Result<()> {
        let mut table = Table::new(rows);
        table.with(Style::psql());
        writeln!(self.writer, "{}", table)?;
        Ok(())
    }

    pub fn line(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.writer, "{}", text)?;
        Ok(())
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn assignee(&self, name: &str) -> String {
        if !name.is_empty() {
            return name.to_string();
        }
        if self.use_color {
            UNASSIGNED.dimmed().to_string()
        } else {
            UNASSIGNED.to_string()
        }
    }
}

fn truncate_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        title.to_string()
    } else {
        let kept: String = title.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[derive(Tabled)]
pub struct IssueRow {
    #[tabled(rename = "ID")]
    pub identifier: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "State")]
    pub state: String,
    #[tabled(rename = "Assignee")]
    pub assignee: String,
    #[tabled(rename = "Team")]
    pub team: String,
    #[tabled(rename = "Cycle")]
    pub cycle: String,
}

#[derive(Tabled)]
pub struct IssueDetailRow {
    #[tabled(rename = "ID")]
    pub identifier: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "State")]
    pub state: String,
    #[tabled(rename = "Assignee")]
    pub assignee: String,
    #[tabled(rename = "Team")]
    pub team: String,
    #[tabled(rename = "Cycle")]
    pub cycle: String,
    #[tabled(rename = "Project")]
    pub project: String,
    #[tabled(rename = "Priority")]
    pub priority: String,
}

/// Identifier, title and URL of a created or changed issue.
#[derive(Tabled)]
pub struct IssueLinkRow {
    #[tabled(rename = "ID")]
    pub identifier: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "URL")]
    pub url: String,
}

#[derive(Tabled)]
pub struct TeamRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Name")]
    pub name: String,
}

#[derive(Tabled)]
pub struct UserRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Email")]
    pub email: String,
}

#[derive(Tabled)]
pub struct CycleRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Number")]
    pub number: String,
    #[tabled(rename = "Starts")]
    pub starts_at: String,
    #[tabled(rename = "Ends")]
    pub ends_at: String,
    #[tabled(rename = "Active")]
    pub active: String,
}

#[derive(Tabled)]
pub struct DownloadRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Path")]
    pub path: String,
}

impl<W: Write> Renderer<W> {
    pub fn issue_rows(&self, issues: &[IssueSummary]) -> Vec<IssueRow> {
        issues
            .iter()
            .map(|issue| IssueRow {
                identifier: issue.identifier.clone(),
                title: truncate_title(&issue.title, TITLE_MAX_CHARS),
                state: issue.state.clone(),
                assignee: self.assignee(&issue.assignee),
                team: issue.team_key.clone(),
                cycle: issue.cycle.clone(),
            })
            .collect()
    }

    pub fn issue_detail_row(&self, issue: &IssueDetail) -> IssueDetailRow {
        IssueDetailRow {
            identifier: issue.identifier.clone(),
            title: issue.title.clone(),
            state: issue.state.clone(),
            assignee: self.assignee(&issue.assignee),
            team: issue.team_key.clone(),
            cycle: issue.cycle.clone(),
            project: issue.project.clone(),
            priority: issue.priority.to_string(),
        }
    }
}

impl From<&IssueSummary> for IssueLinkRow {
    fn from(issue: &IssueSummary) -> Self {
        Self {
            identifier: issue.identifier.clone(),
            title: issue.title.clone(),
            url: issue.url.clone(),
        }
    }
}

impl From<&Team> for TeamRow {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id.clone(),
            key: team.key.clone(),
            name: team.name.clone(),
        }
    }
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

impl From<&Cycle> for CycleRow {
    fn from(cycle: &Cycle) -> Self {
        Self {
            id: cycle.id.clone(),
            name: cycle.name.clone(),
            number: cycle.number.to_string(),
            starts_at: cycle.starts_at.clone(),
            ends_at: cycle.ends_at.clone(),
            active: cycle.is_active.to_string(),
        }
    }
}
