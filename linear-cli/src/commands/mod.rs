// ABOUTME: Command handlers for every subcommand, written against the LinearApi trait
// ABOUTME: Shared helpers for stdin bodies, relation flags and issue link output

pub mod auth;
pub mod cycle;
pub mod issue;
pub mod workspace;

use anyhow::{Context, Result};
use linear_sdk::resolve::split_comma;
use linear_sdk::{IssueSummary, RelationEdits};
use std::io::{Read, Write};

use crate::output::{IssueLinkRow, Renderer};

/// `None` when unset or empty, stdin for `-`, the flag value otherwise.
pub fn read_optional_body(value: Option<&str>, input: &mut dyn Read) -> Result<Option<String>> {
    let body = match value {
        None | Some("") => return Ok(None),
        Some("-") => {
            let mut body = String::new();
            input
                .read_to_string(&mut body)
                .context("read stdin")?;
            body
        }
        Some(value) => value.to_string(),
    };
    Ok(Some(body).filter(|body| !body.is_empty()))
}

fn comma_list(value: Option<&str>) -> Vec<String> {
    value.map(split_comma).unwrap_or_default()
}

pub fn relation_edits(
    blocks: Option<&str>,
    blocked_by: Option<&str>,
    remove_blocks: Option<&str>,
    remove_blocked_by: Option<&str>,
) -> RelationEdits {
    RelationEdits {
        add_blocks: comma_list(blocks),
        add_blocked_by: comma_list(blocked_by),
        remove_blocks: comma_list(remove_blocks),
        remove_blocked_by: comma_list(remove_blocked_by),
    }
}

pub(crate) fn print_issue_link<W: Write>(out: &mut Renderer<W>, issue: &IssueSummary) -> Result<()> {
    if out.is_json() {
        return out.json(issue);
    }
    out.table(vec![IssueLinkRow::from(issue)])
}
