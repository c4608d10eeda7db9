// ABOUTME: Handlers for cycle list and cycle view
// ABOUTME: Lists a team's cycles, optionally only active ones, and shows a single cycle

use anyhow::Result;
use linear_sdk::{LinearApi, LinearError};
use std::io::Write;

use crate::cli::CycleListArgs;
use crate::output::{CycleRow, Renderer};

pub async fn list<W: Write>(api: &dyn LinearApi, args: &CycleListArgs, out: &mut Renderer<W>) -> Result<()> {
    let team = args
        .team
        .as_deref()
        .ok_or_else(|| LinearError::validation("--team is required"))?;
    let team_id = api.resolve_team_id(team).await?;

    let page = api
        .cycles(&team_id, args.current, args.limit, args.after.as_deref())
        .await?;

    if out.is_json() {
        return out.json(&page);
    }
    out.table(page.nodes.iter().map(CycleRow::from).collect())?;
    if page.truncated {
        out.line(format!(
            "\nMore active cycles may exist; continue with --after {}",
            page.page_info.end_cursor
        ))?;
    }
    Ok(())
}

pub async fn view<W: Write>(api: &dyn LinearApi, cycle_id: &str, out: &mut Renderer<W>) -> Result<()> {
    let cycle = api.cycle(cycle_id).await?;
    if out.is_json() {
        return out.json(&cycle);
    }
    out.table(vec![CycleRow::from(&cycle)])
}
