// ABOUTME: Handlers for whoami and team list
// ABOUTME: Thin wrappers that render the viewer and the workspace teams

use anyhow::Result;
use linear_sdk::LinearApi;
use std::io::Write;

use crate::output::{Renderer, TeamRow, UserRow};

pub async fn whoami<W: Write>(api: &dyn LinearApi, out: &mut Renderer<W>) -> Result<()> {
    let user = api.me().await?;
    if out.is_json() {
        return out.json(&user);
    }
    out.table(vec![UserRow::from(&user)])
}

pub async fn team_list<W: Write>(api: &dyn LinearApi, out: &mut Renderer<W>) -> Result<()> {
    let teams = api.teams().await?;
    if out.is_json() {
        return out.json(&teams);
    }
    out.table(teams.iter().map(TeamRow::from).collect())
}
