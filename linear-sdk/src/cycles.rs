// ABOUTME: Cycle listing and lookup with a team-nested fallback for older schemas
// ABOUTME: The fallback filters active cycles client-side and flags truncated pages

use log::{debug, warn};

use crate::error::LinearError;
use crate::filter::build_cycle_filter;
use crate::graphql::GraphQLRequest;
use crate::queries::cycles;
use crate::responses::{CycleData, CyclesData, TeamCyclesData};
use crate::types::{Cycle, CyclePage};
use crate::{LinearClient, Result};

/// Keeps only active cycles; flags the page when nodes were dropped and more pages exist.
pub fn retain_active(mut page: CyclePage) -> CyclePage {
    let before = page.nodes.len();
    page.nodes.retain(|cycle| cycle.is_active);
    page.truncated = page.nodes.len() < before && page.page_info.has_next_page;
    page
}

impl LinearClient {
    pub async fn cycles(
        &self,
        team_id: &str,
        current_only: bool,
        limit: i64,
        after: Option<&str>,
    ) -> Result<CyclePage> {
        let request = GraphQLRequest::new(cycles::CYCLES)
            .variable("filter", build_cycle_filter(team_id, current_only))
            .first(limit)
            .after(after);
        match self.execute::<CyclesData>(&request).await {
            Ok(data) => Ok(data.cycles.into()),
            Err(err) if err.is_unknown_field("cycles") => {
                debug!("top-level cycles is not queryable, using team {team_id} cycles");
                self.team_cycles(team_id, current_only, limit, after).await
            }
            Err(err) => Err(err),
        }
    }

    async fn team_cycles(
        &self,
        team_id: &str,
        current_only: bool,
        limit: i64,
        after: Option<&str>,
    ) -> Result<CyclePage> {
        let id_type = self.id_type("team").await;
        let request = GraphQLRequest::new(cycles::team_cycles(&id_type))
            .variable("id", team_id)
            .first(limit)
            .after(after);
        let data: TeamCyclesData = self.execute(&request).await?;
        let team = data
            .team
            .ok_or_else(|| LinearError::not_found(format!("team {team_id}")))?;

        let page = CyclePage::from(team.cycles);
        if !current_only {
            return Ok(page);
        }
        let page = retain_active(page);
        if page.truncated {
            warn!("active cycles may be on later pages; results are truncated");
        }
        Ok(page)
    }

    pub async fn cycle(&self, id: &str) -> Result<Cycle> {
        let id_type = self.id_type("cycle").await;
        let request = GraphQLRequest::new(cycles::cycle(&id_type)).variable("id", id);
        let data: CycleData = self.execute(&request).await?;
        data.cycle
            .map(Cycle::from)
            .ok_or_else(|| LinearError::not_found(format!("cycle {id}")))
    }
}
