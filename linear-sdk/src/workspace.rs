// ABOUTME: Workspace-level reads: the authenticated user, teams and workflow states
// ABOUTME: Falls back from `viewer` to `me` when the schema does not expose `viewer`

use log::debug;

use crate::error::LinearError;
use crate::graphql::GraphQLRequest;
use crate::queries::workspace;
use crate::responses::{MeData, TeamsData, ViewerData, WorkflowStatesData};
use crate::types::{Team, User, WorkflowState};
use crate::{LinearClient, Result};

impl LinearClient {
    pub async fn me(&self) -> Result<User> {
        let user = match self
            .execute::<ViewerData>(&GraphQLRequest::new(workspace::VIEWER))
            .await
        {
            Ok(data) => data.viewer,
            Err(err) if err.is_unknown_field("viewer") => {
                debug!("viewer is not queryable, retrying with me");
                self.execute::<MeData>(&GraphQLRequest::new(workspace::ME))
                    .await?
                    .me
            }
            Err(err) => return Err(err),
        };
        user.ok_or_else(|| LinearError::not_found("viewer"))
    }

    pub async fn teams(&self) -> Result<Vec<Team>> {
        let data: TeamsData = self.execute(&GraphQLRequest::new(workspace::TEAMS)).await?;
        Ok(data.teams.nodes)
    }

    pub async fn workflow_states(&self, team_id: &str) -> Result<Vec<WorkflowState>> {
        let id_type = self.id_type("team").await;
        let request =
            GraphQLRequest::new(workspace::workflow_states(&id_type)).variable("id", team_id);
        let data: WorkflowStatesData = self.execute(&request).await?;
        data.team
            .map(|team| team.states.nodes)
            .ok_or_else(|| LinearError::not_found(format!("team {team_id}")))
    }
}
