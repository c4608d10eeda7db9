// ABOUTME: Close and reopen issues by moving them to a workflow state of the right type
// ABOUTME: Works over any LinearApi so the same flow runs live and against the fake

use log::debug;
use serde_json::{Map, Value};

use crate::api::LinearApi;
use crate::error::LinearError;
use crate::resolve::eq_fold;
use crate::types::{IssueSummary, WorkflowState};
use crate::Result;

pub const COMPLETED: &str = "completed";
pub const UNSTARTED: &str = "unstarted";

/// First state whose type matches `state_type`, ignoring case.
pub fn find_state_of_type<'a>(states: &'a [WorkflowState], state_type: &str) -> Option<&'a WorkflowState> {
    states
        .iter()
        .find(|state| eq_fold(&state.state_type, state_type))
}

async fn move_to_state_type<A>(api: &A, reference: &str, state_type: &str) -> Result<IssueSummary>
where
    A: LinearApi + ?Sized,
{
    let issue = api.issue(reference).await?;
    let states = api.workflow_states(&issue.team_id).await?;
    let state = find_state_of_type(&states, state_type)
        .ok_or_else(|| LinearError::not_found(format!("workflow state of type {state_type}")))?;
    debug!("moving {} to state {} ({})", issue.identifier, state.name, state.id);

    let mut input = Map::new();
    input.insert("id".into(), Value::String(issue.id));
    input.insert("stateId".into(), Value::String(state.id.clone()));
    api.issue_update(input).await
}

pub async fn close_issue<A>(api: &A, reference: &str) -> Result<IssueSummary>
where
    A: LinearApi + ?Sized,
{
    move_to_state_type(api, reference, COMPLETED).await
}

pub async fn reopen_issue<A>(api: &A, reference: &str) -> Result<IssueSummary>
where
    A: LinearApi + ?Sized,
{
    move_to_state_type(api, reference, UNSTARTED).await
}
