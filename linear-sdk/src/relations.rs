// ABOUTME: Synchronizes "blocks" relations of an issue from add/remove edit lists
// ABOUTME: Resolves and validates every reference first, then applies a pure plan

use std::collections::HashMap;

use log::debug;

use crate::api::LinearApi;
use crate::constants::relations::{BLOCKS, EXISTING_RELATIONS_LIMIT};
use crate::error::LinearError;
use crate::resolve::eq_fold;
use crate::types::IssueRelationSet;
use crate::Result;

/// Requested relation changes, as issue references (identifiers or ids).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationEdits {
    pub add_blocks: Vec<String>,
    pub add_blocked_by: Vec<String>,
    pub remove_blocks: Vec<String>,
    pub remove_blocked_by: Vec<String>,
}

fn unique(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

impl RelationEdits {
    /// Deduplicates each list, keeping first occurrences.
    pub fn normalized(self) -> Self {
        Self {
            add_blocks: unique(self.add_blocks),
            add_blocked_by: unique(self.add_blocked_by),
            remove_blocks: unique(self.remove_blocks),
            remove_blocked_by: unique(self.remove_blocked_by),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.add_blocks.is_empty()
            && self.add_blocked_by.is_empty()
            && self.remove_blocks.is_empty()
            && self.remove_blocked_by.is_empty()
    }
}

/// Current "blocks" relations around one issue, keyed by the other issue's id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingRelations {
    /// blocked issue id -> relation id
    pub outgoing: HashMap<String, String>,
    /// blocking issue id -> relation id
    pub incoming: HashMap<String, String>,
}

impl From<&IssueRelationSet> for ExistingRelations {
    fn from(set: &IssueRelationSet) -> Self {
        let is_blocks = |relation_type: &str| eq_fold(relation_type, BLOCKS);
        Self {
            outgoing: set
                .relations
                .iter()
                .filter(|rel| is_blocks(&rel.relation_type))
                .map(|rel| (rel.related_issue_id.clone(), rel.id.clone()))
                .collect(),
            incoming: set
                .inverse_relations
                .iter()
                .filter(|rel| is_blocks(&rel.relation_type))
                .map(|rel| (rel.issue_id.clone(), rel.id.clone()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationAction {
    Delete { relation_id: String },
    /// `issue_id` blocks `related_issue_id`
    Create {
        issue_id: String,
        related_issue_id: String,
    },
}

/// Created and deleted relation ids, in the order they were applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationReport {
    pub created: Vec<String>,
    pub deleted: Vec<String>,
}

impl RelationReport {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.deleted.is_empty()
    }
}

/// Orders actions as remove-blocks, remove-blocked-by, add-blocks, add-blocked-by.
///
/// `edits` must already hold resolved issue ids.
pub fn plan(issue_id: &str, edits: &RelationEdits, existing: &ExistingRelations) -> Vec<RelationAction> {
    let mut outgoing = existing.outgoing.clone();
    let mut incoming = existing.incoming.clone();
    let mut actions = Vec::new();

    for target in &edits.remove_blocks {
        if let Some(relation_id) = outgoing.remove(target) {
            actions.push(RelationAction::Delete { relation_id });
        }
    }
    for source in &edits.remove_blocked_by {
        if let Some(relation_id) = incoming.remove(source) {
            actions.push(RelationAction::Delete { relation_id });
        }
    }
    for target in &edits.add_blocks {
        if outgoing.contains_key(target) {
            continue;
        }
        outgoing.insert(target.clone(), String::new());
        actions.push(RelationAction::Create {
            issue_id: issue_id.to_string(),
            related_issue_id: target.clone(),
        });
    }
    for source in &edits.add_blocked_by {
        if incoming.contains_key(source) {
            continue;
        }
        incoming.insert(source.clone(), String::new());
        actions.push(RelationAction::Create {
            issue_id: source.clone(),
            related_issue_id: issue_id.to_string(),
        });
    }
    actions
}

async fn resolve_all<A>(api: &A, issue_id: &str, references: &[String]) -> Result<Vec<String>>
where
    A: LinearApi + ?Sized,
{
    let mut ids = Vec::with_capacity(references.len());
    for reference in references {
        let id = api.resolve_issue_id(reference).await?;
        if id == issue_id {
            return Err(LinearError::validation("cannot relate issue to itself"));
        }
        ids.push(id);
    }
    Ok(ids)
}

/// Applies `edits` to the issue `issue_id` (a canonical id).
///
/// With `fetch_existing` the current relations are read first so that adds and
/// removes only touch what actually changes; a freshly created issue skips that read.
pub async fn sync_relations<A>(
    api: &A,
    issue_id: &str,
    edits: RelationEdits,
    fetch_existing: bool,
) -> Result<RelationReport>
where
    A: LinearApi + ?Sized,
{
    let edits = edits.normalized();
    if edits.is_empty() {
        return Ok(RelationReport::default());
    }

    let resolved = RelationEdits {
        add_blocks: resolve_all(api, issue_id, &edits.add_blocks).await?,
        add_blocked_by: resolve_all(api, issue_id, &edits.add_blocked_by).await?,
        remove_blocks: resolve_all(api, issue_id, &edits.remove_blocks).await?,
        remove_blocked_by: resolve_all(api, issue_id, &edits.remove_blocked_by).await?,
    }
    .normalized();

    let existing = if fetch_existing {
        let set = api.issue_relations(issue_id, EXISTING_RELATIONS_LIMIT).await?;
        ExistingRelations::from(&set)
    } else {
        ExistingRelations::default()
    };

    let mut report = RelationReport::default();
    for action in plan(issue_id, &resolved, &existing) {
        match action {
            RelationAction::Delete { relation_id } => {
                debug!("deleting relation {relation_id}");
                api.issue_relation_delete(&relation_id).await?;
                report.deleted.push(relation_id);
            }
            RelationAction::Create {
                issue_id,
                related_issue_id,
            } => {
                debug!("creating relation {issue_id} blocks {related_issue_id}");
                let relation = api
                    .issue_relation_create(&issue_id, &related_issue_id, BLOCKS)
                    .await?;
                report.created.push(relation.id);
            }
        }
    }
    Ok(report)
}
