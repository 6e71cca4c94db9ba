//! Resolve join-table associations in memory.
//!
//! Every many-to-many relationship (coach-group, location-group,
//! tournament-coach) is stored as rows of `{parentId, childId}` with no payload.
//! Reads fetch the parents, the join rows and the children separately and stitch
//! them together here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Anything addressable by an opaque string id.
pub trait Identified {
    fn id(&self) -> &str;
}

/// Loose JSON records are identified by their `"id"` field (empty when absent).
impl Identified for serde_json::Value {
    fn id(&self) -> &str {
        self.get("id").and_then(serde_json::Value::as_str).unwrap_or("")
    }
}

/// One row of a join table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Association {
    pub parent_id: String,
    pub child_id: String,
}

impl Association {
    pub fn new(parent_id: impl Into<String>, child_id: impl Into<String>) -> Self {
        Self {
            parent_id: parent_id.into(),
            child_id: child_id.into(),
        }
    }

    /// The same link seen from the other side.
    pub fn reversed(&self) -> Self {
        Self {
            parent_id: self.child_id.clone(),
            child_id: self.parent_id.clone(),
        }
    }
}

/// A parent record with its resolved children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithChildren<P, C> {
    #[serde(flatten)]
    pub parent: P,
    pub children: Vec<C>,
}

/// Attach to each parent the children its join rows point at.
///
/// Parent order is preserved and every parent appears exactly once. Children
/// follow join-row order. Join rows whose `child_id` has no matching child are
/// dropped: the child was deleted and the UI shows the parent without it.
pub fn attach_children<P, C>(
    parents: Vec<P>,
    joins: &[Association],
    children: &[C],
) -> Vec<WithChildren<P, C>>
where
    P: Identified,
    C: Identified + Clone,
{
    let by_id: HashMap<&str, &C> = children.iter().map(|c| (c.id(), c)).collect();

    parents
        .into_iter()
        .map(|parent| {
            let resolved = joins
                .iter()
                .filter(|join| join.parent_id == parent.id())
                .filter_map(|join| by_id.get(join.child_id.as_str()).map(|c| (*c).clone()))
                .collect();
            WithChildren {
                parent,
                children: resolved,
            }
        })
        .collect()
}

/// Child ids linked to `parent_id`, in join-row order.
pub fn child_ids_for<'a>(parent_id: &str, joins: &'a [Association]) -> Vec<&'a str> {
    joins
        .iter()
        .filter(|join| join.parent_id == parent_id)
        .map(|join| join.child_id.as_str())
        .collect()
}

/// Flip every row, for resolving the relationship from the child side.
pub fn reverse_all(joins: &[Association]) -> Vec<Association> {
    joins.iter().map(Association::reversed).collect()
}
