//! The document-store boundary and the write patterns built on it.
//!
//! The store is an external collaborator: a key-value document database with
//! per-collection get/create/update/delete-by-id and equality queries. This
//! module defines that contract as [`DocumentStore`] and implements the
//! multi-step writes the admin screens need on top of it:
//!
//! - [`replace_associations`]: "replace all links for parent X" on a join table.
//! - [`delete_with_associations`]: delete a coach/group/location and its join rows.
//! - [`delete_week`]: delete a week and report the week-scoped records left behind.
//!
//! None of these are transactional. The trait has no transaction primitive, so
//! each write is a separate call and a failure part-way leaves earlier writes in
//! place. Every operation is idempotent: re-running it after a failure converges
//! to the same end state.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{CampError, Result};
use crate::join::{Association, Identified};
use crate::model::collections;

/// A stored record. Timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identified for Document {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Contract of the backing document database.
pub trait DocumentStore {
    fn get_all(&self, collection: &str) -> Result<Vec<Document>>;

    fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Store a new document and return its generated id.
    fn create(&mut self, collection: &str, fields: Map<String, Value>) -> Result<String>;

    /// Merge `partial` into an existing document.
    ///
    /// # Errors
    /// Returns `CampError::NotFound` when the document does not exist.
    fn update(&mut self, collection: &str, id: &str, partial: Map<String, Value>) -> Result<()>;

    /// Delete a document. Deleting a missing document is not an error.
    fn delete(&mut self, collection: &str, id: &str) -> Result<()>;

    /// Documents whose `field` equals `value`.
    fn query(&self, collection: &str, field: &str, value: &Value) -> Result<Vec<Document>>;
}

/// Deserialize a stored document into a typed record, injecting its id.
pub fn decode<T: DeserializeOwned>(doc: &Document) -> Result<T> {
    let mut fields = doc.fields.clone();
    fields.insert("id".to_string(), Value::String(doc.id.clone()));
    Ok(serde_json::from_value(Value::Object(fields))?)
}

/// Serialize a record into document fields. The `id` key is dropped because
/// ids belong to the store.
pub fn encode<T: Serialize>(record: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(record)? {
        Value::Object(mut fields) => {
            fields.remove("id");
            Ok(fields)
        }
        other => Err(CampError::Validation(format!(
            "record must serialize to an object, got {}",
            other
        ))),
    }
}

/// Fetch and decode a whole collection.
pub fn fetch_all<T, S>(store: &S, collection: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    S: DocumentStore + ?Sized,
{
    store.get_all(collection)?.iter().map(decode).collect()
}

/// Fetch and decode one record.
///
/// # Errors
/// Returns `CampError::NotFound` when the id does not exist.
pub fn fetch_one<T, S>(store: &S, collection: &str, id: &str) -> Result<T>
where
    T: DeserializeOwned,
    S: DocumentStore + ?Sized,
{
    let doc = store
        .get_by_id(collection, id)?
        .ok_or_else(|| CampError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        })?;
    decode(&doc)
}

/// A join collection and the names of its two foreign-key fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinTable {
    pub collection: &'static str,
    pub parent_field: &'static str,
    pub child_field: &'static str,
}

pub const COACH_GROUPS: JoinTable = JoinTable {
    collection: "coachGroups",
    parent_field: "coachId",
    child_field: "groupId",
};

pub const LOCATION_GROUPS: JoinTable = JoinTable {
    collection: "locationGroups",
    parent_field: "locationId",
    child_field: "groupId",
};

pub const TOURNAMENT_COACHES: JoinTable = JoinTable {
    collection: "tournamentCoaches",
    parent_field: "tournamentId",
    child_field: "coachId",
};

/// Look up a join table by its collection name.
pub fn join_table(collection: &str) -> Option<JoinTable> {
    [COACH_GROUPS, LOCATION_GROUPS, TOURNAMENT_COACHES]
        .into_iter()
        .find(|t| t.collection == collection)
}

/// Join tables holding foreign keys into `collection`.
pub fn tables_referencing(collection: &str) -> &'static [JoinTable] {
    match collection {
        collections::COACHES => &[COACH_GROUPS, TOURNAMENT_COACHES],
        collections::GROUPS => &[COACH_GROUPS, LOCATION_GROUPS],
        collections::LOCATIONS => &[LOCATION_GROUPS],
        collections::TOURNAMENTS => &[TOURNAMENT_COACHES],
        _ => &[],
    }
}

/// Read a join table as parent-to-child associations.
///
/// Rows missing either key are skipped.
pub fn load_associations<S>(store: &S, table: JoinTable) -> Result<Vec<Association>>
where
    S: DocumentStore + ?Sized,
{
    let rows = store.get_all(table.collection)?;
    Ok(rows
        .iter()
        .filter_map(|doc| {
            let parent = doc.fields.get(table.parent_field).and_then(Value::as_str);
            let child = doc.fields.get(table.child_field).and_then(Value::as_str);
            match (parent, child) {
                (Some(parent), Some(child)) => Some(Association::new(parent, child)),
                _ => {
                    warn!(
                        table = table.collection,
                        id = %doc.id,
                        "skipping join row without both keys"
                    );
                    None
                }
            }
        })
        .collect())
}

/// Row counts written by [`replace_associations`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceOutcome {
    pub removed: usize,
    pub inserted: usize,
}

/// Replace every link of `parent_id` in `table` with one row per distinct id in
/// `child_ids`.
///
/// Runs as delete-all then insert-each, not atomically. Duplicate child ids
/// collapse to one row, so re-running with the same input yields the same rows.
///
/// # Errors
/// Returns `CampError::PartialUpdate` when a write fails after an earlier write
/// of this call succeeded. A failure before any write is returned unchanged.
pub fn replace_associations<S, I>(
    store: &mut S,
    table: JoinTable,
    parent_id: &str,
    child_ids: &[I],
) -> Result<ReplaceOutcome>
where
    S: DocumentStore + ?Sized,
    I: AsRef<str>,
{
    let mut seen = HashSet::new();
    let wanted: Vec<&str> = child_ids
        .iter()
        .map(AsRef::as_ref)
        .filter(|id| seen.insert(*id))
        .collect();

    let existing = store.query(
        table.collection,
        table.parent_field,
        &Value::String(parent_id.to_string()),
    )?;

    let mut outcome = ReplaceOutcome {
        removed: 0,
        inserted: 0,
    };
    let partial = |outcome: &ReplaceOutcome, source: CampError| {
        warn!(
            table = table.collection,
            parent_id,
            removed = outcome.removed,
            inserted = outcome.inserted,
            expected = wanted.len(),
            error = %source,
            "association replacement stopped part-way"
        );
        CampError::PartialUpdate {
            table: table.collection.to_string(),
            parent_id: parent_id.to_string(),
            inserted: outcome.inserted,
            expected: wanted.len(),
            source: Box::new(source),
        }
    };

    for doc in &existing {
        if let Err(e) = store.delete(table.collection, &doc.id) {
            if outcome.removed == 0 {
                return Err(e);
            }
            return Err(partial(&outcome, e));
        }
        outcome.removed += 1;
    }

    for child_id in &wanted {
        let mut fields = Map::new();
        fields.insert(
            table.parent_field.to_string(),
            Value::String(parent_id.to_string()),
        );
        fields.insert(
            table.child_field.to_string(),
            Value::String((*child_id).to_string()),
        );
        if let Err(e) = store.create(table.collection, fields) {
            if outcome.removed == 0 && outcome.inserted == 0 {
                return Err(e);
            }
            return Err(partial(&outcome, e));
        }
        outcome.inserted += 1;
    }

    debug!(
        table = table.collection,
        parent_id,
        removed = outcome.removed,
        inserted = outcome.inserted,
        "replaced associations"
    );
    Ok(outcome)
}

/// Delete a record and every join row that references it on either side.
///
/// Join rows go first so that a failed run leaves the record in place to retry.
/// Returns the number of join rows removed.
pub fn delete_with_associations<S>(
    store: &mut S,
    collection: &str,
    id: &str,
    tables: &[JoinTable],
) -> Result<usize>
where
    S: DocumentStore + ?Sized,
{
    let key = Value::String(id.to_string());
    let mut removed = 0;

    for table in tables {
        for field in [table.parent_field, table.child_field] {
            if !references(collection, field) {
                continue;
            }
            for row in store.query(table.collection, field, &key)? {
                store.delete(table.collection, &row.id)?;
                removed += 1;
            }
        }
    }

    store.delete(collection, id)?;
    debug!(collection, id, join_rows = removed, "deleted record with associations");
    Ok(removed)
}

/// Whether a join-table foreign-key field points into `collection`.
fn references(collection: &str, field: &str) -> bool {
    let singular = match collection {
        collections::COACHES => "coachId",
        collections::GROUPS => "groupId",
        collections::LOCATIONS => "locationId",
        collections::TOURNAMENTS => "tournamentId",
        _ => return true,
    };
    field == singular
}

/// A record that still points at a deleted parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanedRecord {
    pub collection: String,
    pub id: String,
}

/// Result of [`delete_week`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekDeletion {
    pub week_id: String,
    pub orphaned: Vec<OrphanedRecord>,
}

/// Collections whose records carry a `weekId`.
pub const WEEK_SCOPED: [&str; 2] = [collections::CAMPS, collections::PREFERENCES];

/// Delete a week without cascading, and report week-scoped records that still
/// reference it.
///
/// Coach, group and location deletion clean up their join rows; week deletion
/// deliberately does not touch camps or preferences. The orphans are returned
/// and logged so the caller can decide what to do with them.
///
/// # Errors
/// Returns `CampError::NotFound` when the week does not exist.
pub fn delete_week<S>(store: &mut S, week_id: &str) -> Result<WeekDeletion>
where
    S: DocumentStore + ?Sized,
{
    if store.get_by_id(collections::WEEKS, week_id)?.is_none() {
        return Err(CampError::NotFound {
            collection: collections::WEEKS.to_string(),
            id: week_id.to_string(),
        });
    }
    store.delete(collections::WEEKS, week_id)?;

    let key = Value::String(week_id.to_string());
    let mut orphaned = Vec::new();
    for collection in WEEK_SCOPED {
        for doc in store.query(collection, "weekId", &key)? {
            warn!(collection, id = %doc.id, week_id, "record references deleted week");
            orphaned.push(OrphanedRecord {
                collection: collection.to_string(),
                id: doc.id,
            });
        }
    }

    debug!(week_id, orphaned = orphaned.len(), "deleted week");
    Ok(WeekDeletion {
        week_id: week_id.to_string(),
        orphaned,
    })
}
