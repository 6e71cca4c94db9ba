//! In-memory [`DocumentStore`].
//!
//! Backs the tests and the CLI, which loads an exported snapshot of the
//! production collections into it. Documents keep insertion order within a
//! collection.

use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::error::{CampError, Result};
use crate::store::{Document, DocumentStore};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: BTreeMap<String, Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a snapshot object mapping collection names to arrays
    /// of records. Each record's `"id"` is kept (numbers as their decimal
    /// text); records without one get a generated id.
    ///
    /// # Errors
    /// Returns `CampError::Validation` when the snapshot is not an object of
    /// arrays of objects, or a record id is neither a string nor a number.
    pub fn from_snapshot(snapshot: &Value) -> Result<Self> {
        let object = snapshot.as_object().ok_or_else(|| {
            CampError::Validation("snapshot must be an object of collections".to_string())
        })?;

        let mut store = Self::new();
        for (collection, records) in object {
            let records = records.as_array().ok_or_else(|| {
                CampError::Validation(format!("collection '{}' must be an array", collection))
            })?;
            store.collections.entry(collection.clone()).or_default();
            for record in records {
                let mut fields = record.as_object().cloned().ok_or_else(|| {
                    CampError::Validation(format!(
                        "records in '{}' must be objects",
                        collection
                    ))
                })?;
                let id = match fields.remove("id") {
                    Some(Value::String(id)) => id,
                    Some(Value::Number(n)) => n.to_string(),
                    None | Some(Value::Null) => Uuid::new_v4().to_string(),
                    Some(other) => {
                        return Err(CampError::Validation(format!(
                            "record id in '{}' must be a string or number, got {}",
                            collection, other
                        )))
                    }
                };
                store.insert_with_id(collection, &id, fields);
            }
        }
        Ok(store)
    }

    /// Store `fields` under a caller-chosen id, replacing any existing document.
    pub fn insert_with_id(&mut self, collection: &str, id: &str, fields: Map<String, Value>) {
        let now = Utc::now();
        let docs = self.collections.entry(collection.to_string()).or_default();
        let doc = Document {
            id: id.to_string(),
            fields,
            created_at: now,
            updated_at: now,
        };
        match docs.iter_mut().find(|d| d.id == id) {
            Some(existing) => *existing = doc,
            None => docs.push(doc),
        }
    }

    /// Inverse of [`MemoryStore::from_snapshot`]: every collection as an array
    /// of records with their `"id"` restored.
    pub fn to_snapshot(&self) -> Value {
        let collections = self
            .collections
            .iter()
            .map(|(name, docs)| {
                let records = docs
                    .iter()
                    .map(|doc| {
                        let mut record = Map::new();
                        record.insert("id".to_string(), Value::String(doc.id.clone()));
                        record.extend(doc.fields.clone());
                        Value::Object(record)
                    })
                    .collect();
                (name.clone(), Value::Array(records))
            })
            .collect();
        Value::Object(collections)
    }

    /// Number of documents in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, Vec::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

impl DocumentStore for MemoryStore {
    fn get_all(&self, collection: &str) -> Result<Vec<Document>> {
        Ok(self.collections.get(collection).cloned().unwrap_or_default())
    }

    fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    fn create(&mut self, collection: &str, fields: Map<String, Value>) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        self.insert_with_id(collection, &id, fields);
        debug!(collection, id = %id, "created document");
        Ok(id)
    }

    fn update(&mut self, collection: &str, id: &str, partial: Map<String, Value>) -> Result<()> {
        let doc = self
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| CampError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        doc.fields.extend(partial);
        doc.updated_at = Utc::now();
        Ok(())
    }

    fn delete(&mut self, collection: &str, id: &str) -> Result<()> {
        if let Some(docs) = self.collections.get_mut(collection) {
            docs.retain(|d| d.id != id);
        }
        Ok(())
    }

    fn query(&self, collection: &str, field: &str, value: &Value) -> Result<Vec<Document>> {
        Ok(self
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| d.fields.get(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
