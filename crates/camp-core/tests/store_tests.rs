//! Tests for the document-store boundary: the in-memory store, association
//! replacement, cascade deletes and week deletion.

use camp_core::model::{collections, Coach};
use camp_core::store::{
    decode, delete_week, delete_with_associations, encode, fetch_all, fetch_one,
    join_table, load_associations, tables_referencing, Document, JoinTable, COACH_GROUPS, LOCATION_GROUPS,
    TOURNAMENT_COACHES,
};
use camp_core::{replace_associations, Association, CampError, DocumentStore, MemoryStore};
use serde_json::{json, Map, Value};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn fields(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

fn links(store: &MemoryStore, table: JoinTable, parent: &str) -> Vec<String> {
    load_associations(store, table)
        .unwrap()
        .into_iter()
        .filter(|a| a.parent_id == parent)
        .map(|a| a.child_id)
        .collect()
}

/// Wraps a `MemoryStore` and fails every `create` after the first `allow` calls.
struct FlakyStore {
    inner: MemoryStore,
    allow: usize,
}

impl DocumentStore for FlakyStore {
    fn get_all(&self, collection: &str) -> camp_core::error::Result<Vec<Document>> {
        self.inner.get_all(collection)
    }

    fn get_by_id(&self, collection: &str, id: &str) -> camp_core::error::Result<Option<Document>> {
        self.inner.get_by_id(collection, id)
    }

    fn create(&mut self, collection: &str, fields: Map<String, Value>) -> camp_core::error::Result<String> {
        if self.allow == 0 {
            return Err(CampError::Store("write quota exceeded".to_string()));
        }
        self.allow -= 1;
        self.inner.create(collection, fields)
    }

    fn update(&mut self, collection: &str, id: &str, partial: Map<String, Value>) -> camp_core::error::Result<()> {
        self.inner.update(collection, id, partial)
    }

    fn delete(&mut self, collection: &str, id: &str) -> camp_core::error::Result<()> {
        self.inner.delete(collection, id)
    }

    fn query(&self, collection: &str, field: &str, value: &Value) -> camp_core::error::Result<Vec<Document>> {
        self.inner.query(collection, field, value)
    }
}

// ── MemoryStore ─────────────────────────────────────────────────────────────

#[test]
fn create_get_update_delete() {
    let mut store = MemoryStore::new();
    let id = store
        .create(collections::COACHES, fields(json!({"name": "Ana"})))
        .unwrap();

    let doc = store.get_by_id(collections::COACHES, &id).unwrap().unwrap();
    assert_eq!(doc.fields["name"], "Ana");
    assert_eq!(doc.created_at, doc.updated_at);

    store
        .update(collections::COACHES, &id, fields(json!({"email": "ana@club.test"})))
        .unwrap();
    let doc = store.get_by_id(collections::COACHES, &id).unwrap().unwrap();
    assert_eq!(doc.fields["name"], "Ana", "update merges fields");
    assert_eq!(doc.fields["email"], "ana@club.test");
    assert!(doc.updated_at >= doc.created_at);

    store.delete(collections::COACHES, &id).unwrap();
    assert!(store.get_by_id(collections::COACHES, &id).unwrap().is_none());
    // Deleting again is fine.
    store.delete(collections::COACHES, &id).unwrap();
}

#[test]
fn update_missing_document_is_not_found() {
    let mut store = MemoryStore::new();
    let err = store
        .update(collections::WEEKS, "nope", Map::new())
        .unwrap_err();
    assert!(matches!(err, CampError::NotFound { .. }));
}

#[test]
fn query_matches_field_equality() {
    let mut store = MemoryStore::new();
    store.create("camps", fields(json!({"weekId": "w1", "name": "A"}))).unwrap();
    store.create("camps", fields(json!({"weekId": "w2", "name": "B"}))).unwrap();
    store.create("camps", fields(json!({"weekId": "w1", "name": "C"}))).unwrap();

    let hits = store.query("camps", "weekId", &json!("w1")).unwrap();
    let names: Vec<&str> = hits.iter().map(|d| d.fields["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["A", "C"]);
    assert!(store.query("camps", "weekId", &json!("w9")).unwrap().is_empty());
    assert!(store.query("missing", "weekId", &json!("w1")).unwrap().is_empty());
}

#[test]
fn snapshot_keeps_ids_and_rejects_bad_shapes() {
    let store = MemoryStore::from_snapshot(&json!({
        "coaches": [{"id": "c1", "name": "Ana"}, {"name": "NoId"}],
    }))
    .unwrap();
    assert_eq!(store.len("coaches"), 2);
    let ana: Coach = fetch_one(&store, "coaches", "c1").unwrap();
    assert_eq!(ana.name, "Ana");

    assert!(matches!(
        MemoryStore::from_snapshot(&json!([1, 2])),
        Err(CampError::Validation(_))
    ));
    assert!(MemoryStore::from_snapshot(&json!({"coaches": {}})).is_err());
    assert!(MemoryStore::from_snapshot(&json!({"coaches": [1]})).is_err());
}

#[test]
fn snapshot_numeric_ids_keep_their_value() {
    let store = MemoryStore::from_snapshot(&json!({
        "coaches": [{"id": 7, "name": "Ana"}, {"id": null, "name": "Ben"}],
    }))
    .unwrap();
    let ana: Coach = fetch_one(&store, "coaches", "7").unwrap();
    assert_eq!(ana.name, "Ana");
    assert_eq!(store.to_snapshot()["coaches"][0]["id"], "7");
    assert_eq!(store.len("coaches"), 2);

    let err = MemoryStore::from_snapshot(&json!({"coaches": [{"id": true, "name": "Cy"}]}))
        .unwrap_err();
    assert!(matches!(err, CampError::Validation(_)));
}

#[test]
fn decode_and_encode_records() {
    let mut store = MemoryStore::new();
    let coach = Coach {
        id: "ignored".to_string(),
        name: "Ben".to_string(),
        email: None,
    };
    let stored = encode(&coach).unwrap();
    assert!(!stored.contains_key("id"), "ids belong to the store");
    let id = store.create(collections::COACHES, stored).unwrap();

    let all: Vec<Coach> = fetch_all(&store, collections::COACHES).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, id);
    assert_eq!(all[0].name, "Ben");

    let doc = store.get_by_id(collections::COACHES, &id).unwrap().unwrap();
    let bad: Result<camp_core::model::Week, _> = decode(&doc);
    assert!(matches!(bad, Err(CampError::Decode(_))));

    let err = fetch_one::<Coach, _>(&store, collections::COACHES, "missing").unwrap_err();
    assert!(matches!(err, CampError::NotFound { .. }));
}

// ── Association replacement ─────────────────────────────────────────────────

#[test]
fn replace_swaps_all_links_of_one_parent() {
    let mut store = MemoryStore::new();
    replace_associations(&mut store, COACH_GROUPS, "c1", &["g1", "g2"]).unwrap();
    replace_associations(&mut store, COACH_GROUPS, "c2", &["g1"]).unwrap();

    let outcome = replace_associations(&mut store, COACH_GROUPS, "c1", &["g3"]).unwrap();
    assert_eq!(outcome.removed, 2);
    assert_eq!(outcome.inserted, 1);

    assert_eq!(links(&store, COACH_GROUPS, "c1"), ["g3"]);
    assert_eq!(links(&store, COACH_GROUPS, "c2"), ["g1"], "other parents untouched");
}

#[test]
fn replace_with_empty_set_clears_links() {
    let mut store = MemoryStore::new();
    replace_associations(&mut store, LOCATION_GROUPS, "l1", &["g1", "g2"]).unwrap();
    replace_associations::<_, &str>(&mut store, LOCATION_GROUPS, "l1", &[]).unwrap();
    assert!(links(&store, LOCATION_GROUPS, "l1").is_empty());
}

#[test]
fn replace_collapses_duplicates_and_is_idempotent() {
    let mut store = MemoryStore::new();
    let ids = vec!["g1".to_string(), "g2".to_string(), "g1".to_string()];

    replace_associations(&mut store, COACH_GROUPS, "c1", &ids).unwrap();
    replace_associations(&mut store, COACH_GROUPS, "c1", &ids).unwrap();

    assert_eq!(links(&store, COACH_GROUPS, "c1"), ["g1", "g2"]);
    assert_eq!(store.len(COACH_GROUPS.collection), 2);
}

#[test]
fn failed_insert_after_delete_is_partial_update() {
    let mut inner = MemoryStore::new();
    replace_associations(&mut inner, COACH_GROUPS, "c1", &["g1"]).unwrap();

    let mut store = FlakyStore { inner, allow: 1 };
    let err = replace_associations(&mut store, COACH_GROUPS, "c1", &["g2", "g3"]).unwrap_err();
    match err {
        CampError::PartialUpdate {
            table,
            parent_id,
            inserted,
            expected,
            ..
        } => {
            assert_eq!(table, "coachGroups");
            assert_eq!(parent_id, "c1");
            assert_eq!(inserted, 1);
            assert_eq!(expected, 2);
        }
        other => panic!("expected PartialUpdate, got {other:?}"),
    }

    // Retrying once writes succeed converges to the requested set.
    store.allow = usize::MAX;
    replace_associations(&mut store, COACH_GROUPS, "c1", &["g2", "g3"]).unwrap();
    assert_eq!(links(&store.inner, COACH_GROUPS, "c1"), ["g2", "g3"]);
}

#[test]
fn failure_before_any_write_is_returned_unchanged() {
    let mut store = FlakyStore {
        inner: MemoryStore::new(),
        allow: 0,
    };
    let err = replace_associations(&mut store, COACH_GROUPS, "c1", &["g1"]).unwrap_err();
    assert!(matches!(err, CampError::Store(_)), "got {err:?}");
}

#[test]
fn load_associations_skips_incomplete_rows() {
    let mut store = MemoryStore::new();
    store
        .create("coachGroups", fields(json!({"coachId": "c1", "groupId": "g1"})))
        .unwrap();
    store
        .create("coachGroups", fields(json!({"coachId": "c1"})))
        .unwrap();

    let rows = load_associations(&store, COACH_GROUPS).unwrap();
    assert_eq!(rows, vec![Association::new("c1", "g1")]);
}

// ── Cascades ────────────────────────────────────────────────────────────────

#[test]
fn deleting_group_removes_its_join_rows_on_both_tables() {
    let mut store = MemoryStore::new();
    store.insert_with_id(collections::GROUPS, "g1", fields(json!({"name": "Red"})));
    store.insert_with_id(collections::GROUPS, "g2", fields(json!({"name": "Blue"})));
    replace_associations(&mut store, COACH_GROUPS, "c1", &["g1", "g2"]).unwrap();
    replace_associations(&mut store, LOCATION_GROUPS, "l1", &["g1"]).unwrap();

    let removed = delete_with_associations(
        &mut store,
        collections::GROUPS,
        "g1",
        tables_referencing(collections::GROUPS),
    )
    .unwrap();

    assert_eq!(removed, 2);
    assert!(store.get_by_id(collections::GROUPS, "g1").unwrap().is_none());
    assert_eq!(links(&store, COACH_GROUPS, "c1"), ["g2"]);
    assert!(links(&store, LOCATION_GROUPS, "l1").is_empty());
}

#[test]
fn deleting_coach_only_touches_coach_keys() {
    let mut store = MemoryStore::new();
    store.insert_with_id(collections::COACHES, "x", fields(json!({"name": "Ana"})));
    // A group that happens to share the id must keep its links.
    replace_associations(&mut store, COACH_GROUPS, "other", &["x"]).unwrap();
    replace_associations(&mut store, COACH_GROUPS, "x", &["g1"]).unwrap();
    replace_associations(&mut store, TOURNAMENT_COACHES, "t1", &["x"]).unwrap();

    let removed = delete_with_associations(
        &mut store,
        collections::COACHES,
        "x",
        tables_referencing(collections::COACHES),
    )
    .unwrap();

    assert_eq!(removed, 2);
    assert_eq!(links(&store, COACH_GROUPS, "other"), ["x"]);
    assert!(links(&store, TOURNAMENT_COACHES, "t1").is_empty());
}

#[test]
fn deleting_week_reports_orphans_without_cascading() {
    let mut store = MemoryStore::new();
    store.insert_with_id(collections::WEEKS, "w1", fields(json!({"name": "Week 1"})));
    store.insert_with_id(
        collections::CAMPS,
        "camp1",
        fields(json!({"weekId": "w1", "name": "Mini"})),
    );
    store.insert_with_id(
        collections::CAMPS,
        "camp2",
        fields(json!({"weekId": "w2", "name": "Elite"})),
    );
    store.insert_with_id(
        collections::PREFERENCES,
        "p1",
        fields(json!({"weekId": "w1", "coachId": "c1", "rule": "mornings"})),
    );

    let report = delete_week(&mut store, "w1").unwrap();

    assert!(store.get_by_id(collections::WEEKS, "w1").unwrap().is_none());
    let orphans: Vec<(&str, &str)> = report
        .orphaned
        .iter()
        .map(|o| (o.collection.as_str(), o.id.as_str()))
        .collect();
    assert_eq!(orphans, [("camps", "camp1"), ("preferences", "p1")]);
    assert_eq!(store.len(collections::CAMPS), 2, "camps are left in place");
}

#[test]
fn deleting_missing_week_is_not_found() {
    let mut store = MemoryStore::new();
    assert!(matches!(
        delete_week(&mut store, "w404"),
        Err(CampError::NotFound { .. })
    ));
}

#[test]
fn join_tables_by_collection_name() {
    assert_eq!(join_table("coachGroups"), Some(COACH_GROUPS));
    assert_eq!(join_table("tournamentCoaches"), Some(TOURNAMENT_COACHES));
    assert_eq!(join_table("coaches"), None);
}

#[test]
fn snapshot_round_trips_through_store() {
    let snapshot = json!({
        "coachGroups": [{"id": "cg1", "coachId": "c1", "groupId": "g1"}],
        "weeks": [],
    });
    let store = MemoryStore::from_snapshot(&snapshot).unwrap();
    assert_eq!(store.to_snapshot(), snapshot);
}
