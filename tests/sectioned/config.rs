//! Tests for `QueryConfiguration` and `ConfigurationHandle`.

use std::sync::Arc;

use sectioned_query::{
    field_key,
    query::SortEntry,
    section_key, MemoryStore, QueryConfiguration, SectionedQuery,
};
use serde_json::{json, Value};

fn make_query() -> SectionedQuery<MemoryStore, String> {
    let store = Arc::new(MemoryStore::new("tasks"));
    SectionedQuery::new(store, QueryConfiguration::new(field_key("group")))
}

#[test]
fn builder_sets_sort_and_predicate() {
    let config: QueryConfiguration<Value, String> = QueryConfiguration::new(field_key("group"))
        .with_sort(vec![SortEntry::desc("n")])
        .with_predicate(json!({ "done": false }));

    assert_eq!(config.sort, vec![SortEntry::desc("n")]);
    assert_eq!(config.predicate, Some(json!({ "done": false })));
}

#[test]
fn sort_accepts_field_name_shorthand() {
    let config: QueryConfiguration<Value, String> =
        QueryConfiguration::new(field_key("group")).with_sort("n");
    assert_eq!(config.sort, vec![SortEntry::asc("n")]);

    let query = make_query();
    let handle = query.configuration();
    handle.set_sort(SortEntry::desc("n"));
    assert_eq!(handle.sort(), vec![SortEntry::desc("n")]);

    handle.set_sort(String::from("group"));
    assert_eq!(handle.sort(), vec![SortEntry::asc("group")]);
}

#[test]
fn handle_reads_current_configuration() {
    let query = make_query();
    let handle = query.configuration();

    assert!(handle.sort().is_empty());
    assert_eq!(handle.predicate(), None);

    let key = handle.section_key();
    assert_eq!(key(&json!({ "group": "g1" })), Ok("g1".to_string()));
}

#[test]
fn writes_through_one_handle_are_visible_through_another() {
    let query = make_query();
    let a = query.configuration();
    let b = query.configuration();

    a.set_sort(vec![SortEntry::asc("n")]);
    assert_eq!(b.sort(), vec![SortEntry::asc("n")]);

    let cloned = b.clone();
    cloned.set_predicate(Some(json!({ "n": { "$gt": 1 } })));
    assert_eq!(a.predicate(), Some(json!({ "n": { "$gt": 1 } })));
}

#[test]
fn update_edits_several_fields_at_once() {
    let query = make_query();
    let handle = query.configuration();

    handle.update(|c| {
        c.sort = vec![SortEntry::desc("n")];
        c.predicate = Some(json!({ "group": "A" }));
    });

    let snapshot = handle.get();
    assert_eq!(snapshot.sort, vec![SortEntry::desc("n")]);
    assert_eq!(snapshot.predicate, Some(json!({ "group": "A" })));
}

#[test]
fn section_key_wraps_infallible_accessor() {
    let key = section_key(|r: &Value| r["n"].as_i64().unwrap_or(0) / 10);
    assert_eq!(key(&json!({ "n": 42 })), Ok(4));
}
