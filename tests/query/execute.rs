//! Tests for predicate evaluation and sorting.

use sectioned_query::{
    error::QueryError,
    query::{execute_fetch, matches_filter, normalize_sort, sort_records, SortEntry, SortInput},
};
use serde_json::{json, Value};

fn tasks() -> Vec<Value> {
    vec![
        json!({ "title": "b", "priority": 2, "done": false, "tags": ["home"] }),
        json!({ "title": "a", "priority": 1, "done": true, "tags": ["work", "urgent"] }),
        json!({ "title": "c", "priority": 3, "done": false }),
        json!({ "title": "d", "done": false, "meta": { "owner": "sam" } }),
    ]
}

fn titles(records: &[Value]) -> Vec<&str> {
    records.iter().filter_map(|r| r["title"].as_str()).collect()
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn direct_value_is_equality() {
    let out = execute_fetch(tasks(), Some(&json!({ "done": true })), &[]).unwrap();
    assert_eq!(titles(&out), vec!["a"]);
}

#[test]
fn comparison_operators_skip_missing_fields() {
    let out = execute_fetch(tasks(), Some(&json!({ "priority": { "$gte": 2 } })), &[]).unwrap();
    assert_eq!(titles(&out), vec!["b", "c"]);

    let out = execute_fetch(tasks(), Some(&json!({ "priority": { "$lt": 3 } })), &[]).unwrap();
    assert_eq!(titles(&out), vec!["b", "a"]);
}

#[test]
fn in_and_nin_lift_over_arrays() {
    let out = execute_fetch(tasks(), Some(&json!({ "tags": { "$in": ["urgent"] } })), &[]).unwrap();
    assert_eq!(titles(&out), vec!["a"]);

    let out =
        execute_fetch(tasks(), Some(&json!({ "title": { "$nin": ["a", "b"] } })), &[]).unwrap();
    assert_eq!(titles(&out), vec!["c", "d"]);
}

#[test]
fn scalar_equality_matches_any_array_element() {
    let out = execute_fetch(tasks(), Some(&json!({ "tags": "work" })), &[]).unwrap();
    assert_eq!(titles(&out), vec!["a"]);
}

#[test]
fn exists_distinguishes_absent_fields() {
    let out =
        execute_fetch(tasks(), Some(&json!({ "priority": { "$exists": false } })), &[]).unwrap();
    assert_eq!(titles(&out), vec!["d"]);
}

#[test]
fn nested_paths_resolve() {
    let out = execute_fetch(tasks(), Some(&json!({ "meta.owner": "sam" })), &[]).unwrap();
    assert_eq!(titles(&out), vec!["d"]);
}

#[test]
fn logical_operators_combine() {
    let filter = json!({
        "$or": [{ "priority": 1 }, { "priority": 3 }],
        "$not": { "done": true }
    });
    let out = execute_fetch(tasks(), Some(&filter), &[]).unwrap();
    assert_eq!(titles(&out), vec!["c"]);

    let filter = json!({ "$and": [{ "done": false }, { "priority": { "$gt": 1 } }] });
    let out = execute_fetch(tasks(), Some(&filter), &[]).unwrap();
    assert_eq!(titles(&out), vec!["b", "c"]);
}

#[test]
fn regex_matches_strings() {
    let out = execute_fetch(tasks(), Some(&json!({ "title": { "$regex": "^[ab]$" } })), &[]).unwrap();
    assert_eq!(titles(&out), vec!["b", "a"]);
}

#[test]
fn invalid_regex_is_an_error() {
    let err = matches_filter(&json!({ "title": "a" }), &json!({ "title": { "$regex": "(" } }))
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidRegex(_)));
}

#[test]
fn unknown_operator_is_an_error() {
    let err = execute_fetch(tasks(), Some(&json!({ "priority": { "$near": 1 } })), &[])
        .unwrap_err();
    assert!(matches!(err, QueryError::UnknownOperator(op) if op == "$near"));

    let err = execute_fetch(tasks(), Some(&json!({ "$where": "x" })), &[]).unwrap_err();
    assert!(matches!(err, QueryError::UnknownOperator(op) if op == "$where"));
}

// ============================================================================
// Sorting
// ============================================================================

#[test]
fn sort_ascending_puts_nulls_last() {
    let out = sort_records(tasks(), &[SortEntry::asc("priority")]);
    assert_eq!(titles(&out), vec!["a", "b", "c", "d"]);
}

#[test]
fn sort_descending_reverses_comparison() {
    let out = sort_records(tasks(), &[SortEntry::desc("title")]);
    assert_eq!(titles(&out), vec!["d", "c", "b", "a"]);
}

#[test]
fn sort_cascades_and_is_stable() {
    let records = vec![
        json!({ "g": "x", "n": 2, "title": "first" }),
        json!({ "g": "y", "n": 1, "title": "second" }),
        json!({ "g": "x", "n": 1, "title": "third" }),
        json!({ "g": "x", "n": 1, "title": "fourth" }),
    ];
    let out = sort_records(records, &[SortEntry::asc("g"), SortEntry::asc("n")]);
    assert_eq!(titles(&out), vec!["third", "fourth", "first", "second"]);
}

#[test]
fn normalize_sort_accepts_entries() {
    let entries = normalize_sort(Some(SortInput::Entries(vec![SortEntry::desc("n")])));
    assert_eq!(entries, vec![SortEntry::desc("n")]);
    assert!(normalize_sort(None).is_empty());
}
