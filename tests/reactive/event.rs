//! Tests for `ChangeEvent` accessors.

use sectioned_query::reactive::ChangeEvent;

#[test]
fn put_and_delete_report_collection_and_id() {
    let put = ChangeEvent::Put {
        collection: "tasks".to_string(),
        id: "t1".to_string(),
    };
    assert_eq!(put.collection(), Some("tasks"));
    assert_eq!(put.ids(), vec!["t1"]);

    let delete = ChangeEvent::Delete {
        collection: "tasks".to_string(),
        id: "t2".to_string(),
    };
    assert_eq!(delete.ids(), vec!["t2"]);
}

#[test]
fn bulk_reports_all_ids_in_order() {
    let bulk = ChangeEvent::Bulk {
        collection: "tasks".to_string(),
        ids: vec!["a".to_string(), "b".to_string(), "c".to_string()],
    };
    assert_eq!(bulk.ids(), vec!["a", "b", "c"]);
}

#[test]
fn collection_wide_events_have_no_ids() {
    let cleared = ChangeEvent::Cleared {
        collection: "tasks".to_string(),
    };
    assert!(cleared.ids().is_empty());
    assert!(cleared.affects("tasks"));
    assert!(!cleared.affects("notes"));
}

#[test]
fn lagged_affects_every_collection() {
    let lagged = ChangeEvent::Lagged { skipped: 3 };
    assert_eq!(lagged.collection(), None);
    assert!(lagged.affects("tasks"));
    assert!(lagged.affects("notes"));
}
