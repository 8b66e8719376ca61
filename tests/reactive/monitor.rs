//! Tests for `ChangeMonitor` against a `MemoryStore` change stream.

use std::sync::Arc;

use sectioned_query::{
    reactive::{ChangeMonitor, DirtyFlag},
    MemoryStore,
};
use serde_json::json;

fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new("tasks"))
}

#[test]
fn notification_raises_clean_flag() {
    let store = store();
    let flag = DirtyFlag::clean();
    let mut monitor = ChangeMonitor::new(flag.clone(), None);

    assert!(monitor.start(store.as_ref()));
    store.put("t1", json!({ "title": "write tests" }));

    assert!(flag.is_dirty());
    assert_eq!(monitor.observed(), 1);
}

#[test]
fn notifications_while_dirty_leave_flag_set() {
    let store = store();
    let flag = DirtyFlag::clean();
    let mut monitor = ChangeMonitor::new(flag.clone(), None);
    monitor.start(store.as_ref());

    store.put("t1", json!({}));
    store.put("t2", json!({}));
    store.delete("t1");

    assert!(flag.is_dirty());
    assert_eq!(monitor.observed(), 3);
    assert!(flag.take());
    assert!(!flag.is_dirty());
}

#[test]
fn start_is_idempotent() {
    let store = store();
    let mut monitor = ChangeMonitor::new(DirtyFlag::clean(), None);

    assert!(monitor.start(store.as_ref()));
    assert!(!monitor.start(store.as_ref()));
    assert_eq!(store.subscriber_count(), 1);
}

#[test]
fn stop_and_drop_cancel_the_subscription() {
    let store = store();
    let flag = DirtyFlag::clean();
    let mut monitor = ChangeMonitor::new(flag.clone(), None);
    monitor.start(store.as_ref());

    monitor.stop();
    monitor.stop();
    assert!(!monitor.is_running());
    assert_eq!(store.subscriber_count(), 0);

    store.put("t1", json!({}));
    assert!(!flag.is_dirty(), "stopped monitor must not flag");

    monitor.start(store.as_ref());
    assert_eq!(store.subscriber_count(), 1);
    drop(monitor);
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn collection_filter_skips_foreign_events() {
    let tasks = store();
    let flag = DirtyFlag::clean();
    let mut monitor = ChangeMonitor::new(flag.clone(), Some("notes".to_string()));
    monitor.start(tasks.as_ref());

    tasks.put("t1", json!({}));

    assert!(!flag.is_dirty());
    assert_eq!(monitor.observed(), 0);
}

#[test]
fn listener_on_another_thread_only_touches_the_flag() {
    let store = store();
    let flag = DirtyFlag::clean();
    let mut monitor = ChangeMonitor::new(flag.clone(), None);
    monitor.start(store.as_ref());

    let writer = Arc::clone(&store);
    std::thread::spawn(move || {
        for i in 0..10 {
            writer.put(format!("t{i}"), json!({ "i": i }));
        }
    })
    .join()
    .unwrap();

    assert!(flag.is_dirty());
    assert_eq!(monitor.observed(), 10);
}
