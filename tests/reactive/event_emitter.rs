//! Tests for `EventEmitter<T>`.

use sectioned_query::reactive::EventEmitter;
use std::sync::{Arc, Mutex};

/// Helper: create a shared call-log that listeners append to.
fn make_log() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

// ============================================================================
// Basic subscription
// ============================================================================

#[test]
fn emit_calls_listeners_in_registration_order() {
    let emitter: EventEmitter<i32> = EventEmitter::new();
    let log = make_log();

    for name in ["a", "b", "c"] {
        let log = Arc::clone(&log);
        emitter.on(move |e| log.lock().unwrap().push(format!("{name}:{e}")));
    }

    let called = emitter.emit(&1);

    assert_eq!(called, 3);
    assert_eq!(*log.lock().unwrap(), vec!["a:1", "b:1", "c:1"]);
}

#[test]
fn on_shared_registers_an_existing_arc() {
    let emitter: EventEmitter<i32> = EventEmitter::new();
    let log = make_log();
    let log_clone = Arc::clone(&log);
    let listener: Arc<dyn Fn(&i32) + Send + Sync> =
        Arc::new(move |e: &i32| log_clone.lock().unwrap().push(format!("{e}")));

    emitter.on_shared(Arc::clone(&listener));
    emitter.on_shared(listener);
    emitter.emit(&7);

    assert_eq!(*log.lock().unwrap(), vec!["7", "7"]);
}

// ============================================================================
// Unsubscription
// ============================================================================

#[test]
fn off_removes_listener_and_reports_presence() {
    let emitter: EventEmitter<i32> = EventEmitter::new();
    let log = make_log();
    let log_clone = Arc::clone(&log);

    let id = emitter.on(move |e| log_clone.lock().unwrap().push(format!("{e}")));
    assert!(emitter.off(id));
    assert!(!emitter.off(id), "second removal is a no-op");
    emitter.emit(&99);

    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn clear_drops_every_listener() {
    let emitter: EventEmitter<i32> = EventEmitter::new();
    emitter.on(|_| {});
    emitter.on(|_| {});
    assert_eq!(emitter.size(), 2);

    emitter.clear();
    assert_eq!(emitter.size(), 0);
    assert_eq!(emitter.emit(&1), 0);
}

// ============================================================================
// Snapshot semantics during emit
// ============================================================================

#[test]
fn listener_added_during_emit_waits_for_next_emission() {
    let emitter: Arc<EventEmitter<i32>> = Arc::new(EventEmitter::new());
    let log = make_log();

    {
        let emitter_clone = Arc::clone(&emitter);
        let log_clone = Arc::clone(&log);
        emitter.on(move |_e| {
            log_clone.lock().unwrap().push("first".to_string());
            let log2 = Arc::clone(&log_clone);
            emitter_clone.on(move |_| log2.lock().unwrap().push("second".to_string()));
        });
    }

    emitter.emit(&1);

    let log_guard = log.lock().unwrap();
    assert_eq!(*log_guard, vec!["first"]);
}

#[test]
fn listener_removed_during_emit_still_runs_that_round() {
    let emitter: Arc<EventEmitter<i32>> = Arc::new(EventEmitter::new());
    let log = make_log();

    let first_log = Arc::clone(&log);
    let id1 = emitter.on(move |e| first_log.lock().unwrap().push(format!("first:{e}")));

    let emitter_clone = Arc::clone(&emitter);
    let second_log = Arc::clone(&log);
    emitter.on(move |e| {
        second_log.lock().unwrap().push(format!("second:{e}"));
        emitter_clone.off(id1);
    });

    emitter.emit(&1);
    emitter.emit(&2);

    assert_eq!(
        *log.lock().unwrap(),
        vec!["first:1", "second:1", "second:2"]
    );
}

#[test]
fn panicking_listener_propagates_to_emitter_caller() {
    let emitter: EventEmitter<i32> = EventEmitter::new();
    emitter.on(|_| panic!("listener panics"));

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        emitter.emit(&1);
    }));
    assert!(result.is_err());
}

#[test]
fn emit_isolated_keeps_calling_listeners_after_a_panic() {
    let emitter: EventEmitter<i32> = EventEmitter::new();
    let log = make_log();

    emitter.on(|_| panic!("listener panics"));
    let l = Arc::clone(&log);
    emitter.on(move |e: &i32| l.lock().unwrap().push(format!("after:{e}")));

    let panicked = emitter.emit_isolated(&7);

    assert_eq!(panicked, 1);
    assert_eq!(*log.lock().unwrap(), vec!["after:7"]);
}
