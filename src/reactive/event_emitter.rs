//! EventEmitter<T> — a simple typed pub/sub primitive.
//!
//! Listeners are stored as `Arc<dyn Fn(&T)>` so snapshots are cheap.
//! Snapshot-on-emit semantics mean:
//!   - A listener removed *during* emission is still called in that round.
//!   - A listener added *during* emission is NOT called until the next emit.
//!
//! Panics inside a listener propagate out of [`EventEmitter::emit`].
//! [`EventEmitter::emit_isolated`] catches each listener's panic on its own,
//! so the listeners after it still see the event.
//!
//! All methods take `&self` (interior mutability via `parking_lot::Mutex`),
//! so listeners may call `on()`/`off()` during `emit()` without deadlocking.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// A listener ID returned by [`EventEmitter::on`] that can be passed to
/// [`EventEmitter::off`] to remove the listener.
pub type ListenerId = u64;

/// Closure type for event listeners.
pub type ListenerFn<T> = dyn Fn(&T) + Send + Sync;

/// Typed synchronous event emitter.
pub struct EventEmitter<T> {
    listeners: Mutex<Vec<(ListenerId, Arc<ListenerFn<T>>)>>,
    next_id: AtomicU64,
}

impl<T> EventEmitter<T> {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register `callback` and return its [`ListenerId`].
    pub fn on(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> ListenerId {
        self.on_shared(Arc::new(callback))
    }

    /// Register an already shared callback.
    pub fn on_shared(&self, callback: Arc<ListenerFn<T>>) -> ListenerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((id, callback));
        id
    }

    /// Remove the listener identified by `id`. Returns whether it was present.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Emit `event` to all currently registered listeners and return how many
    /// were called.
    ///
    /// The lock is released before any callback runs.
    pub fn emit(&self, event: &T) -> usize {
        let snapshot: Vec<Arc<ListenerFn<T>>> = {
            let guard = self.listeners.lock();
            guard.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        for cb in &snapshot {
            cb(event);
        }
        snapshot.len()
    }

    /// Like [`emit`](Self::emit), but every listener runs under its own
    /// `catch_unwind`. Returns how many listeners panicked.
    pub fn emit_isolated(&self, event: &T) -> usize {
        let snapshot: Vec<Arc<ListenerFn<T>>> = {
            let guard = self.listeners.lock();
            guard.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        let mut panicked = 0;
        for cb in &snapshot {
            let delivered = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| cb(event)));
            if delivered.is_err() {
                panicked += 1;
            }
        }
        panicked
    }

    /// Number of currently registered listeners.
    pub fn size(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Drop every listener.
    pub fn clear(&self) {
        self.listeners.lock().clear();
    }
}

impl<T> Default for EventEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}
