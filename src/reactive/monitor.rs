//! ChangeMonitor — turns change notifications into a dirty flag.
//!
//! # Threading model
//!
//! The listener runs on whatever thread or task the change source delivers
//! on. It touches nothing but the [`DirtyFlag`], an `AtomicBool` shared with
//! the owning controller, so the owner's configuration and cached results are
//! never written from the listener.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::store::traits::{ChangeListener, ChangeSource, Unsubscribe};

use super::event::ChangeEvent;

// ============================================================================
// DirtyFlag
// ============================================================================

/// Shared cache-validity flag. Cloning shares the same flag.
#[derive(Debug, Clone)]
pub struct DirtyFlag(Arc<AtomicBool>);

impl DirtyFlag {
    /// A flag that starts dirty.
    pub fn dirty() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    /// A flag that starts clean.
    pub fn clean() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Raise the flag. Returns `true` if it was clean before.
    pub fn mark(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }

    /// Clear the flag and return whether it was dirty.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    pub fn is_dirty(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

// ============================================================================
// ChangeMonitor
// ============================================================================

/// Holds at most one subscription to a [`ChangeSource`] and raises a
/// [`DirtyFlag`] for each relevant notification.
///
/// The subscription is cancelled by [`stop`](Self::stop) or when the monitor
/// is dropped.
pub struct ChangeMonitor {
    flag: DirtyFlag,
    collection: Option<String>,
    subscription: Option<Unsubscribe>,
    observed: Arc<AtomicU64>,
}

impl ChangeMonitor {
    /// Create a stopped monitor.
    ///
    /// With `collection` set, only events that may affect that collection
    /// raise the flag.
    pub fn new(flag: DirtyFlag, collection: Option<String>) -> Self {
        Self {
            flag,
            collection,
            subscription: None,
            observed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Subscribe to `source`. Returns `false` (and does nothing) if already
    /// running.
    pub fn start<C: ChangeSource + ?Sized>(&mut self, source: &C) -> bool {
        if self.subscription.is_some() {
            return false;
        }

        let flag = self.flag.clone();
        let collection = self.collection.clone();
        let observed = Arc::clone(&self.observed);
        let listener: ChangeListener = Arc::new(move |event: &ChangeEvent| {
            if let Some(name) = &collection {
                if !event.affects(name) {
                    return;
                }
            }
            observed.fetch_add(1, Ordering::Relaxed);
            let became_dirty = flag.mark();
            tracing::trace!(?event, became_dirty, "change notification");
        });

        self.subscription = Some(source.subscribe(listener));
        tracing::debug!(collection = ?self.collection, "change monitor started");
        true
    }

    /// Cancel the subscription. Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(unsubscribe) = self.subscription.take() {
            unsubscribe();
            tracing::debug!(collection = ?self.collection, "change monitor stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.subscription.is_some()
    }

    /// Number of relevant notifications received so far.
    pub fn observed(&self) -> u64 {
        self.observed.load(Ordering::Relaxed)
    }

    /// The flag this monitor raises.
    pub fn flag(&self) -> &DirtyFlag {
        &self.flag
    }
}

impl Drop for ChangeMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for ChangeMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeMonitor")
            .field("collection", &self.collection)
            .field("running", &self.is_running())
            .field("observed", &self.observed())
            .finish()
    }
}
