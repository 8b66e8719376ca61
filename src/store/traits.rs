//! Collaborator traits for the persistence engine.
//!
//! [`RecordStore`] runs a filtered, sorted fetch; [`ChangeSource`] delivers
//! change notifications. A store usually implements both, but a controller
//! can pair a store with a separate change source.

use std::sync::Arc;

use crate::error::FetchError;
use crate::query::types::{Predicate, SortEntry};
use crate::reactive::event::ChangeEvent;

/// An owned one-shot closure that cancels a subscription when called.
pub type Unsubscribe = Box<dyn FnOnce() + Send + Sync>;

/// Callback invoked for every change notification.
pub type ChangeListener = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

/// A store that can produce an ordered, filtered sequence of records.
///
/// Implementors must be `Send + Sync` so they can be shared across threads.
pub trait RecordStore: Send + Sync {
    type Record: Clone + Send + Sync + 'static;

    /// Fetch every record matching `predicate`, ordered by `sort`.
    ///
    /// An empty `sort` returns records in the store's natural order.
    fn fetch(
        &self,
        predicate: Option<&Predicate>,
        sort: &[SortEntry],
    ) -> Result<Vec<Self::Record>, FetchError>;
}

/// A stream of change notifications.
pub trait ChangeSource: Send + Sync {
    /// Register `listener`. The returned closure removes it.
    fn subscribe(&self, listener: ChangeListener) -> Unsubscribe;
}

impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    type Record = T::Record;

    fn fetch(
        &self,
        predicate: Option<&Predicate>,
        sort: &[SortEntry],
    ) -> Result<Vec<Self::Record>, FetchError> {
        (**self).fetch(predicate, sort)
    }
}

impl<T: ChangeSource + ?Sized> ChangeSource for Arc<T> {
    fn subscribe(&self, listener: ChangeListener) -> Unsubscribe {
        (**self).subscribe(listener)
    }
}
