//! MemoryStore — JSON documents held in memory, keyed by id.
//!
//! Records keep insertion order (a replaced record keeps its slot), which is
//! the order `fetch` returns when no sort is given. Every committed write is
//! announced to subscribers as a [`ChangeEvent`].

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::error::FetchError;
use crate::query::execute::execute_fetch;
use crate::query::types::{Predicate, SortEntry};
use crate::reactive::{ChangeEvent, EventEmitter};

use super::traits::{ChangeListener, ChangeSource, RecordStore, Unsubscribe};

/// In-memory [`RecordStore`] + [`ChangeSource`] for a single collection.
pub struct MemoryStore {
    collection: String,
    records: RwLock<Vec<(String, Value)>>,
    emitter: Arc<EventEmitter<ChangeEvent>>,
}

impl MemoryStore {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            records: RwLock::new(Vec::new()),
            emitter: Arc::new(EventEmitter::new()),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Insert or replace the record stored under `id`.
    pub fn put(&self, id: impl Into<String>, data: Value) {
        let id = id.into();
        {
            let mut records = self.records.write();
            upsert(&mut records, id.clone(), data);
        }
        self.emit_event(ChangeEvent::Put {
            collection: self.collection.clone(),
            id,
        });
    }

    /// Insert or replace several records, announced as one [`ChangeEvent::Bulk`].
    pub fn bulk_put(&self, entries: impl IntoIterator<Item = (String, Value)>) {
        let mut ids = Vec::new();
        {
            let mut records = self.records.write();
            for (id, data) in entries {
                ids.push(id.clone());
                upsert(&mut records, id, data);
            }
        }
        if ids.is_empty() {
            return;
        }
        self.emit_event(ChangeEvent::Bulk {
            collection: self.collection.clone(),
            ids,
        });
    }

    /// Remove the record stored under `id`. Returns whether it existed.
    pub fn delete(&self, id: &str) -> bool {
        let removed = {
            let mut records = self.records.write();
            let before = records.len();
            records.retain(|(rid, _)| rid != id);
            records.len() != before
        };
        if removed {
            self.emit_event(ChangeEvent::Delete {
                collection: self.collection.clone(),
                id: id.to_string(),
            });
        }
        removed
    }

    /// Remove every record.
    pub fn clear(&self) {
        self.records.write().clear();
        self.emit_event(ChangeEvent::Cleared {
            collection: self.collection.clone(),
        });
    }

    pub fn get(&self, id: &str) -> Option<Value> {
        self.records
            .read()
            .iter()
            .find(|(rid, _)| rid == id)
            .map(|(_, data)| data.clone())
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Number of active change subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.emitter.size()
    }

    /// Each listener's panic is caught on its own; the write stays committed
    /// and later listeners still run.
    fn emit_event(&self, event: ChangeEvent) {
        let panicked = self.emitter.emit_isolated(&event);
        if panicked > 0 {
            tracing::warn!(collection = %self.collection, ?event, panicked, "change listener panicked");
        }
    }
}

fn upsert(records: &mut Vec<(String, Value)>, id: String, data: Value) {
    match records.iter_mut().find(|(rid, _)| *rid == id) {
        Some(slot) => slot.1 = data,
        None => records.push((id, data)),
    }
}

impl RecordStore for MemoryStore {
    type Record = Value;

    fn fetch(
        &self,
        predicate: Option<&Predicate>,
        sort: &[SortEntry],
    ) -> Result<Vec<Value>, FetchError> {
        let snapshot: Vec<Value> = self
            .records
            .read()
            .iter()
            .map(|(_, data)| data.clone())
            .collect();
        Ok(execute_fetch(snapshot, predicate, sort)?)
    }
}

impl ChangeSource for MemoryStore {
    fn subscribe(&self, listener: ChangeListener) -> Unsubscribe {
        let listener_id = self.emitter.on_shared(listener);
        let emitter = Arc::clone(&self.emitter);

        Box::new(move || {
            emitter.off(listener_id);
        })
    }
}
