//! SqliteStore — JSON documents persisted in SQLite.
//!
//! One `records` table holds every collection; rows are keyed by
//! `(collection, id)` and scanned in insertion order. Filtering and sorting
//! run in process over the scanned rows, so `fetch` behaves exactly like
//! [`MemoryStore`](super::MemoryStore).

use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::params;
use serde_json::Value;

use crate::error::{FetchError, StoreError};
use crate::query::execute::execute_fetch;
use crate::query::types::{Predicate, SortEntry};
use crate::reactive::{ChangeEvent, EventEmitter};

use super::traits::{ChangeListener, ChangeSource, RecordStore, Unsubscribe};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS records (
    seq        INTEGER PRIMARY KEY AUTOINCREMENT,
    collection TEXT NOT NULL,
    id         TEXT NOT NULL,
    data       TEXT NOT NULL,
    UNIQUE (collection, id)
);";

/// SQLite-backed [`RecordStore`] + [`ChangeSource`] for a single collection.
pub struct SqliteStore {
    conn: Mutex<rusqlite::Connection>,
    collection: String,
    emitter: Arc<EventEmitter<ChangeEvent>>,
}

impl SqliteStore {
    /// Open (or create) a file-backed database.
    pub fn open(path: &str, collection: impl Into<String>) -> Result<Self, StoreError> {
        Self::with_connection(rusqlite::Connection::open(path)?, collection)
    }

    /// Open an in-memory database (useful for tests).
    pub fn open_in_memory(collection: impl Into<String>) -> Result<Self, StoreError> {
        Self::with_connection(rusqlite::Connection::open_in_memory()?, collection)
    }

    fn with_connection(
        conn: rusqlite::Connection,
        collection: impl Into<String>,
    ) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            collection: collection.into(),
            emitter: Arc::new(EventEmitter::new()),
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Insert or replace the record stored under `id`.
    pub fn put(&self, id: impl Into<String>, data: &Value) -> Result<(), StoreError> {
        let id = id.into();
        let encoded = encode(&id, data)?;
        self.conn.lock().execute(
            "INSERT INTO records (collection, id, data) VALUES (?1, ?2, ?3)
             ON CONFLICT (collection, id) DO UPDATE SET data = excluded.data",
            params![self.collection, id, encoded],
        )?;
        self.emit_event(ChangeEvent::Put {
            collection: self.collection.clone(),
            id,
        });
        Ok(())
    }

    /// Insert or replace several records in one transaction.
    pub fn bulk_put(&self, entries: &[(String, Value)]) -> Result<(), StoreError> {
        if entries.is_empty() {
            return Ok(());
        }
        {
            let mut conn = self.conn.lock();
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO records (collection, id, data) VALUES (?1, ?2, ?3)
                     ON CONFLICT (collection, id) DO UPDATE SET data = excluded.data",
                )?;
                for (id, data) in entries {
                    stmt.execute(params![self.collection, id, encode(id, data)?])?;
                }
            }
            tx.commit()?;
        }
        self.emit_event(ChangeEvent::Bulk {
            collection: self.collection.clone(),
            ids: entries.iter().map(|(id, _)| id.clone()).collect(),
        });
        Ok(())
    }

    /// Remove the record stored under `id`. Returns whether it existed.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let removed = self.conn.lock().execute(
            "DELETE FROM records WHERE collection = ?1 AND id = ?2",
            params![self.collection, id],
        )? > 0;
        if removed {
            self.emit_event(ChangeEvent::Delete {
                collection: self.collection.clone(),
                id: id.to_string(),
            });
        }
        Ok(removed)
    }

    /// Scan every record of the collection in insertion order.
    fn scan(&self) -> Result<Vec<Value>, FetchError> {
        let rows: Vec<(String, String)> = {
            let conn = self.conn.lock();
            let mut stmt =
                conn.prepare("SELECT id, data FROM records WHERE collection = ?1 ORDER BY seq")?;
            let rows = stmt.query_map(params![self.collection], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?;
            let collected = rows.collect::<rusqlite::Result<Vec<_>>>()?;
            collected
        };

        rows.into_iter()
            .map(|(id, data)| {
                serde_json::from_str(&data).map_err(|source| FetchError::Corruption {
                    collection: self.collection.clone(),
                    id,
                    source,
                })
            })
            .collect()
    }

    fn emit_event(&self, event: ChangeEvent) {
        let panicked = self.emitter.emit_isolated(&event);
        if panicked > 0 {
            tracing::warn!(collection = %self.collection, ?event, panicked, "change listener panicked");
        }
    }
}

fn encode(id: &str, data: &Value) -> Result<String, StoreError> {
    serde_json::to_string(data).map_err(|source| StoreError::Encode {
        id: id.to_string(),
        source,
    })
}

impl RecordStore for SqliteStore {
    type Record = Value;

    fn fetch(
        &self,
        predicate: Option<&Predicate>,
        sort: &[SortEntry],
    ) -> Result<Vec<Value>, FetchError> {
        let scanned = self.scan()?;
        Ok(execute_fetch(scanned, predicate, sort)?)
    }
}

impl ChangeSource for SqliteStore {
    fn subscribe(&self, listener: ChangeListener) -> Unsubscribe {
        let listener_id = self.emitter.on_shared(listener);
        let emitter = Arc::clone(&self.emitter);

        Box::new(move || {
            emitter.off(listener_id);
        })
    }
}
