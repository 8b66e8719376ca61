//! ChangeEvent — a write that may have changed query results.
//!
//! Emitted by record stores after each committed write so that monitors know
//! which collection changed.

/// A change notification delivered to [`ChangeSource`](crate::store::ChangeSource)
/// subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// A single record was inserted or replaced.
    Put { collection: String, id: String },
    /// A single record was removed.
    Delete { collection: String, id: String },
    /// Multiple records in a collection were written in one batch.
    Bulk {
        collection: String,
        ids: Vec<String>,
    },
    /// Every record in a collection was removed.
    Cleared { collection: String },
    /// The subscriber fell behind and `skipped` notifications were dropped.
    /// Which collections they touched is unknown.
    Lagged { skipped: u64 },
}

impl ChangeEvent {
    /// The collection that was affected, or `None` when unknown.
    pub fn collection(&self) -> Option<&str> {
        match self {
            Self::Put { collection, .. }
            | Self::Delete { collection, .. }
            | Self::Bulk { collection, .. }
            | Self::Cleared { collection } => Some(collection),
            Self::Lagged { .. } => None,
        }
    }

    /// IDs of the records that were affected (empty for collection-wide events).
    pub fn ids(&self) -> Vec<&str> {
        match self {
            Self::Put { id, .. } | Self::Delete { id, .. } => vec![id.as_str()],
            Self::Bulk { ids, .. } => ids.iter().map(|s| s.as_str()).collect(),
            Self::Cleared { .. } | Self::Lagged { .. } => Vec::new(),
        }
    }

    /// Whether this event may affect `collection`.
    ///
    /// Events of unknown scope affect every collection.
    pub fn affects(&self, collection: &str) -> bool {
        self.collection().map_or(true, |c| c == collection)
    }
}
