use thiserror::Error;

// ---------------------------------------------------------------------------
// QueryError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Invalid regex: {0}")]
    InvalidRegex(String),
}

// ---------------------------------------------------------------------------
// FetchError
// ---------------------------------------------------------------------------

/// The record store could not produce an ordered result set.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid predicate: {0}")]
    InvalidPredicate(#[from] QueryError),

    #[error("Stored record {id} in \"{collection}\" could not be decoded")]
    Corruption {
        collection: String,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// A write to a persistent record store failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record {id} could not be encoded")]
    Encode {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

// ---------------------------------------------------------------------------
// KeyError / PartitionInconsistency
// ---------------------------------------------------------------------------

/// A section key could not be read from a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("Field \"{0}\" is missing")]
    Missing(String),

    #[error("Field \"{field}\" holds {received}, expected a scalar")]
    NotScalar { field: String, received: String },

    #[error("{0}")]
    Other(String),
}

/// Key extraction failed for a record that the store had already returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Section key unavailable for record at position {index}: {source}")]
pub struct PartitionInconsistency {
    /// Position of the record in fetch order.
    pub index: usize,
    #[source]
    pub source: KeyError,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
