//! Query type definitions: predicate and sort order.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MongoDB-style filter document, e.g. `{ "done": false, "priority": { "$gte": 2 } }`.
pub type Predicate = Value;

// ============================================================================
// Sort Types
// ============================================================================

/// Sort direction for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// A sort specification for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortEntry {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortEntry {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Sort input — either a shorthand field name (ascending) or explicit entries.
#[derive(Debug, Clone)]
pub enum SortInput {
    /// Single field name, sorts ascending.
    Field(String),
    /// Explicit ordered sort entries.
    Entries(Vec<SortEntry>),
}

impl From<&str> for SortInput {
    fn from(field: &str) -> Self {
        Self::Field(field.to_string())
    }
}

impl From<String> for SortInput {
    fn from(field: String) -> Self {
        Self::Field(field)
    }
}

impl From<SortEntry> for SortInput {
    fn from(entry: SortEntry) -> Self {
        Self::Entries(vec![entry])
    }
}

impl From<Vec<SortEntry>> for SortInput {
    fn from(entries: Vec<SortEntry>) -> Self {
        Self::Entries(entries)
    }
}

/// Normalize sort input to a vec of SortEntry.
pub fn normalize_sort(sort: Option<SortInput>) -> Vec<SortEntry> {
    match sort {
        None => Vec::new(),
        Some(SortInput::Field(f)) => vec![SortEntry::asc(f)],
        Some(SortInput::Entries(e)) => e,
    }
}
