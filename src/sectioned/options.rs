//! Controller options.

use serde::{Deserialize, Serialize};

/// What a controller does when the store fails to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailurePolicy {
    /// Replace the cached results with an empty snapshot and clear dirty.
    /// A persistently failing store is not re-fetched until something else
    /// marks the query dirty.
    #[default]
    ResetToEmpty,
    /// Keep the previous snapshot and stay dirty, so every evaluation
    /// opportunity retries the fetch.
    RetryNextOpportunity,
}

/// Options for [`SectionedQuery`](super::SectionedQuery).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerOptions {
    pub failure_policy: FetchFailurePolicy,
    /// Subscribe to the change source on the first evaluation opportunity.
    pub monitor_changes: bool,
    /// Only change events for this collection mark the query dirty.
    pub collection: Option<String>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            failure_policy: FetchFailurePolicy::default(),
            monitor_changes: true,
            collection: None,
        }
    }
}
