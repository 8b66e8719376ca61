//! Fetch execution — scan-and-filter followed by a stable multi-key sort.

use serde_json::Value;

use crate::error::QueryError;

use super::operators::{compare_values, get_field_value, matches_filter_with, RegexCache};
use super::types::{Predicate, SortDirection, SortEntry};

// ============================================================================
// Sorting
// ============================================================================

/// Sort records by multiple fields with cascading priority.
///
/// The sort is stable: records that compare equal on every entry keep their
/// scan order.
pub fn sort_records(mut records: Vec<Value>, sort: &[SortEntry]) -> Vec<Value> {
    if sort.is_empty() {
        return records;
    }

    records.sort_by(|a, b| {
        for entry in sort {
            let va = get_field_value(a, &entry.field).unwrap_or(&Value::Null);
            let vb = get_field_value(b, &entry.field).unwrap_or(&Value::Null);
            let cmp = compare_values(va, vb);
            if cmp != std::cmp::Ordering::Equal {
                return if entry.direction == SortDirection::Desc {
                    cmp.reverse()
                } else {
                    cmp
                };
            }
        }
        std::cmp::Ordering::Equal
    });

    records
}

// ============================================================================
// Fetch Execution
// ============================================================================

/// Run a fetch against scanned records:
///
/// 1. Apply the predicate (if present). `$regex` patterns compile once per call.
/// 2. Sort by `sort` entries.
pub fn execute_fetch(
    records: Vec<Value>,
    predicate: Option<&Predicate>,
    sort: &[SortEntry],
) -> Result<Vec<Value>, QueryError> {
    let filtered = match predicate {
        Some(filter) => {
            let mut regexes = RegexCache::new();
            let mut kept = Vec::with_capacity(records.len());
            for record in records {
                if matches_filter_with(&record, filter, &mut regexes)? {
                    kept.push(record);
                }
            }
            kept
        }
        None => records,
    };

    Ok(sort_records(filtered, sort))
}
