//! Section partitioning — one linear scan over an already sorted fetch.
//!
//! Each distinct key becomes one section, in order of first appearance, whose
//! elements are the inclusive span from the key's first to its last position.
//! When the sort keeps equal keys adjacent the spans are disjoint and cover
//! the input exactly. When it does not, a span also takes in the foreign
//! records that sit between its ends: `[A, A, B, B, A]` yields `A = [A, A, B,
//! B, A]` and `B = [B, B]`. That span rule is intentional and must not be
//! replaced by a regrouping pass.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{KeyError, PartitionInconsistency};

use super::results::Section;

/// Output of [`try_partition`].
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<K, R> {
    pub sections: Vec<Section<K, R>>,
    /// Records whose key could not be extracted. They own no section but can
    /// still fall inside another key's span.
    pub inconsistencies: Vec<PartitionInconsistency>,
}

/// Partition `records` by an infallible key accessor.
pub fn partition<K, R, F>(records: &[R], key_of: F) -> Vec<Section<K, R>>
where
    K: Eq + Hash + Clone,
    R: Clone,
    F: Fn(&R) -> K,
{
    try_partition(records, |r| Ok(key_of(r))).sections
}

/// Partition `records` by a fallible key accessor.
///
/// Keys are computed exactly once per record.
pub fn try_partition<K, R, F>(records: &[R], key_of: F) -> Partition<K, R>
where
    K: Eq + Hash + Clone,
    R: Clone,
    F: Fn(&R) -> Result<K, KeyError>,
{
    let mut order: Vec<K> = Vec::new();
    let mut spans: HashMap<K, (usize, usize)> = HashMap::new();
    let mut inconsistencies = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match key_of(record) {
            Ok(key) => match spans.get_mut(&key) {
                Some(span) => span.1 = index,
                None => {
                    spans.insert(key.clone(), (index, index));
                    order.push(key);
                }
            },
            Err(source) => inconsistencies.push(PartitionInconsistency { index, source }),
        }
    }

    let sections = order
        .into_iter()
        .filter_map(|key| {
            let (first, last) = spans.get(&key).copied()?;
            Some(Section::new(key, records[first..=last].to_vec()))
        })
        .collect();

    Partition {
        sections,
        inconsistencies,
    }
}
