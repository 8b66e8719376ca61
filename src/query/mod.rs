//! In-process query evaluation used by the bundled record stores.
//!
//! - [`types`] — sort entries and the JSON [`Predicate`](types::Predicate).
//! - [`operators`] — filter operator evaluation and value ordering.
//! - [`execute`] — filter-then-sort over a scanned collection.

pub mod execute;
pub mod operators;
pub mod types;

pub use execute::{execute_fetch, sort_records};
pub use operators::{
    compare_values, get_field_value, matches_filter, matches_filter_with, RegexCache,
};
pub use types::{normalize_sort, Predicate, SortDirection, SortEntry, SortInput};
