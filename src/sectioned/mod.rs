//! Sectioned queries — partition a sorted fetch into keyed sections and keep
//! the result live.
//!
//! - [`partition`] — one-scan span partitioner.
//! - [`results`] — [`Section`] and [`SectionedResults`] snapshots.
//! - [`config`] — [`QueryConfiguration`] and its [`ConfigurationHandle`].
//! - [`options`] — [`ControllerOptions`].
//! - [`controller`] — [`SectionedQuery`], the evaluate/fetch/partition cycle.

pub mod config;
pub mod controller;
pub mod options;
pub mod partition;
pub mod results;

pub use config::{field_key, section_key, ConfigurationHandle, QueryConfiguration, SectionKeyFn};
pub use controller::{Diagnostic, DiagnosticFn, Evaluation, SectionedQuery};
pub use options::{ControllerOptions, FetchFailurePolicy};
pub use partition::{partition, try_partition, Partition};
pub use results::{Section, SectionedResults};
