pub mod error;

pub mod query;
pub mod reactive;
pub mod sectioned;
pub mod store;

pub use error::{FetchError, KeyError, PartitionInconsistency, QueryError, StoreError};
pub use sectioned::{
    field_key, section_key, ConfigurationHandle, ControllerOptions, Diagnostic, Evaluation,
    FetchFailurePolicy, QueryConfiguration, Section, SectionedQuery, SectionedResults,
};
pub use store::{ChangeSource, MemoryStore, RecordStore};
