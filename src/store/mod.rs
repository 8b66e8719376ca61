//! Record stores and change sources.
//!
//! - [`traits`] — [`RecordStore`] and [`ChangeSource`] collaborator contracts.
//! - [`memory`] — [`MemoryStore`], an in-process JSON document store.
//! - [`broadcast`] — [`BroadcastChangeSource`] over a tokio broadcast channel.
//! - `sqlite` — `SqliteStore` (feature `sqlite`).

pub mod broadcast;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;

pub use broadcast::BroadcastChangeSource;
pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
pub use traits::{ChangeListener, ChangeSource, RecordStore, Unsubscribe};
