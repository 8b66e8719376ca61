//! Reactive layer — change notifications and cache invalidation.
//!
//! # Overview
//!
//! Record stores announce writes as [`ChangeEvent`]s. A [`ChangeMonitor`]
//! subscribes to a store's change stream on behalf of one sectioned query and
//! raises that query's [`DirtyFlag`]. The monitor never fetches; the owning
//! controller re-fetches at its next evaluation opportunity.
//!
//! # Modules
//!
//! - [`event`] — [`ChangeEvent`] enum.
//! - [`event_emitter`] — Generic typed pub/sub ([`EventEmitter<T>`]).
//! - [`monitor`] — [`ChangeMonitor`] and [`DirtyFlag`].

pub mod event;
pub mod event_emitter;
pub mod monitor;

pub use event::ChangeEvent;
pub use event_emitter::{EventEmitter, ListenerId};
pub use monitor::{ChangeMonitor, DirtyFlag};
