//! SectionedQuery — keeps a sectioned snapshot of a store query up to date.
//!
//! # State machine
//!
//! A query is either *clean* (the cached snapshot reflects the current
//! configuration and store contents) or *dirty*. It starts dirty. A
//! configuration write or a change notification makes it dirty; the host's
//! next [`on_evaluation_opportunity`](SectionedQuery::on_evaluation_opportunity)
//! fetches, partitions and swaps in a new snapshot.
//!
//! Reads through [`current_value`](SectionedQuery::current_value) never
//! trigger work. Between evaluation opportunities they keep returning the same
//! snapshot, dirty or not.
//!
//! # Threading model
//!
//! The controller has a single owner: evaluation needs `&mut self`, so a
//! snapshot can only be replaced as a whole and never observed half-built.
//! Configuration handles and the change listener only touch the shared
//! [`DirtyFlag`] (and, for handles, the configuration mutex). The flag is
//! cleared *before* the fetch starts, so a notification that arrives while a
//! fetch is in flight schedules another evaluation instead of being lost.

use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{FetchError, PartitionInconsistency};
use crate::reactive::monitor::{ChangeMonitor, DirtyFlag};
use crate::store::traits::{ChangeSource, RecordStore};

use super::config::{ConfigurationHandle, QueryConfiguration};
use super::options::{ControllerOptions, FetchFailurePolicy};
use super::partition::try_partition;
use super::results::SectionedResults;

// ============================================================================
// Diagnostics
// ============================================================================

/// A recovered fault, reported to the host's diagnostic callback.
#[derive(Debug)]
pub enum Diagnostic {
    /// The store could not be read; the fetch policy has been applied.
    FetchFailed(FetchError),
    /// A fetched record had no readable section key and owns no section.
    PartitionInconsistency(PartitionInconsistency),
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FetchFailed(e) => write!(f, "fetch failed: {e}"),
            Self::PartitionInconsistency(e) => write!(f, "partition inconsistency: {e}"),
        }
    }
}

/// Host callback for [`Diagnostic`]s.
pub type DiagnosticFn = Arc<dyn Fn(&Diagnostic) + Send + Sync>;

/// What an evaluation opportunity did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// Nothing was dirty; the snapshot is untouched.
    Clean,
    /// A new snapshot was installed.
    Refreshed {
        sections: usize,
        records: usize,
        inconsistencies: usize,
    },
    /// The fetch failed and the failure policy was applied.
    Failed,
}

// ============================================================================
// SectionedQuery
// ============================================================================

/// Live sectioned view over a [`RecordStore`] query.
pub struct SectionedQuery<S: RecordStore, K> {
    store: Arc<S>,
    changes: Arc<dyn ChangeSource>,
    config: Arc<Mutex<QueryConfiguration<S::Record, K>>>,
    results: SectionedResults<K, S::Record>,
    dirty: DirtyFlag,
    monitor: ChangeMonitor,
    options: ControllerOptions,
    on_diagnostic: Option<DiagnosticFn>,
    fetch_count: u64,
}

impl<S, K> SectionedQuery<S, K>
where
    S: RecordStore + ChangeSource + 'static,
    K: Eq + Hash + Clone,
{
    /// Query `store` and watch it for changes, with default options.
    pub fn new(store: Arc<S>, config: QueryConfiguration<S::Record, K>) -> Self {
        Self::with_options(store, config, ControllerOptions::default())
    }

    pub fn with_options(
        store: Arc<S>,
        config: QueryConfiguration<S::Record, K>,
        options: ControllerOptions,
    ) -> Self {
        let changes: Arc<dyn ChangeSource> = store.clone();
        Self::with_change_source(store, changes, config, options)
    }
}

impl<S, K> SectionedQuery<S, K>
where
    S: RecordStore,
    K: Eq + Hash + Clone,
{
    /// Query `store` but take change notifications from `changes`.
    pub fn with_change_source(
        store: Arc<S>,
        changes: Arc<dyn ChangeSource>,
        config: QueryConfiguration<S::Record, K>,
        options: ControllerOptions,
    ) -> Self {
        let dirty = DirtyFlag::dirty();
        let monitor = ChangeMonitor::new(dirty.clone(), options.collection.clone());
        Self {
            store,
            changes,
            config: Arc::new(Mutex::new(config)),
            results: SectionedResults::empty(),
            dirty,
            monitor,
            options,
            on_diagnostic: None,
            fetch_count: 0,
        }
    }

    /// Register a callback for recovered faults. Diagnostics are also logged.
    pub fn on_diagnostic(mut self, callback: impl Fn(&Diagnostic) + Send + Sync + 'static) -> Self {
        self.on_diagnostic = Some(Arc::new(callback));
        self
    }

    // -----------------------------------------------------------------------
    // Host surface
    // -----------------------------------------------------------------------

    /// The cached snapshot. Never fetches.
    pub fn current_value(&self) -> SectionedResults<K, S::Record> {
        self.results.clone()
    }

    /// Read/write access to the configuration. Writes mark the query dirty.
    pub fn configuration(&self) -> ConfigurationHandle<S::Record, K> {
        ConfigurationHandle::new(Arc::clone(&self.config), self.dirty.clone())
    }

    /// Resolve a pending dirty state, if any.
    ///
    /// The first call also starts the change monitor (unless disabled in
    /// [`ControllerOptions`]).
    pub fn on_evaluation_opportunity(&mut self) -> Evaluation {
        if self.options.monitor_changes {
            self.monitor.start(self.changes.as_ref());
        }

        if !self.dirty.take() {
            return Evaluation::Clean;
        }

        let config = self.config.lock().clone();
        self.fetch_count += 1;

        match self.store.fetch(config.predicate.as_ref(), &config.sort) {
            Ok(records) => {
                let section_key = &config.section_key;
                let partition = try_partition(&records, |record| section_key(record));
                let inconsistencies = partition.inconsistencies.len();
                for inconsistency in partition.inconsistencies {
                    tracing::warn!(
                        index = inconsistency.index,
                        error = %inconsistency.source,
                        "record has no section key; it owns no section"
                    );
                    self.report(&Diagnostic::PartitionInconsistency(inconsistency));
                }

                let evaluation = Evaluation::Refreshed {
                    sections: partition.sections.len(),
                    records: records.len(),
                    inconsistencies,
                };
                self.results = SectionedResults::new(partition.sections);
                tracing::debug!(?evaluation, fetches = self.fetch_count, "sectioned query refreshed");
                evaluation
            }
            Err(error) => {
                let policy = self.options.failure_policy;
                tracing::warn!(error = %error, ?policy, "sectioned query fetch failed");
                match policy {
                    FetchFailurePolicy::ResetToEmpty => {
                        self.results = SectionedResults::empty();
                    }
                    FetchFailurePolicy::RetryNextOpportunity => {
                        self.dirty.mark();
                    }
                }
                self.report(&Diagnostic::FetchFailed(error));
                Evaluation::Failed
            }
        }
    }

    // -----------------------------------------------------------------------
    // State
    // -----------------------------------------------------------------------

    /// Mark the query dirty. Returns `true` if it was clean.
    pub fn invalidate(&self) -> bool {
        self.dirty.mark()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_dirty()
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitor.is_running()
    }

    /// Number of fetches issued so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetch_count
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Tear down: cancels the change subscription. Dropping does the same.
    pub fn close(mut self) {
        self.monitor.stop();
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// A panicking diagnostic callback must not take the evaluation down with it.
    fn report(&self, diagnostic: &Diagnostic) {
        if let Some(callback) = &self.on_diagnostic {
            let delivered = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                callback(diagnostic);
            }));
            if delivered.is_err() {
                tracing::warn!(%diagnostic, "diagnostic callback panicked");
            }
        }
    }
}

impl<S: RecordStore, K> std::fmt::Debug for SectionedQuery<S, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionedQuery")
            .field("dirty", &self.dirty.is_dirty())
            .field("sections", &self.results.len())
            .field("monitor", &self.monitor)
            .field("options", &self.options)
            .field("fetch_count", &self.fetch_count)
            .finish_non_exhaustive()
    }
}
