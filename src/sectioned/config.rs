//! Query configuration — section key accessor, sort order and predicate.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::KeyError;
use crate::query::operators::get_field_value;
use crate::query::types::{normalize_sort, Predicate, SortEntry, SortInput};
use crate::reactive::monitor::DirtyFlag;

/// Extracts the section key from a record.
pub type SectionKeyFn<R, K> = Arc<dyn Fn(&R) -> Result<K, KeyError> + Send + Sync>;

/// Wrap an infallible accessor as a [`SectionKeyFn`].
pub fn section_key<R, K>(f: impl Fn(&R) -> K + Send + Sync + 'static) -> SectionKeyFn<R, K>
where
    R: 'static,
    K: 'static,
{
    Arc::new(move |record: &R| Ok(f(record)))
}

/// Section JSON records by the scalar at a dot-separated `path`.
///
/// Strings are used as-is; booleans and numbers use their JSON text, except
/// that an integral float keys like the integer (`1.0` and `1` share section
/// `"1"`). A missing field, `null`, array or object is a [`KeyError`].
pub fn field_key(path: impl Into<String>) -> SectionKeyFn<Value, String> {
    let path = path.into();
    Arc::new(move |record: &Value| match get_field_value(record, &path) {
        None | Some(Value::Null) => Err(KeyError::Missing(path.clone())),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(number_key(n)),
        Some(v @ Value::Bool(_)) => Ok(v.to_string()),
        Some(other) => Err(KeyError::NotScalar {
            field: path.clone(),
            received: json_kind(other).to_string(),
        }),
    })
}

fn number_key(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 9.007_199_254_740_992e15 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// QueryConfiguration
// ============================================================================

/// Parameters for one sectioned query.
pub struct QueryConfiguration<R, K> {
    pub section_key: SectionKeyFn<R, K>,
    pub sort: Vec<SortEntry>,
    pub predicate: Option<Predicate>,
}

impl<R, K> QueryConfiguration<R, K> {
    pub fn new(section_key: SectionKeyFn<R, K>) -> Self {
        Self {
            section_key,
            sort: Vec::new(),
            predicate: None,
        }
    }

    /// Accepts a field name (ascending) or explicit [`SortEntry`]s.
    pub fn with_sort(mut self, sort: impl Into<SortInput>) -> Self {
        self.sort = normalize_sort(Some(sort.into()));
        self
    }

    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }
}

impl<R, K> Clone for QueryConfiguration<R, K> {
    fn clone(&self) -> Self {
        Self {
            section_key: Arc::clone(&self.section_key),
            sort: self.sort.clone(),
            predicate: self.predicate.clone(),
        }
    }
}

impl<R, K> fmt::Debug for QueryConfiguration<R, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryConfiguration")
            .field("sort", &self.sort)
            .field("predicate", &self.predicate)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// ConfigurationHandle
// ============================================================================

/// Read/write handle to a controller's configuration.
///
/// Every write marks the controller dirty, even when the new value equals the
/// old one. Handles are cheap to clone and all clones share state.
pub struct ConfigurationHandle<R, K> {
    config: Arc<Mutex<QueryConfiguration<R, K>>>,
    dirty: DirtyFlag,
}

impl<R, K> ConfigurationHandle<R, K> {
    pub(crate) fn new(config: Arc<Mutex<QueryConfiguration<R, K>>>, dirty: DirtyFlag) -> Self {
        Self { config, dirty }
    }

    /// A copy of the current configuration.
    pub fn get(&self) -> QueryConfiguration<R, K> {
        self.config.lock().clone()
    }

    pub fn sort(&self) -> Vec<SortEntry> {
        self.config.lock().sort.clone()
    }

    pub fn predicate(&self) -> Option<Predicate> {
        self.config.lock().predicate.clone()
    }

    pub fn section_key(&self) -> SectionKeyFn<R, K> {
        Arc::clone(&self.config.lock().section_key)
    }

    pub fn set_sort(&self, sort: impl Into<SortInput>) {
        let sort = normalize_sort(Some(sort.into()));
        self.update(|c| c.sort = sort);
    }

    pub fn set_predicate(&self, predicate: Option<Predicate>) {
        self.update(|c| c.predicate = predicate);
    }

    pub fn set_section_key(&self, section_key: SectionKeyFn<R, K>) {
        self.update(|c| c.section_key = section_key);
    }

    /// Replace the whole configuration.
    pub fn set(&self, config: QueryConfiguration<R, K>) {
        self.update(|c| *c = config);
    }

    /// Apply an arbitrary edit and mark dirty.
    pub fn update(&self, edit: impl FnOnce(&mut QueryConfiguration<R, K>)) {
        {
            let mut config = self.config.lock();
            edit(&mut *config);
        }
        self.dirty.mark();
    }
}

impl<R, K> Clone for ConfigurationHandle<R, K> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            dirty: self.dirty.clone(),
        }
    }
}
