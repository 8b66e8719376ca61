//! Filter operator evaluation for predicates.
//! MongoDB-style semantics with array lifting on comparison operators.

use std::cmp::Ordering;
use std::collections::HashMap;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::QueryError;

type OpResult = std::result::Result<bool, QueryError>;

// ============================================================================
// Value Comparison
// ============================================================================

/// Compare two JSON values for ordering.
///
/// - Both Null → Equal
/// - a is Null → Greater (nulls sort to end)
/// - b is Null → Less
/// - Both numbers → f64 comparison (NaN treated as Equal)
/// - Both strings → lexicographic (codepoint order)
/// - Both booleans → false < true
/// - Cross-type → type rank: number(0), string(1), bool(2), other(3)
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(na), Value::Number(nb)) => {
            let fa = na.as_f64().unwrap_or(f64::NAN);
            let fb = nb.as_f64().unwrap_or(f64::NAN);
            fa.partial_cmp(&fb).unwrap_or(Ordering::Equal)
        }
        (Value::String(sa), Value::String(sb)) => sa.cmp(sb),
        (Value::Bool(ba), Value::Bool(bb)) => ba.cmp(bb),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Number(_) => 0,
        Value::String(_) => 1,
        Value::Bool(_) => 2,
        _ => 3,
    }
}

/// Returns the operator map if `value` is a non-empty object whose keys all start with `$`.
fn as_operator(value: &Value) -> Option<&Map<String, Value>> {
    value
        .as_object()
        .filter(|obj| !obj.is_empty() && obj.keys().all(|k| k.starts_with('$')))
}

// ============================================================================
// Field Path Resolution
// ============================================================================

/// Get a nested value from a record using a dot-separated path.
/// Returns `None` if any path segment is missing or the parent is not an object.
pub fn get_field_value<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for part in path.split('.') {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

// ============================================================================
// Regex Cache
// ============================================================================

/// `$regex` patterns compiled once and reused across the records of a fetch.
#[derive(Debug, Default)]
pub struct RegexCache {
    compiled: HashMap<String, Regex>,
}

impl RegexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct patterns compiled so far.
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    fn get(&mut self, pattern: &str) -> Result<&Regex, QueryError> {
        if !self.compiled.contains_key(pattern) {
            let re = Regex::new(pattern).map_err(|e| QueryError::InvalidRegex(e.to_string()))?;
            self.compiled.insert(pattern.to_string(), re);
        }
        Ok(&self.compiled[pattern])
    }
}

// ============================================================================
// Operator Evaluation
// ============================================================================

fn ordered(value: &Value, operand: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    if value.is_null() || operand.is_null() {
        return false;
    }
    accept(compare_values(value, operand))
}

fn contains_any(value: &Value, items: &[Value]) -> bool {
    match value.as_array() {
        Some(arr) => arr.iter().any(|v| items.contains(v)),
        None => items.contains(value),
    }
}

/// Evaluate a single scalar operator (no array lifting).
fn evaluate_scalar_operator(
    value: &Value,
    op: &str,
    operand: &Value,
    regexes: &mut RegexCache,
) -> OpResult {
    match op {
        "$eq" => Ok(value == operand),
        "$ne" => Ok(value != operand),
        "$gt" => Ok(ordered(value, operand, |o| o == Ordering::Greater)),
        "$gte" => Ok(ordered(value, operand, |o| o != Ordering::Less)),
        "$lt" => Ok(ordered(value, operand, |o| o == Ordering::Less)),
        "$lte" => Ok(ordered(value, operand, |o| o != Ordering::Greater)),
        "$in" => Ok(operand
            .as_array()
            .is_some_and(|items| contains_any(value, items))),
        "$nin" => Ok(operand
            .as_array()
            .map_or(true, |items| !contains_any(value, items))),
        "$regex" => {
            let (Some(text), Some(pattern)) = (value.as_str(), operand.as_str()) else {
                return Ok(false);
            };
            Ok(regexes.get(pattern)?.is_match(text))
        }
        other => Err(QueryError::UnknownOperator(other.to_string())),
    }
}

/// Liftable operators: when value is array and operand is scalar, ANY element must match.
const LIFTABLE_OPS: &[&str] = &["$eq", "$gt", "$gte", "$lt", "$lte"];

/// Evaluate a single operator with array lifting for liftable ops.
fn evaluate_single_operator(
    value: &Value,
    op: &str,
    operand: &Value,
    regexes: &mut RegexCache,
) -> OpResult {
    if let Some(arr) = value.as_array() {
        if !operand.is_array() {
            if LIFTABLE_OPS.contains(&op) {
                for elem in arr {
                    if evaluate_scalar_operator(elem, op, operand, regexes)? {
                        return Ok(true);
                    }
                }
                return Ok(false);
            }
            if op == "$ne" {
                for elem in arr {
                    if !evaluate_scalar_operator(elem, op, operand, regexes)? {
                        return Ok(false);
                    }
                }
                return Ok(true);
            }
        }
    }
    evaluate_scalar_operator(value, op, operand, regexes)
}

/// Evaluate an operator object `{ $op: operand, ... }` against a field.
///
/// `$exists` needs the `Option` to tell a present-but-null field from an absent one.
fn evaluate_operators(
    value: Option<&Value>,
    ops: &Map<String, Value>,
    regexes: &mut RegexCache,
) -> OpResult {
    for (op, operand) in ops {
        if op == "$exists" {
            let want_exists = operand.as_bool().unwrap_or(false);
            if want_exists != value.is_some() {
                return Ok(false);
            }
            continue;
        }
        if !evaluate_single_operator(value.unwrap_or(&Value::Null), op, operand, regexes)? {
            return Ok(false);
        }
    }
    Ok(true)
}

// ============================================================================
// Filter Evaluation
// ============================================================================

/// Evaluate a MongoDB-style filter against a record.
///
/// Logical operators (`$and`, `$or`, `$not`) are evaluated first, then field
/// conditions (implicit AND). A non-object filter matches everything.
pub fn matches_filter(record: &Value, filter: &Value) -> OpResult {
    matches_filter_with(record, filter, &mut RegexCache::new())
}

/// [`matches_filter`] reusing compiled `$regex` patterns from `regexes`.
pub fn matches_filter_with(record: &Value, filter: &Value, regexes: &mut RegexCache) -> OpResult {
    let Some(filter_obj) = filter.as_object() else {
        return Ok(true);
    };

    if let Some(subs) = filter_obj.get("$and").and_then(Value::as_array) {
        for sub in subs {
            if !matches_filter_with(record, sub, regexes)? {
                return Ok(false);
            }
        }
    }

    if let Some(subs) = filter_obj.get("$or").and_then(Value::as_array) {
        let mut any_match = false;
        for sub in subs {
            if matches_filter_with(record, sub, regexes)? {
                any_match = true;
                break;
            }
        }
        if !any_match {
            return Ok(false);
        }
    }

    if let Some(not_val) = filter_obj.get("$not") {
        if matches_filter_with(record, not_val, regexes)? {
            return Ok(false);
        }
    }

    for (key, condition) in filter_obj {
        match key.as_str() {
            "$and" | "$or" | "$not" => continue,
            k if k.starts_with('$') => {
                return Err(QueryError::UnknownOperator(k.to_string()));
            }
            _ => {}
        }

        let value = get_field_value(record, key);
        let matched = match as_operator(condition) {
            Some(ops) => evaluate_operators(value, ops, regexes)?,
            None => {
                evaluate_single_operator(value.unwrap_or(&Value::Null), "$eq", condition, regexes)?
            }
        };
        if !matched {
            return Ok(false);
        }
    }

    Ok(true)
}

// ============================================================================
// Tests (inline unit tests)
// ============================================================================
