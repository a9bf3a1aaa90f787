//! Shallow structural diff between two states.

use crate::error::{Result, StoreError};
use crate::types::Changes;
use serde::Serialize;
use serde_json::{Map, Value};

/// Serialize `state` into its record form.
///
/// Fails with [`StoreError::Config`] if the state is not object-like.
pub fn to_record<T: Serialize>(state: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(state)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Config(format!(
            "state must be a record, got {}",
            kind_of(&other)
        ))),
    }
}

/// Compute the top-level changes between `prev` and `next`.
pub fn diff<T: Serialize>(prev: &T, next: &T) -> Result<Changes> {
    let prev = to_record(prev)?;
    let next = to_record(next)?;
    Ok(diff_records(&prev, &next))
}

/// Compute the top-level changes between two records.
///
/// Values are compared structurally, so key order inside nested objects
/// never produces a spurious change. Keys missing from `next` are reported
/// as `null`.
pub fn diff_records(prev: &Map<String, Value>, next: &Map<String, Value>) -> Changes {
    let mut changes = Changes::new();

    for (key, value) in next {
        if prev.get(key) != Some(value) {
            changes.insert(key.clone(), value.clone());
        }
    }

    for key in prev.keys() {
        if !next.contains_key(key) {
            changes.insert(key.clone(), Value::Null);
        }
    }

    changes
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
