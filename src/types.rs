//! Core types for the state container.

use crate::error::{Result, StoreError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Optional argument handed to a mutation or getter.
///
/// Carries the name of the operation it was passed to so decode failures
/// can say which mutation or getter rejected it.
#[derive(Clone, Debug, PartialEq)]
pub struct Payload {
    name: String,
    value: Option<Value>,
}

impl Payload {
    /// A payload for `name` with no value.
    pub fn none(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// A payload for `name` carrying `value`.
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
        }
    }

    /// Encode any serializable value as the payload for `name`.
    pub fn encode(name: impl Into<String>, value: &impl Serialize) -> Result<Self> {
        let name = name.into();
        let value = serde_json::to_value(value).map_err(|e| StoreError::InvalidPayload {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(name, value))
    }

    /// Name of the mutation or getter this payload belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// The raw payload value, if any.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Decode the payload into `P`.
    ///
    /// A missing payload decodes as JSON `null`, so `Option<P>` and `()`
    /// accept it while required types report it as invalid.
    pub fn parse<P: DeserializeOwned>(&self) -> Result<P> {
        let value = self.value.clone().unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|e| StoreError::InvalidPayload {
            name: self.name.clone(),
            reason: e.to_string(),
        })
    }
}

/// Top-level keys whose value changed across a commit, with their new values.
///
/// A key removed by the commit is reported with a `null` value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Changes(Map<String, Value>);

impl Changes {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub(crate) fn insert(&mut self, key: String, value: Value) {
        self.0.insert(key, value);
    }

    /// New value for `key`, if it changed.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Changed keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The diff as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Decode the diff into a partial view of the state, typically a struct
    /// whose fields are all `Option`.
    pub fn into_partial<P: DeserializeOwned>(self) -> Result<P> {
        Ok(serde_json::from_value(Value::Object(self.0))?)
    }
}

/// A single notification delivered through a channel subscription.
#[derive(Clone, Debug)]
pub struct StateChange<T> {
    /// State immediately before the commit.
    pub previous: T,
    /// What the commit changed.
    pub changes: Changes,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_parse() {
        let payload = Payload::new("increment", json!(3));
        let n: i64 = payload.parse().unwrap();
        assert_eq!(n, 3);
        assert_eq!(payload.name(), "increment");
    }

    #[test]
    fn test_missing_payload_as_option() {
        let payload = Payload::none("reset");
        assert!(payload.is_empty());
        let v: Option<i64> = payload.parse().unwrap();
        assert_eq!(v, None);
    }

    #[test]
    fn test_missing_payload_for_required_type() {
        let payload = Payload::none("increment");
        let result = payload.parse::<i64>();
        match result {
            Err(StoreError::InvalidPayload { name, .. }) => assert_eq!(name, "increment"),
            other => panic!("Expected InvalidPayload, got {:?}", other),
        }
    }

    #[test]
    fn test_changes_into_partial() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct PartialCounter {
            count: Option<i64>,
            name: Option<String>,
        }

        let mut changes = Changes::new();
        changes.insert("count".to_string(), json!(5));

        let partial: PartialCounter = changes.into_partial().unwrap();
        assert_eq!(
            partial,
            PartialCounter {
                count: Some(5),
                name: None
            }
        );
    }
}
