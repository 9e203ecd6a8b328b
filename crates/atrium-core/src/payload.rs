//! State payload handed to client components.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Server-computed key-value state attached to one rendered view.
///
/// Keys keep their insertion order when serialized.
///
/// # Example
///
/// ```
/// use atrium_core::StatePayload;
///
/// let payload = StatePayload::new().with("currentUser", "dave");
/// assert_eq!(payload.get("currentUser").and_then(|v| v.as_str()), Some("dave"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatePayload(Map<String, Value>);

impl StatePayload {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any previous value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the payload with one more entry.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the payload has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for StatePayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<StatePayload> for Value {
    fn from(payload: StatePayload) -> Self {
        Value::Object(payload.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces() {
        let mut payload = StatePayload::new();
        payload.insert("k", 1);
        payload.insert("k", 2);
        assert_eq!(payload.len(), 1);
        assert_eq!(payload.get("k"), Some(&Value::from(2)));
    }

    #[test]
    fn test_serializes_as_object() {
        let payload = StatePayload::new().with("currentUser", "dave");
        assert_eq!(serde_json::to_string(&payload).unwrap(), r#"{"currentUser":"dave"}"#);
    }

    #[test]
    fn test_keeps_insertion_order() {
        let payload = StatePayload::new().with("zeta", 1).with("alpha", 2);
        assert_eq!(serde_json::to_string(&payload).unwrap(), r#"{"zeta":1,"alpha":2}"#);
    }

    #[test]
    fn test_null_values() {
        let payload = StatePayload::new().with("currentUser", Value::Null);
        assert_eq!(payload.get("currentUser"), Some(&Value::Null));
        assert!(!payload.is_empty());
    }
}
