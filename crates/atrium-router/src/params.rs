//! Path and query parameter storage.
//!
//! Parameters are kept in a small vector so the common case of one to four
//! parameters needs no heap allocation for the list itself.

use serde::ser::{Serialize, SerializeMap, Serializer};
use smallvec::SmallVec;

/// Maximum number of parameters stored inline (stack allocated).
const INLINE_PARAMS: usize = 4;

/// Named parameters extracted from a request, in extraction order.
///
/// Serializes as a JSON object.
///
/// # Example
///
/// ```rust
/// use atrium_router::Params;
///
/// let mut params = Params::new();
/// params.push("user-id", "2");
///
/// assert_eq!(params.get("user-id"), Some("2"));
/// assert_eq!(params.get("unknown"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl Params {
    /// Creates a new empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a params set with the given capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: SmallVec::with_capacity(capacity),
        }
    }

    /// Appends a parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Sets a parameter, replacing the value of an existing one with the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.inner.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.inner.push((name, value)),
        }
    }

    /// Returns the value for a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if a parameter with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.iter().any(|(n, _)| n == name)
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns an iterator over the parameters.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a str, &'a str);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (String, String)>,
        fn(&'a (String, String)) -> (&'a str, &'a str),
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.inner.len()))?;
        for (name, value) in &self.inner {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_new() {
        let params = Params::new();
        assert!(params.is_empty());
        assert_eq!(params.len(), 0);
    }

    #[test]
    fn test_params_push_and_get() {
        let mut params = Params::new();
        params.push("user-id", "2");
        params.push("tab", "posts");

        assert_eq!(params.get("user-id"), Some("2"));
        assert_eq!(params.get("tab"), Some("posts"));
        assert_eq!(params.get("unknown"), None);
        assert!(params.contains("tab"));
    }

    #[test]
    fn test_params_set_replaces() {
        let mut params = Params::new();
        params.set("page", "1");
        params.set("page", "2");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("page"), Some("2"));
    }

    #[test]
    fn test_params_iter_keeps_order() {
        let params: Params = vec![
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "1".to_string()),
        ]
        .into_iter()
        .collect();

        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("b", "2"), ("a", "1")]);
    }

    #[test]
    fn test_params_many_params() {
        let mut params = Params::with_capacity(2);
        for i in 0..10 {
            params.push(format!("key{i}"), format!("value{i}"));
        }

        assert_eq!(params.len(), 10);
        assert_eq!(params.get("key5"), Some("value5"));
    }

    #[test]
    fn test_params_serialize_as_object() {
        let mut params = Params::new();
        params.push("user-id", "2");
        assert_eq!(serde_json::to_string(&params).unwrap(), r#"{"user-id":"2"}"#);
        assert_eq!(serde_json::to_string(&Params::new()).unwrap(), "{}");
    }
}
