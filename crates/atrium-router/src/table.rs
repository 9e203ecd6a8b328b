//! The ordered route table.

use std::collections::HashMap;

use http::{Method, StatusCode};

use crate::error::RouteError;
use crate::params::Params;
use crate::pattern::RoutePattern;

/// A registered route: method, compiled pattern and the value it resolves to.
#[derive(Debug, Clone)]
pub struct RouteEntry<T> {
    method: Method,
    pattern: RoutePattern,
    value: T,
}

impl<T> RouteEntry<T> {
    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the compiled pattern.
    #[must_use]
    pub const fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// Returns the value registered for this route.
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }
}

/// A matched route with its extracted path parameters.
#[derive(Debug, Clone)]
pub struct RouteMatch<'a, T> {
    /// The entry that matched.
    pub entry: &'a RouteEntry<T>,
    /// Extracted path parameters.
    pub params: Params,
}

impl<'a, T> RouteMatch<'a, T> {
    /// Returns the matched entry's value.
    #[must_use]
    pub const fn value(&self) -> &'a T {
        &self.entry.value
    }

    /// Returns the matched pattern as written at registration.
    #[must_use]
    pub fn pattern(&self) -> &'a str {
        self.entry.pattern.as_str()
    }
}

/// Ordered route table.
///
/// Routes are evaluated in registration order and the **first registered
/// route wins** when several patterns match the same path. Register literal
/// routes such as `/users/me` before `/users/:user-id` if both must be
/// reachable.
///
/// Fallbacks are keyed by status code and consulted by the caller only when
/// no route matched. Registering a second fallback for the same status
/// replaces the first.
///
/// # Example
///
/// ```rust
/// use atrium_router::RouteTable;
/// use http::Method;
///
/// let mut table = RouteTable::new();
/// table.register(Method::GET, "/users/me", "current-user").unwrap();
/// table.register(Method::GET, "/users/:user-id", "user-profile").unwrap();
///
/// let m = table.match_route(&Method::GET, "/users/me").unwrap();
/// assert_eq!(*m.value(), "current-user");
///
/// let m = table.match_route(&Method::GET, "/users/2").unwrap();
/// assert_eq!(*m.value(), "user-profile");
/// assert_eq!(m.params.get("user-id"), Some("2"));
/// ```
#[derive(Debug, Clone)]
pub struct RouteTable<T> {
    entries: Vec<RouteEntry<T>>,
    fallbacks: HashMap<StatusCode, T>,
}

impl<T> Default for RouteTable<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            fallbacks: HashMap::new(),
        }
    }
}

impl<T> RouteTable<T> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a route.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPattern`] if the pattern does not compile.
    pub fn register(&mut self, method: Method, pattern: &str, value: T) -> Result<(), RouteError> {
        let pattern = RoutePattern::parse(pattern)?;
        self.entries.push(RouteEntry {
            method,
            pattern,
            value,
        });
        Ok(())
    }

    /// Registers the fallback for a status code, replacing any previous one.
    pub fn fallback(&mut self, status: StatusCode, value: T) {
        self.fallbacks.insert(status, value);
    }

    /// Returns the fallback registered for a status code.
    #[must_use]
    pub fn fallback_for(&self, status: StatusCode) -> Option<&T> {
        self.fallbacks.get(&status)
    }

    /// Finds the first route matching the method and path.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, T>> {
        self.entries
            .iter()
            .filter(|entry| entry.method == *method)
            .find_map(|entry| {
                entry
                    .pattern
                    .match_path(path)
                    .map(|params| RouteMatch { entry, params })
            })
    }

    /// Returns the methods registered for patterns matching `path`, in
    /// registration order without duplicates.
    #[must_use]
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let mut methods: Vec<Method> = Vec::new();
        for entry in &self.entries {
            if !methods.contains(&entry.method) && entry.pattern.match_path(path).is_some() {
                methods.push(entry.method.clone());
            }
        }
        methods
    }

    /// Returns the number of registered routes, fallbacks excluded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over routes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry<T>> {
        self.entries.iter()
    }

    /// Iterates over registered fallbacks.
    pub fn fallbacks(&self) -> impl Iterator<Item = (StatusCode, &T)> {
        self.fallbacks.iter().map(|(status, value)| (*status, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn demo_table() -> RouteTable<&'static str> {
        let mut table = RouteTable::new();
        table.register(Method::GET, "/", "home").unwrap();
        table.register(Method::GET, "/users", "user-list").unwrap();
        table.register(Method::GET, "/users/:user-id", "user-profile").unwrap();
        table.register(Method::GET, "/api/users", "list-users").unwrap();
        table.register(Method::GET, "/api/users/{user-id}", "get-user").unwrap();
        table
    }

    #[test]
    fn test_match_literal_and_param_routes() {
        let table = demo_table();

        let m = table.match_route(&Method::GET, "/users").unwrap();
        assert_eq!(*m.value(), "user-list");
        assert!(m.params.is_empty());

        let m = table.match_route(&Method::GET, "/users/2").unwrap();
        assert_eq!(*m.value(), "user-profile");
        assert_eq!(m.pattern(), "/users/:user-id");
        assert_eq!(m.params.get("user-id"), Some("2"));

        let m = table.match_route(&Method::GET, "/api/users/999").unwrap();
        assert_eq!(*m.value(), "get-user");
        assert_eq!(m.params.get("user-id"), Some("999"));
    }

    #[test]
    fn test_root_route() {
        let table = demo_table();
        assert_eq!(*table.match_route(&Method::GET, "/").unwrap().value(), "home");
    }

    #[test]
    fn test_no_match() {
        let table = demo_table();
        assert!(table.match_route(&Method::GET, "/posts").is_none());
        assert!(table.match_route(&Method::GET, "/users/2/posts").is_none());
    }

    #[test]
    fn test_method_must_match_exactly() {
        let table = demo_table();
        assert!(table.match_route(&Method::POST, "/users").is_none());
        assert!(table.match_route(&Method::HEAD, "/users").is_none());
    }

    #[test]
    fn test_first_registered_wins() {
        let mut table = RouteTable::new();
        table.register(Method::GET, "/users/:user-id", "by-id").unwrap();
        table.register(Method::GET, "/users/me", "me").unwrap();

        assert_eq!(*table.match_route(&Method::GET, "/users/me").unwrap().value(), "by-id");

        let mut table = RouteTable::new();
        table.register(Method::GET, "/users/me", "me").unwrap();
        table.register(Method::GET, "/users/:user-id", "by-id").unwrap();

        assert_eq!(*table.match_route(&Method::GET, "/users/me").unwrap().value(), "me");
        assert_eq!(*table.match_route(&Method::GET, "/users/7").unwrap().value(), "by-id");
    }

    #[test]
    fn test_trailing_slash_normalized() {
        let mut table = RouteTable::new();
        table.register(Method::GET, "/users/", "user-list").unwrap();
        assert!(table.match_route(&Method::GET, "/users").is_some());
        assert!(table.match_route(&Method::GET, "/users/").is_some());
    }

    #[test]
    fn test_register_rejects_invalid_pattern() {
        let mut table: RouteTable<()> = RouteTable::new();
        assert!(table.register(Method::GET, "/users/:", ()).is_err());
        assert!(table.register(Method::GET, "/a/:x/b/{x}", ()).is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn test_allowed_methods() {
        let mut table = RouteTable::new();
        table.register(Method::GET, "/users", "list").unwrap();
        table.register(Method::POST, "/users", "create").unwrap();
        table.register(Method::GET, "/users/:id", "get").unwrap();
        table.register(Method::GET, "/users", "shadowed").unwrap();

        assert_eq!(table.allowed_methods("/users"), vec![Method::GET, Method::POST]);
        assert_eq!(table.allowed_methods("/users/1"), vec![Method::GET]);
        assert!(table.allowed_methods("/posts").is_empty());
    }

    #[test]
    fn test_fallback_replaces() {
        let mut table = RouteTable::new();
        table.fallback(StatusCode::NOT_FOUND, "first");
        table.fallback(StatusCode::NOT_FOUND, "second");

        assert_eq!(table.fallback_for(StatusCode::NOT_FOUND), Some(&"second"));
        assert_eq!(table.fallback_for(StatusCode::FORBIDDEN), None);
        assert_eq!(table.fallbacks().count(), 1);
        assert!(table.is_empty());
    }

    #[test]
    fn test_iter_keeps_registration_order() {
        let table = demo_table();
        let values: Vec<_> = table.iter().map(|e| *e.value()).collect();
        assert_eq!(
            values,
            vec!["home", "user-list", "user-profile", "list-users", "get-user"]
        );
        assert_eq!(table.len(), 5);
    }

    proptest! {
        #[test]
        fn prop_param_binds_single_segment(value in "[a-zA-Z0-9_.~-]{1,16}") {
            let table = demo_table();
            let path = format!("/users/{value}");
            let m = table.match_route(&Method::GET, &path).unwrap();
            prop_assert_eq!(*m.value(), "user-profile");
            prop_assert_eq!(m.params.get("user-id"), Some(value.as_str()));
        }

        #[test]
        fn prop_percent_encoded_values_decode(value in "[ a-z/?#&]{1,12}") {
            let table = demo_table();
            let path = format!("/users/{}", urlencoding::encode(&value));
            let m = table.match_route(&Method::GET, &path).unwrap();
            prop_assert_eq!(m.params.get("user-id"), Some(value.as_str()));
        }

        #[test]
        fn prop_extra_segments_never_match_profile(a in "[a-z0-9]{1,8}", b in "[a-z0-9]{1,8}") {
            let table = demo_table();
            let path = format!("/users/{a}/{b}");
            prop_assert!(table.match_route(&Method::GET, &path).is_none());
        }
    }
}
