//! Request context types.
//!
//! The [`RequestContext`] carries all per-request state from routing, through
//! the access check, into the state function or API handler.

use std::time::{Duration, Instant};

use http::Method;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::credentials::Credentials;
use crate::Params;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which keeps request IDs sortable in logs.
///
/// # Example
///
/// ```
/// use atrium_core::RequestId;
///
/// let id = RequestId::new();
/// println!("Request ID: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Per-request context.
///
/// Created when a request arrives and dropped when its response is complete.
/// A context is owned by exactly one request flow and is never shared
/// between requests.
///
/// # Example
///
/// ```
/// use atrium_core::{Credentials, RequestContext};
/// use http::Method;
///
/// let ctx = RequestContext::new(Method::GET, "/users/2")
///     .with_path_param("user-id", "2")
///     .with_credentials(Credentials::new("dave", "secret"));
///
/// assert_eq!(ctx.path_param("user-id"), Some("2"));
/// assert_eq!(ctx.username(), Some("dave"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request.
    request_id: RequestId,

    /// HTTP method of the request.
    method: Method,

    /// Request path, without the query string.
    path: String,

    /// The pattern of the matched route, once routing has happened.
    route: Option<String>,

    /// Parameters bound by the matched route pattern.
    path_params: Params,

    /// Decoded query string parameters.
    query_params: Params,

    /// Credentials presented by the caller, if any.
    credentials: Option<Credentials>,

    /// Whether the credentials were accepted by the access policy's verifier.
    verified: bool,

    /// When the request started processing.
    started_at: Instant,
}

impl RequestContext {
    /// Creates a new context for a request with a fresh request ID.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            path: path.into(),
            route: None,
            path_params: Params::new(),
            query_params: Params::new(),
            credentials: None,
            verified: false,
            started_at: Instant::now(),
        }
    }

    /// Creates a `GET /` context for tests.
    #[must_use]
    pub fn mock() -> Self {
        Self::new(Method::GET, "/")
    }

    /// Returns the request ID.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns a new context with the specified request ID.
    #[must_use]
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the matched route pattern, if routing has happened.
    #[must_use]
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// Records the matched route pattern.
    pub fn set_route(&mut self, pattern: impl Into<String>) {
        self.route = Some(pattern.into());
    }

    /// Returns a new context with the matched route pattern.
    #[must_use]
    pub fn with_route(mut self, pattern: impl Into<String>) -> Self {
        self.set_route(pattern);
        self
    }

    /// Returns the parameters bound by the route pattern.
    #[must_use]
    pub const fn path_params(&self) -> &Params {
        &self.path_params
    }

    /// Returns a single path parameter by name.
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name)
    }

    /// Replaces the path parameters.
    pub fn set_path_params(&mut self, params: Params) {
        self.path_params = params;
    }

    /// Returns a new context with one more path parameter.
    #[must_use]
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push(name, value);
        self
    }

    /// Returns the query string parameters.
    #[must_use]
    pub const fn query_params(&self) -> &Params {
        &self.query_params
    }

    /// Returns a single query parameter by name.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name)
    }

    /// Replaces the query parameters.
    pub fn set_query_params(&mut self, params: Params) {
        self.query_params = params;
    }

    /// Returns a new context with one more query parameter.
    #[must_use]
    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push(name, value);
        self
    }

    /// Returns the caller's credentials, if any were presented.
    #[must_use]
    pub const fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Sets the caller's credentials as presented, not yet verified.
    pub fn set_credentials(&mut self, credentials: Option<Credentials>) {
        self.credentials = credentials;
        self.verified = false;
    }

    /// Records whether the presented credentials passed verification.
    pub fn set_verified(&mut self, verified: bool) {
        self.verified = verified && self.credentials.as_ref().is_some_and(Credentials::is_present);
    }

    /// Returns `true` once non-empty credentials have passed verification.
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        self.verified
    }

    /// Returns a new context for a caller already known to be `credentials`.
    ///
    /// Unlike [`set_credentials`](Self::set_credentials), the caller counts as
    /// verified when the credentials are non-empty.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.verified = credentials.is_present();
        self.credentials = Some(credentials);
        self
    }

    /// Returns the caller's username once verified.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.credentials
            .as_ref()
            .filter(|_| self.verified)
            .map(Credentials::username)
    }

    /// Returns the time elapsed since the request started processing.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_unique() {
        let a = RequestId::new();
        let b = RequestId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_request_id_display_is_uuid() {
        let id = RequestId::new();
        assert_eq!(id.to_string(), id.as_uuid().to_string());
    }

    #[test]
    fn test_context_defaults() {
        let ctx = RequestContext::new(Method::GET, "/users");
        assert_eq!(ctx.method(), &Method::GET);
        assert_eq!(ctx.path(), "/users");
        assert!(ctx.route().is_none());
        assert!(ctx.path_params().is_empty());
        assert!(ctx.query_params().is_empty());
        assert!(ctx.credentials().is_none());
        assert!(ctx.username().is_none());
    }

    #[test]
    fn test_context_params() {
        let ctx = RequestContext::new(Method::GET, "/users/7")
            .with_route("/users/:user-id")
            .with_path_param("user-id", "7")
            .with_query_param("tab", "posts");

        assert_eq!(ctx.route(), Some("/users/:user-id"));
        assert_eq!(ctx.path_param("user-id"), Some("7"));
        assert_eq!(ctx.query_param("tab"), Some("posts"));
        assert_eq!(ctx.query_param("missing"), None);
    }

    #[test]
    fn test_username_ignores_empty_credentials() {
        let ctx = RequestContext::mock().with_credentials(Credentials::new("", "pw"));
        assert!(ctx.credentials().is_some());
        assert!(ctx.username().is_none());
    }

    #[test]
    fn test_presented_credentials_need_verification() {
        let mut ctx = RequestContext::mock();
        ctx.set_credentials(Some(Credentials::new("mallory", "wrong")));
        assert_eq!(ctx.credentials().map(Credentials::username), Some("mallory"));
        assert!(!ctx.is_verified());
        assert!(ctx.username().is_none());

        ctx.set_verified(true);
        assert_eq!(ctx.username(), Some("mallory"));

        ctx.set_credentials(Some(Credentials::new("eve", "pw")));
        assert!(ctx.username().is_none());
    }

    #[test]
    fn test_empty_credentials_never_verify() {
        let mut ctx = RequestContext::mock();
        ctx.set_credentials(Some(Credentials::new("", "")));
        ctx.set_verified(true);
        assert!(!ctx.is_verified());

        ctx.set_credentials(None);
        ctx.set_verified(true);
        assert!(ctx.username().is_none());
    }
}
