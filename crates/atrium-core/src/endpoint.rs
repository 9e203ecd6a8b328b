//! What a registered route resolves to.

use std::fmt;

use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::role::RoleSet;

/// Statuses for which a fallback view is rendered when no route matched:
/// `404` when no route serves the path, `405` when only other methods do.
pub const FALLBACK_STATUSES: [StatusCode; 2] =
    [StatusCode::NOT_FOUND, StatusCode::METHOD_NOT_ALLOWED];

/// The target of a route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum RouteTarget {
    /// Render a shell that mounts the named client component.
    View(String),
    /// Invoke the named API handler and respond with JSON.
    Handler(String),
}

impl RouteTarget {
    /// Creates a view target.
    #[must_use]
    pub fn view(component: impl Into<String>) -> Self {
        Self::View(component.into())
    }

    /// Creates a handler target.
    #[must_use]
    pub fn handler(name: impl Into<String>) -> Self {
        Self::Handler(name.into())
    }

    /// Returns the component or handler name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::View(name) | Self::Handler(name) => name,
        }
    }

    /// Returns `true` for view targets.
    #[must_use]
    pub const fn is_view(&self) -> bool {
        matches!(self, Self::View(_))
    }
}

impl fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View(name) => write!(f, "view:{name}"),
            Self::Handler(name) => write!(f, "handler:{name}"),
        }
    }
}

/// A route's target together with the roles permitted to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// The target to dispatch to.
    pub target: RouteTarget,
    /// Roles permitted to reach the target.
    pub roles: RoleSet,
}

impl Endpoint {
    /// Creates an endpoint.
    #[must_use]
    pub fn new(target: RouteTarget, roles: impl Into<RoleSet>) -> Self {
        Self {
            target,
            roles: roles.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[test]
    fn test_target_name() {
        assert_eq!(RouteTarget::view("user-profile").name(), "user-profile");
        assert_eq!(RouteTarget::handler("get-user").name(), "get-user");
        assert!(RouteTarget::view("home").is_view());
        assert!(!RouteTarget::handler("home").is_view());
    }

    #[test]
    fn test_target_display() {
        assert_eq!(RouteTarget::view("home").to_string(), "view:home");
        assert_eq!(RouteTarget::handler("list-users").to_string(), "handler:list-users");
    }

    #[test]
    fn test_endpoint_roles() {
        let endpoint = Endpoint::new(RouteTarget::view("home"), Role::Anyone);
        assert!(endpoint.roles.contains(Role::Anyone));
    }
}
