//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use std::collections::BTreeMap;
use std::path::PathBuf;

use atrium_core::{RoleSet, RouteTarget, FALLBACK_STATUSES};
use atrium_telemetry::{LogConfig, LogFormat};
use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Server configuration section.
///
/// # Example
///
/// ```
/// use atrium_config::ServerConfig;
///
/// let config = ServerConfig {
///     http_addr: "127.0.0.1:3000".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(config.shutdown_timeout_secs, 30);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// HTTP server bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Request timeout in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Largest request body accepted, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            request_timeout_ms: default_request_timeout(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_http_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    30000
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

fn default_true() -> bool {
    true
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in output.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Converts the section into the telemetry crate's logging config.
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            format: self.format,
            ansi_enabled: self.ansi_enabled,
            span_events: false,
            file_line_info: self.include_location,
            include_target: true,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// How presented credentials are verified.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerifierKind {
    /// Any non-empty username is accepted; passwords are ignored.
    #[default]
    Presence,
    /// Username and password must match the `users` table.
    Static,
}

/// Access policy configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AccessConfig {
    /// Realm announced in the `WWW-Authenticate` challenge.
    #[serde(default = "default_realm")]
    pub realm: String,

    /// Credential verifier.
    #[serde(default)]
    pub verifier: VerifierKind,

    /// Username to password table for the static verifier.
    #[serde(default)]
    pub users: BTreeMap<String, String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            realm: default_realm(),
            verifier: VerifierKind::default(),
            users: BTreeMap::new(),
        }
    }
}

fn default_realm() -> String {
    "Atrium".to_string()
}

/// View configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ViewSection {
    /// Page title; the built-in title is used when unset.
    #[serde(default)]
    pub title: Option<String>,

    /// Layout template file; the built-in layout is used when unset.
    #[serde(default)]
    pub layout_path: Option<PathBuf>,

    /// Extra scripts linked on every page.
    #[serde(default)]
    pub scripts: Vec<String>,
}

/// Record store configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// JSON seed file; the built-in seed is used when unset.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

/// A route declared in configuration.
///
/// ```toml
/// [[routes]]
/// pattern = "/users/:user-id"
/// view = "user-profile"
/// roles = ["logged-in"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RouteSpec {
    /// URL pattern.
    pub pattern: String,

    /// HTTP method.
    #[serde(default = "default_method")]
    pub method: String,

    /// Component to render.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,

    /// API handler to invoke.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,

    /// Permitted roles. An empty list makes the route unreachable.
    pub roles: RoleSet,
}

fn default_method() -> String {
    "GET".to_string()
}

impl RouteSpec {
    /// Creates a view route for `GET`.
    pub fn view(pattern: impl Into<String>, component: impl Into<String>, roles: impl Into<RoleSet>) -> Self {
        Self {
            pattern: pattern.into(),
            method: default_method(),
            view: Some(component.into()),
            handler: None,
            roles: roles.into(),
        }
    }

    /// Creates a handler route for `GET`.
    pub fn handler(pattern: impl Into<String>, handler: impl Into<String>, roles: impl Into<RoleSet>) -> Self {
        Self {
            pattern: pattern.into(),
            method: default_method(),
            view: None,
            handler: Some(handler.into()),
            roles: roles.into(),
        }
    }

    /// Parses the HTTP method.
    pub fn parsed_method(&self) -> Result<Method, ConfigError> {
        Method::from_bytes(self.method.to_ascii_uppercase().as_bytes()).map_err(|_| {
            ConfigError::invalid_route(&self.pattern, format!("invalid HTTP method '{}'", self.method))
        })
    }

    /// Returns the route target. Exactly one of `view` or `handler` must be set.
    pub fn target(&self) -> Result<RouteTarget, ConfigError> {
        match (&self.view, &self.handler) {
            (Some(view), None) => Ok(RouteTarget::view(view)),
            (None, Some(handler)) => Ok(RouteTarget::handler(handler)),
            _ => Err(ConfigError::invalid_route(
                &self.pattern,
                "set exactly one of view or handler",
            )),
        }
    }
}

/// A fallback view rendered when no route matched.
///
/// ```toml
/// [[fallbacks]]
/// status = 404
/// view = "not-found"
/// roles = ["anyone"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FallbackSpec {
    /// Status code the fallback answers for.
    pub status: u16,

    /// Component to render.
    pub view: String,

    /// Permitted roles.
    pub roles: RoleSet,
}

impl FallbackSpec {
    /// Parses the status code. Only `404` and `405` fallbacks are rendered.
    pub fn status_code(&self) -> Result<StatusCode, ConfigError> {
        StatusCode::from_u16(self.status)
            .ok()
            .filter(|s| FALLBACK_STATUSES.contains(s))
            .ok_or_else(|| {
                ConfigError::invalid_fallback(self.status, "expected 404 or 405")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_core::Role;

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr, "0.0.0.0:8080");
        assert_eq!(config.request_timeout_ms, 30000);
    }

    #[test]
    fn test_logging_to_log_config() {
        let section = LoggingConfig {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            include_location: true,
            ..Default::default()
        };
        let config = section.to_log_config();
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.file_line_info);
    }

    #[test]
    fn test_route_spec_target() {
        assert_eq!(
            RouteSpec::view("/", "home", Role::Anyone).target().unwrap(),
            RouteTarget::view("home")
        );
        assert_eq!(
            RouteSpec::handler("/api/users", "list-users", Role::Anyone).target().unwrap(),
            RouteTarget::handler("list-users")
        );

        let mut both = RouteSpec::view("/", "home", Role::Anyone);
        both.handler = Some("list-users".to_string());
        assert!(both.target().is_err());

        let mut neither = RouteSpec::view("/", "home", Role::Anyone);
        neither.view = None;
        assert!(neither.target().is_err());
    }

    #[test]
    fn test_route_spec_method() {
        let mut spec = RouteSpec::view("/", "home", Role::Anyone);
        assert_eq!(spec.parsed_method().unwrap(), Method::GET);
        spec.method = "post".to_string();
        assert_eq!(spec.parsed_method().unwrap(), Method::POST);
        spec.method = "NOT A METHOD".to_string();
        assert!(spec.parsed_method().is_err());
    }

    #[test]
    fn test_route_spec_from_toml() {
        let spec: RouteSpec = toml::from_str(
            r#"
                pattern = "/users/:user-id"
                view = "user-profile"
                roles = ["logged-in"]
            "#,
        )
        .unwrap();
        assert_eq!(spec.method, "GET");
        assert_eq!(spec.roles, RoleSet::logged_in());
    }

    #[test]
    fn test_route_spec_requires_roles() {
        let result: Result<RouteSpec, _> = toml::from_str(r#"pattern = "/""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_fallback_status() {
        let spec = FallbackSpec {
            status: 404,
            view: "not-found".to_string(),
            roles: RoleSet::anyone(),
        };
        assert_eq!(spec.status_code().unwrap(), StatusCode::NOT_FOUND);

        let method = FallbackSpec { status: 405, ..spec.clone() };
        assert_eq!(method.status_code().unwrap(), StatusCode::METHOD_NOT_ALLOWED);

        let ok = FallbackSpec { status: 200, ..spec.clone() };
        assert!(ok.status_code().is_err());
        let unrendered = FallbackSpec { status: 401, ..spec.clone() };
        assert!(matches!(
            unrendered.status_code(),
            Err(ConfigError::InvalidFallback { status: 401, .. })
        ));
        let bogus = FallbackSpec { status: 1000, ..spec };
        assert!(bogus.status_code().is_err());
    }

    #[test]
    fn test_verifier_kind_serde() {
        let access: AccessConfig = toml::from_str(
            r#"
                verifier = "static"
                [users]
                dave = "hunter2"
            "#,
        )
        .unwrap();
        assert_eq!(access.verifier, VerifierKind::Static);
        assert_eq!(access.users.get("dave").map(String::as_str), Some("hunter2"));
        assert_eq!(access.realm, "Atrium");
    }
}
