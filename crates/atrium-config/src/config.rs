//! Main configuration types.
//!
//! This module provides the top-level [`AtriumConfig`] struct and its builder.

use std::collections::HashSet;
use std::time::Duration;

use atrium_router::RoutePattern;
use atrium_telemetry::LogFormat;
use serde::{Deserialize, Serialize};

use crate::{
    AccessConfig, ConfigError, FallbackSpec, LoggingConfig, RouteSpec, ServerConfig, StoreConfig,
    VerifierKind, ViewSection,
};

/// Complete Atrium application configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use atrium_config::AtriumConfig;
///
/// let config = AtriumConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
/// assert!(config.routes.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct AtriumConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Access policy configuration.
    #[serde(default)]
    pub access: AccessConfig,

    /// View configuration.
    #[serde(default)]
    pub view: ViewSection,

    /// Record store configuration.
    #[serde(default)]
    pub store: StoreConfig,

    /// Routes declared in configuration, in registration order.
    #[serde(default)]
    pub routes: Vec<RouteSpec>,

    /// Fallback views by status.
    #[serde(default)]
    pub fallbacks: Vec<FallbackSpec>,
}

impl AtriumConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> AtriumConfigBuilder {
        AtriumConfigBuilder::default()
    }

    /// Returns the request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }

    /// Returns the graceful shutdown timeout.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout_secs)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if:
    /// - The server address or log level is invalid
    /// - The request timeout or body limit is zero
    /// - The realm cannot be carried in a header
    /// - The static verifier has no users
    /// - A route has a bad method, pattern or target
    /// - A fallback is not for 404 or 405, or is declared twice
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .server
            .http_addr
            .parse::<std::net::SocketAddr>()
            .is_err()
        {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "server.request_timeout_ms",
                "must be greater than zero",
            ));
        }

        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "server.max_body_bytes",
                "must be greater than zero",
            ));
        }

        atrium_telemetry::logging::create_env_filter(&self.logging.level)
            .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;

        if self.access.realm.contains('"') || self.access.realm.contains('\\') {
            return Err(ConfigError::invalid_value(
                "access.realm",
                "quotes and backslashes are not allowed",
            ));
        }

        if self.access.verifier == VerifierKind::Static && self.access.users.is_empty() {
            return Err(ConfigError::NoStaticUsers);
        }

        for route in &self.routes {
            route.parsed_method()?;
            route.target()?;
            RoutePattern::parse(&route.pattern)
                .map_err(|e| ConfigError::invalid_route(&route.pattern, e.to_string()))?;
        }

        let mut statuses = HashSet::new();
        for fallback in &self.fallbacks {
            let status = fallback.status_code()?;
            if !statuses.insert(status) {
                return Err(ConfigError::invalid_fallback(
                    fallback.status,
                    "declared more than once",
                ));
            }
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Pretty, colored debug logs with source locations.
    ///
    /// # Example
    ///
    /// ```
    /// use atrium_config::AtriumConfig;
    ///
    /// let config = AtriumConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.ansi_enabled = true;
        config.logging.include_location = true;

        config
    }

    /// Create a production configuration preset.
    ///
    /// JSON info logs without colors.
    ///
    /// # Example
    ///
    /// ```
    /// use atrium_config::AtriumConfig;
    /// use atrium_telemetry::LogFormat;
    ///
    /// let config = AtriumConfig::production();
    /// assert_eq!(config.logging.format, LogFormat::Json);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.logging.ansi_enabled = false;

        config
    }
}

/// Builder for [`AtriumConfig`].
#[derive(Debug, Default)]
pub struct AtriumConfigBuilder {
    config: AtriumConfig,
}

impl AtriumConfigBuilder {
    /// Set the server configuration.
    #[must_use]
    pub fn server(mut self, server: ServerConfig) -> Self {
        self.config.server = server;
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Set the access configuration.
    #[must_use]
    pub fn access(mut self, access: AccessConfig) -> Self {
        self.config.access = access;
        self
    }

    /// Set the view configuration.
    #[must_use]
    pub fn view(mut self, view: ViewSection) -> Self {
        self.config.view = view;
        self
    }

    /// Set the store configuration.
    #[must_use]
    pub fn store(mut self, store: StoreConfig) -> Self {
        self.config.store = store;
        self
    }

    /// Append a route.
    #[must_use]
    pub fn route(mut self, route: RouteSpec) -> Self {
        self.config.routes.push(route);
        self
    }

    /// Append a fallback.
    #[must_use]
    pub fn fallback(mut self, fallback: FallbackSpec) -> Self {
        self.config.fallbacks.push(fallback);
        self
    }

    /// Build the configuration without validation.
    #[must_use]
    pub fn build(self) -> AtriumConfig {
        self.config
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<AtriumConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
