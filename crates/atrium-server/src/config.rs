//! Transport settings for [`Server`](crate::Server).
//!
//! # Example
//!
//! ```rust
//! use atrium_server::ServerSettings;
//! use std::time::Duration;
//!
//! let settings = ServerSettings::builder()
//!     .http_addr("127.0.0.1:3000")
//!     .request_timeout(Duration::from_secs(5))
//!     .build();
//!
//! assert_eq!(settings.http_addr(), "127.0.0.1:3000");
//! ```

use std::net::SocketAddr;
use std::time::Duration;

/// Default HTTP bind address.
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";

/// Default graceful shutdown timeout.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default maximum request body size (1 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Bind address, timeouts and body limit for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    http_addr: String,
    shutdown_timeout: Duration,
    request_timeout: Duration,
    max_body_size: usize,
}

impl ServerSettings {
    /// Creates a settings builder.
    #[must_use]
    pub fn builder() -> ServerSettingsBuilder {
        ServerSettingsBuilder::default()
    }

    /// Returns the HTTP bind address.
    #[must_use]
    pub fn http_addr(&self) -> &str {
        &self.http_addr
    }

    /// Parses the bind address.
    ///
    /// # Errors
    ///
    /// Returns the parser error if the address is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.http_addr.parse()
    }

    /// How long shutdown waits for in-flight connections.
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    /// How long a single request may take before it is answered with 504.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Largest request body read before answering 413.
    #[must_use]
    pub const fn max_body_size(&self) -> usize {
        self.max_body_size
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl From<&atrium_config::ServerConfig> for ServerSettings {
    fn from(config: &atrium_config::ServerConfig) -> Self {
        Self {
            http_addr: config.http_addr.clone(),
            shutdown_timeout: Duration::from_secs(config.shutdown_timeout_secs),
            request_timeout: Duration::from_millis(config.request_timeout_ms),
            max_body_size: config.max_body_bytes,
        }
    }
}

/// Builder for [`ServerSettings`].
#[derive(Debug, Clone, Default)]
pub struct ServerSettingsBuilder {
    http_addr: Option<String>,
    shutdown_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    max_body_size: Option<usize>,
}

impl ServerSettingsBuilder {
    /// Sets the bind address.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.http_addr = Some(addr.into());
        self
    }

    /// Sets the graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = Some(timeout);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the request body limit in bytes.
    #[must_use]
    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = Some(bytes);
        self
    }

    /// Builds the settings, filling unset values with defaults.
    #[must_use]
    pub fn build(self) -> ServerSettings {
        ServerSettings {
            http_addr: self
                .http_addr
                .unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string()),
            shutdown_timeout: self.shutdown_timeout.unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT),
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            max_body_size: self.max_body_size.unwrap_or(DEFAULT_MAX_BODY_SIZE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ServerSettings::default();
        assert_eq!(settings.http_addr(), DEFAULT_HTTP_ADDR);
        assert_eq!(settings.shutdown_timeout(), DEFAULT_SHUTDOWN_TIMEOUT);
        assert_eq!(settings.request_timeout(), DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(settings.max_body_size(), DEFAULT_MAX_BODY_SIZE);
        assert!(settings.socket_addr().is_ok());
    }

    #[test]
    fn test_invalid_socket_addr() {
        let settings = ServerSettings::builder().http_addr("localhost").build();
        assert!(settings.socket_addr().is_err());
    }

    #[test]
    fn test_from_config_section() {
        let section = atrium_config::ServerConfig {
            http_addr: "127.0.0.1:9000".to_string(),
            shutdown_timeout_secs: 5,
            request_timeout_ms: 250,
            max_body_bytes: 2048,
        };
        let settings = ServerSettings::from(&section);
        assert_eq!(settings.http_addr(), "127.0.0.1:9000");
        assert_eq!(settings.shutdown_timeout(), Duration::from_secs(5));
        assert_eq!(settings.request_timeout(), Duration::from_millis(250));
        assert_eq!(settings.max_body_size(), 2048);
    }
}
