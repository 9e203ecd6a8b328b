//! Server error types.

use std::io;

use atrium_authz::AuthzError;
use atrium_config::ConfigError;
use atrium_core::AtriumError;
use atrium_router::RouteError;
use atrium_view::ViewError;
use thiserror::Error;

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors raised while assembling or running an application.
///
/// None of these reach clients: request-time failures are rendered as error
/// envelopes by [`App::dispatch`](crate::App::dispatch).
#[derive(Debug, Error)]
pub enum ServerError {
    /// The bind address could not be parsed.
    #[error("Invalid address '{addr}': {reason}")]
    InvalidAddress {
        /// The address as configured.
        addr: String,
        /// Parser message.
        reason: String,
    },

    /// The listener could not bind.
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        /// The address the server tried to bind.
        addr: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error while serving.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A route pattern failed to compile.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// A route or fallback points at something that is not registered.
    #[error(transparent)]
    Misconfigured(AtriumError),

    /// The view configuration is invalid.
    #[error(transparent)]
    View(#[from] ViewError),

    /// The access policy configuration is invalid.
    #[error(transparent)]
    Authz(#[from] AuthzError),

    /// The application configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ServerError {
    /// Creates a misconfigured-route error.
    pub fn misconfigured(route: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Misconfigured(AtriumError::misconfigured_route(route, reason))
    }

    /// Returns `true` if a route or fallback references an unknown target.
    pub const fn is_misconfigured(&self) -> bool {
        matches!(self, Self::Misconfigured(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_misconfigured_display() {
        let err = ServerError::misconfigured("/users", "unknown component 'nope'");
        assert!(err.is_misconfigured());
        assert_eq!(
            err.to_string(),
            "Misconfigured route /users: unknown component 'nope'"
        );
    }

    #[test]
    fn test_invalid_address_display() {
        let err = ServerError::InvalidAddress {
            addr: "nowhere".to_string(),
            reason: "invalid socket address syntax".to_string(),
        };
        assert!(err.to_string().contains("Invalid address 'nowhere'"));
        assert!(!err.is_misconfigured());
    }
}
