//! Error types for the authorization crate.

use thiserror::Error;

/// Result type for authorization operations.
pub type AuthzResult<T> = Result<T, AuthzError>;

/// Errors that can occur while setting up the access policy.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthzError {
    /// The realm cannot be placed in a `WWW-Authenticate` header.
    #[error("invalid realm {realm:?}: {reason}")]
    InvalidRealm {
        /// The rejected realm.
        realm: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl AuthzError {
    /// Create an invalid realm error.
    pub fn invalid_realm(realm: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRealm {
            realm: realm.into(),
            reason: reason.into(),
        }
    }
}
