//! Error types for Atrium.
//!
//! [`AtriumError`] is the error type that crosses into request handling. Each
//! variant belongs to an [`ErrorCategory`], which fixes the HTTP status and the
//! machine-readable code written into the JSON [`ErrorEnvelope`].
//!
//! | Category | Status | Code |
//! |---|---|---|
//! | `NotMatched` | 404 | `NOT_MATCHED` |
//! | `NotFound` | 404 | `NOT_FOUND` |
//! | `Unauthorized` | 401 | `UNAUTHORIZED` |
//! | `MethodNotAllowed` | 405 | `METHOD_NOT_ALLOWED` |
//! | `MisconfiguredRoute` | 500 | `MISCONFIGURED_ROUTE` |
//! | `Validation` | 400 | `VALIDATION_ERROR` |
//! | `PayloadTooLarge` | 413 | `PAYLOAD_TOO_LARGE` |
//! | `Internal` | 500 | `INTERNAL_ERROR` |
//! | `Timeout` | 504 | `TIMEOUT` |

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`AtriumError`].
pub type AtriumResult<T> = Result<T, AtriumError>;

/// Message sent to clients in place of internal error details.
const INTERNAL_PUBLIC_MESSAGE: &str = "internal server error";

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// No route pattern fits the method and path.
    NotMatched,
    /// A handler could not locate the requested entity.
    NotFound,
    /// The access policy denied the request.
    Unauthorized,
    /// The path exists under other methods.
    MethodNotAllowed,
    /// A route references an unknown component or handler.
    MisconfiguredRoute,
    /// Request validation errors.
    Validation,
    /// The request body exceeds the configured limit.
    PayloadTooLarge,
    /// Internal server errors.
    Internal,
    /// Request timeout.
    Timeout,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::NotMatched | Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MisconfiguredRoute | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Returns the machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotMatched => "NOT_MATCHED",
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::MisconfiguredRoute => "MISCONFIGURED_ROUTE",
            Self::Validation => "VALIDATION_ERROR",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::Internal => "INTERNAL_ERROR",
            Self::Timeout => "TIMEOUT",
        }
    }
}

/// Standard error type for Atrium.
///
/// # Example
///
/// ```
/// use atrium_core::{AtriumError, ErrorCategory};
///
/// let error = AtriumError::not_found_resource("user", "999");
/// assert_eq!(error.category(), ErrorCategory::NotFound);
/// assert_eq!(error.status_code().as_u16(), 404);
/// ```
#[derive(Error, Debug)]
pub enum AtriumError {
    /// No route matched.
    #[error("No route matches {method} {path}")]
    NotMatched {
        /// Request method.
        method: String,
        /// Request path.
        path: String,
    },

    /// Resource not found.
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
        /// The type of resource that was not found.
        resource_type: Option<String>,
        /// The identifier of the resource.
        resource_id: Option<String>,
    },

    /// The access policy denied the request.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Human-readable error message.
        message: String,
    },

    /// The path is served, but not under this method.
    #[error("Method {method} not allowed")]
    MethodNotAllowed {
        /// Request method.
        method: String,
        /// Methods the path accepts.
        allowed: Vec<String>,
    },

    /// A route references something that is not registered.
    #[error("Misconfigured route {route}: {reason}")]
    MisconfiguredRoute {
        /// The offending route pattern.
        route: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Request validation failed.
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable error message.
        message: String,
    },

    /// The request body exceeds the limit.
    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge {
        /// Maximum accepted body size in bytes.
        limit: usize,
    },

    /// Internal server error.
    #[error("Internal error: {message}")]
    Internal {
        /// Message for logs. Never sent to clients.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Request timeout.
    #[error("Timeout: {message}")]
    Timeout {
        /// Human-readable error message.
        message: String,
    },
}

impl AtriumError {
    /// Creates a no-match error.
    #[must_use]
    pub fn not_matched(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self::NotMatched {
            method: method.into(),
            path: path.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            resource_type: None,
            resource_id: None,
        }
    }

    /// Creates a not found error with resource context.
    #[must_use]
    pub fn not_found_resource(
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        let resource_type = resource_type.into();
        let resource_id = resource_id.into();
        Self::NotFound {
            message: format!("{resource_type} with ID '{resource_id}' not found"),
            resource_type: Some(resource_type),
            resource_id: Some(resource_id),
        }
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a method-not-allowed error.
    #[must_use]
    pub fn method_not_allowed(method: impl Into<String>, allowed: Vec<String>) -> Self {
        Self::MethodNotAllowed {
            method: method.into(),
            allowed,
        }
    }

    /// Creates a misconfigured route error.
    #[must_use]
    pub fn misconfigured_route(route: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MisconfiguredRoute {
            route: route.into(),
            reason: reason.into(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a payload-too-large error.
    #[must_use]
    pub const fn payload_too_large(limit: usize) -> Self {
        Self::PayloadTooLarge { limit }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::NotMatched { .. } => ErrorCategory::NotMatched,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Unauthorized { .. } => ErrorCategory::Unauthorized,
            Self::MethodNotAllowed { .. } => ErrorCategory::MethodNotAllowed,
            Self::MisconfiguredRoute { .. } => ErrorCategory::MisconfiguredRoute,
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::PayloadTooLarge { .. } => ErrorCategory::PayloadTooLarge,
            Self::Internal { .. } => ErrorCategory::Internal,
            Self::Timeout { .. } => ErrorCategory::Timeout,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }

    /// Returns `true` for errors whose details must not reach clients.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Internal { .. } | Self::MisconfiguredRoute { .. }
        )
    }

    /// Returns the message shown to clients.
    #[must_use]
    pub fn public_message(&self) -> String {
        if self.is_internal() {
            INTERNAL_PUBLIC_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }

    /// Converts this error to a serializable error envelope.
    #[must_use]
    pub fn to_envelope(&self, request_id: Option<&str>) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorDetail {
                code: self.category().code().to_string(),
                message: self.public_message(),
                category: self.category(),
                details: self.error_details(),
            },
            request_id: request_id.map(ToString::to_string),
        }
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            Self::NotMatched { method, path } => Some(serde_json::json!({
                "method": method,
                "path": path
            })),
            Self::NotFound {
                resource_type: Some(rt),
                resource_id: Some(rid),
                ..
            } => Some(serde_json::json!({
                "resource_type": rt,
                "resource_id": rid
            })),
            Self::MethodNotAllowed { allowed, .. } => Some(serde_json::json!({
                "allowed": allowed
            })),
            Self::PayloadTooLarge { limit } => Some(serde_json::json!({
                "limit": limit
            })),
            _ => None,
        }
    }
}

/// Serializable error envelope for HTTP responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
    /// The request ID for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error detail within an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Error category.
    pub category: ErrorCategory,
    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
