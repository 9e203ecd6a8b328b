//! Error types for view rendering.

use std::path::PathBuf;

use atrium_core::AtriumError;
use thiserror::Error;

/// Result type for view operations.
pub type ViewResult<T> = Result<T, ViewError>;

/// Errors raised while configuring or rendering views.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ViewError {
    /// A route or render call named a component that is not registered.
    #[error("unknown component '{0}'")]
    UnknownComponent(String),

    /// A component was registered twice.
    #[error("component '{0}' registered more than once")]
    DuplicateComponent(String),

    /// The layout template lacks a required placeholder.
    #[error("layout template is missing the {0} placeholder")]
    MissingPlaceholder(&'static str),

    /// The layout file could not be read.
    #[error("failed to read layout {path}: {source}")]
    LayoutIo {
        /// Path to the layout file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The state function returned an error.
    #[error("state function failed: {0}")]
    State(#[source] AtriumError),

    /// The state function panicked.
    #[error("state function panicked")]
    StatePanicked,

    /// The embedded state could not be serialized or parsed.
    #[error("embedded state JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document has no embedded state element.
    #[error("document has no embedded state element")]
    MissingEmbeddedState,
}

impl From<ViewError> for AtriumError {
    fn from(err: ViewError) -> Self {
        match err {
            ViewError::State(inner) => inner,
            ViewError::UnknownComponent(name) => {
                Self::misconfigured_route(format!("view:{name}"), "component is not registered")
            }
            other => Self::internal_with_source("view rendering failed", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_core::ErrorCategory;

    #[test]
    fn test_state_error_passes_through() {
        let err: AtriumError = ViewError::State(AtriumError::not_found("nope")).into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn test_panic_is_internal() {
        let err: AtriumError = ViewError::StatePanicked.into();
        assert!(err.is_internal());
    }

    #[test]
    fn test_unknown_component_is_misconfigured() {
        let err: AtriumError = ViewError::UnknownComponent("ghost".into()).into();
        assert_eq!(err.category(), ErrorCategory::MisconfiguredRoute);
    }
}
