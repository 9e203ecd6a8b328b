//! Record store errors.

use std::path::PathBuf;

use atrium_core::AtriumError;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record has the requested identifier.
    #[error("record '{id}' not found")]
    NotFound {
        /// The requested identifier.
        id: String,
    },

    /// Two seed records share an identifier.
    #[error("duplicate record id '{id}'")]
    DuplicateId {
        /// The repeated identifier.
        id: String,
    },

    /// The seed file could not be read.
    #[error("failed to read seed file {path}: {source}")]
    Io {
        /// Path to the seed file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The seed file is not a JSON array of records.
    #[error("failed to parse seed file {path}: {source}")]
    Parse {
        /// Path to the seed file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Creates a not found error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Returns `true` for [`StoreError::NotFound`].
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<StoreError> for AtriumError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => Self::not_found_resource("record", id),
            other => Self::internal_with_source("record store failure", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_core::ErrorCategory;

    #[test]
    fn test_not_found_maps_to_not_found() {
        let err: AtriumError = StoreError::not_found("999").into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_other_errors_map_to_internal() {
        let err: AtriumError = StoreError::DuplicateId { id: "1".into() }.into();
        assert!(err.is_internal());
        assert_eq!(err.public_message(), "internal server error");
    }
}
