//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Why an Atrium configuration could not be loaded or accepted.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A file given to [`ConfigLoader::with_file`](crate::ConfigLoader::with_file)
    /// does not exist.
    #[error("config file {} does not exist", path.display())]
    Missing {
        /// The path that was requested.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("cannot read config file {}", path.display())]
    Unreadable {
        /// The path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Neither TOML nor JSON.
    #[error("unsupported config format '{0}', expected toml or json")]
    UnsupportedFormat(String),

    /// Malformed TOML, or an unknown key.
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON, or an unknown key.
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// A scalar setting is out of range or unparsable.
    #[error("{field}: {reason}")]
    InvalidValue {
        /// Dotted key, e.g. `server.http_addr`.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A `[[routes]]` entry cannot be registered.
    #[error("route '{pattern}': {reason}")]
    InvalidRoute {
        /// The entry's pattern as written.
        pattern: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A `[[fallbacks]]` entry cannot be registered.
    #[error("fallback for status {status}: {reason}")]
    InvalidFallback {
        /// The entry's status as written.
        status: u16,
        /// What is wrong with it.
        reason: String,
    },

    /// `access.verifier` names no known verifier.
    #[error("unknown verifier '{0}', expected 'presence' or 'static'")]
    UnknownVerifier(String),

    /// The static verifier would reject every caller.
    #[error("access.users is empty, so the static verifier rejects everyone")]
    NoStaticUsers,

    /// An `ATRIUM__*` override could not be parsed.
    #[error("environment override {var}: {reason}")]
    Env {
        /// Variable name.
        var: String,
        /// What was expected.
        reason: String,
    },

    /// The `.env` file exists but could not be loaded.
    #[error("cannot load .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
}

impl ConfigError {
    pub(crate) fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_route(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRoute {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_fallback(status: u16, reason: impl Into<String>) -> Self {
        Self::InvalidFallback {
            status,
            reason: reason.into(),
        }
    }

    pub(crate) fn env(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Env {
            var: var.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors in `[[routes]]` or `[[fallbacks]]` entries.
    #[must_use]
    pub const fn is_routing(&self) -> bool {
        matches!(self, Self::InvalidRoute { .. } | Self::InvalidFallback { .. })
    }
}
