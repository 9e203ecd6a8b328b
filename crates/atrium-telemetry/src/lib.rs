//! Logging and metrics for Atrium.
//!
//! - **Logging**: `tracing` events rendered by `tracing-subscriber` as JSON
//!   (production) or pretty text (development), filtered by `EnvFilter`
//! - **Metrics**: request counters and latency histograms through the
//!   `metrics` facade, labelled by request [`Outcome`]
//!
//! # Example
//!
//! ```rust,ignore
//! use atrium_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::production())?;
//! atrium_telemetry::metrics::describe_metrics();
//! ```

pub mod error;
pub mod logging;
pub mod metrics;

pub use self::error::TelemetryError;
pub use self::logging::{fields, init_logging, LogConfig, LogFormat};
pub use self::metrics::{InFlightGuard, Outcome};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
