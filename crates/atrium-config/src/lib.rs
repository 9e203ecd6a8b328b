//! Typed configuration for Atrium applications.
//!
//! Configuration is layered: defaults, then a TOML or JSON file, then
//! environment variables. Unknown fields are rejected so typos fail loudly.
//!
//! # Example
//!
//! ```no_run
//! use atrium_config::ConfigLoader;
//!
//! # fn main() -> Result<(), atrium_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("atrium.toml")?
//!     .with_env_prefix("ATRIUM")
//!     .load()?;
//!
//! println!("listening on {}", config.server.http_addr);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8080"
//! shutdown_timeout_secs = 30
//! request_timeout_ms = 30000
//! max_body_bytes = 1048576
//!
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [access]
//! realm = "Atrium"
//! verifier = "static"
//!
//! [access.users]
//! dave = "hunter2"
//!
//! [view]
//! title = "Directory"
//! scripts = ["/static/app.js"]
//!
//! [store]
//! seed_path = "users.json"
//!
//! [[routes]]
//! pattern = "/users/:user-id"
//! view = "user-profile"
//! roles = ["logged-in"]
//!
//! [[routes]]
//! pattern = "/api/users/:user-id"
//! handler = "get-user"
//! roles = ["anyone"]
//!
//! [[fallbacks]]
//! status = 404
//! view = "not-found"
//! roles = ["anyone"]
//! ```
//!
//! # Environment Variable Overrides
//!
//! Scalar values can be overridden with `PREFIX__SECTION__KEY`, for example
//! `ATRIUM__SERVER__HTTP_ADDR=127.0.0.1:9000` or `ATRIUM__LOGGING__LEVEL=debug`.

mod config;
mod error;
mod loader;
mod schema;

pub use config::{AtriumConfig, AtriumConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{
    AccessConfig, FallbackSpec, LoggingConfig, RouteSpec, ServerConfig, StoreConfig, VerifierKind,
    ViewSection,
};

pub use atrium_telemetry::LogFormat;
