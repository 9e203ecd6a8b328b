//! # Atrium Server
//!
//! The request pipeline and HTTP transport for Atrium applications.
//!
//! - [`App`] - Route table, access policy, view renderer and API handlers
//!   assembled by [`AppBuilder`] and validated before the first request
//! - [`App::dispatch`] - One request in, one response out, no socket needed
//! - [`Server`] - HTTP/1.1 over hyper with per-request timeouts and graceful
//!   shutdown
//! - [`HandlerRegistry`] - Named async API handlers answering with JSON
//!
//! ## Example
//!
//! ```rust,no_run
//! use atrium_core::Role;
//! use atrium_server::{App, Server, ServerSettings};
//! use atrium_view::ViewConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let views = ViewConfig::builder()
//!         .component("home")
//!         .component("user-profile")
//!         .build()?;
//!
//!     let app = App::builder()
//!         .view_config(views)
//!         .view("/", "home", Role::Anyone)
//!         .view("/users/:user-id", "user-profile", Role::LoggedIn)
//!         .build()?;
//!
//!     Server::new(app, ServerSettings::default()).run().await?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/atrium-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
mod config;
pub mod configure;
mod error;
pub mod handler;
pub mod response;
mod server;
pub mod shutdown;

pub use app::{App, AppBuilder};
pub use config::{
    ServerSettings, ServerSettingsBuilder, DEFAULT_HTTP_ADDR, DEFAULT_MAX_BODY_SIZE,
    DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use error::{ServerError, ServerResult};
pub use handler::{HandlerError, HandlerRegistry};
pub use response::{HttpResponse, REQUEST_ID_HEADER};
pub use server::Server;
pub use shutdown::{ConnectionGuard, ConnectionTracker, ShutdownSignal};
