//! # Atrium
//!
//! **Server-side component routing with access-gated server state.**
//!
//! A request is matched against an ordered route table, checked against the
//! route's permitted roles, and then either rendered as an HTML shell that
//! mounts a named client component with server-computed state, or answered
//! by a JSON API handler.
//!
//! ```text
//! Request → Route Table → Access Policy ─┬─ view:    State Function → Shell (component + state)
//!                              │         └─ handler: JSON
//!                              └─ Deny: 401 + WWW-Authenticate
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use atrium::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let views = ViewConfig::builder()
//!         .component("home")
//!         .component("user-profile")
//!         .state_fn(|ctx| Ok(StatePayload::new().with("currentUser", ctx.username())))
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

#![doc(html_root_url = "https://docs.rs/atrium/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use atrium_authz as authz;
pub use atrium_config as config;
pub use atrium_core as core;
pub use atrium_router as router;
pub use atrium_server as server;
pub use atrium_store as store;
pub use atrium_telemetry as telemetry;
pub use atrium_view as view;

pub mod demo;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use atrium_authz::{AccessPolicy, CredentialVerifier, Decision, PolicyConfig};
    pub use atrium_config::{AtriumConfig, ConfigLoader};
    pub use atrium_core::{
        AtriumError, AtriumResult, Credentials, RequestContext, Role, RoleSet, RouteTarget,
        StatePayload,
    };
    pub use atrium_server::{
        App, AppBuilder, HandlerError, HandlerRegistry, Server, ServerSettings, ShutdownSignal,
    };
    pub use atrium_view::{EmbeddedState, ViewConfig};
}
