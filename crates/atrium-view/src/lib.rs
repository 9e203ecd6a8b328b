//! Views for Atrium: component registry, per-request state and shell rendering.
//!
//! A view route resolves to a named client component. The [`ViewRenderer`]
//! runs the configured state function once, then emits an HTML shell that
//!
//! - lists every registered component (`{{components}}`),
//! - marks the mount point for the resolved component (`{{mount}}`),
//! - embeds the state payload with the matched path and query parameters in
//!   `<script type="application/json" id="atrium-state">` (`{{state}}`),
//! - links the bootstrap and component scripts (`{{scripts}}`).
//!
//! In the browser, `window.atrium.state()` returns the embedded document; in
//! Rust, [`EmbeddedState::extract`] does the same.
//!
//! # Example
//!
//! ```
//! use atrium_core::{RequestContext, StatePayload};
//! use atrium_view::{EmbeddedState, ViewConfig, ViewRenderer};
//!
//! let config = ViewConfig::builder()
//!     .component("home")
//!     .state_fn(|ctx| Ok(StatePayload::new().with("currentUser", ctx.username())))
//!     .build()
//!     .unwrap();
//! let renderer = ViewRenderer::new(config).unwrap();
//!
//! let html = renderer.render("home", &RequestContext::mock()).unwrap();
//! let embedded = EmbeddedState::extract(&html).unwrap();
//! assert_eq!(embedded.component, "home");
//! ```

mod config;
mod embed;
mod error;
pub mod layout;
mod registry;
mod renderer;

pub use config::{empty_state, StateFn, ViewConfig, ViewConfigBuilder, DEFAULT_TITLE};
pub use embed::{escape_script_json, EmbeddedState, STATE_ELEMENT_ID};
pub use error::{ViewError, ViewResult};
pub use layout::{LayoutTemplate, DEFAULT_LAYOUT};
pub use registry::{ComponentDef, ComponentRegistry};
pub use renderer::{ViewRenderer, COMPONENTS_ELEMENT_ID, MOUNT_ELEMENT_ID};
