//! # Atrium Core
//!
//! Core types shared by every Atrium crate:
//!
//! - [`RequestContext`] - Per-request context carrying parameters and credentials
//! - [`RequestId`] - UUID v7 request identifier
//! - [`Credentials`] - Caller credentials resolved once per request
//! - [`Role`] / [`RoleSet`] - Closed role enumeration attached to routes
//! - [`Endpoint`] / [`RouteTarget`] - What a route resolves to
//! - [`StatePayload`] - Server-computed state handed to a client component
//! - [`AtriumError`] - Standard error type and JSON envelope

#![doc(html_root_url = "https://docs.rs/atrium-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod credentials;
mod endpoint;
mod error;
mod payload;
mod role;

pub use atrium_router::Params;
pub use context::{RequestContext, RequestId};
pub use credentials::Credentials;
pub use endpoint::{Endpoint, RouteTarget, FALLBACK_STATUSES};
pub use error::{AtriumError, AtriumResult, ErrorCategory, ErrorDetail, ErrorEnvelope};
pub use payload::StatePayload;
pub use role::{ParseRoleError, Role, RoleSet};
