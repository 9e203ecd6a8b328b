//! Ordered route table for Atrium.
//!
//! This crate maps an HTTP method and path to a registered value, extracting
//! named path parameters along the way. It is generic over the value so the
//! server can store whatever a route resolves to.
//!
//! # Features
//!
//! - **Ordered Matching**: routes are tried in registration order, first match wins
//! - **Path Parameters**: `:name` or `{name}`, one segment each, percent-decoded
//! - **Fallbacks**: per-status values consulted when nothing matched
//! - **405 Support**: [`RouteTable::allowed_methods`] lists the verbs a path answers to
//!
//! # Example
//!
//! ```rust
//! use atrium_router::RouteTable;
//! use http::{Method, StatusCode};
//!
//! let mut table = RouteTable::new();
//! table.register(Method::GET, "/users", "user-list").unwrap();
//! table.register(Method::GET, "/users/:user-id", "user-profile").unwrap();
//! table.fallback(StatusCode::NOT_FOUND, "not-found");
//!
//! let m = table.match_route(&Method::GET, "/users/2").unwrap();
//! assert_eq!(*m.value(), "user-profile");
//! assert_eq!(m.params.get("user-id"), Some("2"));
//!
//! assert!(table.match_route(&Method::GET, "/nope").is_none());
//! assert_eq!(table.fallback_for(StatusCode::NOT_FOUND), Some(&"not-found"));
//! ```

mod error;
mod params;
mod pattern;
mod table;

pub use error::RouteError;
pub use params::Params;
pub use pattern::RoutePattern;
pub use table::{RouteEntry, RouteMatch, RouteTable};
