//! Atrium Authorization - role-based access gate
//!
//! This crate decides whether a request may reach a route, given the route's
//! permitted roles and whatever credentials the caller presented.
//!
//! # Overview
//!
//! - [`extract_credentials`] reads `Authorization: Basic` once per request
//! - [`AccessPolicy::authorize`] turns credentials plus a [`RoleSet`] into a [`Decision`]
//! - [`AccessPolicy::challenge`] is the `WWW-Authenticate` value for a denial
//! - [`CredentialVerifier`] is the seam for real password checks
//!
//! # Example
//!
//! ```
//! use atrium_authz::{basic_authorization, extract_credentials, AccessPolicy};
//! use atrium_core::RoleSet;
//! use http::{header::AUTHORIZATION, HeaderMap, HeaderValue};
//!
//! let mut headers = HeaderMap::new();
//! headers.insert(
//!     AUTHORIZATION,
//!     HeaderValue::from_str(&basic_authorization("dave", "")).unwrap(),
//! );
//!
//! let policy = AccessPolicy::default();
//! let credentials = extract_credentials(&headers);
//! assert!(policy.authorize(credentials.as_ref(), &RoleSet::logged_in()).is_allowed());
//! ```
//!
//! [`RoleSet`]: atrium_core::RoleSet

pub mod config;
pub mod error;
pub mod extract;
pub mod policy;
pub mod verifier;

pub use config::{PolicyConfig, DEFAULT_REALM};
pub use error::{AuthzError, AuthzResult};
pub use extract::{basic_authorization, extract_credentials, parse_basic};
pub use policy::{AccessPolicy, Decision, DenyReason};
pub use verifier::{CredentialVerifier, PresenceOnly, StaticCredentials};
