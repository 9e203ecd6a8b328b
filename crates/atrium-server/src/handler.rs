//! API handler registration.
//!
//! A handler is an async function of the request context whose result is
//! serialized as the JSON response body. Handlers are registered by name and
//! referenced from routes with [`RouteTarget::Handler`](atrium_core::RouteTarget).
//!
//! # Example
//!
//! ```rust
//! use atrium_core::{AtriumError, RequestContext};
//! use atrium_server::{HandlerError, HandlerRegistry};
//!
//! async fn greet(ctx: RequestContext) -> Result<String, HandlerError> {
//!     let name = ctx
//!         .query_param("name")
//!         .ok_or_else(|| AtriumError::validation("name is required"))?;
//!     Ok(format!("hello, {name}"))
//! }
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register("greet", greet);
//! assert!(registry.contains("greet"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use atrium_core::{AtriumError, RequestContext};
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

/// Boxed future returned by an erased handler.
pub type BoxedHandlerResult = Pin<Box<dyn Future<Output = Result<Bytes, HandlerError>> + Send>>;

/// A type-erased handler producing a serialized JSON body.
pub type ErasedHandler = Arc<dyn Fn(RequestContext) -> BoxedHandlerResult + Send + Sync>;

/// Errors returned by API handlers.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A domain error; its category decides the response status.
    #[error(transparent)]
    Atrium(#[from] AtriumError),

    /// The handler's result could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<HandlerError> for AtriumError {
    fn from(err: HandlerError) -> Self {
        match err {
            HandlerError::Atrium(e) => e,
            HandlerError::Serialization(e) => {
                AtriumError::internal_with_source("failed to serialize handler response", e)
            }
        }
    }
}

/// Named API handlers.
///
/// Registering a name twice replaces the earlier handler.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<String, ErasedHandler>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an async handler under `name`.
    pub fn register<Res, F, Fut>(&mut self, name: impl Into<String>, handler: F)
    where
        Res: Serialize + Send + 'static,
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Res, HandlerError>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        let erased: ErasedHandler = Arc::new(move |ctx: RequestContext| {
            let handler = Arc::clone(&handler);
            Box::pin(async move {
                let response = handler(ctx).await?;
                let body = serde_json::to_vec(&response)?;
                Ok(Bytes::from(body))
            })
        });

        self.handlers.insert(name.into(), erased);
    }

    /// Looks up a handler by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ErasedHandler> {
        self.handlers.get(name)
    }

    /// Returns `true` if a handler is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Returns the number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Iterates over registered handler names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("HandlerRegistry")
            .field("handlers", &names)
            .finish()
    }
}
