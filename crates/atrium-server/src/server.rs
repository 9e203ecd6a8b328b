//! HTTP/1.1 server.
//!
//! One Tokio task per connection, one hyper service call per request. Each
//! request body is collected up to the configured limit (413 beyond it), then
//! handed to [`App::dispatch`] under the configured request timeout; expiry
//! answers 504.
//!
//! # Example
//!
//! ```rust,no_run
//! use atrium_server::{App, Server, ServerSettings};
//!
//! # async fn run() -> Result<(), atrium_server::ServerError> {
//! let app = App::builder().build()?;
//! let settings = ServerSettings::builder().http_addr("127.0.0.1:8080").build();
//!
//! Server::new(app, settings).run().await
//! # }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use atrium_core::{AtriumError, RequestId};
use atrium_telemetry::metrics::record_request;
use atrium_telemetry::Outcome;
use http::header::HeaderValue;
use http::Request;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};

use crate::app::App;
use crate::config::ServerSettings;
use crate::error::{ServerError, ServerResult};
use crate::response::{self, HttpResponse, REQUEST_ID_HEADER};
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Serves an [`App`] over HTTP/1.1.
#[derive(Debug)]
pub struct Server {
    app: Arc<App>,
    settings: ServerSettings,
}

impl Server {
    /// Creates a server for an application.
    #[must_use]
    pub fn new(app: App, settings: ServerSettings) -> Self {
        Self {
            app: Arc::new(app),
            settings,
        }
    }

    /// Returns the application.
    #[must_use]
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Returns the transport settings.
    #[must_use]
    pub const fn settings(&self) -> &ServerSettings {
        &self.settings
    }

    /// Binds the configured address and serves until SIGINT or SIGTERM.
    pub async fn run(self) -> ServerResult<()> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Binds the configured address and serves until `shutdown` triggers.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> ServerResult<()> {
        let addr = self
            .settings
            .socket_addr()
            .map_err(|e| ServerError::InvalidAddress {
                addr: self.settings.http_addr().to_string(),
                reason: e.to_string(),
            })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener until `shutdown`
    /// triggers, then waits up to the shutdown timeout for open connections.
    pub async fn serve(self, listener: TcpListener, shutdown: ShutdownSignal) -> ServerResult<()> {
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, routes = self.app.routes().len(), "server listening");

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote_addr)) => {
                        let server = Arc::clone(&server);
                        let guard = tracker.acquire();
                        let shutdown = shutdown.clone();

                        tokio::spawn(async move {
                            if let Err(e) = server.handle_connection(stream, remote_addr, shutdown).await {
                                tracing::debug!(remote = %remote_addr, error = %e, "connection error");
                            }
                            drop(guard);
                        });
                    }
                    Err(e) => tracing::warn!(error = %e, "failed to accept connection"),
                },
                () = shutdown.recv() => {
                    tracing::info!("shutdown signal received, no longer accepting connections");
                    break;
                }
            }
        }

        let timeout = server.settings.shutdown_timeout();
        tracing::info!(
            active = tracker.active_connections(),
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            "waiting for open connections"
        );

        if tokio::time::timeout(timeout, tracker.wait_idle()).await.is_err() {
            tracing::warn!(
                active = tracker.active_connections(),
                "shutdown timeout reached with connections still open"
            );
        }

        tracing::info!("server stopped");
        Ok(())
    }

    async fn handle_connection(
        self: &Arc<Self>,
        stream: TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let io = TokioIo::new(stream);
        let server = Arc::clone(self);

        let service = service_fn(move |req: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { Ok::<_, Infallible>(server.handle_request(req).await) }
        });

        let conn = http1::Builder::new().serve_connection(io, service);
        tokio::pin!(conn);

        tokio::select! {
            result = conn.as_mut() => result,
            () = shutdown.recv() => {
                tracing::debug!(remote = %remote_addr, "draining connection for shutdown");
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        }
    }

    async fn handle_request(&self, req: Request<Incoming>) -> HttpResponse {
        let timeout = self.settings.request_timeout();
        let limit = self.settings.max_body_size();

        let dispatched = tokio::time::timeout(timeout, async {
            let (parts, body) = req.into_parts();
            match Limited::new(body, limit).collect().await {
                Ok(collected) => {
                    let request = Request::from_parts(parts, collected.to_bytes());
                    self.app.dispatch(request).await
                }
                Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
                    tracing::debug!(limit, path = %parts.uri.path(), "request body too large");
                    error_response(&AtriumError::payload_too_large(limit))
                }
                Err(e) => {
                    tracing::debug!(error = %e, "failed to read request body");
                    error_response(&AtriumError::validation("failed to read request body"))
                }
            }
        })
        .await;

        dispatched.unwrap_or_else(|_| {
            tracing::warn!(timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX), "request timed out");
            record_request(Outcome::Timeout, timeout);
            error_response(&AtriumError::timeout("request timed out"))
        })
    }
}

/// Builds an error response outside `App::dispatch`, under a fresh request id.
fn error_response(err: &AtriumError) -> HttpResponse {
    let request_id = RequestId::new().to_string();
    let mut response = response::error(err, Some(&request_id));
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
