//! The request pipeline.
//!
//! [`App`] owns the route table, handler registry, access policy and view
//! renderer, and turns one request into one response:
//!
//! ```text
//! Received ─┬─ Matched ── Authorizing ─┬─ Allowed ─┬─ view:    StateComputed → Rendered
//!           │                          │           └─ handler: HandlerInvoked → Responded
//!           │                          └─ Denied (401 + challenge)
//!           └─ NotMatched ─┬─ 405 + Allow, when other methods serve the path
//!                          │    (the 405 fallback view, when one is registered)
//!                          ├─ 404 fallback view, when one is registered
//!                          └─ generic 404 envelope
//! ```
//!
//! The state function runs only for allowed view routes. Neither it nor a
//! handler can take the process down: panics become a generic 500.

use std::fmt;
use std::future::Future;
use std::time::Instant;

use atrium_authz::{extract_credentials, AccessPolicy, Decision, DenyReason};
use atrium_config::AtriumConfig;
use atrium_core::{
    AtriumError, Endpoint, Params, RequestContext, RoleSet, RouteTarget, FALLBACK_STATUSES,
};
use atrium_router::{RouteMatch, RouteTable};
use atrium_telemetry::metrics::{record_access_decision, record_request};
use atrium_telemetry::{InFlightGuard, Outcome};
use atrium_view::{ViewConfig, ViewRenderer};
use bytes::Bytes;
use http::header::{HeaderValue, ALLOW, WWW_AUTHENTICATE};
use http::{Method, Request, StatusCode};
use serde::Serialize;
use tracing::Instrument;

use crate::configure;
use crate::error::{ServerError, ServerResult};
use crate::handler::{HandlerError, HandlerRegistry};
use crate::response::{self, HttpResponse, REQUEST_ID_HEADER};

/// An assembled application, ready to dispatch requests.
///
/// Built with [`App::builder`]; immutable afterwards and shared across
/// connections behind an `Arc`.
///
/// # Example
///
/// ```rust
/// use atrium_core::Role;
/// use atrium_server::App;
/// use atrium_view::ViewConfig;
/// use bytes::Bytes;
/// use http::{Request, StatusCode};
///
/// # tokio_test::block_on(async {
/// let app = App::builder()
///     .view_config(ViewConfig::builder().component("home").build().unwrap())
///     .view("/", "home", Role::Anyone)
///     .build()
///     .unwrap();
///
/// let response = app.dispatch(Request::get("/").body(Bytes::new()).unwrap()).await;
/// assert_eq!(response.status(), StatusCode::OK);
/// # });
/// ```
pub struct App {
    routes: RouteTable<Endpoint>,
    handlers: HandlerRegistry,
    policy: AccessPolicy,
    views: ViewRenderer,
}

impl App {
    /// Creates an application builder.
    #[must_use]
    pub fn builder() -> AppBuilder {
        AppBuilder::default()
    }

    /// Returns the route table.
    pub fn routes(&self) -> &RouteTable<Endpoint> {
        &self.routes
    }

    /// Returns the handler registry.
    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Returns the access policy.
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Returns the view renderer.
    pub fn views(&self) -> &ViewRenderer {
        &self.views
    }

    /// Dispatches one request.
    ///
    /// Never fails: every outcome, including internal errors, is a response.
    /// Each response carries an `x-request-id` header.
    pub async fn dispatch(&self, request: Request<Bytes>) -> HttpResponse {
        let _in_flight = InFlightGuard::new();
        let started = Instant::now();

        let (parts, _body) = request.into_parts();
        let mut ctx = RequestContext::new(parts.method, parts.uri.path());
        ctx.set_query_params(parse_query(parts.uri.query()));
        ctx.set_credentials(extract_credentials(&parts.headers));
        let verified = self.policy.verify(ctx.credentials());
        ctx.set_verified(verified);

        let request_id = ctx.request_id().to_string();
        let span = tracing::info_span!(
            "request",
            request_id = %request_id,
            "http.method" = %ctx.method(),
            "http.path" = %ctx.path(),
            route = tracing::field::Empty,
        );

        let (mut response, outcome) = self.route(ctx).instrument(span.clone()).await;
        let elapsed = started.elapsed();

        span.in_scope(|| {
            tracing::info!(
                "http.status_code" = response.status().as_u16(),
                outcome = %outcome,
                duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                "request completed"
            );
        });
        record_request(outcome, elapsed);

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }

    async fn route(&self, mut ctx: RequestContext) -> (HttpResponse, Outcome) {
        if let Some(RouteMatch { entry, params }) = self.routes.match_route(ctx.method(), ctx.path()) {
            tracing::Span::current().record("route", entry.pattern().as_str());
            ctx.set_route(entry.pattern().as_str());
            ctx.set_path_params(params);
            return self.serve(entry.value(), ctx, StatusCode::OK).await;
        }

        let request_id = ctx.request_id().to_string();

        let allowed = self.routes.allowed_methods(ctx.path());
        if !allowed.is_empty() {
            let names: Vec<String> = allowed.iter().map(|m| m.as_str().to_string()).collect();
            let allow = HeaderValue::from_str(&names.join(", ")).ok();

            let status = StatusCode::METHOD_NOT_ALLOWED;
            let (mut response, outcome) = match self.routes.fallback_for(status) {
                Some(endpoint) => {
                    self.serve_fallback(endpoint, ctx, status, Outcome::MethodNotAllowed)
                        .await
                }
                None => {
                    let err = AtriumError::method_not_allowed(ctx.method().as_str(), names);
                    (response::error(&err, Some(&request_id)), Outcome::MethodNotAllowed)
                }
            };
            if let Some(value) = allow.filter(|_| response.status() == status) {
                response.headers_mut().insert(ALLOW, value);
            }
            return (response, outcome);
        }

        if let Some(endpoint) = self.routes.fallback_for(StatusCode::NOT_FOUND) {
            return self
                .serve_fallback(endpoint, ctx, StatusCode::NOT_FOUND, Outcome::NotMatched)
                .await;
        }

        tracing::debug!("no route matched");
        let err = AtriumError::not_matched(ctx.method().as_str(), ctx.path());
        (response::error(&err, Some(&request_id)), Outcome::NotMatched)
    }

    /// Serves a fallback view, reporting a successful render as `rendered`.
    async fn serve_fallback(
        &self,
        endpoint: &Endpoint,
        ctx: RequestContext,
        status: StatusCode,
        rendered: Outcome,
    ) -> (HttpResponse, Outcome) {
        let (response, outcome) = self.serve(endpoint, ctx, status).await;
        if outcome == Outcome::Rendered {
            (response, rendered)
        } else {
            (response, outcome)
        }
    }

    async fn serve(
        &self,
        endpoint: &Endpoint,
        ctx: RequestContext,
        status: StatusCode,
    ) -> (HttpResponse, Outcome) {
        match self.policy.authorize(ctx.credentials(), &endpoint.roles) {
            Decision::Allow => record_access_decision(true, "allowed"),
            Decision::Deny(reason) => {
                record_access_decision(false, reason.as_str());
                tracing::info!(reason = %reason, roles = %endpoint.roles, "access denied");
                return (self.challenge(&ctx, reason), Outcome::Denied);
            }
        }

        match &endpoint.target {
            RouteTarget::View(component) => self.render_view(component, &ctx, status),
            RouteTarget::Handler(name) => self.invoke_handler(name, ctx).await,
        }
    }

    fn challenge(&self, ctx: &RequestContext, reason: DenyReason) -> HttpResponse {
        let message = match reason {
            DenyReason::MissingCredentials => "authentication required",
            DenyReason::RejectedCredentials => "invalid credentials",
            DenyReason::NoPermittedRoles => "access denied",
        };
        let err = AtriumError::unauthorized(message);
        let mut response = response::error(&err, Some(&ctx.request_id().to_string()));
        response
            .headers_mut()
            .insert(WWW_AUTHENTICATE, self.policy.challenge().clone());
        response
    }

    fn render_view(
        &self,
        component: &str,
        ctx: &RequestContext,
        status: StatusCode,
    ) -> (HttpResponse, Outcome) {
        match self.views.render(component, ctx) {
            Ok(html) => (response::html(status, html), Outcome::Rendered),
            Err(e) => {
                let err = AtriumError::from(e);
                log_failure(&err, "view render failed");
                let response = response::error(&err, Some(&ctx.request_id().to_string()));
                (response, Outcome::Error)
            }
        }
    }

    async fn invoke_handler(&self, name: &str, ctx: RequestContext) -> (HttpResponse, Outcome) {
        let request_id = ctx.request_id().to_string();

        let Some(handler) = self.handlers.get(name) else {
            let err = AtriumError::internal(format!("handler '{name}' is not registered"));
            log_failure(&err, "handler lookup failed");
            return (response::error(&err, Some(&request_id)), Outcome::Error);
        };

        let result = match tokio::spawn(handler(ctx)).await {
            Ok(result) => result.map_err(AtriumError::from),
            Err(join) if join.is_panic() => Err(AtriumError::internal(format!(
                "handler '{name}' panicked"
            ))),
            Err(join) => Err(AtriumError::internal_with_source(
                format!("handler '{name}' was cancelled"),
                join,
            )),
        };

        match result {
            Ok(body) => (response::json(StatusCode::OK, body), Outcome::Responded),
            Err(err) => {
                log_failure(&err, "handler failed");
                let outcome = if err.is_internal() {
                    Outcome::Error
                } else {
                    Outcome::Responded
                };
                (response::error(&err, Some(&request_id)), outcome)
            }
        }
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("routes", &self.routes.len())
            .field("handlers", &self.handlers)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

fn log_failure(err: &AtriumError, message: &str) {
    if err.is_internal() {
        tracing::error!(error = %err, "{message}");
    } else {
        tracing::debug!(error = %err, "{message}");
    }
}

/// Decodes a query string; a repeated key keeps its last value.
fn parse_query(query: Option<&str>) -> Params {
    let mut params = Params::new();
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return params;
    };

    match serde_urlencoded::from_str::<Vec<(String, String)>>(query) {
        Ok(pairs) => {
            for (name, value) in pairs {
                params.set(name, value);
            }
        }
        Err(e) => tracing::debug!(error = %e, "ignoring malformed query string"),
    }
    params
}

#[derive(Debug)]
struct RouteDecl {
    method: Method,
    pattern: String,
    endpoint: Endpoint,
}

/// Builder for [`App`].
///
/// Routes are matched in the order they are added: the first registered
/// pattern that fits a path wins.
#[derive(Debug, Default)]
pub struct AppBuilder {
    routes: Vec<RouteDecl>,
    fallbacks: Vec<(StatusCode, Endpoint)>,
    handlers: HandlerRegistry,
    views: Option<ViewConfig>,
    policy: Option<AccessPolicy>,
}

impl AppBuilder {
    /// Adds a route.
    #[must_use]
    pub fn route(
        mut self,
        method: Method,
        pattern: impl Into<String>,
        target: RouteTarget,
        roles: impl Into<RoleSet>,
    ) -> Self {
        self.routes.push(RouteDecl {
            method,
            pattern: pattern.into(),
            endpoint: Endpoint::new(target, roles),
        });
        self
    }

    /// Adds a `GET` route rendering a view component.
    #[must_use]
    pub fn view(self, pattern: impl Into<String>, component: impl Into<String>, roles: impl Into<RoleSet>) -> Self {
        self.route(Method::GET, pattern, RouteTarget::view(component), roles)
    }

    /// Adds a `GET` route invoking an API handler.
    #[must_use]
    pub fn api(self, pattern: impl Into<String>, handler: impl Into<String>, roles: impl Into<RoleSet>) -> Self {
        self.route(Method::GET, pattern, RouteTarget::handler(handler), roles)
    }

    /// Sets the view rendered when nothing matched and the response would
    /// carry `status`, which must be `404` or `405`. A later fallback for the
    /// same status replaces it.
    #[must_use]
    pub fn fallback(mut self, status: StatusCode, component: impl Into<String>, roles: impl Into<RoleSet>) -> Self {
        self.fallbacks
            .push((status, Endpoint::new(RouteTarget::view(component), roles)));
        self
    }

    /// Registers an API handler under `name`.
    #[must_use]
    pub fn handler<Res, F, Fut>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        Res: Serialize + Send + 'static,
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Res, HandlerError>> + Send + 'static,
    {
        self.handlers.register(name, handler);
        self
    }

    /// Replaces the handler registry.
    #[must_use]
    pub fn handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    /// Sets the view configuration: components, layout and state function.
    #[must_use]
    pub fn view_config(mut self, config: ViewConfig) -> Self {
        self.views = Some(config);
        self
    }

    /// Sets the access policy. Defaults to presence-only in realm `Atrium`.
    #[must_use]
    pub fn access_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Applies the access policy, routes and fallbacks declared in
    /// configuration. Configured routes come after routes added so far.
    pub fn configure(mut self, config: &AtriumConfig) -> ServerResult<Self> {
        self.policy = Some(configure::access_policy(&config.access)?);

        for spec in &config.routes {
            self = self.route(spec.parsed_method()?, spec.pattern.clone(), spec.target()?, spec.roles);
        }
        for spec in &config.fallbacks {
            self = self.fallback(spec.status_code()?, spec.view.clone(), spec.roles);
        }
        Ok(self)
    }

    /// Validates every route and assembles the application.
    ///
    /// # Errors
    ///
    /// - [`ServerError::Misconfigured`] if a route names an unknown component
    ///   or handler, or a fallback names an unknown component or a status
    ///   other than `404` and `405`
    /// - [`ServerError::Route`] if a pattern does not compile
    /// - [`ServerError::View`] if the default view configuration is invalid
    pub fn build(self) -> ServerResult<App> {
        let views = match self.views {
            Some(config) => ViewRenderer::new(config)?,
            None => ViewRenderer::new(ViewConfig::builder().build()?)?,
        };
        let policy = self.policy.unwrap_or_default();

        let mut routes = RouteTable::new();
        for decl in self.routes {
            check_target(&decl.pattern, &decl.endpoint.target, &views, &self.handlers)?;
            routes.register(decl.method, &decl.pattern, decl.endpoint)?;
        }
        for (status, endpoint) in self.fallbacks {
            let name = format!("fallback {}", status.as_u16());
            if !FALLBACK_STATUSES.contains(&status) {
                return Err(ServerError::misconfigured(
                    name,
                    "fallbacks are only rendered for 404 and 405",
                ));
            }
            check_target(&name, &endpoint.target, &views, &self.handlers)?;
            routes.fallback(status, endpoint);
        }

        tracing::debug!(
            routes = routes.len(),
            handlers = self.handlers.len(),
            components = views.config().components().len(),
            "application assembled"
        );

        Ok(App {
            routes,
            handlers: self.handlers,
            policy,
            views,
        })
    }
}

fn check_target(
    route: &str,
    target: &RouteTarget,
    views: &ViewRenderer,
    handlers: &HandlerRegistry,
) -> ServerResult<()> {
    match target {
        RouteTarget::View(component) if !views.has_component(component) => Err(
            ServerError::misconfigured(route, format!("unknown component '{component}'")),
        ),
        RouteTarget::Handler(name) if !handlers.contains(name) => Err(
            ServerError::misconfigured(route, format!("unknown handler '{name}'")),
        ),
        _ => Ok(()),
    }
}
