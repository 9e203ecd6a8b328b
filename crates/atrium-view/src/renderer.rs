//! Renders the HTML shell for a resolved view.

use std::panic::{catch_unwind, AssertUnwindSafe};

use atrium_core::{RequestContext, StatePayload};

use crate::config::ViewConfig;
use crate::embed::{escape_script_json, EmbeddedState};
use crate::error::{ViewError, ViewResult};
use crate::layout::LayoutParts;

/// Element id of the component registry listing.
pub const COMPONENTS_ELEMENT_ID: &str = "atrium-components";

/// Element id of the mount point.
pub const MOUNT_ELEMENT_ID: &str = "atrium-root";

const BOOTSTRAP_SCRIPT: &str = concat!(
    "<script>",
    "window.atrium=window.atrium||{};",
    "window.atrium.read=function(id){var el=document.getElementById(id);",
    "return el?JSON.parse(el.textContent):null;};",
    "window.atrium.state=function(){return window.atrium.read(\"atrium-state\");};",
    "window.atrium.components=function(){return window.atrium.read(\"atrium-components\");};",
    "</script>"
);

/// Produces the document that mounts a client component with its state.
///
/// Fragments that do not depend on the request (title, registry listing,
/// scripts) are rendered once at construction.
#[derive(Debug, Clone)]
pub struct ViewRenderer {
    config: ViewConfig,
    title: String,
    components: String,
    scripts: String,
}

impl ViewRenderer {
    /// Creates a renderer.
    pub fn new(config: ViewConfig) -> ViewResult<Self> {
        let listing: Vec<_> = config.components.iter().collect();
        let components = format!(
            r#"<script type="application/json" id="{COMPONENTS_ELEMENT_ID}">{}</script>"#,
            escape_script_json(&serde_json::to_string(&listing)?)
        );

        let mut scripts = String::from(BOOTSTRAP_SCRIPT);
        for src in config
            .components
            .scripts()
            .chain(config.scripts.iter().map(String::as_str))
        {
            scripts.push_str(&format!(
                "\n    <script src=\"{}\" defer></script>",
                html_escape(src)
            ));
        }

        Ok(Self {
            title: html_escape(&config.title),
            config,
            components,
            scripts,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Returns `true` if the component is registered.
    pub fn has_component(&self, name: &str) -> bool {
        self.config.components.contains(name)
    }

    /// Runs the state function, converting a panic into an error.
    pub fn compute_state(&self, ctx: &RequestContext) -> ViewResult<StatePayload> {
        match catch_unwind(AssertUnwindSafe(|| (self.config.state_fn)(ctx))) {
            Ok(Ok(payload)) => Ok(payload),
            Ok(Err(err)) => Err(ViewError::State(err)),
            Err(_) => {
                tracing::error!(
                    request_id = %ctx.request_id(),
                    http.path = %ctx.path(),
                    "state function panicked"
                );
                Err(ViewError::StatePanicked)
            }
        }
    }

    /// Renders the shell for `component`.
    ///
    /// The state function is invoked exactly once.
    pub fn render(&self, component: &str, ctx: &RequestContext) -> ViewResult<String> {
        if !self.has_component(component) {
            return Err(ViewError::UnknownComponent(component.to_string()));
        }

        let state = self.compute_state(ctx)?;
        let embedded = EmbeddedState::new(component, state, ctx.path_params(), ctx.query_params());
        let state_element = embedded.to_script_element()?;
        let mount = format!(
            r#"<div id="{MOUNT_ELEMENT_ID}" data-component="{}"></div>"#,
            html_escape(component)
        );

        tracing::debug!(
            request_id = %ctx.request_id(),
            component = component,
            "view rendered"
        );

        Ok(self.config.layout.render(&LayoutParts {
            title: &self.title,
            components: &self.components,
            mount: &mount,
            state: &state_element,
            scripts: &self.scripts,
        }))
    }
}

/// Simple HTML escape for text and attribute values.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutTemplate;
    use atrium_core::{AtriumError, Credentials};
    use http::Method;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn renderer() -> ViewRenderer {
        let config = ViewConfig::builder()
            .title("User <Directory>")
            .component("home")
            .component_with_script("user-profile", "/static/user-profile.js")
            .script("/static/runtime.js")
            .state_fn(|ctx| Ok(StatePayload::new().with("currentUser", ctx.username())))
            .build()
            .unwrap();
        ViewRenderer::new(config).unwrap()
    }

    fn profile_ctx() -> RequestContext {
        RequestContext::new(Method::GET, "/users/2")
            .with_route("/users/:user-id")
            .with_path_param("user-id", "2")
            .with_credentials(Credentials::new("dave", ""))
    }

    #[test]
    fn test_render_embeds_state_and_params() {
        let html = renderer().render("user-profile", &profile_ctx()).unwrap();
        let embedded = EmbeddedState::extract(&html).unwrap();

        assert_eq!(embedded.component, "user-profile");
        assert_eq!(embedded.path_param("user-id"), Some("2"));
        assert_eq!(
            serde_json::to_value(&embedded.state).unwrap(),
            json!({"currentUser": "dave"})
        );
    }

    #[test]
    fn test_render_includes_shell_parts() {
        let html = renderer().render("home", &RequestContext::mock()).unwrap();

        assert!(html.contains("<title>User &lt;Directory&gt;</title>"));
        assert!(html.contains(r#"<div id="atrium-root" data-component="home"></div>"#));
        assert!(html.contains(r#"id="atrium-components""#));
        assert!(html.contains(r#"{"name":"user-profile","script":"/static/user-profile.js"}"#));
        assert!(html.contains(r#"<script src="/static/user-profile.js" defer></script>"#));
        assert!(html.contains(r#"<script src="/static/runtime.js" defer></script>"#));
        assert!(html.contains("window.atrium.state"));
    }

    #[test]
    fn test_anonymous_state_is_null() {
        let html = renderer().render("home", &RequestContext::mock()).unwrap();
        let embedded = EmbeddedState::extract(&html).unwrap();
        assert_eq!(embedded.state.get("currentUser"), Some(&serde_json::Value::Null));
    }

    #[test]
    fn test_unknown_component() {
        let err = renderer().render("ghost", &RequestContext::mock()).unwrap_err();
        assert!(matches!(err, ViewError::UnknownComponent(name) if name == "ghost"));
    }

    #[test]
    fn test_state_fn_called_once_per_render() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let config = ViewConfig::builder()
            .component("home")
            .state_fn(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(StatePayload::new())
            })
            .build()
            .unwrap();
        let renderer = ViewRenderer::new(config).unwrap();

        renderer.render("home", &RequestContext::mock()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        renderer.render("ghost", &RequestContext::mock()).unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_state_fn_error_propagates() {
        let config = ViewConfig::builder()
            .component("home")
            .state_fn(|_| Err(AtriumError::not_found("no such thing")))
            .build()
            .unwrap();
        let err = ViewRenderer::new(config)
            .unwrap()
            .render("home", &RequestContext::mock())
            .unwrap_err();
        assert!(matches!(err, ViewError::State(AtriumError::NotFound { .. })));
    }

    #[test]
    fn test_state_fn_panic_is_caught() {
        let config = ViewConfig::builder()
            .component("home")
            .state_fn(|_| panic!("boom"))
            .build()
            .unwrap();
        let err = ViewRenderer::new(config)
            .unwrap()
            .render("home", &RequestContext::mock())
            .unwrap_err();
        assert!(matches!(err, ViewError::StatePanicked));
    }

    #[test]
    fn test_custom_layout() {
        let layout = LayoutTemplate::parse(
            "<main title=\"{{title}}\">{{mount}}</main>{{components}}{{state}}{{scripts}}",
        )
        .unwrap();
        let config = ViewConfig::builder()
            .title("Demo")
            .layout(layout)
            .component("home")
            .build()
            .unwrap();
        let html = ViewRenderer::new(config)
            .unwrap()
            .render("home", &RequestContext::mock())
            .unwrap();
        assert!(html.starts_with(r#"<main title="Demo"><div id="atrium-root""#));
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = renderer();
        let ctx = profile_ctx();
        assert_eq!(
            renderer.render("user-profile", &ctx).unwrap(),
            renderer.render("user-profile", &ctx).unwrap()
        );
    }
}
