//! View configuration, including the per-request state function.

use std::fmt;
use std::sync::Arc;

use atrium_core::{AtriumResult, RequestContext, StatePayload};

use crate::error::ViewResult;
use crate::layout::LayoutTemplate;
use crate::registry::{ComponentDef, ComponentRegistry};

/// Title used when none is configured.
pub const DEFAULT_TITLE: &str = "Atrium";

/// Computes the state payload for one view render.
///
/// Must be a pure function of the request context. It runs once per allowed
/// view render and never for API handlers or denied requests.
pub type StateFn = Arc<dyn Fn(&RequestContext) -> AtriumResult<StatePayload> + Send + Sync>;

/// Returns the default state function, which produces an empty payload.
pub fn empty_state() -> StateFn {
    Arc::new(|_: &RequestContext| Ok(StatePayload::new()))
}

/// Everything the renderer needs, fixed at construction.
#[derive(Clone)]
pub struct ViewConfig {
    pub(crate) title: String,
    pub(crate) layout: LayoutTemplate,
    pub(crate) components: ComponentRegistry,
    pub(crate) scripts: Vec<String>,
    pub(crate) state_fn: StateFn,
}

impl ViewConfig {
    /// Starts a builder.
    pub fn builder() -> ViewConfigBuilder {
        ViewConfigBuilder::default()
    }

    /// Returns the page title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the layout template.
    pub fn layout(&self) -> &LayoutTemplate {
        &self.layout
    }

    /// Returns the component registry.
    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    /// Returns extra scripts linked on every page.
    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            layout: LayoutTemplate::default(),
            components: ComponentRegistry::new(),
            scripts: Vec::new(),
            state_fn: empty_state(),
        }
    }
}

impl fmt::Debug for ViewConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewConfig")
            .field("title", &self.title)
            .field("components", &self.components.names())
            .field("scripts", &self.scripts)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ViewConfig`].
///
/// Calling [`state_fn`](Self::state_fn) more than once keeps the **last**
/// function set.
#[derive(Default)]
pub struct ViewConfigBuilder {
    title: Option<String>,
    layout: Option<LayoutTemplate>,
    components: Vec<ComponentDef>,
    scripts: Vec<String>,
    state_fn: Option<StateFn>,
}

impl ViewConfigBuilder {
    /// Sets the page title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the layout template.
    pub fn layout(mut self, layout: LayoutTemplate) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Registers a component without a client script.
    pub fn component(self, name: impl Into<String>) -> Self {
        self.component_def(ComponentDef::new(name))
    }

    /// Registers a component with its client script.
    pub fn component_with_script(self, name: impl Into<String>, script: impl Into<String>) -> Self {
        self.component_def(ComponentDef::new(name).with_script(script))
    }

    /// Registers a component definition.
    pub fn component_def(mut self, component: ComponentDef) -> Self {
        self.components.push(component);
        self
    }

    /// Links an extra script on every page.
    pub fn script(mut self, src: impl Into<String>) -> Self {
        self.scripts.push(src.into());
        self
    }

    /// Sets the state function, replacing any previous one.
    pub fn state_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&RequestContext) -> AtriumResult<StatePayload> + Send + Sync + 'static,
    {
        self.state_fn = Some(Arc::new(f));
        self
    }

    /// Sets an already shared state function, replacing any previous one.
    pub fn shared_state_fn(mut self, f: StateFn) -> Self {
        self.state_fn = Some(f);
        self
    }

    /// Builds the configuration. Component names must be unique.
    pub fn build(self) -> ViewResult<ViewConfig> {
        let mut components = ComponentRegistry::new();
        for component in self.components {
            components.register(component)?;
        }

        Ok(ViewConfig {
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            layout: self.layout.unwrap_or_default(),
            components,
            scripts: self.scripts,
            state_fn: self.state_fn.unwrap_or_else(empty_state),
        })
    }
}
