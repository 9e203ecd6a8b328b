//! Registry of client components.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{ViewError, ViewResult};

/// A client-renderable component known to the server by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentDef {
    /// Component name, as used in route targets.
    pub name: String,
    /// Optional client script that defines the component.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

impl ComponentDef {
    /// Creates a component without a script.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: None,
        }
    }

    /// Sets the client script path.
    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = Some(script.into());
        self
    }
}

/// Ordered set of registered components.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: Vec<ComponentDef>,
    by_name: HashMap<String, usize>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component. Names must be unique.
    pub fn register(&mut self, component: ComponentDef) -> ViewResult<()> {
        if self.by_name.contains_key(&component.name) {
            return Err(ViewError::DuplicateComponent(component.name));
        }
        self.by_name
            .insert(component.name.clone(), self.components.len());
        self.components.push(component);
        Ok(())
    }

    /// Returns the component with the given name.
    pub fn get(&self, name: &str) -> Option<&ComponentDef> {
        self.by_name.get(name).map(|&i| &self.components[i])
    }

    /// Returns `true` if a component with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Iterates over components in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentDef> {
        self.components.iter()
    }

    /// Returns component names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.name.as_str()).collect()
    }

    /// Returns client scripts declared by components, in registration order.
    pub fn scripts(&self) -> impl Iterator<Item = &str> {
        self.components.iter().filter_map(|c| c.script.as_deref())
    }

    /// Returns the number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns `true` if no components are registered.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
