//! Component metadata as seen by generator resolution.
//!
//! Components are parsed upstream. The engine only reads which generator a
//! component declares; it never owns or modifies that metadata.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Read-only view over parsed component metadata
pub trait ComponentMetadata {
    /// Whether the component is known at all
    fn contains(&self, component_id: &str) -> bool;

    /// Generator the component declares, if it requires generation
    fn required_generator(&self, component_id: &str) -> Option<&str>;
}

/// One component declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDeclaration {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
}

/// In-memory component metadata keyed by component id
#[derive(Debug, Clone, Default)]
pub struct ComponentCatalog {
    components: IndexMap<String, ComponentDeclaration>,
}

impl ComponentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later declarations of the same id replace earlier ones.
    pub fn insert(&mut self, declaration: ComponentDeclaration) {
        self.components.insert(declaration.id.clone(), declaration);
    }

    pub fn with_component(mut self, id: impl Into<String>, generator: Option<&str>) -> Self {
        self.insert(ComponentDeclaration {
            id: id.into(),
            generator: generator.map(str::to_string),
        });
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentDeclaration> {
        self.components.values()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl FromIterator<ComponentDeclaration> for ComponentCatalog {
    fn from_iter<I: IntoIterator<Item = ComponentDeclaration>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for declaration in iter {
            catalog.insert(declaration);
        }
        catalog
    }
}

impl ComponentMetadata for ComponentCatalog {
    fn contains(&self, component_id: &str) -> bool {
        self.components.contains_key(component_id)
    }

    fn required_generator(&self, component_id: &str) -> Option<&str> {
        self.components
            .get(component_id)
            .and_then(|c| c.generator.as_deref())
    }
}
