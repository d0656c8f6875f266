//! Resolution input document
//!
//! Structured component and context metadata as produced by the upstream
//! project parser, in serialized form so the CLI can drive the engine:
//!
//! ```yaml
//! components:
//!   - id: Device:Config
//!     generator: G1
//! contexts:
//!   - id: blinky.Debug+CM4
//!     type: single-core
//!     components:
//!       - component: Device:Config
//! ```

use crate::component::{ComponentCatalog, ComponentDeclaration};
use crate::context::ContextId;
use crate::engine::ContextPlan;
use crate::error::GenError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolutionInput {
    #[serde(default)]
    pub components: Vec<ComponentDeclaration>,
    #[serde(default)]
    pub contexts: Vec<ContextPlan>,
}

impl ResolutionInput {
    pub fn parse(content: &str, path: &Path) -> Result<Self, GenError> {
        serde_yaml::from_str(content).map_err(|e| GenError::invalid_data(path, e))
    }

    pub fn load(path: &Path) -> Result<Self, GenError> {
        let content = std::fs::read_to_string(path).map_err(|source| GenError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    pub fn catalog(&self) -> ComponentCatalog {
        self.components.iter().cloned().collect()
    }

    pub fn plan(&self, context: &ContextId) -> Option<&ContextPlan> {
        self.contexts.iter().find(|p| &p.descriptor.id == context)
    }
}
