//! Generated-import layers
//!
//! A generated layer lists the generator output locations a context must treat
//! as extra sources. It is computed on request from the binding table, never
//! cached, and owned by the caller once returned.

use crate::binding::ContextBindingTable;
use crate::context::ContextId;
use crate::error::{GenError, NotFoundKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Suffix of the import description a generator writes into its directory
pub const IMPORT_FILE_SUFFIX: &str = ".cgen.yml";

/// One import location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GeneratedLayerEntry {
    pub generator_id: String,
    pub gen_dir: String,
    /// `<gen-dir>/<project>.cgen.yml`
    pub import_file: String,
}

/// Generated-import layer of one context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GeneratedLayer {
    pub context: ContextId,
    pub generators: Vec<GeneratedLayerEntry>,
}

impl GeneratedLayer {
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Import directories in layer order
    pub fn gen_dirs(&self) -> impl Iterator<Item = &str> {
        self.generators.iter().map(|e| e.gen_dir.as_str())
    }

    pub fn to_yaml(&self) -> Result<String, GenError> {
        serde_yaml::to_string(self)
            .map_err(|e| GenError::invalid_data(format!("<layer {}>", self.context), e))
    }

    pub fn to_json(&self) -> Result<String, GenError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GenError::invalid_data(format!("<layer {}>", self.context), e))
    }
}

fn import_file(gen_dir: &str, context: &ContextId) -> String {
    let dir = gen_dir.trim_end_matches('/');
    if dir.is_empty() {
        format!("{}{}", context.project(), IMPORT_FILE_SUFFIX)
    } else {
        format!("{}/{}{}", dir, context.project(), IMPORT_FILE_SUFFIX)
    }
}

/// Builds layers from a binding table
pub struct LayerSynthesizer<'t> {
    table: &'t ContextBindingTable,
}

impl<'t> LayerSynthesizer<'t> {
    pub fn new(table: &'t ContextBindingTable) -> Self {
        Self { table }
    }

    /// Layer for `context`: bound (generator, dir) pairs in binding order,
    /// identical pairs collapsed onto their first occurrence.
    pub fn synthesize(&self, context: &ContextId) -> Result<GeneratedLayer, GenError> {
        let set = self
            .table
            .binding_set(context)
            .ok_or_else(|| GenError::not_found(NotFoundKind::Context, context.as_str()))?;

        let mut generators: Vec<GeneratedLayerEntry> = Vec::with_capacity(set.len());
        for entry in set.entries() {
            let seen = generators
                .iter()
                .any(|g| g.generator_id == entry.generator_id && g.gen_dir == entry.gen_dir);
            if !seen {
                generators.push(GeneratedLayerEntry {
                    generator_id: entry.generator_id.clone(),
                    gen_dir: entry.gen_dir.clone(),
                    import_file: import_file(&entry.gen_dir, context),
                });
            }
        }

        debug!(context = %context, entries = generators.len(), "Generated layer synthesized");
        Ok(GeneratedLayer {
            context: context.clone(),
            generators,
        })
    }

    /// Layers for every bound context, in first-bound order.
    pub fn synthesize_all(&self) -> Result<Vec<GeneratedLayer>, GenError> {
        self.table
            .all_contexts()
            .map(|context| self.synthesize(context))
            .collect()
    }
}
