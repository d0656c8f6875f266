//! Context binding table
//!
//! Records, per context, which generator produces files into which directory
//! on behalf of which component. Entries are append-only and kept in insertion
//! order; that order is what makes generated layers reproducible.

use crate::context::ContextId;
use crate::error::{ConflictKind, GenError};
use crate::validator::ValidatedRequest;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One (generator, directory, component) association inside a context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UsedGeneratorEntry {
    pub generator_id: String,
    pub gen_dir: String,
    pub component_id: String,
}

/// Ordered bindings of one context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextBindingSet {
    entries: Vec<UsedGeneratorEntry>,
}

impl ContextBindingSet {
    pub fn entries(&self) -> &[UsedGeneratorEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find(&self, generator_id: &str, component_id: &str) -> Option<&UsedGeneratorEntry> {
        self.entries
            .iter()
            .find(|e| e.generator_id == generator_id && e.component_id == component_id)
    }
}

/// Result of a successful bind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    Added,
    /// Same directory was already recorded; nothing changed
    AlreadyBound,
}

/// Per-context binding sets, contexts kept in first-bound order
#[derive(Debug, Clone, Default)]
pub struct ContextBindingTable {
    contexts: IndexMap<ContextId, ContextBindingSet>,
}

impl ContextBindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `request`'s component uses its generator in `context`,
    /// writing into `gen_dir`.
    pub fn bind(
        &mut self,
        context: &ContextId,
        request: &ValidatedRequest,
        gen_dir: impl Into<String>,
    ) -> Result<BindOutcome, GenError> {
        self.append(
            context,
            UsedGeneratorEntry {
                generator_id: request.generator_id().to_string(),
                gen_dir: gen_dir.into(),
                component_id: request.component_id().to_string(),
            },
        )
    }

    /// `Ok(true)` when an identical entry is already recorded.
    fn check(&self, context: &ContextId, entry: &UsedGeneratorEntry) -> Result<bool, GenError> {
        match self
            .contexts
            .get(context)
            .and_then(|set| set.find(&entry.generator_id, &entry.component_id))
        {
            Some(existing) if existing.gen_dir == entry.gen_dir => Ok(true),
            Some(existing) => Err(GenError::Conflict(ConflictKind::BindingDirectory {
                context: context.to_string(),
                generator: entry.generator_id.clone(),
                component: entry.component_id.clone(),
                existing: existing.gen_dir.clone(),
                requested: entry.gen_dir.clone(),
            })),
            None => Ok(false),
        }
    }

    fn append(
        &mut self,
        context: &ContextId,
        entry: UsedGeneratorEntry,
    ) -> Result<BindOutcome, GenError> {
        if self.check(context, &entry)? {
            return Ok(BindOutcome::AlreadyBound);
        }

        debug!(
            context = %context,
            generator = %entry.generator_id,
            component = %entry.component_id,
            gen_dir = %entry.gen_dir,
            "Generator bound"
        );
        self.contexts
            .entry(context.clone())
            .or_default()
            .entries
            .push(entry);
        Ok(BindOutcome::Added)
    }

    /// Bindings of a context in insertion order; empty for an unknown context.
    pub fn entries_for(&self, context: &ContextId) -> &[UsedGeneratorEntry] {
        self.contexts
            .get(context)
            .map(ContextBindingSet::entries)
            .unwrap_or(&[])
    }

    pub fn binding_set(&self, context: &ContextId) -> Option<&ContextBindingSet> {
        self.contexts.get(context)
    }

    pub fn contains_context(&self, context: &ContextId) -> bool {
        self.contexts.contains_key(context)
    }

    /// Contexts with at least one binding, in first-bound order
    pub fn all_contexts(&self) -> impl Iterator<Item = &ContextId> {
        self.contexts.keys()
    }

    /// generator id → directory → contexts using it, all in first-bound order.
    ///
    /// A generator needs one invocation per distinct directory.
    pub fn usage_by_generator(&self) -> IndexMap<String, IndexMap<String, Vec<ContextId>>> {
        let mut usage: IndexMap<String, IndexMap<String, Vec<ContextId>>> = IndexMap::new();
        for (context, set) in &self.contexts {
            for entry in &set.entries {
                let contexts = usage
                    .entry(entry.generator_id.clone())
                    .or_default()
                    .entry(entry.gen_dir.clone())
                    .or_default();
                if !contexts.contains(context) {
                    contexts.push(context.clone());
                }
            }
        }
        usage
    }

    /// Fold another table (e.g. one worker's partition) into this one.
    ///
    /// Uses the same rules as [`bind`](Self::bind). All or nothing: on a
    /// conflict no entry of `other` is recorded.
    pub fn merge(&mut self, other: ContextBindingTable) -> Result<(), GenError> {
        for (context, set) in &other.contexts {
            for entry in &set.entries {
                self.check(context, entry)?;
            }
        }
        for (context, set) in other.contexts {
            for entry in set.entries {
                self.append(&context, entry)?;
            }
        }
        Ok(())
    }
}
