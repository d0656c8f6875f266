//! `${name}` placeholder substitution for gen-dir and run-cmd templates.
//!
//! Rendering is pure: identical templates and variables always produce the
//! same string. A `$` that does not open `${` and an unterminated `${` are
//! copied through literally.

use crate::context::ContextDescriptor;
use crate::error::{GenError, NotFoundKind};
use std::collections::BTreeMap;

pub const VAR_COMPONENT: &str = "comp";
pub const VAR_CONTEXT: &str = "context";
pub const VAR_PROJECT: &str = "project";
pub const VAR_TYPE: &str = "type";
pub const VAR_SECURITY: &str = "security";
pub const VAR_GEN_DIR: &str = "gen-dir";

/// Variables available while rendering one template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVars {
    values: BTreeMap<String, String>,
}

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variables for one component inside one context.
    ///
    /// Free per-context variables are applied first so the built-in names
    /// always win.
    pub fn for_component(context: &ContextDescriptor, component_id: &str) -> Self {
        let mut vars = Self::new();
        for (key, value) in &context.vars {
            vars.set(key.clone(), value.clone());
        }
        vars.set(VAR_COMPONENT, component_id);
        vars.set(VAR_CONTEXT, context.id.as_str());
        vars.set(VAR_PROJECT, context.id.project());
        vars.set(VAR_TYPE, context.project_type.as_str());
        vars.set(
            VAR_SECURITY,
            context.security.map(|s| s.as_str()).unwrap_or(""),
        );
        vars
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Substitute every `${name}` in `template`.
pub fn render(template: &str, vars: &TemplateVars) -> Result<String, GenError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                let value = vars
                    .get(name)
                    .ok_or_else(|| GenError::not_found(NotFoundKind::TemplateVariable, name))?;
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

/// Names of all placeholders in `template`, in order of appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                names.push(&after[..end]);
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    names
}
