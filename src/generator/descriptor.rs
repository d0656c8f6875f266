//! Generator descriptor: one globally available generator.

use serde::{Deserialize, Serialize};

/// Immutable once the registry is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GeneratorDescriptor {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Output-directory template
    pub gen_dir: String,
    /// Run-command template
    pub run_cmd: String,
}

impl GeneratorDescriptor {
    pub fn new(
        id: impl Into<String>,
        gen_dir: impl Into<String>,
        run_cmd: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: None,
            download_url: None,
            gen_dir: gen_dir.into(),
            run_cmd: run_cmd.into(),
        }
    }
}
