//! Configuration System
//!
//! Layered configuration built with the `config` crate: built-in defaults,
//! the user-level file, the workspace file, then `EXTGEN_*` environment
//! variables (`__` separates nested keys, e.g. `EXTGEN_LOGGING__LEVEL`).

use crate::error::GenError;
use crate::logging::LoggingConfig;
use crate::platform;
use config::{Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod merge;
mod sources;

pub use sources::global_file::global_config_path;
pub use sources::workspace_file::WORKSPACE_CONFIG_FILE;

/// Directory below the install root that holds global generator manifests
pub const MANIFEST_SUBDIR: &str = "etc";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtgenConfig {
    /// Installation root; derived from the running executable when unset
    #[serde(default)]
    pub install_root: Option<PathBuf>,

    /// Explicit manifest directories, replacing `<install_root>/etc`
    #[serde(default)]
    pub manifest_dirs: Vec<PathBuf>,

    /// Validate manifests against the generator schema before admitting them
    #[serde(default = "default_check_schema")]
    pub check_schema: bool,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_check_schema() -> bool {
    true
}

impl Default for ExtgenConfig {
    fn default() -> Self {
        Self {
            install_root: None,
            manifest_dirs: Vec::new(),
            check_schema: default_check_schema(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ExtgenConfig {
    pub fn validate(&self) -> Result<(), GenError> {
        if self.manifest_dirs.iter().any(|d| d.as_os_str().is_empty()) {
            return Err(GenError::Config(
                "manifest_dirs entries cannot be empty".to_string(),
            ));
        }
        self.logging.validate().map_err(GenError::Config)
    }

    /// Installation root, canonicalized when it exists.
    pub fn install_root(&self) -> Result<PathBuf, GenError> {
        let root = match &self.install_root {
            Some(root) => root.clone(),
            None => platform::install_root()?,
        };
        Ok(dunce::canonicalize(&root).unwrap_or(root))
    }

    /// Directories scanned for `*.generator.yml` manifests.
    pub fn manifest_search_dirs(&self) -> Result<Vec<PathBuf>, GenError> {
        if !self.manifest_dirs.is_empty() {
            return Ok(self.manifest_dirs.clone());
        }
        Ok(vec![self.install_root()?.join(MANIFEST_SUBDIR)])
    }
}

/// Loads [`ExtgenConfig`] from all sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults → user file → `<workspace>/extgen.toml` → environment.
    pub fn load(workspace_root: &Path) -> Result<ExtgenConfig, GenError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::workspace_file::add_to_builder(builder, workspace_root)?;
        let config: ExtgenConfig = builder
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults → `path` → environment. The file must exist.
    pub fn load_from_file(path: &Path) -> Result<ExtgenConfig, GenError> {
        let config: ExtgenConfig = merge::merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("EXTGEN")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
