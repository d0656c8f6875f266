//! Generator manifest documents
//!
//! A manifest is a YAML (or JSON) document with a top-level `generator` list.
//! Reading one happens in three steps: read + syntax parse (failures are `Io`),
//! optional schema check (`SchemaViolation`), then shape conversion into
//! descriptors (a shape mismatch is also a `SchemaViolation`).

use crate::error::GenError;
use crate::generator::descriptor::GeneratorDescriptor;
use crate::generator::registry::LoadIssue;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// File suffixes picked up by discovery
pub const MANIFEST_SUFFIXES: [&str; 2] = [".generator.yml", ".generator.yaml"];

const EMBEDDED_SCHEMA: &str = include_str!("../../schemas/generator.schema.json");

#[derive(Debug, Deserialize)]
struct ManifestDocument {
    #[serde(default)]
    generator: Vec<GeneratorDescriptor>,
}

/// Compiled manifest schema
pub struct ManifestSchema {
    compiled: jsonschema::JSONSchema,
}

impl ManifestSchema {
    /// Compile the schema shipped with the crate.
    pub fn embedded() -> Result<Self, GenError> {
        let value: Value = serde_json::from_str(EMBEDDED_SCHEMA)
            .map_err(|e| GenError::invalid_data("<embedded generator schema>", e))?;
        Self::compile(&value, Path::new("<embedded generator schema>"))
    }

    pub fn compile(schema: &Value, origin: &Path) -> Result<Self, GenError> {
        let compiled =
            jsonschema::JSONSchema::compile(schema).map_err(|e| GenError::SchemaViolation {
                path: origin.to_path_buf(),
                message: format!("invalid schema: {}", e),
            })?;
        Ok(Self { compiled })
    }

    /// Check one parsed document; all violations are joined into one message.
    pub fn check(&self, document: &Value, path: &Path) -> Result<(), GenError> {
        self.compiled.validate(document).map_err(|errors| {
            let messages: Vec<String> = errors
                .map(|e| {
                    let at = e.instance_path.to_string();
                    if at.is_empty() {
                        e.to_string()
                    } else {
                        format!("{}: {}", at, e)
                    }
                })
                .collect();
            GenError::SchemaViolation {
                path: path.to_path_buf(),
                message: messages.join("; "),
            }
        })
    }
}

/// Parse manifest text. `path` is only used for error reporting.
pub fn parse_manifest(
    content: &str,
    path: &Path,
    schema: Option<&ManifestSchema>,
) -> Result<Vec<GeneratorDescriptor>, GenError> {
    let document: Value =
        serde_yaml::from_str(content).map_err(|e| GenError::invalid_data(path, e))?;

    if let Some(schema) = schema {
        schema.check(&document, path)?;
    }

    let manifest: ManifestDocument =
        serde_json::from_value(document).map_err(|e| GenError::SchemaViolation {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(manifest.generator)
}

/// Read and parse one manifest file.
pub fn read_manifest(
    path: &Path,
    schema: Option<&ManifestSchema>,
) -> Result<Vec<GeneratorDescriptor>, GenError> {
    let content = std::fs::read_to_string(path).map_err(|source| GenError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(&content, path, schema)
}

fn is_manifest_name(name: &str) -> bool {
    MANIFEST_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Outcome of a discovery walk
#[derive(Debug, Default)]
pub struct Discovery {
    /// Manifest files, sorted and deduplicated
    pub manifests: Vec<PathBuf>,
    /// Entries the walk could not read: broken links, unreadable directories
    pub issues: Vec<LoadIssue>,
}

fn walk_issue(err: walkdir::Error, root: &Path) -> LoadIssue {
    let path = err.path().unwrap_or(root).to_path_buf();
    let message = err.to_string();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, message));
    LoadIssue {
        manifest: path.clone(),
        error: GenError::Io { path, source },
    }
}

/// Find manifest files under `dirs`.
///
/// Missing directories are skipped. Anything else the walk cannot read is
/// reported as an `Io` issue. The sorted order is what makes first-wins
/// conflict handling reproducible across machines.
pub fn discover_manifests<P: AsRef<Path>>(dirs: &[P]) -> Discovery {
    let mut discovery = Discovery::default();
    for dir in dirs {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "Manifest directory does not exist, skipping");
            continue;
        }
        for entry in WalkDir::new(dir).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let issue = walk_issue(err, dir);
                    warn!(
                        path = %issue.manifest.display(),
                        error = %issue.error,
                        "Manifest walk failed"
                    );
                    discovery.issues.push(issue);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.file_name().to_str().map(is_manifest_name).unwrap_or(false) {
                discovery.manifests.push(entry.into_path());
            }
        }
    }
    discovery.manifests.sort();
    discovery.manifests.dedup();
    discovery
}
