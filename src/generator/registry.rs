//! Generator registry: the authoritative set of globally available generators.
//!
//! Built once through [`RegistryBuilder`] (or [`GeneratorRegistry::load`]) and
//! read-only afterwards. There is no mutating API on [`GeneratorRegistry`], so a
//! shared `&GeneratorRegistry` can be handed to any number of resolution passes.

use crate::error::{ConflictKind, GenError, GenErrorKind, NotFoundKind};
use crate::generator::descriptor::GeneratorDescriptor;
use crate::generator::manifest::{discover_manifests, read_manifest, ManifestSchema};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

static GLOBAL_REGISTRY: OnceLock<GeneratorRegistry> = OnceLock::new();

/// A problem with one manifest, collected instead of aborting the load
#[derive(Debug)]
pub struct LoadIssue {
    pub manifest: PathBuf,
    pub error: GenError,
}

/// Outcome of a registry load pass
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Manifests that were read and admitted (possibly with conflicting entries skipped)
    pub loaded: Vec<PathBuf>,
    pub issues: Vec<LoadIssue>,
}

impl LoadReport {
    /// True unless some manifest could not be read or parsed at all.
    ///
    /// Schema violations and conflicts are reported but do not fail the pass.
    pub fn is_success(&self) -> bool {
        !self
            .issues
            .iter()
            .any(|issue| issue.error.kind() == GenErrorKind::Io)
    }

    pub fn issues_of(&self, kind: GenErrorKind) -> impl Iterator<Item = &LoadIssue> {
        self.issues.iter().filter(move |i| i.error.kind() == kind)
    }
}

/// Mutable loading phase of the registry
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    generators: IndexMap<String, (GeneratorDescriptor, PathBuf)>,
    report: LoadReport,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit one descriptor.
    ///
    /// Returns `Ok(true)` when newly added and `Ok(false)` for an identical
    /// duplicate. A differing definition under a known id is a conflict; the
    /// first definition stays.
    pub fn insert(
        &mut self,
        descriptor: GeneratorDescriptor,
        origin: &Path,
    ) -> Result<bool, GenError> {
        if let Some((existing, first)) = self.generators.get(&descriptor.id) {
            if *existing == descriptor {
                debug!(generator = %descriptor.id, "Identical generator definition ignored");
                return Ok(false);
            }
            return Err(GenError::Conflict(ConflictKind::GeneratorDefinition {
                id: descriptor.id,
                first: first.display().to_string(),
            }));
        }
        self.generators
            .insert(descriptor.id.clone(), (descriptor, origin.to_path_buf()));
        Ok(true)
    }

    /// Read one manifest and merge its descriptors; problems land in the report.
    pub fn load_manifest(&mut self, path: &Path, schema: Option<&ManifestSchema>) {
        let descriptors = match read_manifest(path, schema) {
            Ok(d) => d,
            Err(error) => {
                warn!(manifest = %path.display(), error = %error, "Generator manifest rejected");
                self.report.issues.push(LoadIssue {
                    manifest: path.to_path_buf(),
                    error,
                });
                return;
            }
        };

        for descriptor in descriptors {
            if let Err(error) = self.insert(descriptor, path) {
                warn!(manifest = %path.display(), error = %error, "Generator definition skipped");
                self.report.issues.push(LoadIssue {
                    manifest: path.to_path_buf(),
                    error,
                });
            }
        }
        self.report.loaded.push(path.to_path_buf());
    }

    pub fn build(self) -> (GeneratorRegistry, LoadReport) {
        let origins = self
            .generators
            .iter()
            .map(|(id, (_, origin))| (id.clone(), origin.clone()))
            .collect();
        let generators = self
            .generators
            .into_iter()
            .map(|(id, (descriptor, _))| (id, descriptor))
            .collect();
        (
            GeneratorRegistry {
                generators,
                origins,
            },
            self.report,
        )
    }
}

/// Read-only set of global generators
#[derive(Debug, Default)]
pub struct GeneratorRegistry {
    generators: IndexMap<String, GeneratorDescriptor>,
    origins: IndexMap<String, PathBuf>,
}

impl GeneratorRegistry {
    /// Load all manifests in order, best effort.
    ///
    /// Only fails when the embedded schema itself cannot be compiled; every
    /// per-manifest problem is collected in the returned report.
    pub fn load<P: AsRef<Path>>(
        manifest_paths: &[P],
        check_schema: bool,
    ) -> Result<(Self, LoadReport), GenError> {
        Self::load_into(RegistryBuilder::new(), manifest_paths, check_schema)
    }

    /// Discover manifests under `dirs` and load them.
    ///
    /// Unreadable walk entries land in the report as `Io` issues, so they fail
    /// the pass like an unreadable manifest does.
    pub fn discover<P: AsRef<Path>>(
        dirs: &[P],
        check_schema: bool,
    ) -> Result<(Self, LoadReport), GenError> {
        let discovery = discover_manifests(dirs);
        debug!(
            manifests = discovery.manifests.len(),
            walk_issues = discovery.issues.len(),
            "Generator manifests discovered"
        );
        let mut builder = RegistryBuilder::new();
        builder.report.issues.extend(discovery.issues);
        Self::load_into(builder, &discovery.manifests, check_schema)
    }

    fn load_into<P: AsRef<Path>>(
        mut builder: RegistryBuilder,
        manifest_paths: &[P],
        check_schema: bool,
    ) -> Result<(Self, LoadReport), GenError> {
        let schema = if check_schema {
            Some(ManifestSchema::embedded()?)
        } else {
            None
        };

        for path in manifest_paths {
            builder.load_manifest(path.as_ref(), schema.as_ref());
        }
        let (registry, report) = builder.build();
        info!(
            generators = registry.len(),
            manifests = report.loaded.len(),
            issues = report.issues.len(),
            "Generator registry loaded"
        );
        Ok((registry, report))
    }

    /// Build from in-memory descriptors; the first conflict is an error.
    pub fn from_descriptors<I>(descriptors: I) -> Result<Self, GenError>
    where
        I: IntoIterator<Item = GeneratorDescriptor>,
    {
        let mut builder = RegistryBuilder::new();
        let origin = Path::new("<memory>");
        for descriptor in descriptors {
            builder.insert(descriptor, origin)?;
        }
        Ok(builder.build().0)
    }

    /// One-time installation as the process-wide registry.
    pub fn install_global(self) -> Result<&'static GeneratorRegistry, GenError> {
        let mut slot = Some(self);
        let installed = GLOBAL_REGISTRY.get_or_init(|| slot.take().unwrap_or_default());
        if slot.is_some() {
            return Err(GenError::Conflict(ConflictKind::RegistryInstalled));
        }
        Ok(installed)
    }

    pub fn global() -> Option<&'static GeneratorRegistry> {
        GLOBAL_REGISTRY.get()
    }

    pub fn is_known(&self, generator_id: &str) -> bool {
        self.generators.contains_key(generator_id)
    }

    pub fn get(&self, generator_id: &str) -> Result<&GeneratorDescriptor, GenError> {
        self.generators
            .get(generator_id)
            .ok_or_else(|| GenError::not_found(NotFoundKind::Generator, generator_id))
    }

    pub fn gen_dir_template(&self, generator_id: &str) -> Result<&str, GenError> {
        self.get(generator_id).map(|d| d.gen_dir.as_str())
    }

    pub fn run_cmd_template(&self, generator_id: &str) -> Result<&str, GenError> {
        self.get(generator_id).map(|d| d.run_cmd.as_str())
    }

    /// Manifest the generator was first admitted from
    pub fn origin(&self, generator_id: &str) -> Option<&Path> {
        self.origins.get(generator_id).map(PathBuf::as_path)
    }

    /// Descriptors in load order
    pub fn iter(&self) -> impl Iterator<Item = &GeneratorDescriptor> {
        self.generators.values()
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}
