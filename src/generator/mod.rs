//! Global generators: descriptors, manifest documents, templates and the registry.

pub mod descriptor;
pub mod manifest;
pub mod registry;
pub mod template;

pub use descriptor::GeneratorDescriptor;
pub use manifest::{discover_manifests, parse_manifest, read_manifest, Discovery, ManifestSchema};
pub use registry::{GeneratorRegistry, LoadIssue, LoadReport, RegistryBuilder};
pub use template::{render, TemplateVars};
