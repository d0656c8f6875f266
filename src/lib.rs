//! extgen: External Code-Generator Resolution
//!
//! Discovers the code generators advertised by installed packs, validates the
//! generator requests of components, records which generator writes into which
//! directory for every build context (single-core, multi-core, or one half of a
//! TrustZone pair), and synthesizes the generated-import layer each context
//! merges into its compiled sources.

pub mod binding;
pub mod cli;
pub mod component;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod generator;
pub mod input;
pub mod layer;
pub mod logging;
pub mod platform;
pub mod runner;
pub mod validator;

pub use binding::{BindOutcome, ContextBindingTable, UsedGeneratorEntry};
pub use component::{ComponentCatalog, ComponentMetadata};
pub use context::{ContextDescriptor, ContextId, ProjectType, Security};
pub use engine::{ComponentUse, ContextPlan, ResolutionEngine, ResolutionReport};
pub use error::{GenError, GenErrorKind};
pub use generator::{GeneratorDescriptor, GeneratorRegistry};
pub use layer::{GeneratedLayer, LayerSynthesizer};
pub use validator::{GenerationRequest, GeneratorValidator, ValidatedRequest};
