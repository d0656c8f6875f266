//! CLI parse: clap types for extgen. No behavior; definitions only.

use crate::context::ProjectType;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// extgen - external code-generator resolution for multi-context firmware builds
#[derive(Parser)]
#[command(name = "extgen")]
#[command(about = "Resolve global code generators into per-context generated layers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Additional generator manifest directory (repeatable; replaces configured dirs)
    #[arg(long = "manifest-dir")]
    pub manifest_dirs: Vec<PathBuf>,

    /// Skip schema validation of generator manifests
    #[arg(long)]
    pub no_schema: bool,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect globally registered generators
    Generators {
        #[command(subcommand)]
        command: GeneratorCommands,
    },
    /// Validate one generator request against a component's declaration
    Check {
        /// Resolution input document (components and contexts)
        #[arg(long)]
        input: PathBuf,
        /// Component identifier
        #[arg(long)]
        component: String,
        /// Requested generator identifier
        #[arg(long)]
        generator: String,
        /// Project type of the requesting context (single-core, multi-core, trustzone)
        #[arg(long = "type", default_value = "single-core")]
        project_type: ProjectType,
    },
    /// Resolve contexts and print their generated layers
    Resolve {
        /// Resolution input document (components and contexts)
        #[arg(long)]
        input: PathBuf,
        /// Only resolve this context
        #[arg(long)]
        context: Option<String>,
        /// Output format (text, yaml or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the generator invocations a runner would receive
    Calls {
        /// Resolution input document (components and contexts)
        #[arg(long)]
        input: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum GeneratorCommands {
    /// List all generators and manifest load issues
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one generator
    Show {
        /// Generator ID
        generator_id: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
