//! CLI route: single route table and run context. Dispatches to the engine and presentation.

use crate::cli::parse::{Commands, GeneratorCommands};
use crate::cli::presentation::{
    format_calls_json, format_calls_text, format_check_ok, format_generator_list_json,
    format_generator_list_text, format_generator_show_json, format_generator_show_text,
    format_layers_json, format_layers_text, format_layers_yaml,
};
use crate::cli::command_name;
use crate::config::{ConfigLoader, ExtgenConfig};
use crate::context::{ContextId, ProjectType};
use crate::engine::{ContextPlan, ResolutionEngine};
use crate::error::{GenError, NotFoundKind};
use crate::generator::{GeneratorRegistry, LoadReport};
use crate::input::ResolutionInput;
use crate::validator::{GenerationRequest, GeneratorValidator};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Rendered command result; `success` drives the process exit status
#[derive(Debug)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    fn ok(text: String) -> Self {
        Self {
            text,
            success: true,
        }
    }
}

/// Runtime context for CLI execution: configuration and the process-wide registry.
pub struct RunContext {
    config: ExtgenConfig,
    registry: &'static GeneratorRegistry,
    load_report: LoadReport,
}

impl RunContext {
    /// Load configuration, discover and load manifests, and install the
    /// registry for the rest of the process.
    ///
    /// `manifest_dirs` (from the command line) replace the configured search dirs.
    pub fn new(
        workspace_root: &Path,
        config_path: Option<&Path>,
        manifest_dirs: &[PathBuf],
        no_schema: bool,
    ) -> Result<Self, GenError> {
        let mut config = match config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(workspace_root)?,
        };
        if !manifest_dirs.is_empty() {
            config.manifest_dirs = manifest_dirs.to_vec();
        }
        if no_schema {
            config.check_schema = false;
        }

        let search_dirs = config.manifest_search_dirs()?;
        debug!(dirs = ?search_dirs, "Searching for generator manifests");
        let (registry, load_report) =
            GeneratorRegistry::discover(&search_dirs, config.check_schema)?;
        let registry = registry.install_global()?;
        Ok(Self {
            config,
            registry,
            load_report,
        })
    }

    pub fn config(&self) -> &ExtgenConfig {
        &self.config
    }

    pub fn registry(&self) -> &GeneratorRegistry {
        self.registry
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    /// Execute one command.
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, GenError> {
        info!(command = %command_name(command), "Executing command");
        match command {
            Commands::Generators { command } => self.handle_generators(command),
            Commands::Check {
                input,
                component,
                generator,
                project_type,
            } => self.handle_check(input, component, generator, *project_type),
            Commands::Resolve {
                input,
                context,
                format,
            } => self.handle_resolve(input, context.as_deref(), format),
            Commands::Calls { input, format } => self.handle_calls(input, format),
        }
    }

    fn handle_generators(&self, command: &GeneratorCommands) -> Result<CommandOutput, GenError> {
        match command {
            GeneratorCommands::List { format } => {
                let text = match check_format(format, &["text", "json"])? {
                    "json" => format_generator_list_json(self.registry, &self.load_report),
                    _ => format_generator_list_text(self.registry, &self.load_report),
                };
                Ok(CommandOutput {
                    text,
                    success: self.load_report.is_success(),
                })
            }
            GeneratorCommands::Show {
                generator_id,
                format,
            } => {
                let descriptor = self.registry.get(generator_id)?;
                let origin = self.registry.origin(generator_id);
                let text = match check_format(format, &["text", "json"])? {
                    "json" => format_generator_show_json(descriptor, origin),
                    _ => format_generator_show_text(descriptor, origin),
                };
                Ok(CommandOutput::ok(text))
            }
        }
    }

    fn handle_check(
        &self,
        input: &Path,
        component: &str,
        generator: &str,
        project_type: ProjectType,
    ) -> Result<CommandOutput, GenError> {
        let input = ResolutionInput::load(input)?;
        let catalog = input.catalog();
        let validator = GeneratorValidator::new(self.registry, &catalog);
        let validated =
            validator.validate(&GenerationRequest::new(component, generator, project_type))?;
        Ok(CommandOutput::ok(format_check_ok(&validated)))
    }

    fn handle_resolve(
        &self,
        input: &Path,
        context: Option<&str>,
        format: &str,
    ) -> Result<CommandOutput, GenError> {
        let format = check_format(format, &["text", "yaml", "json"])?;
        let input = ResolutionInput::load(input)?;
        let plans = select_plans(&input, context)?;
        let catalog = input.catalog();

        let mut engine = ResolutionEngine::new(self.registry, &catalog);
        let report = engine.resolve(&plans);
        let text = match format {
            "yaml" => format_layers_yaml(&report)?,
            "json" => format_layers_json(&report),
            _ => format_layers_text(&report),
        };
        Ok(CommandOutput {
            text,
            success: report.is_clean(),
        })
    }

    fn handle_calls(&self, input: &Path, format: &str) -> Result<CommandOutput, GenError> {
        let format = check_format(format, &["text", "json"])?;
        let input = ResolutionInput::load(input)?;
        let catalog = input.catalog();

        let mut engine = ResolutionEngine::new(self.registry, &catalog);
        let report = engine.resolve(&input.contexts);
        let calls = engine.generator_calls()?;
        let text = match format {
            "json" => format_calls_json(&calls),
            _ => format_calls_text(&calls),
        };
        Ok(CommandOutput {
            text,
            success: report.is_clean(),
        })
    }
}

fn check_format<'f>(format: &'f str, allowed: &[&str]) -> Result<&'f str, GenError> {
    if allowed.contains(&format) {
        Ok(format)
    } else {
        Err(GenError::Config(format!(
            "Invalid output format: {} (must be one of {})",
            format,
            allowed.join(", ")
        )))
    }
}

fn select_plans(
    input: &ResolutionInput,
    context: Option<&str>,
) -> Result<Vec<ContextPlan>, GenError> {
    match context {
        None => Ok(input.contexts.clone()),
        Some(id) => input
            .plan(&ContextId::new(id))
            .map(|plan| vec![plan.clone()])
            .ok_or_else(|| GenError::not_found(NotFoundKind::Context, id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenErrorKind;

    #[test]
    fn test_check_format() {
        assert_eq!(check_format("json", &["text", "json"]).unwrap(), "json");
        assert_eq!(
            check_format("xml", &["text", "json"]).unwrap_err().kind(),
            GenErrorKind::Config
        );
    }

    #[test]
    fn test_select_plans() {
        let input = ResolutionInput::parse(
            "contexts:\n  - id: a\n    type: single-core\n  - id: b\n    type: multi-core\n",
            Path::new("in.yml"),
        )
        .unwrap();
        assert_eq!(select_plans(&input, None).unwrap().len(), 2);
        assert_eq!(select_plans(&input, Some("b")).unwrap()[0].descriptor.id.as_str(), "b");
        assert_eq!(
            select_plans(&input, Some("zzz")).unwrap_err().kind(),
            GenErrorKind::NotFound
        );
    }
}
