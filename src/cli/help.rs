//! CLI command-name contract used in logs.

use crate::cli::parse::{Commands, GeneratorCommands};

/// Command name string (e.g. "generators.list", "resolve").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Generators { command } => {
            format!("generators.{}", generator_command_name(command))
        }
        Commands::Check { .. } => "check".to_string(),
        Commands::Resolve { .. } => "resolve".to_string(),
        Commands::Calls { .. } => "calls".to_string(),
    }
}

pub fn generator_command_name(command: &GeneratorCommands) -> &'static str {
    match command {
        GeneratorCommands::List { .. } => "list",
        GeneratorCommands::Show { .. } => "show",
    }
}
