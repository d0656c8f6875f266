//! Integration tests for external generator resolution

mod cli_commands;
mod end_to_end;
mod registry_loading;
mod support;
mod trustzone;
