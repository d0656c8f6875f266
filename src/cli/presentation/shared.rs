//! Shared presentation helpers.

use crate::engine::ResolutionFailure;
use owo_colors::OwoColorize;

pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// One line per failure: context, optional component, error.
pub fn format_failures(failures: &[ResolutionFailure]) -> String {
    let mut out = String::new();
    for failure in failures {
        let subject = match &failure.component {
            Some(component) => format!("{} / {}", failure.context, component),
            None => failure.context.to_string(),
        };
        out.push_str(&format!(
            "  {} {}: {}\n",
            "✗".red(),
            subject,
            crate::cli::map_error(&failure.error)
        ));
    }
    out
}
