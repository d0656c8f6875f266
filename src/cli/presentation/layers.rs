//! Resolution presentation: layers, generator calls, check result.

use super::shared::{format_failures, format_section_heading};
use crate::engine::ResolutionReport;
use crate::error::GenError;
use crate::runner::GeneratorCall;
use crate::validator::ValidatedRequest;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

pub fn format_check_ok(request: &ValidatedRequest) -> String {
    format!(
        "{} component '{}' may use generator '{}' in a {} context",
        "✓".green(),
        request.component_id(),
        request.generator_id(),
        request.project_type()
    )
}

pub fn format_layers_text(report: &ResolutionReport) -> String {
    let mut out = String::new();
    if report.layers.is_empty() {
        out.push_str("No context has generator bindings.\n");
    }
    for layer in &report.layers {
        out.push_str(&format!(
            "{}\n\n",
            format_section_heading(&format!("Generated layer: {}", layer.context))
        ));
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Generator", "Directory", "Import file"]);
        for entry in &layer.generators {
            table.add_row(vec![
                entry.generator_id.clone(),
                entry.gen_dir.clone(),
                entry.import_file.clone(),
            ]);
        }
        out.push_str(&format!("{}\n\n", table));
    }
    if !report.failures.is_empty() {
        out.push_str(&format!("{}\n\n", format_section_heading("Failures")));
        out.push_str(&format_failures(&report.failures));
    }
    out
}

/// Layers only; failures go through logs and the exit status.
pub fn format_layers_yaml(report: &ResolutionReport) -> Result<String, GenError> {
    serde_yaml::to_string(&json!({ "layers": report.layers }))
        .map_err(|e| GenError::invalid_data("<stdout>", e))
}

pub fn format_layers_json(report: &ResolutionReport) -> String {
    let failures: Vec<_> = report
        .failures
        .iter()
        .map(|f| {
            json!({
                "context": f.context,
                "component": f.component,
                "error": f.error.to_string(),
            })
        })
        .collect();
    let out = json!({ "layers": report.layers, "failures": failures });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_calls_text(calls: &[GeneratorCall]) -> String {
    if calls.is_empty() {
        return "No generator invocations.\n".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Generator", "Directory", "Command", "Contexts"]);
    for call in calls {
        let contexts: Vec<&str> = call.contexts.iter().map(|c| c.as_str()).collect();
        table.add_row(vec![
            call.generator_id.clone(),
            call.gen_dir.clone(),
            call.command.clone(),
            contexts.join(", "),
        ]);
    }
    format!("{}\n", table)
}

pub fn format_calls_json(calls: &[GeneratorCall]) -> String {
    serde_json::to_string_pretty(&json!({ "calls": calls })).unwrap_or_else(|_| "{}".to_string())
}
