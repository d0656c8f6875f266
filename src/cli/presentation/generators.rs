//! Generator command presentation: list and show, text/json.

use super::shared::format_section_heading;
use crate::generator::{GeneratorDescriptor, GeneratorRegistry, LoadReport};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;

pub fn format_generator_list_text(registry: &GeneratorRegistry, report: &LoadReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Global generators")));
    if registry.is_empty() {
        out.push_str("No generators registered.\n");
    } else {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["ID", "Gen dir", "Run command", "Manifest"]);
        for descriptor in registry.iter() {
            let origin = registry
                .origin(&descriptor.id)
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            table.add_row(vec![
                descriptor.id.clone(),
                descriptor.gen_dir.clone(),
                descriptor.run_cmd.clone(),
                origin,
            ]);
        }
        out.push_str(&format!("{}\n", table));
        out.push_str(&format!("\nTotal: {} generator(s)\n", registry.len()));
    }

    if !report.issues.is_empty() {
        out.push_str(&format!("\n{}\n\n", format_section_heading("Load issues")));
        for issue in &report.issues {
            out.push_str(&format!(
                "  {} {}: {}\n",
                "!".yellow(),
                issue.manifest.display(),
                issue.error
            ));
        }
    }
    out
}

pub fn format_generator_list_json(registry: &GeneratorRegistry, report: &LoadReport) -> String {
    let generators: Vec<_> = registry
        .iter()
        .map(|d| descriptor_json(d, registry.origin(&d.id)))
        .collect();
    let issues: Vec<_> = report
        .issues
        .iter()
        .map(|i| {
            json!({
                "manifest": i.manifest.display().to_string(),
                "error": i.error.to_string(),
            })
        })
        .collect();
    let out = json!({
        "generators": generators,
        "total": registry.len(),
        "issues": issues,
        "success": report.is_success(),
    });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_generator_show_text(
    descriptor: &GeneratorDescriptor,
    origin: Option<&Path>,
) -> String {
    let mut out = format!("Generator: {}\n", descriptor.id);
    if let Some(description) = &descriptor.description {
        out.push_str(&format!("Description: {}\n", description));
    }
    out.push_str(&format!("Gen dir: {}\n", descriptor.gen_dir));
    out.push_str(&format!("Run command: {}\n", descriptor.run_cmd));
    if let Some(url) = &descriptor.download_url {
        out.push_str(&format!("Download: {}\n", url));
    }
    if let Some(origin) = origin {
        out.push_str(&format!("Manifest: {}\n", origin.display()));
    }
    out
}

pub fn format_generator_show_json(
    descriptor: &GeneratorDescriptor,
    origin: Option<&Path>,
) -> String {
    serde_json::to_string_pretty(&descriptor_json(descriptor, origin))
        .unwrap_or_else(|_| "{}".to_string())
}

fn descriptor_json(descriptor: &GeneratorDescriptor, origin: Option<&Path>) -> serde_json::Value {
    json!({
        "id": descriptor.id,
        "description": descriptor.description,
        "download-url": descriptor.download_url,
        "gen-dir": descriptor.gen_dir,
        "run-cmd": descriptor.run_cmd,
        "manifest": origin.map(|p| p.display().to_string()),
    })
}
