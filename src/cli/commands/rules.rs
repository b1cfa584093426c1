//! Rules Command
//!
//! Inspect and move rule configuration.
//!
//! Usage:
//!   classlint rules list [--preset ID] [--mode M]
//!   classlint rules export [-o FILE]
//!   classlint rules import FILE

use std::path::Path;

use console::style;

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, EngineOverrides};
use crate::types::Result;

/// Print every rule of the active preset with its effective configuration
pub fn list(overrides: &EngineOverrides, json: bool) -> Result<()> {
    let ctx = CommandContext::offline(overrides)?;
    let state = ctx.engine.state();
    let registry = &state.registry;

    if json {
        let rows: Vec<_> = registry
            .rules()
            .iter()
            .map(|rule| {
                let meta = rule.meta();
                serde_json::json!({
                    "id": meta.id,
                    "name": meta.name,
                    "type": rule.rule_type(),
                    "category": meta.category,
                    "enabled": registry.is_enabled(&meta.id),
                    "severity": registry.effective_severity(&meta.id),
                    "defaultSeverity": meta.severity,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let out = Output::new();
    out.header(&format!(
        "Rules for {} ({} mode)",
        state.preset.id, state.mode
    ));
    println!();
    for rule in registry.rules() {
        let meta = rule.meta();
        let severity = registry
            .effective_severity(&meta.id)
            .map(|s| s.as_str())
            .unwrap_or("-");
        let status = if registry.is_enabled(&meta.id) {
            style("on ").green()
        } else {
            style("off").dim()
        };
        println!(
            "  {} {:<11} {:<40} {}",
            status,
            severity,
            meta.id,
            style(&meta.description).dim()
        );
    }
    Ok(())
}

/// Write the active configuration as JSON, to a file or stdout
pub fn export(overrides: &EngineOverrides, output: Option<&Path>) -> Result<()> {
    let ctx = CommandContext::offline(overrides)?;
    let json = ctx.engine.export_configuration()?;

    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            Output::new().success(&format!("Exported rule configuration to {}", path.display()));
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Validate a configuration document against the active preset
pub fn import(overrides: &EngineOverrides, file: &Path) -> Result<()> {
    let ctx = CommandContext::offline(overrides)?;
    let json = std::fs::read_to_string(file)?;
    let applied = ctx.engine.import_configuration(&json)?;

    let out = Output::new();
    out.success(&format!(
        "{} rule configurations in {} are valid for preset {}",
        applied,
        file.display(),
        ctx.engine.preset().id
    ));
    out.info("Set rules.config_file or pass --rules-config to apply it on scan");
    Ok(())
}
