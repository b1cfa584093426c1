//! Presets Command
//!
//! Lists the registered naming presets.

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, EngineOverrides};
use crate::types::Result;

pub fn run(json: bool) -> Result<()> {
    let ctx = CommandContext::offline(&EngineOverrides::default())?;
    let presets = ctx.engine.presets();
    let active = ctx.engine.preset();

    if json {
        let list: Vec<_> = presets
            .presets()
            .iter()
            .map(|p| {
                serde_json::json!({
                    "id": p.id,
                    "name": p.name,
                    "description": p.description,
                    "grammar": p.grammar.id(),
                    "rules": p.rules.len(),
                    "detectors": p.detector_names(),
                    "active": p.id == active.id,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    let out = Output::new();
    out.header("Presets");
    for preset in presets.presets() {
        let marker = if preset.id == active.id { " (active)" } else { "" };
        out.section(&format!("{}{}", preset.id, marker));
        out.field("name", &preset.name);
        out.field("about", &preset.description);
        out.field("rules", preset.rules.len());
        out.field("detectors", preset.detector_names().join(", "));
    }
    println!();
    out.info(&format!("Default preset: {}", presets.default_id()));
    Ok(())
}
