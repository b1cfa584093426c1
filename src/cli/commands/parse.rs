//! Parse Command
//!
//! Shows how the active preset's grammar reads class names.

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, EngineOverrides};
use crate::types::Result;

pub fn run(classes: &[String], overrides: &EngineOverrides, json: bool) -> Result<()> {
    let ctx = CommandContext::offline(overrides)?;
    let parsed: Vec<_> = classes.iter().map(|c| ctx.engine.parse_class(c)).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
        return Ok(());
    }

    let out = Output::new();
    for class in &parsed {
        out.section(class.raw());
        out.field("kind", class.kind());
        out.field("tokens", class.tokens().join(", "));
        if let Some(type_token) = class.type_token() {
            out.field("type", type_token);
        }
        if let Some(variation) = class.variation() {
            out.field("variation", variation);
        }
        if let Some(element) = class.element_token() {
            out.field("element", element);
        }
    }
    Ok(())
}
