//! Scan Command
//!
//! Lints a page snapshot, or one element of it, and prints the report.
//!
//! Usage:
//!   classlint scan page.json [--element ID] [--preset ID] [--mode M]
//!                            [--format text|json] [--rules-config FILE]

use std::path::PathBuf;

use tracing::info;

use crate::cli::util::{CommandContext, EngineOverrides};
use crate::config::OutputFormat;
use crate::engine::{Reporter, ScanReport};
use crate::types::{Result, Severity};

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub snapshot: PathBuf,
    pub element: Option<String>,
    pub format: Option<OutputFormat>,
    pub min_severity: Option<Severity>,
    pub output: Option<PathBuf>,
    pub overrides: EngineOverrides,
}

/// Run the scan and print it. The report is returned so the caller can pick
/// the exit code.
pub async fn run(options: ScanOptions) -> Result<ScanReport> {
    let ctx = CommandContext::for_snapshot(&options.snapshot, &options.overrides)?;
    let format = options.format.unwrap_or(ctx.config.output.format);
    let min_severity = options
        .min_severity
        .unwrap_or(ctx.config.output.min_severity);

    info!("Scanning {}", options.snapshot.display());
    let report = match &options.element {
        Some(id) => ctx.engine.scan_element(id).await?,
        None => ctx.engine.scan_page().await?,
    };

    match format {
        OutputFormat::Json => println!("{}", Reporter::to_json(&report)?),
        OutputFormat::Text => Reporter::print_filtered(&report, min_severity),
    }

    if let Some(path) = &options.output {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Reporter::generate_json(&report, path)?;
        info!("Report saved to: {}", path.display());
    }

    Ok(report)
}
