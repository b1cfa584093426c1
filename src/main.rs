use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use classlint::cli::EngineOverrides;
use classlint::cli::commands::scan::ScanOptions;
use classlint::cli::ui::Output;
use classlint::config::OutputFormat;
use classlint::rules::OpinionMode;
use classlint::types::Severity;

/// Parse opinion mode from string
fn parse_opinion_mode(s: &str) -> Result<OpinionMode, String> {
    s.parse().map_err(|_| {
        format!(
            "Invalid mode '{}'. Valid values: strict, balanced, lenient",
            s
        )
    })
}

/// Parse severity from string
fn parse_severity(s: &str) -> Result<Severity, String> {
    s.parse().map_err(|_| {
        format!(
            "Invalid severity '{}'. Valid values: error, warning, suggestion",
            s
        )
    })
}

#[derive(Parser)]
#[command(name = "classlint")]
#[command(version, about = "Class naming linter for visual page builders")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint a page snapshot
    Scan {
        #[arg(help = "Page snapshot JSON ({elements, styles})")]
        snapshot: PathBuf,
        #[arg(long, short, help = "Scan one element instead of the whole page")]
        element: Option<String>,
        #[arg(long, short, help = "Preset id (lumos, client-first)")]
        preset: Option<String>,
        #[arg(long, short, value_parser = parse_opinion_mode, help = "Opinion mode: strict, balanced, lenient")]
        mode: Option<OpinionMode>,
        #[arg(long, short = 'f', value_enum, help = "Output format")]
        format: Option<OutputFormat>,
        #[arg(long, value_parser = parse_severity, help = "Minimum severity shown in text output")]
        severity: Option<Severity>,
        #[arg(long, help = "Rule configuration JSON to import before scanning")]
        rules_config: Option<PathBuf>,
        #[arg(long, short, help = "Also write the JSON report to this path")]
        output: Option<PathBuf>,
    },

    /// Show how the active grammar parses class names
    Parse {
        #[arg(required = true, help = "Class names")]
        classes: Vec<String>,
        #[arg(long, short, help = "Preset id")]
        preset: Option<String>,
        #[arg(long, help = "Print JSON")]
        json: bool,
    },

    /// Inspect and move rule configuration
    Rules {
        #[command(subcommand)]
        action: Option<RulesAction>,
        #[arg(long, short, global = true, help = "Preset id")]
        preset: Option<String>,
        #[arg(long, short, global = true, value_parser = parse_opinion_mode, help = "Opinion mode")]
        mode: Option<OpinionMode>,
    },

    /// List registered presets
    Presets {
        #[arg(long, help = "Print JSON")]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// List rules with their effective configuration
    List {
        #[arg(long, help = "Print JSON")]
        json: bool,
    },
    /// Export the rule configuration document
    Export {
        #[arg(long, short, help = "Write to file instead of stdout")]
        output: Option<PathBuf>,
    },
    /// Validate a rule configuration document
    Import {
        #[arg(help = "Configuration JSON")]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json, yaml"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mclasslint encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(code) => code,
        Err(e) => {
            Output::new().error(&format!("Error: {}", e));
            ExitCode::from(2)
        }
    }
}

fn run_cli() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Scan {
            snapshot,
            element,
            preset,
            mode,
            format,
            severity,
            rules_config,
            output,
        } => {
            let rt = Runtime::new()?;
            let report = rt.block_on(classlint::cli::commands::scan::run(ScanOptions {
                snapshot,
                element,
                format,
                min_severity: severity,
                output,
                overrides: EngineOverrides {
                    preset,
                    mode,
                    rules_config,
                },
            }))?;
            if report.has_errors() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Parse {
            classes,
            preset,
            json,
        } => {
            let overrides = EngineOverrides {
                preset,
                ..Default::default()
            };
            classlint::cli::commands::parse::run(&classes, &overrides, json)?;
        }
        Commands::Rules {
            action,
            preset,
            mode,
        } => {
            let overrides = EngineOverrides {
                preset,
                mode,
                ..Default::default()
            };
            match action.unwrap_or(RulesAction::List { json: false }) {
                RulesAction::List { json } => {
                    classlint::cli::commands::rules::list(&overrides, json)?;
                }
                RulesAction::Export { output } => {
                    classlint::cli::commands::rules::export(&overrides, output.as_deref())?;
                }
                RulesAction::Import { file } => {
                    classlint::cli::commands::rules::import(&overrides, &file)?;
                }
            }
        }
        Commands::Presets { json } => {
            classlint::cli::commands::presets::run(json)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { global, format } => {
                classlint::cli::commands::config::show(global, &format)?;
            }
            ConfigAction::Path => {
                classlint::cli::commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                classlint::cli::commands::config::init(global, force)?;
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}
