//! CLI Common Utilities
//!
//! Shared engine construction for command handlers.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{Config, ConfigLoader};
use crate::engine::LintEngine;
use crate::preset::PresetRegistry;
use crate::rules::OpinionMode;
use crate::styles::{HostSource, SnapshotSource, StaticSource};
use crate::types::Result;

/// Overrides given on the command line, applied on top of the loaded config
#[derive(Debug, Clone, Default)]
pub struct EngineOverrides {
    pub preset: Option<String>,
    pub mode: Option<OpinionMode>,
    pub rules_config: Option<std::path::PathBuf>,
}

/// Command execution context
///
/// Loaded configuration plus an engine built from it.
pub struct CommandContext {
    pub config: Config,
    pub engine: Arc<LintEngine>,
}

impl CommandContext {
    /// Engine reading page data from a snapshot file
    pub fn for_snapshot(snapshot: &Path, overrides: &EngineOverrides) -> Result<Self> {
        Self::build(Arc::new(SnapshotSource::new(snapshot)), overrides)
    }

    /// Engine with no page data, for commands that only inspect presets and rules
    pub fn offline(overrides: &EngineOverrides) -> Result<Self> {
        Self::build(Arc::new(StaticSource::default()), overrides)
    }

    fn build(source: Arc<dyn HostSource>, overrides: &EngineOverrides) -> Result<Self> {
        let mut config = ConfigLoader::load()?;
        if let Some(preset) = &overrides.preset {
            config.preset = preset.clone();
        }
        if let Some(mode) = overrides.mode {
            config.mode = mode;
        }
        if let Some(path) = &overrides.rules_config {
            config.rules.config_file = Some(path.clone());
        }

        let presets = PresetRegistry::builtin(&config.preset_options());
        let engine = LintEngine::with_preset(presets, source, &config.preset, config.mode)?;

        if let Some(path) = &config.rules.config_file {
            let json = std::fs::read_to_string(path)?;
            let applied = engine.import_configuration(&json)?;
            info!("Imported {} rule configurations from {}", applied, path.display());
        }

        debug!(preset = %engine.preset().id, mode = %engine.opinion_mode(), "Engine ready");

        Ok(Self {
            config,
            engine: Arc::new(engine),
        })
    }
}
