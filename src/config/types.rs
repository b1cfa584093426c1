//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/classlint/) and project (.classlint/) level configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::analyzer::{DetectorGates, RoleDetectionConfig};
use crate::constants::presets::{CLIENT_FIRST_ID, DEFAULT_PRESET_ID, LUMOS_ID};
use crate::constants::roles::DEFAULT_THRESHOLD;
use crate::preset::PresetOptions;
use crate::rules::OpinionMode;
use crate::types::{ElementRole, LintError, Result, Severity};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Active preset id
    pub preset: String,

    /// Opinion mode applied over rule defaults
    pub mode: OpinionMode,

    /// Role classification settings
    pub roles: RolesConfig,

    /// Rule configuration settings
    pub rules: RulesConfig,

    /// Report output settings
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            preset: DEFAULT_PRESET_ID.to_string(),
            mode: OpinionMode::default(),
            roles: RolesConfig::default(),
            rules: RulesConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `LintError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.roles.threshold) {
            return Err(LintError::Config(format!(
                "roles.threshold must be between 0.0 and 1.0, got {}",
                self.roles.threshold
            )));
        }

        if ![LUMOS_ID, CLIENT_FIRST_ID].contains(&self.preset.as_str()) {
            return Err(LintError::Config(format!(
                "Unknown preset '{}'. Valid values: {}, {}",
                self.preset, LUMOS_ID, CLIENT_FIRST_ID
            )));
        }

        Ok(())
    }

    /// Options the built-in presets are constructed with
    pub fn preset_options(&self) -> PresetOptions {
        PresetOptions {
            roles: RoleDetectionConfig {
                threshold: self.roles.threshold,
                fallback_role: self.roles.fallback_role,
            },
            gates: DetectorGates {
                require_direct_parent_container_for_root: self
                    .roles
                    .require_direct_parent_container_for_root,
                child_group_requires_shared_type_prefix: self
                    .roles
                    .child_group_requires_shared_type_prefix,
            },
        }
    }
}

// =============================================================================
// Role Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RolesConfig {
    /// Minimum detector score for a role to be assigned
    pub threshold: f64,

    /// Role used when no detector clears the threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_role: Option<ElementRole>,

    /// Component roots must sit directly inside a container
    pub require_direct_parent_container_for_root: bool,

    /// Child groups must share their component root's type token
    pub child_group_requires_shared_type_prefix: bool,
}

impl Default for RolesConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            fallback_role: None,
            require_direct_parent_container_for_root: false,
            child_group_requires_shared_type_prefix: false,
        }
    }
}

// =============================================================================
// Rules Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Exported rule configuration (JSON) imported at startup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

// =============================================================================
// Output Configuration
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Least severe result shown in text output
    pub min_severity: Severity,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            min_severity: Severity::Suggestion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.preset, LUMOS_ID);
        assert_eq!(config.mode, OpinionMode::Balanced);
    }

    #[test]
    fn test_threshold_out_of_range() {
        let mut config = Config::default();
        config.roles.threshold = 1.5;
        assert!(matches!(config.validate(), Err(LintError::Config(_))));
    }

    #[test]
    fn test_unknown_preset() {
        let config = Config {
            preset: "bem".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_preset_options() {
        let mut config = Config::default();
        config.roles.threshold = 0.7;
        config.roles.fallback_role = Some(ElementRole::Content);
        config.roles.require_direct_parent_container_for_root = true;

        let options = config.preset_options();
        assert_eq!(options.roles.threshold, 0.7);
        assert_eq!(options.roles.fallback_role, Some(ElementRole::Content));
        assert!(options.gates.require_direct_parent_container_for_root);
        assert!(!options.gates.child_group_requires_shared_type_prefix);
    }
}
