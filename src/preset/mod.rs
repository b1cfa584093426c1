//! Preset Composer
//!
//! A preset binds one grammar, an ordered detector list and a rule set under
//! a name. Presets are immutable; switching is done by swapping the whole
//! `Arc<Preset>`.

pub mod client_first;
pub mod lumos;

use std::sync::Arc;

use tracing::warn;

use crate::analyzer::{DetectorGates, DetectorList, RoleClassifier, RoleDetectionConfig};
use crate::constants::presets::DEFAULT_PRESET_ID;
use crate::grammar::GrammarAdapter;
use crate::rules::page::{MainHasContentRule, MainSingletonRule};
use crate::rules::property::DuplicateUtilityPropertiesRule;
use crate::rules::structure::{
    ComboWithoutBaseRule, MultipleCustomClassesRule, UtilityOnComponentRootRule,
};
use crate::rules::{Rule, RuleMeta};
use crate::types::{ClassKind, LintError, Result, RuleCategory, Severity};

/// Knobs applied when a preset is built
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetOptions {
    pub roles: RoleDetectionConfig,
    pub gates: DetectorGates,
}

#[derive(Clone)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub grammar: GrammarAdapter,
    pub role_detectors: DetectorList,
    pub role_detection_config: RoleDetectionConfig,
    pub rules: Vec<Rule>,
}

impl Preset {
    pub fn classifier(&self) -> RoleClassifier<'_> {
        RoleClassifier::new(
            &self.grammar,
            &self.role_detectors,
            &self.role_detection_config,
        )
    }

    pub fn detector_names(&self) -> Vec<&str> {
        self.role_detectors.iter().map(|d| d.name()).collect()
    }
}

impl std::fmt::Debug for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preset")
            .field("id", &self.id)
            .field("grammar", &self.grammar.id())
            .field("detectors", &self.detector_names())
            .field("rules", &self.rules.len())
            .finish()
    }
}

/// Rules every preset carries
pub fn shared_rules() -> Vec<Rule> {
    vec![
        Rule::property(DuplicateUtilityPropertiesRule::new(
            RuleMeta::new(
                "duplicate-utility-properties",
                "Duplicate of utility class",
                RuleCategory::Maintainability,
                Severity::Warning,
            )
            .describe("Custom classes should not repeat an existing utility class")
            .targets(&[ClassKind::Custom]),
        )),
        Rule::structure(UtilityOnComponentRootRule::new(
            RuleMeta::new(
                "utility-on-component-root",
                "Utility on component root",
                RuleCategory::Structure,
                Severity::Warning,
            )
            .describe("Component roots are styled through their custom class only"),
        )),
        Rule::structure(ComboWithoutBaseRule::new(
            RuleMeta::new(
                "combo-without-base",
                "Combo without base class",
                RuleCategory::Semantics,
                Severity::Error,
            )
            .describe("A combo class must be stacked on a custom or component class"),
        )),
        Rule::structure(MultipleCustomClassesRule::new(
            RuleMeta::new(
                "multiple-custom-classes",
                "Multiple custom classes",
                RuleCategory::Semantics,
                Severity::Warning,
            )
            .describe("Use one custom class per element plus combos or utilities"),
        )),
        Rule::page(MainSingletonRule::new(
            RuleMeta::new(
                "main-singleton",
                "Single main element",
                RuleCategory::Structure,
                Severity::Error,
            )
            .describe("A page has exactly one main element"),
        )),
        Rule::page(MainHasContentRule::new(
            RuleMeta::new(
                "main-has-content",
                "Main has content",
                RuleCategory::Structure,
                Severity::Warning,
            )
            .describe("The main element contains at least one section or component"),
        )),
    ]
}

// =============================================================================
// Registry
// =============================================================================

/// Presets by id, with a designated default for unknown ids
#[derive(Debug, Clone)]
pub struct PresetRegistry {
    presets: Vec<Arc<Preset>>,
    default_id: String,
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_PRESET_ID)
    }
}

impl PresetRegistry {
    pub fn new(default_id: impl Into<String>) -> Self {
        Self {
            presets: Vec::new(),
            default_id: default_id.into(),
        }
    }

    /// Lumos and Client-First, built with `options`
    pub fn builtin(options: &PresetOptions) -> Self {
        let mut registry = Self::default();
        registry.register(lumos::preset(options));
        registry.register(client_first::preset(options));
        registry
    }

    /// Insert or replace by id
    pub fn register(&mut self, preset: Preset) {
        let preset = Arc::new(preset);
        match self.presets.iter_mut().find(|p| p.id == preset.id) {
            Some(slot) => *slot = preset,
            None => self.presets.push(preset),
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<Preset>> {
        self.presets.iter().find(|p| p.id == id).cloned()
    }

    pub fn presets(&self) -> &[Arc<Preset>] {
        &self.presets
    }

    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    pub fn ids(&self) -> Vec<&str> {
        self.presets.iter().map(|p| p.id.as_str()).collect()
    }

    /// Look up `id`, falling back to the default preset
    pub fn resolve(&self, id: &str) -> Result<Arc<Preset>> {
        if self.presets.is_empty() {
            return Err(LintError::NoPresets);
        }
        if let Some(preset) = self.get(id) {
            return Ok(preset);
        }

        let fallback = self.get(&self.default_id).ok_or_else(|| LintError::PresetNotFound {
            requested: id.to_string(),
            default: self.default_id.clone(),
        })?;
        warn!(
            requested = %id,
            fallback = %fallback.id,
            "Unknown preset, using default"
        );
        Ok(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::presets::{CLIENT_FIRST_ID, LUMOS_ID};
    use std::collections::HashSet;

    #[test]
    fn test_builtin_presets() {
        let registry = PresetRegistry::builtin(&PresetOptions::default());
        assert_eq!(registry.ids(), [LUMOS_ID, CLIENT_FIRST_ID]);
        assert_eq!(registry.default_id(), LUMOS_ID);
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let registry = PresetRegistry::builtin(&PresetOptions::default());
        assert_eq!(registry.resolve(CLIENT_FIRST_ID).unwrap().id, CLIENT_FIRST_ID);
        assert_eq!(registry.resolve("bem").unwrap().id, LUMOS_ID);
    }

    #[test]
    fn test_resolve_without_presets_fails_fast() {
        let registry = PresetRegistry::default();
        assert!(matches!(registry.resolve(LUMOS_ID), Err(LintError::NoPresets)));
    }

    #[test]
    fn test_resolve_missing_default() {
        let mut registry = PresetRegistry::new("absent");
        registry.register(lumos::preset(&PresetOptions::default()));
        let err = registry.resolve("bem").unwrap_err();
        assert!(matches!(err, LintError::PresetNotFound { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_rule_ids_are_unique_per_preset() {
        let registry = PresetRegistry::builtin(&PresetOptions::default());
        for preset in registry.presets() {
            let mut seen = HashSet::new();
            for rule in &preset.rules {
                assert!(seen.insert(rule.id()), "duplicate {} in {}", rule.id(), preset.id);
            }
        }
    }

    #[test]
    fn test_options_reach_preset() {
        let options = PresetOptions {
            roles: RoleDetectionConfig {
                threshold: 0.8,
                fallback_role: None,
            },
            gates: DetectorGates::default(),
        };
        let preset = lumos::preset(&options);
        assert_eq!(preset.role_detection_config.threshold, 0.8);
    }
}
