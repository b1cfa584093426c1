//! Rule Registry
//!
//! Holds the rules of the active preset in registration order together with
//! their layered configuration. The rule carries the defaults; a
//! [`RuleConfiguration`] overrides them field by field.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, info};

use super::{Rule, RuleSettings};
use crate::constants::rules::CONFIG_EXPORT_VERSION;
use crate::types::{LintError, Result, Severity, ValidationError, ValidationErrorKind};

/// Per-rule overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConfiguration {
    pub rule_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub custom_settings: serde_json::Map<String, serde_json::Value>,
}

impl RuleConfiguration {
    /// Configuration mirroring the rule's own defaults
    pub fn seeded(rule: &Rule) -> Self {
        let meta = rule.meta();
        Self {
            rule_id: meta.id.clone(),
            enabled: Some(meta.enabled),
            severity: Some(meta.severity),
            custom_settings: serde_json::Map::new(),
        }
    }
}

/// Partial update merged into an existing configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConfigurationPatch {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub custom_settings: Option<serde_json::Map<String, serde_json::Value>>,
}

impl RuleConfigurationPatch {
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Default::default()
        }
    }

    pub fn severity(severity: Severity) -> Self {
        Self {
            severity: Some(severity),
            ..Default::default()
        }
    }

    pub fn setting(key: impl Into<String>, value: serde_json::Value) -> Self {
        let mut settings = serde_json::Map::new();
        settings.insert(key.into(), value);
        Self {
            custom_settings: Some(settings),
            ..Default::default()
        }
    }
}

/// Versioned export format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationDocument {
    pub version: u32,
    pub rules: Vec<RuleConfiguration>,
}

/// A rule ready to run, with its effective severity and settings
#[derive(Debug, Clone)]
pub struct ActiveRule {
    pub rule: Rule,
    pub severity: Severity,
    pub settings: serde_json::Map<String, serde_json::Value>,
}

impl ActiveRule {
    pub fn settings(&self) -> RuleSettings<'_> {
        RuleSettings::new(&self.settings)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
    index: HashMap<String, usize>,
    configs: BTreeMap<String, RuleConfiguration>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        let mut registry = Self::new();
        registry.register_rules(rules);
        registry
    }

    /// Insert or replace by id. A replaced rule keeps its position and its
    /// configuration; a new rule gets a configuration seeded from its defaults.
    pub fn register_rule(&mut self, rule: Rule) {
        let id = rule.id().to_string();
        match self.index.get(&id) {
            Some(&pos) => {
                debug!(rule_id = %id, "Replacing registered rule");
                self.rules[pos] = rule;
            }
            None => {
                self.configs
                    .entry(id.clone())
                    .or_insert_with(|| RuleConfiguration::seeded(&rule));
                self.index.insert(id, self.rules.len());
                self.rules.push(rule);
            }
        }
    }

    pub fn register_rules(&mut self, rules: impl IntoIterator<Item = Rule>) {
        for rule in rules {
            self.register_rule(rule);
        }
    }

    pub fn get_rule(&self, id: &str) -> Option<&Rule> {
        self.index.get(id).map(|&pos| &self.rules[pos])
    }

    /// All rules in registration order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn configuration(&self, id: &str) -> Option<&RuleConfiguration> {
        self.configs.get(id)
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        let Some(rule) = self.get_rule(id) else {
            return false;
        };
        self.configs
            .get(id)
            .and_then(|c| c.enabled)
            .unwrap_or(rule.meta().enabled)
    }

    pub fn effective_severity(&self, id: &str) -> Option<Severity> {
        let rule = self.get_rule(id)?;
        Some(
            self.configs
                .get(id)
                .and_then(|c| c.severity)
                .unwrap_or(rule.meta().severity),
        )
    }

    /// Enabled rules in registration order
    pub fn get_enabled_rules(&self) -> Vec<ActiveRule> {
        self.rules
            .iter()
            .filter(|rule| self.is_enabled(rule.id()))
            .map(|rule| {
                let config = self.configs.get(rule.id());
                ActiveRule {
                    rule: rule.clone(),
                    severity: config
                        .and_then(|c| c.severity)
                        .unwrap_or(rule.meta().severity),
                    settings: config.map(|c| c.custom_settings.clone()).unwrap_or_default(),
                }
            })
            .collect()
    }

    /// Merge a partial update. Custom settings merge key by key.
    pub fn update_rule_configuration(
        &mut self,
        id: &str,
        patch: RuleConfigurationPatch,
    ) -> Result<()> {
        let Some(rule) = self.get_rule(id) else {
            return Err(unknown_rule(id));
        };
        let seeded = RuleConfiguration::seeded(rule);
        let config = self.configs.entry(id.to_string()).or_insert(seeded);

        if let Some(enabled) = patch.enabled {
            config.enabled = Some(enabled);
        }
        if let Some(severity) = patch.severity {
            config.severity = Some(severity);
        }
        if let Some(settings) = patch.custom_settings {
            config.custom_settings.extend(settings);
        }
        Ok(())
    }

    /// Overwrite the severity of a known rule; unknown ids are ignored
    pub fn set_severity(&mut self, id: &str, severity: Severity) -> bool {
        if self.get_rule(id).is_none() {
            return false;
        }
        self.update_rule_configuration(id, RuleConfigurationPatch::severity(severity))
            .is_ok()
    }

    /// Drop all overrides and reseed from rule defaults
    pub fn reset_to_defaults(&mut self) {
        self.configs = self
            .rules
            .iter()
            .map(|r| (r.id().to_string(), RuleConfiguration::seeded(r)))
            .collect();
    }

    // =========================================================================
    // Import / Export
    // =========================================================================

    pub fn export_document(&self) -> ConfigurationDocument {
        ConfigurationDocument {
            version: CONFIG_EXPORT_VERSION,
            rules: self.configs.values().cloned().collect(),
        }
    }

    /// Pretty JSON, rules ordered by id
    pub fn export_configuration(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export_document())?)
    }

    /// Replace configurations from an exported document.
    ///
    /// The whole document is validated first; on any error nothing changes.
    /// Rules absent from the document keep their current configuration.
    pub fn import_configuration(&mut self, json: &str) -> Result<usize> {
        let document: ConfigurationDocument = serde_json::from_str(json).map_err(|e| {
            ValidationError::new(ValidationErrorKind::Schema, format!("Invalid rule configuration: {e}"))
        })?;
        self.import_document(document)
    }

    pub fn import_document(&mut self, document: ConfigurationDocument) -> Result<usize> {
        if document.version != CONFIG_EXPORT_VERSION {
            return Err(ValidationError::new(
                ValidationErrorKind::Schema,
                "Unsupported rule configuration version",
            )
            .with_field("version")
            .with_comparison(
                CONFIG_EXPORT_VERSION.to_string(),
                document.version.to_string(),
            )
            .into());
        }

        let mut seen = HashSet::new();
        for config in &document.rules {
            if !seen.insert(config.rule_id.as_str()) {
                return Err(ValidationError::new(
                    ValidationErrorKind::Consistency,
                    format!("Duplicate rule id '{}'", config.rule_id),
                )
                .with_field("rules")
                .into());
            }
            if self.get_rule(&config.rule_id).is_none() {
                return Err(unknown_rule(&config.rule_id));
            }
        }

        let count = document.rules.len();
        for config in document.rules {
            self.configs.insert(config.rule_id.clone(), config);
        }
        info!(count, "Imported rule configuration");
        Ok(count)
    }
}

fn unknown_rule(id: &str) -> LintError {
    ValidationError::new(
        ValidationErrorKind::Consistency,
        format!("Unknown rule id '{id}'"),
    )
    .with_field("ruleId")
    .into()
}
