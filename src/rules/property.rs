//! Property rules: checks on a class together with its CSS properties.

use serde_json::json;

use super::{Finding, PropertyContext, PropertyRule, RuleMeta};
use crate::constants::rules::{DEFAULT_MAX_UTILITY_PROPERTIES, MAX_PROPERTIES_SETTING};
use crate::styles::Properties;
use crate::types::{ClassKind, Fix, Result};

/// A custom class whose properties exactly equal an existing utility class
pub struct DuplicateUtilityPropertiesRule {
    meta: RuleMeta,
}

impl DuplicateUtilityPropertiesRule {
    pub fn new(meta: RuleMeta) -> Self {
        Self { meta }
    }
}

impl PropertyRule for DuplicateUtilityPropertiesRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn analyze(
        &self,
        class_name: &str,
        properties: &Properties,
        context: &PropertyContext<'_>,
    ) -> Result<Vec<Finding>> {
        if properties.is_empty() {
            return Ok(Vec::new());
        }

        let utilities: Vec<&str> = context
            .styles
            .identical_classes(class_name)
            .into_iter()
            .filter(|other| context.grammar.kind_of(other) == ClassKind::Utility)
            .collect();
        let Some(first) = utilities.first() else {
            return Ok(Vec::new());
        };

        Ok(vec![
            Finding::new(format!(
                "'{}' duplicates the properties of utility class '{}'",
                class_name, first
            ))
            .with_metadata(json!({ "duplicates": utilities }))
            .with_fix(Fix::advice(format!("Use '{}' instead", first))),
        ])
    }
}

/// A utility class should do one small thing
pub struct UtilityPropertyCountRule {
    meta: RuleMeta,
}

impl UtilityPropertyCountRule {
    pub fn new(meta: RuleMeta) -> Self {
        Self { meta }
    }
}

impl PropertyRule for UtilityPropertyCountRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn analyze(
        &self,
        class_name: &str,
        properties: &Properties,
        context: &PropertyContext<'_>,
    ) -> Result<Vec<Finding>> {
        let max = context
            .settings
            .u64_or(MAX_PROPERTIES_SETTING, DEFAULT_MAX_UTILITY_PROPERTIES);
        let count = properties.len() as u64;
        if count <= max {
            return Ok(Vec::new());
        }

        Ok(vec![
            Finding::new(format!(
                "Utility class '{}' sets {} properties (max {})",
                class_name, count, max
            ))
            .with_metadata(json!({ "count": count, "max": max })),
        ])
    }
}

/// A combo class that changes nothing
pub struct EmptyComboRule {
    meta: RuleMeta,
}

impl EmptyComboRule {
    pub fn new(meta: RuleMeta) -> Self {
        Self { meta }
    }
}

impl PropertyRule for EmptyComboRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn analyze(
        &self,
        class_name: &str,
        properties: &Properties,
        _context: &PropertyContext<'_>,
    ) -> Result<Vec<Finding>> {
        if !properties.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![
            Finding::new(format!("Combo class '{}' has no styles", class_name))
                .with_fix(Fix::advice("Remove the combo class or give it styles")),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarAdapter;
    use crate::rules::RuleSettings;
    use crate::styles::{StyleDefinition, StylePropertiesContext};
    use crate::types::{RuleCategory, Severity};
    use std::sync::Arc;

    fn meta(id: &str) -> RuleMeta {
        RuleMeta::new(id, id, RuleCategory::Maintainability, Severity::Warning)
    }

    fn run(
        rule: &dyn PropertyRule,
        styles: &StylePropertiesContext,
        class_name: &str,
        settings: RuleSettings<'_>,
    ) -> Vec<Finding> {
        let grammar = GrammarAdapter::lumos();
        let parsed = grammar.parse(class_name);
        let properties = styles.properties_for(class_name).cloned().unwrap_or_default();
        let context = PropertyContext {
            grammar: &grammar,
            styles,
            parsed: &parsed,
            settings,
        };
        rule.analyze(class_name, &properties, &context).unwrap()
    }

    fn styles(defs: Vec<StyleDefinition>) -> StylePropertiesContext {
        StylePropertiesContext::new(Arc::new(defs))
    }

    #[test]
    fn test_duplicate_utility_detected() {
        let ctx = styles(vec![
            StyleDefinition::new("u-flex").with_property("display", "flex"),
            StyleDefinition::new("card_row").with_property("display", "flex"),
            StyleDefinition::new("card_grid")
                .with_property("display", "flex")
                .with_property("gap", "1rem"),
        ]);
        let rule = DuplicateUtilityPropertiesRule::new(meta("dup"));

        let findings = run(&rule, &ctx, "card_row", RuleSettings::none());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].metadata.as_ref().unwrap()["duplicates"][0], "u-flex");

        assert!(run(&rule, &ctx, "card_grid", RuleSettings::none()).is_empty());
    }

    #[test]
    fn test_utility_property_count_respects_setting() {
        let ctx = styles(vec![
            StyleDefinition::new("u-big")
                .with_property("a", "1")
                .with_property("b", "1")
                .with_property("c", "1"),
        ]);
        let rule = UtilityPropertyCountRule::new(meta("count"));
        assert!(run(&rule, &ctx, "u-big", RuleSettings::none()).is_empty());

        let mut values = serde_json::Map::new();
        values.insert(MAX_PROPERTIES_SETTING.into(), json!(2));
        let findings = run(&rule, &ctx, "u-big", RuleSettings::new(&values));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].metadata.as_ref().unwrap()["count"], 3);
    }

    #[test]
    fn test_empty_combo() {
        let ctx = styles(vec![
            StyleDefinition::new("is-empty"),
            StyleDefinition::new("is-dark").with_property("color", "white"),
        ]);
        let rule = EmptyComboRule::new(meta("empty"));
        assert_eq!(run(&rule, &ctx, "is-empty", RuleSettings::none()).len(), 1);
        assert!(run(&rule, &ctx, "is-dark", RuleSettings::none()).is_empty());
    }
}
