//! Shared style lookups for one rule run.
//!
//! Built once per scan from the site-wide style list and handed by reference
//! to every property rule, structure rule and role detector in that scan.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// CSS property map of one class (`property -> value`)
pub type Properties = BTreeMap<String, serde_json::Value>;

/// A site-wide style (class) definition as reported by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDefinition {
    pub name: String,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub is_combo: bool,
}

impl StyleDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Properties::new(),
            is_combo: false,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Class/property indexes over the site-wide style list
#[derive(Debug, Clone, Default)]
pub struct StylePropertiesContext {
    all_styles: Arc<Vec<StyleDefinition>>,
    properties_by_class: HashMap<String, Properties>,
    classes_by_property: HashMap<String, Vec<String>>,
}

impl StylePropertiesContext {
    pub fn new(all_styles: Arc<Vec<StyleDefinition>>) -> Self {
        let mut properties_by_class = HashMap::with_capacity(all_styles.len());
        let mut classes_by_property: HashMap<String, Vec<String>> = HashMap::new();

        for style in all_styles.iter() {
            for (property, value) in &style.properties {
                let classes = classes_by_property
                    .entry(property_key(property, value))
                    .or_default();
                if !classes.contains(&style.name) {
                    classes.push(style.name.clone());
                }
            }
            properties_by_class
                .entry(style.name.clone())
                .or_insert_with(|| style.properties.clone());
        }

        Self {
            all_styles,
            properties_by_class,
            classes_by_property,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn all_styles(&self) -> &[StyleDefinition] {
        &self.all_styles
    }

    pub fn properties_for(&self, class_name: &str) -> Option<&Properties> {
        self.properties_by_class.get(class_name)
    }

    /// Classes declaring `property: value`, in style-list order
    pub fn classes_with(&self, property: &str, value: &serde_json::Value) -> &[String] {
        self.classes_by_property
            .get(&property_key(property, value))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Other classes whose property map is exactly the same as `class_name`'s
    pub fn identical_classes(&self, class_name: &str) -> Vec<&str> {
        let Some(properties) = self.properties_for(class_name) else {
            return Vec::new();
        };
        let Some((property, value)) = properties.iter().next() else {
            return Vec::new();
        };

        self.classes_with(property, value)
            .iter()
            .filter(|other| other.as_str() != class_name)
            .filter(|other| self.properties_for(other) == Some(properties))
            .map(String::as_str)
            .collect()
    }

    /// String value of a property, when it is a JSON string
    pub fn property_str(&self, class_name: &str, property: &str) -> Option<&str> {
        self.properties_for(class_name)?.get(property)?.as_str()
    }
}

fn property_key(property: &str, value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => format!("{}:{}", property, s),
        other => format!("{}:{}", property, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> StylePropertiesContext {
        StylePropertiesContext::new(Arc::new(vec![
            StyleDefinition::new("u-flex").with_property("display", "flex"),
            StyleDefinition::new("card_wrap").with_property("display", "flex"),
            StyleDefinition::new("card_body")
                .with_property("display", "flex")
                .with_property("gap", "1rem"),
            StyleDefinition::new("u-z").with_property("z-index", 2),
        ]))
    }

    #[test]
    fn test_lookup_by_class_and_property() {
        let ctx = context();
        assert_eq!(ctx.property_str("card_wrap", "display"), Some("flex"));
        assert_eq!(
            ctx.classes_with("display", &serde_json::json!("flex")),
            ["u-flex", "card_wrap", "card_body"]
        );
        assert_eq!(ctx.classes_with("z-index", &serde_json::json!(2)), ["u-z"]);
        assert!(ctx.properties_for("missing").is_none());
    }

    #[test]
    fn test_identical_classes() {
        let ctx = context();
        assert_eq!(ctx.identical_classes("card_wrap"), vec!["u-flex"]);
        assert!(ctx.identical_classes("card_body").is_empty());
        assert!(ctx.identical_classes("missing").is_empty());
    }
}
