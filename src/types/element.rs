use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One page element as seen at scan time.
///
/// Rebuilt on every scan; the page may have changed since the last one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSnapshot {
    pub id: String,
    #[serde(default = "default_tag")]
    pub tag_name: String,
    /// Applied class names, in application order
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub children_ids: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

fn default_tag() -> String {
    "div".to_string()
}

impl ElementSnapshot {
    pub fn new(id: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag_name: tag_name.into(),
            classes: Vec::new(),
            parent_id: None,
            children_ids: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn tag(&self) -> String {
        self.tag_name.to_ascii_lowercase()
    }
}

/// Structural purpose inferred for an element
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "camelCase")]
pub enum ElementRole {
    Main,
    Section,
    ComponentRoot,
    ChildGroup,
    Container,
    Layout,
    Content,
    Title,
    Text,
    Actions,
    Button,
    Link,
    Icon,
    List,
    Item,
    #[default]
    Unknown,
}

impl ElementRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementRole::Main => "main",
            ElementRole::Section => "section",
            ElementRole::ComponentRoot => "componentRoot",
            ElementRole::ChildGroup => "childGroup",
            ElementRole::Container => "container",
            ElementRole::Layout => "layout",
            ElementRole::Content => "content",
            ElementRole::Title => "title",
            ElementRole::Text => "text",
            ElementRole::Actions => "actions",
            ElementRole::Button => "button",
            ElementRole::Link => "link",
            ElementRole::Icon => "icon",
            ElementRole::List => "list",
            ElementRole::Item => "item",
            ElementRole::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ElementRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ElementRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let role = match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "main" => ElementRole::Main,
            "section" => ElementRole::Section,
            "componentroot" => ElementRole::ComponentRoot,
            "childgroup" => ElementRole::ChildGroup,
            "container" => ElementRole::Container,
            "layout" => ElementRole::Layout,
            "content" => ElementRole::Content,
            "title" => ElementRole::Title,
            "text" => ElementRole::Text,
            "actions" => ElementRole::Actions,
            "button" => ElementRole::Button,
            "link" => ElementRole::Link,
            "icon" => ElementRole::Icon,
            "list" => ElementRole::List,
            "item" => ElementRole::Item,
            "unknown" => ElementRole::Unknown,
            _ => return Err(format!("Unknown element role: {}", s)),
        };
        Ok(role)
    }
}

/// One detector's opinion about an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleDetectionResult {
    pub role: ElementRole,
    /// Confidence in `[0, 1]`
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl RoleDetectionResult {
    pub fn new(role: ElementRole, score: f64) -> Self {
        Self {
            role,
            // NaN would lose every comparison; treat it as no confidence
            score: if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) },
            reasoning: None,
        }
    }

    pub fn because(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [
            ElementRole::Main,
            ElementRole::ComponentRoot,
            ElementRole::ChildGroup,
            ElementRole::Unknown,
        ] {
            assert_eq!(role.as_str().parse::<ElementRole>().unwrap(), role);
        }
        assert_eq!(
            "component-root".parse::<ElementRole>().unwrap(),
            ElementRole::ComponentRoot
        );
        assert!("banner".parse::<ElementRole>().is_err());
    }

    #[test]
    fn test_snapshot_defaults_from_json() {
        let element: ElementSnapshot =
            serde_json::from_str(r#"{"id": "a", "classes": ["hero_wrap"]}"#).unwrap();
        assert_eq!(element.tag_name, "div");
        assert!(element.parent_id.is_none());
        assert!(element.children_ids.is_empty());
    }

    #[test]
    fn test_detection_score_is_clamped() {
        assert_eq!(RoleDetectionResult::new(ElementRole::Main, 1.7).score, 1.0);
        assert_eq!(RoleDetectionResult::new(ElementRole::Main, -0.2).score, 0.0);
        assert_eq!(RoleDetectionResult::new(ElementRole::Main, f64::NAN).score, 0.0);
    }
}
