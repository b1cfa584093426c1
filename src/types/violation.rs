use serde::{Deserialize, Serialize};
use std::fmt;

/// Violation severity, most severe first
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    #[default]
    Warning,
    Suggestion,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Suggestion => "suggestion",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" | "warn" => Ok(Severity::Warning),
            "suggestion" | "info" => Ok(Severity::Suggestion),
            _ => Err(format!(
                "Unknown severity: {}. Valid values: error, warning, suggestion",
                s
            )),
        }
    }
}

/// What a rule is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    Format,
    Semantics,
    Maintainability,
    Structure,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Format => write!(f, "format"),
            RuleCategory::Semantics => write!(f, "semantics"),
            RuleCategory::Maintainability => write!(f, "maintainability"),
            RuleCategory::Structure => write!(f, "structure"),
        }
    }
}

/// Suggested remedy attached to a violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

impl Fix {
    pub fn rename(to: impl Into<String>) -> Self {
        let to = to.into();
        Self {
            description: format!("Rename to '{}'", to),
            replacement: Some(to),
        }
    }

    pub fn advice(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            replacement: None,
        }
    }
}

/// One reported violation. Output only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResult {
    pub rule_id: String,
    pub name: String,
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    pub class_name: String,
    pub is_combo: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}
