use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::rules::OpinionMode;
use crate::types::{ElementRole, Generation, RuleResult, Severity};

/// What a scan covered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ScanScope {
    Page,
    #[serde(rename_all = "camelCase")]
    Element { element_id: String },
}

/// Output of one scan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub scope: ScanScope,
    pub preset: String,
    pub mode: OpinionMode,
    /// Selection generation that triggered the scan, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<Generation>,
    pub scanned_at: DateTime<Utc>,
    pub results: Vec<RuleResult>,
    /// Element scans: role of the scanned element and its children
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub roles: BTreeMap<String, ElementRole>,
    /// Page scans: element count per role
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub role_histogram: BTreeMap<ElementRole, usize>,
    /// Applied classes (element scans) or every observed class (page scans)
    pub classes: Vec<String>,
}

impl ScanReport {
    pub fn new(scope: ScanScope, preset: impl Into<String>, mode: OpinionMode) -> Self {
        Self {
            scope,
            preset: preset.into(),
            mode,
            generation: None,
            scanned_at: Utc::now(),
            results: Vec::new(),
            roles: BTreeMap::new(),
            role_histogram: BTreeMap::new(),
            classes: Vec::new(),
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.results.iter().filter(|r| r.severity == severity).count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn suggestion_count(&self) -> usize {
        self.count(Severity::Suggestion)
    }

    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|r| r.severity == Severity::Error)
    }

    /// Results at `min_severity` or more severe
    pub fn at_least(&self, min_severity: Severity) -> impl Iterator<Item = &RuleResult> {
        self.results
            .iter()
            .filter(move |r| r.severity <= min_severity)
    }
}
