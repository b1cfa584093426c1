//! Naming rules: checks on a single class name.

use regex::Regex;
use serde_json::json;

use super::{Finding, NamingRule, RuleMeta};
use crate::types::{Fix, ParsedClass, Result};

/// Suggests a replacement name, or `None` when no safe rename exists
pub type Fixer = fn(&str) -> Option<String>;

/// Lower-cased name, when lowering alone is enough to pass `pattern`
pub fn lowercase_fix(pattern: &Regex, raw: &str) -> Option<String> {
    let lowered = raw.to_lowercase();
    (lowered != raw && pattern.is_match(&lowered)).then_some(lowered)
}

// =============================================================================
// Format
// =============================================================================

/// Class name must match a regular expression
pub struct FormatRule {
    meta: RuleMeta,
    pattern: Regex,
    expected: &'static str,
    fixer: Option<Fixer>,
}

impl FormatRule {
    /// `expected` names the format in messages (`"utility class"`)
    pub fn new(meta: RuleMeta, pattern: Regex, expected: &'static str) -> Self {
        Self {
            meta,
            pattern,
            expected,
            fixer: None,
        }
    }

    pub fn with_fixer(mut self, fixer: Fixer) -> Self {
        self.fixer = Some(fixer);
        self
    }
}

impl NamingRule for FormatRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn test(&self, class_name: &str, _parsed: &ParsedClass) -> bool {
        self.pattern.is_match(class_name)
    }

    fn evaluate(&self, class_name: &str, _parsed: &ParsedClass) -> Result<Option<Finding>> {
        let mut finding = Finding::new(format!(
            "'{}' does not follow the {} format",
            class_name, self.expected
        ))
        .with_metadata(json!({ "pattern": self.pattern.as_str() }));

        let suggestion = self
            .fixer
            .and_then(|fix| fix(class_name))
            .filter(|s| !s.is_empty() && s != class_name);
        if let Some(name) = suggestion {
            finding = finding.with_fix(Fix::rename(name));
        }
        Ok(Some(finding))
    }
}

// =============================================================================
// Depth
// =============================================================================

/// Limits how many tokens a class name may have
pub struct TokenDepthRule {
    meta: RuleMeta,
    max_tokens: usize,
}

impl TokenDepthRule {
    pub fn new(meta: RuleMeta, max_tokens: usize) -> Self {
        Self { meta, max_tokens }
    }
}

impl NamingRule for TokenDepthRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn test(&self, _class_name: &str, parsed: &ParsedClass) -> bool {
        parsed.tokens().len() <= self.max_tokens
    }

    fn evaluate(&self, class_name: &str, parsed: &ParsedClass) -> Result<Option<Finding>> {
        let depth = parsed.tokens().len();
        Ok(Some(
            Finding::new(format!(
                "'{}' has {} segments; keep class names to {} or fewer",
                class_name, depth, self.max_tokens
            ))
            .with_metadata(json!({ "depth": depth, "max": self.max_tokens }))
            .with_fix(Fix::advice(
                "Create a new component root instead of nesting deeper",
            )),
        ))
    }
}

// =============================================================================
// Folders
// =============================================================================

/// Client-First folder checks: `folder_name` uses `_` to group classes.
///
/// `min_folders` flags a missing folder, `max_folders` flags nesting.
pub struct FolderRule {
    meta: RuleMeta,
    delimiter: char,
    min_folders: usize,
    max_folders: Option<usize>,
}

impl FolderRule {
    /// At least one folder delimiter required
    pub fn required(meta: RuleMeta, delimiter: char) -> Self {
        Self {
            meta,
            delimiter,
            min_folders: 1,
            max_folders: None,
        }
    }

    /// At most `max` folder delimiters allowed
    pub fn max_depth(meta: RuleMeta, delimiter: char, max: usize) -> Self {
        Self {
            meta,
            delimiter,
            min_folders: 0,
            max_folders: Some(max),
        }
    }

    fn folders(&self, class_name: &str) -> usize {
        class_name.matches(self.delimiter).count()
    }
}

impl NamingRule for FolderRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn test(&self, class_name: &str, _parsed: &ParsedClass) -> bool {
        let folders = self.folders(class_name);
        folders >= self.min_folders && self.max_folders.is_none_or(|max| folders <= max)
    }

    fn evaluate(&self, class_name: &str, _parsed: &ParsedClass) -> Result<Option<Finding>> {
        let folders = self.folders(class_name);
        let finding = if folders < self.min_folders {
            Finding::new(format!(
                "'{}' is not in a folder; prefix it with a folder name and '{}'",
                class_name, self.delimiter
            ))
            .with_fix(Fix::advice(format!(
                "Rename to <folder>{}{}",
                self.delimiter, class_name
            )))
        } else {
            Finding::new(format!(
                "'{}' is nested {} folders deep",
                class_name, folders
            ))
            .with_metadata(json!({ "folders": folders, "max": self.max_folders }))
        };
        Ok(Some(finding))
    }
}
