//! Unified Error Type System
//!
//! Centralized error types for the linter.
//!
//! ## Error Taxonomy
//!
//! - **Parse**: never an error. Grammars are total; malformed names degrade to
//!   `custom` and are reported by naming rules instead.
//! - **Missing context**: never an error. Rules skip silently.
//! - **Rule failure**: caught per invocation by the runner, logged, and counted
//!   as zero violations. [`LintError::Rule`] only surfaces when a caller runs a
//!   single rule directly.
//! - **Configuration**: fatal to the operation (`Config`, `Validation`,
//!   `PresetNotFound`, `NoPresets`).
//! - **Source**: host fetch failures, shared between concurrent cache waiters.

use thiserror::Error;

// =============================================================================
// Source Error
// =============================================================================

/// Failure reported by the host data source.
///
/// Cloneable so one failed fetch can be handed to every caller that was
/// waiting on the same in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    /// What the source was doing when it failed
    pub operation: String,
    /// Detailed message
    pub message: String,
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.operation, self.message)
    }
}

impl std::error::Error for SourceError {}

impl SourceError {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Structured validation error with context
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// What validation failed
    pub kind: ValidationErrorKind,
    /// Field or component that failed validation
    pub field: Option<String>,
    /// Detailed message
    pub message: String,
    /// Expected value or format
    pub expected: Option<String>,
    /// Actual value received
    pub actual: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "Validation failed for '{}': {}", field, self.message)?;
        } else {
            write!(f, "Validation failed: {}", self.message)?;
        }
        if let (Some(expected), Some(actual)) = (&self.expected, &self.actual) {
            write!(f, " (expected {}, got {})", expected, actual)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    /// Create a new validation error
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: None,
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    /// Add field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add expected/actual values
    pub fn with_comparison(
        mut self,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }

    /// Create from simple message
    pub fn from_message(message: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::General, message)
    }
}

/// Validation error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Document shape is wrong (bad JSON, wrong version)
    Schema,
    /// Required field missing
    MissingField,
    /// Invalid format
    Format,
    /// Entries contradict each other or the registry
    Consistency,
    /// General validation error
    General,
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum LintError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(ValidationError),

    #[error("Preset '{requested}' not found and default preset '{default}' is not registered")]
    PresetNotFound { requested: String, default: String },

    #[error("No presets registered")]
    NoPresets,

    // -------------------------------------------------------------------------
    // Runtime Errors
    // -------------------------------------------------------------------------
    #[error("Host source error: {0}")]
    Source(SourceError),

    #[error("Rule '{rule_id}' failed: {message}")]
    Rule { rule_id: String, message: String },

    #[error("Element '{0}' not found in page snapshot")]
    ElementNotFound(String),
}

impl From<ValidationError> for LintError {
    fn from(err: ValidationError) -> Self {
        LintError::Validation(err)
    }
}

impl From<SourceError> for LintError {
    fn from(err: SourceError) -> Self {
        LintError::Source(err)
    }
}

pub type Result<T> = std::result::Result<T, LintError>;

impl LintError {
    /// Create a rule execution error
    pub fn rule(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rule {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    /// Configuration-class errors are fatal to the operation that raised them
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Validation(_) | Self::PresetNotFound { .. } | Self::NoPresets
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
