pub mod class;
pub mod element;
pub mod error;
pub mod violation;

pub use class::{ClassKind, ParsedClass};
pub use element::{ElementRole, ElementSnapshot, RoleDetectionResult};
pub use error::{
    LintError, Result, SourceError, ValidationError, ValidationErrorKind,
};
pub use violation::{Fix, RuleCategory, RuleResult, Severity};

// =============================================================================
// Domain Newtypes
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic selection generation used to correlate a scan with the
/// selection that triggered it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    pub const ZERO: Self = Self(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
