//! Opinion modes: fixed severity tables layered over a rule registry.
//!
//! Each table maps rule ids to absolute severities, so applying a mode twice
//! is the same as applying it once. `Balanced` has an empty table; it does not
//! restore defaults after another mode was applied
//! (see [`RuleRegistry::reset_to_defaults`]).

use serde::{Deserialize, Serialize};
use std::fmt;

use tracing::debug;

use super::RuleRegistry;
use crate::types::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpinionMode {
    Strict,
    #[default]
    Balanced,
    Lenient,
}

/// Style-quality rules become one step louder
const STRICT: &[(&str, Severity)] = &[
    ("main-has-content", Severity::Error),
    ("utility-on-component-root", Severity::Error),
    ("multiple-custom-classes", Severity::Error),
    ("duplicate-utility-properties", Severity::Error),
    ("lumos-combo-class-format", Severity::Error),
    ("lumos-class-depth", Severity::Warning),
    ("lumos-utility-property-count", Severity::Warning),
    ("lumos-child-group-prefix", Severity::Error),
    ("cf-custom-class-folder", Severity::Error),
    ("cf-folder-depth", Severity::Warning),
    ("cf-empty-combo", Severity::Warning),
];

/// Formatting errors become warnings, everything else quieter
const LENIENT: &[(&str, Severity)] = &[
    ("main-singleton", Severity::Warning),
    ("main-has-content", Severity::Suggestion),
    ("utility-on-component-root", Severity::Suggestion),
    ("combo-without-base", Severity::Warning),
    ("multiple-custom-classes", Severity::Suggestion),
    ("duplicate-utility-properties", Severity::Suggestion),
    ("lumos-custom-class-format", Severity::Warning),
    ("lumos-utility-class-format", Severity::Warning),
    ("lumos-combo-class-format", Severity::Suggestion),
    ("lumos-component-class-format", Severity::Warning),
    ("lumos-custom-first", Severity::Warning),
    ("lumos-child-group-prefix", Severity::Suggestion),
    ("cf-custom-class-format", Severity::Warning),
    ("cf-combo-class-format", Severity::Warning),
    ("cf-custom-class-folder", Severity::Suggestion),
];

impl OpinionMode {
    pub const ALL: [OpinionMode; 3] = [
        OpinionMode::Strict,
        OpinionMode::Balanced,
        OpinionMode::Lenient,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OpinionMode::Strict => "strict",
            OpinionMode::Balanced => "balanced",
            OpinionMode::Lenient => "lenient",
        }
    }

    pub fn severity_table(&self) -> &'static [(&'static str, Severity)] {
        match self {
            OpinionMode::Strict => STRICT,
            OpinionMode::Balanced => &[],
            OpinionMode::Lenient => LENIENT,
        }
    }

    /// Overwrite severities of the listed rules; rules missing from the
    /// registry are skipped. Returns how many rules changed.
    pub fn apply(&self, registry: &mut RuleRegistry) -> usize {
        let mut applied = 0;
        for (rule_id, severity) in self.severity_table() {
            if registry.set_severity(rule_id, *severity) {
                applied += 1;
            }
        }
        debug!(mode = %self, applied, "Applied opinion mode");
        applied
    }
}

impl fmt::Display for OpinionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OpinionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(OpinionMode::Strict),
            "balanced" | "default" => Ok(OpinionMode::Balanced),
            "lenient" | "relaxed" => Ok(OpinionMode::Lenient),
            _ => Err(format!(
                "Unknown opinion mode: {}. Valid values: strict, balanced, lenient",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::{PresetOptions, lumos};

    fn lumos_registry() -> RuleRegistry {
        RuleRegistry::with_rules(lumos::preset(&PresetOptions::default()).rules)
    }

    #[test]
    fn test_apply_is_idempotent() {
        for mode in OpinionMode::ALL {
            let mut once = lumos_registry();
            mode.apply(&mut once);
            let mut twice = lumos_registry();
            mode.apply(&mut twice);
            mode.apply(&mut twice);
            assert_eq!(
                once.export_configuration().unwrap(),
                twice.export_configuration().unwrap(),
                "mode {mode}"
            );
        }
    }

    #[test]
    fn test_balanced_is_noop() {
        let base = lumos_registry();
        let mut balanced = lumos_registry();
        assert_eq!(OpinionMode::Balanced.apply(&mut balanced), 0);
        assert_eq!(
            base.export_configuration().unwrap(),
            balanced.export_configuration().unwrap()
        );
    }

    #[test]
    fn test_strict_and_lenient_move_severities() {
        let mut strict = lumos_registry();
        OpinionMode::Strict.apply(&mut strict);
        assert_eq!(
            strict.effective_severity("lumos-class-depth"),
            Some(Severity::Warning)
        );

        let mut lenient = lumos_registry();
        OpinionMode::Lenient.apply(&mut lenient);
        assert_eq!(
            lenient.effective_severity("lumos-custom-class-format"),
            Some(Severity::Warning)
        );
        // Client-First ids are not in this registry
        assert!(lenient.get_rule("cf-custom-class-format").is_none());
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("STRICT".parse::<OpinionMode>().unwrap(), OpinionMode::Strict);
        assert_eq!("relaxed".parse::<OpinionMode>().unwrap(), OpinionMode::Lenient);
        assert!("loud".parse::<OpinionMode>().is_err());
    }
}
