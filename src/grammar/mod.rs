//! Grammar Adapters
//!
//! A grammar turns a raw class name into a [`ParsedClass`]. Parsing is pure
//! and total: every string yields a result, malformed names fall through to
//! `custom`.
//!
//! Kind classification order:
//!
//! 1. utility prefix
//! 2. component prefix
//! 3. combo prefix, then the grammar's combo pattern
//! 4. custom
//!
//! Adapters differ only in separators, prefixes and combo pattern. Token
//! extraction is shared.

mod normalize;

pub use normalize::{
    UTILITY_CLASS_FORMAT, VARIANT_CLASS_FORMAT, normalize_utility_class, normalize_variant_class,
    normalize_with_prefix,
};

use regex::Regex;
use std::sync::LazyLock;

use crate::constants::presets::{CLIENT_FIRST_ID, LUMOS_ID};
use crate::types::{ClassKind, ParsedClass};

/// Camel-case variant (`isActive`, `isDark2`)
static CAMEL_COMBO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^is[A-Z][A-Za-z0-9]*$").expect("valid regex"));

/// Prefixed combo whose body starts lowercase (`is-brand`, not `is-Brand`)
static STRICT_COMBO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^is-[a-z0-9]").expect("valid regex"));

/// Client-First core utility families
const CLIENT_FIRST_UTILITIES: &[&str] = &[
    "text-",
    "heading-",
    "padding-",
    "margin-",
    "spacer-",
    "max-width-",
    "container-",
    "background-color-",
    "icon-",
    "overflow-",
    "z-index-",
    "aspect-ratio-",
    "align-",
    "pointer-events-",
    "hide",
    "layer",
    "page-wrapper",
    "main-wrapper",
];

/// Class-name grammar for one naming convention
#[derive(Debug, Clone)]
pub struct GrammarAdapter {
    id: String,
    separators: Vec<char>,
    utility_prefixes: Vec<String>,
    component_prefixes: Vec<String>,
    combo_prefixes: Vec<String>,
    combo_pattern: Option<Regex>,
    strict_combo: Option<Regex>,
    requires_custom_first: bool,
}

impl GrammarAdapter {
    /// Create a grammar with the given separators. The first separator joins
    /// variation tokens back together.
    pub fn new(id: impl Into<String>, separators: &[char]) -> Self {
        let separators = if separators.is_empty() {
            vec!['_']
        } else {
            separators.to_vec()
        };

        Self {
            id: id.into(),
            separators,
            utility_prefixes: Vec::new(),
            component_prefixes: Vec::new(),
            combo_prefixes: Vec::new(),
            combo_pattern: None,
            strict_combo: None,
            requires_custom_first: false,
        }
    }

    /// Underscore-first grammar: `u-` utilities, `c-` components, `is-`
    /// combos with camel-case tolerance.
    pub fn lumos() -> Self {
        Self::new(LUMOS_ID, &['_'])
            .with_utility_prefixes(["u-"])
            .with_component_prefixes(["c-"])
            .with_combo_prefixes(["is-"])
            .with_combo_pattern(CAMEL_COMBO.clone())
            .requiring_custom_first(true)
    }

    /// Dash-first grammar: strict `is-` combos, core utility families.
    pub fn client_first() -> Self {
        Self::new(CLIENT_FIRST_ID, &['-', '_'])
            .with_utility_prefixes(CLIENT_FIRST_UTILITIES.iter().copied())
            .with_combo_prefixes(["is-"])
            .with_strict_combo(STRICT_COMBO.clone())
    }

    pub fn with_utility_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.utility_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_component_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.component_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_combo_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.combo_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_combo_pattern(mut self, pattern: Regex) -> Self {
        self.combo_pattern = Some(pattern);
        self
    }

    /// Prefixed combos must also match `pattern`; the rest fall through to custom
    pub fn with_strict_combo(mut self, pattern: Regex) -> Self {
        self.strict_combo = Some(pattern);
        self
    }

    pub fn requiring_custom_first(mut self, required: bool) -> Self {
        self.requires_custom_first = required;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn separators(&self) -> &[char] {
        &self.separators
    }

    pub fn utility_prefixes(&self) -> &[String] {
        &self.utility_prefixes
    }

    pub fn component_prefixes(&self) -> &[String] {
        &self.component_prefixes
    }

    pub fn combo_prefixes(&self) -> &[String] {
        &self.combo_prefixes
    }

    /// Whether a custom class must precede utilities and combos on an element
    pub fn requires_custom_first(&self) -> bool {
        self.requires_custom_first
    }

    /// Classify and tokenize a class name
    pub fn parse(&self, raw: &str) -> ParsedClass {
        if let Some(body) = strip_any_prefix(raw, &self.utility_prefixes) {
            return ParsedClass::prefixed(raw, ClassKind::Utility, self.tokenize(body));
        }
        if let Some(body) = strip_any_prefix(raw, &self.component_prefixes) {
            return ParsedClass::prefixed(raw, ClassKind::Component, self.tokenize(body));
        }
        if let Some(body) = strip_any_prefix(raw, &self.combo_prefixes)
            && self
                .strict_combo
                .as_ref()
                .is_none_or(|pattern| pattern.is_match(raw))
        {
            return ParsedClass::prefixed(raw, ClassKind::Combo, self.tokenize(body));
        }
        if self
            .combo_pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(raw))
        {
            return ParsedClass::prefixed(raw, ClassKind::Combo, vec![raw.to_string()]);
        }

        ParsedClass::custom(raw, self.tokenize(raw), self.separators[0])
    }

    /// Kind only, for callers that do not need the token structure
    pub fn kind_of(&self, raw: &str) -> ClassKind {
        self.parse(raw).kind()
    }

    /// First custom class on an element, parsed
    pub fn first_custom<'a, I>(&self, classes: I) -> Option<ParsedClass>
    where
        I: IntoIterator<Item = &'a String>,
    {
        classes
            .into_iter()
            .map(|class| self.parse(class))
            .find(ParsedClass::is_custom)
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c| self.separators.contains(&c))
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Prefixes ending in `-` match as plain prefixes with a non-empty body.
/// Bare words match exactly or when followed by `-`.
fn strip_any_prefix<'a>(raw: &'a str, prefixes: &[String]) -> Option<&'a str> {
    prefixes.iter().find_map(|prefix| {
        if prefix.ends_with('-') {
            raw.strip_prefix(prefix.as_str())
                .filter(|body| !body.is_empty())
        } else if raw == prefix {
            Some(raw)
        } else {
            raw.strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_prefix('-'))
                .filter(|body| !body.is_empty())
        }
    })
}
