use serde::{Deserialize, Serialize};
use std::fmt;

/// Lexical kind of a class name under a grammar
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Utility,
    Component,
    Combo,
    Custom,
}

impl ClassKind {
    pub const ALL: [ClassKind; 4] = [
        ClassKind::Utility,
        ClassKind::Component,
        ClassKind::Combo,
        ClassKind::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassKind::Utility => "utility",
            ClassKind::Component => "component",
            ClassKind::Combo => "combo",
            ClassKind::Custom => "custom",
        }
    }
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A class name after grammar classification.
///
/// Built only by a grammar adapter and never mutated afterwards, so the
/// fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedClass {
    raw: String,
    kind: ClassKind,
    tokens: Vec<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    type_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    variation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    element_token: Option<String>,
}

impl ParsedClass {
    /// Prefixed kinds (utility, component, combo) carry tokens but no
    /// type/variation/element segments.
    pub(crate) fn prefixed(raw: &str, kind: ClassKind, tokens: Vec<String>) -> Self {
        Self {
            raw: raw.to_string(),
            kind,
            tokens,
            type_token: None,
            variation: None,
            element_token: None,
        }
    }

    /// Custom classes derive their segments from the token list.
    ///
    /// `type` is the first token, `element` the last (two or more tokens),
    /// `variation` the middle tokens joined with `joiner` (three or more).
    pub(crate) fn custom(raw: &str, tokens: Vec<String>, joiner: char) -> Self {
        let type_token = tokens.first().cloned();
        let element_token = if tokens.len() >= 2 {
            tokens.last().cloned()
        } else {
            None
        };
        let variation = if tokens.len() >= 3 {
            Some(tokens[1..tokens.len() - 1].join(&joiner.to_string()))
        } else {
            None
        };

        Self {
            raw: raw.to_string(),
            kind: ClassKind::Custom,
            tokens,
            type_token,
            variation,
            element_token,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn type_token(&self) -> Option<&str> {
        self.type_token.as_deref()
    }

    pub fn variation(&self) -> Option<&str> {
        self.variation.as_deref()
    }

    pub fn element_token(&self) -> Option<&str> {
        self.element_token.as_deref()
    }

    pub fn is_custom(&self) -> bool {
        self.kind == ClassKind::Custom
    }

    /// Element token when present, otherwise the only token
    pub fn tail_token(&self) -> Option<&str> {
        self.element_token()
            .or_else(|| self.tokens.last().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_custom_segments() {
        let one = ParsedClass::custom("card", tokens(&["card"]), '_');
        assert_eq!(one.type_token(), Some("card"));
        assert_eq!(one.element_token(), None);
        assert_eq!(one.variation(), None);
        assert_eq!(one.tail_token(), Some("card"));

        let two = ParsedClass::custom("card_wrap", tokens(&["card", "wrap"]), '_');
        assert_eq!(two.element_token(), Some("wrap"));
        assert_eq!(two.variation(), None);

        let four = ParsedClass::custom("a_b_c_d", tokens(&["a", "b", "c", "d"]), '_');
        assert_eq!(four.type_token(), Some("a"));
        assert_eq!(four.variation(), Some("b_c"));
        assert_eq!(four.element_token(), Some("d"));
    }

    #[test]
    fn test_serialized_shape() {
        let parsed = ParsedClass::custom("hero_title", tokens(&["hero", "title"]), '_');
        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["kind"], "custom");
        assert_eq!(json["type"], "hero");
        assert_eq!(json["elementToken"], "title");
        assert!(json.get("variation").is_none());
    }
}
