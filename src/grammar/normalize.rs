//! Class name normalizers used by fix suggestions.
//!
//! Normalization lower-cases, splits camel-case humps, collapses every run
//! of other characters into one `-`, then ensures exactly one leading prefix.
//! Both normalizers are idempotent.

use regex::Regex;
use std::sync::LazyLock;

pub static UTILITY_CLASS_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^u-[a-z0-9]+(-[a-z0-9]+)*$").expect("valid regex"));

pub static VARIANT_CLASS_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^is-[a-z0-9]+(-[a-z0-9]+)*$").expect("valid regex"));

/// Normalize to a `u-` utility class name, or `""` if nothing usable remains
pub fn normalize_utility_class(raw: &str) -> String {
    normalize_with_prefix(raw, "u")
}

/// Normalize to an `is-` variant class name, or `""` if nothing usable remains
pub fn normalize_variant_class(raw: &str) -> String {
    normalize_with_prefix(raw, "is")
}

/// Slugify `raw` and prepend `{stem}-` unless the slug already carries it
pub fn normalize_with_prefix(raw: &str, stem: &str) -> String {
    let slug = slugify(raw);
    let prefix = format!("{}-", stem);
    let body = slug.strip_prefix(prefix.as_str()).unwrap_or(&slug);

    if body.is_empty() {
        String::new()
    } else {
        format!("{}{}", prefix, body)
    }
}

fn slugify(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev: Option<char> = None;

    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            let hump = c.is_ascii_uppercase()
                && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit());
            if hump && !out.ends_with('-') {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
        prev = Some(c);
    }

    while out.ends_with('-') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_utility() {
        assert_eq!(normalize_utility_class("u-text-center"), "u-text-center");
        assert_eq!(normalize_utility_class("Text Center"), "u-text-center");
        assert_eq!(normalize_utility_class("textCenter"), "u-text-center");
        assert_eq!(normalize_utility_class("u__margin--top"), "u-margin-top");
        assert_eq!(normalize_utility_class("h1Title"), "u-h1-title");
    }

    #[test]
    fn test_normalize_variant() {
        assert_eq!(normalize_variant_class("isActive"), "is-active");
        assert_eq!(normalize_variant_class("is_dark"), "is-dark");
        assert_eq!(normalize_variant_class("primary"), "is-primary");
    }

    #[test]
    fn test_empty_bodies() {
        assert_eq!(normalize_utility_class(""), "");
        assert_eq!(normalize_utility_class("u-"), "");
        assert_eq!(normalize_utility_class("--__"), "");
        assert_eq!(normalize_variant_class("is-"), "");
    }

    #[test]
    fn test_non_ascii_collapses() {
        assert_eq!(normalize_utility_class("größe"), "u-gr-e");
    }

    #[test]
    fn test_outputs_match_formats() {
        for raw in ["Foo Bar", "fooBar2", "u-x", "  spaced  out "] {
            let out = normalize_utility_class(raw);
            assert!(UTILITY_CLASS_FORMAT.is_match(&out), "{}", out);
            let out = normalize_variant_class(raw);
            assert!(VARIANT_CLASS_FORMAT.is_match(&out), "{}", out);
        }
    }
}
