//! Lumos: underscore-separated custom classes (`card_title`), `u-` utilities,
//! `c-` components and `is-` combos. The custom class comes first.

use regex::Regex;
use std::sync::{Arc, LazyLock};

use super::{Preset, PresetOptions, shared_rules};
use crate::analyzer::roles::{
    ChildGroupDetector, ComponentRootDetector, ContainerMatcher, LayoutStyleDetector,
    MainDetector, RootNaming, TokenDetector,
};
use crate::analyzer::DetectorList;
use crate::constants::presets::LUMOS_ID;
use crate::constants::rules::LUMOS_MAX_CUSTOM_TOKENS;
use crate::grammar::{
    GrammarAdapter, UTILITY_CLASS_FORMAT, VARIANT_CLASS_FORMAT, normalize_utility_class,
    normalize_variant_class,
};
use crate::rules::naming::{FormatRule, TokenDepthRule, lowercase_fix};
use crate::rules::property::UtilityPropertyCountRule;
use crate::rules::structure::{ChildGroupPrefixRule, CustomFirstRule};
use crate::rules::{Rule, RuleMeta};
use crate::types::{ClassKind, ElementRole, RuleCategory, Severity};

pub static CUSTOM_CLASS_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*(_[a-z0-9]+(-[a-z0-9]+)*)+$").expect("valid regex")
});

pub static COMPONENT_CLASS_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^c-[a-z0-9]+(-[a-z0-9]+)*(_[a-z0-9]+(-[a-z0-9]+)*)*$").expect("valid regex")
});

const ROOT_SUFFIXES: &[&str] = &["wrap"];
const GROUP_SUFFIXES: &[&str] = &["content", "inner", "body", "group", "top", "bottom"];

pub fn preset(options: &PresetOptions) -> Preset {
    let grammar = GrammarAdapter::lumos();
    Preset {
        id: LUMOS_ID.to_string(),
        name: "Lumos".to_string(),
        description: "Underscore-first custom classes with u-, c- and is- prefixes".to_string(),
        role_detectors: detectors(options),
        role_detection_config: options.roles.clone(),
        rules: rules(),
        grammar,
    }
}

fn root_naming() -> RootNaming {
    RootNaming::new(ROOT_SUFFIXES.iter().copied()).with_exact_tokens(2)
}

fn detectors(options: &PresetOptions) -> DetectorList {
    let gates = options.gates;
    vec![
        Arc::new(MainDetector::new(["main"], ["main-wrapper", "page_main"])),
        Arc::new(ComponentRootDetector::new(
            root_naming(),
            ContainerMatcher::new(["container", "contain"], ["u-container"]),
            gates,
        )),
        Arc::new(ChildGroupDetector::new(
            GROUP_SUFFIXES.iter().copied(),
            root_naming(),
            gates,
        )),
        Arc::new(
            TokenDetector::naming(ElementRole::Section)
                .heads(["section"])
                .tails(["section"])
                .tags(["section"]),
        ),
        Arc::new(
            TokenDetector::naming(ElementRole::Container)
                .tails(["container", "contain"])
                .class_prefixes(["u-container"]),
        ),
        Arc::new(TokenDetector::naming(ElementRole::Layout).tails(["layout", "grid", "row"])),
        Arc::new(
            TokenDetector::naming(ElementRole::Title)
                .tails(["title", "heading"])
                .tags(["h1", "h2", "h3", "h4", "h5", "h6"]),
        ),
        Arc::new(
            TokenDetector::naming(ElementRole::Text)
                .tails(["text", "paragraph", "subtitle", "eyebrow"])
                .tags(["p"]),
        ),
        Arc::new(
            TokenDetector::naming(ElementRole::Button)
                .tails(["button", "btn"])
                .class_prefixes(["c-button"])
                .tags(["button"]),
        ),
        Arc::new(TokenDetector::naming(ElementRole::Link).tails(["link"]).tags(["a"])),
        Arc::new(
            TokenDetector::naming(ElementRole::Icon)
                .tails(["icon", "svg"])
                .tags(["svg"]),
        ),
        Arc::new(TokenDetector::naming(ElementRole::Actions).tails(["actions", "buttons", "cta"])),
        Arc::new(
            TokenDetector::naming(ElementRole::List)
                .tails(["list"])
                .tags(["ul", "ol"]),
        ),
        Arc::new(
            TokenDetector::naming(ElementRole::Item)
                .tails(["item"])
                .tags(["li"]),
        ),
        Arc::new(TokenDetector::naming(ElementRole::Content).tails(["content", "body"])),
        Arc::new(LayoutStyleDetector),
    ]
}

fn rules() -> Vec<Rule> {
    let mut rules = vec![
        Rule::naming(
            FormatRule::new(
                RuleMeta::new(
                    "lumos-custom-class-format",
                    "Custom class format",
                    RuleCategory::Format,
                    Severity::Error,
                )
                .describe("Custom classes are lowercase and use '_' between type and element")
                .targets(&[ClassKind::Custom]),
                CUSTOM_CLASS_FORMAT.clone(),
                "Lumos custom class",
            )
            .with_fixer(|raw| lowercase_fix(&CUSTOM_CLASS_FORMAT, raw)),
        ),
        Rule::naming(
            FormatRule::new(
                RuleMeta::new(
                    "lumos-utility-class-format",
                    "Utility class format",
                    RuleCategory::Format,
                    Severity::Error,
                )
                .describe("Utility classes are 'u-' followed by lowercase dash-separated words")
                .targets(&[ClassKind::Utility]),
                UTILITY_CLASS_FORMAT.clone(),
                "utility class",
            )
            .with_fixer(|raw| Some(normalize_utility_class(raw))),
        ),
        Rule::naming(
            FormatRule::new(
                RuleMeta::new(
                    "lumos-combo-class-format",
                    "Combo class format",
                    RuleCategory::Format,
                    Severity::Warning,
                )
                .describe("Combo classes are 'is-' followed by lowercase dash-separated words")
                .targets(&[ClassKind::Combo]),
                VARIANT_CLASS_FORMAT.clone(),
                "combo class",
            )
            .with_fixer(|raw| Some(normalize_variant_class(raw))),
        ),
        Rule::naming(
            FormatRule::new(
                RuleMeta::new(
                    "lumos-component-class-format",
                    "Component class format",
                    RuleCategory::Format,
                    Severity::Error,
                )
                .describe("Component classes are 'c-' followed by a lowercase name")
                .targets(&[ClassKind::Component]),
                COMPONENT_CLASS_FORMAT.clone(),
                "component class",
            )
            .with_fixer(|raw| lowercase_fix(&COMPONENT_CLASS_FORMAT, raw)),
        ),
        Rule::naming(TokenDepthRule::new(
            RuleMeta::new(
                "lumos-class-depth",
                "Class depth",
                RuleCategory::Maintainability,
                Severity::Suggestion,
            )
            .describe("Custom classes have at most type, variation and element segments")
            .targets(&[ClassKind::Custom]),
            LUMOS_MAX_CUSTOM_TOKENS,
        )),
        Rule::property(UtilityPropertyCountRule::new(
            RuleMeta::new(
                "lumos-utility-property-count",
                "Utility property count",
                RuleCategory::Maintainability,
                Severity::Suggestion,
            )
            .describe("Utility classes set only a few properties")
            .targets(&[ClassKind::Utility]),
        )),
    ];
    rules.extend(shared_rules());
    rules.push(Rule::structure(CustomFirstRule::new(
        RuleMeta::new(
            "lumos-custom-first",
            "Custom class first",
            RuleCategory::Semantics,
            Severity::Error,
        )
        .describe("The custom class is applied before utilities and combos"),
    )));
    rules.push(Rule::structure(ChildGroupPrefixRule::new(
        RuleMeta::new(
            "lumos-child-group-prefix",
            "Child group prefix",
            RuleCategory::Structure,
            Severity::Warning,
        )
        .describe("Child groups share the type segment of their component root"),
    )));
    rules
}
