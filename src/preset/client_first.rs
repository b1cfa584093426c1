//! Client-First: dash-separated words grouped into `folder_name` classes,
//! a fixed family of utility classes and strict `is-` combos.

use regex::Regex;
use std::sync::{Arc, LazyLock};

use super::{Preset, PresetOptions, shared_rules};
use crate::analyzer::DetectorList;
use crate::analyzer::roles::{
    ChildGroupDetector, ComponentRootDetector, ContainerMatcher, LayoutStyleDetector,
    MainDetector, RootNaming, TokenDetector,
};
use crate::constants::presets::CLIENT_FIRST_ID;
use crate::grammar::{GrammarAdapter, VARIANT_CLASS_FORMAT, normalize_variant_class};
use crate::rules::naming::{FolderRule, FormatRule, lowercase_fix};
use crate::rules::property::EmptyComboRule;
use crate::rules::{Rule, RuleMeta};
use crate::types::{ClassKind, ElementRole, RuleCategory, Severity};

pub static CUSTOM_CLASS_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*(_[a-z0-9]+(-[a-z0-9]+)*)*$").expect("valid regex")
});

const FOLDER_DELIMITER: char = '_';

pub fn preset(options: &PresetOptions) -> Preset {
    Preset {
        id: CLIENT_FIRST_ID.to_string(),
        name: "Client-First".to_string(),
        description: "Dash-first class names organized into underscore folders".to_string(),
        grammar: GrammarAdapter::client_first(),
        role_detectors: detectors(options),
        role_detection_config: options.roles.clone(),
        rules: rules(),
    }
}

fn root_naming() -> RootNaming {
    RootNaming::new(["component"])
}

fn detectors(options: &PresetOptions) -> DetectorList {
    let gates = options.gates;
    vec![
        Arc::new(MainDetector::new(["main"], ["main-wrapper"])),
        Arc::new(ComponentRootDetector::new(
            root_naming(),
            ContainerMatcher::new(
                ["container"],
                ["container-", "padding-global", "padding-section-"],
            ),
            gates,
        )),
        Arc::new(ChildGroupDetector::new(
            ["wrapper", "content", "inner", "group"],
            root_naming(),
            gates,
        )),
        Arc::new(
            TokenDetector::naming(ElementRole::Section)
                .heads(["section"])
                .class_prefixes(["section_"])
                .tags(["section"]),
        ),
        Arc::new(
            TokenDetector::naming(ElementRole::Container)
                .tails(["container"])
                .class_prefixes(["container-", "padding-global"]),
        ),
        Arc::new(TokenDetector::naming(ElementRole::Layout).tails(["layout", "grid", "row"])),
        Arc::new(
            TokenDetector::naming(ElementRole::Title)
                .tails(["title", "heading"])
                .class_prefixes(["heading-style-"])
                .tags(["h1", "h2", "h3", "h4", "h5", "h6"]),
        ),
        Arc::new(
            TokenDetector::naming(ElementRole::Text)
                .tails(["text", "paragraph", "subtitle"])
                .tags(["p"]),
        ),
        Arc::new(
            TokenDetector::naming(ElementRole::Button)
                .tails(["button"])
                .class_prefixes(["button"])
                .tags(["button"]),
        ),
        Arc::new(TokenDetector::naming(ElementRole::Link).tails(["link"]).tags(["a"])),
        Arc::new(
            TokenDetector::naming(ElementRole::Icon)
                .tails(["icon"])
                .class_prefixes(["icon-"])
                .tags(["svg"]),
        ),
        Arc::new(TokenDetector::naming(ElementRole::Actions).tails(["actions", "buttons"])),
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
        Arc::new(TokenDetector::naming(ElementRole::Content).tails(["content"])),
        Arc::new(LayoutStyleDetector),
    ]
}

fn rules() -> Vec<Rule> {
    let mut rules = vec![
        Rule::naming(
            FormatRule::new(
                RuleMeta::new(
                    "cf-custom-class-format",
                    "Custom class format",
                    RuleCategory::Format,
                    Severity::Error,
                )
                .describe("Custom classes are lowercase words joined by '-' and '_'")
                .targets(&[ClassKind::Custom]),
                CUSTOM_CLASS_FORMAT.clone(),
                "Client-First custom class",
            )
            .with_fixer(|raw| lowercase_fix(&CUSTOM_CLASS_FORMAT, raw)),
        ),
        Rule::naming(FolderRule::required(
            RuleMeta::new(
                "cf-custom-class-folder",
                "Custom class folder",
                RuleCategory::Maintainability,
                Severity::Warning,
            )
            .describe("Custom classes live in a folder: 'folder_element'")
            .targets(&[ClassKind::Custom]),
            FOLDER_DELIMITER,
        )),
        Rule::naming(FolderRule::max_depth(
            RuleMeta::new(
                "cf-folder-depth",
                "Folder depth",
                RuleCategory::Maintainability,
                Severity::Suggestion,
            )
            .describe("Custom classes use a single folder level")
            .targets(&[ClassKind::Custom]),
            FOLDER_DELIMITER,
            1,
        )),
        Rule::naming(
            FormatRule::new(
                RuleMeta::new(
                    "cf-combo-class-format",
                    "Combo class format",
                    RuleCategory::Format,
                    Severity::Error,
                )
                .describe("Combo classes are 'is-' followed by lowercase dash-separated words")
                .targets(&[ClassKind::Combo]),
                VARIANT_CLASS_FORMAT.clone(),
                "combo class",
            )
            .with_fixer(|raw| Some(normalize_variant_class(raw))),
        ),
        Rule::property(EmptyComboRule::new(
            RuleMeta::new(
                "cf-empty-combo",
                "Empty combo class",
                RuleCategory::Maintainability,
                Severity::Suggestion,
            )
            .describe("Combo classes must change at least one property")
            .targets(&[ClassKind::Combo]),
        )),
    ];
    rules.extend(shared_rules());
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::ElementGraph;
    use crate::styles::StylePropertiesContext;
    use crate::types::ElementSnapshot;

    #[test]
    fn test_custom_format() {
        assert!(CUSTOM_CLASS_FORMAT.is_match("team-card_title"));
        assert!(CUSTOM_CLASS_FORMAT.is_match("hero"));
        assert!(!CUSTOM_CLASS_FORMAT.is_match("Hero_Title"));
        assert!(!CUSTOM_CLASS_FORMAT.is_match("hero--title"));
    }

    #[test]
    fn test_component_roles() {
        let preset = preset(&PresetOptions::default());
        let graph = ElementGraph::from_elements(vec![
            ElementSnapshot::new("section", "section").with_classes(["section_team"]),
            ElementSnapshot::new("container", "div")
                .with_classes(["container-large"])
                .with_parent("section"),
            ElementSnapshot::new("root", "div")
                .with_classes(["team_component"])
                .with_parent("container"),
            ElementSnapshot::new("list", "div")
                .with_classes(["team_list"])
                .with_parent("root"),
        ]);
        let roles = preset
            .classifier()
            .classify_all(&graph, &StylePropertiesContext::empty());

        assert_eq!(roles["section"].role, ElementRole::Section);
        assert_eq!(roles["container"].role, ElementRole::Container);
        assert_eq!(roles["root"].role, ElementRole::ComponentRoot);
        assert_eq!(roles["list"].role, ElementRole::List);
    }

    #[test]
    fn test_no_custom_first_requirement() {
        let preset = preset(&PresetOptions::default());
        assert!(!preset.grammar.requires_custom_first());
        assert!(preset.rules.iter().all(|r| r.id() != "lumos-custom-first"));
    }
}
