//! Reusable detector shapes. Presets instantiate them with their own token
//! tables and gates.

use super::{DetectionInput, DetectorGates, RoleDetector};
use crate::constants::roles::{NAMING_SIGNAL, STRONG_SIGNAL, STYLE_SIGNAL, TAG_SIGNAL};
use crate::grammar::GrammarAdapter;
use crate::types::{ElementRole, ElementSnapshot, ParsedClass, RoleDetectionResult};

/// Score for a child group found under a component root
const GROUP_SIGNAL: f64 = 0.8;

fn owned<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

fn contains(list: &[String], value: &str) -> bool {
    list.iter().any(|item| item == value)
}

// =============================================================================
// Shared Matchers
// =============================================================================

/// Naming of a component root class
#[derive(Debug, Clone, Default)]
pub struct RootNaming {
    suffixes: Vec<String>,
    exact_tokens: Option<usize>,
}

impl RootNaming {
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suffixes: owned(suffixes),
            exact_tokens: None,
        }
    }

    /// Only names with exactly `count` tokens qualify (`card_wrap`, not
    /// `card_body_wrap`)
    pub fn with_exact_tokens(mut self, count: usize) -> Self {
        self.exact_tokens = Some(count);
        self
    }

    pub fn matches(&self, parsed: &ParsedClass) -> bool {
        parsed.is_custom()
            && parsed.tokens().len() >= 2
            && self.exact_tokens.is_none_or(|n| parsed.tokens().len() == n)
            && parsed
                .element_token()
                .is_some_and(|tail| contains(&self.suffixes, tail))
    }
}

/// Recognizes container elements by custom-class tail or class prefix
#[derive(Debug, Clone, Default)]
pub struct ContainerMatcher {
    tokens: Vec<String>,
    class_prefixes: Vec<String>,
}

impl ContainerMatcher {
    pub fn new<I, S, J, T>(tokens: I, class_prefixes: J) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            tokens: owned(tokens),
            class_prefixes: owned(class_prefixes),
        }
    }

    pub fn matches(&self, element: &ElementSnapshot, grammar: &GrammarAdapter) -> bool {
        let by_prefix = element.classes.iter().any(|class| {
            self.class_prefixes
                .iter()
                .any(|prefix| class.starts_with(prefix.as_str()))
        });

        by_prefix
            || grammar
                .first_custom(&element.classes)
                .is_some_and(|p| p.tail_token().is_some_and(|t| contains(&self.tokens, t)))
    }
}

// =============================================================================
// Main
// =============================================================================

/// `<main>` tag, a main class name, or a custom class ending in a main token
#[derive(Debug, Clone)]
pub struct MainDetector {
    tokens: Vec<String>,
    class_names: Vec<String>,
}

impl MainDetector {
    pub fn new<I, S, J, T>(tokens: I, class_names: J) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            tokens: owned(tokens),
            class_names: owned(class_names),
        }
    }
}

impl RoleDetector for MainDetector {
    fn name(&self) -> &str {
        "main"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> Option<RoleDetectionResult> {
        if input.element.tag() == "main" {
            return Some(
                RoleDetectionResult::new(ElementRole::Main, STRONG_SIGNAL).because("tag <main>"),
            );
        }

        if let Some(class) = input
            .element
            .classes
            .iter()
            .find(|c| contains(&self.class_names, c))
        {
            return Some(
                RoleDetectionResult::new(ElementRole::Main, STRONG_SIGNAL)
                    .because(format!("class '{}'", class)),
            );
        }

        let primary = input.primary?;
        let tail = primary.element_token()?;
        contains(&self.tokens, tail).then(|| {
            RoleDetectionResult::new(ElementRole::Main, STRONG_SIGNAL)
                .because(format!("'{}' ends in '{}'", primary.raw(), tail))
        })
    }
}

// =============================================================================
// Token Tables
// =============================================================================

/// Naming-table detector: head/tail tokens of the primary custom class,
/// class prefixes, and a weaker tag fallback
#[derive(Debug, Clone)]
pub struct TokenDetector {
    name: String,
    role: ElementRole,
    score: f64,
    heads: Vec<String>,
    tails: Vec<String>,
    class_prefixes: Vec<String>,
    tags: Vec<String>,
}

impl TokenDetector {
    pub fn new(role: ElementRole, score: f64) -> Self {
        Self {
            name: role.as_str().to_string(),
            role,
            score,
            heads: Vec::new(),
            tails: Vec::new(),
            class_prefixes: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Table detector at the standard naming score
    pub fn naming(role: ElementRole) -> Self {
        Self::new(role, NAMING_SIGNAL)
    }

    pub fn heads<I, S>(mut self, heads: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.heads = owned(heads);
        self
    }

    pub fn tails<I, S>(mut self, tails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tails = owned(tails);
        self
    }

    pub fn class_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.class_prefixes = owned(prefixes);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = owned(tags);
        self
    }
}

impl RoleDetector for TokenDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn detect(&self, input: &DetectionInput<'_>) -> Option<RoleDetectionResult> {
        if let Some(primary) = input.primary {
            if let Some(tail) = primary.tail_token()
                && contains(&self.tails, tail)
            {
                return Some(
                    RoleDetectionResult::new(self.role, self.score)
                        .because(format!("'{}' ends in '{}'", primary.raw(), tail)),
                );
            }
            if primary.tokens().len() >= 2
                && let Some(head) = primary.type_token()
                && contains(&self.heads, head)
            {
                return Some(
                    RoleDetectionResult::new(self.role, self.score)
                        .because(format!("'{}' starts with '{}'", primary.raw(), head)),
                );
            }
        }

        if let Some(class) = input.element.classes.iter().find(|c| {
            self.class_prefixes
                .iter()
                .any(|p| c.starts_with(p.as_str()))
        }) {
            return Some(
                RoleDetectionResult::new(self.role, self.score)
                    .because(format!("class '{}'", class)),
            );
        }

        let tag = input.element.tag();
        contains(&self.tags, &tag).then(|| {
            RoleDetectionResult::new(self.role, TAG_SIGNAL.min(self.score))
                .because(format!("tag <{}>", tag))
        })
    }
}

// =============================================================================
// Component Root
// =============================================================================

/// Root of a component, optionally required to sit directly in a container
#[derive(Debug, Clone)]
pub struct ComponentRootDetector {
    naming: RootNaming,
    container: ContainerMatcher,
    gates: DetectorGates,
}

impl ComponentRootDetector {
    pub fn new(naming: RootNaming, container: ContainerMatcher, gates: DetectorGates) -> Self {
        Self {
            naming,
            container,
            gates,
        }
    }
}

impl RoleDetector for ComponentRootDetector {
    fn name(&self) -> &str {
        "component-root"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> Option<RoleDetectionResult> {
        let primary = input.primary?;
        if !self.naming.matches(primary) {
            return None;
        }

        if self.gates.require_direct_parent_container_for_root {
            let parent = input.graph.parent(&input.element.id)?;
            if !self.container.matches(parent, input.grammar) {
                return None;
            }
        }

        Some(
            RoleDetectionResult::new(ElementRole::ComponentRoot, STRONG_SIGNAL)
                .because(format!("'{}' names a component root", primary.raw())),
        )
    }
}

// =============================================================================
// Child Group
// =============================================================================

/// Grouping element nested under a component root
#[derive(Debug, Clone)]
pub struct ChildGroupDetector {
    group_suffixes: Vec<String>,
    root: RootNaming,
    gates: DetectorGates,
}

impl ChildGroupDetector {
    pub fn new<I, S>(group_suffixes: I, root: RootNaming, gates: DetectorGates) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            group_suffixes: owned(group_suffixes),
            root,
            gates,
        }
    }
}

impl RoleDetector for ChildGroupDetector {
    fn name(&self) -> &str {
        "child-group"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> Option<RoleDetectionResult> {
        let primary = input.primary?;
        let tail = primary.element_token()?;
        if !contains(&self.group_suffixes, tail) || self.root.matches(primary) {
            return None;
        }

        let root = input
            .graph
            .ancestors(&input.element.id)
            .filter_map(|ancestor| input.primary_of(ancestor))
            .find(|parsed| self.root.matches(parsed))?;

        if self.gates.child_group_requires_shared_type_prefix
            && root.type_token() != primary.type_token()
        {
            return None;
        }

        Some(
            RoleDetectionResult::new(ElementRole::ChildGroup, GROUP_SIGNAL)
                .because(format!("'{}' groups children of '{}'", primary.raw(), root.raw())),
        )
    }
}

// =============================================================================
// Style-derived Layout
// =============================================================================

/// Elements whose classes set a flex or grid display
#[derive(Debug, Clone, Default)]
pub struct LayoutStyleDetector;

impl RoleDetector for LayoutStyleDetector {
    fn name(&self) -> &str {
        "layout-style"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> Option<RoleDetectionResult> {
        input.element.classes.iter().find_map(|class| {
            let display = input.styles.property_str(class, "display")?;
            matches!(display, "flex" | "grid" | "inline-flex" | "inline-grid").then(|| {
                RoleDetectionResult::new(ElementRole::Layout, STYLE_SIGNAL)
                    .because(format!("'{}' sets display: {}", class, display))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::graph::ElementGraph;
    use crate::styles::{StyleDefinition, StylePropertiesContext};
    use std::sync::Arc;

    fn detect(
        detector: &dyn RoleDetector,
        graph: &ElementGraph,
        styles: &StylePropertiesContext,
        id: &str,
    ) -> Option<RoleDetectionResult> {
        let grammar = GrammarAdapter::lumos();
        let element = graph.get(id).unwrap();
        let primary = grammar.first_custom(&element.classes);
        detector.detect(&DetectionInput {
            element,
            graph,
            grammar: &grammar,
            styles,
            primary: primary.as_ref(),
        })
    }

    fn lumos_page() -> ElementGraph {
        ElementGraph::from_elements(vec![
            ElementSnapshot::new("container", "div").with_classes(["u-container"]),
            ElementSnapshot::new("loose", "div").with_classes(["hero_wrap"]),
            ElementSnapshot::new("root", "div")
                .with_classes(["card_wrap"])
                .with_parent("container"),
            ElementSnapshot::new("group", "div")
                .with_classes(["card_content_wrap"])
                .with_parent("root"),
            ElementSnapshot::new("foreign", "div")
                .with_classes(["promo_content_wrap"])
                .with_parent("root"),
            ElementSnapshot::new("orphan", "div").with_classes(["card_body_wrap"]),
        ])
    }

    fn root_detector(gates: DetectorGates) -> ComponentRootDetector {
        ComponentRootDetector::new(
            RootNaming::new(["wrap"]).with_exact_tokens(2),
            ContainerMatcher::new(["contain", "container"], ["u-container"]),
            gates,
        )
    }

    #[test]
    fn test_root_naming() {
        let g = GrammarAdapter::lumos();
        let naming = RootNaming::new(["wrap"]).with_exact_tokens(2);
        assert!(naming.matches(&g.parse("card_wrap")));
        assert!(!naming.matches(&g.parse("card_body_wrap")));
        assert!(!naming.matches(&g.parse("wrap")));
        assert!(!naming.matches(&g.parse("u-wrap")));
    }

    #[test]
    fn test_component_root_without_gate() {
        let graph = lumos_page();
        let styles = StylePropertiesContext::empty();
        let detector = root_detector(DetectorGates::default());
        assert!(detect(&detector, &graph, &styles, "loose").is_some());
        assert!(detect(&detector, &graph, &styles, "root").is_some());
    }

    #[test]
    fn test_component_root_parent_container_gate() {
        let graph = lumos_page();
        let styles = StylePropertiesContext::empty();
        let detector = root_detector(DetectorGates {
            require_direct_parent_container_for_root: true,
            ..Default::default()
        });
        assert!(detect(&detector, &graph, &styles, "loose").is_none());
        let hit = detect(&detector, &graph, &styles, "root").unwrap();
        assert_eq!(hit.role, ElementRole::ComponentRoot);
    }

    #[test]
    fn test_child_group_needs_root_ancestor() {
        let graph = lumos_page();
        let styles = StylePropertiesContext::empty();
        let detector = ChildGroupDetector::new(
            ["wrap"],
            RootNaming::new(["wrap"]).with_exact_tokens(2),
            DetectorGates::default(),
        );
        assert!(detect(&detector, &graph, &styles, "group").is_some());
        assert!(detect(&detector, &graph, &styles, "foreign").is_some());
        assert!(detect(&detector, &graph, &styles, "orphan").is_none());
        assert!(detect(&detector, &graph, &styles, "root").is_none());
    }

    #[test]
    fn test_child_group_shared_prefix_gate() {
        let graph = lumos_page();
        let styles = StylePropertiesContext::empty();
        let detector = ChildGroupDetector::new(
            ["wrap"],
            RootNaming::new(["wrap"]).with_exact_tokens(2),
            DetectorGates {
                child_group_requires_shared_type_prefix: true,
                ..Default::default()
            },
        );
        assert!(detect(&detector, &graph, &styles, "group").is_some());
        assert!(detect(&detector, &graph, &styles, "foreign").is_none());
    }

    #[test]
    fn test_token_detector_tail_head_and_tag() {
        let graph = ElementGraph::from_elements(vec![
            ElementSnapshot::new("t", "div").with_classes(["card_title"]),
            ElementSnapshot::new("s", "div").with_classes(["section_hero"]),
            ElementSnapshot::new("h", "h2"),
            ElementSnapshot::new("x", "div").with_classes(["card_body"]),
        ]);
        let styles = StylePropertiesContext::empty();

        let title = TokenDetector::naming(ElementRole::Title)
            .tails(["title", "heading"])
            .tags(["h1", "h2", "h3"]);
        assert_eq!(detect(&title, &graph, &styles, "t").unwrap().score, NAMING_SIGNAL);
        assert_eq!(detect(&title, &graph, &styles, "h").unwrap().score, TAG_SIGNAL);
        assert!(detect(&title, &graph, &styles, "x").is_none());

        let section = TokenDetector::new(ElementRole::Section, STRONG_SIGNAL).heads(["section"]);
        assert!(detect(&section, &graph, &styles, "s").is_some());
        assert!(detect(&section, &graph, &styles, "t").is_none());
    }

    #[test]
    fn test_main_detector() {
        let graph = ElementGraph::from_elements(vec![
            ElementSnapshot::new("tag", "MAIN"),
            ElementSnapshot::new("named", "div").with_classes(["page_main"]),
            ElementSnapshot::new("utility", "div").with_classes(["main-wrapper"]),
            ElementSnapshot::new("none", "div").with_classes(["main"]),
        ]);
        let styles = StylePropertiesContext::empty();
        let detector = MainDetector::new(["main"], ["main-wrapper"]);
        assert!(detect(&detector, &graph, &styles, "tag").is_some());
        assert!(detect(&detector, &graph, &styles, "named").is_some());
        assert!(detect(&detector, &graph, &styles, "utility").is_some());
        assert!(detect(&detector, &graph, &styles, "none").is_none());
    }

    #[test]
    fn test_layout_style_detector() {
        let graph = ElementGraph::from_elements(vec![
            ElementSnapshot::new("g", "div").with_classes(["cards_list"]),
            ElementSnapshot::new("b", "div").with_classes(["cards_item"]),
        ]);
        let styles = StylePropertiesContext::new(Arc::new(vec![
            StyleDefinition::new("cards_list").with_property("display", "grid"),
            StyleDefinition::new("cards_item").with_property("display", "block"),
        ]));
        let hit = detect(&LayoutStyleDetector, &graph, &styles, "g").unwrap();
        assert_eq!(hit.role, ElementRole::Layout);
        assert!(detect(&LayoutStyleDetector, &graph, &styles, "b").is_none());
    }
}
