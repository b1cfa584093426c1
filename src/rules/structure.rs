//! Structure rules: checks on one element's class list and its place in the page.

use serde_json::json;
use std::collections::HashSet;

use super::{ElementContext, Finding, RuleMeta, StructureRule};
use crate::types::{ClassKind, ElementRole, ElementSnapshot, Fix, ParsedClass, Result};

fn of_kind<'a>(classes: &'a [ParsedClass], kind: ClassKind) -> impl Iterator<Item = &'a ParsedClass> {
    classes.iter().filter(move |c| c.kind() == kind)
}

// =============================================================================
// Class Mix
// =============================================================================

/// Utility classes on a component root belong on its children
pub struct UtilityOnComponentRootRule {
    meta: RuleMeta,
}

impl UtilityOnComponentRootRule {
    pub fn new(meta: RuleMeta) -> Self {
        Self { meta }
    }
}

impl StructureRule for UtilityOnComponentRootRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn analyze_element(
        &self,
        element: &ElementSnapshot,
        context: &ElementContext<'_>,
    ) -> Result<Vec<Finding>> {
        if context.role_for(&element.id) != Some(ElementRole::ComponentRoot) {
            return Ok(Vec::new());
        }

        Ok(of_kind(context.classes, ClassKind::Utility)
            .map(|utility| {
                Finding::new(format!(
                    "Utility class '{}' is applied to a component root",
                    utility.raw()
                ))
                .on_class(utility.raw())
                .with_fix(Fix::advice(
                    "Move the style into the component's custom class",
                ))
            })
            .collect())
    }
}

/// A combo class modifies a base class and needs one on the same element
pub struct ComboWithoutBaseRule {
    meta: RuleMeta,
}

impl ComboWithoutBaseRule {
    pub fn new(meta: RuleMeta) -> Self {
        Self { meta }
    }
}

impl StructureRule for ComboWithoutBaseRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn analyze_element(
        &self,
        _element: &ElementSnapshot,
        context: &ElementContext<'_>,
    ) -> Result<Vec<Finding>> {
        let has_base = context
            .classes
            .iter()
            .any(|c| matches!(c.kind(), ClassKind::Custom | ClassKind::Component));
        if has_base {
            return Ok(Vec::new());
        }

        Ok(of_kind(context.classes, ClassKind::Combo)
            .map(|combo| {
                Finding::new(format!(
                    "Combo class '{}' has no base class to modify",
                    combo.raw()
                ))
                .on_class(combo.raw())
            })
            .collect())
    }
}

/// One custom class per element; the rest should be combos or utilities
pub struct MultipleCustomClassesRule {
    meta: RuleMeta,
}

impl MultipleCustomClassesRule {
    pub fn new(meta: RuleMeta) -> Self {
        Self { meta }
    }
}

impl StructureRule for MultipleCustomClassesRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn analyze_element(
        &self,
        _element: &ElementSnapshot,
        context: &ElementContext<'_>,
    ) -> Result<Vec<Finding>> {
        let customs: Vec<&ParsedClass> = of_kind(context.classes, ClassKind::Custom).collect();
        let Some((first, extra)) = customs.split_first() else {
            return Ok(Vec::new());
        };

        Ok(extra
            .iter()
            .map(|class| {
                Finding::new(format!(
                    "'{}' is a second custom class next to '{}'",
                    class.raw(),
                    first.raw()
                ))
                .on_class(class.raw())
                .with_metadata(json!({ "primary": first.raw() }))
            })
            .collect())
    }
}

/// The custom class must come first when the grammar requires it
pub struct CustomFirstRule {
    meta: RuleMeta,
}

impl CustomFirstRule {
    pub fn new(meta: RuleMeta) -> Self {
        Self { meta }
    }
}

impl StructureRule for CustomFirstRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn analyze_element(
        &self,
        _element: &ElementSnapshot,
        context: &ElementContext<'_>,
    ) -> Result<Vec<Finding>> {
        if !context.grammar.requires_custom_first() {
            return Ok(Vec::new());
        }
        let Some(first) = context.classes.first() else {
            return Ok(Vec::new());
        };
        if first.is_custom() {
            return Ok(Vec::new());
        }
        let Some(custom) = context.classes.iter().find(|c| c.is_custom()) else {
            return Ok(Vec::new());
        };

        Ok(vec![
            Finding::new(format!(
                "'{}' is applied before custom class '{}'",
                first.raw(),
                custom.raw()
            ))
            .on_class(first.raw())
            .with_fix(Fix::advice(format!("Apply '{}' first", custom.raw()))),
        ])
    }
}

// =============================================================================
// Hierarchy
// =============================================================================

/// Child groups share the type token of their component root
pub struct ChildGroupPrefixRule {
    meta: RuleMeta,
}

impl ChildGroupPrefixRule {
    pub fn new(meta: RuleMeta) -> Self {
        Self { meta }
    }

    fn nearest_root<'a>(
        element: &ElementSnapshot,
        context: &ElementContext<'a>,
    ) -> Option<&'a ElementSnapshot> {
        let mut seen = HashSet::new();
        let mut current = context.parent_id(&element.id)?;
        loop {
            if !seen.insert(current) {
                return None;
            }
            if context.role_for(current) == Some(ElementRole::ComponentRoot) {
                return context.element(current);
            }
            current = context.parent_id(current)?;
        }
    }
}

impl StructureRule for ChildGroupPrefixRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn analyze_element(
        &self,
        element: &ElementSnapshot,
        context: &ElementContext<'_>,
    ) -> Result<Vec<Finding>> {
        if context.role_for(&element.id) != Some(ElementRole::ChildGroup) {
            return Ok(Vec::new());
        }
        let Some(group) = context.classes.iter().find(|c| c.is_custom()) else {
            return Ok(Vec::new());
        };
        let Some(root) = Self::nearest_root(element, context) else {
            return Ok(Vec::new());
        };
        let Some(root_class) = context.grammar.first_custom(&root.classes) else {
            return Ok(Vec::new());
        };
        let (Some(group_type), Some(root_type)) = (group.type_token(), root_class.type_token())
        else {
            return Ok(Vec::new());
        };
        if group_type == root_type {
            return Ok(Vec::new());
        }

        let separator = context.grammar.separators()[0].to_string();
        let mut renamed = vec![root_type];
        renamed.extend(group.tokens().iter().skip(1).map(String::as_str));

        Ok(vec![
            Finding::new(format!(
                "'{}' does not share the '{}' prefix of its component '{}'",
                group.raw(),
                root_type,
                root_class.raw()
            ))
            .on_class(group.raw())
            .with_metadata(json!({ "rootElementId": root.id, "rootClass": root_class.raw() }))
            .with_fix(Fix::rename(renamed.join(&separator))),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{ElementGraph, RoleAssignment, RoleMap};
    use crate::grammar::GrammarAdapter;
    use crate::rules::RuleSettings;
    use crate::styles::StylePropertiesContext;
    use crate::types::{RuleCategory, Severity};

    fn meta(id: &str) -> RuleMeta {
        RuleMeta::new(id, id, RuleCategory::Structure, Severity::Warning)
    }

    fn assign(roles: &mut RoleMap, id: &str, role: ElementRole) {
        roles.insert(
            id.to_string(),
            RoleAssignment {
                role,
                score: 1.0,
                detector: None,
                reasoning: None,
            },
        );
    }

    fn run(
        rule: &dyn StructureRule,
        grammar: &GrammarAdapter,
        graph: &ElementGraph,
        roles: &RoleMap,
        id: &str,
    ) -> Vec<Finding> {
        let element = graph.get(id).unwrap();
        let classes: Vec<ParsedClass> = element.classes.iter().map(|c| grammar.parse(c)).collect();
        let styles = StylePropertiesContext::empty();
        let context = ElementContext {
            grammar,
            styles: &styles,
            classes: &classes,
            settings: RuleSettings::none(),
            graph: Some(graph),
            roles: Some(roles),
        };
        rule.analyze_element(element, &context).unwrap()
    }

    #[test]
    fn test_utility_on_component_root() {
        let g = GrammarAdapter::lumos();
        let graph = ElementGraph::from_elements(vec![
            ElementSnapshot::new("root", "div").with_classes(["card_wrap", "u-flex", "u-gap"]),
        ]);
        let rule = UtilityOnComponentRootRule::new(meta("r"));

        let mut roles = RoleMap::new();
        assert!(run(&rule, &g, &graph, &roles, "root").is_empty());

        assign(&mut roles, "root", ElementRole::ComponentRoot);
        let findings = run(&rule, &g, &graph, &roles, "root");
        let classes: Vec<_> = findings.iter().filter_map(|f| f.class_name.as_deref()).collect();
        assert_eq!(classes, ["u-flex", "u-gap"]);
    }

    #[test]
    fn test_combo_without_base() {
        let g = GrammarAdapter::lumos();
        let graph = ElementGraph::from_elements(vec![
            ElementSnapshot::new("a", "div").with_classes(["is-active"]),
            ElementSnapshot::new("b", "div").with_classes(["card_wrap", "is-active"]),
            ElementSnapshot::new("c", "div").with_classes(["c-button", "is-active"]),
        ]);
        let rule = ComboWithoutBaseRule::new(meta("r"));
        let roles = RoleMap::new();
        assert_eq!(run(&rule, &g, &graph, &roles, "a").len(), 1);
        assert!(run(&rule, &g, &graph, &roles, "b").is_empty());
        assert!(run(&rule, &g, &graph, &roles, "c").is_empty());
    }

    #[test]
    fn test_multiple_custom_classes() {
        let g = GrammarAdapter::lumos();
        let graph = ElementGraph::from_elements(vec![
            ElementSnapshot::new("a", "div").with_classes(["card_wrap", "hero_wrap", "u-flex"]),
        ]);
        let findings = run(
            &MultipleCustomClassesRule::new(meta("r")),
            &g,
            &graph,
            &RoleMap::new(),
            "a",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].class_name.as_deref(), Some("hero_wrap"));
    }

    #[test]
    fn test_custom_first_only_under_lumos() {
        let element = ElementSnapshot::new("a", "div").with_classes(["u-flex", "card_wrap"]);
        let graph = ElementGraph::from_elements(vec![element]);
        let rule = CustomFirstRule::new(meta("r"));
        let roles = RoleMap::new();

        let findings = run(&rule, &GrammarAdapter::lumos(), &graph, &roles, "a");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].class_name.as_deref(), Some("u-flex"));

        assert!(run(&rule, &GrammarAdapter::client_first(), &graph, &roles, "a").is_empty());
    }

    #[test]
    fn test_child_group_prefix() {
        let g = GrammarAdapter::lumos();
        let graph = ElementGraph::from_elements(vec![
            ElementSnapshot::new("root", "div").with_classes(["card_wrap"]),
            ElementSnapshot::new("mid", "div")
                .with_classes(["card_inner"])
                .with_parent("root"),
            ElementSnapshot::new("group", "div")
                .with_classes(["hero_content"])
                .with_parent("mid"),
        ]);
        let mut roles = RoleMap::new();
        assign(&mut roles, "root", ElementRole::ComponentRoot);
        assign(&mut roles, "group", ElementRole::ChildGroup);

        let findings = run(&ChildGroupPrefixRule::new(meta("r")), &g, &graph, &roles, "group");
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].fix.as_ref().unwrap().replacement.as_deref(),
            Some("card_content")
        );
    }

    #[test]
    fn test_child_group_without_root_is_skipped() {
        let g = GrammarAdapter::lumos();
        let graph = ElementGraph::from_elements(vec![
            ElementSnapshot::new("group", "div").with_classes(["hero_content"]),
        ]);
        let mut roles = RoleMap::new();
        assign(&mut roles, "group", ElementRole::ChildGroup);
        assert!(run(&ChildGroupPrefixRule::new(meta("r")), &g, &graph, &roles, "group").is_empty());
    }
}
