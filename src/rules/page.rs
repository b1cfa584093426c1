//! Page rules: checks across the whole role map.

use super::{Finding, PageContext, PageRule, RuleMeta};
use crate::types::{ElementRole, Fix, Result};

/// Exactly one `main` per page
pub struct MainSingletonRule {
    meta: RuleMeta,
}

impl MainSingletonRule {
    pub fn new(meta: RuleMeta) -> Self {
        Self { meta }
    }
}

impl PageRule for MainSingletonRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn analyze_page(&self, context: &PageContext<'_>) -> Result<Vec<Finding>> {
        let mains = context.elements_with_role(ElementRole::Main);
        let Some((first, extra)) = mains.split_first() else {
            return Ok(vec![
                Finding::new("Page has no main element")
                    .with_fix(Fix::advice("Wrap the page content in a single main element")),
            ]);
        };

        Ok(extra
            .iter()
            .map(|element| {
                Finding::new(format!(
                    "Additional main element; '{}' is already the page main",
                    first.id
                ))
                .on_element(&element.id)
            })
            .collect())
    }
}

/// `main` must directly contain a section or a component
pub struct MainHasContentRule {
    meta: RuleMeta,
}

impl MainHasContentRule {
    pub fn new(meta: RuleMeta) -> Self {
        Self { meta }
    }
}

impl PageRule for MainHasContentRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn analyze_page(&self, context: &PageContext<'_>) -> Result<Vec<Finding>> {
        Ok(context
            .elements_with_role(ElementRole::Main)
            .into_iter()
            .filter(|main| {
                !context.graph.children_ids(&main.id).iter().any(|child| {
                    matches!(
                        context.role_for(child),
                        ElementRole::Section | ElementRole::ComponentRoot
                    )
                })
            })
            .map(|main| {
                Finding::new("Main element has no section or component children")
                    .on_element(&main.id)
            })
            .collect())
    }
}
