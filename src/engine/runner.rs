//! Rule Execution Pipeline
//!
//! Runs the enabled rules of one scan in three passes:
//!
//! 1. class level: every applied class of every element, naming then property
//!    rules in registration order, filtered by target kind
//! 2. element level: structure rules once per element
//! 3. page level: page rules once per scan
//!
//! Results keep that order (element order x class order x rule order). A rule
//! that errors or panics is logged and contributes nothing.

use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::{debug, warn};

use crate::analyzer::{ElementGraph, RoleMap};
use crate::grammar::GrammarAdapter;
use crate::rules::{ActiveRule, ElementContext, Finding, PageContext, PropertyContext, Rule};
use crate::styles::StylePropertiesContext;
use crate::types::{ClassKind, ElementSnapshot, ParsedClass, Result, RuleResult};

/// Everything one scan's rules read; built once and shared by every rule
pub struct RuleRunner<'a> {
    grammar: &'a GrammarAdapter,
    rules: &'a [ActiveRule],
    graph: &'a ElementGraph,
    roles: &'a RoleMap,
    styles: &'a StylePropertiesContext,
}

/// Where a rule invocation happened, for logs and result defaults
#[derive(Clone, Copy, Default)]
struct Site<'s> {
    element_id: Option<&'s str>,
    class_name: Option<&'s str>,
}

impl<'a> RuleRunner<'a> {
    pub fn new(
        grammar: &'a GrammarAdapter,
        rules: &'a [ActiveRule],
        graph: &'a ElementGraph,
        roles: &'a RoleMap,
        styles: &'a StylePropertiesContext,
    ) -> Self {
        Self {
            grammar,
            rules,
            graph,
            roles,
            styles,
        }
    }

    /// Full page: class, element and page passes
    pub fn run_page(&self) -> Vec<RuleResult> {
        let elements = self.graph.elements();
        let mut results = self.run_class_rules(elements);
        results.extend(self.run_element_rules(elements));
        results.extend(self.run_page_rules());
        debug!(
            elements = elements.len(),
            rules = self.rules.len(),
            violations = results.len(),
            "Page scan complete"
        );
        results
    }

    /// One element: class and element passes only
    pub fn run_element(&self, element: &ElementSnapshot) -> Vec<RuleResult> {
        let scope = std::slice::from_ref(element);
        let mut results = self.run_class_rules(scope);
        results.extend(self.run_element_rules(scope));
        results
    }

    // =========================================================================
    // Passes
    // =========================================================================

    pub fn run_class_rules(&self, elements: &[ElementSnapshot]) -> Vec<RuleResult> {
        let mut results = Vec::new();

        for element in elements {
            for class_name in &element.classes {
                let parsed = self.grammar.parse(class_name);
                let site = Site {
                    element_id: Some(&element.id),
                    class_name: Some(class_name),
                };

                for active in self.rules {
                    if !active.rule.meta().applies_to(parsed.kind()) {
                        continue;
                    }
                    let findings = match &active.rule {
                        Rule::Naming(rule) => self.guarded(active, site, || {
                            if rule.test(class_name, &parsed) {
                                return Ok(Vec::new());
                            }
                            Ok(rule.evaluate(class_name, &parsed)?.into_iter().collect())
                        }),
                        Rule::Property(rule) => {
                            // classes without a site style definition have no properties to check
                            let Some(properties) = self.styles.properties_for(class_name) else {
                                continue;
                            };
                            let context = PropertyContext {
                                grammar: self.grammar,
                                styles: self.styles,
                                parsed: &parsed,
                                settings: active.settings(),
                            };
                            self.guarded(active, site, || {
                                rule.analyze(class_name, properties, &context)
                            })
                        }
                        Rule::Structure(_) | Rule::Page(_) => continue,
                    };
                    results.extend(self.to_results(active, site, findings));
                }
            }
        }

        results
    }

    pub fn run_element_rules(&self, elements: &[ElementSnapshot]) -> Vec<RuleResult> {
        let mut results = Vec::new();

        for element in elements {
            let classes: Vec<ParsedClass> = element
                .classes
                .iter()
                .map(|class| self.grammar.parse(class))
                .collect();
            let site = Site {
                element_id: Some(&element.id),
                class_name: None,
            };

            for active in self.rules {
                let Rule::Structure(rule) = &active.rule else {
                    continue;
                };
                let context = ElementContext {
                    grammar: self.grammar,
                    styles: self.styles,
                    classes: &classes,
                    settings: active.settings(),
                    graph: Some(self.graph),
                    roles: Some(self.roles),
                };
                let findings =
                    self.guarded(active, site, || rule.analyze_element(element, &context));
                results.extend(self.to_results(active, site, findings));
            }
        }

        results
    }

    pub fn run_page_rules(&self) -> Vec<RuleResult> {
        let mut results = Vec::new();

        for active in self.rules {
            let Rule::Page(rule) = &active.rule else {
                continue;
            };
            let context = PageContext {
                grammar: self.grammar,
                graph: self.graph,
                roles: self.roles,
                settings: active.settings(),
            };
            let site = Site::default();
            let findings = self.guarded(active, site, || rule.analyze_page(&context));
            results.extend(self.to_results(active, site, findings));
        }

        results
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Run one rule invocation; errors and panics yield no findings
    fn guarded<F>(&self, active: &ActiveRule, site: Site<'_>, invoke: F) -> Vec<Finding>
    where
        F: FnOnce() -> Result<Vec<Finding>>,
    {
        match catch_unwind(AssertUnwindSafe(invoke)) {
            Ok(Ok(findings)) => findings,
            Ok(Err(e)) => {
                warn!(
                    rule_id = %active.rule.id(),
                    element_id = site.element_id.unwrap_or_default(),
                    class_name = site.class_name.unwrap_or_default(),
                    error = %e,
                    "Rule failed, skipping"
                );
                Vec::new()
            }
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                warn!(
                    rule_id = %active.rule.id(),
                    element_id = site.element_id.unwrap_or_default(),
                    class_name = site.class_name.unwrap_or_default(),
                    panic = %message,
                    "Rule panicked, skipping"
                );
                Vec::new()
            }
        }
    }

    fn to_results(
        &self,
        active: &ActiveRule,
        site: Site<'_>,
        findings: Vec<Finding>,
    ) -> impl Iterator<Item = RuleResult> {
        let meta = active.rule.meta();
        let rule_id = meta.id.clone();
        let name = meta.name.clone();
        let severity = active.severity;
        let grammar = self.grammar;
        let default_element = site.element_id.map(str::to_string);
        let default_class = site.class_name.map(str::to_string);

        findings.into_iter().map(move |finding| {
            let class_name = finding
                .class_name
                .or_else(|| default_class.clone())
                .unwrap_or_default();
            let is_combo = !class_name.is_empty() && grammar.kind_of(&class_name) == ClassKind::Combo;
            RuleResult {
                rule_id: rule_id.clone(),
                name: name.clone(),
                message: finding.message,
                severity,
                element_id: finding.element_id.or_else(|| default_element.clone()),
                class_name,
                is_combo,
                metadata: finding.metadata,
                fix: finding.fix,
            }
        })
    }
}
