//! Rule Model
//!
//! Rules are a closed set of shapes. The runner matches on the variant
//! instead of probing for optional hooks:
//!
//! - [`NamingRule`]: one class name, cheap `test` then `evaluate` on failure
//! - [`PropertyRule`]: one class name plus its resolved CSS properties
//! - [`StructureRule`]: one element with its classes and role
//! - [`PageRule`]: the whole page with every role assignment

pub mod naming;
pub mod opinion;
pub mod page;
pub mod property;
pub mod registry;
pub mod structure;

pub use opinion::OpinionMode;
pub use registry::{
    ActiveRule, ConfigurationDocument, RuleConfiguration, RuleConfigurationPatch, RuleRegistry,
};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::analyzer::{ElementGraph, RoleMap};
use crate::grammar::GrammarAdapter;
use crate::styles::{Properties, StylePropertiesContext};
use crate::types::{
    ClassKind, ElementRole, ElementSnapshot, Fix, ParsedClass, Result, RuleCategory, Severity,
};

// =============================================================================
// Metadata
// =============================================================================

/// Static description of a rule and its defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMeta {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: RuleCategory,
    pub severity: Severity,
    pub enabled: bool,
    /// Class kinds a naming/property rule applies to. Ignored by structure
    /// and page rules.
    pub target_class_types: Vec<ClassKind>,
}

impl RuleMeta {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: RuleCategory,
        severity: Severity,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category,
            severity,
            enabled: true,
            target_class_types: ClassKind::ALL.to_vec(),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn targets(mut self, kinds: &[ClassKind]) -> Self {
        self.target_class_types = kinds.to_vec();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn applies_to(&self, kind: ClassKind) -> bool {
        self.target_class_types.contains(&kind)
    }
}

// =============================================================================
// Findings
// =============================================================================

/// What a rule reports. The runner turns findings into
/// [`RuleResult`](crate::types::RuleResult)s with the effective severity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Finding {
    pub message: String,
    /// Defaults to the class being checked, if any
    pub class_name: Option<String>,
    /// Defaults to the element being checked, if any
    pub element_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub fix: Option<Fix>,
}

impl Finding {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn on_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn on_element(mut self, element_id: impl Into<String>) -> Self {
        self.element_id = Some(element_id.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }
}

// =============================================================================
// Contexts
// =============================================================================

/// Custom settings of one rule, from its configuration
#[derive(Debug, Clone, Copy)]
pub struct RuleSettings<'a> {
    values: Option<&'a serde_json::Map<String, serde_json::Value>>,
}

impl<'a> RuleSettings<'a> {
    pub fn new(values: &'a serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            values: Some(values),
        }
    }

    pub fn none() -> Self {
        Self { values: None }
    }

    pub fn get(&self, key: &str) -> Option<&'a serde_json::Value> {
        self.values?.get(key)
    }

    pub fn u64_or(&self, key: &str, default: u64) -> u64 {
        self.get(key).and_then(|v| v.as_u64()).unwrap_or(default)
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
    }
}

/// Shared inputs for property rules; built once per run
pub struct PropertyContext<'a> {
    pub grammar: &'a GrammarAdapter,
    pub styles: &'a StylePropertiesContext,
    pub parsed: &'a ParsedClass,
    pub settings: RuleSettings<'a>,
}

/// Inputs for element-level rules.
///
/// Graph and role lookups return `None` when that context is unavailable;
/// rules must then skip rather than guess.
pub struct ElementContext<'a> {
    pub grammar: &'a GrammarAdapter,
    pub styles: &'a StylePropertiesContext,
    /// Every class applied to the element, parsed, in application order
    pub classes: &'a [ParsedClass],
    pub settings: RuleSettings<'a>,
    pub(crate) graph: Option<&'a ElementGraph>,
    pub(crate) roles: Option<&'a RoleMap>,
}

impl<'a> ElementContext<'a> {
    pub fn role_for(&self, element_id: &str) -> Option<ElementRole> {
        self.roles?.get(element_id).map(|a| a.role)
    }

    pub fn parent_id(&self, element_id: &str) -> Option<&'a str> {
        self.graph?.parent_id(element_id)
    }

    pub fn tag_of(&self, element_id: &str) -> Option<String> {
        self.graph?.get(element_id).map(ElementSnapshot::tag)
    }

    pub fn element(&self, element_id: &str) -> Option<&'a ElementSnapshot> {
        self.graph?.get(element_id)
    }
}

/// Inputs for page-level rules
pub struct PageContext<'a> {
    pub grammar: &'a GrammarAdapter,
    pub graph: &'a ElementGraph,
    pub roles: &'a RoleMap,
    pub settings: RuleSettings<'a>,
}

impl<'a> PageContext<'a> {
    pub fn role_for(&self, element_id: &str) -> ElementRole {
        self.roles
            .get(element_id)
            .map(|a| a.role)
            .unwrap_or_default()
    }

    /// Elements with `role`, in document order
    pub fn elements_with_role(&self, role: ElementRole) -> Vec<&'a ElementSnapshot> {
        let roles = self.roles;
        self.graph
            .elements()
            .iter()
            .filter(|e| roles.get(&e.id).is_some_and(|a| a.role == role))
            .collect()
    }
}

// =============================================================================
// Rule Shapes
// =============================================================================

pub trait NamingRule: Send + Sync {
    fn meta(&self) -> &RuleMeta;

    /// Fast check; `true` means the name passes
    fn test(&self, class_name: &str, parsed: &ParsedClass) -> bool;

    /// Build the violation for a name that failed `test`
    fn evaluate(&self, class_name: &str, parsed: &ParsedClass) -> Result<Option<Finding>>;
}

pub trait PropertyRule: Send + Sync {
    fn meta(&self) -> &RuleMeta;

    fn analyze(
        &self,
        class_name: &str,
        properties: &Properties,
        context: &PropertyContext<'_>,
    ) -> Result<Vec<Finding>>;
}

pub trait StructureRule: Send + Sync {
    fn meta(&self) -> &RuleMeta;

    fn analyze_element(
        &self,
        element: &ElementSnapshot,
        context: &ElementContext<'_>,
    ) -> Result<Vec<Finding>>;
}

pub trait PageRule: Send + Sync {
    fn meta(&self) -> &RuleMeta;

    fn analyze_page(&self, context: &PageContext<'_>) -> Result<Vec<Finding>>;
}

/// Rule kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Naming,
    Property,
    Structure,
    Page,
}

impl std::fmt::Display for RuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleType::Naming => write!(f, "naming"),
            RuleType::Property => write!(f, "property"),
            RuleType::Structure => write!(f, "structure"),
            RuleType::Page => write!(f, "page"),
        }
    }
}

/// A registered rule
#[derive(Clone)]
pub enum Rule {
    Naming(Arc<dyn NamingRule>),
    Property(Arc<dyn PropertyRule>),
    Structure(Arc<dyn StructureRule>),
    Page(Arc<dyn PageRule>),
}

impl Rule {
    pub fn naming(rule: impl NamingRule + 'static) -> Self {
        Self::Naming(Arc::new(rule))
    }

    pub fn property(rule: impl PropertyRule + 'static) -> Self {
        Self::Property(Arc::new(rule))
    }

    pub fn structure(rule: impl StructureRule + 'static) -> Self {
        Self::Structure(Arc::new(rule))
    }

    pub fn page(rule: impl PageRule + 'static) -> Self {
        Self::Page(Arc::new(rule))
    }

    pub fn meta(&self) -> &RuleMeta {
        match self {
            Rule::Naming(r) => r.meta(),
            Rule::Property(r) => r.meta(),
            Rule::Structure(r) => r.meta(),
            Rule::Page(r) => r.meta(),
        }
    }

    pub fn id(&self) -> &str {
        &self.meta().id
    }

    pub fn rule_type(&self) -> RuleType {
        match self {
            Rule::Naming(_) => RuleType::Naming,
            Rule::Property(_) => RuleType::Property,
            Rule::Structure(_) => RuleType::Structure,
            Rule::Page(_) => RuleType::Page,
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("type", &self.rule_type())
            .field("id", &self.id())
            .finish()
    }
}
