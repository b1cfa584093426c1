//! Role Classifier
//!
//! Assigns an [`ElementRole`] to each element by running every detector of
//! the active preset and keeping the highest score.
//!
//! - Detectors run in registration order; on equal scores the earlier one wins.
//! - A best score below `threshold` yields the fallback role (or `unknown`).
//! - Classification is a pure function of the element, the page graph and the
//!   style context, so identical inputs always give identical roles.

mod detectors;

pub use detectors::{
    ChildGroupDetector, ComponentRootDetector, ContainerMatcher, LayoutStyleDetector,
    MainDetector, RootNaming, TokenDetector,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use super::graph::ElementGraph;
use crate::constants::roles::DEFAULT_THRESHOLD;
use crate::grammar::GrammarAdapter;
use crate::styles::StylePropertiesContext;
use crate::types::{ElementRole, ElementSnapshot, ParsedClass, RoleDetectionResult};

/// Everything a detector may look at for one element
pub struct DetectionInput<'a> {
    pub element: &'a ElementSnapshot,
    pub graph: &'a ElementGraph,
    pub grammar: &'a GrammarAdapter,
    pub styles: &'a StylePropertiesContext,
    /// First custom class on the element, parsed
    pub primary: Option<&'a ParsedClass>,
}

impl DetectionInput<'_> {
    /// First custom class of another element (parent, ancestor)
    pub fn primary_of(&self, element: &ElementSnapshot) -> Option<ParsedClass> {
        self.grammar.first_custom(&element.classes)
    }
}

/// One role heuristic. Returns `None` when it has no opinion.
pub trait RoleDetector: Send + Sync {
    fn name(&self) -> &str;

    fn detect(&self, input: &DetectionInput<'_>) -> Option<RoleDetectionResult>;
}

/// Ordered detector list; order is part of the preset definition
pub type DetectorList = Vec<Arc<dyn RoleDetector>>;

/// Threshold and fallback for role selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoleDetectionConfig {
    pub threshold: f64,
    pub fallback_role: Option<ElementRole>,
}

impl Default for RoleDetectionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            fallback_role: None,
        }
    }
}

/// Structural gates applied when detectors are constructed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectorGates {
    /// Component roots must sit directly inside a container
    pub require_direct_parent_container_for_root: bool,
    /// Child groups must share their nearest root's type token
    pub child_group_requires_shared_type_prefix: bool,
}

/// Final role of one element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub role: ElementRole,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl RoleAssignment {
    fn fallback(role: ElementRole) -> Self {
        Self {
            role,
            score: 0.0,
            detector: None,
            reasoning: None,
        }
    }
}

/// Element id -> assigned role, ordered by id
pub type RoleMap = BTreeMap<String, RoleAssignment>;

/// Count of elements per role
pub fn role_histogram(roles: &RoleMap) -> BTreeMap<ElementRole, usize> {
    let mut histogram = BTreeMap::new();
    for assignment in roles.values() {
        *histogram.entry(assignment.role).or_insert(0) += 1;
    }
    histogram
}

/// Runs a preset's detectors over elements
pub struct RoleClassifier<'a> {
    grammar: &'a GrammarAdapter,
    detectors: &'a [Arc<dyn RoleDetector>],
    config: &'a RoleDetectionConfig,
}

impl<'a> RoleClassifier<'a> {
    pub fn new(
        grammar: &'a GrammarAdapter,
        detectors: &'a [Arc<dyn RoleDetector>],
        config: &'a RoleDetectionConfig,
    ) -> Self {
        Self {
            grammar,
            detectors,
            config,
        }
    }

    /// All non-empty detector results for an element, in registration order
    pub fn detect_all(
        &self,
        element: &ElementSnapshot,
        graph: &ElementGraph,
        styles: &StylePropertiesContext,
    ) -> Vec<(String, RoleDetectionResult)> {
        let primary = self.grammar.first_custom(&element.classes);
        let input = DetectionInput {
            element,
            graph,
            grammar: self.grammar,
            styles,
            primary: primary.as_ref(),
        };

        self.detectors
            .iter()
            .filter_map(|d| d.detect(&input).map(|r| (d.name().to_string(), r)))
            .collect()
    }

    pub fn classify(
        &self,
        element: &ElementSnapshot,
        graph: &ElementGraph,
        styles: &StylePropertiesContext,
    ) -> RoleAssignment {
        let mut best: Option<(String, RoleDetectionResult)> = None;

        for (name, result) in self.detect_all(element, graph, styles) {
            // strict comparison keeps the earliest detector on ties
            if best.as_ref().is_none_or(|(_, b)| result.score > b.score) {
                best = Some((name, result));
            }
        }

        let fallback = self.config.fallback_role.unwrap_or(ElementRole::Unknown);
        match best {
            Some((name, result)) if result.score >= self.config.threshold => RoleAssignment {
                role: result.role,
                score: result.score,
                detector: Some(name),
                reasoning: result.reasoning,
            },
            Some((name, result)) => {
                debug!(
                    element_id = %element.id,
                    detector = %name,
                    score = result.score,
                    threshold = self.config.threshold,
                    "Best role score below threshold"
                );
                RoleAssignment::fallback(fallback)
            }
            None => RoleAssignment::fallback(fallback),
        }
    }

    pub fn classify_all(&self, graph: &ElementGraph, styles: &StylePropertiesContext) -> RoleMap {
        graph
            .elements()
            .iter()
            .map(|e| (e.id.clone(), self.classify(e, graph, styles)))
            .collect()
    }
}
