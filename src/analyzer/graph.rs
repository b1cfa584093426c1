//! Element Graph
//!
//! Parent/children/ancestor lookups over one page snapshot. Built in a single
//! linear pass; lookups are O(1) afterwards.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::types::ElementSnapshot;

/// Structural index over a flat element list
#[derive(Debug, Clone, Default)]
pub struct ElementGraph {
    elements: Vec<ElementSnapshot>,
    index: HashMap<String, usize>,
    parents: HashMap<String, String>,
    children: HashMap<String, Vec<String>>,
}

impl ElementGraph {
    /// Build from elements plus an explicit parent map (`child -> parent`).
    ///
    /// Children lists follow element order, so traversal is deterministic.
    pub fn build(
        elements: Vec<ElementSnapshot>,
        parent_map: &HashMap<String, Option<String>>,
    ) -> Self {
        let mut index = HashMap::with_capacity(elements.len());
        let mut parents = HashMap::with_capacity(elements.len());
        let mut children: HashMap<String, Vec<String>> = HashMap::new();

        for (i, element) in elements.iter().enumerate() {
            index.insert(element.id.clone(), i);
        }

        for element in &elements {
            if let Some(Some(parent)) = parent_map.get(&element.id) {
                parents.insert(element.id.clone(), parent.clone());
                children
                    .entry(parent.clone())
                    .or_default()
                    .push(element.id.clone());
            }
        }

        Self {
            elements,
            index,
            parents,
            children,
        }
    }

    /// Build using each snapshot's own `parent_id`
    pub fn from_elements(elements: Vec<ElementSnapshot>) -> Self {
        let parent_map: HashMap<String, Option<String>> = elements
            .iter()
            .map(|e| (e.id.clone(), e.parent_id.clone()))
            .collect();
        Self::build(elements, &parent_map)
    }

    pub fn elements(&self) -> &[ElementSnapshot] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ElementSnapshot> {
        self.index.get(id).map(|&i| &self.elements[i])
    }

    pub fn parent_id(&self, id: &str) -> Option<&str> {
        self.parents.get(id).map(String::as_str)
    }

    pub fn parent(&self, id: &str) -> Option<&ElementSnapshot> {
        self.parent_id(id).and_then(|p| self.get(p))
    }

    pub fn children_ids(&self, id: &str) -> &[String] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn children(&self, id: &str) -> impl Iterator<Item = &ElementSnapshot> {
        self.children_ids(id).iter().filter_map(|c| self.get(c))
    }

    /// Nearest-first ancestor chain.
    ///
    /// Stops at the first missing parent, or when an id would repeat. A cycle
    /// yields the truncated chain and a warning, never an endless walk.
    pub fn ancestor_ids(&self, id: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(id.to_string());

        let mut current = id;
        while let Some(parent) = self.parent_id(current) {
            if !seen.insert(parent.to_string()) {
                warn!(element_id = id, at = parent, "Cycle in element graph, truncating ancestors");
                break;
            }
            chain.push(parent.to_string());
            current = parent;
        }

        chain
    }

    pub fn ancestors(&self, id: &str) -> impl Iterator<Item = &ElementSnapshot> {
        self.ancestor_ids(id)
            .into_iter()
            .filter_map(move |a| self.get(&a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> ElementGraph {
        ElementGraph::from_elements(vec![
            ElementSnapshot::new("root", "body"),
            ElementSnapshot::new("main", "main").with_parent("root"),
            ElementSnapshot::new("a", "section").with_parent("main"),
            ElementSnapshot::new("b", "div").with_parent("main"),
            ElementSnapshot::new("c", "div").with_parent("a"),
        ])
    }

    #[test]
    fn test_parent_and_children() {
        let graph = page();
        assert_eq!(graph.parent_id("a"), Some("main"));
        assert_eq!(graph.parent_id("root"), None);
        assert_eq!(graph.children_ids("main"), ["a", "b"]);
        assert!(graph.children_ids("c").is_empty());
        assert!(graph.children_ids("missing").is_empty());
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let graph = page();
        assert_eq!(graph.ancestor_ids("c"), vec!["a", "main", "root"]);
        assert!(graph.ancestor_ids("root").is_empty());
    }

    #[test]
    fn test_explicit_parent_map_wins() {
        let elements = vec![
            ElementSnapshot::new("x", "div").with_parent("ignored"),
            ElementSnapshot::new("y", "div"),
        ];
        let mut map = HashMap::new();
        map.insert("x".to_string(), Some("y".to_string()));
        map.insert("y".to_string(), None);
        let graph = ElementGraph::build(elements, &map);
        assert_eq!(graph.parent_id("x"), Some("y"));
        assert_eq!(graph.children_ids("y"), ["x"]);
    }

    #[test]
    fn test_cycle_terminates_with_partial_chain() {
        let graph = ElementGraph::from_elements(vec![
            ElementSnapshot::new("a", "div").with_parent("b"),
            ElementSnapshot::new("b", "div").with_parent("c"),
            ElementSnapshot::new("c", "div").with_parent("a"),
        ]);
        assert_eq!(graph.ancestor_ids("a"), vec!["b", "c"]);
    }

    #[test]
    fn test_self_parent() {
        let graph =
            ElementGraph::from_elements(vec![ElementSnapshot::new("a", "div").with_parent("a")]);
        assert!(graph.ancestor_ids("a").is_empty());
    }
}
