//! Lint Engine
//!
//! Owns the active preset, its rule registry, the opinion mode and the style
//! cache. Configuration changes build a new [`ActiveState`] and swap it in
//! whole; scans take a snapshot of the state and never see a partial update.

pub mod report;
pub mod reporter;
pub mod runner;
pub mod selection;

pub use report::{ScanReport, ScanScope};
pub use reporter::Reporter;
pub use runner::RuleRunner;
pub use selection::{Selection, SelectionTracker, spawn_selection_scanner};

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use crate::analyzer::{ElementGraph, role_histogram};
use crate::preset::{Preset, PresetRegistry};
use crate::rules::{OpinionMode, RuleConfigurationPatch, RuleRegistry};
use crate::styles::{HostSource, InvalidationReason, StyleCache, StylePropertiesContext};
use crate::types::{ElementSnapshot, LintError, ParsedClass, Result};

/// Preset, rule configuration and mode that scans run against
#[derive(Debug, Clone)]
pub struct ActiveState {
    pub preset: Arc<Preset>,
    pub registry: RuleRegistry,
    pub mode: OpinionMode,
}

impl ActiveState {
    fn new(preset: Arc<Preset>, mode: OpinionMode) -> Self {
        let mut registry = RuleRegistry::with_rules(preset.rules.iter().cloned());
        mode.apply(&mut registry);
        Self {
            preset,
            registry,
            mode,
        }
    }
}

pub struct LintEngine {
    presets: PresetRegistry,
    source: Arc<dyn HostSource>,
    cache: StyleCache,
    state: RwLock<Arc<ActiveState>>,
}

impl LintEngine {
    /// Engine on the registry's default preset in balanced mode
    pub fn new(presets: PresetRegistry, source: Arc<dyn HostSource>) -> Result<Self> {
        let default_id = presets.default_id().to_string();
        Self::with_preset(presets, source, &default_id, OpinionMode::default())
    }

    pub fn with_preset(
        presets: PresetRegistry,
        source: Arc<dyn HostSource>,
        preset_id: &str,
        mode: OpinionMode,
    ) -> Result<Self> {
        let preset = presets.resolve(preset_id)?;
        info!(preset = %preset.id, %mode, rules = preset.rules.len(), "Lint engine ready");

        Ok(Self {
            presets,
            source,
            cache: StyleCache::new(),
            state: RwLock::new(Arc::new(ActiveState::new(preset, mode))),
        })
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn state(&self) -> Arc<ActiveState> {
        Arc::clone(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn preset(&self) -> Arc<Preset> {
        Arc::clone(&self.state().preset)
    }

    pub fn opinion_mode(&self) -> OpinionMode {
        self.state().mode
    }

    pub fn presets(&self) -> &PresetRegistry {
        &self.presets
    }

    pub fn cache(&self) -> &StyleCache {
        &self.cache
    }

    /// Apply `change` to a copy of the state and swap it in
    fn update<T>(&self, change: impl FnOnce(&mut ActiveState) -> Result<T>) -> Result<T> {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = ActiveState::clone(&guard);
        let value = change(&mut next)?;
        *guard = Arc::new(next);
        Ok(value)
    }

    /// Switch presets. Rule configuration restarts from the new preset's
    /// defaults with the current mode applied.
    pub fn set_preset(&self, id: &str) -> Result<Arc<Preset>> {
        let preset = self.presets.resolve(id)?;
        // mode read and swap happen under one write guard
        self.update(|state| {
            *state = ActiveState::new(Arc::clone(&preset), state.mode);
            Ok(())
        })?;
        self.cache.reset(InvalidationReason::PresetChanged);
        info!(preset = %preset.id, "Preset switched");
        Ok(preset)
    }

    /// Layer a mode over the current configuration. Switching back to
    /// balanced keeps earlier remaps; use [`Self::reset_rule_configuration`]
    /// to start over.
    pub fn set_opinion_mode(&self, mode: OpinionMode) -> Result<()> {
        self.update(|state| {
            mode.apply(&mut state.registry);
            state.mode = mode;
            Ok(())
        })?;
        self.cache.reset(InvalidationReason::OpinionModeChanged);
        info!(%mode, "Opinion mode changed");
        Ok(())
    }

    pub fn update_rule_configuration(&self, id: &str, patch: RuleConfigurationPatch) -> Result<()> {
        self.update(|state| state.registry.update_rule_configuration(id, patch))
    }

    /// Preset defaults with the current mode applied
    pub fn reset_rule_configuration(&self) -> Result<()> {
        self.update(|state| {
            state.registry.reset_to_defaults();
            state.mode.apply(&mut state.registry);
            Ok(())
        })
    }

    pub fn export_configuration(&self) -> Result<String> {
        self.state().registry.export_configuration()
    }

    /// Validated in full before anything changes
    pub fn import_configuration(&self, json: &str) -> Result<usize> {
        self.update(|state| state.registry.import_configuration(json))
    }

    pub fn parse_class(&self, raw: &str) -> ParsedClass {
        self.state().preset.grammar.parse(raw)
    }

    // =========================================================================
    // Scans
    // =========================================================================

    async fn fetch(&self) -> Result<(Vec<ElementSnapshot>, StylePropertiesContext)> {
        let elements = async { self.source.all_elements().await.map_err(LintError::from) };
        let (elements, styles) = futures::try_join!(elements, self.cache.get(&self.source))?;
        debug!(elements = elements.len(), styles = styles.len(), "Fetched page data");
        Ok((elements, StylePropertiesContext::new(styles)))
    }

    /// Class, element and page rules over every element
    pub async fn scan_page(&self) -> Result<ScanReport> {
        let state = self.state();
        let (elements, styles) = self.fetch().await?;

        let preset = &state.preset;
        let graph = ElementGraph::from_elements(elements);
        let roles = preset.classifier().classify_all(&graph, &styles);
        let rules = state.registry.get_enabled_rules();
        let results =
            RuleRunner::new(&preset.grammar, &rules, &graph, &roles, &styles).run_page();

        let classes: BTreeSet<&String> = graph.elements().iter().flat_map(|e| &e.classes).collect();

        let mut report = ScanReport::new(ScanScope::Page, &preset.id, state.mode);
        report.results = results;
        report.role_histogram = role_histogram(&roles);
        report.classes = classes.into_iter().cloned().collect();
        info!(
            preset = %preset.id,
            elements = graph.len(),
            violations = report.results.len(),
            errors = report.error_count(),
            "Page scanned"
        );
        Ok(report)
    }

    /// Class and element rules for one element, classified in page context
    pub async fn scan_element(&self, element_id: &str) -> Result<ScanReport> {
        let state = self.state();
        let (elements, styles) = self.fetch().await?;

        let preset = &state.preset;
        let graph = ElementGraph::from_elements(elements);
        let element = graph
            .get(element_id)
            .ok_or_else(|| LintError::ElementNotFound(element_id.to_string()))?;
        let roles = preset.classifier().classify_all(&graph, &styles);
        let rules = state.registry.get_enabled_rules();
        let results =
            RuleRunner::new(&preset.grammar, &rules, &graph, &roles, &styles).run_element(element);

        let scoped: BTreeMap<String, _> = std::iter::once(element_id)
            .chain(graph.children_ids(element_id).iter().map(String::as_str))
            .filter_map(|id| roles.get(id).map(|a| (id.to_string(), a.role)))
            .collect();

        let scope = ScanScope::Element {
            element_id: element_id.to_string(),
        };
        let mut report = ScanReport::new(scope, &preset.id, state.mode);
        report.results = results;
        report.roles = scoped;
        report.classes = element.classes.clone();
        debug!(
            element_id,
            violations = report.results.len(),
            "Element scanned"
        );
        Ok(report)
    }

    /// Scan the selected element, tagging the report with the selection's
    /// generation. `None` when nothing is selected.
    pub async fn scan_selection(&self, selection: &Selection) -> Result<Option<ScanReport>> {
        let Some(element_id) = selection.element_id.as_deref() else {
            return Ok(None);
        };
        let mut report = self.scan_element(element_id).await?;
        report.generation = Some(selection.generation);
        Ok(Some(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::presets::{CLIENT_FIRST_ID, LUMOS_ID};
    use crate::preset::PresetOptions;
    use crate::styles::{PageSnapshot, StaticSource, StyleDefinition};
    use crate::types::{ElementRole, Severity};

    fn engine(snapshot: PageSnapshot) -> LintEngine {
        LintEngine::new(
            PresetRegistry::builtin(&PresetOptions::default()),
            Arc::new(StaticSource::new(snapshot)),
        )
        .unwrap()
    }

    fn page() -> PageSnapshot {
        PageSnapshot {
            elements: vec![
                ElementSnapshot::new("main", "main").with_classes(["page_main"]),
                ElementSnapshot::new("section", "section")
                    .with_classes(["section_hero"])
                    .with_parent("main"),
                ElementSnapshot::new("root", "div")
                    .with_classes(["hero_wrap", "u-flex"])
                    .with_parent("section"),
                ElementSnapshot::new("bad", "div")
                    .with_classes(["foo"])
                    .with_parent("root"),
            ],
            styles: vec![StyleDefinition::new("u-flex").with_property("display", "flex")],
        }
    }

    #[tokio::test]
    async fn test_scan_page() {
        let engine = engine(page());
        let report = engine.scan_page().await.unwrap();

        assert_eq!(report.scope, ScanScope::Page);
        assert_eq!(report.preset, LUMOS_ID);
        assert!(report.classes.contains(&"foo".to_string()));
        assert_eq!(report.role_histogram[&ElementRole::Main], 1);

        let format = report
            .results
            .iter()
            .find(|r| r.rule_id == "lumos-custom-class-format")
            .unwrap();
        assert_eq!(format.class_name, "foo");
        assert_eq!(format.element_id.as_deref(), Some("bad"));
        assert_eq!(format.severity, Severity::Error);

        assert!(
            report
                .results
                .iter()
                .any(|r| r.rule_id == "utility-on-component-root" && r.class_name == "u-flex")
        );
        assert!(report.results.iter().all(|r| r.rule_id != "main-singleton"));
    }

    #[tokio::test]
    async fn test_scan_element() {
        let engine = engine(page());
        let report = engine.scan_element("root").await.unwrap();

        assert_eq!(report.roles["root"], ElementRole::ComponentRoot);
        assert!(report.roles.contains_key("bad"));
        assert_eq!(report.classes, ["hero_wrap", "u-flex"]);
        assert!(report.results.iter().all(|r| r.element_id.as_deref() == Some("root")));

        let err = engine.scan_element("ghost").await.unwrap_err();
        assert!(matches!(err, LintError::ElementNotFound(_)));
    }

    #[tokio::test]
    async fn test_preset_switch_invalidates_cache() {
        let engine = engine(page());
        engine.scan_page().await.unwrap();
        assert!(!engine.cache().is_empty());

        engine.set_preset(CLIENT_FIRST_ID).unwrap();
        assert!(engine.cache().is_empty());
        assert_eq!(engine.preset().id, CLIENT_FIRST_ID);

        let report = engine.scan_page().await.unwrap();
        assert_eq!(report.preset, CLIENT_FIRST_ID);
        assert_eq!(engine.cache().stats().fetches, 2);
        assert!(report.results.iter().all(|r| !r.rule_id.starts_with("lumos-")));
    }

    #[tokio::test]
    async fn test_opinion_mode_changes_severity() {
        let engine = engine(page());
        engine.set_opinion_mode(OpinionMode::Lenient).unwrap();
        assert!(engine.cache().is_empty());

        let report = engine.scan_page().await.unwrap();
        assert_eq!(report.mode, OpinionMode::Lenient);
        let format = report
            .results
            .iter()
            .find(|r| r.rule_id == "lumos-custom-class-format")
            .unwrap();
        assert_eq!(format.severity, Severity::Warning);
    }

    #[tokio::test]
    async fn test_preset_switch_keeps_mode() {
        let engine = engine(page());
        engine.set_opinion_mode(OpinionMode::Strict).unwrap();
        engine.set_preset(CLIENT_FIRST_ID).unwrap();

        let state = engine.state();
        assert_eq!(state.mode, OpinionMode::Strict);
        assert_eq!(state.preset.id, CLIENT_FIRST_ID);
        assert_eq!(
            state.registry.effective_severity("cf-custom-class-folder"),
            Some(Severity::Error)
        );
    }

    #[test]
    fn test_concurrent_preset_and_mode_changes_keep_latest_mode() {
        let engine = Arc::new(engine(page()));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    if i % 2 == 0 {
                        engine.set_preset(CLIENT_FIRST_ID).unwrap();
                    } else {
                        engine.set_opinion_mode(OpinionMode::Lenient).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let state = engine.state();
        assert_eq!(state.mode, OpinionMode::Lenient);
        assert_eq!(state.preset.id, CLIENT_FIRST_ID);
    }

    #[tokio::test]
    async fn test_disabled_rule_is_skipped() {
        let engine = engine(page());
        engine
            .update_rule_configuration(
                "lumos-custom-class-format",
                RuleConfigurationPatch::enabled(false),
            )
            .unwrap();
        let report = engine.scan_page().await.unwrap();
        assert!(report.results.iter().all(|r| r.rule_id != "lumos-custom-class-format"));

        engine.reset_rule_configuration().unwrap();
        let report = engine.scan_page().await.unwrap();
        assert!(report.results.iter().any(|r| r.rule_id == "lumos-custom-class-format"));
    }

    #[tokio::test]
    async fn test_scan_selection() {
        let engine = engine(page());
        let tracker = SelectionTracker::new();

        assert!(engine.scan_selection(&tracker.current()).await.unwrap().is_none());

        let generation = tracker.select(Some("bad".into()));
        let report = engine
            .scan_selection(&tracker.current())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(report.generation, Some(generation));
    }
}
