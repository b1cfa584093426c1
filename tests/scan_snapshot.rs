//! End-to-end scans of page snapshot files.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use classlint::engine::{LintEngine, ScanScope};
use classlint::preset::{PresetOptions, PresetRegistry};
use classlint::rules::{OpinionMode, RuleConfigurationPatch};
use classlint::styles::SnapshotSource;
use classlint::types::{ElementRole, LintError, Severity};

const PAGE: &str = r#"{
    "elements": [
        {"id": "main", "tagName": "main", "classes": ["page_main"]},
        {"id": "hero", "tagName": "section", "classes": ["section_hero"], "parentId": "main"},
        {"id": "contain", "classes": ["u-container"], "parentId": "hero"},
        {"id": "card", "classes": ["card_wrap"], "parentId": "contain"},
        {"id": "title", "tagName": "h2", "classes": ["card_title", "u-text-large"], "parentId": "card"},
        {"id": "odd", "classes": ["foo"], "parentId": "card"}
    ],
    "styles": [
        {"name": "u-container", "properties": {"max-width": "80rem", "margin-left": "auto", "margin-right": "auto"}},
        {"name": "u-text-large", "properties": {"font-size": "1.5rem"}},
        {"name": "card_title", "properties": {"font-size": "1.5rem"}}
    ]
}"#;

fn write_snapshot(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("page.json");
    fs::write(&path, body).unwrap();
    path
}

fn engine_for(path: &Path) -> LintEngine {
    LintEngine::new(
        PresetRegistry::builtin(&PresetOptions::default()),
        Arc::new(SnapshotSource::new(path)),
    )
    .unwrap()
}

#[tokio::test]
async fn single_token_custom_class_is_a_format_error() {
    let dir = TempDir::new().unwrap();
    let engine = engine_for(&write_snapshot(dir.path(), PAGE));

    let report = engine.scan_page().await.unwrap();

    let result = report
        .results
        .iter()
        .find(|r| r.rule_id == "lumos-custom-class-format" && r.class_name == "foo")
        .expect("format violation for foo");
    assert_eq!(result.severity, Severity::Error);
    assert_eq!(result.element_id.as_deref(), Some("odd"));
    assert!(!result.is_combo);
    assert!(report.has_errors());
}

#[tokio::test]
async fn page_roles_and_duplicates() {
    let dir = TempDir::new().unwrap();
    let engine = engine_for(&write_snapshot(dir.path(), PAGE));

    let report = engine.scan_page().await.unwrap();

    assert_eq!(report.scope, ScanScope::Page);
    assert_eq!(report.role_histogram.get(&ElementRole::Main), Some(&1));
    assert!(report.results.iter().all(|r| r.rule_id != "main-singleton"));
    assert!(report.results.iter().all(|r| r.rule_id != "main-has-content"));
    assert!(
        report
            .results
            .iter()
            .any(|r| r.rule_id == "duplicate-utility-properties" && r.class_name == "card_title")
    );
}

#[tokio::test]
async fn page_without_main_reports_once() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(
        dir.path(),
        r#"{"elements": [{"id": "a", "classes": ["card_wrap"]}], "styles": []}"#,
    );
    let engine = engine_for(&path);

    let report = engine.scan_page().await.unwrap();
    let missing: Vec<_> = report
        .results
        .iter()
        .filter(|r| r.rule_id == "main-singleton")
        .collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].element_id, None);
    assert_eq!(missing[0].class_name, "");
}

#[tokio::test]
async fn element_scan_limits_results() {
    let dir = TempDir::new().unwrap();
    let engine = engine_for(&write_snapshot(dir.path(), PAGE));

    let report = engine.scan_element("title").await.unwrap();
    assert_eq!(
        report.scope,
        ScanScope::Element {
            element_id: "title".into()
        }
    );
    assert!(report.results.iter().all(|r| r.element_id.as_deref() == Some("title")));
    assert!(report.results.iter().all(|r| r.rule_id != "main-singleton"));

    assert!(matches!(
        engine.scan_element("missing").await,
        Err(LintError::ElementNotFound(_))
    ));
}

#[tokio::test]
async fn snapshot_is_reread_after_invalidation() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(dir.path(), PAGE);
    let engine = engine_for(&path);
    engine.scan_page().await.unwrap();

    fs::write(&path, r#"{"elements": [], "styles": []}"#).unwrap();
    engine.set_opinion_mode(OpinionMode::Strict).unwrap();

    let report = engine.scan_page().await.unwrap();
    assert!(report.classes.is_empty());
    assert_eq!(engine.cache().stats().fetches, 2);
}

#[tokio::test]
async fn broken_snapshot_is_a_source_error() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(dir.path(), "{not json");
    let engine = engine_for(&path);

    let err = engine.scan_page().await.unwrap_err();
    assert!(matches!(err, LintError::Source(_)));

    fs::write(&path, PAGE).unwrap();
    let report = engine.scan_page().await.unwrap();
    assert!(report.classes.contains(&"foo".to_string()));
}

#[tokio::test]
async fn exported_configuration_round_trips_through_engine() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(dir.path(), PAGE);
    let engine = engine_for(&path);

    engine
        .update_rule_configuration(
            "lumos-custom-class-format",
            RuleConfigurationPatch::severity(Severity::Suggestion),
        )
        .unwrap();
    let exported = engine.export_configuration().unwrap();

    let fresh = engine_for(&path);
    fresh.import_configuration(&exported).unwrap();
    let report = fresh.scan_page().await.unwrap();
    let result = report
        .results
        .iter()
        .find(|r| r.rule_id == "lumos-custom-class-format")
        .unwrap();
    assert_eq!(result.severity, Severity::Suggestion);

    let err = fresh
        .import_configuration(r#"{"version": 1, "rules": [{"ruleId": "nope"}]}"#)
        .unwrap_err();
    assert!(err.is_configuration());
}
