//! Selection tracking
//!
//! The host reports selection changes; each change bumps a generation. Scans
//! started for an older generation still complete, and the caller drops their
//! results by comparing generations.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use super::LintEngine;
use super::report::ScanReport;
use crate::types::Generation;

/// Current selection and the generation it was made in
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub generation: Generation,
    pub element_id: Option<String>,
}

#[derive(Debug)]
pub struct SelectionTracker {
    tx: watch::Sender<Selection>,
}

impl Default for SelectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Selection::default());
        Self { tx }
    }

    /// Record a new selection (`None` clears it); returns its generation
    pub fn select(&self, element_id: Option<String>) -> Generation {
        let mut generation = Generation::ZERO;
        self.tx.send_modify(|current| {
            current.generation = current.generation.next();
            current.element_id = element_id;
            generation = current.generation;
        });
        debug!(%generation, "Selection changed");
        generation
    }

    pub fn current(&self) -> Selection {
        self.tx.borrow().clone()
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.tx.borrow().generation == generation
    }

    pub fn subscribe(&self) -> watch::Receiver<Selection> {
        self.tx.subscribe()
    }
}

/// Scan every selection change and forward reports that are still current
/// when they finish. Stops when the tracker or the receiver goes away.
pub fn spawn_selection_scanner(
    engine: Arc<LintEngine>,
    tracker: Arc<SelectionTracker>,
    buffer: usize,
) -> mpsc::Receiver<ScanReport> {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    let mut changes = tracker.subscribe();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = tx.closed() => break,
            }

            let selection = changes.borrow_and_update().clone();
            let engine = Arc::clone(&engine);
            let tracker = Arc::clone(&tracker);
            let tx = tx.clone();

            tokio::spawn(async move {
                match engine.scan_selection(&selection).await {
                    Ok(Some(report)) if tracker.is_current(selection.generation) => {
                        if tx.send(report).await.is_err() {
                            debug!(generation = %selection.generation, "Report receiver closed");
                        }
                    }
                    Ok(Some(_)) => {
                        debug!(generation = %selection.generation, "Dropping stale scan");
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!(generation = %selection.generation, error = %e, "Selection scan failed");
                    }
                }
            });
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::preset::{PresetOptions, PresetRegistry};
    use crate::styles::{PageSnapshot, StaticSource};
    use crate::types::ElementSnapshot;

    fn engine() -> Arc<LintEngine> {
        let snapshot = PageSnapshot {
            elements: vec![ElementSnapshot::new("hero", "div").with_classes(["hero_wrap"])],
            styles: Vec::new(),
        };
        Arc::new(
            LintEngine::new(
                PresetRegistry::builtin(&PresetOptions::default()),
                Arc::new(StaticSource::new(snapshot)),
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_generations_increase() {
        let tracker = SelectionTracker::new();
        let first = tracker.select(Some("a".into()));
        let second = tracker.select(None);
        assert!(second > first);
        assert!(tracker.is_current(second));
        assert!(!tracker.is_current(first));
        assert_eq!(tracker.current().element_id, None);
    }

    #[tokio::test]
    async fn test_subscribers_see_latest() {
        let tracker = SelectionTracker::new();
        let mut rx = tracker.subscribe();
        tracker.select(Some("a".into()));
        tracker.select(Some("b".into()));

        rx.changed().await.unwrap();
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.element_id.as_deref(), Some("b"));
        assert_eq!(seen.generation, Generation::new(2));
    }

    #[tokio::test]
    async fn test_scanner_stops_after_receiver_dropped() {
        let tracker = Arc::new(SelectionTracker::new());
        let mut rx = spawn_selection_scanner(engine(), Arc::clone(&tracker), 1);

        let generation = tracker.select(Some("hero".into()));
        let report = rx.recv().await.unwrap();
        assert_eq!(report.generation, Some(generation));

        drop(rx);
        tracker.select(Some("hero".into()));

        // the scanner loop releases its subscription once it exits
        tokio::time::timeout(Duration::from_secs(5), async {
            while tracker.tx.receiver_count() > 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
        assert!(tracker.is_current(Generation::new(2)));
    }
}
