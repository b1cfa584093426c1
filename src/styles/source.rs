//! Host Data Source
//!
//! Boundary to the page builder. The host owns the element tree and the
//! site-wide style list; the linter only reads them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::context::StyleDefinition;
use crate::types::{ElementSnapshot, Result, SourceError};

/// Read-only access to the host's page data.
///
/// Every method is an explicit suspension point; nothing else in the linter
/// awaits.
#[async_trait]
pub trait HostSource: Send + Sync {
    /// All elements on the current page, in document order
    async fn all_elements(&self) -> std::result::Result<Vec<ElementSnapshot>, SourceError>;

    /// Every style defined on the site
    async fn site_styles(&self) -> std::result::Result<Vec<StyleDefinition>, SourceError>;
}

/// Serialized page export: elements plus the site's style list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(default)]
    pub elements: Vec<ElementSnapshot>,
    #[serde(default)]
    pub styles: Vec<StyleDefinition>,
}

impl PageSnapshot {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// Host source backed by a page snapshot file.
///
/// The file is re-read on every call so a changed export is picked up by the
/// next scan.
pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self, operation: &str) -> std::result::Result<PageSnapshot, SourceError> {
        debug!("Reading page snapshot from {}", self.path.display());
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::new(operation, format!("{}: {}", self.path.display(), e)))?;
        serde_json::from_str(&text).map_err(|e| {
            SourceError::new(
                operation,
                format!("invalid snapshot {}: {}", self.path.display(), e),
            )
        })
    }
}

#[async_trait]
impl HostSource for SnapshotSource {
    async fn all_elements(&self) -> std::result::Result<Vec<ElementSnapshot>, SourceError> {
        Ok(self.read("all_elements").await?.elements)
    }

    async fn site_styles(&self) -> std::result::Result<Vec<StyleDefinition>, SourceError> {
        Ok(self.read("site_styles").await?.styles)
    }
}

/// In-memory host source, mostly for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    snapshot: PageSnapshot,
}

impl StaticSource {
    pub fn new(snapshot: PageSnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl HostSource for StaticSource {
    async fn all_elements(&self) -> std::result::Result<Vec<ElementSnapshot>, SourceError> {
        Ok(self.snapshot.elements.clone())
    }

    async fn site_styles(&self) -> std::result::Result<Vec<StyleDefinition>, SourceError> {
        Ok(self.snapshot.styles.clone())
    }
}
