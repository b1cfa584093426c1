//! Site Style Cache
//!
//! Single-flight memoization of the site-wide style list. The first caller
//! starts the fetch; everyone arriving before it resolves awaits the same
//! shared future. The slot is reset when the active preset or opinion mode
//! changes, and after a failed fetch so the next caller retries.

use futures::future::{self, BoxFuture, FutureExt, Shared};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use super::context::StyleDefinition;
use super::source::HostSource;
use crate::types::{Result, SourceError};

/// Resolved style list, shared between scans
pub type StyleList = Arc<Vec<StyleDefinition>>;

/// In-flight or resolved fetch handle
pub type PendingStyles = Shared<BoxFuture<'static, std::result::Result<StyleList, SourceError>>>;

/// Why the cache was cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationReason {
    PresetChanged,
    OpinionModeChanged,
    FetchFailed,
    Manual,
}

impl std::fmt::Display for InvalidationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PresetChanged => write!(f, "preset changed"),
            Self::OpinionModeChanged => write!(f, "opinion mode changed"),
            Self::FetchFailed => write!(f, "fetch failed"),
            Self::Manual => write!(f, "manual reset"),
        }
    }
}

/// Cache statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Fetches started against the host
    pub fetches: u64,
    /// Calls served by an existing pending or resolved fetch
    pub hits: u64,
    pub invalidations: u64,
}

/// Explicitly owned single-flight cache for site styles
#[derive(Default)]
pub struct StyleCache {
    slot: Mutex<Option<PendingStyles>>,
    fetches: AtomicU64,
    hits: AtomicU64,
    invalidations: AtomicU64,
}

impl StyleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current fetch handle, starting one if the slot is empty.
    ///
    /// Callers arriving before resolution receive the same handle.
    pub fn pending(&self, source: &Arc<dyn HostSource>) -> PendingStyles {
        let mut slot = self.lock();

        // a failed fetch whose waiter was dropped before discarding it
        if let Some(existing) = slot.as_ref()
            && !matches!(existing.peek(), Some(Err(_)))
        {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return existing.clone();
        }

        self.fetches.fetch_add(1, Ordering::Relaxed);
        debug!("Fetching site styles");

        let source = Arc::clone(source);
        let fetch = async move { source.site_styles().await.map(Arc::new) }
            .boxed()
            .shared();
        *slot = Some(fetch.clone());
        fetch
    }

    /// Await the site style list
    pub async fn get(&self, source: &Arc<dyn HostSource>) -> Result<StyleList> {
        let pending = self.pending(source);

        match pending.clone().await {
            Ok(styles) => Ok(styles),
            Err(e) => {
                self.discard(&pending);
                Err(e.into())
            }
        }
    }

    /// Seed the cache with an already-known style list
    pub fn set(&self, styles: Vec<StyleDefinition>) {
        let resolved = future::ready(Ok(Arc::new(styles))).boxed().shared();
        *self.lock() = Some(resolved);
    }

    /// Drop the cached handle; the next call fetches again
    pub fn reset(&self, reason: InvalidationReason) {
        let had_entry = self.lock().take().is_some();
        self.invalidations.fetch_add(1, Ordering::Relaxed);
        debug!(%reason, had_entry, "Style cache invalidated");
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            fetches: self.fetches.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }

    /// Clear the slot only if it still holds the failed fetch; a reset plus
    /// new fetch may have replaced it meanwhile.
    fn discard(&self, failed: &PendingStyles) {
        let mut slot = self.lock();
        if slot.as_ref().is_some_and(|current| current.ptr_eq(failed)) {
            *slot = None;
            drop(slot);
            self.invalidations.fetch_add(1, Ordering::Relaxed);
            debug!(reason = %InvalidationReason::FetchFailed, "Style cache invalidated");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<PendingStyles>> {
        self.slot.lock().unwrap_or_else(|poisoned| {
            tracing::error!("Style cache lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}
