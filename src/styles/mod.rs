//! Style data: host boundary, single-flight cache, and per-run lookups.

pub mod cache;
pub mod context;
pub mod source;

pub use cache::{CacheStats, InvalidationReason, PendingStyles, StyleCache, StyleList};
pub use context::{Properties, StyleDefinition, StylePropertiesContext};
pub use source::{HostSource, PageSnapshot, SnapshotSource, StaticSource};
