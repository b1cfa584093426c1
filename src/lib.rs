//! classlint - Class Naming Linter for Visual Page Builders
//!
//! Checks the class names on a page against a naming convention (a preset),
//! using the page's element tree and the site's style definitions.
//!
//! ## Core Features
//!
//! - **Grammar Adapters**: Parse raw class names into kinds and semantic tokens
//! - **Role Detection**: Assign structural roles (main, section, component root, ...)
//! - **Rule Pipeline**: Naming, property, structure and page rules with per-rule isolation
//! - **Opinion Modes**: Strict, balanced and lenient severity profiles
//! - **Single-Flight Style Cache**: One host fetch shared by concurrent scans
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use classlint::{LintEngine, PresetRegistry, PresetOptions, SnapshotSource};
//!
//! let presets = PresetRegistry::builtin(&PresetOptions::default());
//! let engine = LintEngine::new(presets, Arc::new(SnapshotSource::new("page.json")))?;
//! let report = engine.scan_page().await?;
//! ```
//!
//! ## Modules
//!
//! - [`grammar`]: Class name parsing and normalizers
//! - [`analyzer`]: Element graph and role classification
//! - [`styles`]: Host source boundary and style cache
//! - [`rules`]: Rule traits, registry and opinion modes
//! - [`preset`]: Built-in naming conventions
//! - [`engine`]: Scans, reports and selection tracking

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod engine;
pub mod grammar;
pub mod preset;
pub mod rules;
pub mod styles;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, OutputFormat};

// Error Types
pub use types::error::{LintError, Result, SourceError, ValidationError, ValidationErrorKind};

// Domain Types
pub use types::{
    ClassKind, ElementRole, ElementSnapshot, Fix, ParsedClass, RuleCategory, RuleResult, Severity,
};

// =============================================================================
// Engine Re-exports
// =============================================================================

pub use engine::{LintEngine, Reporter, ScanReport, ScanScope, SelectionTracker};
pub use grammar::GrammarAdapter;
pub use preset::{Preset, PresetOptions, PresetRegistry};
pub use rules::{OpinionMode, Rule, RuleRegistry};
pub use styles::{HostSource, PageSnapshot, SnapshotSource, StaticSource, StyleCache};
