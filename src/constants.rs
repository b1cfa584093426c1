//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Preset identifiers
pub mod presets {
    /// Underscore-first convention with `u-`/`c-`/`is-` prefixes
    pub const LUMOS_ID: &str = "lumos";

    /// Dash-first convention with `is-` combos and core utility families
    pub const CLIENT_FIRST_ID: &str = "client-first";

    /// Preset used when a requested id is not registered
    pub const DEFAULT_PRESET_ID: &str = LUMOS_ID;
}

/// Role classifier constants
pub mod roles {
    /// Minimum detector score for a role to be assigned
    pub const DEFAULT_THRESHOLD: f64 = 0.5;

    /// Score for unambiguous signals (tag `main`, `_wrap` roots)
    pub const STRONG_SIGNAL: f64 = 0.9;

    /// Score for naming-token matches
    pub const NAMING_SIGNAL: f64 = 0.75;

    /// Score for tag-only matches (`h2`, `ul`, `a`)
    pub const TAG_SIGNAL: f64 = 0.55;

    /// Score for style-derived signals (`display: grid`)
    pub const STYLE_SIGNAL: f64 = 0.5;
}

/// Rule catalogue constants
pub mod rules {
    /// Version written to exported rule configuration documents
    pub const CONFIG_EXPORT_VERSION: u32 = 1;

    /// Maximum number of tokens in a Lumos custom class before it is flagged
    pub const LUMOS_MAX_CUSTOM_TOKENS: usize = 3;

    /// Default property budget for a single utility class
    pub const DEFAULT_MAX_UTILITY_PROPERTIES: u64 = 4;

    /// Custom setting key for the utility property budget
    pub const MAX_PROPERTIES_SETTING: &str = "maxProperties";
}
