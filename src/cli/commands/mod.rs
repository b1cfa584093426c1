pub mod config;
pub mod parse;
pub mod presets;
pub mod rules;
pub mod scan;
