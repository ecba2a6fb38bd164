//! Configuration for the scholar tools.
//!
//! One TOML file with `[cache]`, `[export]` and `[sources]` sections; every
//! key is optional.

pub mod error;
pub mod settings;

pub use error::ConfigError;
pub use settings::{CacheSettings, ExportFormat, ExportSettings, ScholarConfig, SourceSettings};
