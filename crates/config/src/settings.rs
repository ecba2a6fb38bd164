// Application settings
// Loaded from ~/.config/scholar/config.toml

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;

use crate::error::ConfigError;

/// Characters Excel refuses in a worksheet name.
const FORBIDDEN_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];
const MAX_SHEET_NAME_LEN: usize = 31;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScholarConfig {
    pub cache: CacheSettings,
    pub export: ExportSettings,
    pub sources: SourceSettings,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Result cache sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub max_size: usize,
    pub ttl_hours: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_size: 100,
            ttl_hours: 24,
        }
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours.saturating_mul(3600))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }

    /// Pick a format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" => Some(Self::Xlsx),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Worksheet name used for XLSX exports.
    pub sheet_name: String,
    pub format: ExportFormat,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            sheet_name: "Search Results".into(),
            format: ExportFormat::Xlsx,
        }
    }
}

/// Display names for the two bibliographic sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub left_label: String,
    pub right_label: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            left_label: "PubMed".into(),
            right_label: "Semantic Scholar".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing, validation, loading
// ---------------------------------------------------------------------------

impl ScholarConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: ScholarConfig =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.max_size == 0 {
            return Err(ConfigError::Validation(
                "cache.max_size must be at least 1".into(),
            ));
        }
        if self.cache.ttl_hours == 0 {
            return Err(ConfigError::Validation(
                "cache.ttl_hours must be greater than 0".into(),
            ));
        }

        let sheet = &self.export.sheet_name;
        if sheet.trim().is_empty() {
            return Err(ConfigError::Validation(
                "export.sheet_name must not be empty".into(),
            ));
        }
        if sheet.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(ConfigError::Validation(format!(
                "export.sheet_name '{sheet}' is longer than {MAX_SHEET_NAME_LEN} characters"
            )));
        }
        if let Some(c) = sheet.chars().find(|c| FORBIDDEN_SHEET_CHARS.contains(c)) {
            return Err(ConfigError::Validation(format!(
                "export.sheet_name '{sheet}' contains forbidden character '{c}'"
            )));
        }

        for (key, label) in [
            ("sources.left_label", &self.sources.left_label),
            ("sources.right_label", &self.sources.right_label),
        ] {
            if label.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }

        Ok(())
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scholar");
        config_dir.join("config.toml")
    }

    /// Load from an explicit file. A missing or unreadable file is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!("config: loaded {}", path.display());
        Self::from_toml(&contents)
    }

    /// Load `path` if given, otherwise the default location, falling back
    /// to defaults when the default file does not exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        let path = Self::config_path();
        if !path.exists() {
            debug!("config: {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL: &str = r#"
[cache]
max_size = 10
ttl_hours = 2

[export]
sheet_name = "Results"
format = "csv"

[sources]
left_label = "Left DB"
right_label = "Right DB"
"#;

    #[test]
    fn parse_full() {
        let config = ScholarConfig::from_toml(FULL).unwrap();
        assert_eq!(config.cache.max_size, 10);
        assert_eq!(config.cache.ttl(), Duration::from_secs(7200));
        assert_eq!(config.export.sheet_name, "Results");
        assert_eq!(config.export.format, ExportFormat::Csv);
        assert_eq!(config.sources.left_label, "Left DB");
    }

    #[test]
    fn empty_document_is_defaults() {
        let config = ScholarConfig::from_toml("").unwrap();
        assert_eq!(config, ScholarConfig::default());
        assert_eq!(config.cache.max_size, 100);
        assert_eq!(config.cache.ttl(), Duration::from_secs(24 * 3600));
        assert_eq!(config.export.sheet_name, "Search Results");
        assert_eq!(config.sources.right_label, "Semantic Scholar");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = ScholarConfig::from_toml("[cache]\nmax_size = 5\n").unwrap();
        assert_eq!(config.cache.max_size, 5);
        assert_eq!(config.cache.ttl_hours, 24);
    }

    #[test]
    fn zero_capacity_rejected() {
        let err = ScholarConfig::from_toml("[cache]\nmax_size = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("max_size"));
    }

    #[test]
    fn zero_ttl_rejected() {
        let err = ScholarConfig::from_toml("[cache]\nttl_hours = 0\n").unwrap_err();
        assert!(err.to_string().contains("ttl_hours"));
    }

    #[test]
    fn sheet_name_rules() {
        let long = format!("[export]\nsheet_name = \"{}\"\n", "x".repeat(32));
        assert!(ScholarConfig::from_toml(&long).is_err());

        let ok = format!("[export]\nsheet_name = \"{}\"\n", "x".repeat(31));
        assert!(ScholarConfig::from_toml(&ok).is_ok());

        let err = ScholarConfig::from_toml("[export]\nsheet_name = \"a/b\"\n").unwrap_err();
        assert!(err.to_string().contains("'/'"));

        assert!(ScholarConfig::from_toml("[export]\nsheet_name = \"  \"\n").is_err());
    }

    #[test]
    fn unknown_format_is_parse_error() {
        let err = ScholarConfig::from_toml("[export]\nformat = \"pdf\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn blank_label_rejected() {
        let err = ScholarConfig::from_toml("[sources]\nleft_label = \"\"\n").unwrap_err();
        assert!(err.to_string().contains("sources.left_label"));
    }

    #[test]
    fn to_toml_parses_back() {
        let config = ScholarConfig::from_toml(FULL).unwrap();
        let text = config.to_toml().unwrap();
        assert_eq!(ScholarConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();
        let config = ScholarConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.cache.max_size, 10);
    }

    #[test]
    fn missing_explicit_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScholarConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn export_format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("out.XLSX")), Some(ExportFormat::Xlsx));
        assert_eq!(ExportFormat::from_path(Path::new("out.csv")), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_path(Path::new("out.json")), None);
        assert_eq!(ExportFormat::from_path(Path::new("out")), None);
    }

    #[test]
    fn config_path_ends_in_scholar_dir() {
        let path = ScholarConfig::config_path();
        assert!(path.ends_with("scholar/config.toml"));
    }
}
