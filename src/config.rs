// src/config.rs
//
// TOML configuration. Every section is optional and falls back to defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "exifgeo.toml";

pub const DEFAULT_EXTS: &[&str] = &["jpg", "jpeg", "tif", "tiff", "heic", "png", "webp"];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScanSettings {
    pub extensions: Vec<String>,
    pub follow_links: bool,
    pub max_depth: Option<usize>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTS.iter().map(|s| s.to_string()).collect(),
            follow_links: false,
            max_depth: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    /// Decimal places for coordinates in text output
    pub precision: usize,
    /// Also print D/M/S next to decimal degrees
    pub show_dms: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { format: OutputFormat::Text, precision: 6, show_dms: false }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

impl Config {
    /// Default location: `<config dir>/exifgeo.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_FILE_NAME))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        log::debug!("Loading config from {:?}", path);
        Self::from_toml(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Load an explicit path (must exist), else the default path if present,
    /// else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.scan.extensions.is_empty() {
            return Err("scan.extensions must not be empty".to_string());
        }
        if self.output.precision > 12 {
            return Err(format!("output.precision must be 0-12. Got {}.", self.output.precision));
        }
        Ok(())
    }

    /// Lowercased extension list without leading dots
    pub fn normalized_extensions(&self) -> Vec<String> {
        self.scan
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let cfg = Config::from_toml("").unwrap();
        assert_eq!(cfg, Config::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_sections() {
        let cfg = Config::from_toml(
            r#"
            [scan]
            extensions = [".JPG", "nef"]

            [output]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.normalized_extensions(), vec!["jpg", "nef"]);
        assert!(!cfg.scan.follow_links);
        assert_eq!(cfg.output.format, OutputFormat::Json);
        assert_eq!(cfg.output.precision, 6);
    }

    #[test]
    fn test_bad_config() {
        assert!(Config::from_toml("[output]\nformat = \"xml\"").is_err());

        let mut cfg = Config::default();
        cfg.scan.extensions.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[output]\nshow_dms = true\n").unwrap();
        let cfg = Config::load(Some(&path)).unwrap();
        assert!(cfg.output.show_dms);

        assert!(Config::load(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
