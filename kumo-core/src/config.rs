//! Dashboard configuration — TOML file with cache location and chart range.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration. Every field has a default so a missing or
/// partial file still yields a working setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the flat price/directory cache.
    pub cache_dir: PathBuf,
    /// Default chart range start.
    pub start_date: NaiveDate,
    /// Symbols pinned to the top of the ticker panel regardless of index.
    pub watchlist: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("data"),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            watchlist: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("parse config TOML: {e}"))
    }

    /// Load a config file; a missing file is the default config.
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content).unwrap_or_else(|e| {
                eprintln!("WARNING: {e}; using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("serialize config: {e}"))
    }
}
