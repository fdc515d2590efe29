//! Configuration loading for SummitSelect.
//! Reads summit.toml from the current directory or the path in SUMMIT_CONFIG.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use summit_common::SummitError;
use summit_ingestion::{IngestionConfig, SourcePaths};
use summit_ranker::Preferences;

use crate::report::ReportFormat;

pub const CONFIG_ENV: &str = "SUMMIT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "summit.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: SourcePaths,
    #[serde(default)]
    pub ingestion: IngestionConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub preferences: PreferenceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_report_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub format: ReportFormat,
    /// Resorts shown in the final list and in each attribute list.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_report_path() -> PathBuf { PathBuf::from("Ski_Resort_Results.txt") }
fn default_top_n()       -> usize   { 10 }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_report_path(),
            format: ReportFormat::default(),
            top_n: default_top_n(),
        }
    }
}

/// Stored answers. Unset answers are asked at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceConfig {
    pub runs: Option<bool>,
    pub price: Option<bool>,
    pub elevation: Option<bool>,
}

impl PreferenceConfig {
    /// `Some` once every answer is known.
    pub fn complete(&self) -> Option<Preferences> {
        Some(Preferences::new(self.runs?, self.price?, self.elevation?))
    }

    /// Values from `other` win where set.
    pub fn overridden_by(self, other: PreferenceConfig) -> Self {
        Self {
            runs: other.runs.or(self.runs),
            price: other.price.or(self.price),
            elevation: other.elevation.or(self.elevation),
        }
    }
}


impl Config {
    /// Load configuration from summit.toml.
    /// Checks SUMMIT_CONFIG first, then the current directory. A missing
    /// file yields defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::warn!("Config file not found: {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(SummitError::from)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }
}
