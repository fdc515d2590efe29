//! End-to-end preprocessing.
//!
//! Flow for one run:
//!   1. Read and organise the three CSV sources
//!   2. Outer-merge them on `Resort ID`
//!   3. Clean (absolute values, median/mode fills, whole run counts)
//!   4. Validate against the country allow-list
//!   5. Write the processed table if an output path is configured
//!
//! The resulting [`ResortTable`] is what the ranking engine consumes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use summit_common::{ResortTable, Result};
use tracing::{info, instrument, warn};

use crate::clean::clean;
use crate::merge::merge_sources;
use crate::reader::read_source;
use crate::validate::validate;
use crate::writer::write_processed;

// ── Inputs ────────────────────────────────────────────────────────────────────

/// Locations of the three raw sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePaths {
    #[serde(default = "default_runs_path")]
    pub runs: PathBuf,
    #[serde(default = "default_prices_path")]
    pub prices: PathBuf,
    #[serde(default = "default_elevation_path")]
    pub elevation: PathBuf,
}

fn default_runs_path() -> PathBuf {
    PathBuf::from("data-sets/ski_resort_run_count.csv")
}

fn default_prices_path() -> PathBuf {
    PathBuf::from("data-sets/ski_resort_prices.csv")
}

fn default_elevation_path() -> PathBuf {
    PathBuf::from("data-sets/ski_resort_elevation.csv")
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            runs: default_runs_path(),
            prices: default_prices_path(),
            elevation: default_elevation_path(),
        }
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Countries a resort may belong to.
    #[serde(default = "default_allowed_countries")]
    pub allowed_countries: Vec<String>,
    /// Where the processed table is written. `None` skips the write.
    #[serde(default = "default_processed_output")]
    pub processed_output: Option<PathBuf>,
}

fn default_allowed_countries() -> Vec<String> {
    vec!["United States".to_string(), "Canada".to_string()]
}

fn default_processed_output() -> Option<PathBuf> {
    Some(PathBuf::from("data-sets/processed_resorts_data.csv"))
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            allowed_countries: default_allowed_countries(),
            processed_output: default_processed_output(),
        }
    }
}

impl IngestionConfig {
    pub fn allows_country(&self, country: &str) -> bool {
        self.allowed_countries.iter().any(|c| c == country)
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Run the whole preprocessing pipeline.
#[instrument(skip_all)]
pub fn preprocess(paths: &SourcePaths, config: &IngestionConfig) -> Result<ResortTable> {
    let runs = read_source(&paths.runs)?;
    let prices = read_source(&paths.prices)?;
    let elevation = read_source(&paths.elevation)?;
    info!("Data read and loaded into memory");

    let merged = merge_sources(&runs, &prices, &elevation)?;
    info!("Data merged: {} resorts", merged.resorts.len());

    let records = clean(merged.resorts);

    let report = validate(&records, &merged.conflicting_ids, config);
    report.into_result()?;
    info!("Validation passed");

    let table = ResortTable::new(records)?;

    if let Some(output) = &config.processed_output {
        if let Err(e) = write_processed(&table, output) {
            warn!("Could not write processed data to {:?}: {}", output, e);
        }
    }

    Ok(table)
}
