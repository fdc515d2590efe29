//! Command-line arguments. Anything given here overrides summit.toml.

use std::path::PathBuf;

use clap::Parser;
use summit_common::Attribute;

use crate::config::{Config, PreferenceConfig};
use crate::report::ReportFormat;

/// SummitSelect: find your dream resort.
#[derive(Debug, Parser)]
#[command(name = "summitselect")]
#[command(version)]
#[command(about = "Rank ski resorts by run count, lift ticket price and peak elevation")]
pub struct Cli {
    /// Path to run count data for each resort.
    #[arg(long, alias = "run_count_data")]
    pub run_count_data: Option<PathBuf>,

    /// Path to price data for each resort.
    #[arg(long, alias = "price_data")]
    pub price_data: Option<PathBuf>,

    /// Path to peak elevation data for each resort.
    #[arg(long, alias = "elevation_data")]
    pub elevation_data: Option<PathBuf>,

    /// Path to the report file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Resorts shown per list.
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Looking for more runs (true/false).
    #[arg(long)]
    pub runs: Option<bool>,

    /// Looking for cheaper lift tickets (true/false).
    #[arg(long)]
    pub cheap: Option<bool>,

    /// Looking for a higher peak elevation (true/false).
    #[arg(long)]
    pub high: Option<bool>,

    /// Also blend the attribute rankings with these weights (runs,price,elevation; must sum to 1).
    #[arg(long, value_delimiter = ',')]
    pub blend: Option<Vec<f64>>,

    /// Also list every resort ranked by this attribute (runs, price, elevation).
    #[arg(long)]
    pub sort_by: Option<Attribute>,

    /// Never prompt; unanswered preferences count as "yes".
    #[arg(long)]
    pub non_interactive: bool,

    /// Config file, instead of SUMMIT_CONFIG or ./summit.toml.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn preferences(&self) -> PreferenceConfig {
        PreferenceConfig {
            runs: self.runs,
            price: self.cheap,
            elevation: self.high,
        }
    }

    /// Fold flag values into `config`.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(p) = &self.run_count_data {
            config.data.runs = p.clone();
        }
        if let Some(p) = &self.price_data {
            config.data.prices = p.clone();
        }
        if let Some(p) = &self.elevation_data {
            config.data.elevation = p.clone();
        }
        if let Some(p) = &self.output {
            config.output.path = p.clone();
        }
        if let Some(f) = self.format {
            config.output.format = f;
        }
        if let Some(n) = self.top_n {
            config.output.top_n = n;
        }
        config.preferences = config.preferences.overridden_by(self.preferences());
        config
    }
}
