//! SummitSelect — ski resort recommendations from run count, lift ticket
//! price and peak elevation.
//! Entry point for the `summitselect` binary.

mod cli;
mod config;
mod prompt;
mod report;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use summit_ingestion::preprocess;
use summit_ranker::{blend_rankings, rank_all, rank_by_criteria, CompositeScorer, PreferenceVector};

use crate::cli::Cli;
use crate::config::Config;
use crate::report::{format_value, Report};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("SummitSelect starting up...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let config = cli.apply(config);

    // ── Preprocessing ─────────────────────────────────────────────────────────
    let table = preprocess(&config.data, &config.ingestion).with_context(|| {
        format!(
            "preprocessing {}, {} and {}",
            config.data.runs.display(),
            config.data.prices.display(),
            config.data.elevation.display()
        )
    })?;
    info!("Data processed: {} resorts", table.len());

    // ── Preferences ───────────────────────────────────────────────────────────
    let preferences = match config.preferences.complete() {
        Some(p) => p,
        None if cli.non_interactive => {
            warn!("Unanswered preferences default to yes");
            prompt::resolve(config.preferences, |_| Ok(true))?
        }
        None => {
            println!("Please specify your preferences:");
            prompt::resolve(config.preferences, prompt::confirm)?
        }
    };

    // ── Attribute rankings ────────────────────────────────────────────────────
    let rankings = rank_all(&table)?;
    for ranking in rankings.iter() {
        println!("\nTop resorts by {}:", ranking.attribute);
        for entry in ranking.top(5)?.iter() {
            println!("{:>3}. {} - {}", entry.rank, entry.name, format_value(ranking.attribute, entry.value));
        }
    }

    if let Some(attribute) = cli.sort_by {
        let full = rank_by_criteria(&table, attribute, preferences.get(attribute))?;
        println!("\nAll resorts by {} ({}):", attribute, full.direction);
        for entry in full.entries.iter() {
            println!("{:>3}. {} - {}", entry.rank, entry.name, format_value(attribute, entry.value));
        }
    }

    // ── Composite score ───────────────────────────────────────────────────────
    let mut scorer = CompositeScorer::new(table);
    scorer.set_preferences(preferences.runs, preferences.price, preferences.elevation);
    scorer.normalize()?;
    scorer.score()?;
    let ranking = scorer.rank()?.clone();

    let top = scorer.return_top(config.output.top_n)?;
    println!("\nTop {} resorts:", top.len());
    println!("{:>4}  {:<32} {:>5} {:>9} {:>7} {:>8}", "Rank", "Resort", "Runs", "Price", "Peak m", "Score");
    for e in top.iter() {
        println!(
            "{:>4}  {:<32} {:>5} {:>9} {:>7} {:>8.4}",
            e.rank,
            e.name,
            e.run_count,
            format!("${:.2}", e.price),
            e.peak_elevation.trunc() as i64,
            e.total_score
        );
    }

    let mut report = Report::new(preferences, &ranking, &rankings, config.output.top_n);

    // ── Optional rank blend ───────────────────────────────────────────────────
    if let Some(w) = &cli.blend {
        let &[runs, price, elevation] = w.as_slice() else {
            anyhow::bail!("--blend takes exactly three weights, got {}", w.len());
        };
        let weights = PreferenceVector::general(runs, price, elevation).context("invalid --blend weights")?;
        let blended = blend_rankings(&rankings, &weights, config.output.top_n)?;
        println!("\nRank blend ({} resorts):", blended.len());
        for e in blended.entries.iter().take(config.output.top_n) {
            println!("{:>3}. {} - {:.4}", e.rank, e.name, e.score);
        }
        report = report.with_blend(blended);
    }

    // ── Report ────────────────────────────────────────────────────────────────
    match report.write(&config.output.path, config.output.format) {
        Ok(()) => println!("\nSee '{}' for your curated list.", config.output.path.display()),
        Err(e) => error!("Could not write report to {}: {e:#}", config.output.path.display()),
    }

    Ok(())
}
