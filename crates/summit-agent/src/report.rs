//! Results report, written as plain text or JSON.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use summit_common::{Attribute, Direction, SummitError};
use summit_ranker::{
    AttributeRankEntry, AttributeRankings, BlendRanking, CompositeEntry, CompositeRanking, PreferenceVector,
    Preferences,
};
use tracing::info;

const TITLE: &str = "SummitSelect: List of Recommended Ski Resorts";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttributeSection {
    pub attribute: Attribute,
    pub direction: Direction,
    pub entries: Vec<AttributeRankEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub preferences: Preferences,
    pub weights: PreferenceVector,
    pub final_list: Vec<CompositeEntry>,
    pub attribute_lists: Vec<AttributeSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blend: Option<BlendRanking>,
}

impl Report {
    /// Full composite ranking plus the head of each attribute ranking.
    pub fn new(
        preferences: Preferences,
        ranking: &CompositeRanking,
        rankings: &AttributeRankings,
        per_attribute: usize,
    ) -> Self {
        let attribute_lists = rankings
            .iter()
            .map(|r| AttributeSection {
                attribute: r.attribute,
                direction: r.direction,
                entries: r.entries.iter().take(per_attribute).cloned().collect(),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            preferences,
            weights: ranking.weights.clone(),
            final_list: ranking.entries.clone(),
            attribute_lists,
            blend: None,
        }
    }

    pub fn with_blend(mut self, blend: BlendRanking) -> Self {
        self.blend = Some(blend);
        self
    }

    pub fn render(&self, format: ReportFormat) -> anyhow::Result<String> {
        match format {
            ReportFormat::Text => Ok(self.render_text()?),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(self).map_err(SummitError::from)?),
        }
    }

    pub fn render_text(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();
        self.write_text(&mut out)?;
        Ok(out)
    }

    /// Plain-text layout, written into any `fmt::Write` sink.
    pub fn write_text(&self, out: &mut impl fmt::Write) -> fmt::Result {
        let rule = "-".repeat(40);

        writeln!(out, "{}", TITLE)?;
        writeln!(out, "{}\n", "=".repeat(40))?;

        writeln!(out, "Final List:")?;
        writeln!(out, "{}", rule)?;
        for entry in &self.final_list {
            writeln!(out, "{} Rank: {}", entry.rank, entry.name)?;
            writeln!(out, " Run Count: {}", entry.run_count)?;
            writeln!(out, " Price (USD): ${:.2}", entry.price)?;
            writeln!(out, " Peak Elevation (m): {}", entry.peak_elevation.trunc() as i64)?;
            writeln!(out, " Total Score: {:.4}\n", entry.total_score)?;
        }

        writeln!(out, "\nHow Each Feature Ranks Based on Your Preferences:")?;
        writeln!(out, "{}", rule)?;
        for section in &self.attribute_lists {
            writeln!(
                out,
                "\nTop {} Resorts By {}:",
                section.entries.len(),
                capitalise(section.attribute.key())
            )?;
            for (i, entry) in section.entries.iter().enumerate() {
                writeln!(out, "{}. {} - {}", i + 1, entry.name, format_value(section.attribute, entry.value))?;
            }
        }

        if let Some(blend) = &self.blend {
            writeln!(out, "\nRank Blend:")?;
            writeln!(out, "{}", rule)?;
            for entry in &blend.entries {
                writeln!(
                    out,
                    "{}. {} - score {:.4} (runs #{}, price #{}, elevation #{})",
                    entry.rank,
                    entry.name,
                    entry.score,
                    entry.run_count_rank,
                    entry.price_rank,
                    entry.peak_elevation_rank
                )?;
            }
        }

        Ok(())
    }

    /// Render and write to `path`.
    pub fn write(&self, path: &Path, format: ReportFormat) -> anyhow::Result<()> {
        let body = self.render(format)?;
        std::fs::write(path, body)?;
        info!("Report written to {}", path.display());
        Ok(())
    }
}

pub fn format_value(attribute: Attribute, value: f64) -> String {
    match attribute {
        Attribute::RunCount => format!("{} runs", value.trunc() as i64),
        Attribute::Price => format!("${:.2}", value),
        Attribute::PeakElevation => format!("{} meters", value.trunc() as i64),
    }
}

fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use summit_ranker::{blend, rank_all, run};
    use summit_test_utils::fixtures;

    fn scenario_report() -> Report {
        let table = fixtures::scenario_table();
        let prefs = Preferences::new(true, true, true);
        let ranking = run(&table, prefs).unwrap();
        let rankings = rank_all(&table).unwrap();
        Report::new(prefs, &ranking, &rankings, 10)
    }

    #[test]
    fn test_text_layout() {
        let text = scenario_report().render_text().unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], TITLE);
        assert_eq!(lines[3], "Final List:");
        assert_eq!(lines[5], "1 Rank: A");
        assert_eq!(lines[6], " Run Count: 50");
        assert_eq!(lines[7], " Price (USD): $80.00");
        assert_eq!(lines[8], " Peak Elevation (m): 3000");
        assert_eq!(lines[9], " Total Score: 0.6667");
        assert!(text.contains("\nTop 3 Resorts By Runs:\n1. A - 50 runs\n"));
        assert!(text.contains("\nTop 3 Resorts By Price:\n1. B - $40.00\n"));
        assert!(text.contains("\nTop 3 Resorts By Elevation:\n1. A - 3000 meters\n"));
        assert!(!text.contains("Rank Blend"));
    }

    #[test]
    fn test_write_text_stops_on_sink_error() {
        struct Full(usize);
        impl fmt::Write for Full {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                if self.0 < s.len() {
                    return Err(fmt::Error);
                }
                self.0 -= s.len();
                Ok(())
            }
        }

        let report = scenario_report();
        assert!(report.write_text(&mut Full(20)).is_err());
        let mut text = String::new();
        report.write_text(&mut text).unwrap();
        assert_eq!(text, report.render_text().unwrap());
    }

    #[test]
    fn test_attribute_lists_are_truncated() {
        let table = fixtures::sample_table();
        let prefs = Preferences::new(true, false, true);
        let report = Report::new(prefs, &run(&table, prefs).unwrap(), &rank_all(&table).unwrap(), 2);
        assert_eq!(report.final_list.len(), 5);
        assert!(report.attribute_lists.iter().all(|s| s.entries.len() == 2));
    }

    #[test]
    fn test_json_report() {
        let table = fixtures::scenario_table();
        let weights = PreferenceVector::general(0.5, 0.25, 0.25).unwrap();
        let report = scenario_report().with_blend(blend(&table, &weights, 3).unwrap());
        let json: serde_json::Value = serde_json::from_str(&report.render(ReportFormat::Json).unwrap()).unwrap();
        assert_eq!(json["final_list"][0]["name"], "A");
        assert_eq!(json["attribute_lists"][1]["attribute"], "price");
        assert_eq!(json["blend"]["entries"].as_array().map(Vec::len), Some(3));
        assert_eq!(json["preferences"]["runs"], true);
    }

    #[test]
    fn test_write_to_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.txt");
        assert!(scenario_report().write(&path, ReportFormat::Text).is_err());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Attribute::Price, 99.5), "$99.50");
        assert_eq!(format_value(Attribute::PeakElevation, 3527.9), "3527 meters");
        assert_eq!(capitalise("elevation"), "Elevation");
    }
}
