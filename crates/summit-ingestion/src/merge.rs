//! Outer merge of the three organised sources on `Resort ID`.

use std::collections::BTreeMap;

use summit_common::{Attribute, Result};
use tracing::{debug, warn};

use crate::reader::RawSource;

pub const ID_COLUMN: &str = "Resort ID";
pub const NAME_COLUMN: &str = "Resort";
pub const COUNTRY_COLUMN: &str = "Country";

/// A merged resort before cleanup. Attribute values may still be missing
/// or negative.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedResort {
    pub id: i64,
    pub name: Option<String>,
    pub country: Option<String>,
    pub run_count: Option<f64>,
    pub price: Option<f64>,
    pub peak_elevation: Option<f64>,
}

impl MergedResort {
    fn new(id: i64) -> Self {
        Self { id, ..Default::default() }
    }

    pub fn value(&self, attribute: Attribute) -> Option<f64> {
        match attribute {
            Attribute::RunCount => self.run_count,
            Attribute::Price => self.price,
            Attribute::PeakElevation => self.peak_elevation,
        }
    }

    fn slot(&mut self, attribute: Attribute) -> &mut Option<f64> {
        match attribute {
            Attribute::RunCount => &mut self.run_count,
            Attribute::Price => &mut self.price,
            Attribute::PeakElevation => &mut self.peak_elevation,
        }
    }

    pub fn missing(&self) -> Vec<Attribute> {
        Attribute::ALL
            .iter()
            .copied()
            .filter(|&a| self.value(a).is_none())
            .collect()
    }
}

/// Merge result, ordered by resort id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedSources {
    pub resorts: Vec<MergedResort>,
    /// Ids that appeared more than once within one source with different
    /// content. The first row wins; validation reports these.
    pub conflicting_ids: Vec<i64>,
}

/// Outer-merge the run-count, price and elevation sources.
///
/// Name and country are taken from the first source that carries them.
/// Blank run counts inside the run-count source count as zero runs; blank
/// elevations inside the elevation source take that source's mean. Resorts
/// absent from a source keep the attribute missing for [`crate::clean`].
pub fn merge_sources(runs: &RawSource, prices: &RawSource, elevation: &RawSource) -> Result<MergedSources> {
    let mut merged: BTreeMap<i64, MergedResort> = BTreeMap::new();
    let mut conflicting_ids = Vec::new();

    let sources = [
        (runs, Attribute::RunCount),
        (prices, Attribute::Price),
        (elevation, Attribute::PeakElevation),
    ];

    for (source, attribute) in sources {
        let id_col = source.require_column(ID_COLUMN)?;
        let value_col = source.require_column(attribute.column_name())?;
        let name_col = source.column(NAME_COLUMN);
        let country_col = source.column(COUNTRY_COLUMN);

        let blank_fill = match attribute {
            Attribute::RunCount => Some(0.0),
            Attribute::PeakElevation => source_mean(source, value_col),
            Attribute::Price => None,
        };

        let mut seen_here = BTreeMap::new();
        for row in &source.rows {
            let Some(id) = source.cell(row, id_col).and_then(parse_id) else {
                warn!(source = %source.name, "Skipping row without a usable Resort ID: {:?}", row);
                continue;
            };

            let value = match source.cell(row, value_col) {
                Some(raw) => match raw.parse::<f64>() {
                    Ok(v) if v.is_finite() => Some(v),
                    _ => {
                        warn!(source = %source.name, id, "Unreadable {} value {:?}", attribute, raw);
                        None
                    }
                },
                None => blank_fill,
            };

            if let Some(previous) = seen_here.insert(id, row) {
                if previous != row {
                    warn!(source = %source.name, id, "Resort ID appears more than once, keeping the first row");
                    conflicting_ids.push(id);
                }
                seen_here.insert(id, previous);
                continue;
            }

            let resort = merged.entry(id).or_insert_with(|| MergedResort::new(id));
            if resort.name.is_none() {
                resort.name = name_col.and_then(|c| source.cell(row, c)).map(str::to_string);
            }
            if resort.country.is_none() {
                resort.country = country_col.and_then(|c| source.cell(row, c)).map(str::to_string);
            }
            *resort.slot(attribute) = value;
        }
        debug!(source = %source.name, "Merged {} rows for {}", seen_here.len(), attribute);
    }

    let resorts: Vec<MergedResort> = merged.into_values().collect();
    for resort in &resorts {
        let missing = resort.missing();
        if !missing.is_empty() {
            let names: Vec<String> = missing.iter().map(|a| a.to_string()).collect();
            warn!(id = resort.id, "Resort is missing {}", names.join(", "));
        }
    }

    conflicting_ids.sort_unstable();
    conflicting_ids.dedup();
    Ok(MergedSources { resorts, conflicting_ids })
}

/// Ids are integers, but spreadsheet exports sometimes write `12.0`.
fn parse_id(raw: &str) -> Option<i64> {
    if let Ok(id) = raw.parse::<i64>() {
        return Some(id);
    }
    let f = raw.parse::<f64>().ok()?;
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}

fn source_mean(source: &RawSource, col: usize) -> Option<f64> {
    let values: Vec<f64> = source
        .rows
        .iter()
        .filter_map(|row| source.cell(row, col))
        .filter_map(|raw| raw.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
