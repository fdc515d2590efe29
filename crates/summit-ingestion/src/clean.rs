//! Cleanup of merged resorts: absolute values, median/mode fills,
//! truncated run counts.

use std::collections::HashMap;

use summit_common::{Attribute, ResortRecord};
use tracing::{debug, info};

use crate::merge::MergedResort;

/// Median of the present values, `None` when there are none.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Most frequent value; ties go to the lexically smallest.
pub fn mode<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then_with(|| b.cmp(a)))
        .map(|(v, _)| v.to_string())
}

/// Run counts are whole numbers; fractional parts are dropped.
fn whole_if_count(attribute: Attribute, value: f64) -> f64 {
    match attribute {
        Attribute::RunCount => value.trunc(),
        _ => value,
    }
}

/// Fill holes and fix signs.
///
/// Attributes with no values at all stay missing and are caught by
/// validation.
pub fn clean(resorts: Vec<MergedResort>) -> Vec<ResortRecord> {
    let medians: HashMap<Attribute, Option<f64>> = Attribute::ALL
        .iter()
        .map(|&a| {
            let present: Vec<f64> = resorts
                .iter()
                .filter_map(|r| r.value(a))
                .map(|v| whole_if_count(a, v.abs()))
                .collect();
            (a, median(&present))
        })
        .collect();
    let name_mode = mode(resorts.iter().filter_map(|r| r.name.as_deref()));
    let country_mode = mode(resorts.iter().filter_map(|r| r.country.as_deref()));

    let mut filled = 0usize;
    let mut flipped = 0usize;
    let mut fill = |resort: &MergedResort, attribute: Attribute| -> Option<f64> {
        match resort.value(attribute) {
            Some(v) => {
                if v < 0.0 {
                    flipped += 1;
                }
                Some(whole_if_count(attribute, v.abs()))
            }
            None => {
                let m = medians.get(&attribute).copied().flatten();
                if m.is_some() {
                    filled += 1;
                }
                m
            }
        }
    };

    let records: Vec<ResortRecord> = resorts
        .iter()
        .map(|r| ResortRecord {
            id: r.id,
            name: r.name.clone().or_else(|| name_mode.clone()).unwrap_or_default(),
            country: r.country.clone().or_else(|| country_mode.clone()).unwrap_or_default(),
            run_count: fill(r, Attribute::RunCount).map(|v| v.trunc() as u32),
            price: fill(r, Attribute::Price),
            peak_elevation: fill(r, Attribute::PeakElevation),
        })
        .collect();

    debug!("Filled {} missing values, flipped {} negative values", filled, flipped);
    info!("Cleaned {} resorts", records.len());
    records
}
