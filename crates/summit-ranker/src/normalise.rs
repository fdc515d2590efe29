//! Score normalisation functions.
//!
//! Min-max normalisation maps every attribute onto [0, 1] where 1.0 is
//! always the preferred end: cheaper tickets, more runs, higher peaks.

use serde::Serialize;
use summit_common::{Attribute, ResortTable};
use tracing::{debug, warn};

use crate::error::{RankerError, Result};
use crate::ordering::attribute_column;

/// Min-max normalisation of a single value within [min_val, max_val].
///
/// `higher_is_better == false` inverts the scale so the minimum maps to 1.0.
/// A zero-width range carries no information and maps to 1.0.
pub fn minmax_normalise(value: f64, min_val: f64, max_val: f64, higher_is_better: bool) -> f64 {
    let range = max_val - min_val;
    if range == 0.0 {
        return 1.0;
    }
    let n = if higher_is_better {
        (value - min_val) / range
    } else {
        (max_val - value) / range
    };
    n.clamp(0.0, 1.0)
}

/// Rank-based score: rank 1 of `max_rank` → 1.0, rank `max_rank` → 1/max_rank.
pub fn rank_score(rank: usize, max_rank: usize) -> f64 {
    if max_rank == 0 {
        return 0.0;
    }
    (max_rank as f64 - rank as f64 + 1.0) / max_rank as f64
}

/// Observed range of one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    fn of(values: &[f64]) -> Self {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self { min, max }
    }

    /// No variance across the table.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

/// Normalised attribute values for one resort, all in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedRow {
    pub id: i64,
    pub run_count: f64,
    pub price: f64,
    pub peak_elevation: f64,
}

impl NormalizedRow {
    pub fn get(&self, attribute: Attribute) -> f64 {
        match attribute {
            Attribute::RunCount => self.run_count,
            Attribute::Price => self.price,
            Attribute::PeakElevation => self.peak_elevation,
        }
    }
}

/// Normalised view of a resort table, in table order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTable {
    pub rows: Vec<NormalizedRow>,
    pub run_count_bounds: Bounds,
    pub price_bounds: Bounds,
    pub peak_elevation_bounds: Bounds,
    /// Attributes with zero variance (every value normalised to 1.0).
    pub degenerate: Vec<Attribute>,
}

impl NormalizedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn bounds(&self, attribute: Attribute) -> Bounds {
        match attribute {
            Attribute::RunCount => self.run_count_bounds,
            Attribute::Price => self.price_bounds,
            Attribute::PeakElevation => self.peak_elevation_bounds,
        }
    }

    /// One attribute's normalised column in table order.
    pub fn column(&self, attribute: Attribute) -> Vec<f64> {
        self.rows.iter().map(|r| r.get(attribute)).collect()
    }
}

/// Normalise every attribute of `table`.
///
/// Zero-variance attributes are reported at warn level and recorded in
/// [`NormalizedTable::degenerate`].
pub fn normalise_table(table: &ResortTable) -> Result<NormalizedTable> {
    if table.is_empty() {
        return Err(RankerError::EmptyInput);
    }

    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(Attribute::ALL.len());
    let mut bounds: Vec<Bounds> = Vec::with_capacity(Attribute::ALL.len());
    let mut degenerate = Vec::new();

    for attribute in Attribute::ALL {
        let raw = attribute_column(table, attribute)?;
        let b = Bounds::of(&raw);
        if b.is_degenerate() {
            warn!(
                attribute = attribute.key(),
                value = b.min,
                "Every resort shares the same {}; normalising all to 1.0",
                attribute
            );
            degenerate.push(attribute);
        }
        let normed = raw
            .iter()
            .map(|&v| minmax_normalise(v, b.min, b.max, attribute.higher_is_better()))
            .collect();
        columns.push(normed);
        bounds.push(b);
    }

    let rows = table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, r)| NormalizedRow {
            id: r.id,
            run_count: columns[0][i],
            price: columns[1][i],
            peak_elevation: columns[2][i],
        })
        .collect();

    debug!("Normalised {} resorts", table.len());

    Ok(NormalizedTable {
        rows,
        run_count_bounds: bounds[0],
        price_bounds: bounds[1],
        peak_elevation_bounds: bounds[2],
        degenerate,
    })
}
