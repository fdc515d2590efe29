//! Core entity types shared by ingestion, ranking and reporting.
//! A `ResortTable` is the in-memory contract between the ingestion
//! pipeline and the ranking engine.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SummitError};

// ---------------------------------------------------------------------------
// Attribute
// ---------------------------------------------------------------------------

/// The three comparable resort attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    RunCount,
    Price,
    PeakElevation,
}

impl Attribute {
    /// All attributes in canonical order (runs, price, elevation).
    pub const ALL: [Attribute; 3] = [Attribute::RunCount, Attribute::Price, Attribute::PeakElevation];

    /// Column header used by the raw CSV sources and the processed table.
    pub fn column_name(self) -> &'static str {
        match self {
            Attribute::RunCount => "Run Count",
            Attribute::Price => "Price (USD)",
            Attribute::PeakElevation => "Peak Elevation (m)",
        }
    }

    /// Short key (`runs`, `price`, `elevation`), also accepted by `FromStr`.
    pub fn key(self) -> &'static str {
        match self {
            Attribute::RunCount => "runs",
            Attribute::Price => "price",
            Attribute::PeakElevation => "elevation",
        }
    }

    /// Whether a larger raw value is more desirable.
    /// Price is the only attribute where cheaper wins.
    pub fn higher_is_better(self) -> bool {
        !matches!(self, Attribute::Price)
    }

    /// Direction that ranks the preferred end first.
    pub fn default_direction(self) -> Direction {
        if self.higher_is_better() {
            Direction::Descending
        } else {
            Direction::Ascending
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Attribute {
    type Err = SummitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "runs" | "run_count" | "run count" => Ok(Attribute::RunCount),
            "price" | "price (usd)" => Ok(Attribute::Price),
            "elevation" | "peak_elevation" | "peak elevation (m)" => Ok(Attribute::PeakElevation),
            other => Err(SummitError::Config(format!(
                "unknown attribute '{other}', choose between 'runs', 'price' and 'elevation'"
            ))),
        }
    }
}

/// Sort direction for a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Lower values rank first.
    Ascending,
    /// Higher values rank first.
    Descending,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Ascending => f.write_str("ascending"),
            Direction::Descending => f.write_str("descending"),
        }
    }
}

// ---------------------------------------------------------------------------
// Resort
// ---------------------------------------------------------------------------

/// One row of the resort table.
///
/// Attribute fields are optional so that the ingestion merge can represent
/// holes; the ranking engine rejects a table where any of them is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResortRecord {
    #[serde(rename = "Resort ID")]
    pub id: i64,
    #[serde(rename = "Resort")]
    pub name: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Run Count")]
    pub run_count: Option<u32>,
    #[serde(rename = "Price (USD)")]
    pub price: Option<f64>,
    #[serde(rename = "Peak Elevation (m)")]
    pub peak_elevation: Option<f64>,
}

impl ResortRecord {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        country: impl Into<String>,
        run_count: u32,
        price: f64,
        peak_elevation: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            country: country.into(),
            run_count: Some(run_count),
            price: Some(price),
            peak_elevation: Some(peak_elevation),
        }
    }

    /// Attribute value as `f64`, `None` when the cell is empty.
    pub fn value(&self, attribute: Attribute) -> Option<f64> {
        match attribute {
            Attribute::RunCount => self.run_count.map(f64::from),
            Attribute::Price => self.price,
            Attribute::PeakElevation => self.peak_elevation,
        }
    }

    /// True when all three attributes are present.
    pub fn is_complete(&self) -> bool {
        Attribute::ALL.iter().all(|&a| self.value(a).is_some())
    }
}

// ---------------------------------------------------------------------------
// Resort table
// ---------------------------------------------------------------------------

/// Ordered, immutable collection of resorts with unique identifiers.
///
/// Row order is significant: every ranking breaks ties by it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResortTable {
    rows: Vec<ResortRecord>,
}

impl ResortTable {
    /// Build a table, rejecting duplicate identifiers.
    pub fn new(rows: Vec<ResortRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(rows.len());
        for row in &rows {
            if !seen.insert(row.id) {
                return Err(SummitError::DuplicateId(row.id));
            }
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[ResortRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&ResortRecord> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Full column of one attribute in row order.
    /// Returns `None` if any row is missing the value.
    pub fn column(&self, attribute: Attribute) -> Option<Vec<f64>> {
        self.rows.iter().map(|r| r.value(attribute)).collect()
    }

}
