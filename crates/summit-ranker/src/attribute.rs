//! Per-attribute rankings.
//!
//! Each attribute is ranked on its own: a stable sort by raw value in the
//! requested direction, then dense positions 1..N. Resorts with equal
//! values get consecutive positions in table order.

use serde::Serialize;
use summit_common::{Attribute, Direction, ResortTable};
use tracing::debug;

use crate::error::{RankerError, Result};
use crate::ordering::{attribute_column, stable_order, take_top, TopN};

/// One row of an attribute ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeRankEntry {
    pub rank: usize,
    pub id: i64,
    pub name: String,
    pub country: String,
    pub value: f64,
}

/// A table ordered by a single attribute, rank 1 first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeRanking {
    pub attribute: Attribute,
    pub direction: Direction,
    pub entries: Vec<AttributeRankEntry>,
}

impl AttributeRanking {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rank position of a resort, if present.
    pub fn rank_of(&self, id: i64) -> Option<usize> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.rank)
    }

    /// Leading `n` entries; see [`TopN`] for the clamping rule.
    pub fn top(&self, n: usize) -> Result<TopN<'_, AttributeRankEntry>> {
        take_top(&self.entries, n, self.attribute.key())
    }
}

/// Rank the table by `attribute` in `direction`.
pub fn rank_by(table: &ResortTable, attribute: Attribute, direction: Direction) -> Result<AttributeRanking> {
    if table.is_empty() {
        return Err(RankerError::EmptyTable);
    }
    let values = attribute_column(table, attribute)?;
    let order = stable_order(&values, direction);

    let rows = table.rows();
    let entries = order
        .into_iter()
        .enumerate()
        .map(|(pos, idx)| AttributeRankEntry {
            rank: pos + 1,
            id: rows[idx].id,
            name: rows[idx].name.clone(),
            country: rows[idx].country.clone(),
            value: values[idx],
        })
        .collect();

    debug!("Sorted by {} ({} order)", attribute, direction);

    Ok(AttributeRanking { attribute, direction, entries })
}

/// Rank by the attribute's preferred direction
/// (more runs, cheaper tickets, higher peaks first).
pub fn rank_by_default(table: &ResortTable, attribute: Attribute) -> Result<AttributeRanking> {
    rank_by(table, attribute, attribute.default_direction())
}

/// Rank from "I care" to "I don't care": `care == false` flips the
/// attribute's preferred direction.
pub fn rank_by_criteria(table: &ResortTable, attribute: Attribute, care: bool) -> Result<AttributeRanking> {
    let direction = if care {
        attribute.default_direction()
    } else {
        attribute.default_direction().reversed()
    };
    rank_by(table, attribute, direction)
}

/// The three default-direction rankings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeRankings {
    pub runs: AttributeRanking,
    pub price: AttributeRanking,
    pub elevation: AttributeRanking,
}

impl AttributeRankings {
    pub fn get(&self, attribute: Attribute) -> &AttributeRanking {
        match attribute {
            Attribute::RunCount => &self.runs,
            Attribute::Price => &self.price,
            Attribute::PeakElevation => &self.elevation,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeRanking> {
        [&self.runs, &self.price, &self.elevation].into_iter()
    }
}

pub fn rank_all(table: &ResortTable) -> Result<AttributeRankings> {
    Ok(AttributeRankings {
        runs: rank_by_default(table, Attribute::RunCount)?,
        price: rank_by_default(table, Attribute::Price)?,
        elevation: rank_by_default(table, Attribute::PeakElevation)?,
    })
}
