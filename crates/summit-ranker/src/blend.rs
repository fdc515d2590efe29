//! Rank blend: merge the top of each attribute ranking with non-negative
//! weights that sum to 1.0.
//!
//! Each resort in the union of the three top-`n` lists scores
//!
//! ```text
//! B(r) = Σ w_a × (max_rank_a − rank_a(r) + 1) / max_rank_a
//! ```
//!
//! where `max_rank_a` is the largest rank of attribute `a` among the union.
//! Every attribute is divided by its own bound.

use std::collections::HashSet;

use serde::Serialize;
use summit_common::{Attribute, Direction, ResortTable};
use tracing::info;

use crate::attribute::{rank_all, AttributeRankings};
use crate::error::{RankerError, Result};
use crate::normalise::rank_score;
use crate::ordering::{stable_order, take_top, TopN};
use crate::weights::{PreferenceVector, WeightScheme};

/// One line of a blended list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlendEntry {
    pub rank: usize,
    pub id: i64,
    pub name: String,
    pub country: String,
    pub run_count_rank: usize,
    pub price_rank: usize,
    pub peak_elevation_rank: usize,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlendRanking {
    pub weights: PreferenceVector,
    pub entries: Vec<BlendEntry>,
}

impl BlendRanking {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn return_top(&self, n: usize) -> Result<TopN<'_, BlendEntry>> {
        take_top(&self.entries, n, "blended")
    }
}

/// Blend the top-`n` of each default attribute ranking.
///
/// `weights` must satisfy [`WeightScheme::Normalised`].
pub fn blend(table: &ResortTable, weights: &PreferenceVector, n: usize) -> Result<BlendRanking> {
    weights.validate(WeightScheme::Normalised)?;
    let rankings = rank_all(table)?;
    blend_rankings(&rankings, weights, n)
}

/// Same as [`blend`] over rankings that were already computed.
pub fn blend_rankings(rankings: &AttributeRankings, weights: &PreferenceVector, n: usize) -> Result<BlendRanking> {
    weights.validate(WeightScheme::Normalised)?;

    // Union of the three heads, first occurrence wins (runs → price → elevation).
    let mut seen = HashSet::new();
    let mut members = Vec::new();
    for ranking in rankings.iter() {
        for entry in ranking.top(n)?.iter() {
            if seen.insert(entry.id) {
                members.push(entry);
            }
        }
    }

    let rank_in = |attribute: Attribute, id: i64| -> Result<usize> {
        rankings
            .get(attribute)
            .rank_of(id)
            .ok_or(RankerError::MissingAttribute { attribute })
    };

    let mut rows = Vec::with_capacity(members.len());
    for m in &members {
        rows.push([
            rank_in(Attribute::RunCount, m.id)?,
            rank_in(Attribute::Price, m.id)?,
            rank_in(Attribute::PeakElevation, m.id)?,
        ]);
    }

    let mut max_rank = [0usize; 3];
    for r in &rows {
        for (i, &rank) in r.iter().enumerate() {
            max_rank[i] = max_rank[i].max(rank);
        }
    }

    let w = [
        weights.require(Attribute::RunCount)?,
        weights.require(Attribute::Price)?,
        weights.require(Attribute::PeakElevation)?,
    ];
    let scores: Vec<f64> = rows
        .iter()
        .map(|r| (0..3).map(|i| w[i] * rank_score(r[i], max_rank[i])).sum::<f64>())
        .collect();

    let entries: Vec<BlendEntry> = stable_order(&scores, Direction::Descending)
        .into_iter()
        .enumerate()
        .map(|(pos, idx)| BlendEntry {
            rank: pos + 1,
            id: members[idx].id,
            name: members[idx].name.clone(),
            country: members[idx].country.clone(),
            run_count_rank: rows[idx][0],
            price_rank: rows[idx][1],
            peak_elevation_rank: rows[idx][2],
            score: scores[idx],
        })
        .collect();

    info!("Final ranked list of top {} resorts constructed", entries.len());

    Ok(BlendRanking { weights: weights.clone(), entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::THIRD;
    use summit_common::ResortRecord;
    use summit_test_utils::fixtures;

    fn equal_weights() -> PreferenceVector {
        PreferenceVector::general(THIRD, THIRD, THIRD).unwrap()
    }

    #[test]
    fn test_blend_scenario_full_union() {
        // Ranks: runs A1 B2 C3, price B1 C2 A3, elevation A1 C2 B3.
        let ranking = blend(&fixtures::scenario_table(), &equal_weights(), 10).unwrap();
        let ids: Vec<i64> = ranking.entries.iter().map(|e| e.id).collect();
        // A: (3+1+3)/9, B: (2+3+1)/9, C: (1+2+2)/9
        assert_eq!(ids, vec![1, 2, 3]);
        assert!((ranking.entries[0].score - 7.0 / 9.0).abs() < 1e-9);
        assert!((ranking.entries[2].score - 5.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_each_attribute_uses_its_own_bound() {
        let table = ResortTable::new(vec![
            ResortRecord::new(1, "Big", "Canada", 100, 90.0, 3500.0),
            ResortRecord::new(2, "Cheap", "Canada", 10, 20.0, 1000.0),
            ResortRecord::new(3, "Mid", "Canada", 50, 50.0, 2000.0),
            ResortRecord::new(4, "Low", "Canada", 5, 95.0, 500.0),
        ])
        .unwrap();
        let weights = PreferenceVector::general(0.0, 0.0, 1.0).unwrap();
        // Top-1 of each list: runs→1, price→2, elevation→1. Union = {1, 2}.
        let ranking = blend(&table, &weights, 1).unwrap();
        assert_eq!(ranking.len(), 2);
        // Elevation ranks in union: Big 1, Cheap 3 → max 3.
        let big = &ranking.entries[0];
        assert_eq!(big.id, 1);
        assert!((big.score - 1.0).abs() < 1e-12);
        let cheap = &ranking.entries[1];
        assert_eq!(cheap.peak_elevation_rank, 3);
        assert!((cheap.score - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_blend_rejects_signed_weights() {
        let signed = PreferenceVector::from_preferences(crate::weights::Preferences::new(true, false, true));
        assert!(matches!(
            blend(&fixtures::scenario_table(), &signed, 5),
            Err(RankerError::NegativeWeight { .. })
        ));
    }

    #[test]
    fn test_blend_rejects_zero_count() {
        assert_eq!(
            blend(&fixtures::scenario_table(), &equal_weights(), 0).unwrap_err(),
            RankerError::InvalidCount { n: 0 }
        );
    }

    #[test]
    fn test_blend_ranks_dense() {
        let table = fixtures::random_table(3, 60);
        let ranking = blend(&table, &equal_weights(), 10).unwrap();
        let ranks: Vec<usize> = ranking.entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, (1..=ranking.len()).collect::<Vec<_>>());
        assert!(ranking.len() >= 10 && ranking.len() <= 30);
    }
}
