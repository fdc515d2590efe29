//! Composite resort score computation.
//!
//! S(r) = Σ w_a × n_a(r) over the three attributes, where n_a is the
//! min-max normalised value (1.0 = preferred) and w_a the signed weight.
//!
//! [`CompositeScorer`] runs the four phases in order and refuses any call
//! whose predecessor has not completed:
//!
//! ```text
//! Uninitialized → PreferencesSet → Normalized → Scored → Ranked
//! ```

use std::fmt;

use serde::Serialize;
use summit_common::{Attribute, Direction, ResortTable};
use tracing::{debug, info};

use crate::error::{RankerError, Result};
use crate::normalise::{normalise_table, NormalizedTable};
use crate::ordering::{stable_order, take_top, TopN};
use crate::weights::{PreferenceVector, Preferences, WeightScheme};

// ── Phase ────────────────────────────────────────────────────────────────────

/// Progress of a [`CompositeScorer`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Phase {
    Uninitialized,
    PreferencesSet,
    Normalized,
    Scored,
    Ranked,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Uninitialized => "Uninitialized",
            Phase::PreferencesSet => "PreferencesSet",
            Phase::Normalized => "Normalized",
            Phase::Scored => "Scored",
            Phase::Ranked => "Ranked",
        };
        f.write_str(name)
    }
}

// ── Weighted summation ───────────────────────────────────────────────────────

/// Weighted contributions and total for one resort.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredRow {
    pub id: i64,
    pub run_count_contribution: f64,
    pub price_contribution: f64,
    pub peak_elevation_contribution: f64,
    pub total: f64,
}

impl ScoredRow {
    pub fn contribution(&self, attribute: Attribute) -> f64 {
        match attribute {
            Attribute::RunCount => self.run_count_contribution,
            Attribute::Price => self.price_contribution,
            Attribute::PeakElevation => self.peak_elevation_contribution,
        }
    }
}

/// Per-resort totals in table order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTable {
    pub rows: Vec<ScoredRow>,
}

/// Apply `weights` to every normalised row.
///
/// Totals are not clamped: with ±1/3 weights they lie in [-1, 1].
pub fn score(normalized: &NormalizedTable, weights: &PreferenceVector) -> Result<ScoredTable> {
    if normalized.is_empty() {
        return Err(RankerError::EmptyNormalizedInput);
    }
    let w_runs = weights.require(Attribute::RunCount)?;
    let w_price = weights.require(Attribute::Price)?;
    let w_elev = weights.require(Attribute::PeakElevation)?;

    let rows = normalized
        .rows
        .iter()
        .map(|n| {
            let run_count_contribution = w_runs * n.run_count;
            let price_contribution = w_price * n.price;
            let peak_elevation_contribution = w_elev * n.peak_elevation;
            ScoredRow {
                id: n.id,
                run_count_contribution,
                price_contribution,
                peak_elevation_contribution,
                total: run_count_contribution + price_contribution + peak_elevation_contribution,
            }
        })
        .collect();

    Ok(ScoredTable { rows })
}

// ── Ranking ──────────────────────────────────────────────────────────────────

/// One line of the final list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeEntry {
    pub rank: usize,
    pub id: i64,
    pub name: String,
    pub country: String,
    pub run_count: u32,
    pub price: f64,
    pub peak_elevation: f64,
    pub run_count_contribution: f64,
    pub price_contribution: f64,
    pub peak_elevation_contribution: f64,
    pub total_score: f64,
}

/// Final ordered list, rank 1 first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeRanking {
    pub weights: PreferenceVector,
    pub entries: Vec<CompositeEntry>,
}

impl CompositeRanking {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rank_of(&self, id: i64) -> Option<usize> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.rank)
    }

    /// First `n` entries; `n` beyond the list size is clamped with a warning.
    pub fn return_top(&self, n: usize) -> Result<TopN<'_, CompositeEntry>> {
        take_top(&self.entries, n, "composite")
    }
}

/// Sort `scored` by total descending, ties in table order.
pub fn rank(table: &ResortTable, scored: &ScoredTable, weights: &PreferenceVector) -> Result<CompositeRanking> {
    if scored.rows.is_empty() {
        return Err(RankerError::EmptyRanking);
    }
    if scored.rows.len() != table.len() {
        return Err(RankerError::TableMismatch);
    }
    let totals: Vec<f64> = scored.rows.iter().map(|r| r.total).collect();
    let order = stable_order(&totals, Direction::Descending);

    let rows = table.rows();
    let mut entries = Vec::with_capacity(order.len());
    for (pos, idx) in order.into_iter().enumerate() {
        let s = &scored.rows[idx];
        let resort = rows
            .get(idx)
            .filter(|r| r.id == s.id)
            .ok_or(RankerError::TableMismatch)?;
        entries.push(CompositeEntry {
            rank: pos + 1,
            id: resort.id,
            name: resort.name.clone(),
            country: resort.country.clone(),
            run_count: resort
                .run_count
                .ok_or(RankerError::MissingAttribute { attribute: Attribute::RunCount })?,
            price: resort
                .price
                .ok_or(RankerError::MissingAttribute { attribute: Attribute::Price })?,
            peak_elevation: resort
                .peak_elevation
                .ok_or(RankerError::MissingAttribute { attribute: Attribute::PeakElevation })?,
            run_count_contribution: s.run_count_contribution,
            price_contribution: s.price_contribution,
            peak_elevation_contribution: s.peak_elevation_contribution,
            total_score: s.total,
        });
    }

    Ok(CompositeRanking { weights: weights.clone(), entries })
}

// ── State machine ────────────────────────────────────────────────────────────

/// Sequential four-phase scorer over one resort table.
///
/// Each phase stores its output as a fresh value; callers only get shared
/// references or clones. Setting preferences again starts a new run.
#[derive(Debug, Clone)]
pub struct CompositeScorer {
    table: ResortTable,
    phase: Phase,
    weights: Option<PreferenceVector>,
    normalized: Option<NormalizedTable>,
    scored: Option<ScoredTable>,
    ranking: Option<CompositeRanking>,
}

impl CompositeScorer {
    pub fn new(table: ResortTable) -> Self {
        Self {
            table,
            phase: Phase::Uninitialized,
            weights: None,
            normalized: None,
            scored: None,
            ranking: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn table(&self) -> &ResortTable {
        &self.table
    }

    /// Phase (a): boolean preferences → ±1/3 weights.
    pub fn set_preferences(&mut self, run_pref: bool, price_pref: bool, elevation_pref: bool) -> &PreferenceVector {
        let prefs = Preferences::new(run_pref, price_pref, elevation_pref);
        debug!(?prefs, "Preferences set");
        self.install(PreferenceVector::from_preferences(prefs))
    }

    /// Phase (a) with explicit weights, validated against `scheme`.
    pub fn set_weights(&mut self, weights: PreferenceVector, scheme: WeightScheme) -> Result<&PreferenceVector> {
        weights.validate(scheme)?;
        Ok(self.install(weights))
    }

    fn install(&mut self, weights: PreferenceVector) -> &PreferenceVector {
        self.normalized = None;
        self.scored = None;
        self.ranking = None;
        self.phase = Phase::PreferencesSet;
        self.weights.insert(weights)
    }

    fn require(&self, operation: &'static str, required: Phase) -> Result<()> {
        if self.phase < required {
            return Err(RankerError::PhaseOrder { operation, required });
        }
        Ok(())
    }

    /// Phase (b).
    pub fn normalize(&mut self) -> Result<&NormalizedTable> {
        self.require("normalize", Phase::PreferencesSet)?;
        let normalized = normalise_table(&self.table)?;
        self.scored = None;
        self.ranking = None;
        self.phase = Phase::Normalized;
        info!(
            resorts = normalized.len(),
            degenerate = normalized.degenerate.len(),
            "Normalisation complete"
        );
        Ok(self.normalized.insert(normalized))
    }

    /// Phase (c).
    pub fn score(&mut self) -> Result<&ScoredTable> {
        self.require("score", Phase::Normalized)?;
        let (Some(normalized), Some(weights)) = (&self.normalized, &self.weights) else {
            return Err(RankerError::PhaseOrder { operation: "score", required: Phase::Normalized });
        };
        let scored = score(normalized, weights)?;
        self.ranking = None;
        self.phase = Phase::Scored;
        info!(resorts = scored.rows.len(), "Weighted sum computed");
        Ok(self.scored.insert(scored))
    }

    /// Phase (d).
    pub fn rank(&mut self) -> Result<&CompositeRanking> {
        self.require("rank", Phase::Scored)?;
        let (Some(scored), Some(weights)) = (&self.scored, &self.weights) else {
            return Err(RankerError::PhaseOrder { operation: "rank", required: Phase::Scored });
        };
        let ranking = rank(&self.table, scored, weights)?;
        self.phase = Phase::Ranked;
        info!(resorts = ranking.len(), "Final list developed");
        Ok(self.ranking.insert(ranking))
    }

    /// Leading `n` entries of the completed ranking.
    pub fn return_top(&self, n: usize) -> Result<TopN<'_, CompositeEntry>> {
        self.require("return_top", Phase::Ranked)?;
        match &self.ranking {
            Some(ranking) => ranking.return_top(n),
            None => Err(RankerError::PhaseOrder { operation: "return_top", required: Phase::Ranked }),
        }
    }

    pub fn weights(&self) -> Option<&PreferenceVector> {
        self.weights.as_ref()
    }

    pub fn normalized(&self) -> Option<&NormalizedTable> {
        self.normalized.as_ref()
    }

    pub fn scored(&self) -> Option<&ScoredTable> {
        self.scored.as_ref()
    }

    pub fn ranking(&self) -> Option<&CompositeRanking> {
        self.ranking.as_ref()
    }

    /// Consume the scorer, keeping only the final ranking.
    pub fn into_ranking(self) -> Option<CompositeRanking> {
        self.ranking
    }
}

/// All four phases on a fresh scorer.
pub fn run(table: &ResortTable, prefs: Preferences) -> Result<CompositeRanking> {
    let mut scorer = CompositeScorer::new(table.clone());
    scorer.set_preferences(prefs.runs, prefs.price, prefs.elevation);
    run_phases(scorer)
}

/// One ranking per weight vector. Each run uses its own scorer, so no
/// state is shared between runs.
pub fn score_batch(
    table: &ResortTable,
    vectors: &[PreferenceVector],
    scheme: WeightScheme,
) -> Result<Vec<CompositeRanking>> {
    vectors
        .iter()
        .map(|v| {
            let mut scorer = CompositeScorer::new(table.clone());
            scorer.set_weights(v.clone(), scheme)?;
            run_phases(scorer)
        })
        .collect()
}

fn run_phases(mut scorer: CompositeScorer) -> Result<CompositeRanking> {
    scorer.normalize()?;
    scorer.score()?;
    scorer.rank()?;
    scorer
        .into_ranking()
        .ok_or(RankerError::PhaseOrder { operation: "run", required: Phase::Ranked })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::THIRD;
    use pretty_assertions::assert_eq;
    use summit_common::ResortRecord;
    use summit_test_utils::fixtures;

    fn ids(ranking: &CompositeRanking) -> Vec<i64> {
        ranking.entries.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_scenario_ranking() {
        let ranking = run(&fixtures::scenario_table(), Preferences::new(true, true, true)).unwrap();
        // A and C tie at 2/3, A first by table order; B last at 1/3.
        assert_eq!(ids(&ranking), vec![1, 3, 2]);
        assert!((ranking.entries[0].total_score - 2.0 / 3.0).abs() < 1e-9);
        assert!((ranking.entries[1].total_score - 2.0 / 3.0).abs() < 1e-9);
        assert!((ranking.entries[2].total_score - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(ranking.entries[0].name, "A");
    }

    #[test]
    fn test_contributions_sum_to_total() {
        let ranking = run(&fixtures::scenario_table(), Preferences::new(true, false, true)).unwrap();
        for e in &ranking.entries {
            let sum = e.run_count_contribution + e.price_contribution + e.peak_elevation_contribution;
            assert!((sum - e.total_score).abs() < 1e-12);
        }
        // Price is penalised: A (priciest) has no price penalty.
        let a = ranking.entries.iter().find(|e| e.id == 1).unwrap();
        assert_eq!(a.price_contribution, 0.0);
        assert!((a.total_score - 2.0 * THIRD).abs() < 1e-9);
    }

    #[test]
    fn test_all_false_inverts_preference() {
        let ranking = run(&fixtures::scenario_table(), Preferences::new(false, false, false)).unwrap();
        // Totals: A = -2/3, B = -1/3, C = -2/3 → B first.
        assert_eq!(ids(&ranking), vec![2, 1, 3]);
        assert!(ranking.entries.iter().all(|e| e.total_score <= 0.0));
    }

    #[test]
    fn test_phase_order_enforced() {
        let mut scorer = CompositeScorer::new(fixtures::scenario_table());
        assert_eq!(scorer.phase(), Phase::Uninitialized);
        assert_eq!(
            scorer.normalize().unwrap_err(),
            RankerError::PhaseOrder { operation: "normalize", required: Phase::PreferencesSet }
        );
        assert_eq!(
            scorer.score().unwrap_err(),
            RankerError::PhaseOrder { operation: "score", required: Phase::Normalized }
        );
        assert_eq!(
            scorer.rank().unwrap_err(),
            RankerError::PhaseOrder { operation: "rank", required: Phase::Scored }
        );
        assert!(matches!(
            scorer.return_top(3),
            Err(RankerError::PhaseOrder { required: Phase::Ranked, .. })
        ));

        scorer.set_preferences(true, true, true);
        assert_eq!(
            scorer.score().unwrap_err(),
            RankerError::PhaseOrder { operation: "score", required: Phase::Normalized }
        );
        scorer.normalize().unwrap();
        assert_eq!(
            scorer.rank().unwrap_err(),
            RankerError::PhaseOrder { operation: "rank", required: Phase::Scored }
        );
        scorer.score().unwrap();
        scorer.rank().unwrap();
        assert_eq!(scorer.phase(), Phase::Ranked);
        assert_eq!(scorer.return_top(2).unwrap().len(), 2);
    }

    #[test]
    fn test_new_preferences_reset_downstream() {
        let mut scorer = CompositeScorer::new(fixtures::scenario_table());
        scorer.set_preferences(true, true, true);
        scorer.normalize().unwrap();
        scorer.score().unwrap();
        scorer.rank().unwrap();

        scorer.set_preferences(false, true, false);
        assert_eq!(scorer.phase(), Phase::PreferencesSet);
        assert!(scorer.normalized().is_none());
        assert!(scorer.scored().is_none());
        assert!(scorer.ranking().is_none());
    }

    #[test]
    fn test_set_weights_validates() {
        let mut scorer = CompositeScorer::new(fixtures::scenario_table());
        let bad = PreferenceVector::new()
            .with_weight(Attribute::RunCount, 0.5)
            .with_weight(Attribute::Price, 0.5);
        assert_eq!(
            scorer.set_weights(bad, WeightScheme::Normalised).unwrap_err(),
            RankerError::MissingWeight { attribute: Attribute::PeakElevation }
        );
        assert_eq!(scorer.phase(), Phase::Uninitialized);

        let good = PreferenceVector::general(0.6, 0.2, 0.2).unwrap();
        scorer.set_weights(good, WeightScheme::Normalised).unwrap();
        scorer.normalize().unwrap();
        let scored = scorer.score().unwrap();
        // A: 0.6*1 + 0.2*0 + 0.2*1
        assert!((scored.rows[0].total - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_score_rejects_missing_weight_and_empty_input() {
        let normalized = normalise_table(&fixtures::scenario_table()).unwrap();
        let partial = PreferenceVector::new()
            .with_weight(Attribute::RunCount, THIRD)
            .with_weight(Attribute::PeakElevation, THIRD);
        assert_eq!(
            score(&normalized, &partial).unwrap_err(),
            RankerError::MissingWeight { attribute: Attribute::Price }
        );

        let empty = NormalizedTable { rows: vec![], degenerate: vec![], ..normalized };
        let full = PreferenceVector::from_preferences(Preferences::new(true, true, true));
        assert_eq!(score(&empty, &full).unwrap_err(), RankerError::EmptyNormalizedInput);
    }

    #[test]
    fn test_empty_table_fails_at_normalize() {
        let mut scorer = CompositeScorer::new(ResortTable::default());
        scorer.set_preferences(true, true, true);
        assert_eq!(scorer.normalize().unwrap_err(), RankerError::EmptyInput);
        assert_eq!(scorer.phase(), Phase::PreferencesSet);
    }

    #[test]
    fn test_return_top_clamps_and_rejects_zero() {
        let ranking = run(&fixtures::scenario_table(), Preferences::new(true, true, true)).unwrap();
        let top = ranking.return_top(50).unwrap();
        assert_eq!(top.len(), 3);
        assert!(top.clamped);
        assert_eq!(ranking.return_top(0).unwrap_err(), RankerError::InvalidCount { n: 0 });
        let top = ranking.return_top(1).unwrap();
        assert_eq!(top.entries[0].id, 1);
        assert!(!top.clamped);
    }

    #[test]
    fn test_score_bounds_and_density_on_random_tables() {
        for seed in 0..20 {
            let table = fixtures::random_table(seed, 3 + seed as usize * 6);
            for prefs in Preferences::all_combinations() {
                let ranking = run(&table, prefs).unwrap();
                let mut ranks: Vec<usize> = ranking.entries.iter().map(|e| e.rank).collect();
                ranks.sort_unstable();
                assert_eq!(ranks, (1..=table.len()).collect::<Vec<_>>());
                for e in &ranking.entries {
                    assert!((-1.0..=1.0).contains(&e.total_score));
                }
                for pair in ranking.entries.windows(2) {
                    assert!(pair[0].total_score >= pair[1].total_score);
                }
            }
        }
    }

    #[test]
    fn test_idempotent_runs() {
        let table = fixtures::random_table(7, 40);
        let prefs = Preferences::new(true, false, true);
        let first = run(&table, prefs).unwrap();
        let second = run(&table, prefs).unwrap();
        assert_eq!(first, second);
        for (a, b) in first.entries.iter().zip(&second.entries) {
            assert_eq!(a.total_score.to_bits(), b.total_score.to_bits());
        }
    }

    #[test]
    fn test_score_batch_matches_individual_runs() {
        let table = fixtures::scenario_table();
        let combos = Preferences::all_combinations();
        let vectors: Vec<PreferenceVector> =
            combos.iter().map(|&p| PreferenceVector::from_preferences(p)).collect();
        let batch = score_batch(&table, &vectors, WeightScheme::Signed).unwrap();
        assert_eq!(batch.len(), 8);
        for (prefs, ranking) in combos.into_iter().zip(&batch) {
            assert_eq!(ranking, &run(&table, prefs).unwrap());
        }
    }

    #[test]
    fn test_ties_follow_table_order() {
        let table = ResortTable::new(vec![
            ResortRecord::new(9, "Late", "Canada", 10, 50.0, 1000.0),
            ResortRecord::new(4, "Early", "Canada", 10, 50.0, 1000.0),
        ])
        .unwrap();
        let ranking = run(&table, Preferences::new(true, true, true)).unwrap();
        assert_eq!(ids(&ranking), vec![9, 4]);
        assert_eq!(ranking.entries[0].total_score, 1.0);
    }
}
