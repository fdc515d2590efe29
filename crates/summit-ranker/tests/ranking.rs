use summit_common::{Attribute, Direction};
use summit_ranker::weights::THIRD;
use summit_ranker::{
    blend_rankings, rank_all, rank_by_criteria, run, score_batch, CompositeScorer, Phase, PreferenceVector,
    Preferences, RankerError, WeightScheme,
};
use summit_test_utils::assert_eq;
use summit_test_utils::fixtures;

#[test]
fn every_preference_combination_ranks_all_resorts() {
    let table = fixtures::sample_table();
    for prefs in Preferences::all_combinations() {
        let ranking = run(&table, prefs).unwrap();
        assert_eq!(ranking.len(), table.len());
        let ranks: Vec<usize> = ranking.entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, (1..=table.len()).collect::<Vec<_>>());
        for entry in &ranking.entries {
            assert!(entry.total_score >= -1.0 && entry.total_score <= 1.0);
        }
    }
}

#[test]
fn inverted_preferences_reverse_distinct_scores() {
    let table = fixtures::sample_table();
    let all = run(&table, Preferences::new(true, true, true)).unwrap();
    let none = run(&table, Preferences::new(false, false, false)).unwrap();
    for entry in &all.entries {
        let mirrored = none.entries.iter().find(|e| e.id == entry.id).unwrap();
        assert!((entry.total_score + mirrored.total_score).abs() < 1e-9);
    }
}

#[test]
fn scorer_walkthrough_on_sample_table() {
    let mut scorer = CompositeScorer::new(fixtures::sample_table());
    assert_eq!(
        scorer.normalize().unwrap_err(),
        RankerError::PhaseOrder { operation: "normalize", required: Phase::PreferencesSet }
    );

    scorer.set_preferences(true, true, false);
    scorer.normalize().unwrap();
    scorer.score().unwrap();
    scorer.rank().unwrap();
    assert_eq!(scorer.phase(), Phase::Ranked);

    let top = scorer.return_top(3).unwrap();
    assert_eq!(top.len(), 3);
    assert!(!top.clamped);

    let all = scorer.return_top(50).unwrap();
    assert_eq!(all.len(), 5);
    assert!(all.clamped);
}

#[test]
fn criteria_flip_direction() {
    let table = fixtures::sample_table();
    let cheap = rank_by_criteria(&table, Attribute::Price, true).unwrap();
    assert_eq!(cheap.direction, Direction::Ascending);
    assert_eq!(cheap.entries[0].name, "Mad River Glen");

    let pricey = rank_by_criteria(&table, Attribute::Price, false).unwrap();
    assert_eq!(pricey.direction, Direction::Descending);
    assert_eq!(pricey.entries[0].name, "Vail");
}

#[test]
fn batch_matches_individual_runs() {
    let table = fixtures::random_table(11, 25);
    let vectors: Vec<PreferenceVector> = Preferences::all_combinations()
        .into_iter()
        .map(PreferenceVector::from_preferences)
        .collect();
    let batch = score_batch(&table, &vectors, WeightScheme::Signed).unwrap();
    for (prefs, ranking) in Preferences::all_combinations().into_iter().zip(&batch) {
        assert_eq!(&run(&table, prefs).unwrap(), ranking);
    }
}

#[test]
fn blend_over_precomputed_rankings() {
    let table = fixtures::sample_table();
    let rankings = rank_all(&table).unwrap();
    let weights = PreferenceVector::general(THIRD, THIRD, THIRD).unwrap();
    let blended = blend_rankings(&rankings, &weights, 2).unwrap();
    assert!(blended.len() >= 2 && blended.len() <= 6);
    for pair in blended.entries.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn ranking_serialises_with_attribute_keys() {
    let ranking = run(&fixtures::scenario_table(), Preferences::new(true, true, true)).unwrap();
    let json = serde_json::to_value(&ranking).unwrap();
    assert_eq!(json["entries"][0]["id"], 1);
    assert!(json["weights"]["weights"]["price"].as_f64().unwrap() > 0.0);
}
