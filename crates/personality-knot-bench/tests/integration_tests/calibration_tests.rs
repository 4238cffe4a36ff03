//! Threshold search and weight search on controlled inputs.

use personality_knot_bench::datasets::{GroundTruthLabel, GroundTruthSet};
use personality_knot_bench::tuning::{EnhancedGrid, ThresholdGrid, ThresholdSearch, WeightOptimizer};
use personality_knot_core::{EnhancedWeights, MatchingConfig, TraitProfile};

#[test]
fn test_separable_scores_reach_full_accuracy() {
    let scores = [0.05, 0.12, 0.31, 0.44, 0.58, 0.71, 0.86, 0.97];
    let labels = [false, false, false, false, true, true, true, true];
    let result = ThresholdSearch::default().search(&scores, &labels);

    assert_eq!(result.accuracy, 1.0);
    assert!(result.threshold > 0.44 && result.threshold <= 0.58);
    assert_eq!(result.roc_auc(), Some(1.0));
    let roc = result.roc.unwrap();
    assert_eq!(roc.youden_j, 1.0);
    assert_eq!(roc.youden_accuracy, 1.0);
}

#[test]
fn test_ties_resolve_to_lowest_threshold() {
    // every grid point above 0.3 and up to 0.7 separates the same way
    let scores = [0.3, 0.7];
    let labels = [false, true];
    let result = ThresholdSearch::new(ThresholdGrid::new(0.1, 0.9, 0.1)).search(&scores, &labels);
    assert_eq!(result.accuracy, 1.0);
    assert!((result.threshold - 0.4).abs() < 1e-9);
}

fn near_identical_population() -> Vec<TraitProfile> {
    (0..6)
        .map(|i| TraitProfile::uniform(format!("p{}", i), 0.48 + 0.01 * i as f64))
        .collect()
}

fn all_compatible(profiles: &[TraitProfile]) -> GroundTruthSet {
    uniform_labels(profiles, true)
}

fn uniform_labels(profiles: &[TraitProfile], is_compatible: bool) -> GroundTruthSet {
    let mut labels = Vec::new();
    for (i, a) in profiles.iter().enumerate() {
        for b in &profiles[i + 1..] {
            labels.push(GroundTruthLabel {
                id_a: a.id().to_string(),
                id_b: b.id().to_string(),
                is_compatible,
                compatibility_score: if is_compatible { 0.9 } else { 0.1 },
                true_compatibility: None,
            });
        }
    }
    GroundTruthSet::from_labels(labels)
}

#[test]
fn test_weight_search_ties_keep_baseline() {
    let profiles = near_identical_population();
    let gt = all_compatible(&profiles);
    let optimizer = WeightOptimizer::new(MatchingConfig::default(), ThresholdGrid::default());

    let results = optimizer.optimize_enhanced(&profiles, &gt);
    assert_eq!(results.num_pairs, 15);
    assert!(results.all_results.iter().all(|r| r.accuracy == 1.0));
    assert!(results.baseline_won);
    assert_eq!(results.best.params, EnhancedWeights::default());
    assert_eq!(results.improvement_pct, 0.0);
}

#[test]
fn test_weight_search_candidate_order_is_lexicographic() {
    let grid = EnhancedGrid {
        quantum: vec![0.6, 0.5],
        archetype: vec![0.2],
        value: vec![0.2, 0.1],
    };
    let profiles = near_identical_population();
    let gt = all_compatible(&profiles);
    let results = WeightOptimizer::new(MatchingConfig::default(), ThresholdGrid::default())
        .with_enhanced_grid(grid)
        .optimize_enhanced(&profiles, &gt);

    let order: Vec<(f64, f64)> = results
        .all_results
        .iter()
        .map(|r| (r.params.quantum, r.params.value))
        .collect();
    assert_eq!(order, vec![(0.5, 0.1), (0.5, 0.2), (0.6, 0.1), (0.6, 0.2)]);
}

#[test]
fn test_weight_search_tied_candidates_pick_lexicographic_first() {
    // Both tuples normalize to (0.1, 0.8, 0.1), so their accuracies tie.
    // Axes are given descending to rule out insertion order.
    let grid = EnhancedGrid {
        quantum: vec![0.1, 0.05],
        archetype: vec![0.8, 0.4],
        value: vec![0.1, 0.05],
    };
    let profiles = near_identical_population();
    let gt = uniform_labels(&profiles, false);
    // Archetype-heavy weights fuse below 0.95; the defaults fuse above 0.97.
    let results = WeightOptimizer::new(MatchingConfig::default(), ThresholdGrid::new(0.90, 0.96, 0.01))
        .with_enhanced_grid(grid)
        .optimize_enhanced(&profiles, &gt);

    assert_eq!(results.baseline.accuracy, 0.0);
    assert!(!results.baseline_won);
    assert_eq!(results.best.accuracy, 1.0);
    assert_eq!(results.best.params, EnhancedWeights::new(0.05, 0.4, 0.05));
    assert_eq!(results.all_results[0].params, EnhancedWeights::new(0.05, 0.4, 0.05));
}
