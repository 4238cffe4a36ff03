//! Cluster separation: near-identical profiles must outscore every pair that
//! involves a dissimilar profile, for every fusion strategy and topology mode.

use personality_knot_core::{FusionStrategy, MatchingConfig, PairScorer, TopologicalMode, TraitProfile};

use super::helpers::{block_profile, block_profile_with, near_neutral, shifted, NEAR_SKEWED};

/// Pairwise deltas within the near cluster stay below 0.02.
const OFFSET: f64 = 0.009;

fn six_profiles() -> Vec<TraitProfile> {
    vec![
        near_neutral("near_0", 0.0),
        near_neutral("near_1", OFFSET),
        near_neutral("near_2", -OFFSET),
        block_profile("far_0", 0),
        block_profile("far_1", 1),
        block_profile("far_2", 2),
    ]
}

fn skewed_profiles() -> Vec<TraitProfile> {
    vec![
        shifted("near_0", &NEAR_SKEWED, 0.0),
        shifted("near_1", &NEAR_SKEWED, OFFSET),
        shifted("near_2", &NEAR_SKEWED, -OFFSET),
        block_profile_with("far_0", 0, 0.95),
        block_profile_with("far_1", 1, 0.95),
        block_profile_with("far_2", 2, 0.95),
    ]
}

fn assert_separated(config: MatchingConfig) {
    assert_separated_on(config, &six_profiles());
}

fn assert_separated_on(config: MatchingConfig, profiles: &[TraitProfile]) {
    let label = format!("{} / {}", config.fusion.key(), config.topological_mode.as_str());
    let scorer = PairScorer::new(config);
    let prepared = scorer.prepare_all(profiles);
    let scored = scorer.score_all_pairs(&prepared);

    let within: Vec<f64> = scored
        .iter()
        .filter(|(i, j, _)| *i < 3 && *j < 3)
        .map(|(_, _, s)| s.fused)
        .collect();
    let across: Vec<f64> = scored
        .iter()
        .filter(|(_, j, _)| *j >= 3)
        .map(|(_, _, s)| s.fused)
        .collect();

    assert_eq!(within.len(), 3);
    assert_eq!(across.len(), 12);

    let min_within = within.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_across = across.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    assert!(
        min_within > max_across,
        "{}: min within-cluster {} should exceed max cross-cluster {}",
        label,
        min_within,
        max_across
    );
}

#[test]
fn test_clusters_separate_baseline_topology() {
    for fusion in FusionStrategy::all() {
        assert_separated(MatchingConfig::default().with_fusion(fusion));
    }
}

#[test]
fn test_clusters_separate_polynomial_topology() {
    for fusion in FusionStrategy::all() {
        let config = MatchingConfig::polynomial().with_fusion(fusion);
        assert_eq!(config.topological_mode, TopologicalMode::Polynomial);
        assert_separated(config);
    }
}

#[test]
fn test_skewed_clusters_separate_in_both_modes() {
    for config in [MatchingConfig::default(), MatchingConfig::polynomial()] {
        for fusion in FusionStrategy::all() {
            assert_separated_on(config.clone().with_fusion(fusion), &skewed_profiles());
        }
    }
}

#[test]
fn test_skewed_cluster_crossing_counts_differ() {
    let scorer = PairScorer::new(MatchingConfig::polynomial());
    let counts: Vec<usize> = skewed_profiles()
        .iter()
        .take(3)
        .map(|p| scorer.prepare(p).knot.crossing_number())
        .collect();
    assert_eq!(counts, vec![15, 15, 12]);

    // Three crossings apart still clears the two-stage filter.
    let prepared = scorer.prepare_all(&skewed_profiles()[..3]);
    for (_, _, s) in scorer.score_all_pairs(&prepared) {
        assert!(s.topological > 0.6, "topological {}", s.topological);
    }
}

#[test]
fn test_near_cluster_shares_unknot() {
    let scorer = PairScorer::new(MatchingConfig::default());
    for p in six_profiles().iter().take(3) {
        assert_eq!(scorer.prepare(p).knot.crossing_number(), 0);
    }
    for p in six_profiles().iter().skip(3) {
        assert_eq!(scorer.prepare(p).knot.crossing_number(), 66);
    }
}
