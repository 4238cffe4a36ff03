//! Compatibility and fused scoring through the public API.

use personality_knot_core::fusion::TwoStage;
use personality_knot_core::{
    CompatibilityCalculator, CompatibilityMode, Dimension, EnhancedWeights, FusionStrategy,
    MatchingConfig, PairScorer, ScoreFusion, TraitProfile,
};

use super::helpers::wave_profile;

#[test]
fn test_identical_neutral_profiles() {
    let calc = CompatibilityCalculator::default();
    let score = calc.enhanced_compatibility(&TraitProfile::uniform("a", 0.5), &TraitProfile::uniform("b", 0.5));
    assert!(score > 0.8, "identical profiles scored {}", score);
}

#[test]
fn test_inverted_profiles() {
    let calc = CompatibilityCalculator::default();
    let score = calc.enhanced_compatibility(&TraitProfile::uniform("a", 1.0), &TraitProfile::uniform("b", 0.0));
    assert!(score < 0.3, "inverted profiles scored {}", score);
}

#[test]
fn test_disjoint_dimensions_have_zero_base() {
    let a = TraitProfile::new("a")
        .with_value(Dimension::Openness, 0.9)
        .with_value(Dimension::TrustLevel, 0.1);
    let b = TraitProfile::new("b")
        .with_value(Dimension::SocialPreference, 0.9)
        .with_value(Dimension::CrowdTolerance, 0.3);
    let scorer = PairScorer::new(MatchingConfig::default());
    let components = scorer.components(&scorer.prepare(&a), &scorer.prepare(&b));
    assert_eq!(components.quantum, 0.0);
}

#[test]
fn test_empty_profiles_score_without_panicking() {
    let scorer = PairScorer::new(MatchingConfig::polynomial());
    let s = scorer.score_profiles(&TraitProfile::new("a"), &TraitProfile::new("b"));
    assert_eq!(s.topological, 1.0);
    assert!((0.0..=1.0).contains(&s.fused));
}

#[test]
fn test_scores_symmetric_and_bounded() {
    let scorer = PairScorer::new(MatchingConfig::polynomial());
    for s in 0..12 {
        let a = wave_profile("a", s);
        let b = wave_profile("b", s * 3 + 1);
        let ab = scorer.score_profiles(&a, &b);
        let ba = scorer.score_profiles(&b, &a);
        assert!((ab.fused - ba.fused).abs() < 1e-12);
        for v in [ab.quantum, ab.topological, ab.fused] {
            assert!((0.0..=1.0).contains(&v), "score {} out of range", v);
        }
    }
}

#[test]
fn test_similarity_mode_dominates_probability() {
    let prob = CompatibilityCalculator::default();
    let sim = CompatibilityCalculator::new(CompatibilityMode::Similarity, EnhancedWeights::new(1.0, 0.0, 0.0));
    let prob_only = CompatibilityCalculator::new(CompatibilityMode::Probability, EnhancedWeights::new(1.0, 0.0, 0.0));
    for s in 0..10 {
        let a = wave_profile("a", s);
        let b = wave_profile("b", s + 5);
        assert!(sim.enhanced_compatibility(&a, &b) >= prob_only.enhanced_compatibility(&a, &b));
    }
    assert_eq!(prob.mode, CompatibilityMode::Probability);
}

#[test]
fn test_two_stage_reference_values() {
    let s = FusionStrategy::TwoStage(TwoStage { filter_threshold: 0.3 });
    assert_eq!(s.fuse(0.9, 0.1), 0.0);
    assert!((s.fuse(0.9, 0.5) - 0.82).abs() < 1e-12);
}
