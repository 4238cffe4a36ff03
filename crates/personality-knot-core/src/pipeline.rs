//! Pair scoring over prepared profiles.
//!
//! Encoding, archetype inference, and knot generation depend on one profile
//! only. [`PreparedProfile`] computes them once so an O(N^2) pair loop never
//! repeats them.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::compatibility::{Archetype, CompatibilityCalculator, EnhancedComponents};
use crate::config::MatchingConfig;
use crate::encoding::EncodedState;
use crate::fusion::{FusionStrategy, ScoreFusion};
use crate::knot::{KnotGenerator, PersonalityKnot};
use crate::profile::TraitProfile;
use crate::topology::{KnotFingerprint, TopologicalCalculator};

/// A profile with its per-profile derivations cached.
#[derive(Debug, Clone)]
pub struct PreparedProfile {
    pub profile: TraitProfile,
    pub state: EncodedState,
    pub archetype: Archetype,
    pub knot: PersonalityKnot,
    pub fingerprint: KnotFingerprint,
}

impl PreparedProfile {
    pub fn prepare(profile: &TraitProfile, generator: &KnotGenerator) -> Self {
        let knot = generator.generate_knot(profile);
        let fingerprint = KnotFingerprint::from(&knot);
        Self {
            profile: profile.clone(),
            state: EncodedState::encode(profile),
            archetype: Archetype::infer(profile),
            knot,
            fingerprint,
        }
    }

    pub fn id(&self) -> &str {
        self.profile.id()
    }
}

/// Scores for one pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairScores {
    /// Enhanced (quantum-only) compatibility.
    pub quantum: f64,
    pub topological: f64,
    pub fused: f64,
}

/// Scores profile pairs under one [`MatchingConfig`].
#[derive(Debug, Clone)]
pub struct PairScorer {
    config: MatchingConfig,
    generator: KnotGenerator,
    compatibility: CompatibilityCalculator,
    topology: TopologicalCalculator,
}

impl PairScorer {
    pub fn new(config: MatchingConfig) -> Self {
        Self {
            generator: config.knot_generator(),
            compatibility: config.compatibility_calculator(),
            topology: config.topological_calculator(),
            config,
        }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    pub fn fusion(&self) -> FusionStrategy {
        self.config.fusion
    }

    pub fn prepare(&self, profile: &TraitProfile) -> PreparedProfile {
        PreparedProfile::prepare(profile, &self.generator)
    }

    /// Prepare every profile in parallel, keeping input order.
    pub fn prepare_all(&self, profiles: &[TraitProfile]) -> Vec<PreparedProfile> {
        profiles.par_iter().map(|p| self.prepare(p)).collect()
    }

    pub fn components(&self, a: &PreparedProfile, b: &PreparedProfile) -> EnhancedComponents {
        self.compatibility.components(
            (&a.profile, &a.state, a.archetype),
            (&b.profile, &b.state, b.archetype),
        )
    }

    /// Enhanced compatibility with the configured (normalized) weights.
    pub fn quantum(&self, a: &PreparedProfile, b: &PreparedProfile) -> f64 {
        self.components(a, b)
            .combine(&self.config.enhanced_weights.normalized())
    }

    pub fn topological(&self, a: &PreparedProfile, b: &PreparedProfile) -> f64 {
        self.topology.compatibility(&a.fingerprint, &b.fingerprint)
    }

    pub fn score(&self, a: &PreparedProfile, b: &PreparedProfile) -> PairScores {
        let quantum = self.quantum(a, b);
        let topological = self.topological(a, b);
        PairScores {
            quantum,
            topological,
            fused: self.config.fusion.fuse(quantum, topological),
        }
    }

    /// Convenience for one-off comparisons of raw profiles.
    pub fn score_profiles(&self, a: &TraitProfile, b: &TraitProfile) -> PairScores {
        self.score(&self.prepare(a), &self.prepare(b))
    }

    /// Score every pair `(i, j)` with `i < j`, in row-major order.
    pub fn score_all_pairs(&self, prepared: &[PreparedProfile]) -> Vec<(usize, usize, PairScores)> {
        pair_indices(prepared.len())
            .into_par_iter()
            .map(|(i, j)| (i, j, self.score(&prepared[i], &prepared[j])))
            .collect()
    }
}

/// All `(i, j)` with `i < j < n`, row-major.
pub fn pair_indices(n: usize) -> Vec<(usize, usize)> {
    (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::Dimension;

    #[test]
    fn test_pair_indices() {
        assert!(pair_indices(0).is_empty());
        assert!(pair_indices(1).is_empty());
        assert_eq!(pair_indices(3), vec![(0, 1), (0, 2), (1, 2)]);
        assert_eq!(pair_indices(100).len(), 4950);
    }

    #[test]
    fn test_score_all_pairs_matches_single_scoring() {
        let scorer = PairScorer::new(MatchingConfig::default());
        let profiles = vec![
            TraitProfile::uniform("a", 0.5),
            TraitProfile::uniform("b", 0.9),
            TraitProfile::new("c").with_value(Dimension::SocialPreference, 0.95),
        ];
        let prepared = scorer.prepare_all(&profiles);
        let all = scorer.score_all_pairs(&prepared);
        assert_eq!(all.len(), 3);
        for (i, j, scores) in all {
            assert!(i < j);
            assert_eq!(scores, scorer.score_profiles(&profiles[i], &profiles[j]));
        }
    }

    #[test]
    fn test_prepare_caches_derivations() {
        let scorer = PairScorer::new(MatchingConfig::default());
        let p = scorer.prepare(&TraitProfile::uniform("n", 0.5));
        assert_eq!(p.id(), "n");
        assert_eq!(p.archetype, Archetype::Balanced);
        assert_eq!(p.fingerprint.crossing_number, 0);
    }

    #[test]
    fn test_scores_in_unit_interval() {
        let scorer = PairScorer::new(MatchingConfig::polynomial());
        let s = scorer.score_profiles(&TraitProfile::uniform("a", 1.0), &TraitProfile::uniform("b", 0.0));
        for v in [s.quantum, s.topological, s.fused] {
            assert!((0.0..=1.0).contains(&v));
        }
    }
}
