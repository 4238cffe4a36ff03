//! Quantum-only versus integrated matching accuracy.
//!
//! Every labeled pair gets both scores; each score series is calibrated with
//! its own threshold search, and the paired test runs on the raw score
//! differences.

use personality_knot_core::{MatchingConfig, PairScorer, PairScores, PreparedProfile, TraitProfile};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::significance::{PairedTest, SignificanceBackend, SignificanceReport};
use super::{CheckPriority, ValidationCheck};
use crate::datasets::{GroundTruthSet, LabeledPairs};
use crate::metrics::improvement_pct;
use crate::tuning::{ThresholdGrid, ThresholdResult, ThresholdSearch};

/// Relative accuracy gain regarded as a meaningful improvement, in percent.
pub const TARGET_IMPROVEMENT_PCT: f64 = 5.0;

/// Scores and verdicts for one labeled pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairOutcome {
    pub id_a: String,
    pub id_b: String,
    pub scores: PairScores,
    pub is_compatible: bool,
    pub quantum_correct: bool,
    pub integrated_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingResult {
    pub quantum: ThresholdResult,
    pub integrated: ThresholdResult,
    pub improvement_pct: f64,
    pub total_pairs: usize,
    pub compatible_pairs: usize,
    pub incompatible_pairs: usize,
    /// Profile pairs without a label.
    pub skipped_pairs: usize,
    pub significance: SignificanceReport,
    #[serde(skip)]
    pub pairs: Vec<PairOutcome>,
}

impl MatchingResult {
    pub fn quantum_accuracy(&self) -> f64 {
        self.quantum.accuracy
    }

    pub fn integrated_accuracy(&self) -> f64 {
        self.integrated.accuracy
    }

    pub fn meets_target(&self) -> bool {
        self.improvement_pct >= TARGET_IMPROVEMENT_PCT
    }

    pub fn checks(&self) -> Vec<ValidationCheck> {
        let mut checks = Vec::new();

        let pairs = ValidationCheck::new("labeled_pairs", "At least one labeled pair was scored")
            .with_priority(CheckPriority::Critical);
        checks.push(if self.total_pairs > 0 {
            pairs.pass(&self.total_pairs.to_string(), ">0")
        } else {
            pairs.fail("0", ">0")
        });

        let actual = format!("{:.2}%", self.improvement_pct);
        let expected = format!(">={:.1}%", TARGET_IMPROVEMENT_PCT);
        let gain = ValidationCheck::new(
            "integrated_improvement",
            "Integrated accuracy improves on quantum-only accuracy",
        );
        checks.push(if self.meets_target() {
            gain.pass(&actual, &expected)
        } else if self.improvement_pct >= 0.0 {
            gain.warning(&actual, &expected)
        } else {
            gain.fail(&actual, &expected)
        });

        let significance = ValidationCheck::new("paired_significance", "Score difference is significant at p<0.05")
            .with_priority(CheckPriority::Medium);
        checks.push(match self.significance.p_value {
            None => significance.with_details("statistic unavailable"),
            Some(p) if self.significance.is_significant => significance.pass(&format!("p={:.4}", p), "p<0.05"),
            Some(p) => significance.warning(&format!("p={:.4}", p), "p<0.05"),
        });

        checks
    }
}

pub struct MatchingComparator {
    scorer: PairScorer,
    search: ThresholdSearch,
    test: PairedTest,
}

impl MatchingComparator {
    pub fn new(config: MatchingConfig, grid: ThresholdGrid, backend: SignificanceBackend) -> Self {
        Self {
            scorer: PairScorer::new(config),
            search: ThresholdSearch::new(grid),
            test: PairedTest::new(backend),
        }
    }

    pub fn scorer(&self) -> &PairScorer {
        &self.scorer
    }

    pub fn compare(&self, profiles: &[TraitProfile], ground_truth: &GroundTruthSet) -> MatchingResult {
        let prepared = self.scorer.prepare_all(profiles);
        let labeled = ground_truth.labeled_pairs(&prepared);
        self.compare_labeled(&prepared, &labeled)
    }

    /// Compare on pre-selected pairs of already prepared profiles.
    pub fn compare_labeled(&self, prepared: &[PreparedProfile], labeled: &LabeledPairs) -> MatchingResult {
        let scores: Vec<PairScores> = labeled
            .pairs
            .par_iter()
            .map(|(i, j)| self.scorer.score(&prepared[*i], &prepared[*j]))
            .collect();

        let quantum_scores: Vec<f64> = scores.iter().map(|s| s.quantum).collect();
        let fused_scores: Vec<f64> = scores.iter().map(|s| s.fused).collect();

        let quantum = self.search.search(&quantum_scores, &labeled.labels);
        let integrated = self.search.search(&fused_scores, &labeled.labels);
        let significance = self.test.compare(&quantum_scores, &fused_scores);

        let pairs = labeled
            .pairs
            .iter()
            .zip(&labeled.labels)
            .zip(&scores)
            .map(|(((i, j), label), s)| PairOutcome {
                id_a: prepared[*i].id().to_string(),
                id_b: prepared[*j].id().to_string(),
                scores: *s,
                is_compatible: *label,
                quantum_correct: (s.quantum >= quantum.threshold) == *label,
                integrated_correct: (s.fused >= integrated.threshold) == *label,
            })
            .collect();

        let compatible_pairs = labeled.compatible_count();
        let result = MatchingResult {
            improvement_pct: improvement_pct(quantum.accuracy, integrated.accuracy),
            quantum,
            integrated,
            total_pairs: labeled.len(),
            compatible_pairs,
            incompatible_pairs: labeled.len() - compatible_pairs,
            skipped_pairs: labeled.skipped,
            significance,
            pairs,
        };

        tracing::info!(
            pairs = result.total_pairs,
            skipped = result.skipped_pairs,
            quantum_accuracy = result.quantum.accuracy,
            integrated_accuracy = result.integrated.accuracy,
            improvement_pct = result.improvement_pct,
            fusion = %self.scorer.fusion(),
            "matching comparison finished"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroundTruthConfig;
    use crate::datasets::{GroundTruthGenerator, PopulationGenerator};
    use crate::validation::ValidationStatus;

    fn comparator() -> MatchingComparator {
        MatchingComparator::new(
            MatchingConfig::default(),
            ThresholdGrid::default(),
            SignificanceBackend::StudentT,
        )
    }

    #[test]
    fn test_compare_population() {
        let profiles = PopulationGenerator::new(11, 24).generate_profiles().unwrap();
        let gt = GroundTruthGenerator::new(GroundTruthConfig::default())
            .generate(&profiles)
            .unwrap();
        let result = comparator().compare(&profiles, &gt);

        assert_eq!(result.total_pairs, 276);
        assert_eq!(result.skipped_pairs, 0);
        assert_eq!(result.compatible_pairs + result.incompatible_pairs, 276);
        assert_eq!(result.pairs.len(), 276);
        assert!((0.0..=1.0).contains(&result.quantum_accuracy()));
        assert!((0.0..=1.0).contains(&result.integrated_accuracy()));
        assert_eq!(result.significance.n, 276);

        let correct = result.pairs.iter().filter(|p| p.integrated_correct).count();
        assert!((correct as f64 / 276.0 - result.integrated_accuracy()).abs() < 1e-12);
    }

    #[test]
    fn test_missing_labels_are_skipped() {
        let profiles = PopulationGenerator::new(2, 6).generate_profiles().unwrap();
        let gt = GroundTruthGenerator::new(GroundTruthConfig::default())
            .generate(&profiles[..4])
            .unwrap();
        let result = comparator().compare(&profiles, &gt);
        assert_eq!(result.total_pairs, 6);
        assert_eq!(result.skipped_pairs, 9);
    }

    #[test]
    fn test_no_pairs_is_not_an_error() {
        let result = comparator().compare(&[TraitProfile::uniform("solo", 0.5)], &GroundTruthSet::default());
        assert_eq!(result.total_pairs, 0);
        assert_eq!(result.quantum_accuracy(), 0.0);
        assert_eq!(result.improvement_pct, 0.0);
        assert!(result.significance.p_value.is_none());

        let checks = result.checks();
        assert_eq!(checks[0].status, ValidationStatus::Fail);
        assert!(checks[0].is_critical_failure());
        assert_eq!(checks[2].status, ValidationStatus::Skip);
    }
}
