//! K-fold cross-validation of the quantum-only versus integrated comparison.
//!
//! Profiles are shuffled once with a seeded `ChaCha8Rng` and cut into `k`
//! contiguous folds whose sizes differ by at most one. Each fold is evaluated
//! on the labeled pairs that have both endpoints inside it; a fold with no
//! such pairs is skipped.

use personality_knot_core::TraitProfile;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::comparison::MatchingComparator;
use crate::config::EngineConfig;
use crate::datasets::GroundTruthSet;
use crate::error::{BenchError, BenchResult};
use crate::metrics::{mean, population_std};

/// Shuffle `0..n` and split into `k` size-balanced contiguous folds.
///
/// The first `n % k` folds hold one extra index. Folds may be empty when
/// `k > n`.
pub fn k_fold_split(n: usize, k: usize, seed: u64) -> Vec<Vec<usize>> {
    if k == 0 {
        return Vec::new();
    }
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let base = n / k;
    let extra = n % k;
    let mut folds = Vec::with_capacity(k);
    let mut start = 0;
    for f in 0..k {
        let size = base + usize::from(f < extra);
        folds.push(indices[start..start + size].to_vec());
        start += size;
    }
    folds
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldResult {
    pub fold: usize,
    pub profiles: usize,
    pub pairs: usize,
    pub skipped_pairs: usize,
    pub quantum_accuracy: f64,
    pub integrated_accuracy: f64,
    pub improvement_pct: f64,
    pub quantum_threshold: f64,
    pub integrated_threshold: f64,
}

/// Mean and population standard deviation across folds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FoldAggregate {
    pub mean: f64,
    pub std: f64,
}

impl FoldAggregate {
    fn of(values: &[f64]) -> Self {
        Self {
            mean: mean(values),
            std: population_std(values),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossValidationResult {
    pub k: usize,
    pub seed: u64,
    pub folds: Vec<FoldResult>,
    /// Folds with no labeled pairs.
    pub skipped_folds: Vec<usize>,
    pub quantum_accuracy: FoldAggregate,
    pub integrated_accuracy: FoldAggregate,
    pub improvement_pct: FoldAggregate,
}

pub struct CrossValidator {
    comparator: MatchingComparator,
    k: usize,
    seed: u64,
}

impl CrossValidator {
    pub fn new(comparator: MatchingComparator, k: usize, seed: u64) -> BenchResult<Self> {
        if k < 2 {
            return Err(BenchError::config(format!("folds must be at least 2, got {}", k)));
        }
        Ok(Self { comparator, k, seed })
    }

    pub fn from_config(config: &EngineConfig) -> BenchResult<Self> {
        let comparator = MatchingComparator::new(
            config.matching.clone(),
            config.threshold_grid,
            config.significance,
        );
        Self::new(comparator, config.folds, config.seed)
    }

    pub fn run(&self, profiles: &[TraitProfile], ground_truth: &GroundTruthSet) -> CrossValidationResult {
        let prepared = self.comparator.scorer().prepare_all(profiles);
        let folds = k_fold_split(prepared.len(), self.k, self.seed);

        let evaluated: Vec<(usize, Option<FoldResult>)> = folds
            .par_iter()
            .enumerate()
            .map(|(fold, members)| {
                let labeled = ground_truth.labeled_pairs_within(&prepared, members);
                if labeled.is_empty() {
                    return (fold, None);
                }
                let result = self.comparator.compare_labeled(&prepared, &labeled);
                (
                    fold,
                    Some(FoldResult {
                        fold,
                        profiles: members.len(),
                        pairs: result.total_pairs,
                        skipped_pairs: result.skipped_pairs,
                        quantum_accuracy: result.quantum.accuracy,
                        integrated_accuracy: result.integrated.accuracy,
                        improvement_pct: result.improvement_pct,
                        quantum_threshold: result.quantum.threshold,
                        integrated_threshold: result.integrated.threshold,
                    }),
                )
            })
            .collect();

        let mut fold_results = Vec::new();
        let mut skipped_folds = Vec::new();
        for (fold, result) in evaluated {
            match result {
                Some(r) => {
                    tracing::info!(
                        fold,
                        pairs = r.pairs,
                        quantum_accuracy = r.quantum_accuracy,
                        integrated_accuracy = r.integrated_accuracy,
                        "fold evaluated"
                    );
                    fold_results.push(r);
                }
                None => {
                    tracing::warn!(fold, "fold has no labeled pairs; skipped");
                    skipped_folds.push(fold);
                }
            }
        }

        let quantum: Vec<f64> = fold_results.iter().map(|r| r.quantum_accuracy).collect();
        let integrated: Vec<f64> = fold_results.iter().map(|r| r.integrated_accuracy).collect();
        let improvement: Vec<f64> = fold_results.iter().map(|r| r.improvement_pct).collect();

        CrossValidationResult {
            k: self.k,
            seed: self.seed,
            quantum_accuracy: FoldAggregate::of(&quantum),
            integrated_accuracy: FoldAggregate::of(&integrated),
            improvement_pct: FoldAggregate::of(&improvement),
            folds: fold_results,
            skipped_folds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_split_partitions_all_indices() {
        let folds = k_fold_split(103, 5, 42);
        assert_eq!(folds.len(), 5);
        let sizes: Vec<usize> = folds.iter().map(|f| f.len()).collect();
        assert_eq!(sizes, vec![21, 21, 21, 20, 20]);

        let all: HashSet<usize> = folds.iter().flatten().copied().collect();
        assert_eq!(all.len(), 103);
        assert_eq!(folds.iter().map(|f| f.len()).sum::<usize>(), 103);
    }

    #[test]
    fn test_split_is_seeded() {
        assert_eq!(k_fold_split(50, 4, 1), k_fold_split(50, 4, 1));
        assert_ne!(k_fold_split(50, 4, 1), k_fold_split(50, 4, 2));
    }

    #[test]
    fn test_more_folds_than_profiles() {
        let folds = k_fold_split(3, 5, 0);
        assert_eq!(folds.iter().filter(|f| f.is_empty()).count(), 2);
    }

    #[test]
    fn test_rejects_single_fold() {
        let config = EngineConfig {
            folds: 1,
            ..Default::default()
        };
        assert!(matches!(
            CrossValidator::from_config(&config),
            Err(BenchError::Config(_))
        ));
    }
}
