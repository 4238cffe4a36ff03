//! Similarity-mode self-consistency check.
//!
//! Over every profile pair, the un-squared inner-product magnitude should
//! track plain dimension similarity (mean of `1 - |a - b|`). Agreement is
//! measured by Pearson correlation and the error between the two series.

use personality_knot_core::{CompatibilityCalculator, CompatibilityMode, EncodedState, EnhancedWeights, TraitProfile};
use personality_knot_core::pipeline::pair_indices;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::significance::SignificanceBackend;
use super::{CheckPriority, ValidationCheck};
use crate::metrics::{mean, pearson, population_std};

/// Minimum correlation for the similarity score to count as validated.
pub const CORRELATION_TARGET: f64 = 0.95;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityValidation {
    pub total_pairs: usize,
    /// `None` when either series is constant or there are fewer than two pairs.
    pub correlation: Option<f64>,
    pub r_squared: Option<f64>,
    pub p_value: Option<f64>,
    pub mae: f64,
    pub rmse: f64,
    pub similarity_mean: f64,
    pub similarity_std: f64,
    pub reference_mean: f64,
    pub reference_std: f64,
    pub meets_threshold: bool,
}

impl SimilarityValidation {
    pub fn run(profiles: &[TraitProfile], backend: SignificanceBackend) -> Self {
        let calculator = CompatibilityCalculator::new(CompatibilityMode::Similarity, EnhancedWeights::default());
        let states: Vec<EncodedState> = profiles.par_iter().map(EncodedState::encode).collect();

        let (similarity, reference): (Vec<f64>, Vec<f64>) = pair_indices(profiles.len())
            .into_par_iter()
            .map(|(i, j)| {
                (
                    calculator.base_compatibility(&states[i], &states[j]),
                    profiles[i].dimension_similarity(&profiles[j]),
                )
            })
            .unzip();

        Self::from_series(&similarity, &reference, backend)
    }

    pub fn from_series(similarity: &[f64], reference: &[f64], backend: SignificanceBackend) -> Self {
        let n = similarity.len().min(reference.len());
        let (similarity, reference) = (&similarity[..n], &reference[..n]);

        let errors: Vec<f64> = similarity.iter().zip(reference).map(|(s, r)| s - r).collect();
        let mae = mean(&errors.iter().map(|e| e.abs()).collect::<Vec<_>>());
        let rmse = mean(&errors.iter().map(|e| e * e).collect::<Vec<_>>()).sqrt();

        let correlation = pearson(similarity, reference);
        let p_value = correlation.and_then(|r| correlation_p_value(r, n, backend));

        let result = Self {
            total_pairs: n,
            correlation,
            r_squared: correlation.map(|r| r * r),
            p_value,
            mae,
            rmse,
            similarity_mean: mean(similarity),
            similarity_std: population_std(similarity),
            reference_mean: mean(reference),
            reference_std: population_std(reference),
            meets_threshold: correlation.is_some_and(|r| r >= CORRELATION_TARGET),
        };
        tracing::info!(
            pairs = n,
            correlation = ?result.correlation,
            mae = result.mae,
            "similarity validation finished"
        );
        result
    }

    pub fn check(&self) -> ValidationCheck {
        let check = ValidationCheck::new(
            "similarity_correlation",
            "Similarity-mode score correlates with dimension similarity",
        )
        .with_priority(CheckPriority::High);
        let expected = format!(">={:.2}", CORRELATION_TARGET);
        match self.correlation {
            None => check.with_details("correlation undefined"),
            Some(r) if self.meets_threshold => check.pass(&format!("{:.4}", r), &expected),
            Some(r) => check
                .fail(&format!("{:.4}", r), &expected)
                .with_details(&format!("mae={:.4} rmse={:.4}", self.mae, self.rmse)),
        }
    }
}

/// Two-sided p-value for Pearson `r` over `n` pairs (t with `n - 2` df).
fn correlation_p_value(r: f64, n: usize, backend: SignificanceBackend) -> Option<f64> {
    if n < 3 {
        return None;
    }
    let df = (n - 2) as f64;
    let denom = 1.0 - r * r;
    if denom <= 1e-12 {
        return match backend {
            SignificanceBackend::StudentT => Some(0.0),
            SignificanceBackend::Unavailable => None,
        };
    }
    backend.two_sided_p(r * (df / denom).sqrt(), df)
}
