//! Descriptive statistics and classification metrics.
//!
//! Aggregates over empty inputs are zero rather than NaN.

use std::collections::BTreeMap;

use personality_knot_core::PersonalityKnot;
use serde::{Deserialize, Serialize};

// ===========================================================================
// Scalar helpers
// ===========================================================================

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with divisor `n`.
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Standard deviation with divisor `n - 1`; 0 for fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Fraction of pairs where `score >= threshold` matches the label.
pub fn accuracy(scores: &[f64], labels: &[bool], threshold: f64) -> f64 {
    let n = scores.len().min(labels.len());
    if n == 0 {
        return 0.0;
    }
    let correct = scores
        .iter()
        .zip(labels)
        .filter(|(s, l)| (**s >= threshold) == **l)
        .count();
    correct as f64 / n as f64
}

/// Relative change in percent; 0 when the baseline is not positive.
pub fn improvement_pct(baseline: f64, candidate: f64) -> f64 {
    if baseline > 0.0 {
        (candidate - baseline) / baseline * 100.0
    } else {
        0.0
    }
}

/// Pearson correlation; `None` when undefined (n < 2 or a constant series).
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let (mx, my) = (mean(x), mean(y));
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y) {
        sxy += (a - mx) * (b - my);
        sxx += (a - mx).powi(2);
        syy += (b - my).powi(2);
    }
    let denom = (sxx * syy).sqrt();
    if denom <= f64::EPSILON {
        return None;
    }
    Some((sxy / denom).clamp(-1.0, 1.0))
}

// ===========================================================================
// Summary statistics
// ===========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl SummaryStats {
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        Self {
            count: values.len(),
            mean: mean(values),
            median: median(values),
            std_dev: sample_std(values),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

// ===========================================================================
// Knot distribution
// ===========================================================================

/// Knot type counts and complexity spread over a population.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnotDistribution {
    pub total_knots: usize,
    /// Count per knot type label, sorted by label.
    pub type_counts: BTreeMap<String, usize>,
    pub complexity: SummaryStats,
    pub crossing_number: SummaryStats,
}

impl KnotDistribution {
    pub fn analyze(knots: &[PersonalityKnot]) -> Self {
        let mut type_counts = BTreeMap::new();
        for knot in knots {
            *type_counts.entry(knot.knot_type.label()).or_insert(0) += 1;
        }
        let complexities: Vec<f64> = knots.iter().map(|k| k.complexity).collect();
        let crossings: Vec<f64> = knots.iter().map(|k| k.crossing_number() as f64).collect();

        Self {
            total_knots: knots.len(),
            type_counts,
            complexity: SummaryStats::from_values(&complexities),
            crossing_number: SummaryStats::from_values(&crossings),
        }
    }

    /// Most frequent label; ties go to the first label in sort order.
    pub fn most_common(&self) -> Option<(&str, usize)> {
        self.type_counts
            .iter()
            .fold(None, |best: Option<(&str, usize)>, (label, count)| match best {
                Some((_, c)) if c >= *count => best,
                _ => Some((label.as_str(), *count)),
            })
    }
}
