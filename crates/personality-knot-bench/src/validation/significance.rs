//! Paired significance test on per-pair score differences.
//!
//! One-sample Student t-test of `b - a` against zero, two-sided. When the
//! backend is disabled or the statistic is undefined (fewer than two pairs,
//! zero variance) every statistical field is `None` and the result is not
//! significant.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::metrics::{mean, sample_std};

/// p-value below which a difference is significant.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;
const CONFIDENCE_LEVEL: f64 = 0.95;

/// Which statistics backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignificanceBackend {
    /// Student t distribution from `statrs`.
    #[default]
    StudentT,
    /// Report accuracies only.
    Unavailable,
}

impl SignificanceBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StudentT => "student_t",
            Self::Unavailable => "unavailable",
        }
    }

    /// Two-sided p-value of `t` with `df` degrees of freedom.
    pub fn two_sided_p(&self, t: f64, df: f64) -> Option<f64> {
        let dist = self.t_distribution(df)?;
        Some((2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0))
    }

    /// Upper critical value for a two-sided interval at `level`.
    fn critical_value(&self, df: f64, level: f64) -> Option<f64> {
        let dist = self.t_distribution(df)?;
        Some(dist.inverse_cdf(1.0 - (1.0 - level) / 2.0))
    }

    fn t_distribution(&self, df: f64) -> Option<StudentsT> {
        match self {
            Self::StudentT => StudentsT::new(0.0, 1.0, df).ok(),
            Self::Unavailable => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificanceReport {
    pub backend: SignificanceBackend,
    pub n: usize,
    pub mean_difference: f64,
    /// Sample standard deviation of the differences.
    pub std_difference: f64,
    pub t_statistic: Option<f64>,
    pub p_value: Option<f64>,
    pub confidence_interval: Option<(f64, f64)>,
    /// Cohen's d: mean / sd.
    pub effect_size: Option<f64>,
    pub is_significant: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PairedTest {
    backend: SignificanceBackend,
}

impl PairedTest {
    pub fn new(backend: SignificanceBackend) -> Self {
        Self { backend }
    }

    /// Test whether `b` differs from `a` on the same pairs.
    pub fn compare(&self, a: &[f64], b: &[f64]) -> SignificanceReport {
        let differences: Vec<f64> = a.iter().zip(b).map(|(x, y)| y - x).collect();
        let n = differences.len();
        let mean_difference = mean(&differences);
        let std_difference = sample_std(&differences);

        let mut report = SignificanceReport {
            backend: self.backend,
            n,
            mean_difference,
            std_difference,
            t_statistic: None,
            p_value: None,
            confidence_interval: None,
            effect_size: None,
            is_significant: false,
        };

        if self.backend == SignificanceBackend::Unavailable {
            tracing::warn!("significance backend unavailable; reporting accuracies only");
            return report;
        }
        if n < 2 || !(std_difference > 0.0) {
            tracing::debug!(n, std_difference, "paired t statistic undefined");
            return report;
        }

        let df = (n - 1) as f64;
        let sem = std_difference / (n as f64).sqrt();
        let t = mean_difference / sem;
        let p = self.backend.two_sided_p(t, df);

        report.t_statistic = Some(t);
        report.p_value = p;
        report.confidence_interval = self
            .backend
            .critical_value(df, CONFIDENCE_LEVEL)
            .map(|c| (mean_difference - c * sem, mean_difference + c * sem));
        report.effect_size = Some(mean_difference / std_difference);
        report.is_significant = p.is_some_and(|p| p < SIGNIFICANCE_LEVEL);
        report
    }
}
