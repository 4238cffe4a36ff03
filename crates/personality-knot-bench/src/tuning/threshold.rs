//! Decision-threshold search.
//!
//! A pair is predicted compatible when `score >= threshold`. The grid search
//! picks the most accurate threshold (ties go to the lowest). When both
//! classes are present an ROC curve is also built and the Youden-J optimum
//! and AUC are reported alongside.

use serde::{Deserialize, Serialize};

use crate::metrics::accuracy;

/// Threshold used when there is nothing to calibrate on.
pub const FALLBACK_THRESHOLD: f64 = 0.5;

const MAX_GRID_POINTS: usize = 100_000;

// ===========================================================================
// Grid
// ===========================================================================

/// Inclusive `[start, end]` grid with a fixed step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdGrid {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl Default for ThresholdGrid {
    fn default() -> Self {
        Self {
            start: 0.10,
            end: 0.90,
            step: 0.01,
        }
    }
}

impl ThresholdGrid {
    pub fn new(start: f64, end: f64, step: f64) -> Self {
        Self { start, end, step }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.start.is_finite() && self.end.is_finite() && self.step.is_finite()) {
            return Err("threshold grid bounds must be finite".to_string());
        }
        if !(0.0..=1.0).contains(&self.start) || !(0.0..=1.0).contains(&self.end) {
            return Err(format!(
                "threshold grid must lie in [0, 1], got [{}, {}]",
                self.start, self.end
            ));
        }
        if self.start > self.end {
            return Err(format!("threshold grid start {} exceeds end {}", self.start, self.end));
        }
        if self.step <= 0.0 {
            return Err(format!("threshold grid step must be positive, got {}", self.step));
        }
        if self.point_count() > MAX_GRID_POINTS {
            return Err(format!("threshold grid step {} is too fine", self.step));
        }
        Ok(())
    }

    fn point_count(&self) -> usize {
        ((self.end - self.start) / self.step + 1e-9).floor() as usize + 1
    }

    /// Grid points by integer stepping, rounded to 1e-10.
    pub fn values(&self) -> Vec<f64> {
        if self.validate().is_err() {
            return vec![FALLBACK_THRESHOLD];
        }
        (0..self.point_count())
            .map(|i| ((self.start + i as f64 * self.step) * 1e10).round() / 1e10)
            .collect()
    }
}

// ===========================================================================
// ROC
// ===========================================================================

/// ROC points ordered by descending threshold. The first point is
/// `(0, 0)` at `max_score + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocCurve {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    pub thresholds: Vec<f64>,
}

impl RocCurve {
    /// Build from scores and labels; `None` unless both classes occur.
    pub fn build(scores: &[f64], labels: &[bool]) -> Option<Self> {
        let n = scores.len().min(labels.len());
        let positives = labels[..n].iter().filter(|l| **l).count();
        let negatives = n - positives;
        if positives == 0 || negatives == 0 {
            return None;
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|a, b| scores[*b].total_cmp(&scores[*a]));

        let max_score = scores[order[0]];
        let mut curve = Self {
            fpr: vec![0.0],
            tpr: vec![0.0],
            thresholds: vec![max_score + 1.0],
        };

        let (mut tp, mut fp) = (0usize, 0usize);
        for (k, idx) in order.iter().enumerate() {
            if labels[*idx] {
                tp += 1;
            } else {
                fp += 1;
            }
            let group_ends = order
                .get(k + 1)
                .map_or(true, |next| scores[*next] != scores[*idx]);
            if group_ends {
                curve.fpr.push(fp as f64 / negatives as f64);
                curve.tpr.push(tp as f64 / positives as f64);
                curve.thresholds.push(scores[*idx]);
            }
        }
        Some(curve)
    }

    /// Trapezoidal area under the curve.
    pub fn auc(&self) -> f64 {
        self.fpr
            .windows(2)
            .zip(self.tpr.windows(2))
            .map(|(x, y)| (x[1] - x[0]) * (y[0] + y[1]) / 2.0)
            .sum()
    }

    /// Index of the first maximum of `tpr - fpr`.
    pub fn youden_index(&self) -> usize {
        let mut best = 0;
        for i in 1..self.tpr.len() {
            if self.tpr[i] - self.fpr[i] > self.tpr[best] - self.fpr[best] {
                best = i;
            }
        }
        best
    }
}

/// ROC summary carried in a [`ThresholdResult`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocSummary {
    pub auc: f64,
    pub youden_threshold: f64,
    pub youden_j: f64,
    /// Accuracy at the Youden threshold.
    pub youden_accuracy: f64,
}

// ===========================================================================
// Search
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdResult {
    pub threshold: f64,
    pub accuracy: f64,
    /// Number of scored pairs.
    pub n: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roc: Option<RocSummary>,
}

impl ThresholdResult {
    pub fn roc_auc(&self) -> Option<f64> {
        self.roc.map(|r| r.auc)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ThresholdSearch {
    grid: ThresholdGrid,
}

impl ThresholdSearch {
    pub fn new(grid: ThresholdGrid) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &ThresholdGrid {
        &self.grid
    }

    /// Best grid threshold by accuracy; empty input yields
    /// [`FALLBACK_THRESHOLD`] with accuracy 0.
    pub fn search(&self, scores: &[f64], labels: &[bool]) -> ThresholdResult {
        let n = scores.len().min(labels.len());
        if n == 0 {
            return ThresholdResult {
                threshold: FALLBACK_THRESHOLD,
                accuracy: 0.0,
                n: 0,
                roc: None,
            };
        }
        let (scores, labels) = (&scores[..n], &labels[..n]);

        let mut best = ThresholdResult {
            threshold: FALLBACK_THRESHOLD,
            accuracy: f64::NEG_INFINITY,
            n,
            roc: None,
        };
        for threshold in self.grid.values() {
            let acc = accuracy(scores, labels, threshold);
            if acc > best.accuracy {
                best.threshold = threshold;
                best.accuracy = acc;
            }
        }

        best.roc = RocCurve::build(scores, labels).map(|curve| {
            let idx = curve.youden_index();
            let youden_threshold = curve.thresholds[idx];
            RocSummary {
                auc: curve.auc(),
                youden_threshold,
                youden_j: curve.tpr[idx] - curve.fpr[idx],
                youden_accuracy: accuracy(scores, labels, youden_threshold),
            }
        });
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid() {
        let values = ThresholdGrid::default().values();
        assert_eq!(values.len(), 81);
        assert_eq!(values[0], 0.1);
        assert_eq!(values[80], 0.9);
        assert_eq!(values[25], 0.35);
    }

    #[test]
    fn test_grid_validation() {
        assert!(ThresholdGrid::default().validate().is_ok());
        assert!(ThresholdGrid::new(0.5, 0.4, 0.1).validate().is_err());
        assert!(ThresholdGrid::new(0.1, 0.9, 0.0).validate().is_err());
        assert!(ThresholdGrid::new(-0.1, 0.9, 0.1).validate().is_err());
        assert!(ThresholdGrid::new(0.0, 1.0, 1e-9).validate().is_err());
        assert_eq!(ThresholdGrid::new(0.3, 0.3, 0.1).values(), vec![0.3]);
    }

    #[test]
    fn test_separable_scores_reach_full_accuracy() {
        let scores = [1.0, 1.0, 1.0, 0.0, 0.0];
        let labels = [true, true, true, false, false];
        let result = ThresholdSearch::default().search(&scores, &labels);
        assert_eq!(result.accuracy, 1.0);
        assert_eq!(result.threshold, 0.1);

        let roc = result.roc.unwrap();
        assert_eq!(roc.auc, 1.0);
        assert_eq!(roc.youden_j, 1.0);
        assert_eq!(roc.youden_threshold, 1.0);
        assert_eq!(roc.youden_accuracy, 1.0);
    }

    #[test]
    fn test_ties_resolve_to_lowest_threshold() {
        let scores = [0.8, 0.2];
        let labels = [true, false];
        let result = ThresholdSearch::new(ThresholdGrid::new(0.1, 0.9, 0.1)).search(&scores, &labels);
        assert_eq!(result.accuracy, 1.0);
        assert_eq!(result.threshold, 0.3);
    }

    #[test]
    fn test_empty_input_falls_back() {
        let result = ThresholdSearch::default().search(&[], &[]);
        assert_eq!(result.threshold, FALLBACK_THRESHOLD);
        assert_eq!(result.accuracy, 0.0);
        assert!(result.roc.is_none());
    }

    #[test]
    fn test_single_class_has_no_roc() {
        let result = ThresholdSearch::default().search(&[0.7, 0.4], &[true, true]);
        assert!(result.roc.is_none());
        assert_eq!(result.accuracy, 1.0);
    }

    #[test]
    fn test_roc_curve_with_ties() {
        let scores = [0.75, 0.5, 0.5, 0.25];
        let labels = [true, true, false, false];
        let curve = RocCurve::build(&scores, &labels).unwrap();
        assert_eq!(curve.thresholds, vec![1.75, 0.75, 0.5, 0.25]);
        assert_eq!(curve.tpr, vec![0.0, 0.5, 1.0, 1.0]);
        assert_eq!(curve.fpr, vec![0.0, 0.0, 0.5, 1.0]);
        assert!((curve.auc() - 0.875).abs() < 1e-12);
        assert_eq!(curve.youden_index(), 1);
    }
}
