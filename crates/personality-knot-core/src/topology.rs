//! Topological compatibility between knot fingerprints.
//!
//! Two modes:
//!
//! - **Baseline**: knot type, complexity, and crossing count only.
//! - **Polynomial**: weighted mean of Jones and Alexander coefficient
//!   similarity, crossing similarity, and writhe similarity. Missing
//!   coefficients fall back to type/complexity similarity; a missing writhe
//!   drops its term.
//!
//! Both modes return values in [0, 1] and score a fingerprint against itself
//! as exactly 1.0.

use serde::{Deserialize, Serialize};

use crate::knot::{KnotType, PersonalityKnot};

/// Tolerance for treating a weight sum as 1.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Comparison view of a knot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnotFingerprint {
    pub knot_type: KnotType,
    pub complexity: f64,
    pub crossing_number: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jones: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alexander: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writhe: Option<i64>,
}

impl From<&PersonalityKnot> for KnotFingerprint {
    fn from(knot: &PersonalityKnot) -> Self {
        Self {
            knot_type: knot.knot_type,
            complexity: knot.complexity,
            crossing_number: knot.crossing_number(),
            jones: Some(knot.invariants.jones.coefficients()),
            alexander: Some(knot.invariants.alexander.coefficients()),
            writhe: Some(knot.braid.writhe()),
        }
    }
}

/// Weights of the polynomial-mode terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologicalWeights {
    pub jones: f64,
    pub alexander: f64,
    pub crossing: f64,
    pub writhe: f64,
}

impl Default for TopologicalWeights {
    fn default() -> Self {
        Self {
            jones: 0.35,
            alexander: 0.35,
            crossing: 0.15,
            writhe: 0.15,
        }
    }
}

impl TopologicalWeights {
    pub fn new(jones: f64, alexander: f64, crossing: f64, writhe: f64) -> Self {
        Self {
            jones,
            alexander,
            crossing,
            writhe,
        }
    }

    pub fn sum(&self) -> f64 {
        self.jones + self.alexander + self.crossing + self.writhe
    }

    /// Rescale to sum 1 when the sum is off by more than the tolerance.
    /// Non-positive sums fall back to the defaults.
    pub fn normalized(&self) -> Self {
        let total = self.sum();
        if !(total > 0.0) {
            return Self::default();
        }
        if (total - 1.0).abs() <= WEIGHT_SUM_TOLERANCE {
            return *self;
        }
        Self::new(
            self.jones / total,
            self.alexander / total,
            self.crossing / total,
            self.writhe / total,
        )
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, w) in [
            ("jones", self.jones),
            ("alexander", self.alexander),
            ("crossing", self.crossing),
            ("writhe", self.writhe),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(format!("topological weight '{}' must be non-negative, got {}", name, w));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopologicalMode {
    #[default]
    Baseline,
    Polynomial,
}

impl TopologicalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Polynomial => "polynomial",
        }
    }
}

// ===========================================================================
// Term similarities
// ===========================================================================

/// 1.0 for equal types, 0.7 for two distinct complex types, else 0.3.
pub fn type_similarity(a: &KnotFingerprint, b: &KnotFingerprint) -> f64 {
    if a.knot_type == b.knot_type {
        1.0
    } else if a.knot_type.is_complex() && b.knot_type.is_complex() {
        0.7
    } else {
        0.3
    }
}

pub fn complexity_similarity(a: &KnotFingerprint, b: &KnotFingerprint) -> f64 {
    (1.0 - (a.complexity - b.complexity).abs()).clamp(0.0, 1.0)
}

pub fn crossing_similarity(a: &KnotFingerprint, b: &KnotFingerprint) -> f64 {
    let diff = a.crossing_number.abs_diff(b.crossing_number) as f64;
    let scale = a.crossing_number.max(b.crossing_number).max(1) as f64;
    1.0 - diff / scale
}

/// Normalized Euclidean distance between zero-padded coefficient vectors,
/// capped at 1.
pub fn polynomial_distance(a: &[f64], b: &[f64]) -> f64 {
    let len = a.len().max(b.len());
    let at = |v: &[f64], i: usize| v.get(i).copied().unwrap_or(0.0);

    let mut sq = 0.0;
    let mut max_abs: f64 = 1.0;
    for i in 0..len {
        let (x, y) = (at(a, i), at(b, i));
        sq += (x - y) * (x - y);
        max_abs = max_abs.max(x.abs()).max(y.abs());
    }
    (sq.sqrt() / max_abs).min(1.0)
}

pub fn writhe_similarity(a: i64, b: i64) -> f64 {
    let scale = a.abs().max(b.abs()).max(1) as f64;
    (1.0 - (a - b).abs() as f64 / scale).clamp(0.0, 1.0)
}

fn coefficient_similarity(a: Option<&Vec<f64>>, b: Option<&Vec<f64>>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(1.0 - polynomial_distance(a, b)),
        _ => None,
    }
}

// ===========================================================================
// Calculator
// ===========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologicalCalculator {
    pub mode: TopologicalMode,
    pub weights: TopologicalWeights,
}

impl TopologicalCalculator {
    pub fn new(mode: TopologicalMode, weights: TopologicalWeights) -> Self {
        Self { mode, weights }
    }

    pub fn baseline() -> Self {
        Self::new(TopologicalMode::Baseline, TopologicalWeights::default())
    }

    pub fn polynomial(weights: TopologicalWeights) -> Self {
        Self::new(TopologicalMode::Polynomial, weights)
    }

    pub fn compatibility(&self, a: &KnotFingerprint, b: &KnotFingerprint) -> f64 {
        match self.mode {
            TopologicalMode::Baseline => Self::baseline_compatibility(a, b),
            TopologicalMode::Polynomial => self.polynomial_compatibility(a, b),
        }
    }

    /// `0.4 type + 0.3 complexity + 0.3 crossing`.
    pub fn baseline_compatibility(a: &KnotFingerprint, b: &KnotFingerprint) -> f64 {
        (0.4 * type_similarity(a, b)
            + 0.3 * complexity_similarity(a, b)
            + 0.3 * crossing_similarity(a, b))
        .clamp(0.0, 1.0)
    }

    /// Weighted mean of the active polynomial-mode terms.
    pub fn polynomial_compatibility(&self, a: &KnotFingerprint, b: &KnotFingerprint) -> f64 {
        let w = self.weights.normalized();

        let jones = coefficient_similarity(a.jones.as_ref(), b.jones.as_ref())
            .unwrap_or_else(|| type_similarity(a, b));
        let alexander = coefficient_similarity(a.alexander.as_ref(), b.alexander.as_ref())
            .unwrap_or_else(|| complexity_similarity(a, b));
        let crossing = crossing_similarity(a, b);

        let mut weighted = w.jones * jones + w.alexander * alexander + w.crossing * crossing;
        let mut active = w.jones + w.alexander + w.crossing;

        if let (Some(wa), Some(wb)) = (a.writhe, b.writhe) {
            weighted += w.writhe * writhe_similarity(wa, wb);
            active += w.writhe;
        }

        if active <= f64::EPSILON {
            return Self::baseline_compatibility(a, b);
        }
        (weighted / active).clamp(0.0, 1.0)
    }
}
