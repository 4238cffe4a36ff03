//! Score fusion strategies.
//!
//! Each strategy maps a (quantum, topological) pair to one score in [0, 1].
//! [`FusionStrategy`] is the closed set of strategies, selected by key.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{KnotError, KnotResult};

/// Fuse a quantum and a topological score.
pub trait ScoreFusion {
    fn fuse(&self, quantum: f64, topological: f64) -> f64;
}

/// `alpha * q + beta * t`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightedAverage {
    pub quantum_weight: f64,
    pub topological_weight: f64,
}

impl Default for WeightedAverage {
    fn default() -> Self {
        Self {
            quantum_weight: 0.7,
            topological_weight: 0.3,
        }
    }
}

impl ScoreFusion for WeightedAverage {
    fn fuse(&self, quantum: f64, topological: f64) -> f64 {
        (self.quantum_weight * quantum + self.topological_weight * topological).clamp(0.0, 1.0)
    }
}

/// Trust confident quantum scores; blend in topology near the middle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conditional {
    /// Quantum scores above this are returned as-is.
    pub high_confidence: f64,
    /// Quantum scores below this are returned as-is.
    pub low_confidence: f64,
    /// Cap on the topological blend weight.
    pub max_topological_weight: f64,
}

impl Default for Conditional {
    fn default() -> Self {
        Self {
            high_confidence: 0.8,
            low_confidence: 0.2,
            max_topological_weight: 0.3,
        }
    }
}

impl ScoreFusion for Conditional {
    fn fuse(&self, quantum: f64, topological: f64) -> f64 {
        if quantum > self.high_confidence || quantum < self.low_confidence {
            return quantum.clamp(0.0, 1.0);
        }
        let w = (1.0 - 2.0 * (quantum - 0.5).abs())
            .min(self.max_topological_weight)
            .max(0.0);
        ((1.0 - w) * quantum + w * topological).clamp(0.0, 1.0)
    }
}

/// `q * (0.5 + 0.5 t)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Multiplicative;

impl ScoreFusion for Multiplicative {
    fn fuse(&self, quantum: f64, topological: f64) -> f64 {
        (quantum * (0.5 + 0.5 * topological)).clamp(0.0, 1.0)
    }
}

/// Reject on weak topology, otherwise `0.8 q + 0.2 t`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwoStage {
    pub filter_threshold: f64,
}

impl Default for TwoStage {
    fn default() -> Self {
        Self {
            filter_threshold: 0.3,
        }
    }
}

impl ScoreFusion for TwoStage {
    fn fuse(&self, quantum: f64, topological: f64) -> f64 {
        if topological < self.filter_threshold {
            return 0.0;
        }
        (0.8 * quantum + 0.2 * topological).clamp(0.0, 1.0)
    }
}

/// Closed set of fusion strategies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum FusionStrategy {
    WeightedAverage(WeightedAverage),
    Conditional(Conditional),
    Multiplicative,
    TwoStage(TwoStage),
}

impl Default for FusionStrategy {
    fn default() -> Self {
        Self::WeightedAverage(WeightedAverage::default())
    }
}

impl FusionStrategy {
    /// Every strategy with default parameters, in key order.
    pub fn all() -> [Self; 4] {
        [
            Self::WeightedAverage(WeightedAverage::default()),
            Self::Conditional(Conditional::default()),
            Self::Multiplicative,
            Self::TwoStage(TwoStage::default()),
        ]
    }

    /// Default-parameter strategy for a key.
    pub fn from_key(key: &str) -> KnotResult<Self> {
        match key.trim().to_lowercase().replace('-', "_").as_str() {
            "weighted_average" | "weighted" => Ok(Self::WeightedAverage(WeightedAverage::default())),
            "conditional" => Ok(Self::Conditional(Conditional::default())),
            "multiplicative" => Ok(Self::Multiplicative),
            "two_stage" => Ok(Self::TwoStage(TwoStage::default())),
            _ => Err(KnotError::UnknownFusionStrategy(key.to_string())),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::WeightedAverage(_) => "weighted_average",
            Self::Conditional(_) => "conditional",
            Self::Multiplicative => "multiplicative",
            Self::TwoStage(_) => "two_stage",
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let in_unit = |name: &str, v: f64| {
            if v.is_finite() && (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(format!("{}.{} must be in [0, 1], got {}", self.key(), name, v))
            }
        };
        match self {
            Self::WeightedAverage(w) => {
                in_unit("quantum_weight", w.quantum_weight)?;
                in_unit("topological_weight", w.topological_weight)
            }
            Self::Conditional(c) => {
                in_unit("high_confidence", c.high_confidence)?;
                in_unit("low_confidence", c.low_confidence)?;
                in_unit("max_topological_weight", c.max_topological_weight)?;
                if c.low_confidence > c.high_confidence {
                    return Err("conditional.low_confidence exceeds high_confidence".to_string());
                }
                Ok(())
            }
            Self::Multiplicative => Ok(()),
            Self::TwoStage(t) => in_unit("filter_threshold", t.filter_threshold),
        }
    }
}

impl ScoreFusion for FusionStrategy {
    fn fuse(&self, quantum: f64, topological: f64) -> f64 {
        match self {
            Self::WeightedAverage(s) => s.fuse(quantum, topological),
            Self::Conditional(s) => s.fuse(quantum, topological),
            Self::Multiplicative => Multiplicative.fuse(quantum, topological),
            Self::TwoStage(s) => s.fuse(quantum, topological),
        }
    }
}

impl fmt::Display for FusionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
