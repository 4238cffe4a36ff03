//! Calibration: decision thresholds and weight grid search.
//!
//! # Example
//!
//! ```rust,ignore
//! use personality_knot_bench::tuning::{ThresholdGrid, WeightOptimizer};
//! use personality_knot_core::{FusionStrategy, MatchingConfig};
//!
//! let config = MatchingConfig::polynomial().with_fusion(FusionStrategy::from_key("conditional")?);
//! let optimizer = WeightOptimizer::new(config, ThresholdGrid::default());
//! let results = optimizer.optimize_topological(&profiles, &ground_truth);
//! println!("best: {:?} ({:.3})", results.best.params, results.best.accuracy);
//! ```

pub mod threshold;
pub mod weights;

pub use threshold::{RocCurve, RocSummary, ThresholdGrid, ThresholdResult, ThresholdSearch, FALLBACK_THRESHOLD};
pub use weights::{
    CandidateResult, EnhancedGrid, ParameterSensitivity, TopologicalGrid, WeightOptimizer, WeightParams,
    WeightTuningResults,
};
