//! # Personality Knot Validation Harness
//!
//! Calibrates and validates the fused (quantum + topological) compatibility
//! score against synthetic ground truth.
//!
//! ## Key Hypothesis
//!
//! Adding the topological signal to the quantum-only (enhanced) compatibility
//! improves matching accuracy. The harness measures this with:
//!
//! - threshold search with ROC / Youden-J calibration
//! - grid search over enhanced and topological weights
//! - k-fold cross-validation
//! - a paired t-test on per-pair score differences
//!
//! Ground-truth labels are a **synthetic oracle**: they are computed from the
//! same profile features the engine consumes (dimension similarity, archetype
//! compatibility, value alignment) plus seeded Gaussian noise. Accuracy against
//! them measures self-consistency, not real-world matching quality.
//!
//! ## Usage
//!
//! ```bash
//! # Compare quantum-only and integrated matching on a synthetic population
//! cargo run -p personality-knot-cli -- compare --synthetic 100 --seed 42
//!
//! # Five-fold cross-validation
//! cargo run -p personality-knot-cli -- cross-validate --synthetic 100 --folds 5
//! ```

pub mod config;
pub mod datasets;
pub mod error;
pub mod metrics;
pub mod reports;
pub mod tuning;
pub mod validation;

pub use config::{EngineConfig, GroundTruthConfig};
pub use datasets::{
    GroundTruthGenerator, GroundTruthLabel, GroundTruthSet, LoadReport, PopulationConfig,
    PopulationGenerator, ProfileLoader,
};
pub use error::{BenchError, BenchResult};
pub use metrics::{KnotDistribution, SummaryStats};
pub use reports::{ComparisonReport, PairRecord, ReportMetadata, ReportWriter};
pub use tuning::{ThresholdGrid, ThresholdResult, ThresholdSearch, WeightOptimizer, WeightTuningResults};
pub use validation::{
    CheckSummary, CrossValidationResult, CrossValidator, MatchingComparator, MatchingResult,
    PairedTest, SignificanceBackend, SignificanceReport, SimilarityValidation, ValidationCheck,
};
