//! Harness configuration.
//!
//! A single JSON-loadable [`EngineConfig`] carries scoring settings, label
//! generation, calibration grid, fold count, and seeds. Every field has a
//! default, so a partial document is enough.

use std::path::Path;

use personality_knot_core::MatchingConfig;
use serde::{Deserialize, Serialize};

use crate::datasets::PopulationConfig;
use crate::error::{BenchError, BenchResult};
use crate::tuning::ThresholdGrid;
use crate::validation::SignificanceBackend;

/// Synthetic label settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundTruthConfig {
    /// Standard deviation of the Gaussian label noise.
    pub noise_std: f64,
    /// Pairs scoring at or above this are labeled compatible.
    pub label_threshold: f64,
    pub seed: u64,
}

impl Default for GroundTruthConfig {
    fn default() -> Self {
        Self {
            noise_std: 0.05,
            label_threshold: 0.6,
            seed: 42,
        }
    }
}

impl GroundTruthConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.noise_std.is_finite() || self.noise_std < 0.0 {
            return Err(format!("noise_std must be non-negative, got {}", self.noise_std));
        }
        if !(0.0..=1.0).contains(&self.label_threshold) {
            return Err(format!(
                "label_threshold must be in [0, 1], got {}",
                self.label_threshold
            ));
        }
        Ok(())
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub matching: MatchingConfig,
    pub ground_truth: GroundTruthConfig,
    pub population: PopulationConfig,
    pub threshold_grid: ThresholdGrid,
    /// Fold count for cross-validation.
    pub folds: usize,
    /// Seed for fold shuffling.
    pub seed: u64,
    pub significance: SignificanceBackend,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            matching: MatchingConfig::default(),
            ground_truth: GroundTruthConfig::default(),
            population: PopulationConfig::default(),
            threshold_grid: ThresholdGrid::default(),
            folds: 5,
            seed: 42,
            significance: SignificanceBackend::StudentT,
        }
    }
}

impl EngineConfig {
    /// Small population and coarse grid for smoke runs.
    pub fn quick() -> Self {
        Self {
            population: PopulationConfig {
                count: 30,
                ..Default::default()
            },
            threshold_grid: ThresholdGrid::new(0.1, 0.9, 0.05),
            folds: 3,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.ground_truth.seed = seed;
        self.population.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        self.matching.validate()?;
        self.ground_truth.validate()?;
        self.population.validate()?;
        self.threshold_grid.validate()?;
        if self.folds < 2 {
            return Err(format!("folds must be at least 2, got {}", self.folds));
        }
        Ok(())
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> BenchResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| BenchError::io(path, e))?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate().map_err(BenchError::Config)?;
        Ok(config)
    }
}
