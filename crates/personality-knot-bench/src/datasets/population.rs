//! Synthetic population generator.
//!
//! Draws profiles around six archetype templates with Gaussian per-dimension
//! variation. Deterministic for a given seed.

use personality_knot_core::{Archetype, Dimension, TraitProfile, DIMENSION_COUNT};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::error::{BenchError, BenchResult};

/// Template values in canonical dimension order.
const TEMPLATES: [(Archetype, [f64; DIMENSION_COUNT]); 6] = [
    (
        Archetype::Explorer,
        [0.9, 0.5, 0.85, 0.6, 0.7, 0.8, 0.6, 0.7, 0.8, 0.3, 0.6, 0.9],
    ),
    (
        Archetype::CommunityBuilder,
        [0.4, 0.9, 0.3, 0.85, 0.6, 0.4, 0.8, 0.9, 0.7, 0.7, 0.8, 0.6],
    ),
    (
        Archetype::SoloSeeker,
        [0.7, 0.3, 0.6, 0.2, 0.5, 0.7, 0.7, 0.2, 0.9, 0.5, 0.4, 0.5],
    ),
    (
        Archetype::SocialButterfly,
        [0.6, 0.8, 0.5, 0.9, 0.8, 0.6, 0.6, 0.9, 0.5, 0.6, 0.7, 0.7],
    ),
    (
        Archetype::DeepThinker,
        [0.5, 0.4, 0.4, 0.3, 0.4, 0.6, 0.9, 0.3, 0.9, 0.8, 0.5, 0.7],
    ),
    (Archetype::Balanced, [0.5; DIMENSION_COUNT]),
];

/// Configuration for population generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub count: usize,
    pub seed: u64,
    /// Per-dimension Gaussian standard deviation.
    pub noise_std: f64,
    /// Selection weights for Explorer, CommunityBuilder, SoloSeeker,
    /// SocialButterfly, DeepThinker, Balanced.
    pub template_weights: [u32; 6],
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            count: 100,
            seed: 42,
            noise_std: 0.1,
            template_weights: [20, 20, 15, 15, 15, 15],
        }
    }
}

impl PopulationConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.noise_std.is_finite() || self.noise_std < 0.0 {
            return Err(format!("population noise_std must be non-negative, got {}", self.noise_std));
        }
        if self.template_weights.iter().all(|w| *w == 0) {
            return Err("template_weights must not all be zero".to_string());
        }
        Ok(())
    }
}

/// A generated profile with the template it was drawn from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedProfile {
    pub template: Archetype,
    pub profile: TraitProfile,
}

pub struct PopulationGenerator {
    config: PopulationConfig,
    rng: ChaCha8Rng,
}

impl PopulationGenerator {
    pub fn new(seed: u64, count: usize) -> Self {
        Self::with_config(PopulationConfig {
            seed,
            count,
            ..Default::default()
        })
    }

    pub fn with_config(config: PopulationConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    /// Generate `count` profiles with ids `user_0..`.
    pub fn generate(&mut self) -> BenchResult<Vec<GeneratedProfile>> {
        self.config.validate().map_err(BenchError::Config)?;

        let chooser = WeightedIndex::new(self.config.template_weights)
            .map_err(|e| BenchError::config(format!("invalid template weights: {}", e)))?;
        let noise = Normal::new(0.0, self.config.noise_std)
            .map_err(|e| BenchError::config(format!("invalid noise_std: {}", e)))?;

        let mut out = Vec::with_capacity(self.config.count);
        for i in 0..self.config.count {
            let (template, base) = TEMPLATES[chooser.sample(&mut self.rng)];
            let values: Vec<(Dimension, f64)> = Dimension::all()
                .into_iter()
                .zip(base)
                .map(|(d, v)| (d, (v + noise.sample(&mut self.rng)).clamp(0.0, 1.0)))
                .collect();
            out.push(GeneratedProfile {
                template,
                profile: TraitProfile::from_values(format!("user_{}", i), values),
            });
        }

        tracing::debug!(count = out.len(), seed = self.config.seed, "generated synthetic population");
        Ok(out)
    }

    /// Generate and keep only the profiles.
    pub fn generate_profiles(&mut self) -> BenchResult<Vec<TraitProfile>> {
        Ok(self.generate()?.into_iter().map(|g| g.profile).collect())
    }
}
