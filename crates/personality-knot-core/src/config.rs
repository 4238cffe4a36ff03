//! Matching configuration.

use serde::{Deserialize, Serialize};

use crate::compatibility::{CompatibilityCalculator, CompatibilityMode, EnhancedWeights};
use crate::error::{KnotError, KnotResult};
use crate::fusion::FusionStrategy;
use crate::knot::{KnotGenerator, DEFAULT_CORRELATION_THRESHOLD};
use crate::topology::{TopologicalCalculator, TopologicalMode, TopologicalWeights};

/// Everything needed to score a pair of profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum |pseudo-correlation| for a crossing.
    pub correlation_threshold: f64,
    pub compatibility_mode: CompatibilityMode,
    pub enhanced_weights: EnhancedWeights,
    pub topological_mode: TopologicalMode,
    pub topological_weights: TopologicalWeights,
    pub fusion: FusionStrategy,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            correlation_threshold: DEFAULT_CORRELATION_THRESHOLD,
            compatibility_mode: CompatibilityMode::Probability,
            enhanced_weights: EnhancedWeights::default(),
            topological_mode: TopologicalMode::Baseline,
            topological_weights: TopologicalWeights::default(),
            fusion: FusionStrategy::default(),
        }
    }
}

impl MatchingConfig {
    /// Polynomial topology with default weights.
    pub fn polynomial() -> Self {
        Self {
            topological_mode: TopologicalMode::Polynomial,
            ..Default::default()
        }
    }

    pub fn with_fusion(mut self, fusion: FusionStrategy) -> Self {
        self.fusion = fusion;
        self
    }

    pub fn with_enhanced_weights(mut self, weights: EnhancedWeights) -> Self {
        self.enhanced_weights = weights;
        self
    }

    pub fn with_topological_weights(mut self, weights: TopologicalWeights) -> Self {
        self.topological_weights = weights;
        self
    }

    pub fn knot_generator(&self) -> KnotGenerator {
        KnotGenerator::new(self.correlation_threshold)
    }

    pub fn compatibility_calculator(&self) -> CompatibilityCalculator {
        CompatibilityCalculator::new(self.compatibility_mode, self.enhanced_weights)
    }

    pub fn topological_calculator(&self) -> TopologicalCalculator {
        TopologicalCalculator::new(self.topological_mode, self.topological_weights)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.correlation_threshold.is_finite() || !(0.0..=1.0).contains(&self.correlation_threshold) {
            return Err(format!(
                "correlation_threshold must be in [0, 1], got {}",
                self.correlation_threshold
            ));
        }
        self.enhanced_weights.validate()?;
        self.topological_weights.validate()?;
        self.fusion.validate()
    }

    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> KnotResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate().map_err(KnotError::ConfigError)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(MatchingConfig::default().validate().is_ok());
        assert!(MatchingConfig::polynomial().validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = MatchingConfig::from_json_str(
            r#"{"fusion": {"strategy": "two_stage", "filter_threshold": 0.4}, "topological_mode": "polynomial"}"#,
        )
        .unwrap();
        assert_eq!(config.fusion.key(), "two_stage");
        assert_eq!(config.topological_mode, TopologicalMode::Polynomial);
        assert_eq!(config.correlation_threshold, 0.3);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let err = MatchingConfig::from_json_str(r#"{"correlation_threshold": 2.0}"#).unwrap_err();
        assert!(matches!(err, KnotError::ConfigError(_)));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let err = MatchingConfig::from_json_str(r#"{"fusion": {"strategy": "median"}}"#).unwrap_err();
        assert!(matches!(err, KnotError::SerializationError(_)));
    }
}
