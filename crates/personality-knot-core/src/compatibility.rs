//! Compatibility calculator.
//!
//! Combines three signals into the "enhanced" compatibility used as the
//! quantum-only matching score:
//!
//! - inner-product compatibility of the encoded states
//! - archetype compatibility from rule-based archetype inference
//! - value alignment over the value dimensions

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dimension::{Dimension, VALUE_DIMENSIONS};
use crate::encoding::EncodedState;
use crate::profile::TraitProfile;

// ===========================================================================
// Archetypes
// ===========================================================================

/// Coarse personality archetype inferred from a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Explorer,
    CommunityBuilder,
    SoloSeeker,
    SocialButterfly,
    DeepThinker,
    Balanced,
}

/// Archetype compatibility of complementary pairs.
pub const COMPLEMENTARY_SCORE: f64 = 0.8;
/// Archetype compatibility of similar (but distinct) pairs.
pub const SIMILAR_SCORE: f64 = 0.7;
/// Archetype compatibility of identical archetypes.
pub const SAME_SCORE: f64 = 0.9;
/// Archetype compatibility of unrelated pairs.
pub const NEUTRAL_SCORE: f64 = 0.5;

const COMPLEMENTARY_PAIRS: [(Archetype, Archetype); 3] = [
    (Archetype::Explorer, Archetype::CommunityBuilder),
    (Archetype::SoloSeeker, Archetype::SocialButterfly),
    (Archetype::DeepThinker, Archetype::SocialButterfly),
];

const SIMILAR_PAIRS: [(Archetype, Archetype); 2] = [
    (Archetype::Explorer, Archetype::SoloSeeker),
    (Archetype::CommunityBuilder, Archetype::SocialButterfly),
];

impl Archetype {
    pub fn all() -> [Self; 6] {
        [
            Self::Explorer,
            Self::CommunityBuilder,
            Self::SoloSeeker,
            Self::SocialButterfly,
            Self::DeepThinker,
            Self::Balanced,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Explorer => "explorer",
            Self::CommunityBuilder => "community_builder",
            Self::SoloSeeker => "solo_seeker",
            Self::SocialButterfly => "social_butterfly",
            Self::DeepThinker => "deep_thinker",
            Self::Balanced => "balanced",
        }
    }

    /// Infer the archetype. Rules are checked in order; absent values read as 0.5.
    pub fn infer(profile: &TraitProfile) -> Self {
        let exploration = profile.value_or_neutral(Dimension::ExplorationEagerness);
        let community = profile.value_or_neutral(Dimension::CommunityOrientation);
        let social = profile.value_or_neutral(Dimension::SocialPreference);
        let values = profile.value_or_neutral(Dimension::ValueOrientation);

        if exploration > 0.7 && community < 0.5 {
            Self::Explorer
        } else if community > 0.7 && social > 0.7 {
            Self::CommunityBuilder
        } else if social < 0.4 && exploration > 0.6 {
            Self::SoloSeeker
        } else if social > 0.8 {
            Self::SocialButterfly
        } else if values > 0.8 {
            Self::DeepThinker
        } else {
            Self::Balanced
        }
    }

    /// Symmetric archetype compatibility.
    ///
    /// Complementary pairs are checked before identity, so no pair is ever
    /// scored twice.
    pub fn compatibility(self, other: Archetype) -> f64 {
        let matches = |(x, y): &(Archetype, Archetype)| {
            (*x == self && *y == other) || (*x == other && *y == self)
        };
        if COMPLEMENTARY_PAIRS.iter().any(matches) {
            COMPLEMENTARY_SCORE
        } else if SIMILAR_PAIRS.iter().any(matches) {
            SIMILAR_SCORE
        } else if self == other {
            SAME_SCORE
        } else {
            NEUTRAL_SCORE
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mean of `1 - |a - b|` over the value dimensions, absent values read as 0.5.
pub fn value_alignment(a: &TraitProfile, b: &TraitProfile) -> f64 {
    let total: f64 = VALUE_DIMENSIONS
        .iter()
        .map(|d| 1.0 - (a.value_or_neutral(*d) - b.value_or_neutral(*d)).abs())
        .sum();
    total / VALUE_DIMENSIONS.len() as f64
}

// ===========================================================================
// Weights and Modes
// ===========================================================================

/// Weights of the enhanced compatibility components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancedWeights {
    pub quantum: f64,
    pub archetype: f64,
    pub value: f64,
}

impl Default for EnhancedWeights {
    fn default() -> Self {
        Self {
            quantum: 0.50,
            archetype: 0.25,
            value: 0.25,
        }
    }
}

impl EnhancedWeights {
    pub fn new(quantum: f64, archetype: f64, value: f64) -> Self {
        Self {
            quantum,
            archetype,
            value,
        }
    }

    pub fn sum(&self) -> f64 {
        self.quantum + self.archetype + self.value
    }

    /// Divide by the sum. Non-positive sums fall back to the defaults.
    pub fn normalized(&self) -> Self {
        let total = self.sum();
        if !(total > 0.0) {
            return Self::default();
        }
        Self::new(self.quantum / total, self.archetype / total, self.value / total)
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, w) in [
            ("quantum", self.quantum),
            ("archetype", self.archetype),
            ("value", self.value),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(format!("enhanced weight '{}' must be non-negative, got {}", name, w));
            }
        }
        if self.sum() <= 0.0 {
            return Err("enhanced weights must not all be zero".to_string());
        }
        Ok(())
    }
}

/// How the inner product becomes a score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityMode {
    /// Squared inner product (probability-like).
    #[default]
    Probability,
    /// Un-squared inner-product magnitude.
    Similarity,
}

/// Per-pair enhanced compatibility components, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnhancedComponents {
    pub quantum: f64,
    pub archetype: f64,
    pub value: f64,
}

impl EnhancedComponents {
    /// Weighted combination, clamped to [0, 1].
    pub fn combine(&self, weights: &EnhancedWeights) -> f64 {
        (weights.quantum * self.quantum
            + weights.archetype * self.archetype
            + weights.value * self.value)
            .clamp(0.0, 1.0)
    }
}

// ===========================================================================
// Calculator
// ===========================================================================

/// Computes base and enhanced compatibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompatibilityCalculator {
    pub mode: CompatibilityMode,
    pub weights: EnhancedWeights,
}

impl CompatibilityCalculator {
    pub fn new(mode: CompatibilityMode, weights: EnhancedWeights) -> Self {
        Self { mode, weights }
    }

    /// Inner-product compatibility of two encoded states in the configured mode.
    pub fn base_compatibility(&self, a: &EncodedState, b: &EncodedState) -> f64 {
        let overlap = a.inner_product(b);
        match self.mode {
            CompatibilityMode::Probability => (overlap * overlap).clamp(0.0, 1.0),
            CompatibilityMode::Similarity => overlap.abs().clamp(0.0, 1.0),
        }
    }

    /// Components for a pair whose states and archetypes are already known.
    pub fn components(
        &self,
        (profile_a, state_a, archetype_a): (&TraitProfile, &EncodedState, Archetype),
        (profile_b, state_b, archetype_b): (&TraitProfile, &EncodedState, Archetype),
    ) -> EnhancedComponents {
        EnhancedComponents {
            quantum: self.base_compatibility(state_a, state_b),
            archetype: archetype_a.compatibility(archetype_b),
            value: value_alignment(profile_a, profile_b),
        }
    }

    /// Enhanced compatibility of two profiles, encoding both on the fly.
    pub fn enhanced_compatibility(&self, a: &TraitProfile, b: &TraitProfile) -> f64 {
        let state_a = EncodedState::encode(a);
        let state_b = EncodedState::encode(b);
        self.components(
            (a, &state_a, Archetype::infer(a)),
            (b, &state_b, Archetype::infer(b)),
        )
        .combine(&self.weights.normalized())
    }
}
