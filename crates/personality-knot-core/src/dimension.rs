//! Canonical trait dimensions.
//!
//! The declaration order of [`Dimension`] is the canonical order. Strand
//! indices, crossing enumeration, and serialized maps all follow it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of canonical dimensions (and braid strands).
pub const DIMENSION_COUNT: usize = 12;

/// Dimensions used for value alignment.
pub const VALUE_DIMENSIONS: [Dimension; 3] = [
    Dimension::ValueOrientation,
    Dimension::Authenticity,
    Dimension::TrustLevel,
];

/// Default read for a dimension absent from a profile.
pub const NEUTRAL_VALUE: f64 = 0.5;

/// The 12 canonical personality dimensions, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    ExplorationEagerness,
    CommunityOrientation,
    AdventureSeeking,
    SocialPreference,
    EnergyPreference,
    NoveltySeeking,
    ValueOrientation,
    CrowdTolerance,
    Authenticity,
    Archetype,
    TrustLevel,
    Openness,
}

impl Dimension {
    /// All dimensions in canonical order.
    pub fn all() -> [Self; DIMENSION_COUNT] {
        [
            Self::ExplorationEagerness,
            Self::CommunityOrientation,
            Self::AdventureSeeking,
            Self::SocialPreference,
            Self::EnergyPreference,
            Self::NoveltySeeking,
            Self::ValueOrientation,
            Self::CrowdTolerance,
            Self::Authenticity,
            Self::Archetype,
            Self::TrustLevel,
            Self::Openness,
        ]
    }

    /// Canonical index (0..12), also the braid strand.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExplorationEagerness => "exploration_eagerness",
            Self::CommunityOrientation => "community_orientation",
            Self::AdventureSeeking => "adventure_seeking",
            Self::SocialPreference => "social_preference",
            Self::EnergyPreference => "energy_preference",
            Self::NoveltySeeking => "novelty_seeking",
            Self::ValueOrientation => "value_orientation",
            Self::CrowdTolerance => "crowd_tolerance",
            Self::Authenticity => "authenticity",
            Self::Archetype => "archetype",
            Self::TrustLevel => "trust_level",
            Self::Openness => "openness",
        }
    }

    /// Parse a snake_case dimension name. Unknown names yield `None`.
    pub fn from_str(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase();
        Self::all().into_iter().find(|d| d.as_str() == key)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
