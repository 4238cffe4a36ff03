//! # Personality Knot Core
//!
//! Scoring primitives for personality-compatibility matching. A trait profile
//! is viewed two ways:
//!
//! 1. **Encoded state**: each of the 12 canonical dimensions becomes an
//!    amplitude `(real, phase)`, and two states are compared with a normalized
//!    inner product ("quantum" compatibility; ordinary real arithmetic).
//! 2. **Knot fingerprint**: pairwise dimension correlations are turned into a
//!    braid of crossings, summarized by deterministic invariants, and two
//!    fingerprints are compared structurally ("topological" compatibility).
//!
//! The two signals are combined by one of four [`FusionStrategy`] variants.
//!
//! ## Modules
//!
//! - [`dimension`] - canonical dimension enum and ordering
//! - [`profile`] - immutable trait profiles
//! - [`encoding`] - amplitude encoding and inner product
//! - [`compatibility`] - archetypes, value alignment, enhanced compatibility
//! - [`knot`] - correlation-to-braid generator and knot invariants
//! - [`topology`] - baseline and polynomial topological comparison
//! - [`fusion`] - score fusion strategies
//! - [`pipeline`] - per-profile caches and pair scoring
//! - [`config`] - matching configuration
//!
//! ## Usage
//!
//! ```rust
//! use personality_knot_core::{MatchingConfig, PairScorer, TraitProfile};
//!
//! let a = TraitProfile::uniform("a", 0.5);
//! let b = TraitProfile::uniform("b", 0.55);
//! let scorer = PairScorer::new(MatchingConfig::default());
//! let scores = scorer.score_profiles(&a, &b);
//! assert!(scores.fused >= 0.0 && scores.fused <= 1.0);
//! ```

pub mod compatibility;
pub mod config;
pub mod dimension;
pub mod encoding;
pub mod error;
pub mod fusion;
pub mod knot;
pub mod pipeline;
pub mod profile;
pub mod topology;

pub use compatibility::{Archetype, CompatibilityCalculator, CompatibilityMode, EnhancedWeights};
pub use config::MatchingConfig;
pub use dimension::{Dimension, DIMENSION_COUNT, VALUE_DIMENSIONS};
pub use encoding::{Amplitude, EncodedState};
pub use error::{KnotError, KnotResult};
pub use fusion::{FusionStrategy, ScoreFusion};
pub use knot::{BraidSequence, Crossing, KnotGenerator, KnotInvariants, KnotType, PersonalityKnot};
pub use pipeline::{PairScorer, PairScores, PreparedProfile};
pub use profile::TraitProfile;
pub use topology::{KnotFingerprint, TopologicalCalculator, TopologicalMode, TopologicalWeights};
