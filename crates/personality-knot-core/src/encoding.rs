//! Amplitude encoding of trait profiles.
//!
//! Each dimension becomes an [`Amplitude`] with the trait value as its real
//! part and a phase that measures how far the value sits from the profile's
//! other values. Comparison is an inner product over the dimensions present
//! in both states, normalized so that a state compared with itself scores 1.

use serde::{Deserialize, Serialize};

use crate::dimension::{Dimension, DIMENSION_COUNT, NEUTRAL_VALUE};
use crate::profile::TraitProfile;

/// Phase scale applied to the deviation from the mean of the other values.
pub const PHASE_SCALE: f64 = 0.5;

/// Per-dimension amplitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Amplitude {
    /// Trait value.
    pub real: f64,
    /// Deviation from the mean of the other present values, scaled.
    pub phase: f64,
}

impl Amplitude {
    /// Amplitude used for absent dimensions.
    pub const NEUTRAL: Amplitude = Amplitude {
        real: NEUTRAL_VALUE,
        phase: 0.0,
    };

    /// Squared magnitude.
    #[inline]
    pub fn norm_sqr(&self) -> f64 {
        self.real * self.real + self.phase * self.phase
    }

    /// Real inner product of the two `(real, phase)` pairs.
    #[inline]
    pub fn dot(&self, other: &Amplitude) -> f64 {
        self.real * other.real + self.phase * other.phase
    }
}

/// Encoded state covering all 12 dimensions, with presence flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedState {
    amplitudes: [Amplitude; DIMENSION_COUNT],
    present: [bool; DIMENSION_COUNT],
}

impl EncodedState {
    /// Encode a profile. Never fails; an empty profile yields an all-absent state.
    pub fn encode(profile: &TraitProfile) -> Self {
        let mut amplitudes = [Amplitude::NEUTRAL; DIMENSION_COUNT];
        let mut present = [false; DIMENSION_COUNT];

        let total: f64 = profile.iter().map(|(_, v)| v).sum();
        let count = profile.len();

        for (dim, value) in profile.iter() {
            let phase = if count > 1 {
                let others_mean = (total - value) / (count - 1) as f64;
                (value - others_mean) * PHASE_SCALE
            } else {
                0.0
            };
            amplitudes[dim.index()] = Amplitude { real: value, phase };
            present[dim.index()] = true;
        }

        Self { amplitudes, present }
    }

    pub fn amplitude(&self, dimension: Dimension) -> Amplitude {
        self.amplitudes[dimension.index()]
    }

    pub fn is_present(&self, dimension: Dimension) -> bool {
        self.present[dimension.index()]
    }

    /// Number of present dimensions.
    pub fn present_count(&self) -> usize {
        self.present.iter().filter(|p| **p).count()
    }

    /// Dimensions present in both states, canonical order.
    pub fn shared_dimensions<'a>(&'a self, other: &'a EncodedState) -> impl Iterator<Item = Dimension> + 'a {
        Dimension::all()
            .into_iter()
            .filter(move |d| self.is_present(*d) && other.is_present(*d))
    }

    /// Normalized inner product over the shared dimensions.
    ///
    /// Computes `sum(a.dot(b)) / sqrt(sum |a|^2 * sum |b|^2)` over the
    /// intersection, which equals the mean-over-shared inner product of the
    /// two states after scaling each to unit mean-square amplitude.
    ///
    /// # Returns
    ///
    /// A value in [-1, 1]; 0.0 when nothing is shared or either side has zero
    /// amplitude on the shared dimensions.
    pub fn inner_product(&self, other: &EncodedState) -> f64 {
        let mut dot = 0.0;
        let mut norm_a = 0.0;
        let mut norm_b = 0.0;
        let mut shared = 0usize;

        for dim in self.shared_dimensions(other) {
            let a = self.amplitude(dim);
            let b = other.amplitude(dim);
            dot += a.dot(&b);
            norm_a += a.norm_sqr();
            norm_b += b.norm_sqr();
            shared += 1;
        }

        if shared == 0 {
            return 0.0;
        }
        let denom = (norm_a * norm_b).sqrt();
        if denom <= f64::EPSILON {
            return 0.0;
        }
        (dot / denom).clamp(-1.0, 1.0)
    }
}
