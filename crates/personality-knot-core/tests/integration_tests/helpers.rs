//! Deterministic profile builders.

use personality_knot_core::{Dimension, TraitProfile};

/// Reference profile hovering near the neutral value.
pub const NEAR_NEUTRAL: [f64; 12] = [
    0.52, 0.48, 0.55, 0.50, 0.47, 0.53, 0.50, 0.49, 0.51, 0.50, 0.52, 0.48,
];

/// Reference profile far from neutral. Shifting it by -0.009 drops three
/// crossings.
pub const NEAR_SKEWED: [f64; 12] = [
    0.85, 0.20, 0.76, 0.30, 0.72, 0.80, 0.22, 0.65, 0.35, 0.60, 0.80, 0.30,
];

/// Profile from 12 values in canonical order.
pub fn profile_from(id: &str, values: &[f64; 12]) -> TraitProfile {
    TraitProfile::from_values(id, Dimension::all().into_iter().zip(values.iter().copied()))
}

/// `base` shifted by `offset` on every dimension.
pub fn shifted(id: &str, base: &[f64; 12], offset: f64) -> TraitProfile {
    let mut values = *base;
    values.iter_mut().for_each(|v| *v += offset);
    profile_from(id, &values)
}

pub fn near_neutral(id: &str, offset: f64) -> TraitProfile {
    shifted(id, &NEAR_NEUTRAL, offset)
}

/// High (`high`) on the four dimensions of `block` (0..3), `1 - high` elsewhere.
pub fn block_profile_with(id: &str, block: usize, high: f64) -> TraitProfile {
    let mut values = [1.0 - high; 12];
    for v in values.iter_mut().skip(block * 4).take(4) {
        *v = high;
    }
    profile_from(id, &values)
}

/// High on the four dimensions of `block` (0..3), low elsewhere.
///
/// Any two distinct blocks differ by more than 0.6 on 8 of 12 dimensions.
pub fn block_profile(id: &str, block: usize) -> TraitProfile {
    block_profile_with(id, block, 0.92)
}

/// Sin-based deterministic profile, values in [0, 1].
pub fn wave_profile(id: &str, seed: u64) -> TraitProfile {
    let mut values = [0.0; 12];
    for (i, v) in values.iter_mut().enumerate() {
        let x = (i as f64 + seed as f64) * 0.7;
        *v = (x.sin() + 1.0) / 2.0;
    }
    profile_from(id, &values)
}
