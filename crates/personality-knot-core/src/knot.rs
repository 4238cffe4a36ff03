//! Correlation-to-structure generator.
//!
//! Every unordered pair of canonical dimensions `(i, j)` with `i < j` yields a
//! pseudo-correlation `(v_i - 0.5)(v_j - 0.5) * 4`. Pairs whose magnitude
//! exceeds the threshold become crossings in a 12-strand braid, and the braid
//! is summarized by placeholder invariants keyed on the crossing count.
//!
//! Generation is total: any profile, including the empty one, produces a knot.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dimension::{Dimension, DIMENSION_COUNT, NEUTRAL_VALUE};
use crate::profile::TraitProfile;

/// Default pseudo-correlation threshold for emitting a crossing.
pub const DEFAULT_CORRELATION_THRESHOLD: f64 = 0.3;

/// Upper bound on crossings: C(12, 2).
pub const MAX_CROSSINGS: usize = DIMENSION_COUNT * (DIMENSION_COUNT - 1) / 2;

/// Per-degree placeholder coefficient, `1 / sqrt(MAX_CROSSINGS)`.
const COEFFICIENT_STEP: f64 = 0.123_091_490_979_332_7;

// ===========================================================================
// Braid
// ===========================================================================

/// A single strand crossing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crossing {
    pub strand_i: usize,
    pub strand_j: usize,
    /// Positive correlation crosses over, negative under.
    pub is_over: bool,
    /// Emission index within the braid.
    pub position: usize,
    /// |pseudo-correlation|, capped at 1.
    pub strength: f64,
}

/// Ordered crossings over a fixed strand count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BraidSequence {
    pub strands: usize,
    pub crossings: Vec<Crossing>,
}

impl BraidSequence {
    pub fn len(&self) -> usize {
        self.crossings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crossings.is_empty()
    }

    /// Signed crossing sum: +1 per over-crossing, -1 per under-crossing.
    pub fn writhe(&self) -> i64 {
        self.crossings
            .iter()
            .map(|c| if c.is_over { 1 } else { -1 })
            .sum()
    }
}

// ===========================================================================
// Invariants
// ===========================================================================

/// Deterministic stand-in for a knot polynomial.
///
/// Only the degree carries information. It renders as `variable^degree`,
/// or `"1"` for degree 0, and its coefficient vector is cumulative so that
/// placeholders of nearby degree stay close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderPolynomial {
    pub variable: char,
    pub degree: usize,
}

impl PlaceholderPolynomial {
    pub fn new(variable: char, degree: usize) -> Self {
        Self { variable, degree }
    }

    /// True for the constant polynomial `1`.
    pub fn is_identity(&self) -> bool {
        self.degree == 0
    }

    /// Coefficients in ascending degree order: `degree + 1` equal entries
    /// of `1 / sqrt(MAX_CROSSINGS)`.
    ///
    /// The Euclidean distance between two placeholders is then
    /// `sqrt(|n - m| / MAX_CROSSINGS)`, growing with the degree gap.
    pub fn coefficients(&self) -> Vec<f64> {
        vec![COEFFICIENT_STEP; self.degree + 1]
    }

    pub fn label(&self) -> String {
        if self.is_identity() {
            "1".to_string()
        } else {
            format!("{}^{}", self.variable, self.degree)
        }
    }
}

impl fmt::Display for PlaceholderPolynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Invariants derived from the crossing count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnotInvariants {
    pub crossing_number: usize,
    pub unknotting_number: usize,
    pub jones: PlaceholderPolynomial,
    pub alexander: PlaceholderPolynomial,
}

impl KnotInvariants {
    pub fn from_crossing_number(crossing_number: usize) -> Self {
        Self {
            crossing_number,
            unknotting_number: crossing_number.saturating_sub(3),
            jones: PlaceholderPolynomial::new('q', crossing_number),
            alexander: PlaceholderPolynomial::new('t', crossing_number),
        }
    }
}

// ===========================================================================
// Knot Type
// ===========================================================================

/// Named knot classes keyed on crossing count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnotType {
    Unknot,
    Trefoil,
    FigureEight,
    Cinquefoil,
    Stevedore,
    ConwayLike,
    Complex(usize),
}

impl KnotType {
    pub fn classify(invariants: &KnotInvariants) -> Self {
        match invariants.crossing_number {
            0 => Self::Unknot,
            3 => Self::Trefoil,
            4 => Self::FigureEight,
            5 => Self::Cinquefoil,
            6 => Self::Stevedore,
            11 if invariants.jones.is_identity() => Self::ConwayLike,
            n => Self::Complex(n),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Unknot => "unknot".to_string(),
            Self::Trefoil => "trefoil".to_string(),
            Self::FigureEight => "figure-eight".to_string(),
            Self::Cinquefoil => "cinquefoil".to_string(),
            Self::Stevedore => "stevedore".to_string(),
            Self::ConwayLike => "conway-like".to_string(),
            Self::Complex(n) => format!("complex-{}", n),
        }
    }

    /// Parse a label produced by [`KnotType::label`].
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "unknot" => Some(Self::Unknot),
            "trefoil" => Some(Self::Trefoil),
            "figure-eight" => Some(Self::FigureEight),
            "cinquefoil" => Some(Self::Cinquefoil),
            "stevedore" => Some(Self::Stevedore),
            "conway-like" => Some(Self::ConwayLike),
            other => {
                let n: usize = other.strip_prefix("complex-")?.parse().ok()?;
                // Counts with a named class never classify as complex.
                let parsed = Self::classify(&KnotInvariants::from_crossing_number(n));
                (parsed == Self::Complex(n)).then_some(parsed)
            }
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Self::Complex(_))
    }
}

impl fmt::Display for KnotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for KnotType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for KnotType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        KnotType::from_label(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown knot type '{}'", label)))
    }
}

// ===========================================================================
// Knot
// ===========================================================================

/// Structural fingerprint of one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityKnot {
    pub id: String,
    pub knot_type: KnotType,
    pub braid: BraidSequence,
    pub invariants: KnotInvariants,
    /// crossing_number / 66, capped at 1.
    pub complexity: f64,
    pub dimension_to_strand: BTreeMap<Dimension, usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl PersonalityKnot {
    pub fn crossings(&self) -> &[Crossing] {
        &self.braid.crossings
    }

    pub fn crossing_number(&self) -> usize {
        self.invariants.crossing_number
    }
}

/// Builds knots from profiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnotGenerator {
    pub correlation_threshold: f64,
}

impl Default for KnotGenerator {
    fn default() -> Self {
        Self {
            correlation_threshold: DEFAULT_CORRELATION_THRESHOLD,
        }
    }
}

impl KnotGenerator {
    pub fn new(correlation_threshold: f64) -> Self {
        Self {
            correlation_threshold,
        }
    }

    /// Pseudo-correlation of a dimension pair; absent values read as 0.5.
    pub fn pseudo_correlation(profile: &TraitProfile, a: Dimension, b: Dimension) -> f64 {
        let va = profile.value_or_neutral(a) - NEUTRAL_VALUE;
        let vb = profile.value_or_neutral(b) - NEUTRAL_VALUE;
        va * vb * 4.0
    }

    /// Emit crossings for every canonical pair above the threshold.
    pub fn braid(&self, profile: &TraitProfile) -> BraidSequence {
        let dims = Dimension::all();
        let mut crossings = Vec::new();

        for (i, a) in dims.iter().enumerate() {
            for b in dims.iter().skip(i + 1) {
                let corr = Self::pseudo_correlation(profile, *a, *b);
                if corr.abs() > self.correlation_threshold {
                    crossings.push(Crossing {
                        strand_i: a.index(),
                        strand_j: b.index(),
                        is_over: corr > 0.0,
                        position: crossings.len(),
                        strength: corr.abs().min(1.0),
                    });
                }
            }
        }

        BraidSequence {
            strands: DIMENSION_COUNT,
            crossings,
        }
    }

    /// Generate the knot for a profile.
    pub fn generate_knot(&self, profile: &TraitProfile) -> PersonalityKnot {
        let braid = self.braid(profile);
        let invariants = KnotInvariants::from_crossing_number(braid.len());
        let knot_type = KnotType::classify(&invariants);
        let complexity = (braid.len() as f64 / MAX_CROSSINGS as f64).min(1.0);

        PersonalityKnot {
            id: profile.id().to_string(),
            knot_type,
            braid,
            invariants,
            complexity,
            dimension_to_strand: Dimension::all().into_iter().map(|d| (d, d.index())).collect(),
            created_at: profile.created_at(),
        }
    }
}
