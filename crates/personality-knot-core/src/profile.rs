//! Immutable trait profiles.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dimension::{Dimension, NEUTRAL_VALUE};
use crate::error::{KnotError, KnotResult};

/// A person's trait values over the canonical dimensions.
///
/// Values are always in [0, 1]. A profile may carry any subset of the 12
/// dimensions; reads through [`TraitProfile::value_or_neutral`] treat absent
/// dimensions as 0.5. Once built, a profile is not mutated: the builder
/// methods consume `self`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraitProfile {
    id: String,
    dimensions: BTreeMap<Dimension, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

impl TraitProfile {
    /// Create an empty profile.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            dimensions: BTreeMap::new(),
            created_at: None,
        }
    }

    /// Profile with every canonical dimension set to `value` (clamped).
    pub fn uniform(id: impl Into<String>, value: f64) -> Self {
        Dimension::all()
            .into_iter()
            .fold(Self::new(id), |p, d| p.with_value(d, value))
    }

    /// Build from `(dimension, value)` pairs, clamping each value.
    pub fn from_values(
        id: impl Into<String>,
        values: impl IntoIterator<Item = (Dimension, f64)>,
    ) -> Self {
        values
            .into_iter()
            .fold(Self::new(id), |p, (d, v)| p.with_value(d, v))
    }

    /// Set a dimension, clamping into [0, 1]. NaN is stored as the neutral value.
    pub fn with_value(mut self, dimension: Dimension, value: f64) -> Self {
        let v = if value.is_nan() {
            NEUTRAL_VALUE
        } else {
            value.clamp(0.0, 1.0)
        };
        self.dimensions.insert(dimension, v);
        self
    }

    /// Set a dimension, rejecting non-finite or out-of-range input.
    pub fn try_with_value(self, dimension: Dimension, value: f64) -> KnotResult<Self> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(KnotError::invalid_trait(&self.id, dimension.as_str(), value));
        }
        Ok(self.with_value(dimension, value))
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Stored value, if the dimension is present.
    pub fn value(&self, dimension: Dimension) -> Option<f64> {
        self.dimensions.get(&dimension).copied()
    }

    /// Stored value or 0.5 when absent.
    pub fn value_or_neutral(&self, dimension: Dimension) -> f64 {
        self.value(dimension).unwrap_or(NEUTRAL_VALUE)
    }

    pub fn contains(&self, dimension: Dimension) -> bool {
        self.dimensions.contains_key(&dimension)
    }

    /// Present `(dimension, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        self.dimensions.iter().map(|(d, v)| (*d, *v))
    }

    /// Number of present dimensions.
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Dimensions present in both profiles, in canonical order.
    pub fn shared_dimensions<'a>(&'a self, other: &'a TraitProfile) -> impl Iterator<Item = Dimension> + 'a {
        self.dimensions
            .keys()
            .copied()
            .filter(move |d| other.contains(*d))
    }

    /// Mean of `1 - |a - b|` over shared present dimensions; 0.5 when none are shared.
    pub fn dimension_similarity(&self, other: &TraitProfile) -> f64 {
        let diffs: Vec<f64> = self
            .shared_dimensions(other)
            .map(|d| 1.0 - (self.value_or_neutral(d) - other.value_or_neutral(d)).abs())
            .collect();
        if diffs.is_empty() {
            return NEUTRAL_VALUE;
        }
        diffs.iter().sum::<f64>() / diffs.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_value_clamps() {
        let p = TraitProfile::new("a")
            .with_value(Dimension::Openness, 1.4)
            .with_value(Dimension::TrustLevel, -0.2)
            .with_value(Dimension::Authenticity, f64::NAN);
        assert_eq!(p.value(Dimension::Openness), Some(1.0));
        assert_eq!(p.value(Dimension::TrustLevel), Some(0.0));
        assert_eq!(p.value(Dimension::Authenticity), Some(0.5));
    }

    #[test]
    fn test_try_with_value_rejects_out_of_range() {
        let err = TraitProfile::new("a")
            .try_with_value(Dimension::Openness, 1.2)
            .unwrap_err();
        assert!(matches!(err, KnotError::InvalidTraitValue { .. }));
        assert!(TraitProfile::new("a")
            .try_with_value(Dimension::Openness, f64::INFINITY)
            .is_err());
        assert!(TraitProfile::new("a")
            .try_with_value(Dimension::Openness, 1.0)
            .is_ok());
    }

    #[test]
    fn test_missing_reads_neutral() {
        let p = TraitProfile::new("a");
        assert!(p.is_empty());
        assert_eq!(p.value(Dimension::Openness), None);
        assert_eq!(p.value_or_neutral(Dimension::Openness), 0.5);
    }

    #[test]
    fn test_iter_is_canonical_order() {
        let p = TraitProfile::new("a")
            .with_value(Dimension::Openness, 0.1)
            .with_value(Dimension::ExplorationEagerness, 0.2);
        let dims: Vec<Dimension> = p.iter().map(|(d, _)| d).collect();
        assert_eq!(dims, vec![Dimension::ExplorationEagerness, Dimension::Openness]);
    }

    #[test]
    fn test_dimension_similarity() {
        let a = TraitProfile::uniform("a", 0.8);
        let b = TraitProfile::uniform("b", 0.6);
        assert!((a.dimension_similarity(&b) - 0.8).abs() < 1e-12);

        let disjoint = TraitProfile::new("c").with_value(Dimension::Openness, 0.1);
        let other = TraitProfile::new("d").with_value(Dimension::TrustLevel, 0.9);
        assert_eq!(disjoint.dimension_similarity(&other), 0.5);
    }

    #[test]
    fn test_serialize_shape() {
        let p = TraitProfile::new("user_1").with_value(Dimension::Openness, 0.25);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["id"], "user_1");
        assert_eq!(json["dimensions"]["openness"], 0.25);
        assert!(json.get("created_at").is_none());
    }
}
