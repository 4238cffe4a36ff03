//! Synthetic ground-truth labels.
//!
//! Labels come from a feature oracle (dimension similarity, archetype
//! compatibility, value alignment) plus seeded Gaussian noise. They share
//! features with the scorer under test, so accuracy against them measures
//! self-consistency rather than real-world compatibility.

use std::collections::HashMap;

use personality_knot_core::compatibility::value_alignment;
use personality_knot_core::pipeline::pair_indices;
use personality_knot_core::{Archetype, PreparedProfile, TraitProfile};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::config::GroundTruthConfig;
use crate::error::{BenchError, BenchResult};

const DIMENSION_WEIGHT: f64 = 0.50;
const ARCHETYPE_WEIGHT: f64 = 0.25;
const VALUE_WEIGHT: f64 = 0.25;

/// One labeled pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTruthLabel {
    #[serde(alias = "user_a")]
    pub id_a: String,
    #[serde(alias = "user_b")]
    pub id_b: String,
    pub is_compatible: bool,
    /// Noisy score the label was thresholded from.
    pub compatibility_score: f64,
    /// Noise-free oracle score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub true_compatibility: Option<f64>,
}

/// Labels indexed by unordered id pair.
#[derive(Debug, Clone, Default)]
pub struct GroundTruthSet {
    labels: Vec<GroundTruthLabel>,
    index: HashMap<(String, String), usize>,
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl GroundTruthSet {
    /// Build from labels; on duplicate pairs the first label wins.
    pub fn from_labels(labels: Vec<GroundTruthLabel>) -> Self {
        let mut kept = Vec::with_capacity(labels.len());
        let mut index = HashMap::with_capacity(labels.len());
        for label in labels {
            let key = pair_key(&label.id_a, &label.id_b);
            if index.contains_key(&key) {
                tracing::warn!(id_a = %label.id_a, id_b = %label.id_b, "duplicate ground-truth pair ignored");
                continue;
            }
            index.insert(key, kept.len());
            kept.push(label);
        }
        Self {
            labels: kept,
            index,
        }
    }

    /// Label for a pair in either order.
    pub fn get(&self, a: &str, b: &str) -> Option<&GroundTruthLabel> {
        self.index.get(&pair_key(a, b)).map(|i| &self.labels[*i])
    }

    pub fn labels(&self) -> &[GroundTruthLabel] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn compatible_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_compatible).count()
    }

    /// Fraction labeled compatible; 0 when empty.
    pub fn compatible_rate(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        self.compatible_count() as f64 / self.labels.len() as f64
    }

    /// Pairs `(i, j)`, `i < j`, of `prepared` that carry a label, in
    /// row-major order. Unlabeled pairs are counted, not scored.
    pub fn labeled_pairs(&self, prepared: &[PreparedProfile]) -> LabeledPairs {
        let all: Vec<usize> = (0..prepared.len()).collect();
        self.labeled_pairs_within(prepared, &all)
    }

    /// Like [`Self::labeled_pairs`], restricted to pairs with both endpoints
    /// in `members` (indices into `prepared`, taken in ascending order).
    pub fn labeled_pairs_within(&self, prepared: &[PreparedProfile], members: &[usize]) -> LabeledPairs {
        let mut members = members.to_vec();
        members.sort_unstable();
        members.dedup();

        let mut out = LabeledPairs::default();
        for (a, b) in pair_indices(members.len()) {
            let (i, j) = (members[a], members[b]);
            match self.get(prepared[i].id(), prepared[j].id()) {
                Some(label) => {
                    out.pairs.push((i, j));
                    out.labels.push(label.is_compatible);
                }
                None => out.skipped += 1,
            }
        }
        if out.skipped > 0 {
            tracing::debug!(labeled = out.len(), skipped = out.skipped, "pairs without ground truth skipped");
        }
        out
    }
}

/// Index pairs into a prepared-profile slice with their labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledPairs {
    pub pairs: Vec<(usize, usize)>,
    pub labels: Vec<bool>,
    /// Pairs with no label.
    pub skipped: usize,
}

impl LabeledPairs {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn compatible_count(&self) -> usize {
        self.labels.iter().filter(|l| **l).count()
    }
}

/// Noise-free oracle score.
pub fn oracle_compatibility(
    a: &TraitProfile,
    archetype_a: Archetype,
    b: &TraitProfile,
    archetype_b: Archetype,
) -> f64 {
    (DIMENSION_WEIGHT * a.dimension_similarity(b)
        + ARCHETYPE_WEIGHT * archetype_a.compatibility(archetype_b)
        + VALUE_WEIGHT * value_alignment(a, b))
    .clamp(0.0, 1.0)
}

pub struct GroundTruthGenerator {
    config: GroundTruthConfig,
}

impl GroundTruthGenerator {
    pub fn new(config: GroundTruthConfig) -> Self {
        Self { config }
    }

    /// Label every pair `(i, j)`, `i < j`, in row-major order.
    pub fn generate(&self, profiles: &[TraitProfile]) -> BenchResult<GroundTruthSet> {
        self.config.validate().map_err(BenchError::Config)?;

        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let noise = Normal::new(0.0, self.config.noise_std)
            .map_err(|e| BenchError::config(format!("invalid noise_std: {}", e)))?;
        let archetypes: Vec<Archetype> = profiles.iter().map(Archetype::infer).collect();

        let n = profiles.len();
        let mut labels = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                let truth = oracle_compatibility(&profiles[i], archetypes[i], &profiles[j], archetypes[j]);
                let score = (truth + noise.sample(&mut rng)).clamp(0.0, 1.0);
                labels.push(GroundTruthLabel {
                    id_a: profiles[i].id().to_string(),
                    id_b: profiles[j].id().to_string(),
                    is_compatible: score >= self.config.label_threshold,
                    compatibility_score: score,
                    true_compatibility: Some(truth),
                });
            }
        }

        let set = GroundTruthSet::from_labels(labels);
        tracing::info!(
            pairs = set.len(),
            compatible = set.compatible_count(),
            seed = self.config.seed,
            "generated synthetic ground truth"
        );
        Ok(set)
    }
}
