//! Weight grid search.
//!
//! Two searches share one driver:
//!
//! - **enhanced**: quantum / archetype / value weights of the enhanced score
//! - **topological**: jones / alexander / crossing / writhe weights of the
//!   polynomial-mode topological score
//!
//! For every candidate the fused score of every labeled pair is recomputed
//! under the configured fusion strategy and a threshold search is run.
//! Candidates are enumerated lexicographically and the first one with
//! strictly greater accuracy wins. The default weights are always evaluated
//! as the baseline and are returned when no candidate beats them.

use std::collections::BTreeMap;

use chrono::Utc;
use personality_knot_core::{
    EnhancedWeights, FusionStrategy, MatchingConfig, PairScorer, PreparedProfile, ScoreFusion,
    TopologicalCalculator, TopologicalMode, TopologicalWeights, TraitProfile,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::threshold::{ThresholdGrid, ThresholdResult, ThresholdSearch};
use crate::datasets::{GroundTruthSet, LabeledPairs};
use crate::metrics::{improvement_pct, mean, population_std};

const SUM_EPSILON: f64 = 1e-9;

/// Axis values in ascending order, duplicates and NaN removed.
fn sorted_axis(values: &[f64]) -> Vec<f64> {
    let mut axis: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    axis.sort_by(f64::total_cmp);
    axis.dedup();
    axis
}

// ===========================================================================
// Candidate grids
// ===========================================================================

/// Grid for the enhanced weights. Tuples with a sum above 1 are dropped;
/// kept tuples are normalized when scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancedGrid {
    pub quantum: Vec<f64>,
    pub archetype: Vec<f64>,
    pub value: Vec<f64>,
}

impl Default for EnhancedGrid {
    fn default() -> Self {
        Self {
            quantum: vec![0.50, 0.55, 0.60, 0.65, 0.70, 0.75],
            archetype: vec![0.15, 0.20, 0.25, 0.30],
            value: vec![0.10, 0.15, 0.20, 0.25],
        }
    }
}

impl EnhancedGrid {
    /// Kept tuples in lexicographic order of (quantum, archetype, value),
    /// independent of the order the axis values were given in.
    pub fn candidates(&self) -> Vec<EnhancedWeights> {
        let (quantum, archetype, value) = (
            sorted_axis(&self.quantum),
            sorted_axis(&self.archetype),
            sorted_axis(&self.value),
        );
        let mut out = Vec::new();
        for q in &quantum {
            for a in &archetype {
                for v in &value {
                    let w = EnhancedWeights::new(*q, *a, *v);
                    if w.sum() <= 1.0 + SUM_EPSILON && w.sum() > 0.0 {
                        out.push(w);
                    }
                }
            }
        }
        out
    }
}

/// Grid for the polynomial-mode topological weights. Tuples whose sum lies
/// outside `[min_sum, max_sum]` are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologicalGrid {
    pub jones: Vec<f64>,
    pub alexander: Vec<f64>,
    pub crossing: Vec<f64>,
    pub writhe: Vec<f64>,
    pub min_sum: f64,
    pub max_sum: f64,
}

impl Default for TopologicalGrid {
    fn default() -> Self {
        Self {
            jones: vec![0.2, 0.3, 0.35, 0.4, 0.5],
            alexander: vec![0.2, 0.3, 0.35, 0.4, 0.5],
            crossing: vec![0.1, 0.15, 0.2, 0.25],
            writhe: vec![0.0, 0.1, 0.15, 0.2],
            min_sum: 0.8,
            max_sum: 1.2,
        }
    }
}

impl TopologicalGrid {
    /// Kept tuples in lexicographic order of (jones, alexander, crossing, writhe).
    pub fn candidates(&self) -> Vec<TopologicalWeights> {
        let (jones, alexander, crossing, writhe) = (
            sorted_axis(&self.jones),
            sorted_axis(&self.alexander),
            sorted_axis(&self.crossing),
            sorted_axis(&self.writhe),
        );
        let mut out = Vec::new();
        for j in &jones {
            for a in &alexander {
                for c in &crossing {
                    for w in &writhe {
                        let weights = TopologicalWeights::new(*j, *a, *c, *w);
                        let sum = weights.sum();
                        if sum >= self.min_sum - SUM_EPSILON && sum <= self.max_sum + SUM_EPSILON {
                            out.push(weights);
                        }
                    }
                }
            }
        }
        out
    }
}

/// Named parameters of a weight tuple, for reports and sensitivity.
pub trait WeightParams: Copy + Serialize {
    fn parameters(&self) -> Vec<(&'static str, f64)>;
}

impl WeightParams for EnhancedWeights {
    fn parameters(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("quantum", self.quantum),
            ("archetype", self.archetype),
            ("value", self.value),
        ]
    }
}

impl WeightParams for TopologicalWeights {
    fn parameters(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("jones", self.jones),
            ("alexander", self.alexander),
            ("crossing", self.crossing),
            ("writhe", self.writhe),
        ]
    }
}

// ===========================================================================
// Results
// ===========================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateResult<P> {
    pub params: P,
    pub threshold: f64,
    pub accuracy: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roc_auc: Option<f64>,
}

impl<P> CandidateResult<P> {
    fn from_threshold(params: P, result: ThresholdResult) -> Self {
        Self {
            params,
            threshold: result.threshold,
            accuracy: result.accuracy,
            roc_auc: result.roc_auc(),
        }
    }
}

/// Spread of per-value mean accuracy, per parameter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterSensitivity {
    pub impact: BTreeMap<String, f64>,
    pub most_impactful: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightTuningResults<P> {
    pub timestamp: String,
    pub fusion: FusionStrategy,
    pub num_pairs: usize,
    /// Profile pairs without a label.
    pub skipped_pairs: usize,
    pub all_results: Vec<CandidateResult<P>>,
    pub baseline: CandidateResult<P>,
    /// The best candidate, or the baseline when nothing beats it.
    pub best: CandidateResult<P>,
    pub baseline_won: bool,
    pub improvement_pct: f64,
    pub sensitivity: ParameterSensitivity,
}

// ===========================================================================
// Optimizer
// ===========================================================================

pub struct WeightOptimizer {
    config: MatchingConfig,
    search: ThresholdSearch,
    enhanced_grid: EnhancedGrid,
    topological_grid: TopologicalGrid,
}

impl WeightOptimizer {
    /// `config` supplies the fusion strategy and the weights that are held
    /// fixed while the other set is searched.
    pub fn new(config: MatchingConfig, grid: ThresholdGrid) -> Self {
        Self {
            config,
            search: ThresholdSearch::new(grid),
            enhanced_grid: EnhancedGrid::default(),
            topological_grid: TopologicalGrid::default(),
        }
    }

    pub fn with_enhanced_grid(mut self, grid: EnhancedGrid) -> Self {
        self.enhanced_grid = grid;
        self
    }

    pub fn with_topological_grid(mut self, grid: TopologicalGrid) -> Self {
        self.topological_grid = grid;
        self
    }

    /// Search the enhanced weights with topological scoring held fixed.
    pub fn optimize_enhanced(
        &self,
        profiles: &[TraitProfile],
        ground_truth: &GroundTruthSet,
    ) -> WeightTuningResults<EnhancedWeights> {
        let scorer = PairScorer::new(self.config.clone());
        let prepared = scorer.prepare_all(profiles);
        let labeled = ground_truth.labeled_pairs(&prepared);

        let fixed: Vec<_> = labeled
            .pairs
            .par_iter()
            .map(|(i, j)| {
                let (a, b) = (&prepared[*i], &prepared[*j]);
                (scorer.components(a, b), scorer.topological(a, b))
            })
            .collect();

        let fusion = self.config.fusion;
        let evaluate = |weights: &EnhancedWeights| {
            let normalized = weights.normalized();
            let scores: Vec<f64> = fixed
                .iter()
                .map(|(components, topo)| fusion.fuse(components.combine(&normalized), *topo))
                .collect();
            CandidateResult::from_threshold(*weights, self.search.search(&scores, &labeled.labels))
        };

        self.run(
            "enhanced",
            self.enhanced_grid.candidates(),
            EnhancedWeights::default(),
            &labeled,
            evaluate,
        )
    }

    /// Search the polynomial-mode topological weights with the enhanced
    /// score held fixed.
    pub fn optimize_topological(
        &self,
        profiles: &[TraitProfile],
        ground_truth: &GroundTruthSet,
    ) -> WeightTuningResults<TopologicalWeights> {
        let scorer = PairScorer::new(self.config.clone());
        let prepared = scorer.prepare_all(profiles);
        let labeled = ground_truth.labeled_pairs(&prepared);

        let quantum: Vec<f64> = labeled
            .pairs
            .par_iter()
            .map(|(i, j)| scorer.quantum(&prepared[*i], &prepared[*j]))
            .collect();
        let fingerprints: Vec<(&PreparedProfile, &PreparedProfile)> = labeled
            .pairs
            .iter()
            .map(|(i, j)| (&prepared[*i], &prepared[*j]))
            .collect();

        let fusion = self.config.fusion;
        let evaluate = |weights: &TopologicalWeights| {
            let calculator = TopologicalCalculator::new(TopologicalMode::Polynomial, *weights);
            let scores: Vec<f64> = fingerprints
                .iter()
                .zip(&quantum)
                .map(|((a, b), q)| {
                    fusion.fuse(*q, calculator.compatibility(&a.fingerprint, &b.fingerprint))
                })
                .collect();
            CandidateResult::from_threshold(*weights, self.search.search(&scores, &labeled.labels))
        };

        self.run(
            "topological",
            self.topological_grid.candidates(),
            TopologicalWeights::default(),
            &labeled,
            evaluate,
        )
    }

    fn run<P, F>(
        &self,
        target: &str,
        candidates: Vec<P>,
        baseline_params: P,
        labeled: &LabeledPairs,
        evaluate: F,
    ) -> WeightTuningResults<P>
    where
        P: WeightParams + Send + Sync,
        F: Fn(&P) -> CandidateResult<P> + Sync,
    {
        tracing::info!(
            target_weights = target,
            candidates = candidates.len(),
            pairs = labeled.len(),
            fusion = %self.config.fusion,
            "starting weight grid search"
        );

        let all_results: Vec<CandidateResult<P>> = candidates.par_iter().map(&evaluate).collect();
        let baseline = evaluate(&baseline_params);

        let (best, baseline_won) = select_best(&all_results, &baseline);

        let improvement = improvement_pct(baseline.accuracy, best.accuracy);
        let sensitivity = analyze_sensitivity(&all_results);

        tracing::info!(
            target_weights = target,
            best_accuracy = best.accuracy,
            baseline_accuracy = baseline.accuracy,
            improvement_pct = improvement,
            baseline_won,
            "weight grid search finished"
        );

        WeightTuningResults {
            timestamp: Utc::now().to_rfc3339(),
            fusion: self.config.fusion,
            num_pairs: labeled.len(),
            skipped_pairs: labeled.skipped,
            all_results,
            baseline,
            best,
            baseline_won,
            improvement_pct: improvement,
            sensitivity,
        }
    }
}

/// First candidate with the highest accuracy, if it strictly beats the
/// baseline. Otherwise the baseline, flagged as the winner.
fn select_best<P: Clone>(results: &[CandidateResult<P>], baseline: &CandidateResult<P>) -> (CandidateResult<P>, bool) {
    let mut best: Option<&CandidateResult<P>> = None;
    for result in results {
        if best.map_or(true, |b| result.accuracy > b.accuracy) {
            best = Some(result);
        }
    }
    match best {
        Some(b) if b.accuracy > baseline.accuracy => (b.clone(), false),
        _ => (baseline.clone(), true),
    }
}

/// Population std of the per-value mean accuracy, for each parameter.
fn analyze_sensitivity<P: WeightParams>(results: &[CandidateResult<P>]) -> ParameterSensitivity {
    let mut grouped: BTreeMap<&'static str, BTreeMap<String, Vec<f64>>> = BTreeMap::new();
    for r in results {
        for (name, value) in r.params.parameters() {
            grouped
                .entry(name)
                .or_default()
                .entry(format!("{:.4}", value))
                .or_default()
                .push(r.accuracy);
        }
    }

    let impact: BTreeMap<String, f64> = grouped
        .into_iter()
        .map(|(name, by_value)| {
            let means: Vec<f64> = by_value.values().map(|v| mean(v)).collect();
            (name.to_string(), population_std(&means))
        })
        .collect();

    let most_impactful = impact
        .iter()
        .fold(None, |best: Option<(&String, f64)>, (name, v)| match best {
            Some((_, b)) if b >= *v => best,
            _ => Some((name, *v)),
        })
        .map(|(name, _)| name.clone());

    ParameterSensitivity {
        impact,
        most_impactful,
    }
}
