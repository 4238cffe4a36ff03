//! JSON report structures.
//!
//! `summary.json` holds a [`ComparisonReport`]; `pairs.jsonl` holds one
//! [`PairRecord`] per labeled pair.

use chrono::Utc;
use personality_knot_core::{EnhancedWeights, MatchingConfig, TopologicalMode, TopologicalWeights};
use serde::{Deserialize, Serialize};

use crate::validation::{
    CheckSummary, CrossValidationResult, MatchingResult, PairOutcome, SignificanceReport,
    SimilarityValidation, ValidationCheck,
};

/// Schema version written into every report.
pub const REPORT_VERSION: &str = "1.0";

/// Report metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Report version for schema compatibility.
    pub version: String,
    /// RFC 3339 generation time.
    pub generated_at: String,
    pub seed: u64,
    /// Labels come from the synthetic oracle rather than observed outcomes.
    pub synthetic_labels: bool,
}

impl ReportMetadata {
    pub fn new(seed: u64, synthetic_labels: bool) -> Self {
        Self {
            version: REPORT_VERSION.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            seed,
            synthetic_labels,
        }
    }
}

/// Scoring settings the comparison ran with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringSettings {
    pub fusion: String,
    pub correlation_threshold: f64,
    pub enhanced_weights: EnhancedWeights,
    pub topological_mode: TopologicalMode,
    pub topological_weights: TopologicalWeights,
}

impl From<&MatchingConfig> for ScoringSettings {
    fn from(config: &MatchingConfig) -> Self {
        Self {
            fusion: config.fusion.key().to_string(),
            correlation_threshold: config.correlation_threshold,
            enhanced_weights: config.enhanced_weights,
            topological_mode: config.topological_mode,
            topological_weights: config.topological_weights,
        }
    }
}

/// Headline numbers of a comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccuracySummary {
    pub total_pairs: usize,
    pub compatible_pairs: usize,
    pub incompatible_pairs: usize,
    pub skipped_pairs: usize,
    pub quantum_accuracy: f64,
    pub quantum_threshold: f64,
    pub quantum_roc_auc: Option<f64>,
    pub integrated_accuracy: f64,
    pub integrated_threshold: f64,
    pub integrated_roc_auc: Option<f64>,
    pub improvement_pct: f64,
    pub meets_target: bool,
}

impl From<&MatchingResult> for AccuracySummary {
    fn from(result: &MatchingResult) -> Self {
        Self {
            total_pairs: result.total_pairs,
            compatible_pairs: result.compatible_pairs,
            incompatible_pairs: result.incompatible_pairs,
            skipped_pairs: result.skipped_pairs,
            quantum_accuracy: result.quantum.accuracy,
            quantum_threshold: result.quantum.threshold,
            quantum_roc_auc: result.quantum.roc_auc(),
            integrated_accuracy: result.integrated.accuracy,
            integrated_threshold: result.integrated.threshold,
            integrated_roc_auc: result.integrated.roc_auc(),
            improvement_pct: result.improvement_pct,
            meets_target: result.meets_target(),
        }
    }
}

/// Complete `summary.json` document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub metadata: ReportMetadata,
    pub settings: ScoringSettings,
    pub summary: AccuracySummary,
    pub significance: SignificanceReport,
    pub checks: Vec<ValidationCheck>,
    pub check_summary: CheckSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_validation: Option<CrossValidationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<SimilarityValidation>,
}

impl ComparisonReport {
    pub fn new(result: &MatchingResult, config: &MatchingConfig, metadata: ReportMetadata) -> Self {
        let checks = result.checks();
        Self {
            metadata,
            settings: ScoringSettings::from(config),
            summary: AccuracySummary::from(result),
            significance: result.significance.clone(),
            check_summary: CheckSummary::from_checks(&checks),
            checks,
            cross_validation: None,
            similarity: None,
        }
    }

    pub fn with_cross_validation(mut self, cv: CrossValidationResult) -> Self {
        self.cross_validation = Some(cv);
        self
    }

    pub fn with_similarity(mut self, similarity: SimilarityValidation) -> Self {
        self.checks.push(similarity.check());
        self.check_summary = CheckSummary::from_checks(&self.checks);
        self.similarity = Some(similarity);
        self
    }
}

/// One line of `pairs.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRecord {
    pub id_a: String,
    pub id_b: String,
    pub quantum: f64,
    pub topological: f64,
    pub fused: f64,
    pub quantum_threshold: f64,
    pub integrated_threshold: f64,
    pub is_compatible: bool,
    pub quantum_correct: bool,
    pub integrated_correct: bool,
}

impl PairRecord {
    pub fn from_outcome(outcome: &PairOutcome, quantum_threshold: f64, integrated_threshold: f64) -> Self {
        Self {
            id_a: outcome.id_a.clone(),
            id_b: outcome.id_b.clone(),
            quantum: outcome.scores.quantum,
            topological: outcome.scores.topological,
            fused: outcome.scores.fused,
            quantum_threshold,
            integrated_threshold,
            is_compatible: outcome.is_compatible,
            quantum_correct: outcome.quantum_correct,
            integrated_correct: outcome.integrated_correct,
        }
    }

    /// Records for every scored pair of a comparison.
    pub fn from_result(result: &MatchingResult) -> Vec<Self> {
        result
            .pairs
            .iter()
            .map(|p| Self::from_outcome(p, result.quantum.threshold, result.integrated.threshold))
            .collect()
    }
}
