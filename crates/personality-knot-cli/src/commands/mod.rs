//! CLI command handlers
//!
//! # Modules
//!
//! - `knots`: Knot generation and type distribution
//! - `ground_truth`: Synthetic label generation
//! - `compare`: Quantum-only versus integrated comparison with reports
//! - `optimize`: Enhanced and topological weight grid search
//! - `cross_validate`: K-fold cross-validation
//! - `similarity`: Similarity-mode self-consistency check
//!
//! Handlers return the process exit code. Shared input handling lives here.

pub mod compare;
pub mod cross_validate;
pub mod ground_truth;
pub mod knots;
pub mod optimize;
pub mod similarity;

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;
use tracing::{error, info, warn};

use personality_knot_bench::datasets::GroundTruthSet;
use personality_knot_bench::validation::{CheckSummary, ValidationCheck};
use personality_knot_bench::{
    EngineConfig, GroundTruthGenerator, PopulationConfig, PopulationGenerator, ProfileLoader,
    ReportWriter,
};
use personality_knot_core::{FusionStrategy, TopologicalMode, TraitProfile};

/// Profile source, seed, configuration, and output options.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// JSON file with profiles (list, or object with a `profiles`/`data` list)
    #[arg(long, conflicts_with = "synthetic")]
    pub profiles: Option<PathBuf>,

    /// Generate this many synthetic profiles instead of loading a file
    #[arg(long)]
    pub synthetic: Option<usize>,

    /// Seed for generation, label noise, and fold shuffling
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON engine configuration; unspecified fields take defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory for JSON reports
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Ground-truth source.
#[derive(Args, Debug, Clone)]
pub struct LabelArgs {
    /// JSON file with ground-truth labels; generated when omitted
    #[arg(long)]
    pub labels: Option<PathBuf>,
}

/// Scoring overrides applied on top of the configuration.
#[derive(Args, Debug, Clone)]
pub struct ScoringArgs {
    /// Fusion strategy: weighted_average, conditional, multiplicative, two_stage
    #[arg(long)]
    pub fusion: Option<String>,

    /// Use the polynomial topological score instead of the baseline
    #[arg(long)]
    pub polynomial: bool,
}

/// Load the configuration and apply command line overrides.
pub fn load_config(input: &InputArgs, scoring: Option<&ScoringArgs>) -> anyhow::Result<EngineConfig> {
    let mut config = match &input.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = input.seed {
        config = config.with_seed(seed);
    }
    if let Some(scoring) = scoring {
        if let Some(key) = &scoring.fusion {
            config.matching.fusion = FusionStrategy::from_key(key)?;
        }
        if scoring.polynomial {
            config.matching.topological_mode = TopologicalMode::Polynomial;
        }
    }
    config.validate().map_err(anyhow::Error::msg).context("invalid configuration")?;
    Ok(config)
}

/// Profiles from `--profiles`, or a synthetic population.
pub fn load_profiles(input: &InputArgs, config: &EngineConfig) -> anyhow::Result<Vec<TraitProfile>> {
    if let Some(path) = &input.profiles {
        let report = ProfileLoader::load_profiles(path)?;
        if report.rejected_count() > 0 {
            warn!(
                "{} of {} records rejected from {}",
                report.rejected_count(),
                report.rejected_count() + report.items.len(),
                path.display()
            );
        }
        return Ok(report.into_items());
    }

    let population = PopulationConfig {
        count: input.synthetic.unwrap_or(config.population.count),
        ..config.population.clone()
    };
    info!("Generating {} synthetic profiles (seed {})", population.count, population.seed);
    Ok(PopulationGenerator::with_config(population).generate_profiles()?)
}

/// Labels from `--labels`, or generated from the profiles.
pub fn load_ground_truth(
    labels: &LabelArgs,
    config: &EngineConfig,
    profiles: &[TraitProfile],
) -> anyhow::Result<GroundTruthSet> {
    match &labels.labels {
        Some(path) => {
            let report = ProfileLoader::load_labels(path)?;
            if report.rejected_count() > 0 {
                warn!("{} label records rejected from {}", report.rejected_count(), path.display());
            }
            Ok(GroundTruthSet::from_labels(report.into_items()))
        }
        None => Ok(GroundTruthGenerator::new(config.ground_truth.clone()).generate(profiles)?),
    }
}

/// Require at least two profiles for pairwise commands.
pub fn require_pairs(profiles: &[TraitProfile]) -> anyhow::Result<()> {
    if profiles.len() < 2 {
        bail!("need at least 2 profiles, got {}", profiles.len());
    }
    Ok(())
}

pub fn report_writer(input: &InputArgs) -> anyhow::Result<Option<ReportWriter>> {
    input
        .output
        .as_ref()
        .map(|dir| ReportWriter::new(dir.clone()))
        .transpose()
        .map_err(Into::into)
}

/// Print checks as a table on stdout.
pub fn print_checks(checks: &[ValidationCheck]) {
    println!("{:<24} {:<6} {:<14} {:<14}", "check", "status", "actual", "expected");
    for check in checks {
        println!(
            "{:<24} {:<6} {:<14} {:<14}",
            check.name,
            check.status.as_str(),
            check.actual,
            check.expected
        );
        if let Some(details) = &check.details {
            println!("  {}", details);
        }
    }
    let summary = CheckSummary::from_checks(checks);
    println!(
        "{} passed, {} warnings, {} failed, {} skipped",
        summary.passed, summary.warnings, summary.failed, summary.skipped
    );
}

/// Map a handler result to an exit code, logging the error chain.
pub fn exit_code(command: &str, result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("{} failed: {:#}", command, e);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> InputArgs {
        InputArgs {
            profiles: None,
            synthetic: Some(6),
            seed: Some(3),
            config: None,
            output: None,
        }
    }

    #[test]
    fn test_load_config_overrides() {
        let scoring = ScoringArgs {
            fusion: Some("conditional".to_string()),
            polynomial: true,
        };
        let config = load_config(&input(), Some(&scoring)).unwrap();
        assert_eq!(config.seed, 3);
        assert_eq!(config.ground_truth.seed, 3);
        assert_eq!(config.matching.fusion.key(), "conditional");
        assert_eq!(config.matching.topological_mode, TopologicalMode::Polynomial);
    }

    #[test]
    fn test_unknown_fusion_rejected() {
        let scoring = ScoringArgs {
            fusion: Some("median".to_string()),
            polynomial: false,
        };
        assert!(load_config(&input(), Some(&scoring)).is_err());
    }

    #[test]
    fn test_synthetic_profiles() {
        let config = load_config(&input(), None).unwrap();
        let profiles = load_profiles(&input(), &config).unwrap();
        assert_eq!(profiles.len(), 6);
        assert!(require_pairs(&profiles).is_ok());
        assert!(require_pairs(&profiles[..1]).is_err());
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(exit_code("x", Ok(())), 0);
        assert_eq!(exit_code("x", Err(anyhow::anyhow!("boom"))), 1);
    }
}
