//! Personality Knot CLI
//!
//! Scores profile pairs and runs the validation harness.
//!
//! # Commands
//!
//! - `knots`: Generate knots and print their distribution
//! - `ground-truth`: Generate synthetic compatibility labels
//! - `compare`: Quantum-only versus integrated matching accuracy
//! - `optimize-weights`: Grid search over the enhanced weights
//! - `optimize-topological`: Grid search over the topological weights
//! - `cross-validate`: K-fold cross-validation of the comparison
//! - `validate-similarity`: Similarity-mode score against dimension similarity
//!
//! Exit code 0 on success, 1 on error.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

/// Personality Knot - topological personality matching
#[derive(Parser)]
#[command(name = "personality-knot")]
#[command(version)]
#[command(about = "Personality knot matching and validation harness")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate knots for every profile and summarize their types
    Knots(commands::knots::KnotsArgs),
    /// Generate synthetic ground-truth labels for every profile pair
    ///
    /// Labels come from a feature oracle plus seeded noise; they measure
    /// self-consistency, not real-world compatibility.
    GroundTruth(commands::ground_truth::GroundTruthArgs),
    /// Compare quantum-only and integrated matching accuracy
    Compare(commands::compare::CompareArgs),
    /// Search enhanced (quantum / archetype / value) weights
    OptimizeWeights(commands::optimize::OptimizeArgs),
    /// Search polynomial-mode topological weights
    OptimizeTopological(commands::optimize::OptimizeArgs),
    /// K-fold cross-validation of the matching comparison
    CrossValidate(commands::cross_validate::CrossValidateArgs),
    /// Check the similarity-mode score against dimension similarity
    ValidateSimilarity(commands::similarity::SimilarityArgs),
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match cli.command {
        Commands::Knots(args) => commands::knots::handle_knots(args),
        Commands::GroundTruth(args) => commands::ground_truth::handle_ground_truth(args),
        Commands::Compare(args) => commands::compare::handle_compare(args),
        Commands::OptimizeWeights(args) => commands::optimize::handle_optimize_weights(args),
        Commands::OptimizeTopological(args) => commands::optimize::handle_optimize_topological(args),
        Commands::CrossValidate(args) => commands::cross_validate::handle_cross_validate(args),
        Commands::ValidateSimilarity(args) => commands::similarity::handle_validate_similarity(args),
    };

    std::process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compare() {
        let cli = Cli::try_parse_from([
            "personality-knot",
            "-vv",
            "compare",
            "--synthetic",
            "40",
            "--seed",
            "7",
            "--fusion",
            "two_stage",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Compare(args) => {
                assert_eq!(args.input.synthetic, Some(40));
                assert_eq!(args.input.seed, Some(7));
                assert_eq!(args.scoring.fusion.as_deref(), Some("two_stage"));
            }
            _ => panic!("expected compare"),
        }
    }

    #[test]
    fn test_profiles_conflict_with_synthetic() {
        let parsed = Cli::try_parse_from([
            "personality-knot",
            "knots",
            "--profiles",
            "p.json",
            "--synthetic",
            "10",
        ]);
        assert!(parsed.is_err());
    }
}
