//! K-fold cross-validation command.

use clap::Args;
use tracing::info;

use personality_knot_bench::{CrossValidator, MatchingComparator};

use super::{
    exit_code, load_config, load_ground_truth, load_profiles, report_writer, require_pairs,
    InputArgs, LabelArgs, ScoringArgs,
};

/// Arguments for the cross-validate command.
#[derive(Args, Debug)]
pub struct CrossValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub labels: LabelArgs,

    #[command(flatten)]
    pub scoring: ScoringArgs,

    /// Number of folds (overrides the configuration)
    #[arg(long)]
    pub folds: Option<usize>,
}

pub fn handle_cross_validate(args: CrossValidateArgs) -> i32 {
    exit_code("cross-validate", run(args))
}

fn run(args: CrossValidateArgs) -> anyhow::Result<()> {
    let mut config = load_config(&args.input, Some(&args.scoring))?;
    if let Some(folds) = args.folds {
        config.folds = folds;
    }
    let profiles = load_profiles(&args.input, &config)?;
    require_pairs(&profiles)?;
    let ground_truth = load_ground_truth(&args.labels, &config, &profiles)?;

    let comparator = MatchingComparator::new(config.matching.clone(), config.threshold_grid, config.significance);
    let validator = CrossValidator::new(comparator, config.folds, config.seed)?;
    let result = validator.run(&profiles, &ground_truth);

    println!("{}-fold cross-validation (seed {})", result.k, result.seed);
    println!("{:<6} {:>8} {:>8} {:>10} {:>10} {:>9}", "fold", "profiles", "pairs", "quantum", "integrated", "gain %");
    for fold in &result.folds {
        println!(
            "{:<6} {:>8} {:>8} {:>10.4} {:>10.4} {:>+9.2}",
            fold.fold,
            fold.profiles,
            fold.pairs,
            fold.quantum_accuracy,
            fold.integrated_accuracy,
            fold.improvement_pct
        );
    }
    if !result.skipped_folds.is_empty() {
        println!("Skipped folds (no labeled pairs): {:?}", result.skipped_folds);
    }
    println!(
        "Quantum-only: {:.4} +/- {:.4}",
        result.quantum_accuracy.mean, result.quantum_accuracy.std
    );
    println!(
        "Integrated:   {:.4} +/- {:.4}",
        result.integrated_accuracy.mean, result.integrated_accuracy.std
    );
    println!(
        "Improvement:  {:+.2}% +/- {:.2}",
        result.improvement_pct.mean, result.improvement_pct.std
    );

    if let Some(writer) = report_writer(&args.input)? {
        let path = writer.write_json("cross_validation.json", &result)?;
        info!("Results written to {}", path.display());
    }
    Ok(())
}
