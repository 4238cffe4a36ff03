//! Quantum-only versus integrated comparison command.

use clap::Args;
use tracing::info;

use personality_knot_bench::{
    ComparisonReport, MatchingComparator, ReportMetadata, SimilarityValidation,
};

use super::{
    exit_code, load_config, load_ground_truth, load_profiles, print_checks, report_writer,
    require_pairs, InputArgs, LabelArgs, ScoringArgs,
};

/// Arguments for the compare command.
#[derive(Args, Debug)]
pub struct CompareArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub labels: LabelArgs,

    #[command(flatten)]
    pub scoring: ScoringArgs,

    /// Also run the similarity-mode check and include it in the summary
    #[arg(long)]
    pub with_similarity: bool,
}

pub fn handle_compare(args: CompareArgs) -> i32 {
    exit_code("compare", run(args))
}

fn run(args: CompareArgs) -> anyhow::Result<()> {
    let config = load_config(&args.input, Some(&args.scoring))?;
    let profiles = load_profiles(&args.input, &config)?;
    require_pairs(&profiles)?;
    let ground_truth = load_ground_truth(&args.labels, &config, &profiles)?;

    let comparator = MatchingComparator::new(config.matching.clone(), config.threshold_grid, config.significance);
    let result = comparator.compare(&profiles, &ground_truth);

    println!("Fusion strategy:      {}", config.matching.fusion);
    println!(
        "Pairs:                {} ({} compatible, {} skipped)",
        result.total_pairs, result.compatible_pairs, result.skipped_pairs
    );
    println!(
        "Quantum-only:         {:.4} at threshold {:.2}",
        result.quantum.accuracy, result.quantum.threshold
    );
    println!(
        "Integrated:           {:.4} at threshold {:.2}",
        result.integrated.accuracy, result.integrated.threshold
    );
    println!("Improvement:          {:+.2}%", result.improvement_pct);
    match result.significance.p_value {
        Some(p) => println!("Paired t-test:        p = {:.4}", p),
        None => println!("Paired t-test:        unavailable"),
    }

    let mut report = ComparisonReport::new(
        &result,
        &config.matching,
        ReportMetadata::new(config.seed, args.labels.labels.is_none()),
    );
    if args.with_similarity {
        report = report.with_similarity(SimilarityValidation::run(&profiles, config.significance));
    }
    println!();
    print_checks(&report.checks);

    if let Some(writer) = report_writer(&args.input)? {
        let paths = writer.write_comparison(&result, &report)?;
        info!("Reports: {} and {}", paths.pairs.display(), paths.summary.display());
    }
    Ok(())
}
