//! Weight grid search commands.
//!
//! `optimize-weights` searches the enhanced weights, `optimize-topological`
//! the polynomial-mode topological weights. Results go to
//! `enhanced_weights.json` or `topological_weights.json`.

use clap::Args;
use serde::Serialize;
use tracing::info;

use personality_knot_bench::tuning::{CandidateResult, WeightParams};
use personality_knot_bench::{WeightOptimizer, WeightTuningResults};

use super::{
    exit_code, load_config, load_ground_truth, load_profiles, report_writer, require_pairs,
    InputArgs, LabelArgs, ScoringArgs,
};

/// Arguments shared by both optimize commands.
#[derive(Args, Debug)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub labels: LabelArgs,

    #[command(flatten)]
    pub scoring: ScoringArgs,

    /// Number of top candidates to print
    #[arg(long, default_value = "5")]
    pub top: usize,
}

#[derive(Clone, Copy)]
enum Target {
    Enhanced,
    Topological,
}

pub fn handle_optimize_weights(args: OptimizeArgs) -> i32 {
    exit_code("optimize-weights", run(args, Target::Enhanced))
}

pub fn handle_optimize_topological(args: OptimizeArgs) -> i32 {
    exit_code("optimize-topological", run(args, Target::Topological))
}

fn run(args: OptimizeArgs, target: Target) -> anyhow::Result<()> {
    let config = load_config(&args.input, Some(&args.scoring))?;
    let profiles = load_profiles(&args.input, &config)?;
    require_pairs(&profiles)?;
    let ground_truth = load_ground_truth(&args.labels, &config, &profiles)?;

    let optimizer = WeightOptimizer::new(config.matching.clone(), config.threshold_grid);
    let writer = report_writer(&args.input)?;

    match target {
        Target::Enhanced => {
            let results = optimizer.optimize_enhanced(&profiles, &ground_truth);
            print_results("enhanced", &results, args.top);
            if let Some(writer) = writer {
                let path = writer.write_json("enhanced_weights.json", &results)?;
                info!("Results written to {}", path.display());
            }
        }
        Target::Topological => {
            let results = optimizer.optimize_topological(&profiles, &ground_truth);
            print_results("topological", &results, args.top);
            if let Some(writer) = writer {
                let path = writer.write_json("topological_weights.json", &results)?;
                info!("Results written to {}", path.display());
            }
        }
    }
    Ok(())
}

fn format_params<P: WeightParams>(params: &P) -> String {
    params
        .parameters()
        .iter()
        .map(|(name, value)| format!("{}={:.2}", name, value))
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_results<P: WeightParams + Serialize>(name: &str, results: &WeightTuningResults<P>, top: usize) {
    println!("{} weight search ({} fusion)", name, results.fusion);
    println!(
        "Pairs: {} ({} skipped), candidates: {}",
        results.num_pairs,
        results.skipped_pairs,
        results.all_results.len()
    );
    println!(
        "Baseline: {:.4} at {:.2}  [{}]",
        results.baseline.accuracy,
        results.baseline.threshold,
        format_params(&results.baseline.params)
    );
    println!(
        "Best:     {:.4} at {:.2}  [{}]",
        results.best.accuracy,
        results.best.threshold,
        format_params(&results.best.params)
    );
    if results.baseline_won {
        println!("No candidate beat the default weights");
    } else {
        println!("Improvement: {:+.2}%", results.improvement_pct);
    }

    let mut ranked: Vec<&CandidateResult<P>> = results.all_results.iter().collect();
    // stable: equal accuracies keep grid order
    ranked.sort_by(|a, b| b.accuracy.total_cmp(&a.accuracy));
    println!("Top {}:", top.min(ranked.len()));
    for (rank, candidate) in ranked.iter().take(top).enumerate() {
        println!(
            "  {}. {:.4}  [{}]",
            rank + 1,
            candidate.accuracy,
            format_params(&candidate.params)
        );
    }

    if let Some(param) = &results.sensitivity.most_impactful {
        println!("Most impactful parameter: {}", param);
    }
}
