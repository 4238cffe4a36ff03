//! Similarity-mode validation command.

use clap::Args;
use tracing::info;

use personality_knot_bench::SimilarityValidation;

use super::{exit_code, load_config, load_profiles, print_checks, report_writer, require_pairs, InputArgs};

/// Arguments for the validate-similarity command.
#[derive(Args, Debug)]
pub struct SimilarityArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

pub fn handle_validate_similarity(args: SimilarityArgs) -> i32 {
    exit_code("validate-similarity", run(args))
}

fn run(args: SimilarityArgs) -> anyhow::Result<()> {
    let config = load_config(&args.input, None)?;
    let profiles = load_profiles(&args.input, &config)?;
    require_pairs(&profiles)?;

    let result = SimilarityValidation::run(&profiles, config.significance);

    println!("Pairs:            {}", result.total_pairs);
    match result.correlation {
        Some(r) => println!("Correlation:      {:.4} (r^2 {:.4})", r, r * r),
        None => println!("Correlation:      undefined"),
    }
    if let Some(p) = result.p_value {
        println!("p-value:          {:.3e}", p);
    }
    println!("MAE / RMSE:       {:.4} / {:.4}", result.mae, result.rmse);
    println!(
        "Similarity mean:  {:.4} (std {:.4})",
        result.similarity_mean, result.similarity_std
    );
    println!(
        "Reference mean:   {:.4} (std {:.4})",
        result.reference_mean, result.reference_std
    );
    println!();
    print_checks(&[result.check()]);

    if let Some(writer) = report_writer(&args.input)? {
        let path = writer.write_json("similarity_validation.json", &result)?;
        info!("Results written to {}", path.display());
    }
    Ok(())
}
