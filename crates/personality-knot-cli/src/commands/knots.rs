//! Knot generation command.
//!
//! Writes `knots.jsonl` (one knot per profile) and `knot_distribution.json`
//! when `--output` is given.

use clap::Args;
use tracing::info;

use personality_knot_bench::KnotDistribution;
use personality_knot_core::PersonalityKnot;

use super::{exit_code, load_config, load_profiles, report_writer, InputArgs};

/// Arguments for the knots command.
#[derive(Args, Debug)]
pub struct KnotsArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

pub fn handle_knots(args: KnotsArgs) -> i32 {
    exit_code("knots", run(args))
}

fn run(args: KnotsArgs) -> anyhow::Result<()> {
    let config = load_config(&args.input, None)?;
    let profiles = load_profiles(&args.input, &config)?;

    let generator = config.matching.knot_generator();
    let knots: Vec<PersonalityKnot> = profiles.iter().map(|p| generator.generate_knot(p)).collect();
    let distribution = KnotDistribution::analyze(&knots);

    println!("Knots generated: {}", distribution.total_knots);
    for (knot_type, count) in &distribution.type_counts {
        println!("  {:<16} {}", knot_type, count);
    }
    println!(
        "Complexity: mean {:.3}, median {:.3}, std {:.3}",
        distribution.complexity.mean, distribution.complexity.median, distribution.complexity.std_dev
    );
    println!(
        "Crossings:  mean {:.2}, min {:.0}, max {:.0}",
        distribution.crossing_number.mean, distribution.crossing_number.min, distribution.crossing_number.max
    );
    if let Some((knot_type, count)) = distribution.most_common() {
        println!("Most common: {} ({})", knot_type, count);
    }

    if let Some(writer) = report_writer(&args.input)? {
        writer.write_jsonl("knots.jsonl", &knots)?;
        writer.write_json("knot_distribution.json", &distribution)?;
        info!("Knot reports written to {}", writer.output_dir().display());
    }
    Ok(())
}
