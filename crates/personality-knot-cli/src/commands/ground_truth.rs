//! Synthetic ground-truth command.
//!
//! Writes `ground_truth.json` (`{"labels": [...]}`, readable back through
//! `--labels`) and the profiles it was built from.

use clap::Args;
use serde::Serialize;
use tracing::info;

use personality_knot_bench::datasets::GroundTruthLabel;
use personality_knot_bench::GroundTruthGenerator;
use personality_knot_core::TraitProfile;

use super::{exit_code, load_config, load_profiles, report_writer, InputArgs};

/// Arguments for the ground-truth command.
#[derive(Args, Debug)]
pub struct GroundTruthArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Serialize)]
struct LabelFile<'a> {
    synthetic: bool,
    seed: u64,
    noise_std: f64,
    label_threshold: f64,
    labels: &'a [GroundTruthLabel],
}

#[derive(Serialize)]
struct ProfileFile<'a> {
    profiles: &'a [TraitProfile],
}

pub fn handle_ground_truth(args: GroundTruthArgs) -> i32 {
    exit_code("ground-truth", run(args))
}

fn run(args: GroundTruthArgs) -> anyhow::Result<()> {
    let config = load_config(&args.input, None)?;
    let profiles = load_profiles(&args.input, &config)?;
    let ground_truth = GroundTruthGenerator::new(config.ground_truth.clone()).generate(&profiles)?;

    println!("Profiles:          {}", profiles.len());
    println!("Labeled pairs:     {}", ground_truth.len());
    println!(
        "Compatible pairs:  {} ({:.1}%)",
        ground_truth.compatible_count(),
        ground_truth.compatible_rate() * 100.0
    );
    println!("Labels are synthetic (feature oracle + noise sigma {})", config.ground_truth.noise_std);

    if let Some(writer) = report_writer(&args.input)? {
        writer.write_json(
            "ground_truth.json",
            &LabelFile {
                synthetic: true,
                seed: config.ground_truth.seed,
                noise_std: config.ground_truth.noise_std,
                label_threshold: config.ground_truth.label_threshold,
                labels: ground_truth.labels(),
            },
        )?;
        writer.write_json("profiles.json", &ProfileFile { profiles: &profiles })?;
        info!("Ground truth written to {}", writer.output_dir().display());
    }
    Ok(())
}
