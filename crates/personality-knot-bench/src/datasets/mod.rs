//! Profile sources and ground-truth labels.
//!
//! - **population**: seeded synthetic population around six archetype templates
//! - **loader**: JSON profile and label files with per-record rejection
//! - **ground_truth**: synthetic oracle labels for every profile pair

pub mod ground_truth;
pub mod loader;
pub mod population;

pub use ground_truth::{
    oracle_compatibility, GroundTruthGenerator, GroundTruthLabel, GroundTruthSet, LabeledPairs,
};
pub use loader::{LoadReport, ProfileLoader, Rejection};
pub use population::{GeneratedProfile, PopulationConfig, PopulationGenerator};
