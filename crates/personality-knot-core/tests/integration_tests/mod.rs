//! Integration tests for the scoring pipeline.
//!
//! Deterministic profiles only:
//! - compatibility bounds and extremes
//! - knot generation totality and determinism
//! - topological reflexivity
//! - cluster separation under every fusion strategy

mod helpers;
mod clustering_tests;
mod knot_tests;
mod scoring_tests;
