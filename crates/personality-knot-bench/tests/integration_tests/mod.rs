//! Integration tests for the validation harness.
//!
//! - threshold calibration and weight-search tie handling
//! - seeded cross-validation folds
//! - file loading with malformed records
//! - end-to-end comparison with report output

mod calibration_tests;
mod loader_tests;
mod validation_tests;
