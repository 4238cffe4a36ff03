//! Validation harness.
//!
//! ## Modules
//!
//! - `comparison` - quantum-only versus integrated accuracy on labeled pairs
//! - `cross_validation` - seeded k-fold split and per-fold comparison
//! - `significance` - paired Student t-test on score differences
//! - `similarity` - similarity-mode score against dimension similarity
//!
//! Results expose [`ValidationCheck`]s so the CLI can print a uniform
//! pass/fail table.

pub mod comparison;
pub mod cross_validation;
pub mod significance;
pub mod similarity;

pub use comparison::{MatchingComparator, MatchingResult, PairOutcome, TARGET_IMPROVEMENT_PCT};
pub use cross_validation::{k_fold_split, CrossValidationResult, CrossValidator, FoldAggregate, FoldResult};
pub use significance::{PairedTest, SignificanceBackend, SignificanceReport, SIGNIFICANCE_LEVEL};
pub use similarity::{SimilarityValidation, CORRELATION_TARGET};

use serde::{Deserialize, Serialize};

/// Status of a validation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationStatus {
    Pass,
    /// Check failed.
    Fail,
    /// Not evaluated (missing data or statistic).
    Skip,
    /// Below target but not a failure.
    Warning,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Skip => "SKIP",
            Self::Warning => "WARN",
        }
    }
}

/// Priority level for validation checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckPriority {
    Critical,
    High,
    Medium,
    Low,
}

/// Individual validation check result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub name: String,
    pub description: String,
    pub status: ValidationStatus,
    pub expected: String,
    pub actual: String,
    pub details: Option<String>,
    pub priority: CheckPriority,
}

impl ValidationCheck {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            status: ValidationStatus::Skip,
            expected: String::new(),
            actual: String::new(),
            details: None,
            priority: CheckPriority::High,
        }
    }

    pub fn pass(self, actual: &str, expected: &str) -> Self {
        self.with_status(ValidationStatus::Pass, actual, expected)
    }

    pub fn fail(self, actual: &str, expected: &str) -> Self {
        self.with_status(ValidationStatus::Fail, actual, expected)
    }

    pub fn warning(self, actual: &str, expected: &str) -> Self {
        self.with_status(ValidationStatus::Warning, actual, expected)
    }

    fn with_status(mut self, status: ValidationStatus, actual: &str, expected: &str) -> Self {
        self.status = status;
        self.actual = actual.to_string();
        self.expected = expected.to_string();
        self
    }

    pub fn with_details(mut self, details: &str) -> Self {
        self.details = Some(details.to_string());
        self
    }

    pub fn with_priority(mut self, priority: CheckPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn is_passed(&self) -> bool {
        matches!(self.status, ValidationStatus::Pass)
    }

    pub fn is_critical_failure(&self) -> bool {
        matches!(self.status, ValidationStatus::Fail) && matches!(self.priority, CheckPriority::Critical)
    }
}

/// Counts over a set of checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSummary {
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
    pub skipped: usize,
    pub critical_failures: usize,
}

impl CheckSummary {
    pub fn from_checks(checks: &[ValidationCheck]) -> Self {
        let mut summary = Self::default();
        for check in checks {
            match check.status {
                ValidationStatus::Pass => summary.passed += 1,
                ValidationStatus::Fail => summary.failed += 1,
                ValidationStatus::Warning => summary.warnings += 1,
                ValidationStatus::Skip => summary.skipped += 1,
            }
            if check.is_critical_failure() {
                summary.critical_failures += 1;
            }
        }
        summary
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
