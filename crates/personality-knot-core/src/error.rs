//! Core error types.
//!
//! Scoring itself is total; errors only arise when building profiles or
//! configuration from untrusted input.

use thiserror::Error;

/// Errors raised by profile construction, parsing, and configuration.
#[derive(Debug, Error)]
pub enum KnotError {
    /// A trait value is not a finite number in [0, 1].
    #[error("Invalid value for dimension '{dimension}' in profile '{profile_id}': {value}")]
    InvalidTraitValue {
        /// Profile identifier
        profile_id: String,
        /// Dimension name
        dimension: String,
        /// Offending value rendered as text
        value: String,
    },

    /// Profile id is empty.
    #[error("Profile id must not be empty")]
    EmptyProfileId,

    /// Unknown fusion strategy key.
    #[error("Unknown fusion strategy '{0}' (expected weighted_average, conditional, multiplicative, two_stage)")]
    UnknownFusionStrategy(String),

    /// Invalid parameter value.
    #[error("Invalid parameter '{name}': {value}. {reason}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Parameter value as string
        value: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Configuration rejected by `validate()`.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type for core operations.
pub type KnotResult<T> = Result<T, KnotError>;

impl From<serde_json::Error> for KnotError {
    fn from(err: serde_json::Error) -> Self {
        KnotError::SerializationError(err.to_string())
    }
}

impl KnotError {
    /// Create an invalid parameter error.
    pub fn invalid_param(
        name: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        KnotError::InvalidParameter {
            name: name.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an invalid trait value error.
    pub fn invalid_trait(
        profile_id: impl Into<String>,
        dimension: impl Into<String>,
        value: impl ToString,
    ) -> Self {
        KnotError::InvalidTraitValue {
            profile_id: profile_id.into(),
            dimension: dimension.into(),
            value: value.to_string(),
        }
    }
}
