//! Error types for job configuration
//!
//! Everything in here is fatal at startup: a job must never be submitted
//! with a configuration that failed validation or parsing.

use thiserror::Error;

/// Errors raised while parsing or validating a job configuration.
#[derive(Debug, Error)]
pub enum JobConfigError {
    /// A parallelism bound that must be positive was zero.
    #[error("{field} must be a positive integer")]
    NonPositiveParallelism { field: &'static str },

    /// A duration value could not be parsed.
    #[error("invalid duration '{input}': {reason}")]
    InvalidDuration { input: String, reason: String },

    /// An operator multiplier entry was not of the form `uid=multiplier`.
    #[error("invalid operator multiplier entry '{entry}': {reason}")]
    InvalidMultiplierEntry { entry: String, reason: String },

    /// An unrecognized checkpointing mode spelling.
    #[error("unknown checkpointing mode '{0}' (expected exactly_once or at_least_once)")]
    UnknownCheckpointingMode(String),

    /// An unrecognized externalized checkpoint cleanup spelling.
    #[error(
        "unknown externalized checkpoint cleanup '{0}' (expected retain_on_cancellation or delete_on_cancellation)"
    )]
    UnknownCheckpointCleanup(String),
}

impl JobConfigError {
    /// Helper to create duration parse errors with context
    pub fn invalid_duration(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDuration {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Helper to create multiplier entry parse errors with context
    pub fn invalid_multiplier_entry(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMultiplierEntry {
            entry: entry.into(),
            reason: reason.into(),
        }
    }
}
