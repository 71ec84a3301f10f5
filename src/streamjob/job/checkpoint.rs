//! Checkpoint policy assembly
//!
//! `CheckpointPolicy` translates the checkpoint-related configuration into
//! an ordered sequence of engine calls. The gating rules are deliberate:
//! a zero interval disables periodic checkpointing entirely, while zero
//! pause or timeout values merely leave the engine's own defaults in force.
//! The mode, the tolerable failure count, and the externalized-cleanup
//! behavior are programmed unconditionally so the engine state is fully
//! determined by configuration even when checkpointing is off.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::streamjob::config::JobConfig;
use crate::streamjob::engine::ExecutionEngine;
use crate::streamjob::error::JobConfigError;

/// Delivery guarantee for checkpoint barriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointingMode {
    ExactlyOnce,
    AtLeastOnce,
}

impl fmt::Display for CheckpointingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckpointingMode::ExactlyOnce => write!(f, "exactly_once"),
            CheckpointingMode::AtLeastOnce => write!(f, "at_least_once"),
        }
    }
}

impl FromStr for CheckpointingMode {
    type Err = JobConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "exactly_once" => Ok(CheckpointingMode::ExactlyOnce),
            "at_least_once" => Ok(CheckpointingMode::AtLeastOnce),
            _ => Err(JobConfigError::UnknownCheckpointingMode(s.to_string())),
        }
    }
}

/// What happens to externalized checkpoint state when the job is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalizedCheckpointCleanup {
    RetainOnCancellation,
    DeleteOnCancellation,
}

impl fmt::Display for ExternalizedCheckpointCleanup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalizedCheckpointCleanup::RetainOnCancellation => {
                write!(f, "retain_on_cancellation")
            }
            ExternalizedCheckpointCleanup::DeleteOnCancellation => {
                write!(f, "delete_on_cancellation")
            }
        }
    }
}

impl FromStr for ExternalizedCheckpointCleanup {
    type Err = JobConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "retain_on_cancellation" => Ok(ExternalizedCheckpointCleanup::RetainOnCancellation),
            "delete_on_cancellation" => Ok(ExternalizedCheckpointCleanup::DeleteOnCancellation),
            _ => Err(JobConfigError::UnknownCheckpointCleanup(s.to_string())),
        }
    }
}

/// The checkpoint settings a job programs into its execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointPolicy {
    interval: Duration,
    mode: CheckpointingMode,
    min_pause: Duration,
    unaligned: bool,
    timeout: Duration,
    tolerable_failures: u32,
    cleanup: ExternalizedCheckpointCleanup,
}

impl CheckpointPolicy {
    pub fn from_config(config: &JobConfig) -> Self {
        Self {
            interval: config.checkpoint_interval,
            mode: config.checkpointing_mode,
            min_pause: config.min_pause_between_checkpoints,
            unaligned: config.unaligned_checkpoints,
            timeout: config.checkpoint_timeout,
            tolerable_failures: config.tolerable_checkpoint_failures,
            cleanup: config.externalized_checkpoint_cleanup,
        }
    }

    /// True when periodic checkpointing will be enabled. Engines schedule
    /// checkpoints at millisecond granularity, so an interval under 1ms
    /// counts as disabled.
    pub fn is_enabled(&self) -> bool {
        self.interval.as_millis() > 0
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn mode(&self) -> CheckpointingMode {
        self.mode
    }

    /// Program this policy into the engine.
    ///
    /// Order matters to downstream engines: checkpointing is enabled first
    /// (when the interval allows), then the barrier mode, pause, alignment,
    /// timeout, failure tolerance, and cleanup behavior. The conditional
    /// steps are skipped rather than called with a disabling value, leaving
    /// the engine defaults untouched.
    pub fn apply(&self, engine: &mut dyn ExecutionEngine) {
        log::debug!(
            "Applying checkpoint policy: interval={:?}, mode={}, unaligned={}",
            self.interval,
            self.mode,
            self.unaligned
        );

        if self.is_enabled() {
            engine.enable_checkpointing(self.interval);
        }
        engine.set_checkpointing_mode(self.mode);
        if self.min_pause.as_millis() > 0 {
            engine.set_min_pause_between_checkpoints(self.min_pause);
        }
        if self.unaligned {
            engine.enable_unaligned_checkpoints();
        }
        if self.timeout.as_millis() > 0 {
            engine.set_checkpoint_timeout(self.timeout);
        }
        engine.set_tolerable_checkpoint_failures(self.tolerable_failures);
        engine.set_externalized_checkpoint_cleanup(self.cleanup);
    }
}
