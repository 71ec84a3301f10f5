//! Job configuration surface
//!
//! `JobConfig` is the flat, pre-validated input every other component works
//! from: parallelism bounds and overrides, checkpoint timings and flags, the
//! job label, and the debug-id substring sets. Flag parsing itself lives in
//! the binaries; this module only defines the struct, its defaults, and the
//! text parsers (durations, `uid=multiplier` entries) the binaries wire in.
//!
//! Configuration is layered the usual way:
//! 1. Defaults (suitable for a single-worker development run)
//! 2. Builder methods (programmatic and test construction)
//! 3. Flag values supplied by the deployment (the binaries' job)
//!
//! A validated `JobConfig` is serializable so the submitting process can
//! ship one copy to every execution replica; everything derived from it
//! (resolver, policy, debug filter) is rebuilt per replica.

pub mod duration;

pub use duration::parse_duration;

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::streamjob::error::JobConfigError;
use crate::streamjob::job::checkpoint::{CheckpointingMode, ExternalizedCheckpointCleanup};
use crate::streamjob::job::identity::LIVE_LABEL;

/// Configuration for one stream-processing job.
///
/// Field defaults mirror the deployment flag defaults. `max_parallelism` has
/// no usable default: it pins state partitioning across savepoints, so every
/// deployment must set it explicitly and `validate()` rejects the zero
/// placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Label distinguishing this run from the production ("live") instance.
    /// Default: "live".
    pub job_label: String,

    /// Base parallelism for the job. Default: 1.
    pub parallelism: u32,

    /// Upper bound for every resolved parallelism. Must be positive and
    /// should not change between savepoints. No default.
    pub max_parallelism: u32,

    /// Map of operator uid to parallelism multiplier. Highest priority of
    /// the parallelism overrides. Default: empty.
    pub operator_parallelism_multiplier: HashMap<String, f64>,

    /// If set, sinks without an explicit operator multiplier get
    /// `multiplier * parallelism`. Lower priority than
    /// `operator_parallelism_multiplier`, higher than
    /// `default_sink_parallelism`. Default: None.
    pub default_sink_parallelism_multiplier: Option<f64>,

    /// Flat sink parallelism when no multiplier applies. Lowest priority.
    /// Default: 1.
    pub default_sink_parallelism: u32,

    /// Whether to disable auto-generated operator uids in the engine.
    /// Default: true.
    pub disable_auto_generated_uids: bool,

    /// Whether to enable object reuse in the engine. Default: true.
    pub enable_object_reuse: bool,

    /// Checkpoint interval. Zero disables checkpointing. Default: 5 minutes.
    pub checkpoint_interval: Duration,

    /// Minimum pause between checkpoints. Zero leaves the engine default in
    /// force. Default: 5 seconds.
    pub min_pause_between_checkpoints: Duration,

    /// Checkpoint timeout. Zero leaves the engine default in force.
    /// Default: 1 hour.
    pub checkpoint_timeout: Duration,

    /// Whether to take unaligned checkpoints. Default: true.
    pub unaligned_checkpoints: bool,

    /// Consecutive checkpoint failures tolerated before the job is killed.
    /// Default: 3 (survives two random failures in a row).
    pub tolerable_checkpoint_failures: u32,

    /// Checkpointing mode. Always programmed into the engine, even when
    /// checkpointing itself is disabled. Default: exactly-once.
    pub checkpointing_mode: CheckpointingMode,

    /// What happens to externalized checkpoint state on cancellation.
    /// Default: retain.
    pub externalized_checkpoint_cleanup: ExternalizedCheckpointCleanup,

    /// Protobuf type names to register with the engine's serializer, passed
    /// through opaquely. Default: empty.
    pub proto_type_names: Vec<String>,

    /// Identifier substring sets gating verbose join diagnostics.
    /// Default: all empty (no record is flagged).
    pub debug_ids: DebugIdConfig,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            job_label: LIVE_LABEL.to_string(),
            parallelism: 1,
            max_parallelism: 0,
            operator_parallelism_multiplier: HashMap::new(),
            default_sink_parallelism_multiplier: None,
            default_sink_parallelism: 1,
            disable_auto_generated_uids: true,
            enable_object_reuse: true,
            checkpoint_interval: Duration::from_secs(300),
            min_pause_between_checkpoints: Duration::from_millis(5000),
            checkpoint_timeout: Duration::from_secs(3600),
            unaligned_checkpoints: true,
            tolerable_checkpoint_failures: 3,
            checkpointing_mode: CheckpointingMode::ExactlyOnce,
            externalized_checkpoint_cleanup: ExternalizedCheckpointCleanup::RetainOnCancellation,
            proto_type_names: Vec::new(),
            debug_ids: DebugIdConfig::default(),
        }
    }
}

impl JobConfig {
    /// Create a configuration with the required max parallelism; everything
    /// else takes the flag defaults.
    pub fn new(max_parallelism: u32) -> Self {
        Self {
            max_parallelism,
            ..Self::default()
        }
    }

    /// Set the job label
    pub fn with_job_label(mut self, label: impl Into<String>) -> Self {
        self.job_label = label.into();
        self
    }

    /// Set the base parallelism
    pub fn with_parallelism(mut self, parallelism: u32) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Set the max parallelism bound
    pub fn with_max_parallelism(mut self, max_parallelism: u32) -> Self {
        self.max_parallelism = max_parallelism;
        self
    }

    /// Add one operator parallelism multiplier
    pub fn with_operator_multiplier(mut self, uid: impl Into<String>, multiplier: f64) -> Self {
        self.operator_parallelism_multiplier
            .insert(uid.into(), multiplier);
        self
    }

    /// Add multiple operator parallelism multipliers
    pub fn with_operator_multipliers(mut self, multipliers: HashMap<String, f64>) -> Self {
        self.operator_parallelism_multiplier.extend(multipliers);
        self
    }

    /// Set the default sink parallelism multiplier
    pub fn with_default_sink_parallelism_multiplier(mut self, multiplier: f64) -> Self {
        self.default_sink_parallelism_multiplier = Some(multiplier);
        self
    }

    /// Set the flat default sink parallelism
    pub fn with_default_sink_parallelism(mut self, parallelism: u32) -> Self {
        self.default_sink_parallelism = parallelism;
        self
    }

    /// Enable or disable auto-generated uid suppression
    pub fn with_disable_auto_generated_uids(mut self, disable: bool) -> Self {
        self.disable_auto_generated_uids = disable;
        self
    }

    /// Enable or disable engine object reuse
    pub fn with_enable_object_reuse(mut self, enable: bool) -> Self {
        self.enable_object_reuse = enable;
        self
    }

    /// Set the checkpoint interval (zero disables checkpointing)
    pub fn with_checkpoint_interval(mut self, interval: Duration) -> Self {
        self.checkpoint_interval = interval;
        self
    }

    /// Set the minimum pause between checkpoints (zero leaves engine default)
    pub fn with_min_pause_between_checkpoints(mut self, pause: Duration) -> Self {
        self.min_pause_between_checkpoints = pause;
        self
    }

    /// Set the checkpoint timeout (zero leaves engine default)
    pub fn with_checkpoint_timeout(mut self, timeout: Duration) -> Self {
        self.checkpoint_timeout = timeout;
        self
    }

    /// Enable or disable unaligned checkpoints
    pub fn with_unaligned_checkpoints(mut self, unaligned: bool) -> Self {
        self.unaligned_checkpoints = unaligned;
        self
    }

    /// Set the tolerable consecutive checkpoint failure count
    pub fn with_tolerable_checkpoint_failures(mut self, count: u32) -> Self {
        self.tolerable_checkpoint_failures = count;
        self
    }

    /// Set the checkpointing mode
    pub fn with_checkpointing_mode(mut self, mode: CheckpointingMode) -> Self {
        self.checkpointing_mode = mode;
        self
    }

    /// Set the externalized checkpoint cleanup behavior
    pub fn with_externalized_checkpoint_cleanup(
        mut self,
        cleanup: ExternalizedCheckpointCleanup,
    ) -> Self {
        self.externalized_checkpoint_cleanup = cleanup;
        self
    }

    /// Register one protobuf type name with the engine serializer
    pub fn with_proto_type(mut self, type_name: impl Into<String>) -> Self {
        self.proto_type_names.push(type_name.into());
        self
    }

    /// Register multiple protobuf type names
    pub fn with_proto_types<I, S>(mut self, type_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.proto_type_names
            .extend(type_names.into_iter().map(Into::into));
        self
    }

    /// Set the debug-id substring sets
    pub fn with_debug_ids(mut self, debug_ids: DebugIdConfig) -> Self {
        self.debug_ids = debug_ids;
        self
    }

    /// Validate startup preconditions.
    ///
    /// Every parallelism bound must be positive. A zero `max_parallelism`
    /// in particular would silently clamp every resolution to 1, so it is
    /// rejected here, before any resolution can happen.
    pub fn validate(&self) -> Result<(), JobConfigError> {
        if self.max_parallelism == 0 {
            return Err(JobConfigError::NonPositiveParallelism {
                field: "maxParallelism",
            });
        }
        if self.parallelism == 0 {
            return Err(JobConfigError::NonPositiveParallelism {
                field: "parallelism",
            });
        }
        if self.default_sink_parallelism == 0 {
            return Err(JobConfigError::NonPositiveParallelism {
                field: "defaultSinkParallelism",
            });
        }
        Ok(())
    }

    /// One-line summary of the configuration for startup logging
    pub fn summary(&self) -> String {
        format!(
            "job_label={}, parallelism={}, max_parallelism={}, operator_multipliers={}, \
             default_sink_multiplier={:?}, default_sink_parallelism={}, \
             checkpoint_interval={:?}, checkpointing_mode={}, unaligned={}",
            self.job_label,
            self.parallelism,
            self.max_parallelism,
            self.operator_parallelism_multiplier.len(),
            self.default_sink_parallelism_multiplier,
            self.default_sink_parallelism,
            self.checkpoint_interval,
            self.checkpointing_mode,
            self.unaligned_checkpoints,
        )
    }
}

/// Identifier substring sets used to gate verbose join diagnostics.
///
/// Each set matches one identifier field on a record; a record is of
/// interest when any field contains any configured substring (OR across
/// fields). All sets default to empty, which flags nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugIdConfig {
    pub user_ids: HashSet<String>,
    pub log_user_ids: HashSet<String>,
    pub session_ids: HashSet<String>,
    pub view_ids: HashSet<String>,
    pub auto_view_ids: HashSet<String>,
    pub request_ids: HashSet<String>,
    pub insertion_ids: HashSet<String>,
    pub impression_ids: HashSet<String>,
    pub action_ids: HashSet<String>,
}

impl DebugIdConfig {
    /// Create an empty configuration (flags nothing)
    pub fn new() -> Self {
        Self::default()
    }

    /// True when every set is empty
    pub fn is_empty(&self) -> bool {
        self.user_ids.is_empty()
            && self.log_user_ids.is_empty()
            && self.session_ids.is_empty()
            && self.view_ids.is_empty()
            && self.auto_view_ids.is_empty()
            && self.request_ids.is_empty()
            && self.impression_ids.is_empty()
            && self.insertion_ids.is_empty()
            && self.action_ids.is_empty()
    }

    /// Set the user id substrings
    pub fn with_user_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.user_ids = collect_ids(ids);
        self
    }

    /// Set the log-user id substrings
    pub fn with_log_user_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.log_user_ids = collect_ids(ids);
        self
    }

    /// Set the session id substrings
    pub fn with_session_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.session_ids = collect_ids(ids);
        self
    }

    /// Set the view id substrings
    pub fn with_view_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.view_ids = collect_ids(ids);
        self
    }

    /// Set the auto-view id substrings
    pub fn with_auto_view_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auto_view_ids = collect_ids(ids);
        self
    }

    /// Set the request id substrings
    pub fn with_request_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request_ids = collect_ids(ids);
        self
    }

    /// Set the insertion id substrings
    pub fn with_insertion_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insertion_ids = collect_ids(ids);
        self
    }

    /// Set the impression id substrings
    pub fn with_impression_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.impression_ids = collect_ids(ids);
        self
    }

    /// Set the action id substrings
    pub fn with_action_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.action_ids = collect_ids(ids);
        self
    }
}

fn collect_ids<I, S>(ids: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ids.into_iter().map(Into::into).collect()
}

/// Parse one `uid=multiplier` operator override entry.
///
/// The uid is taken verbatim (operator uids are case-sensitive); the
/// multiplier must parse as a float. Used by the flag parsers.
pub fn parse_multiplier_entry(entry: &str) -> Result<(String, f64), JobConfigError> {
    let (uid, multiplier_text) = entry.split_once('=').ok_or_else(|| {
        JobConfigError::invalid_multiplier_entry(entry, "expected uid=multiplier")
    })?;
    let uid = uid.trim();
    if uid.is_empty() {
        return Err(JobConfigError::invalid_multiplier_entry(
            entry,
            "empty operator uid",
        ));
    }
    let multiplier: f64 = multiplier_text.trim().parse().map_err(|_| {
        JobConfigError::invalid_multiplier_entry(
            entry,
            format!("'{}' is not a number", multiplier_text.trim()),
        )
    })?;
    Ok((uid.to_string(), multiplier))
}
