//! Execution engine abstraction
//!
//! Jobs never talk to a concrete runtime directly; they program an
//! `ExecutionEngine`, the narrow surface a streaming runtime exposes for
//! pre-launch configuration. Production deployments adapt their runtime
//! behind this trait; tests and the plan binary use `RecordingEngine`,
//! which captures the exact call sequence instead of executing it.

pub mod recording;

pub use recording::{EngineCall, RecordingEngine};

use std::time::Duration;

use crate::streamjob::job::checkpoint::{CheckpointingMode, ExternalizedCheckpointCleanup};

/// Pre-launch configuration surface of a streaming runtime.
///
/// Calls are ordered by the job; implementations apply them as received.
/// All methods are infallible setters; a runtime that can reject a value
/// should validate at launch, not here.
pub trait ExecutionEngine {
    /// Register a protobuf type name with the runtime's serializer
    fn register_proto_type(&mut self, type_name: &str);

    /// Refuse operators without explicit uids
    fn disable_auto_generated_uids(&mut self);

    /// Set the base parallelism for operators without an explicit value
    fn set_parallelism(&mut self, parallelism: u32);

    /// Set the state-partitioning upper bound
    fn set_max_parallelism(&mut self, max_parallelism: u32);

    /// Set an explicit parallelism for one operator, overriding the base
    fn set_operator_parallelism(&mut self, uid: &str, parallelism: u32);

    /// Allow the runtime to reuse record objects between operators
    fn enable_object_reuse(&mut self);

    /// Enable periodic checkpointing at this interval
    fn enable_checkpointing(&mut self, interval: Duration);

    /// Set the checkpoint barrier mode
    fn set_checkpointing_mode(&mut self, mode: CheckpointingMode);

    /// Set the minimum pause after a checkpoint completes
    fn set_min_pause_between_checkpoints(&mut self, pause: Duration);

    /// Let checkpoints overtake in-flight records
    fn enable_unaligned_checkpoints(&mut self);

    /// Abort checkpoints that run longer than this
    fn set_checkpoint_timeout(&mut self, timeout: Duration);

    /// Consecutive checkpoint failures tolerated before the job fails
    fn set_tolerable_checkpoint_failures(&mut self, count: u32);

    /// Fate of externalized checkpoint state on cancellation
    fn set_externalized_checkpoint_cleanup(&mut self, cleanup: ExternalizedCheckpointCleanup);
}
