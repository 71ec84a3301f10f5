//! # streamjob
//!
//! Layered job configuration for distributed stream processing. Turns one
//! flat, validated configuration into the decisions a streaming runtime
//! needs before launch: per-operator parallelism, a checkpoint policy, and
//! label-scoped job identity, plus a substring filter for chasing
//! individual records through joins.

#![allow(clippy::needless_doctest_main)]
//!
//! ## Features
//!
//! - **Layered Parallelism**: per-operator multipliers, a job-wide sink
//!   multiplier, and a flat sink default, resolved in strict precedence
//!   order and clamped to the job's max parallelism
//! - **Checkpoint Policy**: assembled once from configuration and applied
//!   to any runtime behind the `ExecutionEngine` trait
//! - **Label-Scoped Identity**: canary and backfill runs get prefixed job
//!   names and consumer groups; the live run keeps its stable names
//! - **Debug Record Filter**: nine identifier substring sets, built once
//!   per replica and cheap enough for hot-path gating
//!
//! ## Quick Start
//!
//! ```rust
//! use streamjob::{JobConfig, RecordingEngine, StreamJob};
//!
//! fn main() -> Result<(), streamjob::JobConfigError> {
//!     let config = JobConfig::new(10)
//!         .with_parallelism(4)
//!         .with_job_label("canary")
//!         .with_operator_multiplier("flat-events", 2.0);
//!     let mut job = StreamJob::from_config(config)?;
//!
//!     // Program a runtime (here: one that just records the calls).
//!     let mut engine = RecordingEngine::new();
//!     job.configure_engine(&mut engine);
//!
//!     // Operators with a configured multiplier get an explicit decision.
//!     let operator = job.add_operator(&mut engine, "flat-events");
//!     assert_eq!(operator.parallelism, Some(8));
//!
//!     // Sinks always do.
//!     let sink = job.add_sink(&mut engine, "joined-events-sink");
//!     assert_eq!(sink.parallelism, Some(1));
//!
//!     // Labeled runs never collide with production names.
//!     assert_eq!(job.consumer_group_id("event-joiner"), "canary.event-joiner");
//!     Ok(())
//! }
//! ```

pub mod streamjob;

// Re-export main API at crate root for easy access
pub use streamjob::config::{
    // Core configuration
    JobConfig,

    DebugIdConfig,

    // Flag-value parsers
    parse_duration,
    parse_multiplier_entry,
};
pub use streamjob::debug::{DebugIds, RecordIdentifiers};
pub use streamjob::engine::{
    // Trait runtimes implement
    ExecutionEngine,

    // Recording double for tests and dry runs
    EngineCall,
    RecordingEngine,
};
pub use streamjob::error::JobConfigError;
pub use streamjob::job::{
    CheckpointPolicy,
    CheckpointingMode,
    ExternalizedCheckpointCleanup,
    JobIdentity,
    LIVE_LABEL,
    OperatorKind,
    OperatorRegistration,
    ParallelismResolver,
    StreamJob,
};
