//! Job assembly and per-job policy derivation
//!
//! Everything a pipeline needs between "validated configuration" and
//! "configured execution engine" lives here:
//!
//! - **StreamJob**: orchestrates assembly and records operator registrations
//! - **ParallelismResolver**: layered per-operator parallelism decisions
//! - **CheckpointPolicy**: checkpoint settings and their application order
//! - **JobIdentity**: label-scoped naming for jobs and consumer groups

pub mod checkpoint;
pub mod identity;
pub mod parallelism;
pub mod stream_job;

// Re-exports for convenience
pub use checkpoint::{CheckpointPolicy, CheckpointingMode, ExternalizedCheckpointCleanup};
pub use identity::{JobIdentity, LIVE_LABEL};
pub use parallelism::ParallelismResolver;
pub use stream_job::{OperatorKind, OperatorRegistration, StreamJob};
