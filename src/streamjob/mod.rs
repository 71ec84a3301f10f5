pub mod config;
pub mod debug;
pub mod engine;
pub mod error;
pub mod job;

// Re-export job types for binaries and tests
pub use config::{DebugIdConfig, JobConfig};
pub use error::JobConfigError;
pub use job::StreamJob;
