//! Call-recording engine for tests and dry runs

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::streamjob::engine::ExecutionEngine;
use crate::streamjob::job::checkpoint::{CheckpointingMode, ExternalizedCheckpointCleanup};

/// One configuration call an engine received, in call order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineCall {
    RegisterProtoType(String),
    DisableAutoGeneratedUids,
    SetParallelism(u32),
    SetMaxParallelism(u32),
    SetOperatorParallelism(String, u32),
    EnableObjectReuse,
    EnableCheckpointing(Duration),
    SetCheckpointingMode(CheckpointingMode),
    SetMinPauseBetweenCheckpoints(Duration),
    EnableUnalignedCheckpoints,
    SetCheckpointTimeout(Duration),
    SetTolerableCheckpointFailures(u32),
    SetExternalizedCheckpointCleanup(ExternalizedCheckpointCleanup),
}

impl fmt::Display for EngineCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineCall::RegisterProtoType(name) => write!(f, "register_proto_type({})", name),
            EngineCall::DisableAutoGeneratedUids => write!(f, "disable_auto_generated_uids"),
            EngineCall::SetParallelism(n) => write!(f, "set_parallelism({})", n),
            EngineCall::SetMaxParallelism(n) => write!(f, "set_max_parallelism({})", n),
            EngineCall::SetOperatorParallelism(uid, n) => {
                write!(f, "set_operator_parallelism({}, {})", uid, n)
            }
            EngineCall::EnableObjectReuse => write!(f, "enable_object_reuse"),
            EngineCall::EnableCheckpointing(interval) => {
                write!(f, "enable_checkpointing({:?})", interval)
            }
            EngineCall::SetCheckpointingMode(mode) => {
                write!(f, "set_checkpointing_mode({})", mode)
            }
            EngineCall::SetMinPauseBetweenCheckpoints(pause) => {
                write!(f, "set_min_pause_between_checkpoints({:?})", pause)
            }
            EngineCall::EnableUnalignedCheckpoints => write!(f, "enable_unaligned_checkpoints"),
            EngineCall::SetCheckpointTimeout(timeout) => {
                write!(f, "set_checkpoint_timeout({:?})", timeout)
            }
            EngineCall::SetTolerableCheckpointFailures(count) => {
                write!(f, "set_tolerable_checkpoint_failures({})", count)
            }
            EngineCall::SetExternalizedCheckpointCleanup(cleanup) => {
                write!(f, "set_externalized_checkpoint_cleanup({})", cleanup)
            }
        }
    }
}

/// Engine that records every call instead of executing it.
///
/// Backs assertions about what a job would program into a real runtime,
/// and the dry-run output of the plan binary.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    calls: Vec<EngineCall>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<EngineCall> {
        self.calls
    }
}

impl ExecutionEngine for RecordingEngine {
    fn register_proto_type(&mut self, type_name: &str) {
        self.calls
            .push(EngineCall::RegisterProtoType(type_name.to_string()));
    }

    fn disable_auto_generated_uids(&mut self) {
        self.calls.push(EngineCall::DisableAutoGeneratedUids);
    }

    fn set_parallelism(&mut self, parallelism: u32) {
        self.calls.push(EngineCall::SetParallelism(parallelism));
    }

    fn set_max_parallelism(&mut self, max_parallelism: u32) {
        self.calls
            .push(EngineCall::SetMaxParallelism(max_parallelism));
    }

    fn set_operator_parallelism(&mut self, uid: &str, parallelism: u32) {
        self.calls.push(EngineCall::SetOperatorParallelism(
            uid.to_string(),
            parallelism,
        ));
    }

    fn enable_object_reuse(&mut self) {
        self.calls.push(EngineCall::EnableObjectReuse);
    }

    fn enable_checkpointing(&mut self, interval: Duration) {
        self.calls.push(EngineCall::EnableCheckpointing(interval));
    }

    fn set_checkpointing_mode(&mut self, mode: CheckpointingMode) {
        self.calls.push(EngineCall::SetCheckpointingMode(mode));
    }

    fn set_min_pause_between_checkpoints(&mut self, pause: Duration) {
        self.calls
            .push(EngineCall::SetMinPauseBetweenCheckpoints(pause));
    }

    fn enable_unaligned_checkpoints(&mut self) {
        self.calls.push(EngineCall::EnableUnalignedCheckpoints);
    }

    fn set_checkpoint_timeout(&mut self, timeout: Duration) {
        self.calls.push(EngineCall::SetCheckpointTimeout(timeout));
    }

    fn set_tolerable_checkpoint_failures(&mut self, count: u32) {
        self.calls
            .push(EngineCall::SetTolerableCheckpointFailures(count));
    }

    fn set_externalized_checkpoint_cleanup(&mut self, cleanup: ExternalizedCheckpointCleanup) {
        self.calls
            .push(EngineCall::SetExternalizedCheckpointCleanup(cleanup));
    }
}
