//! Job assembly
//!
//! `StreamJob` is what a concrete pipeline builds itself on top of: it
//! validates the configuration once, derives the identity, resolver, and
//! checkpoint policy from it, and registers each operator the pipeline
//! declares, programming explicit parallelism decisions into the engine as
//! they are made. Every registration is also recorded with its decision;
//! the records back test assertions and dry-run plan output.

use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;

use crate::streamjob::config::JobConfig;
use crate::streamjob::debug::DebugIds;
use crate::streamjob::engine::ExecutionEngine;
use crate::streamjob::error::JobConfigError;
use crate::streamjob::job::checkpoint::CheckpointPolicy;
use crate::streamjob::job::identity::JobIdentity;
use crate::streamjob::job::parallelism::ParallelismResolver;

/// Role of a registered operator in the job graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    Source,
    Operator,
    Sink,
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorKind::Source => write!(f, "source"),
            OperatorKind::Operator => write!(f, "operator"),
            OperatorKind::Sink => write!(f, "sink"),
        }
    }
}

/// One operator registration and the parallelism decided for it.
/// `parallelism` is `None` when the operator keeps the engine default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorRegistration {
    pub uid: String,
    pub kind: OperatorKind,
    pub parallelism: Option<u32>,
}

/// A configured stream-processing job under assembly.
#[derive(Debug)]
pub struct StreamJob {
    config: JobConfig,
    identity: JobIdentity,
    resolver: ParallelismResolver,
    checkpoint_policy: CheckpointPolicy,
    registrations: Vec<OperatorRegistration>,
    cached_debug_ids: OnceLock<DebugIds>,
}

impl StreamJob {
    /// Validate the configuration and derive the per-job components.
    /// Fails fast on bad parallelism bounds so no resolution can run
    /// against a zero `max_parallelism`.
    pub fn from_config(config: JobConfig) -> Result<Self, JobConfigError> {
        config.validate()?;
        log::info!("Job configuration: {}", config.summary());

        let identity = JobIdentity::from_config(&config);
        let resolver = ParallelismResolver::from_config(&config);
        let checkpoint_policy = CheckpointPolicy::from_config(&config);

        Ok(Self {
            config,
            identity,
            resolver,
            checkpoint_policy,
            registrations: Vec::new(),
            cached_debug_ids: OnceLock::new(),
        })
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    pub fn identity(&self) -> &JobIdentity {
        &self.identity
    }

    pub fn resolver(&self) -> &ParallelismResolver {
        &self.resolver
    }

    pub fn checkpoint_policy(&self) -> &CheckpointPolicy {
        &self.checkpoint_policy
    }

    /// Label-scoped job name
    pub fn job_name(&self, base_name: &str) -> String {
        self.identity.job_name(base_name)
    }

    /// Label-scoped consumer group id
    pub fn consumer_group_id(&self, base_name: &str) -> String {
        self.identity.consumer_group_id(base_name)
    }

    /// Register a source. Sources only get an explicit parallelism when a
    /// multiplier is configured for their uid; otherwise the engine default
    /// stays in force and the engine is not called.
    pub fn add_source(
        &mut self,
        engine: &mut dyn ExecutionEngine,
        uid: impl Into<String>,
    ) -> OperatorRegistration {
        let uid = uid.into();
        let parallelism = self.resolver.operator_parallelism(&uid);
        if let Some(parallelism) = parallelism {
            log::info!("source {} parallelism={}", uid, parallelism);
            engine.set_operator_parallelism(&uid, parallelism);
        }
        self.record(uid, OperatorKind::Source, parallelism)
    }

    /// Register a mid-graph operator. Without a configured multiplier the
    /// operator keeps the engine default and no decision is recorded for it.
    pub fn add_operator(
        &mut self,
        engine: &mut dyn ExecutionEngine,
        uid: impl Into<String>,
    ) -> OperatorRegistration {
        let uid = uid.into();
        let parallelism = self.resolver.operator_parallelism(&uid);
        if let Some(parallelism) = parallelism {
            log::info!("operator {} parallelism={}", uid, parallelism);
            engine.set_operator_parallelism(&uid, parallelism);
        }
        self.record(uid, OperatorKind::Operator, parallelism)
    }

    /// Register a sink. Sinks always receive an explicit parallelism.
    pub fn add_sink(
        &mut self,
        engine: &mut dyn ExecutionEngine,
        uid: impl Into<String>,
    ) -> OperatorRegistration {
        let uid = uid.into();
        let parallelism = self.resolver.sink_parallelism(&uid);
        log::info!("sink {} parallelism={}", uid, parallelism);
        engine.set_operator_parallelism(&uid, parallelism);
        self.record(uid, OperatorKind::Sink, Some(parallelism))
    }

    fn record(
        &mut self,
        uid: String,
        kind: OperatorKind,
        parallelism: Option<u32>,
    ) -> OperatorRegistration {
        let registration = OperatorRegistration {
            uid,
            kind,
            parallelism,
        };
        self.registrations.push(registration.clone());
        registration
    }

    /// All registrations so far, in registration order
    pub fn registrations(&self) -> &[OperatorRegistration] {
        &self.registrations
    }

    /// Sink registrations only. Tests assert over this to check every
    /// output of a pipeline was registered with a parallelism decision.
    pub fn registered_sinks(&self) -> Vec<&OperatorRegistration> {
        self.registrations
            .iter()
            .filter(|registration| registration.kind == OperatorKind::Sink)
            .collect()
    }

    /// Program the engine-wide configuration: serializer registrations,
    /// uid policy, parallelism bounds, object reuse, then the checkpoint
    /// policy. `max_parallelism` is guarded even though validation already
    /// insists on it, so a hand-built config cannot push a zero bound into
    /// the engine.
    pub fn configure_engine(&self, engine: &mut dyn ExecutionEngine) {
        for type_name in &self.config.proto_type_names {
            engine.register_proto_type(type_name);
        }

        if self.config.disable_auto_generated_uids {
            engine.disable_auto_generated_uids();
        }

        engine.set_parallelism(self.config.parallelism);
        if self.config.max_parallelism > 0 {
            engine.set_max_parallelism(self.config.max_parallelism);
        }

        if self.config.enable_object_reuse {
            engine.enable_object_reuse();
        }

        self.checkpoint_policy.apply(engine);
    }

    /// The debug-id matcher, built from configuration on first use and
    /// reused for the lifetime of this instance. Each execution replica
    /// rebuilds its own from the shipped configuration.
    pub fn debug_ids(&self) -> &DebugIds {
        self.cached_debug_ids
            .get_or_init(|| DebugIds::from_config(&self.config.debug_ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streamjob::config::DebugIdConfig;
    use crate::streamjob::engine::{EngineCall, RecordingEngine};
    use crate::streamjob::job::checkpoint::{CheckpointingMode, ExternalizedCheckpointCleanup};
    use std::time::Duration;

    fn job() -> StreamJob {
        StreamJob::from_config(
            JobConfig::new(10)
                .with_parallelism(4)
                .with_operator_multiplier("flat-events", 2.0)
                .with_default_sink_parallelism(3),
        )
        .unwrap()
    }

    #[test]
    fn test_from_config_rejects_invalid_config() {
        let err = StreamJob::from_config(JobConfig::default()).unwrap_err();
        assert!(err.to_string().contains("maxParallelism"));
    }

    #[test]
    fn test_add_operator_programs_engine_only_when_configured() {
        let mut job = job();
        let mut engine = RecordingEngine::new();

        let with_multiplier = job.add_operator(&mut engine, "flat-events");
        assert_eq!(with_multiplier.parallelism, Some(8));
        assert_eq!(with_multiplier.kind, OperatorKind::Operator);

        let without = job.add_operator(&mut engine, "join-actions");
        assert_eq!(without.parallelism, None);

        // Only the configured operator produced an engine call.
        assert_eq!(
            engine.calls(),
            &[EngineCall::SetOperatorParallelism(
                "flat-events".to_string(),
                8
            )]
        );
    }

    #[test]
    fn test_add_sink_always_decides() {
        let mut job = job();
        let mut engine = RecordingEngine::new();
        let sink = job.add_sink(&mut engine, "kafka-sink");
        assert_eq!(sink.kind, OperatorKind::Sink);
        assert_eq!(sink.parallelism, Some(3));
        assert_eq!(
            engine.calls(),
            &[EngineCall::SetOperatorParallelism(
                "kafka-sink".to_string(),
                3
            )]
        );
    }

    #[test]
    fn test_registered_sinks_filters_by_kind() {
        let mut job = job();
        let mut engine = RecordingEngine::new();
        job.add_source(&mut engine, "raw-events");
        job.add_operator(&mut engine, "flat-events");
        job.add_sink(&mut engine, "kafka-sink");
        job.add_sink(&mut engine, "s3-sink");

        let sinks = job.registered_sinks();
        assert_eq!(sinks.len(), 2);
        assert!(sinks.iter().all(|r| r.kind == OperatorKind::Sink));
        assert_eq!(job.registrations().len(), 4);
    }

    #[test]
    fn test_configure_engine_call_order() {
        let job = StreamJob::from_config(
            JobConfig::new(10)
                .with_parallelism(4)
                .with_proto_type("event.LogRequest")
                .with_checkpoint_interval(Duration::from_secs(60)),
        )
        .unwrap();

        let mut engine = RecordingEngine::new();
        job.configure_engine(&mut engine);

        assert_eq!(
            engine.calls(),
            &[
                EngineCall::RegisterProtoType("event.LogRequest".to_string()),
                EngineCall::DisableAutoGeneratedUids,
                EngineCall::SetParallelism(4),
                EngineCall::SetMaxParallelism(10),
                EngineCall::EnableObjectReuse,
                EngineCall::EnableCheckpointing(Duration::from_secs(60)),
                EngineCall::SetCheckpointingMode(CheckpointingMode::ExactlyOnce),
                EngineCall::SetMinPauseBetweenCheckpoints(Duration::from_millis(5000)),
                EngineCall::EnableUnalignedCheckpoints,
                EngineCall::SetCheckpointTimeout(Duration::from_secs(3600)),
                EngineCall::SetTolerableCheckpointFailures(3),
                EngineCall::SetExternalizedCheckpointCleanup(
                    ExternalizedCheckpointCleanup::RetainOnCancellation
                ),
            ]
        );
    }

    #[test]
    fn test_configure_engine_respects_disabled_toggles() {
        let job = StreamJob::from_config(
            JobConfig::new(10)
                .with_disable_auto_generated_uids(false)
                .with_enable_object_reuse(false),
        )
        .unwrap();

        let mut engine = RecordingEngine::new();
        job.configure_engine(&mut engine);

        assert!(!engine.calls().iter().any(|call| matches!(
            call,
            EngineCall::DisableAutoGeneratedUids | EngineCall::EnableObjectReuse
        )));
    }

    #[test]
    fn test_job_names_are_label_scoped() {
        let job = StreamJob::from_config(JobConfig::new(10).with_job_label("canary")).unwrap();
        assert_eq!(job.job_name("join-events"), "canary.join-events");
        assert_eq!(job.consumer_group_id("join-events"), "canary.join-events");
    }

    #[test]
    fn test_debug_ids_are_built_once() {
        let job = StreamJob::from_config(
            JobConfig::new(10)
                .with_debug_ids(DebugIdConfig::new().with_user_ids(["u-42"])),
        )
        .unwrap();

        let first = job.debug_ids();
        let second = job.debug_ids();
        assert!(std::ptr::eq(first, second));
        assert!(first.matches_user_id("u-42-suffix"));
    }

    #[test]
    fn test_debug_ids_single_init_under_concurrent_first_use() {
        let job = StreamJob::from_config(
            JobConfig::new(10)
                .with_debug_ids(DebugIdConfig::new().with_user_ids(["u-42"])),
        )
        .unwrap();

        let addresses: Vec<usize> = std::thread::scope(|scope| {
            (0..8)
                .map(|_| scope.spawn(|| job.debug_ids() as *const DebugIds as usize))
                .collect::<Vec<_>>()
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect()
        });

        assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
    }
}
