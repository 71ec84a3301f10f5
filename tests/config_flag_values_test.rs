//! Deployments hand this crate nothing but strings. These tests walk the
//! textual flag values through the parsers into built jobs and assert the
//! behavior the text asked for, not just the parsed intermediate.

use streamjob::{
    CheckpointingMode, EngineCall, ExternalizedCheckpointCleanup, JobConfig, RecordingEngine,
    StreamJob, parse_duration, parse_multiplier_entry,
};
use std::time::Duration;

#[test]
fn test_duration_forms_deployments_actually_use() {
    // ISO-8601, the original deployment format.
    assert_eq!(parse_duration("PT5M").unwrap(), Duration::from_secs(300));
    assert_eq!(parse_duration("PT1H").unwrap(), Duration::from_secs(3600));
    assert_eq!(parse_duration("PT0S").unwrap(), Duration::ZERO);
    // Suffixed shorthand.
    assert_eq!(parse_duration("90s").unwrap(), Duration::from_secs(90));
    assert_eq!(parse_duration("5000ms").unwrap(), Duration::from_millis(5000));
    assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
}

#[test]
fn test_zero_interval_flag_disables_checkpointing() {
    let interval = parse_duration("PT0S").unwrap();
    let job =
        StreamJob::from_config(JobConfig::new(16).with_checkpoint_interval(interval)).unwrap();

    let mut engine = RecordingEngine::new();
    job.configure_engine(&mut engine);
    assert!(
        !engine
            .calls()
            .iter()
            .any(|call| matches!(call, EngineCall::EnableCheckpointing(_)))
    );
}

#[test]
fn test_multiplier_entries_flow_into_resolution() {
    let entries = ["flatten-events=2.0", "impressions-source=0.5"];
    let mut config = JobConfig::new(32).with_parallelism(4);
    for entry in entries {
        let (uid, multiplier) = parse_multiplier_entry(entry).unwrap();
        config = config.with_operator_multiplier(uid, multiplier);
    }

    let mut job = StreamJob::from_config(config).unwrap();
    let mut engine = RecordingEngine::new();
    assert_eq!(
        job.add_operator(&mut engine, "flatten-events").parallelism,
        Some(8)
    );
    assert_eq!(
        job.add_source(&mut engine, "impressions-source").parallelism,
        Some(2)
    );
}

#[test]
fn test_enum_flags_accept_both_separator_spellings() {
    for spelling in ["at_least_once", "at-least-once", "AT_LEAST_ONCE"] {
        assert_eq!(
            spelling.parse::<CheckpointingMode>().unwrap(),
            CheckpointingMode::AtLeastOnce
        );
    }
    for spelling in ["delete_on_cancellation", "delete-on-cancellation"] {
        assert_eq!(
            spelling.parse::<ExternalizedCheckpointCleanup>().unwrap(),
            ExternalizedCheckpointCleanup::DeleteOnCancellation
        );
    }
}

#[test]
fn test_malformed_flag_values_name_the_problem() {
    let err = parse_duration("PT5X").unwrap_err().to_string();
    assert!(err.contains("PT5X"), "unhelpful error: {}", err);

    let err = parse_multiplier_entry("sink-a:2.0").unwrap_err().to_string();
    assert!(err.contains("sink-a:2.0"), "unhelpful error: {}", err);

    let err = "effectively_once"
        .parse::<CheckpointingMode>()
        .unwrap_err()
        .to_string();
    assert!(err.contains("effectively_once"), "unhelpful error: {}", err);
}

#[test]
fn test_builder_overrides_win_over_defaults() {
    let config = JobConfig::new(16)
        .with_tolerable_checkpoint_failures(0)
        .with_min_pause_between_checkpoints(Duration::ZERO);

    let job = StreamJob::from_config(config).unwrap();
    let mut engine = RecordingEngine::new();
    job.configure_engine(&mut engine);

    // Explicit zero failure tolerance is honored, not replaced by the
    // default of 3.
    assert!(
        engine
            .calls()
            .contains(&EngineCall::SetTolerableCheckpointFailures(0))
    );
    // Zero pause means "leave the engine default", so the call is omitted.
    assert!(
        !engine
            .calls()
            .iter()
            .any(|call| matches!(call, EngineCall::SetMinPauseBetweenCheckpoints(_)))
    );
}
