//! Stream Job Plan CLI
//!
//! Resolves a job configuration the same way a launcher would and prints
//! the result without touching any runtime: the label-scoped names, the
//! parallelism decision for each declared operator, and the exact engine
//! call sequence the configuration produces. Useful for reviewing a
//! deployment change before rolling it, and for diffing two configurations.

use std::collections::HashMap;
use std::process;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;

use streamjob::{
    CheckpointingMode, DebugIdConfig, EngineCall, ExternalizedCheckpointCleanup, JobConfig,
    OperatorRegistration, RecordingEngine, StreamJob, parse_duration, parse_multiplier_entry,
};

#[derive(Parser)]
#[command(name = "streamjob-plan")]
#[command(about = "Resolve and print the launch plan for a stream job configuration")]
#[command(version = "0.3.1")]
struct Cli {
    /// Base job name; the job label is prefixed onto it
    #[arg(long, default_value = "stream-job")]
    job_name: String,

    /// Job label ("live" or empty means the production instance)
    #[arg(long, default_value = "live")]
    job_label: String,

    /// Base parallelism for the job
    #[arg(long, default_value_t = 1)]
    parallelism: u32,

    /// Max parallelism; pins state partitioning, required
    #[arg(long)]
    max_parallelism: u32,

    /// Per-operator multiplier entries, uid=multiplier, comma separated
    #[arg(long, value_parser = parse_multiplier_entry, value_delimiter = ',')]
    operator_parallelism_multiplier: Vec<(String, f64)>,

    /// Multiplier for sinks without an explicit operator entry
    #[arg(long)]
    default_sink_parallelism_multiplier: Option<f64>,

    /// Flat sink parallelism when no multiplier applies
    #[arg(long, default_value_t = 1)]
    default_sink_parallelism: u32,

    /// Checkpoint interval (e.g. PT5M, 300s); zero disables checkpointing
    #[arg(long, default_value = "PT5M", value_parser = parse_duration)]
    checkpoint_interval: Duration,

    /// Minimum pause between checkpoints in milliseconds; zero keeps the
    /// engine default
    #[arg(long, default_value_t = 5000)]
    min_pause_between_checkpoints: u64,

    /// Checkpoint timeout; zero keeps the engine default
    #[arg(long, default_value = "PT1H", value_parser = parse_duration)]
    checkpoint_timeout: Duration,

    /// Take aligned checkpoints instead of unaligned ones
    #[arg(long)]
    no_unaligned_checkpoints: bool,

    /// Consecutive checkpoint failures tolerated before the job fails
    #[arg(long, default_value_t = 3)]
    tolerable_checkpoint_failures: u32,

    /// Checkpoint barrier mode: exactly_once or at_least_once
    #[arg(long, default_value = "exactly_once", value_parser = CheckpointingMode::from_str)]
    checkpointing_mode: CheckpointingMode,

    /// Checkpoint state on cancellation: retain_on_cancellation or
    /// delete_on_cancellation
    #[arg(long, default_value = "retain_on_cancellation",
          value_parser = ExternalizedCheckpointCleanup::from_str)]
    externalized_checkpoint_cleanup: ExternalizedCheckpointCleanup,

    /// Let the engine auto-generate operator uids (disabled by default)
    #[arg(long)]
    allow_auto_generated_uids: bool,

    /// Disable engine object reuse
    #[arg(long)]
    no_object_reuse: bool,

    /// Protobuf type names to register with the engine serializer
    #[arg(long = "proto-type")]
    proto_types: Vec<String>,

    /// userId substrings that flag a record for join debug logging
    #[arg(long, value_delimiter = ',')]
    debug_user_ids: Vec<String>,

    /// logUserId substrings that flag a record for join debug logging
    #[arg(long, value_delimiter = ',')]
    debug_log_user_ids: Vec<String>,

    /// sessionId substrings that flag a record for join debug logging
    #[arg(long, value_delimiter = ',')]
    debug_session_ids: Vec<String>,

    /// viewId substrings that flag a record for join debug logging
    #[arg(long, value_delimiter = ',')]
    debug_view_ids: Vec<String>,

    /// autoViewId substrings that flag a record for join debug logging
    #[arg(long, value_delimiter = ',')]
    debug_auto_view_ids: Vec<String>,

    /// requestId substrings that flag a record for join debug logging
    #[arg(long, value_delimiter = ',')]
    debug_request_ids: Vec<String>,

    /// insertionId substrings that flag a record for join debug logging
    #[arg(long, value_delimiter = ',')]
    debug_insertion_ids: Vec<String>,

    /// impressionId substrings that flag a record for join debug logging
    #[arg(long, value_delimiter = ',')]
    debug_impression_ids: Vec<String>,

    /// actionId substrings that flag a record for join debug logging
    #[arg(long, value_delimiter = ',')]
    debug_action_ids: Vec<String>,

    /// Source uids to plan (repeatable)
    #[arg(long = "source")]
    sources: Vec<String>,

    /// Mid-graph operator uids to plan (repeatable)
    #[arg(long = "operator")]
    operators: Vec<String>,

    /// Sink uids to plan (repeatable)
    #[arg(long = "sink")]
    sinks: Vec<String>,

    /// Emit the plan as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Plan<'a> {
    job_name: String,
    consumer_group_id: String,
    live: bool,
    config: &'a JobConfig,
    registrations: &'a [OperatorRegistration],
    engine_calls: &'a [EngineCall],
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(error) = run(&cli) {
        eprintln!("❌ {}", error);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut job = StreamJob::from_config(job_config_from(cli))?;

    let mut engine = RecordingEngine::new();
    job.configure_engine(&mut engine);

    for uid in &cli.sources {
        job.add_source(&mut engine, uid.clone());
    }
    for uid in &cli.operators {
        job.add_operator(&mut engine, uid.clone());
    }
    for uid in &cli.sinks {
        job.add_sink(&mut engine, uid.clone());
    }

    if cli.json {
        print_json(cli, &job, engine.calls())?;
    } else {
        print_text(cli, &job, engine.calls());
    }
    Ok(())
}

fn job_config_from(cli: &Cli) -> JobConfig {
    let multipliers: HashMap<String, f64> = cli
        .operator_parallelism_multiplier
        .iter()
        .cloned()
        .collect();

    let mut config = JobConfig::new(cli.max_parallelism)
        .with_job_label(cli.job_label.clone())
        .with_parallelism(cli.parallelism)
        .with_operator_multipliers(multipliers)
        .with_default_sink_parallelism(cli.default_sink_parallelism)
        .with_checkpoint_interval(cli.checkpoint_interval)
        .with_min_pause_between_checkpoints(Duration::from_millis(
            cli.min_pause_between_checkpoints,
        ))
        .with_checkpoint_timeout(cli.checkpoint_timeout)
        .with_unaligned_checkpoints(!cli.no_unaligned_checkpoints)
        .with_tolerable_checkpoint_failures(cli.tolerable_checkpoint_failures)
        .with_checkpointing_mode(cli.checkpointing_mode)
        .with_externalized_checkpoint_cleanup(cli.externalized_checkpoint_cleanup)
        .with_disable_auto_generated_uids(!cli.allow_auto_generated_uids)
        .with_enable_object_reuse(!cli.no_object_reuse)
        .with_proto_types(cli.proto_types.clone())
        .with_debug_ids(debug_ids_from(cli));

    if let Some(multiplier) = cli.default_sink_parallelism_multiplier {
        config = config.with_default_sink_parallelism_multiplier(multiplier);
    }
    config
}

fn debug_ids_from(cli: &Cli) -> DebugIdConfig {
    DebugIdConfig::new()
        .with_user_ids(cli.debug_user_ids.clone())
        .with_log_user_ids(cli.debug_log_user_ids.clone())
        .with_session_ids(cli.debug_session_ids.clone())
        .with_view_ids(cli.debug_view_ids.clone())
        .with_auto_view_ids(cli.debug_auto_view_ids.clone())
        .with_request_ids(cli.debug_request_ids.clone())
        .with_insertion_ids(cli.debug_insertion_ids.clone())
        .with_impression_ids(cli.debug_impression_ids.clone())
        .with_action_ids(cli.debug_action_ids.clone())
}

fn print_text(cli: &Cli, job: &StreamJob, engine_calls: &[EngineCall]) {
    let identity = job.identity();
    println!("✅ Plan for job '{}'", job.job_name(&cli.job_name));
    println!("  label: '{}' (live: {})", identity.label(), identity.is_live());
    println!("  consumer group: {}", job.consumer_group_id(&cli.job_name));
    println!("  config: {}", job.config().summary());

    if !job.registrations().is_empty() {
        println!();
        println!("Operators:");
        for registration in job.registrations() {
            match registration.parallelism {
                Some(parallelism) => println!(
                    "  {} {} parallelism={}",
                    registration.kind, registration.uid, parallelism
                ),
                None => println!(
                    "  {} {} parallelism=engine-default",
                    registration.kind, registration.uid
                ),
            }
        }
    }

    println!();
    println!("Engine calls:");
    for (index, call) in engine_calls.iter().enumerate() {
        println!("  {}. {}", index + 1, call);
    }
}

fn print_json(
    cli: &Cli,
    job: &StreamJob,
    engine_calls: &[EngineCall],
) -> Result<(), Box<dyn std::error::Error>> {
    let plan = Plan {
        job_name: job.job_name(&cli.job_name),
        consumer_group_id: job.consumer_group_id(&cli.job_name),
        live: job.identity().is_live(),
        config: job.config(),
        registrations: job.registrations(),
        engine_calls,
    };
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
