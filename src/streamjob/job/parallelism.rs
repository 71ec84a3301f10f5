//! Operator and sink parallelism resolution
//!
//! Parallelism for an operator is resolved through three layers, highest
//! priority first:
//!
//! 1. A per-operator multiplier keyed by uid (`operator_parallelism_multiplier`)
//! 2. For sinks only, the job-wide sink multiplier (`default_sink_parallelism_multiplier`)
//! 3. For sinks only, the flat default (`default_sink_parallelism`)
//!
//! Multipliers scale the job's base parallelism and round half away from
//! zero. Every resolved value is clamped to `1..=max_parallelism`, so a
//! tiny multiplier still yields a runnable operator and a large one cannot
//! exceed the state-partitioning bound. Non-sink operators without an
//! explicit multiplier resolve to nothing and inherit the engine default.

use std::collections::HashMap;

use crate::streamjob::config::JobConfig;

/// Resolves per-operator parallelism from the configured layers.
///
/// Built once per job from a validated `JobConfig`; resolution itself is
/// cheap and infallible.
#[derive(Debug, Clone)]
pub struct ParallelismResolver {
    parallelism: u32,
    max_parallelism: u32,
    operator_multipliers: HashMap<String, f64>,
    default_sink_multiplier: Option<f64>,
    default_sink_parallelism: u32,
}

impl ParallelismResolver {
    pub fn from_config(config: &JobConfig) -> Self {
        Self {
            parallelism: config.parallelism,
            max_parallelism: config.max_parallelism,
            operator_multipliers: config.operator_parallelism_multiplier.clone(),
            default_sink_multiplier: config.default_sink_parallelism_multiplier,
            default_sink_parallelism: config.default_sink_parallelism,
        }
    }

    /// Base parallelism the multipliers scale
    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    /// Upper clamp bound for every resolved value
    pub fn max_parallelism(&self) -> u32 {
        self.max_parallelism
    }

    /// Parallelism for the operator with this uid, if a multiplier is
    /// configured for it. `None` means the operator takes the engine
    /// default; callers must not substitute their own fallback here.
    pub fn operator_parallelism(&self, uid: &str) -> Option<u32> {
        self.operator_multipliers
            .get(uid)
            .map(|multiplier| self.scaled(*multiplier))
    }

    /// Parallelism for the sink with this uid. Unlike plain operators,
    /// sinks always resolve: an explicit multiplier wins, then the job-wide
    /// sink multiplier, then the flat default.
    pub fn sink_parallelism(&self, uid: &str) -> u32 {
        self.operator_parallelism(uid)
            .or_else(|| {
                self.default_sink_multiplier
                    .map(|multiplier| self.scaled(multiplier))
            })
            .unwrap_or_else(|| self.default_sink_parallelism())
    }

    /// Flat sink default, clamped like every resolved value
    pub fn default_sink_parallelism(&self) -> u32 {
        self.clamp(i64::from(self.default_sink_parallelism))
    }

    /// Scale the base parallelism by a multiplier, rounding half away from
    /// zero, and clamp the result.
    fn scaled(&self, multiplier: f64) -> u32 {
        let raw = (multiplier * f64::from(self.parallelism)).round();
        // `as` saturates, so overflow and NaN degrade into the clamp range.
        self.clamp(raw as i64)
    }

    /// Clamp to `1..=max_parallelism`. The lower bound is applied last so
    /// the result is runnable even if the upper bound is misconfigured.
    fn clamp(&self, parallelism: i64) -> u32 {
        parallelism.min(i64::from(self.max_parallelism)).max(1) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(config: JobConfig) -> ParallelismResolver {
        ParallelismResolver::from_config(&config)
    }

    #[test]
    fn test_operator_multiplier_scales_base_parallelism() {
        let resolver = resolver(
            JobConfig::new(10)
                .with_parallelism(4)
                .with_operator_multiplier("sink-a", 2.0),
        );
        assert_eq!(resolver.operator_parallelism("sink-a"), Some(8));
        assert_eq!(resolver.sink_parallelism("sink-a"), 8);
    }

    #[test]
    fn test_operator_without_multiplier_resolves_to_none() {
        let resolver = resolver(JobConfig::new(10).with_parallelism(4));
        assert_eq!(resolver.operator_parallelism("join-events"), None);
    }

    #[test]
    fn test_sink_multiplier_applies_when_no_operator_override() {
        let resolver = resolver(
            JobConfig::new(10)
                .with_parallelism(4)
                .with_default_sink_parallelism_multiplier(0.5),
        );
        assert_eq!(resolver.sink_parallelism("sink-b"), 2);
    }

    #[test]
    fn test_sink_falls_back_to_flat_default() {
        let resolver = resolver(
            JobConfig::new(10)
                .with_parallelism(4)
                .with_default_sink_parallelism(3),
        );
        assert_eq!(resolver.sink_parallelism("sink-c"), 3);
    }

    #[test]
    fn test_operator_override_beats_sink_multiplier() {
        let resolver = resolver(
            JobConfig::new(100)
                .with_parallelism(4)
                .with_operator_multiplier("sink-a", 2.0)
                .with_default_sink_parallelism_multiplier(0.5)
                .with_default_sink_parallelism(3),
        );
        assert_eq!(resolver.sink_parallelism("sink-a"), 8);
        assert_eq!(resolver.sink_parallelism("sink-other"), 2);
    }

    #[test]
    fn test_resolved_values_clamp_to_max_parallelism() {
        let resolver = resolver(
            JobConfig::new(5)
                .with_parallelism(4)
                .with_operator_multiplier("wide", 3.0),
        );
        assert_eq!(resolver.operator_parallelism("wide"), Some(5));
    }

    #[test]
    fn test_tiny_multiplier_clamps_up_to_one() {
        let resolver = resolver(
            JobConfig::new(10)
                .with_parallelism(4)
                .with_operator_multiplier("narrow", 0.1),
        );
        assert_eq!(resolver.operator_parallelism("narrow"), Some(1));
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        let resolver = resolver(
            JobConfig::new(100)
                .with_parallelism(5)
                .with_operator_multiplier("half-up", 0.5)
                .with_operator_multiplier("also-half", 0.3),
        );
        // 5 * 0.5 = 2.5 rounds to 3, not 2.
        assert_eq!(resolver.operator_parallelism("half-up"), Some(3));
        // 5 * 0.3 = 1.5 rounds to 2.
        assert_eq!(resolver.operator_parallelism("also-half"), Some(2));
    }

    #[test]
    fn test_flat_default_is_clamped_too() {
        let resolver = resolver(
            JobConfig::new(10)
                .with_parallelism(4)
                .with_default_sink_parallelism(50),
        );
        assert_eq!(resolver.sink_parallelism("sink-d"), 10);
        assert_eq!(resolver.default_sink_parallelism(), 10);
    }

    #[test]
    fn test_uid_matching_is_exact_and_case_sensitive() {
        let resolver = resolver(
            JobConfig::new(10)
                .with_parallelism(4)
                .with_operator_multiplier("Sink-A", 2.0),
        );
        assert_eq!(resolver.operator_parallelism("sink-a"), None);
        assert_eq!(resolver.operator_parallelism("Sink-A"), Some(8));
    }

    #[test]
    fn test_negative_multiplier_degrades_to_minimum() {
        let resolver = resolver(
            JobConfig::new(10)
                .with_parallelism(4)
                .with_operator_multiplier("weird", -2.0),
        );
        assert_eq!(resolver.operator_parallelism("weird"), Some(1));
    }

    #[test]
    fn test_base_parallelism_is_reported_unclamped() {
        // The base value is the engine's concern; only derived values clamp.
        let resolver = resolver(JobConfig::new(2).with_parallelism(8));
        assert_eq!(resolver.parallelism(), 8);
        assert_eq!(resolver.sink_parallelism("s"), 1);
    }
}
