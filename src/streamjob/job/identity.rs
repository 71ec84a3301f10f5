//! Job identity and label-scoped naming
//!
//! A job label distinguishes side-by-side runs of the same job (canary,
//! backfill, blue/green) from the production instance. Every external name
//! the job claims (the job name itself, consumer group ids) is prefixed
//! with the label so parallel runs never collide on shared infrastructure.
//! The production label is special-cased: "live" (or an empty label) leaves
//! names untouched, so production identifiers stay stable when the labeling
//! scheme is introduced.

use crate::streamjob::config::JobConfig;

/// Label reserved for the production run. Names are not prefixed under it.
pub const LIVE_LABEL: &str = "live";

/// Label-aware naming for one job instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobIdentity {
    label: String,
}

impl JobIdentity {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn from_config(config: &JobConfig) -> Self {
        Self::new(config.job_label.clone())
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// True when this is the production instance (empty or "live" label)
    pub fn is_live(&self) -> bool {
        self.label.is_empty() || self.label == LIVE_LABEL
    }

    /// Label as it appears in derived names: empty for the production
    /// instance, the raw label otherwise.
    pub fn effective_label(&self) -> &str {
        if self.is_live() { "" } else { &self.label }
    }

    /// Prefix a name with the label. Production names pass through
    /// unchanged; every other label yields "label.name".
    pub fn prefix(&self, name: &str) -> String {
        if self.is_live() {
            name.to_string()
        } else {
            format!("{}.{}", self.label, name)
        }
    }

    /// Full job name for this instance
    pub fn job_name(&self, base_name: &str) -> String {
        self.prefix(base_name)
    }

    /// Consumer group id for this instance. Uses the same prefixing as
    /// every other external name, so a labeled run tracks its own offsets
    /// while the live run keeps the group it has always had.
    pub fn consumer_group_id(&self, base_name: &str) -> String {
        self.prefix(base_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_label_is_live() {
        assert!(JobIdentity::new("live").is_live());
        assert!(JobIdentity::new("").is_live());
        assert!(!JobIdentity::new("canary").is_live());
        // Labels are case-sensitive; only lowercase "live" is production.
        assert!(!JobIdentity::new("LIVE").is_live());
    }

    #[test]
    fn test_live_names_pass_through() {
        let identity = JobIdentity::new("live");
        assert_eq!(identity.prefix("raw-event-job"), "raw-event-job");
        assert_eq!(identity.job_name("raw-event-job"), "raw-event-job");
        assert_eq!(identity.consumer_group_id("raw-event-job"), "raw-event-job");
    }

    #[test]
    fn test_empty_label_names_pass_through() {
        let identity = JobIdentity::new("");
        assert_eq!(identity.prefix("raw-event-job"), "raw-event-job");
    }

    #[test]
    fn test_labeled_names_are_prefixed() {
        let identity = JobIdentity::new("canary");
        assert_eq!(identity.prefix("raw-event-job"), "canary.raw-event-job");
        assert_eq!(identity.job_name("raw-event-job"), "canary.raw-event-job");
    }

    #[test]
    fn test_effective_label_is_empty_for_live() {
        assert_eq!(JobIdentity::new("live").effective_label(), "");
        assert_eq!(JobIdentity::new("").effective_label(), "");
        assert_eq!(JobIdentity::new("canary").effective_label(), "canary");
    }

    #[test]
    fn test_consumer_group_matches_prefix() {
        for label in ["live", "", "canary", "blue-2024"] {
            let identity = JobIdentity::new(label);
            assert_eq!(
                identity.consumer_group_id("raw-event-job"),
                identity.prefix("raw-event-job")
            );
        }
    }

    #[test]
    fn test_from_config_uses_job_label() {
        let config = JobConfig::new(10).with_job_label("backfill");
        let identity = JobIdentity::from_config(&config);
        assert_eq!(identity.label(), "backfill");
        assert_eq!(identity.prefix("join-job"), "backfill.join-job");
    }
}
