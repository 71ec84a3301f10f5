//! Record-level debug filtering
//!
//! When a record goes missing in a multi-stage join, the practical way to
//! find it is to turn on verbose logging for just that record's ids and
//! rerun. `DebugIds` holds the configured identifier substrings and answers
//! "is this record one we are chasing?" on the hot path, so the check has
//! to stay cheap: substring scans over small sets, no allocation.
//!
//! Matching is an OR across nine identifier fields. A field matches when
//! its value contains any configured substring for that field; an empty
//! set never matches. Record types expose their identifiers through
//! `RecordIdentifiers` and override only the fields they carry.

use std::collections::HashSet;

use crate::streamjob::config::DebugIdConfig;

/// Identifier fields a record can expose for debug matching.
///
/// Every accessor defaults to an empty string, which matches nothing, so
/// implementations override only the identifiers their record type has.
pub trait RecordIdentifiers {
    fn user_id(&self) -> &str {
        ""
    }
    fn log_user_id(&self) -> &str {
        ""
    }
    fn session_id(&self) -> &str {
        ""
    }
    fn view_id(&self) -> &str {
        ""
    }
    fn auto_view_id(&self) -> &str {
        ""
    }
    fn request_id(&self) -> &str {
        ""
    }
    fn insertion_id(&self) -> &str {
        ""
    }
    fn impression_id(&self) -> &str {
        ""
    }
    fn action_id(&self) -> &str {
        ""
    }
}

/// Compiled debug-id matcher for one job instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugIds {
    user_ids: HashSet<String>,
    log_user_ids: HashSet<String>,
    session_ids: HashSet<String>,
    view_ids: HashSet<String>,
    auto_view_ids: HashSet<String>,
    request_ids: HashSet<String>,
    insertion_ids: HashSet<String>,
    impression_ids: HashSet<String>,
    action_ids: HashSet<String>,
}

impl DebugIds {
    pub fn from_config(config: &DebugIdConfig) -> Self {
        Self {
            user_ids: config.user_ids.clone(),
            log_user_ids: config.log_user_ids.clone(),
            session_ids: config.session_ids.clone(),
            view_ids: config.view_ids.clone(),
            auto_view_ids: config.auto_view_ids.clone(),
            request_ids: config.request_ids.clone(),
            insertion_ids: config.insertion_ids.clone(),
            impression_ids: config.impression_ids.clone(),
            action_ids: config.action_ids.clone(),
        }
    }

    /// True when no set is populated, so no record can ever match.
    /// Callers use this to skip building debug log context entirely.
    pub fn is_empty(&self) -> bool {
        self.user_ids.is_empty()
            && self.log_user_ids.is_empty()
            && self.session_ids.is_empty()
            && self.view_ids.is_empty()
            && self.auto_view_ids.is_empty()
            && self.request_ids.is_empty()
            && self.insertion_ids.is_empty()
            && self.impression_ids.is_empty()
            && self.action_ids.is_empty()
    }

    /// True when any identifier on the record contains any configured
    /// substring for the corresponding field. Interesting records get the
    /// verbose join diagnostics.
    pub fn is_interesting(&self, record: &dyn RecordIdentifiers) -> bool {
        self.matches_user_id(record.user_id())
            || self.matches_log_user_id(record.log_user_id())
            || self.matches_session_id(record.session_id())
            || self.matches_view_id(record.view_id())
            || self.matches_auto_view_id(record.auto_view_id())
            || self.matches_request_id(record.request_id())
            || self.matches_insertion_id(record.insertion_id())
            || self.matches_impression_id(record.impression_id())
            || self.matches_action_id(record.action_id())
    }

    pub fn matches_user_id(&self, value: &str) -> bool {
        contains_any(&self.user_ids, value)
    }

    pub fn matches_log_user_id(&self, value: &str) -> bool {
        contains_any(&self.log_user_ids, value)
    }

    pub fn matches_session_id(&self, value: &str) -> bool {
        contains_any(&self.session_ids, value)
    }

    pub fn matches_view_id(&self, value: &str) -> bool {
        contains_any(&self.view_ids, value)
    }

    pub fn matches_auto_view_id(&self, value: &str) -> bool {
        contains_any(&self.auto_view_ids, value)
    }

    pub fn matches_request_id(&self, value: &str) -> bool {
        contains_any(&self.request_ids, value)
    }

    pub fn matches_insertion_id(&self, value: &str) -> bool {
        contains_any(&self.insertion_ids, value)
    }

    pub fn matches_impression_id(&self, value: &str) -> bool {
        contains_any(&self.impression_ids, value)
    }

    pub fn matches_action_id(&self, value: &str) -> bool {
        contains_any(&self.action_ids, value)
    }
}

fn contains_any(substrings: &HashSet<String>, value: &str) -> bool {
    substrings
        .iter()
        .any(|substring| value.contains(substring.as_str()))
}
