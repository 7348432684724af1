//! Plain data row types written by output backends.

use gw_monitor::{EntityStatus, PassSummary, TransitionEvent};

/// One entry or exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRow {
    pub entity_id: String,
    pub region_id: String,
    pub kind:      &'static str,
    pub at_ms:     i64,
    /// Only set on exits with a known entry time.
    pub dwell_ms:  Option<u64>,
}

impl From<&TransitionEvent> for TransitionRow {
    fn from(e: &TransitionEvent) -> Self {
        Self {
            entity_id: e.entity_id.to_string(),
            region_id: e.region_id.to_string(),
            kind:      e.kind.as_str(),
            at_ms:     e.at.as_millis(),
            dwell_ms:  e.dwell_ms,
        }
    }
}

/// One online/offline change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRow {
    pub entity_id: String,
    pub status:    EntityStatus,
    pub at_ms:     i64,
}

/// Summary of one evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassRow {
    pub tick:            u64,
    pub at_ms:           i64,
    pub evaluated:       u64,
    pub skipped_offline: u64,
    pub unlocated:       u64,
    pub events:          u64,
    pub elapsed_us:      u64,
}

impl From<&PassSummary> for PassRow {
    fn from(s: &PassSummary) -> Self {
        Self {
            tick:            s.tick.0,
            at_ms:           s.at.as_millis(),
            evaluated:       s.evaluated as u64,
            skipped_offline: s.skipped_offline as u64,
            unlocated:       s.unlocated as u64,
            events:          s.events as u64,
            elapsed_us:      u64::try_from(s.elapsed.as_micros()).unwrap_or(u64::MAX),
        }
    }
}
