//! Entry/exit events.

use std::fmt;

use gw_core::{EntityId, RegionId, Timestamp};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TransitionKind {
    Entry,
    Exit,
}

impl TransitionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransitionKind::Entry => "entry",
            TransitionKind::Exit  => "exit",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entity crossed a region boundary.
///
/// Emitted exactly once per crossing; immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionEvent {
    pub entity_id: EntityId,
    pub region_id: RegionId,
    pub kind:      TransitionKind,
    pub at:        Timestamp,
    /// Time spent inside the region.  Only set on Exit events whose matching
    /// Entry was observed.
    pub dwell_ms:  Option<u64>,
}

impl TransitionEvent {
    pub fn entry(entity_id: EntityId, region_id: RegionId, at: Timestamp) -> Self {
        Self { entity_id, region_id, kind: TransitionKind::Entry, at, dwell_ms: None }
    }

    pub fn exit(entity_id: EntityId, region_id: RegionId, at: Timestamp, dwell_ms: Option<u64>) -> Self {
        Self { entity_id, region_id, kind: TransitionKind::Exit, at, dwell_ms }
    }
}

impl fmt::Display for TransitionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} at {}", self.entity_id, self.kind, self.region_id, self.at)
    }
}
