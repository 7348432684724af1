//! Bounded in-memory alert and activity feed.
//!
//! Two newest-first ring lists: *alerts* are user-facing notifications with a
//! read flag, *activities* are the raw entry/exit log.  Both drop their oldest
//! item once full.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use log::debug;

use gw_core::{EntityId, RegionId, Timestamp};
use gw_monitor::{EntityStatus, EventSink, TransitionEvent, TransitionKind};

use crate::format_duration;

/// Alerts kept before the oldest is dropped.
pub const ALERT_CAPACITY: usize = 50;

/// Activities kept before the oldest is dropped.
pub const ACTIVITY_CAPACITY: usize = 100;

/// Display name used for a region id missing from the name map.
pub const UNKNOWN_REGION: &str = "Unknown";

// ── Alert ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AlertKind {
    GeofenceEntry,
    GeofenceExit,
    Offline,
}

impl AlertKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertKind::GeofenceEntry => "geofence_entry",
            AlertKind::GeofenceExit  => "geofence_exit",
            AlertKind::Offline       => "offline",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alert {
    /// Unique within one feed; increases with arrival order.
    pub id:          u64,
    pub entity_id:   EntityId,
    pub entity_name: String,
    pub kind:        AlertKind,
    /// Set for geofence alerts only.
    pub region_name: Option<String>,
    pub at:          Timestamp,
    pub read:        bool,
}

impl Alert {
    /// One-line text as shown under the entity name.
    pub fn message(&self) -> String {
        let region = self.region_name.as_deref().unwrap_or(UNKNOWN_REGION);
        match self.kind {
            AlertKind::GeofenceEntry => format!("Entered {region}"),
            AlertKind::GeofenceExit  => format!("Left {region}"),
            AlertKind::Offline       => "Went offline".to_owned(),
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.at, self.entity_name, self.message())
    }
}

// ── Activity ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActivityKind {
    Entry,
    Exit,
}

impl From<TransitionKind> for ActivityKind {
    fn from(kind: TransitionKind) -> Self {
        match kind {
            TransitionKind::Entry => ActivityKind::Entry,
            TransitionKind::Exit  => ActivityKind::Exit,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Activity {
    pub id:        u64,
    pub entity_id: EntityId,
    pub kind:      ActivityKind,
    pub region_id: RegionId,
    pub at:        Timestamp,
    pub dwell_ms:  Option<u64>,
}

impl Activity {
    /// `"stayed 12m"` for exits with a known dwell time.
    pub fn description(&self) -> Option<String> {
        self.dwell_ms
            .map(|ms| format!("stayed {}", format_duration(ms as f64 / 1_000.0)))
    }
}

// ── ActivityFeed ──────────────────────────────────────────────────────────────

/// An [`EventSink`] that turns transitions into alerts and activities.
///
/// Region names are resolved from the map given at construction; refresh it
/// with [`set_region_names`][Self::set_region_names] after the region set
/// changes.  Entity names default to the entity id.
#[derive(Debug, Default)]
pub struct ActivityFeed {
    region_names: BTreeMap<RegionId, String>,
    entity_names: BTreeMap<EntityId, String>,
    alerts:       VecDeque<Alert>,
    activities:   VecDeque<Activity>,
    next_id:      u64,
}

impl ActivityFeed {
    pub fn new(region_names: BTreeMap<RegionId, String>) -> Self {
        Self { region_names, ..Self::default() }
    }

    pub fn with_entity_names(mut self, names: BTreeMap<EntityId, String>) -> Self {
        self.entity_names = names;
        self
    }

    pub fn set_region_names(&mut self, names: BTreeMap<RegionId, String>) {
        self.region_names = names;
    }

    /// Display name of `region`, or [`UNKNOWN_REGION`].
    pub fn region_name(&self, region: &str) -> &str {
        self.region_names.get(region).map_or(UNKNOWN_REGION, String::as_str)
    }

    pub fn entity_name(&self, entity: &EntityId) -> String {
        self.entity_names
            .get(entity)
            .cloned()
            .unwrap_or_else(|| entity.to_string())
    }

    /// Newest first.
    pub fn alerts(&self) -> impl Iterator<Item = &Alert> + '_ {
        self.alerts.iter()
    }

    /// Newest first.
    pub fn activities(&self) -> impl Iterator<Item = &Activity> + '_ {
        self.activities.iter()
    }

    pub fn unread_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.read).count()
    }

    pub fn mark_all_read(&mut self) {
        for alert in &mut self.alerts {
            alert.read = true;
        }
    }

    pub fn clear_alerts(&mut self) {
        self.alerts.clear();
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn push_alert(&mut self, entity: &EntityId, kind: AlertKind, region_name: Option<String>, at: Timestamp) {
        let alert = Alert {
            id: self.next_id(),
            entity_id: entity.clone(),
            entity_name: self.entity_name(entity),
            kind,
            region_name,
            at,
            read: false,
        };
        debug!("alert: {alert}");
        self.alerts.push_front(alert);
        self.alerts.truncate(ALERT_CAPACITY);
    }
}

impl EventSink for ActivityFeed {
    fn on_transition(&mut self, event: &TransitionEvent) {
        let kind = match event.kind {
            TransitionKind::Entry => AlertKind::GeofenceEntry,
            TransitionKind::Exit  => AlertKind::GeofenceExit,
        };
        let region_name = self.region_name(event.region_id.as_str()).to_owned();
        self.push_alert(&event.entity_id, kind, Some(region_name), event.at);

        let activity = Activity {
            id:        self.next_id(),
            entity_id: event.entity_id.clone(),
            kind:      event.kind.into(),
            region_id: event.region_id.clone(),
            at:        event.at,
            dwell_ms:  event.dwell_ms,
        };
        self.activities.push_front(activity);
        self.activities.truncate(ACTIVITY_CAPACITY);
    }

    fn on_status_change(&mut self, entity: &EntityId, status: EntityStatus, at: Timestamp) {
        if status == EntityStatus::Offline {
            self.push_alert(entity, AlertKind::Offline, None, at);
        }
    }
}
