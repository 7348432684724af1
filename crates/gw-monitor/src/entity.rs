//! Tracked entity state.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use gw_core::{EntityId, GeoPoint, RegionId, Timestamp};

/// Reporting state of an entity.  Offline entities are skipped by evaluation
/// passes, so their membership stays frozen until they come back.  Any
/// accepted location fix brings an entity back to Active.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EntityStatus {
    #[default]
    Active,
    Idle,
    Offline,
}

impl EntityStatus {
    #[inline]
    pub fn is_online(self) -> bool {
        !matches!(self, EntityStatus::Offline)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityStatus::Active  => "active",
            EntityStatus::Idle    => "idle",
            EntityStatus::Offline => "offline",
        }
    }
}

impl std::fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One accepted location report.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fix {
    pub location: GeoPoint,
    pub at:       Timestamp,
}

/// A moving entity as seen by the transition detector.
///
/// `current_regions` caches the regions the entity was inside at its last
/// evaluation; the next evaluation diffs against it.  Only the detector
/// writes it.
#[derive(Clone, Debug)]
pub struct TrackedEntity {
    pub(crate) id:              EntityId,
    pub(crate) status:          EntityStatus,
    pub(crate) last_fix:        Option<Fix>,
    pub(crate) current_regions: BTreeSet<RegionId>,
    /// When the entity entered each region in `current_regions`.
    pub(crate) entered_at:      BTreeMap<RegionId, Timestamp>,
    pub(crate) history:         VecDeque<Fix>,
    /// Start of the current Active stretch.  Set by the first fix or status
    /// change that makes the entity Active, cleared when it leaves Active.
    pub(crate) active_since:    Option<Timestamp>,
}

impl TrackedEntity {
    /// A freshly registered entity: no location, inside nothing.  The first
    /// evaluation emits an Entry for every region containing its location.
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id:              id.into(),
            status:          EntityStatus::Active,
            last_fix:        None,
            current_regions: BTreeSet::new(),
            entered_at:      BTreeMap::new(),
            history:         VecDeque::new(),
            active_since:    None,
        }
    }

    #[inline]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    #[inline]
    pub fn status(&self) -> EntityStatus {
        self.status
    }

    /// Last accepted location, if any.
    #[inline]
    pub fn last_location(&self) -> Option<GeoPoint> {
        self.last_fix.map(|f| f.location)
    }

    #[inline]
    pub fn last_fix(&self) -> Option<Fix> {
        self.last_fix
    }

    #[inline]
    pub fn current_regions(&self) -> &BTreeSet<RegionId> {
        &self.current_regions
    }

    /// `true` if the entity's last evaluation placed it inside `region`.
    pub fn is_in(&self, region: &str) -> bool {
        self.current_regions.contains(region)
    }

    /// When the entity last became Active.  `None` until its first fix or
    /// while it is Idle or Offline.
    #[inline]
    pub fn active_since(&self) -> Option<Timestamp> {
        self.active_since
    }

    /// Oldest-first accepted fixes.
    pub fn history(&self) -> impl Iterator<Item = &Fix> + '_ {
        self.history.iter()
    }

    /// Milliseconds spent inside `region` as of `now`.  `None` if the entity
    /// is not inside it.
    pub fn dwell_ms(&self, region: &str, now: Timestamp) -> Option<u64> {
        self.entered_at.get(region).map(|&t| now.millis_since(t))
    }

    /// Store an accepted fix and mark the entity Active.  Returns `true` if
    /// the status changed.
    pub(crate) fn record_fix(&mut self, fix: Fix, history_len: usize) -> bool {
        self.last_fix = Some(fix);
        if history_len > 0 {
            while self.history.len() >= history_len {
                self.history.pop_front();
            }
            self.history.push_back(fix);
        }
        let reactivated = self.status != EntityStatus::Active;
        self.set_status(EntityStatus::Active, fix.at);
        reactivated
    }

    /// Change status, keeping `active_since` in step.  Returns the previous
    /// status.
    pub(crate) fn set_status(&mut self, status: EntityStatus, at: Timestamp) -> EntityStatus {
        let previous = std::mem::replace(&mut self.status, status);
        match status {
            EntityStatus::Active => {
                if previous != EntityStatus::Active || self.active_since.is_none() {
                    self.active_since = Some(at);
                }
            }
            EntityStatus::Idle | EntityStatus::Offline => self.active_since = None,
        }
        previous
    }

    /// Drop a region from the cached set without emitting anything.
    /// Returns the entry time if the entity was inside.
    pub(crate) fn forget_region(&mut self, region: &str) -> Option<Timestamp> {
        let was_in = self.current_regions.remove(region);
        let entered = self.entered_at.remove(region);
        if was_in { entered } else { None }
    }
}
