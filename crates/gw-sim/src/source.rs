//! Pluggable location feeds.
//!
//! The simulation never generates movement itself; it asks a
//! [`LocationSource`] for fixes on every movement tick.  Swap the random
//! [`JitterSource`] for a [`ScriptedSource`] (replayed track) or a real
//! device feed without touching the monitor.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use gw_core::{EntityId, EntityRng, Timestamp};
use gw_monitor::EntityStore;

/// A raw location report, not yet validated.
#[derive(Clone, Debug, PartialEq)]
pub struct LocationFix {
    pub entity: EntityId,
    pub lat:    f64,
    pub lng:    f64,
    pub at:     Timestamp,
}

impl LocationFix {
    pub fn new(entity: impl Into<EntityId>, lat: f64, lng: f64, at: Timestamp) -> Self {
        Self { entity: entity.into(), lat, lng, at }
    }
}

/// Produces location fixes on each movement tick.
pub trait LocationSource {
    /// Fixes available as of `now`.  `entities` is the monitor's current view,
    /// read-only.
    fn next_fixes(&mut self, now: Timestamp, entities: &EntityStore) -> Vec<LocationFix>;
}

// ── JitterSource ──────────────────────────────────────────────────────────────

/// Random walk: every online, located entity moves by a uniform step in
/// `[-jitter/2, jitter/2)` degrees on each axis.  Offline entities stay put.
///
/// Each entity draws from its own [`EntityRng`], assigned in ascending id
/// order on first sight, so runs are reproducible for a given seed.
pub struct JitterSource {
    seed:       u64,
    jitter_deg: f64,
    rngs:       FxHashMap<EntityId, EntityRng>,
    next_slot:  u64,
}

impl JitterSource {
    pub fn new(seed: u64, jitter_deg: f64) -> Self {
        Self { seed, jitter_deg, rngs: FxHashMap::default(), next_slot: 0 }
    }

    fn rng_for(&mut self, id: &EntityId) -> &mut EntityRng {
        let seed = self.seed;
        let slot = &mut self.next_slot;
        self.rngs.entry(id.clone()).or_insert_with(|| {
            let rng = EntityRng::new(seed, *slot);
            *slot += 1;
            rng
        })
    }
}

impl LocationSource for JitterSource {
    fn next_fixes(&mut self, now: Timestamp, entities: &EntityStore) -> Vec<LocationFix> {
        let jitter = self.jitter_deg;
        let mut fixes = Vec::with_capacity(entities.len());
        for entity in entities.sorted() {
            if !entity.status().is_online() {
                continue;
            }
            let Some(here) = entity.last_location() else {
                continue;
            };
            let rng = self.rng_for(entity.id());
            let d_lat = rng.jitter(jitter);
            let d_lng = rng.jitter(jitter);
            let there = here.offset_deg(d_lat, d_lng);
            fixes.push(LocationFix::new(entity.id().clone(), there.lat, there.lng, now));
        }
        fixes
    }
}

// ── ScriptedSource ────────────────────────────────────────────────────────────

/// Replays a fixed list of fixes, releasing each once its timestamp is due.
pub struct ScriptedSource {
    pending: VecDeque<LocationFix>,
}

impl ScriptedSource {
    /// Fixes are released in timestamp order; equal timestamps keep their
    /// input order.
    pub fn new<I>(fixes: I) -> Self
    where
        I: IntoIterator<Item = LocationFix>,
    {
        let mut all: Vec<LocationFix> = fixes.into_iter().collect();
        all.sort_by_key(|f| f.at);
        Self { pending: all.into() }
    }

    /// Fixes not yet released.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl LocationSource for ScriptedSource {
    fn next_fixes(&mut self, now: Timestamp, _entities: &EntityStore) -> Vec<LocationFix> {
        let mut due = Vec::new();
        while self.pending.front().is_some_and(|f| f.at <= now) {
            if let Some(fix) = self.pending.pop_front() {
                due.push(fix);
            }
        }
        due
    }
}
