//! The `Monitor` — owns the region and entity stores and drives evaluation.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use gw_core::{EntityId, GeoPoint, RegionId, Tick, Timestamp};
use gw_region::{Region, RegionSpec, RegionStore, ReplaceOutcome};

use crate::detector::{Transition, apply, plan};
use crate::{
    EntityStatus, EntityStore, EventSink, Fix, MonitorConfig, MonitorError, MonitorResult,
    RegionRemovalPolicy, TrackedEntity, TransitionEvent,
};

/// What one [`Monitor::evaluate_all`] pass did.
#[derive(Clone, Debug, PartialEq)]
pub struct PassSummary {
    pub tick:            Tick,
    pub at:              Timestamp,
    /// Online entities with a known location that were evaluated.
    pub evaluated:       usize,
    pub skipped_offline: usize,
    /// Entities registered but never located.
    pub unlocated:       usize,
    pub events:          usize,
    pub elapsed:         Duration,
}

/// Point-in-time counts over the tracked entities.  See [`Monitor::metrics`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorMetrics {
    pub total:   usize,
    pub active:  usize,
    pub idle:    usize,
    pub offline: usize,
    /// Mean time since Active entities last became Active.  Entities that
    /// have never reported are left out; `0` if none qualify.
    pub average_active_ms: u64,
}

/// Point-in-region monitor.
///
/// Owns a [`RegionStore`] and an [`EntityStore`].  Outside code mutates
/// region *definitions* and reports locations and statuses; the monitor is the
/// only writer of occupant sets and cached memberships.  Every event is
/// delivered to the [`EventSink`] passed to the call that produced it.
///
/// Two ways to drive it:
///
/// - [`location_update`][Self::location_update] evaluates one entity
///   immediately against its new fix.
/// - [`evaluate_all`][Self::evaluate_all] re-evaluates every online entity at
///   its last known location.  Run it on a timer to pick up region edits made
///   between location reports.
pub struct Monitor {
    config:   MonitorConfig,
    regions:  RegionStore,
    entities: EntityStore,
    tick:     Tick,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self::with_regions(config, RegionStore::new())
    }

    /// Start from an existing region store.  The monitor begins with no
    /// entities, so any occupants already recorded in `regions` are cleared.
    pub fn with_regions(config: MonitorConfig, mut regions: RegionStore) -> Self {
        let cleared = regions.clear_occupants();
        if cleared > 0 {
            warn!("cleared {cleared} stale occupant(s) from the supplied region store");
        }
        Self { config, regions, entities: EntityStore::new(), tick: Tick::ZERO }
    }

    // ── Read access ───────────────────────────────────────────────────────

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn regions(&self) -> &RegionStore {
        &self.regions
    }

    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    pub fn entity(&self, id: &str) -> Option<&TrackedEntity> {
        self.entities.get(id)
    }

    /// Number of completed evaluation passes.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Region id → number of entities currently inside.
    pub fn occupancy(&self) -> BTreeMap<RegionId, usize> {
        self.regions.occupancy()
    }

    /// Status counts and the average length of the current Active stretch
    /// as of `now`.
    pub fn metrics(&self, now: Timestamp) -> MonitorMetrics {
        let mut metrics = MonitorMetrics::default();
        let mut active_total: u64 = 0;
        let mut timed: u64 = 0;
        for entity in self.entities.iter() {
            metrics.total += 1;
            match entity.status {
                EntityStatus::Active  => metrics.active += 1,
                EntityStatus::Idle    => metrics.idle += 1,
                EntityStatus::Offline => metrics.offline += 1,
            }
            if let (EntityStatus::Active, Some(since)) = (entity.status, entity.active_since) {
                active_total = active_total.saturating_add(now.millis_since(since));
                timed += 1;
            }
        }
        if timed > 0 {
            metrics.average_active_ms = active_total / timed;
        }
        metrics
    }

    // ── Entities ──────────────────────────────────────────────────────────

    /// Register an entity with empty membership.  Idempotent: an existing
    /// entity is returned unchanged.
    pub fn register_entity(&mut self, id: impl Into<EntityId>) -> &TrackedEntity {
        self.entities.get_or_register(id.into())
    }

    /// Stop tracking an entity.  It is dropped from every occupant set
    /// without Exit events.
    pub fn remove_entity(&mut self, id: &str) -> Option<TrackedEntity> {
        let entity = self.entities.remove(id)?;
        let left = self.regions.evict_everywhere(&entity.id);
        info!("entity {id} removed; dropped from {} region(s)", left.len());
        Some(entity)
    }

    /// Change an entity's reporting state.
    ///
    /// Going offline freezes its membership: passes skip it and no events are
    /// emitted until it comes back online.
    pub fn set_status<S: EventSink>(
        &mut self,
        id:     &str,
        status: EntityStatus,
        at:     Timestamp,
        sink:   &mut S,
    ) -> MonitorResult<()> {
        let entity = self
            .entities
            .get_mut(id)
            .ok_or_else(|| MonitorError::UnknownEntity(EntityId::new(id)))?;
        if entity.status == status {
            return Ok(());
        }
        debug!("entity {id}: {} -> {status}", entity.status);
        entity.set_status(status, at);
        sink.on_status_change(&entity.id, status, at);
        Ok(())
    }

    /// Record a location report without evaluating it.
    ///
    /// The entity is registered if unseen.  Membership catches up at the next
    /// [`evaluate_all`][Self::evaluate_all].  Same validation and
    /// reactivation as [`location_update`][Self::location_update]; only the
    /// status change, if any, reaches `sink`.
    pub fn place<S: EventSink>(
        &mut self,
        id:   impl Into<EntityId>,
        lat:  f64,
        lng:  f64,
        at:   Timestamp,
        sink: &mut S,
    ) -> MonitorResult<()> {
        let id = id.into();
        let location = GeoPoint::checked(lat, lng).map_err(|source| {
            warn!("rejected location for {id}: {source}");
            MonitorError::InvalidLocation { entity: id.clone(), source }
        })?;
        let history_len = self.config.history_len;
        let entity = self.entities.get_or_register(id);
        accept_fix(entity, Fix { location, at }, history_len, sink);
        Ok(())
    }

    /// Accept a location report and evaluate the entity against it.
    ///
    /// Unknown entities are registered on the fly, so their first fix inside
    /// a region produces an Entry.  Out-of-range coordinates are rejected with
    /// [`MonitorError::InvalidLocation`]; the entity keeps its last good fix
    /// and nothing is emitted.  An accepted fix marks an Idle or Offline
    /// entity Active again (reported to `sink` before any transition) and is
    /// then evaluated like any other.
    ///
    /// Returns the number of events delivered to `sink`.
    pub fn location_update<S: EventSink>(
        &mut self,
        id:   impl Into<EntityId>,
        lat:  f64,
        lng:  f64,
        at:   Timestamp,
        sink: &mut S,
    ) -> MonitorResult<usize> {
        let id = id.into();
        let location = match GeoPoint::checked(lat, lng) {
            Ok(p) => p,
            Err(source) => {
                warn!("rejected location for {id}: {source}");
                return Err(MonitorError::InvalidLocation { entity: id, source });
            }
        };

        let history_len = self.config.history_len;
        let entity = self.entities.get_or_register(id);
        accept_fix(entity, Fix { location, at }, history_len, sink);

        let transition = plan(entity, location, &self.regions);
        Ok(publish(apply(entity, transition, &mut self.regions, at), sink))
    }

    // ── Regions ───────────────────────────────────────────────────────────

    /// Register a region.  Existing entities are checked against it at their
    /// next update or pass.
    pub fn add_region(&mut self, spec: RegionSpec) -> MonitorResult<()> {
        self.regions.add_region(spec)?;
        Ok(())
    }

    /// Remove a region and settle its occupants per the configured
    /// [`RegionRemovalPolicy`].
    pub fn remove_region<S: EventSink>(
        &mut self,
        id:   &str,
        at:   Timestamp,
        sink: &mut S,
    ) -> MonitorResult<Region> {
        let region = self.regions.remove_region(id)?;
        self.retire(&region, at, sink);
        Ok(region)
    }

    /// Replace the whole region set.  Regions that disappear are settled as in
    /// [`remove_region`][Self::remove_region]; regions whose id survives keep
    /// their occupants until the next evaluation.
    pub fn set_regions<S, I>(
        &mut self,
        specs: I,
        at:    Timestamp,
        sink:  &mut S,
    ) -> MonitorResult<ReplaceOutcome>
    where
        S: EventSink,
        I: IntoIterator<Item = RegionSpec>,
    {
        let outcome = self.regions.replace_all(specs)?;
        for region in &outcome.removed {
            self.retire(region, at, sink);
        }
        Ok(outcome)
    }

    /// Clear every cached reference to a removed region.
    fn retire<S: EventSink>(&mut self, region: &Region, at: Timestamp, sink: &mut S) {
        let policy = self.config.removal_policy;
        let region_id = region.id();

        for occupant in region.occupants() {
            let Some(entity) = self.entities.get_mut(occupant.as_str()) else {
                continue;
            };
            let entered = entity.forget_region(region_id.as_str());
            if policy == RegionRemovalPolicy::SynthesizeExit {
                let dwell = entered.map(|t| at.millis_since(t));
                let event = TransitionEvent::exit(occupant.clone(), region_id.clone(), at, dwell);
                debug!("{event} (region removed)");
                sink.on_transition(&event);
            }
        }
        // Entities whose cached set disagrees with the occupant set.
        for entity in self.entities.iter_mut() {
            entity.forget_region(region_id.as_str());
        }
        info!(
            "region {region_id} retired with {} occupant(s), policy {policy:?}",
            region.occupants().len()
        );
    }

    // ── Evaluation pass ───────────────────────────────────────────────────

    /// Re-evaluate every online, located entity at its last known location,
    /// stamping events with `at`.
    ///
    /// The membership phase only reads shared state and runs on Rayon with the
    /// `parallel` feature.  Results are applied sequentially in ascending
    /// entity id order, so the outcome does not depend on thread scheduling.
    ///
    /// If a budget is configured and the pass overruns it, the pass still
    /// completes (all events are delivered) and
    /// [`MonitorError::EvaluationOverrun`] is returned.
    pub fn evaluate_all<S: EventSink>(
        &mut self,
        at:   Timestamp,
        sink: &mut S,
    ) -> MonitorResult<PassSummary> {
        let started = Instant::now();
        self.tick = self.tick.next();

        let mut skipped_offline = 0;
        let mut unlocated = 0;
        let mut work: Vec<(&TrackedEntity, GeoPoint)> = Vec::with_capacity(self.entities.len());
        for entity in self.entities.sorted() {
            match (entity.status.is_online(), entity.last_location()) {
                (false, _)         => skipped_offline += 1,
                (true, None)       => unlocated += 1,
                (true, Some(loc))  => work.push((entity, loc)),
            }
        }
        let evaluated = work.len();
        let transitions = plan_all(&work, &self.regions);
        drop(work);

        let mut events = 0;
        for transition in transitions {
            let Some(entity) = self.entities.get_mut(transition.entity.as_str()) else {
                continue;
            };
            events += publish(apply(entity, transition, &mut self.regions, at), sink);
        }

        let summary = PassSummary {
            tick: self.tick,
            at,
            evaluated,
            skipped_offline,
            unlocated,
            events,
            elapsed: started.elapsed(),
        };
        debug!(
            "pass {}: {} evaluated, {} offline, {} events in {:?}",
            summary.tick, summary.evaluated, summary.skipped_offline, summary.events, summary.elapsed
        );
        sink.on_pass_end(&summary);

        if let Some(budget) = self.config.evaluation_budget {
            if summary.elapsed > budget {
                warn!("pass {} overran its budget ({:?} > {budget:?})", summary.tick, summary.elapsed);
                return Err(MonitorError::EvaluationOverrun {
                    elapsed:  summary.elapsed,
                    budget,
                    entities: evaluated,
                    events,
                });
            }
        }
        Ok(summary)
    }
}

fn accept_fix<S: EventSink>(entity: &mut TrackedEntity, fix: Fix, history_len: usize, sink: &mut S) {
    let previous = entity.status;
    if entity.record_fix(fix, history_len) {
        debug!("entity {}: {previous} -> active on new fix", entity.id);
        sink.on_status_change(&entity.id, EntityStatus::Active, fix.at);
    }
}

fn publish<S: EventSink>(events: Vec<TransitionEvent>, sink: &mut S) -> usize {
    for event in &events {
        sink.on_transition(event);
    }
    events.len()
}

#[cfg(not(feature = "parallel"))]
fn plan_all(work: &[(&TrackedEntity, GeoPoint)], regions: &RegionStore) -> Vec<Transition> {
    work.iter()
        .map(|&(entity, location)| plan(entity, location, regions))
        .collect()
}

#[cfg(feature = "parallel")]
fn plan_all(work: &[(&TrackedEntity, GeoPoint)], regions: &RegionStore) -> Vec<Transition> {
    use rayon::prelude::*;

    work.par_iter()
        .map(|&(entity, location)| plan(entity, location, regions))
        .collect()
}
