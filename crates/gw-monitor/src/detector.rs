//! The transition detector.
//!
//! Evaluation is split in two so a pass can compute many entities at once
//! while region occupant sets keep a single writer:
//!
//! - `plan` reads the region store and the entity's cached membership and
//!   returns a `Transition` describing what changed.  No side effects.
//! - `apply` writes the transition back: occupant sets, cached membership
//!   and entry times.  It returns the events to publish.
//!
//! Both halves stay inside the crate so occupant sets and cached membership
//! can only move together.  [`evaluate`] records the fix and runs both for a
//! single entity.
//!
//! Membership is boolean per region, so a region is never both entered and
//! exited in one evaluation.  Regions in the cached set that are no longer in
//! the store are dropped without an Exit event.

use std::collections::BTreeSet;

use log::debug;

use gw_core::{EntityId, GeoPoint, RegionId, Timestamp};
use gw_region::RegionStore;

use crate::{DEFAULT_HISTORY_LEN, Fix, TrackedEntity, TransitionEvent};

/// The difference between an entity's cached membership and the membership
/// at a location.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Transition {
    pub(crate) entity:   EntityId,
    pub(crate) location: GeoPoint,
    /// Every region containing `location`.
    pub(crate) inside:  BTreeSet<RegionId>,
    /// `inside` minus the cached set, ascending.
    pub(crate) entered: Vec<RegionId>,
    /// Cached set minus `inside`, restricted to regions still in the store.
    pub(crate) exited:  Vec<RegionId>,
}

/// Compute what being at `location` would change for `entity`.
pub(crate) fn plan(entity: &TrackedEntity, location: GeoPoint, regions: &RegionStore) -> Transition {
    let inside = regions.regions_containing(location);
    let entered = inside
        .difference(&entity.current_regions)
        .cloned()
        .collect();
    let exited = entity
        .current_regions
        .difference(&inside)
        .filter(|id| regions.contains(id.as_str()))
        .cloned()
        .collect();
    Transition { entity: entity.id.clone(), location, inside, entered, exited }
}

/// Write `transition` back into `entity` and `regions`, stamping events
/// with `now`.
///
/// Returns Entry events (ascending region id) followed by Exit events
/// (ascending region id).
pub(crate) fn apply(
    entity:     &mut TrackedEntity,
    transition: Transition,
    regions:    &mut RegionStore,
    now:        Timestamp,
) -> Vec<TransitionEvent> {
    debug_assert_eq!(entity.id, transition.entity);
    let mut events = Vec::with_capacity(transition.entered.len() + transition.exited.len());

    for region in transition.entered {
        regions.admit(region.as_str(), &entity.id);
        entity.entered_at.insert(region.clone(), now);
        let event = TransitionEvent::entry(entity.id.clone(), region, now);
        debug!("{event}");
        events.push(event);
    }

    for region in transition.exited {
        regions.evict(region.as_str(), &entity.id);
        let dwell = entity.entered_at.remove(&region).map(|t| now.millis_since(t));
        let event = TransitionEvent::exit(entity.id.clone(), region, now, dwell);
        debug!("{event}");
        events.push(event);
    }

    entity.current_regions = transition.inside;
    let TrackedEntity { current_regions, entered_at, .. } = &mut *entity;
    entered_at.retain(|id, _| current_regions.contains(id));
    events
}

/// Evaluate one entity against a new location.
///
/// Returns the updated entity and the (possibly empty) list of events.  The
/// entity is added to the occupant set of every region it entered and
/// removed from every region it exited.  An Idle or Offline entity is
/// marked Active by the fix.
///
/// This is the only public way to write occupant sets through the detector;
/// the two halves are not exported:
///
/// ```compile_fail
/// use gw_monitor::detector::apply;
/// ```
///
/// ```compile_fail
/// use gw_monitor::Transition;
/// ```
pub fn evaluate(
    mut entity:   TrackedEntity,
    new_location: GeoPoint,
    regions:      &mut RegionStore,
    now:          Timestamp,
) -> (TrackedEntity, Vec<TransitionEvent>) {
    entity.record_fix(Fix { location: new_location, at: now }, DEFAULT_HISTORY_LEN);
    let transition = plan(&entity, new_location, regions);
    let events = apply(&mut entity, transition, regions, now);
    (entity, events)
}
