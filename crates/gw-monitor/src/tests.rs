//! Tests for the transition detector and the monitor.

use gw_core::{GeoPoint, RegionId, Timestamp};
use gw_region::{RegionSpec, RegionStore};

use crate::{
    EntityStatus, EventSink, Monitor, MonitorConfig, PassSummary, TransitionEvent, TransitionKind,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn ts(ms: i64) -> Timestamp {
    Timestamp::from_millis(ms)
}

fn z1() -> RegionSpec {
    RegionSpec::new("z1", "Boalia Market", GeoPoint::new(24.3780, 88.6100), 800.0)
}

/// Two regions ~2.2 km apart, no overlap.
fn pair() -> Vec<RegionSpec> {
    vec![
        RegionSpec::new("r1", "West", GeoPoint::new(0.0, 0.00), 500.0),
        RegionSpec::new("r2", "East", GeoPoint::new(0.0, 0.02), 500.0),
    ]
}

/// Two regions that both contain (0, 0.0025).
fn overlapping() -> Vec<RegionSpec> {
    vec![
        RegionSpec::new("a", "A", GeoPoint::new(0.0, 0.000), 1_000.0),
        RegionSpec::new("b", "B", GeoPoint::new(0.0, 0.005), 1_000.0),
    ]
}

fn monitor_with(specs: Vec<RegionSpec>) -> Monitor {
    Monitor::with_regions(MonitorConfig::default(), RegionStore::with_regions(specs).unwrap())
}

fn kinds(events: &[TransitionEvent]) -> Vec<(TransitionKind, &str)> {
    events.iter().map(|e| (e.kind, e.region_id.as_str())).collect()
}

/// Sink that records everything, including pass summaries and status changes.
#[derive(Default)]
struct Recorder {
    events:   Vec<TransitionEvent>,
    statuses: Vec<(String, EntityStatus)>,
    passes:   Vec<PassSummary>,
}

impl EventSink for Recorder {
    fn on_transition(&mut self, event: &TransitionEvent) {
        self.events.push(event.clone());
    }

    fn on_status_change(&mut self, entity: &gw_core::EntityId, status: EntityStatus, _at: Timestamp) {
        self.statuses.push((entity.to_string(), status));
    }

    fn on_pass_end(&mut self, summary: &PassSummary) {
        self.passes.push(summary.clone());
    }
}

// ── Pure evaluate ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod evaluate_tests {
    use super::*;
    use crate::{TrackedEntity, evaluate};

    #[test]
    fn cold_start_inside_emits_single_entry() {
        let mut regions = RegionStore::with_regions(vec![z1()]).unwrap();
        let (entity, events) =
            evaluate(TrackedEntity::new("agent1"), GeoPoint::new(24.3780, 88.6100), &mut regions, ts(1_000));

        assert_eq!(kinds(&events), [(TransitionKind::Entry, "z1")]);
        assert_eq!(events[0].at, ts(1_000));
        assert_eq!(events[0].dwell_ms, None);
        assert!(entity.is_in("z1"));
        assert!(regions.occupants("z1").unwrap().contains(entity.id()));
        assert_eq!(entity.last_location(), Some(GeoPoint::new(24.3780, 88.6100)));
    }

    #[test]
    fn cold_start_outside_emits_nothing() {
        let mut regions = RegionStore::with_regions(vec![z1()]).unwrap();
        let (entity, events) =
            evaluate(TrackedEntity::new("agent1"), GeoPoint::new(24.3700, 88.6100), &mut regions, ts(0));
        assert!(events.is_empty());
        assert!(entity.current_regions().is_empty());
    }

    #[test]
    fn unchanged_location_is_a_no_op() {
        let mut regions = RegionStore::with_regions(vec![z1()]).unwrap();
        let here = GeoPoint::new(24.3781, 88.6101);
        let (entity, first) = evaluate(TrackedEntity::new("a"), here, &mut regions, ts(0));
        assert_eq!(first.len(), 1);
        let (entity, second) = evaluate(entity, here, &mut regions, ts(5_000));
        assert!(second.is_empty());
        let (_, third) = evaluate(entity, here, &mut regions, ts(10_000));
        assert!(third.is_empty());
        assert_eq!(regions.occupants("z1").unwrap().len(), 1);
    }

    #[test]
    fn moving_between_disjoint_regions_exits_and_enters() {
        let mut regions = RegionStore::with_regions(pair()).unwrap();
        let (entity, _) = evaluate(TrackedEntity::new("a"), GeoPoint::new(0.0, 0.0), &mut regions, ts(0));
        let (entity, events) = evaluate(entity, GeoPoint::new(0.0, 0.02), &mut regions, ts(7_000));

        assert_eq!(events.len(), 2);
        assert!(events.iter().any(|e| e.kind == TransitionKind::Exit && e.region_id.as_str() == "r1"));
        assert!(events.iter().any(|e| e.kind == TransitionKind::Entry && e.region_id.as_str() == "r2"));
        let exit = events.iter().find(|e| e.kind == TransitionKind::Exit).unwrap();
        assert_eq!(exit.dwell_ms, Some(7_000));

        assert!(regions.occupants("r1").unwrap().is_empty());
        assert!(regions.occupants("r2").unwrap().contains(entity.id()));
    }

    #[test]
    fn entering_overlap_emits_one_entry_per_region() {
        let mut regions = RegionStore::with_regions(overlapping()).unwrap();
        let (entity, none) = evaluate(TrackedEntity::new("a"), GeoPoint::new(0.5, 0.5), &mut regions, ts(0));
        assert!(none.is_empty());
        let (entity, events) = evaluate(entity, GeoPoint::new(0.0, 0.0025), &mut regions, ts(1));
        assert_eq!(kinds(&events), [(TransitionKind::Entry, "a"), (TransitionKind::Entry, "b")]);
        assert_eq!(entity.current_regions().len(), 2);
    }

    #[test]
    fn vanished_region_is_forgotten_without_exit() {
        let mut regions = RegionStore::with_regions(vec![z1()]).unwrap();
        let here = GeoPoint::new(24.3780, 88.6100);
        let (entity, _) = evaluate(TrackedEntity::new("a"), here, &mut regions, ts(0));
        regions.remove_region("z1").unwrap();

        let (entity, events) = evaluate(entity, here, &mut regions, ts(5_000));
        assert!(events.is_empty());
        assert!(entity.current_regions().is_empty());
        assert_eq!(entity.dwell_ms("z1", ts(5_000)), None);
    }

    #[test]
    fn history_is_recorded() {
        let mut regions = RegionStore::new();
        let (entity, _) = evaluate(TrackedEntity::new("a"), GeoPoint::new(1.0, 1.0), &mut regions, ts(0));
        let (entity, _) = evaluate(entity, GeoPoint::new(1.1, 1.0), &mut regions, ts(1));
        let trail: Vec<_> = entity.history().map(|f| f.location.lat).collect();
        assert_eq!(trail, [1.0, 1.1]);
    }
}

// ── Monitor: location updates ─────────────────────────────────────────────────

#[cfg(test)]
mod location_update_tests {
    use super::*;
    use crate::MonitorError;

    #[test]
    fn end_to_end_rajshahi_scenario() {
        let mut monitor = monitor_with(vec![z1()]);
        let mut events: Vec<TransitionEvent> = Vec::new();

        // ~890 m south of the centre, radius 800 m → outside.
        assert_eq!(monitor.location_update("agent1", 24.3700, 88.6100, ts(0), &mut events).unwrap(), 0);
        assert!(events.is_empty());

        assert_eq!(monitor.location_update("agent1", 24.3780, 88.6100, ts(7_000), &mut events).unwrap(), 1);
        assert_eq!(kinds(&events), [(TransitionKind::Entry, "z1")]);
        assert_eq!(monitor.occupancy()[&RegionId::new("z1")], 1);

        assert_eq!(monitor.location_update("agent1", 24.3700, 88.6100, ts(14_000), &mut events).unwrap(), 1);
        assert_eq!(
            kinds(&events),
            [(TransitionKind::Entry, "z1"), (TransitionKind::Exit, "z1")]
        );
        assert_eq!(events[1].dwell_ms, Some(7_000));
        assert_eq!(monitor.occupancy()[&RegionId::new("z1")], 0);
    }

    #[test]
    fn unknown_entity_is_registered_on_first_fix() {
        let mut monitor = monitor_with(vec![z1()]);
        assert!(monitor.entity("ghost").is_none());
        let mut events: Vec<TransitionEvent> = Vec::new();
        monitor.location_update("ghost", 24.3780, 88.6100, ts(0), &mut events).unwrap();
        assert!(monitor.entity("ghost").is_some());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn invalid_location_is_rejected_and_state_kept() {
        let mut monitor = monitor_with(vec![z1()]);
        let mut events: Vec<TransitionEvent> = Vec::new();
        monitor.location_update("a", 24.3780, 88.6100, ts(0), &mut events).unwrap();

        for (lat, lng) in [(95.0, 88.61), (24.378, 200.0), (f64::NAN, 0.0)] {
            let err = monitor.location_update("a", lat, lng, ts(1_000), &mut events).unwrap_err();
            assert!(matches!(err, MonitorError::InvalidLocation { .. }), "{err}");
        }

        assert_eq!(events.len(), 1, "no spurious exit");
        let entity = monitor.entity("a").unwrap();
        assert_eq!(entity.last_location(), Some(GeoPoint::new(24.3780, 88.6100)));
        assert!(entity.is_in("z1"));
        assert_eq!(entity.history().count(), 1);
    }

    #[test]
    fn invalid_first_fix_does_not_register() {
        let mut monitor = monitor_with(vec![z1()]);
        let mut events: Vec<TransitionEvent> = Vec::new();
        assert!(monitor.location_update("new", -91.0, 0.0, ts(0), &mut events).is_err());
        assert!(monitor.entity("new").is_none());
    }

    #[test]
    fn offline_fix_reactivates_and_evaluates() {
        let mut monitor = monitor_with(vec![z1()]);
        let mut sink = Recorder::default();
        monitor.register_entity("a");
        monitor.set_status("a", EntityStatus::Offline, ts(0), &mut sink).unwrap();

        assert_eq!(monitor.location_update("a", 24.3780, 88.6100, ts(1), &mut sink).unwrap(), 1);
        assert_eq!(kinds(&sink.events), [(TransitionKind::Entry, "z1")]);
        assert_eq!(sink.events[0].at, ts(1));
        assert_eq!(
            sink.statuses,
            [("a".to_owned(), EntityStatus::Offline), ("a".to_owned(), EntityStatus::Active)]
        );
        let entity = monitor.entity("a").unwrap();
        assert_eq!(entity.status(), EntityStatus::Active);
        assert_eq!(entity.active_since(), Some(ts(1)));
    }

    #[test]
    fn idle_fix_reactivates() {
        let mut monitor = monitor_with(vec![z1()]);
        let mut sink = Recorder::default();
        monitor.location_update("a", 24.3700, 88.6100, ts(0), &mut sink).unwrap();
        monitor.set_status("a", EntityStatus::Idle, ts(10), &mut sink).unwrap();
        assert_eq!(monitor.entity("a").unwrap().active_since(), None);

        monitor.location_update("a", 24.3780, 88.6100, ts(20), &mut sink).unwrap();
        let entity = monitor.entity("a").unwrap();
        assert_eq!(entity.status(), EntityStatus::Active);
        assert_eq!(entity.active_since(), Some(ts(20)));
        assert!(entity.is_in("z1"));
        assert_eq!(sink.statuses.last(), Some(&("a".to_owned(), EntityStatus::Active)));
    }

    #[test]
    fn active_since_is_kept_across_fixes() {
        let mut monitor = Monitor::new(MonitorConfig::default());
        let mut sink = Recorder::default();
        monitor.location_update("a", 1.0, 1.0, ts(100), &mut sink).unwrap();
        monitor.location_update("a", 1.1, 1.0, ts(7_100), &mut sink).unwrap();
        assert_eq!(monitor.entity("a").unwrap().active_since(), Some(ts(100)));
        assert!(sink.statuses.is_empty(), "already active, nothing to report");
    }

    #[test]
    fn history_is_capped() {
        let config = MonitorConfig { history_len: 3, ..MonitorConfig::default() };
        let mut monitor = Monitor::new(config);
        let mut events: Vec<TransitionEvent> = Vec::new();
        for i in 0..10 {
            monitor.location_update("a", i as f64, 0.0, ts(i), &mut events).unwrap();
        }
        let lats: Vec<f64> = monitor.entity("a").unwrap().history().map(|f| f.location.lat).collect();
        assert_eq!(lats, [7.0, 8.0, 9.0]);
    }

    #[test]
    fn zero_history_keeps_last_fix_only() {
        let config = MonitorConfig { history_len: 0, ..MonitorConfig::default() };
        let mut monitor = Monitor::new(config);
        let mut events: Vec<TransitionEvent> = Vec::new();
        monitor.location_update("a", 1.0, 2.0, ts(0), &mut events).unwrap();
        let entity = monitor.entity("a").unwrap();
        assert_eq!(entity.history().count(), 0);
        assert_eq!(entity.last_location(), Some(GeoPoint::new(1.0, 2.0)));
    }
}

// ── Monitor: statuses and entities ────────────────────────────────────────────

#[cfg(test)]
mod entity_tests {
    use super::*;
    use crate::MonitorError;

    #[test]
    fn register_is_idempotent() {
        let mut monitor = monitor_with(vec![z1()]);
        let mut events: Vec<TransitionEvent> = Vec::new();
        monitor.location_update("a", 24.3780, 88.6100, ts(0), &mut events).unwrap();
        monitor.register_entity("a");
        assert!(monitor.entity("a").unwrap().is_in("z1"));
        assert_eq!(monitor.entities().len(), 1);
    }

    #[test]
    fn status_changes_reach_sink_once() {
        let mut monitor = Monitor::new(MonitorConfig::default());
        let mut sink = Recorder::default();
        monitor.register_entity("a");
        monitor.set_status("a", EntityStatus::Offline, ts(0), &mut sink).unwrap();
        monitor.set_status("a", EntityStatus::Offline, ts(1), &mut sink).unwrap();
        monitor.set_status("a", EntityStatus::Idle, ts(2), &mut sink).unwrap();
        assert_eq!(
            sink.statuses,
            [("a".to_owned(), EntityStatus::Offline), ("a".to_owned(), EntityStatus::Idle)]
        );
    }

    #[test]
    fn status_of_unknown_entity_errors() {
        let mut monitor = Monitor::new(MonitorConfig::default());
        let err = monitor
            .set_status("nobody", EntityStatus::Offline, ts(0), &mut crate::NoopSink)
            .unwrap_err();
        assert!(matches!(err, MonitorError::UnknownEntity(_)));
    }

    #[test]
    fn removing_entity_clears_occupancy_silently() {
        let mut monitor = monitor_with(overlapping());
        let mut events: Vec<TransitionEvent> = Vec::new();
        monitor.location_update("a", 0.0, 0.0025, ts(0), &mut events).unwrap();
        assert_eq!(events.len(), 2);
        let removed = monitor.remove_entity("a").unwrap();
        assert_eq!(removed.current_regions().len(), 2);
        assert!(monitor.occupancy().values().all(|&n| n == 0));
        assert_eq!(events.len(), 2);
        assert!(monitor.remove_entity("a").is_none());
    }
}

// ── Monitor: region changes ───────────────────────────────────────────────────

#[cfg(test)]
mod region_change_tests {
    use super::*;
    use crate::RegionRemovalPolicy;

    fn inside_z1(policy: RegionRemovalPolicy) -> (Monitor, Vec<TransitionEvent>) {
        let config = MonitorConfig { removal_policy: policy, ..MonitorConfig::default() };
        let mut monitor = Monitor::with_regions(config, RegionStore::with_regions(vec![z1()]).unwrap());
        let mut events = Vec::new();
        monitor.location_update("a", 24.3780, 88.6100, ts(1_000), &mut events).unwrap();
        (monitor, events)
    }

    #[test]
    fn forget_policy_emits_nothing_on_removal_or_next_pass() {
        let (mut monitor, mut events) = inside_z1(RegionRemovalPolicy::Forget);
        let removed = monitor.remove_region("z1", ts(2_000), &mut events).unwrap();
        assert_eq!(removed.occupants().len(), 1);
        assert_eq!(events.len(), 1);
        assert!(monitor.entity("a").unwrap().current_regions().is_empty());

        monitor.evaluate_all(ts(5_000), &mut events).unwrap();
        monitor.location_update("a", 24.3780, 88.6100, ts(6_000), &mut events).unwrap();
        assert_eq!(events.len(), 1, "no exit for a deleted region");
    }

    #[test]
    fn forget_policy_readd_produces_fresh_entry() {
        let (mut monitor, mut events) = inside_z1(RegionRemovalPolicy::Forget);
        monitor.remove_region("z1", ts(2_000), &mut events).unwrap();
        monitor.add_region(z1()).unwrap();
        monitor.evaluate_all(ts(3_000), &mut events).unwrap();
        assert_eq!(
            kinds(&events),
            [(TransitionKind::Entry, "z1"), (TransitionKind::Entry, "z1")]
        );
        assert_eq!(events[1].at, ts(3_000));
    }

    #[test]
    fn synthesize_policy_emits_exit_with_dwell() {
        let (mut monitor, mut events) = inside_z1(RegionRemovalPolicy::SynthesizeExit);
        monitor.remove_region("z1", ts(4_000), &mut events).unwrap();
        assert_eq!(kinds(&events), [(TransitionKind::Entry, "z1"), (TransitionKind::Exit, "z1")]);
        assert_eq!(events[1].at, ts(4_000));
        assert_eq!(events[1].dwell_ms, Some(3_000));

        monitor.evaluate_all(ts(5_000), &mut events).unwrap();
        assert_eq!(events.len(), 2, "exit is not repeated");
    }

    #[test]
    fn set_regions_applies_policy_to_dropped_ids() {
        let (mut monitor, mut events) = inside_z1(RegionRemovalPolicy::SynthesizeExit);
        let outcome = monitor.set_regions(pair(), ts(2_000), &mut events).unwrap();
        assert_eq!(outcome.removed.len(), 1);
        assert_eq!(kinds(&events), [(TransitionKind::Entry, "z1"), (TransitionKind::Exit, "z1")]);
    }

    #[test]
    fn region_added_between_updates_is_picked_up_by_pass() {
        let mut monitor = Monitor::new(MonitorConfig::default());
        let mut sink = Recorder::default();
        monitor.location_update("a", 24.3780, 88.6100, ts(0), &mut sink).unwrap();
        assert!(sink.events.is_empty());

        monitor.add_region(z1()).unwrap();
        let summary = monitor.evaluate_all(ts(5_000), &mut sink).unwrap();
        assert_eq!(summary.events, 1);
        assert_eq!(kinds(&sink.events), [(TransitionKind::Entry, "z1")]);
    }

    #[test]
    fn shrinking_region_exits_on_next_pass() {
        let (mut monitor, mut events) = inside_z1(RegionRemovalPolicy::Forget);
        // Same id, centre moved ~2 km north: the entity is now outside.
        let moved = RegionSpec::new("z1", "Boalia Market", GeoPoint::new(24.3960, 88.6100), 800.0);
        let outcome = monitor.set_regions(vec![moved], ts(2_000), &mut events).unwrap();
        assert_eq!(outcome.updated, vec![RegionId::new("z1")]);
        assert_eq!(monitor.occupancy()[&RegionId::new("z1")], 1, "kept until next pass");

        monitor.evaluate_all(ts(5_000), &mut events).unwrap();
        assert_eq!(kinds(&events), [(TransitionKind::Entry, "z1"), (TransitionKind::Exit, "z1")]);
        assert_eq!(monitor.occupancy()[&RegionId::new("z1")], 0);
    }

    #[test]
    fn invalid_region_is_rejected() {
        let mut monitor = Monitor::new(MonitorConfig::default());
        let bad = RegionSpec::new("bad", "Bad", GeoPoint::new(0.0, 0.0), 0.0);
        assert!(matches!(
            monitor.add_region(bad),
            Err(crate::MonitorError::Region(gw_region::RegionError::InvalidRegion { .. }))
        ));
        assert!(monitor.regions().is_empty());
    }
}

// ── Monitor: evaluation passes ────────────────────────────────────────────────

#[cfg(test)]
mod pass_tests {
    use std::time::Duration;

    use super::*;
    use crate::MonitorError;

    #[test]
    fn pass_summary_counts() {
        let mut monitor = monitor_with(vec![z1()]);
        let mut sink = Recorder::default();
        monitor.location_update("a", 24.3780, 88.6100, ts(0), &mut sink).unwrap();
        monitor.location_update("b", 24.3700, 88.6100, ts(0), &mut sink).unwrap();
        monitor.register_entity("c");
        monitor.register_entity("d");
        monitor.set_status("d", EntityStatus::Offline, ts(0), &mut sink).unwrap();

        let summary = monitor.evaluate_all(ts(5_000), &mut sink).unwrap();
        assert_eq!(summary.tick, gw_core::Tick(1));
        assert_eq!(summary.evaluated, 2);
        assert_eq!(summary.unlocated, 1);
        assert_eq!(summary.skipped_offline, 1);
        assert_eq!(summary.events, 0);
        assert_eq!(sink.passes.len(), 1);
        assert_eq!(monitor.tick(), gw_core::Tick(1));
    }

    #[test]
    fn offline_entity_membership_is_frozen() {
        let mut monitor = monitor_with(vec![z1()]);
        let mut sink = Recorder::default();
        monitor.location_update("a", 24.3780, 88.6100, ts(0), &mut sink).unwrap();
        monitor.set_status("a", EntityStatus::Offline, ts(1), &mut sink).unwrap();
        monitor.remove_region("z1", ts(2), &mut sink).unwrap();
        monitor.add_region(RegionSpec::new("z2", "Elsewhere", GeoPoint::new(24.3780, 88.6100), 50.0)).unwrap();

        monitor.evaluate_all(ts(5_000), &mut sink).unwrap();
        assert_eq!(sink.events.len(), 1, "only the original entry");
    }

    #[test]
    fn many_entities_are_applied_in_id_order() {
        let mut monitor = monitor_with(vec![z1()]);
        let mut sink = Recorder::default();
        for i in (0..20).rev() {
            monitor.place(format!("agent{i:02}"), 24.3780, 88.6100, ts(0), &mut sink).unwrap();
        }
        assert!(sink.events.is_empty());
        monitor.evaluate_all(ts(5_000), &mut sink).unwrap();

        let order: Vec<_> = sink.events.iter().map(|e| e.entity_id.to_string()).collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order.len(), 20);
        assert_eq!(order, sorted);
        assert_eq!(monitor.occupancy()[&RegionId::new("z1")], 20);
    }

    #[test]
    fn generous_budget_passes() {
        let config = MonitorConfig {
            evaluation_budget: Some(Duration::from_secs(60)),
            ..MonitorConfig::default()
        };
        let mut monitor = Monitor::with_regions(config, RegionStore::with_regions(vec![z1()]).unwrap());
        monitor.location_update("a", 24.3780, 88.6100, ts(0), &mut crate::NoopSink).unwrap();
        assert!(monitor.evaluate_all(ts(5_000), &mut crate::NoopSink).is_ok());
    }

    #[test]
    fn overrun_is_reported_after_pass_completes() {
        let config = MonitorConfig {
            evaluation_budget: Some(Duration::ZERO),
            ..MonitorConfig::default()
        };
        let mut monitor = Monitor::with_regions(config, RegionStore::with_regions(vec![z1()]).unwrap());
        let mut sink = Recorder::default();
        for i in 0..2_000 {
            monitor.place(format!("e{i}"), 24.3780, 88.6100, ts(0), &mut sink).unwrap();
        }

        let err = monitor.evaluate_all(ts(5_000), &mut sink).unwrap_err();
        assert!(
            matches!(err, MonitorError::EvaluationOverrun { entities: 2_000, events: 2_000, .. }),
            "{err}"
        );
        assert_eq!(sink.events.len(), 2_000, "events were still delivered");
        assert_eq!(sink.passes.len(), 1);
    }
}

#[cfg(test)]
mod place_tests {
    use super::*;
    use crate::MonitorError;

    #[test]
    fn place_defers_membership_to_next_pass() {
        let mut monitor = monitor_with(vec![z1()]);
        let mut events: Vec<TransitionEvent> = Vec::new();
        monitor.place("a", 24.3780, 88.6100, ts(0), &mut events).unwrap();
        assert!(monitor.entity("a").unwrap().current_regions().is_empty());

        monitor.evaluate_all(ts(5_000), &mut events).unwrap();
        assert_eq!(kinds(&events), [(TransitionKind::Entry, "z1")]);

        monitor.place("a", 24.3700, 88.6100, ts(7_000), &mut events).unwrap();
        assert_eq!(events.len(), 1);
        monitor.evaluate_all(ts(10_000), &mut events).unwrap();
        assert_eq!(kinds(&events), [(TransitionKind::Entry, "z1"), (TransitionKind::Exit, "z1")]);
        assert_eq!(events[1].dwell_ms, Some(5_000));
    }

    #[test]
    fn place_rejects_bad_coordinates() {
        let mut monitor = Monitor::new(MonitorConfig::default());
        monitor.place("a", 10.0, 10.0, ts(0), &mut crate::NoopSink).unwrap();
        let err = monitor.place("a", 10.0, 181.0, ts(1), &mut crate::NoopSink).unwrap_err();
        assert!(matches!(err, MonitorError::InvalidLocation { .. }));
        assert_eq!(monitor.entity("a").unwrap().last_location(), Some(GeoPoint::new(10.0, 10.0)));
    }

    #[test]
    fn place_reactivates_without_evaluating() {
        let mut monitor = monitor_with(vec![z1()]);
        let mut sink = Recorder::default();
        monitor.register_entity("a");
        monitor.set_status("a", EntityStatus::Offline, ts(0), &mut sink).unwrap();

        monitor.place("a", 24.3780, 88.6100, ts(3_000), &mut sink).unwrap();
        assert!(sink.events.is_empty());
        assert_eq!(sink.statuses.last(), Some(&("a".to_owned(), EntityStatus::Active)));
        assert_eq!(monitor.entity("a").unwrap().active_since(), Some(ts(3_000)));

        monitor.evaluate_all(ts(5_000), &mut sink).unwrap();
        assert_eq!(kinds(&sink.events), [(TransitionKind::Entry, "z1")]);
    }
}

// ── Monitor: construction and metrics ─────────────────────────────────────────

#[cfg(test)]
mod monitor_tests {
    use super::*;
    use gw_core::EntityId;

    #[test]
    fn supplied_store_starts_without_occupants() {
        let mut regions = RegionStore::with_regions(vec![z1()]).unwrap();
        regions.admit("z1", &EntityId::new("ghost"));
        let mut monitor = Monitor::with_regions(MonitorConfig::default(), regions);
        assert_eq!(monitor.occupancy()[&RegionId::new("z1")], 0);

        // A real entity entering is the only occupant, and removing the
        // region reports only that entity.
        let config = MonitorConfig {
            removal_policy: crate::RegionRemovalPolicy::SynthesizeExit,
            ..MonitorConfig::default()
        };
        let mut regions = RegionStore::with_regions(vec![z1()]).unwrap();
        regions.admit("z1", &EntityId::new("ghost"));
        monitor = Monitor::with_regions(config, regions);
        let mut events: Vec<TransitionEvent> = Vec::new();
        monitor.location_update("a", 24.3780, 88.6100, ts(0), &mut events).unwrap();
        assert_eq!(monitor.occupancy()[&RegionId::new("z1")], 1);
        monitor.remove_region("z1", ts(1_000), &mut events).unwrap();
        let exits: Vec<_> = events
            .iter()
            .filter(|e| e.kind == TransitionKind::Exit)
            .map(|e| e.entity_id.to_string())
            .collect();
        assert_eq!(exits, ["a"]);
    }

    #[test]
    fn metrics_count_statuses_and_average_active_time() {
        let mut monitor = monitor_with(vec![z1()]);
        let mut sink = Recorder::default();
        monitor.location_update("a", 24.3780, 88.6100, ts(0), &mut sink).unwrap();
        monitor.location_update("b", 24.3700, 88.6100, ts(4_000), &mut sink).unwrap();
        monitor.location_update("c", 24.3700, 88.6100, ts(0), &mut sink).unwrap();
        monitor.set_status("c", EntityStatus::Idle, ts(1_000), &mut sink).unwrap();
        monitor.register_entity("d");
        monitor.set_status("d", EntityStatus::Offline, ts(0), &mut sink).unwrap();
        monitor.register_entity("e");

        let metrics = monitor.metrics(ts(10_000));
        assert_eq!(metrics.total, 5);
        assert_eq!(metrics.active, 2 + 1, "e is active but has never reported");
        assert_eq!(metrics.idle, 1);
        assert_eq!(metrics.offline, 1);
        // a: 10s, b: 6s; e is left out of the average.
        assert_eq!(metrics.average_active_ms, 8_000);
    }

    #[test]
    fn metrics_of_empty_monitor() {
        let monitor = Monitor::new(MonitorConfig::default());
        assert_eq!(monitor.metrics(ts(0)), crate::MonitorMetrics::default());
    }
}
