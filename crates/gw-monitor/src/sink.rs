//! The consumer side of the monitor.

use gw_core::{EntityId, Timestamp};

use crate::{EntityStatus, PassSummary, TransitionEvent};

/// Receives events as the monitor produces them.
///
/// All methods except [`on_transition`][Self::on_transition] have no-op
/// defaults.  Sinks own display concerns (deduplication, rate limiting,
/// retention); the monitor hands each event over exactly once.
pub trait EventSink {
    fn on_transition(&mut self, event: &TransitionEvent);

    /// An entity changed reporting state (e.g. went offline).
    fn on_status_change(&mut self, _entity: &EntityId, _status: EntityStatus, _at: Timestamp) {}

    /// Called after every [`Monitor::evaluate_all`][crate::Monitor::evaluate_all].
    fn on_pass_end(&mut self, _summary: &PassSummary) {}
}

/// An [`EventSink`] that discards everything.
pub struct NoopSink;

impl EventSink for NoopSink {
    fn on_transition(&mut self, _event: &TransitionEvent) {}
}

/// Collects transitions in arrival order.  Handy in tests and for batch
/// callers.
impl EventSink for Vec<TransitionEvent> {
    fn on_transition(&mut self, event: &TransitionEvent) {
        self.push(event.clone());
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn on_transition(&mut self, event: &TransitionEvent) {
        (**self).on_transition(event);
    }

    fn on_status_change(&mut self, entity: &EntityId, status: EntityStatus, at: Timestamp) {
        (**self).on_status_change(entity, status, at);
    }

    fn on_pass_end(&mut self, summary: &PassSummary) {
        (**self).on_pass_end(summary);
    }
}
