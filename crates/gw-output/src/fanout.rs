use gw_core::{EntityId, Timestamp};
use gw_monitor::{EntityStatus, EventSink, PassSummary, TransitionEvent};

/// Forwards every callback to both sinks, first `.0` then `.1`.  Nest to
/// reach more than two.
#[derive(Debug, Default)]
pub struct FanOut<A, B>(pub A, pub B);

impl<A: EventSink, B: EventSink> EventSink for FanOut<A, B> {
    fn on_transition(&mut self, event: &TransitionEvent) {
        self.0.on_transition(event);
        self.1.on_transition(event);
    }

    fn on_status_change(&mut self, entity: &EntityId, status: EntityStatus, at: Timestamp) {
        self.0.on_status_change(entity, status, at);
        self.1.on_status_change(entity, status, at);
    }

    fn on_pass_end(&mut self, summary: &PassSummary) {
        self.0.on_pass_end(summary);
        self.1.on_pass_end(summary);
    }
}
