//! Random online/offline flapping.

use gw_core::{EntityId, SimRng};
use gw_monitor::{EntityStatus, EntityStore};

/// On every status tick picks one entity uniformly at random and, with
/// probability `probability`, flips it between online and offline.
pub struct StatusToggler {
    rng:         SimRng,
    probability: f64,
}

impl StatusToggler {
    pub fn new(rng: SimRng, probability: f64) -> Self {
        Self { rng, probability }
    }

    /// The status change to apply this tick, if any.
    pub fn pick(&mut self, entities: &EntityStore) -> Option<(EntityId, EntityStatus)> {
        let all = entities.sorted();
        let chosen = *self.rng.choose(&all)?;
        if !self.rng.gen_bool(self.probability) {
            return None;
        }
        let next = if chosen.status().is_online() {
            EntityStatus::Offline
        } else {
            EntityStatus::Active
        };
        Some((chosen.id().clone(), next))
    }
}
