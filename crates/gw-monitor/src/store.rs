//! `EntityStore` — every tracked entity, keyed by id.

use rustc_hash::FxHashMap;

use gw_core::EntityId;

use crate::TrackedEntity;

#[derive(Default)]
pub struct EntityStore {
    entities: FxHashMap<EntityId, TrackedEntity>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&TrackedEntity> {
        self.entities.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut TrackedEntity> {
        self.entities.get_mut(id)
    }

    /// Return the entity, registering it with empty membership if unseen.
    pub(crate) fn get_or_register(&mut self, id: EntityId) -> &mut TrackedEntity {
        self.entities
            .entry(id)
            .or_insert_with_key(|id| TrackedEntity::new(id.clone()))
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<TrackedEntity> {
        self.entities.remove(id)
    }

    /// Entities in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &TrackedEntity> + '_ {
        self.entities.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TrackedEntity> + '_ {
        self.entities.values_mut()
    }

    /// Entities in ascending id order.
    pub fn sorted(&self) -> Vec<&TrackedEntity> {
        let mut all: Vec<&TrackedEntity> = self.entities.values().collect();
        all.sort_unstable_by(|a, b| a.id.cmp(&b.id));
        all
    }
}
