//! `RegionStore` — the owned collection of regions and their occupant sets.
//!
//! The store is an explicit value handed to whoever runs evaluation passes;
//! there is no process-wide instance.  Region definitions come from outside
//! (`add_region`, `remove_region`, `replace_all`); occupant sets are derived
//! state written only by the transition detector via `admit` / `evict`.

use std::collections::{BTreeMap, BTreeSet};

use log::{info, warn};

use gw_core::{EntityId, GeoPoint, RegionId};

use crate::{Region, RegionError, RegionIndex, RegionResult, RegionSpec, is_inside};

/// What a bulk [`RegionStore::replace_all`] changed.
#[derive(Debug, Default)]
pub struct ReplaceOutcome {
    /// Ids that were not present before.
    pub added:   Vec<RegionId>,
    /// Ids that were present before; geometry replaced, occupants kept.
    pub updated: Vec<RegionId>,
    /// Regions that disappeared, with the occupants they had at removal.
    pub removed: Vec<Region>,
}

/// Regions keyed by id, plus an R-tree over their bounding boxes.
#[derive(Default)]
pub struct RegionStore {
    regions: BTreeMap<RegionId, Region>,
    index:   RegionIndex,
}

impl RegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a batch of definitions.  Fails on the first invalid
    /// or duplicate definition.
    pub fn with_regions<I>(specs: I) -> RegionResult<Self>
    where
        I: IntoIterator<Item = RegionSpec>,
    {
        let mut store = Self::new();
        store.replace_all(specs)?;
        Ok(store)
    }

    // ── Region definitions ────────────────────────────────────────────────

    /// Validate and register a new region with an empty occupant set.
    pub fn add_region(&mut self, spec: RegionSpec) -> RegionResult<&Region> {
        let region = Region::new(spec).inspect_err(|e| warn!("rejected region: {e}"))?;
        let id = region.id().clone();
        if self.regions.contains_key(&id) {
            return Err(RegionError::DuplicateRegion(id));
        }
        info!(
            "region {id} ({}) registered: centre {}, radius {} m",
            region.name(),
            region.center(),
            region.radius_m()
        );
        self.regions.insert(id.clone(), region);
        self.rebuild_index();
        self.regions
            .get(&id)
            .ok_or(RegionError::UnknownRegion(id))
    }

    /// Remove a region, returning it together with its last occupant set.
    pub fn remove_region(&mut self, id: &str) -> RegionResult<Region> {
        let region = self
            .regions
            .remove(id)
            .ok_or_else(|| RegionError::UnknownRegion(RegionId::new(id)))?;
        info!(
            "region {} removed with {} occupant(s)",
            region.id(),
            region.occupants().len()
        );
        self.rebuild_index();
        Ok(region)
    }

    /// Replace the whole region set.
    ///
    /// All definitions are validated before anything changes, so an invalid
    /// batch leaves the store untouched.  Regions whose id survives keep their
    /// occupants; the next evaluation pass reconciles them with the new
    /// geometry.
    pub fn replace_all<I>(&mut self, specs: I) -> RegionResult<ReplaceOutcome>
    where
        I: IntoIterator<Item = RegionSpec>,
    {
        let mut incoming: Vec<Region> = Vec::new();
        let mut seen: BTreeSet<RegionId> = BTreeSet::new();
        for spec in specs {
            let region = Region::new(spec).inspect_err(|e| warn!("rejected region: {e}"))?;
            if !seen.insert(region.id().clone()) {
                return Err(RegionError::DuplicateRegion(region.id().clone()));
            }
            incoming.push(region);
        }

        let mut old = std::mem::take(&mut self.regions);
        let mut outcome = ReplaceOutcome::default();
        for region in incoming {
            let id = region.id().clone();
            match old.remove(&id) {
                Some(mut existing) => {
                    existing.redefine(region);
                    self.regions.insert(id.clone(), existing);
                    outcome.updated.push(id);
                }
                None => {
                    self.regions.insert(id.clone(), region);
                    outcome.added.push(id);
                }
            }
        }
        outcome.removed = old.into_values().collect();
        self.rebuild_index();

        info!(
            "region set replaced: {} added, {} updated, {} removed",
            outcome.added.len(),
            outcome.updated.len(),
            outcome.removed.len()
        );
        Ok(outcome)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// All regions in ascending id order.
    pub fn list_regions(&self) -> impl Iterator<Item = &Region> + '_ {
        self.regions.values()
    }

    pub fn get(&self, id: &str) -> Option<&Region> {
        self.regions.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.regions.contains_key(id)
    }

    pub fn occupants(&self, id: &str) -> Option<&BTreeSet<EntityId>> {
        self.regions.get(id).map(Region::occupants)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Region id → current occupant count.
    pub fn occupancy(&self) -> BTreeMap<RegionId, usize> {
        self.regions
            .iter()
            .map(|(id, r)| (id.clone(), r.occupants().len()))
            .collect()
    }

    /// Region id → display name.
    pub fn names(&self) -> BTreeMap<RegionId, String> {
        self.regions
            .iter()
            .map(|(id, r)| (id.clone(), r.name().to_owned()))
            .collect()
    }

    /// Regions whose bounding box contains `point`.  A superset of the
    /// containing regions; run [`is_inside`] on each to get the exact answer.
    pub fn candidates(&self, point: GeoPoint) -> Vec<&Region> {
        self.index
            .candidates(point)
            .into_iter()
            .filter_map(|id| self.regions.get(id))
            .collect()
    }

    /// Regions containing `point`, using the R-tree to skip distant regions.
    ///
    /// Returns exactly what [`regions_containing`][crate::regions_containing]
    /// returns over [`list_regions`][Self::list_regions].
    pub fn regions_containing(&self, point: GeoPoint) -> BTreeSet<RegionId> {
        self.candidates(point)
            .into_iter()
            .filter(|r| is_inside(point, r))
            .map(|r| r.id().clone())
            .collect()
    }

    // ── Occupant writes (transition detector only) ────────────────────────
    //
    // Public so the monitor crate can reach them, hidden because occupant
    // sets must track the monitor's cached memberships.  `Monitor` clears a
    // store it is handed, so writes made here beforehand do not survive.

    /// Record `entity` as inside `region`.  `false` if the region is unknown
    /// or the entity was already recorded.
    #[doc(hidden)]
    pub fn admit(&mut self, region: &str, entity: &EntityId) -> bool {
        match self.regions.get_mut(region) {
            Some(r) => r.occupants_mut().insert(entity.clone()),
            None => false,
        }
    }

    /// Record `entity` as no longer inside `region`.  `false` if the region is
    /// unknown or the entity was not recorded.
    #[doc(hidden)]
    pub fn evict(&mut self, region: &str, entity: &EntityId) -> bool {
        match self.regions.get_mut(region) {
            Some(r) => r.occupants_mut().remove(entity),
            None => false,
        }
    }

    /// Drop `entity` from every occupant set.  Returns the regions it left.
    #[doc(hidden)]
    pub fn evict_everywhere(&mut self, entity: &EntityId) -> Vec<RegionId> {
        self.regions
            .values_mut()
            .filter_map(|r| r.occupants_mut().remove(entity).then(|| r.id().clone()))
            .collect()
    }

    /// Empty every occupant set.  Returns how many entries were dropped.
    #[doc(hidden)]
    pub fn clear_occupants(&mut self) -> usize {
        self.regions
            .values_mut()
            .map(|r| {
                let occupants = r.occupants_mut();
                let n = occupants.len();
                occupants.clear();
                n
            })
            .sum()
    }

    fn rebuild_index(&mut self) {
        self.index = RegionIndex::build(self.regions.values());
    }
}
