//! Region definitions.

use std::collections::BTreeSet;

use gw_core::{EntityId, GeoPoint, RegionId};

use crate::{InvalidRegionReason, RegionError, RegionResult};

/// A region as supplied by the outside world (geofence editor, config file).
///
/// Not yet validated; turn it into a [`Region`] with [`Region::new`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionSpec {
    pub id:       RegionId,
    pub name:     String,
    pub center:   GeoPoint,
    pub radius_m: f64,
}

impl RegionSpec {
    pub fn new(
        id:       impl Into<RegionId>,
        name:     impl Into<String>,
        center:   GeoPoint,
        radius_m: f64,
    ) -> Self {
        Self { id: id.into(), name: name.into(), center, radius_m }
    }
}

/// A validated circular region plus its derived occupant set.
///
/// `occupants` always equals the set of tracked entities whose last
/// evaluated location was inside the region.  It is written only through
/// [`RegionStore::admit`][crate::RegionStore::admit] and
/// [`RegionStore::evict`][crate::RegionStore::evict].
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    id:        RegionId,
    name:      String,
    center:    GeoPoint,
    radius_m:  f64,
    occupants: BTreeSet<EntityId>,
}

impl Region {
    /// Validate `spec` and build an empty region.
    ///
    /// Rejects an empty id, a non-positive or non-finite radius, and a centre
    /// outside the valid latitude/longitude range.  Nothing is clamped.
    pub fn new(spec: RegionSpec) -> RegionResult<Self> {
        let invalid = |reason| RegionError::InvalidRegion { id: spec.id.clone(), reason };

        if spec.id.as_str().is_empty() {
            return Err(invalid(InvalidRegionReason::EmptyId));
        }
        if !(spec.radius_m.is_finite() && spec.radius_m > 0.0) {
            return Err(invalid(InvalidRegionReason::Radius(spec.radius_m)));
        }
        spec.center
            .validate()
            .map_err(|e| invalid(InvalidRegionReason::Center(e)))?;

        Ok(Self {
            id:        spec.id,
            name:      spec.name,
            center:    spec.center,
            radius_m:  spec.radius_m,
            occupants: BTreeSet::new(),
        })
    }

    #[inline]
    pub fn id(&self) -> &RegionId {
        &self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    #[inline]
    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    #[inline]
    pub fn occupants(&self) -> &BTreeSet<EntityId> {
        &self.occupants
    }

    /// The definition this region was built from.
    pub fn spec(&self) -> RegionSpec {
        RegionSpec {
            id:       self.id.clone(),
            name:     self.name.clone(),
            center:   self.center,
            radius_m: self.radius_m,
        }
    }

    /// Swap in new geometry from `other`, keeping the current occupants.
    pub(crate) fn redefine(&mut self, other: Region) {
        self.name = other.name;
        self.center = other.center;
        self.radius_m = other.radius_m;
    }

    pub(crate) fn occupants_mut(&mut self) -> &mut BTreeSet<EntityId> {
        &mut self.occupants
    }
}
