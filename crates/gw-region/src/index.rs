//! R-tree prefilter for membership queries.
//!
//! Each region is stored as the `[lat, lng]` bounding box of its spherical
//! cap.  A point query returns every region whose box contains the point;
//! callers still run the exact haversine test on the candidates, so the
//! index never changes an answer, it only skips regions that cannot match.
//!
//! # Bounding-box construction
//!
//! For a cap of angular radius `θ` around latitude `φ₀`:
//!
//! ```text
//! Δlat = θ
//! Δlng = asin(sin θ / cos φ₀)        (cap does not reach a pole)
//! ```
//!
//! Caps that touch a pole or straddle the ±180° meridian get the full
//! longitude range.  Both spans are padded slightly so rounding can never
//! exclude a boundary point the exact test would accept.

use rstar::{AABB, RTree, RTreeObject};

use gw_core::{EARTH_RADIUS_M, GeoPoint, RegionId};

use crate::Region;

const PAD_FACTOR: f64 = 1.0 + 1e-6;
const PAD_DEG:    f64 = 1e-9;

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct RegionEnvelope {
    min: [f64; 2], // [lat, lng]
    max: [f64; 2],
    id:  RegionId,
}

impl RTreeObject for RegionEnvelope {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

impl RegionEnvelope {
    fn for_region(region: &Region) -> Self {
        let center = region.center();
        let theta = region.radius_m() / EARTH_RADIUS_M; // radians
        let d_lat = theta.to_degrees() * PAD_FACTOR + PAD_DEG;

        let lat_min = (center.lat - d_lat).max(-90.0);
        let lat_max = (center.lat + d_lat).min(90.0);

        let reaches_pole = center.lat.abs() + d_lat >= 90.0;
        let (lng_min, lng_max) = if reaches_pole || theta >= std::f64::consts::FRAC_PI_2 {
            (-180.0, 180.0)
        } else {
            let ratio = (theta.sin() / center.lat.to_radians().cos()).min(1.0);
            let d_lng = ratio.asin().to_degrees() * PAD_FACTOR + PAD_DEG;
            let (lo, hi) = (center.lng - d_lng, center.lng + d_lng);
            if lo < -180.0 || hi > 180.0 { (-180.0, 180.0) } else { (lo, hi) }
        };

        Self {
            min: [lat_min, lng_min],
            max: [lat_max, lng_max],
            id:  region.id().clone(),
        }
    }
}

// ── RegionIndex ───────────────────────────────────────────────────────────────

/// Bulk-loaded R-tree over region bounding boxes.
///
/// Immutable once built; [`RegionStore`][crate::RegionStore] rebuilds it
/// whenever the region set changes.
pub struct RegionIndex {
    tree: RTree<RegionEnvelope>,
}

impl RegionIndex {
    pub fn build<'a, I>(regions: I) -> Self
    where
        I: IntoIterator<Item = &'a Region>,
    {
        let entries: Vec<RegionEnvelope> =
            regions.into_iter().map(RegionEnvelope::for_region).collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn empty() -> Self {
        Self { tree: RTree::new() }
    }

    /// Ids of regions whose bounding box contains `point`.
    ///
    /// A superset of the regions that actually contain the point.
    pub fn candidates(&self, point: GeoPoint) -> Vec<&RegionId> {
        let probe = AABB::from_point([point.lat, point.lng]);
        self.tree
            .locate_in_envelope_intersecting(&probe)
            .map(|e| &e.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for RegionIndex {
    fn default() -> Self {
        Self::empty()
    }
}
