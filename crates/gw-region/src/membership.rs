//! Point-in-region tests.
//!
//! A point lies inside a region when its haversine distance to the centre is
//! `<=` the radius.  The comparison is inclusive: a point exactly on the
//! boundary is inside.

use std::collections::BTreeSet;

use gw_core::{GeoPoint, RegionId};

use crate::Region;

/// `true` if `point` lies within `region` (boundary inclusive).
#[inline]
pub fn is_inside(point: GeoPoint, region: &Region) -> bool {
    point.distance_m(region.center()) <= region.radius_m()
}

/// Ids of every region in `regions` that contains `point`.
///
/// Order of `regions` does not matter.  Overlapping regions all match.
pub fn regions_containing<'a, I>(point: GeoPoint, regions: I) -> BTreeSet<RegionId>
where
    I: IntoIterator<Item = &'a Region>,
{
    regions
        .into_iter()
        .filter(|r| is_inside(point, r))
        .map(|r| r.id().clone())
        .collect()
}
