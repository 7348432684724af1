//! Geographic coordinate type and great-circle distance.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Membership decisions compare a
//! distance against a radius with an inclusive bound, so the extra precision
//! keeps boundary classification stable for points a few millimetres either
//! side of the edge.

use crate::{GeoError, GeoResult};

/// Mean Earth radius used by the spherical haversine model, in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Construct without validation.  Use [`GeoPoint::checked`] for input that
    /// comes from outside the process.
    #[inline]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Construct and validate in one step.
    pub fn checked(lat: f64, lng: f64) -> GeoResult<Self> {
        let p = Self { lat, lng };
        p.validate()?;
        Ok(p)
    }

    /// Reject non-finite values and out-of-range degrees.  Never clamps.
    pub fn validate(&self) -> GeoResult<()> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(GeoError::NonFinite { lat: self.lat, lng: self.lng });
        }
        if self.lat.abs() > 90.0 {
            return Err(GeoError::InvalidLatitude(self.lat));
        }
        if self.lng.abs() > 180.0 {
            return Err(GeoError::InvalidLongitude(self.lng));
        }
        Ok(())
    }

    /// Haversine great-circle distance in metres.
    ///
    /// Always `>= 0`, exactly `0` for identical points, and symmetric up to
    /// floating-point rounding.
    #[inline]
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        haversine_m(self, other)
    }

    /// Shift by a number of degrees.  The result is not validated.
    #[inline]
    pub fn offset_deg(self, d_lat: f64, d_lng: f64) -> GeoPoint {
        GeoPoint { lat: self.lat + d_lat, lng: self.lng + d_lng }
    }
}

/// Haversine distance between `a` and `b` on a sphere of radius
/// [`EARTH_RADIUS_M`].
pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat * 0.5).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lng * 0.5).sin().powi(2);

    // Rounding can push `h` a hair above 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}
