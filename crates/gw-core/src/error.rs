//! Coordinate validation errors.
//!
//! Higher crates wrap `GeoError` as the `source` of their own input-validation
//! variants (`InvalidRegion`, `InvalidLocation`) so the operator sees both the
//! rejected object and the offending coordinate.

use thiserror::Error;

/// Why a latitude/longitude pair was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    #[error("latitude {0} is outside [-90, 90]")]
    InvalidLatitude(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    InvalidLongitude(f64),

    #[error("coordinate ({lat}, {lng}) is not finite")]
    NonFinite { lat: f64, lng: f64 },
}

/// Shorthand result type for coordinate checks.
pub type GeoResult<T> = Result<T, GeoError>;
