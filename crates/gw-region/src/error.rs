//! Region-subsystem error type.

use thiserror::Error;

use gw_core::{GeoError, RegionId};

/// What made a region definition unacceptable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidRegionReason {
    #[error("radius {0} m must be positive and finite")]
    Radius(f64),

    #[error("centre: {0}")]
    Center(#[from] GeoError),

    #[error("id must not be empty")]
    EmptyId,
}

/// Errors produced by `gw-region`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegionError {
    #[error("invalid region {id:?}: {reason}")]
    InvalidRegion {
        id:     RegionId,
        reason: InvalidRegionReason,
    },

    #[error("region {0} is already registered")]
    DuplicateRegion(RegionId),

    #[error("region {0} not found")]
    UnknownRegion(RegionId),
}

pub type RegionResult<T> = Result<T, RegionError>;
