//! `gw-core` — foundational types for the `geowatch` point-in-region monitor.
//!
//! This crate is a dependency of every other `gw-*` crate.  It has no `gw-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `EntityId`, `RegionId`                                |
//! | [`geo`]         | `GeoPoint`, haversine distance, coordinate validation |
//! | [`time`]        | `Timestamp`, `Tick`                                   |
//! | [`rng`]         | `EntityRng` (per-entity), `SimRng` (global)           |
//! | [`error`]       | `GeoError`, `GeoResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{GeoError, GeoResult};
pub use geo::{EARTH_RADIUS_M, GeoPoint, haversine_m};
pub use ids::{EntityId, RegionId};
pub use rng::{EntityRng, SimRng};
pub use time::{Tick, Timestamp};
