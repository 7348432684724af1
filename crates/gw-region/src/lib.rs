//! `gw-region` — circular regions (geofences) and membership evaluation.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`region`]     | `RegionSpec` (input), `Region` (validated, with occupants)   |
//! | [`membership`] | `is_inside`, `regions_containing`                            |
//! | [`index`]      | `RegionIndex` — R-tree of region bounding boxes              |
//! | [`store`]      | `RegionStore` — add / remove / replace / list / occupants    |
//! | [`error`]      | `RegionError`, `RegionResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod index;
pub mod membership;
pub mod region;
pub mod store;


pub use error::{InvalidRegionReason, RegionError, RegionResult};
pub use index::RegionIndex;
pub use membership::{is_inside, regions_containing};
pub use region::{Region, RegionSpec};
pub use store::{RegionStore, ReplaceOutcome};
