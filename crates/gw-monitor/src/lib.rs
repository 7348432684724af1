//! `gw-monitor` — entry/exit detection for entities moving among regions.
//!
//! # Evaluation
//!
//! ```text
//! location fix ──▶ plan   (read-only: which regions contain the fix?
//!                          diff against the entity's cached set)
//!              ──▶ apply  (write: occupant sets, cached set, history;
//!                          emit one TransitionEvent per entered/exited region)
//!              ──▶ EventSink
//! ```
//!
//! The detector keeps no history of *how* an entity got where it is; it only
//! diffs two membership snapshots.  [`Monitor::evaluate_all`] runs the plan
//! phase for every online entity (on Rayon with the `parallel` feature) and
//! then applies the results one entity at a time in ascending id order, so
//! region occupant sets only ever have a single writer.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the plan phase of a pass on Rayon's thread pool.  |
//! | `serde`    | Derives `Serialize`/`Deserialize` on public types.     |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use gw_monitor::{Monitor, MonitorConfig};
//!
//! let mut monitor = Monitor::new(MonitorConfig::default());
//! monitor.add_region(RegionSpec::new("z1", "Market", GeoPoint::new(24.378, 88.61), 800.0))?;
//! let mut events = Vec::new();
//! monitor.location_update("agent1", 24.378, 88.61, Timestamp::now(), &mut events)?;
//! ```

pub mod config;
pub mod detector;
pub mod entity;
pub mod error;
pub mod event;
pub mod monitor;
pub mod sink;
pub mod store;

#[cfg(test)]
mod tests;

pub use config::{DEFAULT_HISTORY_LEN, MonitorConfig, RegionRemovalPolicy};
pub use detector::evaluate;
pub use entity::{EntityStatus, Fix, TrackedEntity};
pub use error::{MonitorError, MonitorResult};
pub use event::{TransitionEvent, TransitionKind};
pub use monitor::{Monitor, MonitorMetrics, PassSummary};
pub use sink::{EventSink, NoopSink};
pub use store::EntityStore;
