//! `gw-sim` — timer-driven simulation around a [`gw_monitor::Monitor`].
//!
//! # Timers
//!
//! ```text
//! every location_interval_ms : LocationSource::next_fixes → Monitor::place
//! every check_interval_ms    : Monitor::evaluate_all      → EventSink
//! every status_interval_ms   : StatusToggler::pick        → Monitor::set_status
//! ```
//!
//! Time is virtual: [`Sim::step`] jumps straight to the next due timer, so a
//! simulated hour runs in milliseconds and every run with the same seed is
//! identical.  Each timer callback runs to completion before the next one
//! starts; when two timers fall due at the same instant they fire in the
//! order above.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use gw_sim::{JitterSource, SimBuilder, SimConfig};
//!
//! let config = SimConfig::default();
//! let mut sim = SimBuilder::new(config.clone(), JitterSource::new(config.seed, config.jitter_deg))
//!     .regions(specs)
//!     .place("agent1", GeoPoint::new(24.3780, 88.6100))
//!     .build()?;
//! let stats = sim.run(&mut feed)?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod sim;
pub mod source;
pub mod status;


pub use builder::SimBuilder;
pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use sim::{Sim, SimStats};
pub use source::{JitterSource, LocationFix, LocationSource, ScriptedSource};
pub use status::StatusToggler;
