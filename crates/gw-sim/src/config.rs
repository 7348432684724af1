//! Simulation configuration.

use gw_core::Timestamp;

use crate::{SimError, SimResult};

/// Timer periods and randomness for a simulated run.
///
/// Typically loaded from a TOML file by the application crate and passed to
/// [`SimBuilder`][crate::SimBuilder].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Unix milliseconds of the first instant of the run.
    pub start_unix_ms: i64,

    /// How long to run, in milliseconds.
    pub duration_ms: u64,

    /// Period of the movement timer.  Default: 7 000 ms.
    pub location_interval_ms: u64,

    /// Period of the membership evaluation timer.  Default: 5 000 ms.
    pub check_interval_ms: u64,

    /// Period of the online/offline toggle timer.  `0` disables it.
    /// Default: 15 000 ms.
    pub status_interval_ms: u64,

    /// Chance that a status tick flips the chosen entity.  Default: 0.15.
    pub offline_toggle_probability: f64,

    /// Full width of the uniform random step applied to each coordinate per
    /// movement tick, in degrees.  Default: 0.005 (±0.0025°).
    pub jitter_deg: f64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_unix_ms:              0,
            duration_ms:                3_600_000,
            location_interval_ms:       7_000,
            check_interval_ms:          5_000,
            status_interval_ms:         15_000,
            offline_toggle_probability: 0.15,
            jitter_deg:                 0.005,
            seed:                       42,
        }
    }
}

impl SimConfig {
    #[inline]
    pub fn start(&self) -> Timestamp {
        Timestamp::from_millis(self.start_unix_ms)
    }

    /// The instant the run stops (inclusive).
    #[inline]
    pub fn end(&self) -> Timestamp {
        self.start().offset_ms(self.duration_ms)
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.location_interval_ms == 0 {
            return Err(SimError::Config("location_interval_ms must be > 0".into()));
        }
        if self.check_interval_ms == 0 {
            return Err(SimError::Config("check_interval_ms must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.offline_toggle_probability) {
            return Err(SimError::Config(format!(
                "offline_toggle_probability {} is outside [0, 1]",
                self.offline_toggle_probability
            )));
        }
        if !(self.jitter_deg.is_finite() && self.jitter_deg >= 0.0) {
            return Err(SimError::Config(format!("jitter_deg {} must be >= 0", self.jitter_deg)));
        }
        Ok(())
    }
}
