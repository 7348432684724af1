//! Time model.
//!
//! # Design
//!
//! Wall-clock instants are `Timestamp`s: signed milliseconds since the Unix
//! epoch, matching the resolution location feeds usually report.  Integer
//! milliseconds keep interval arithmetic exact and make simulated runs
//! reproducible.
//!
//! Evaluation passes are counted separately with `Tick`, a monotonically
//! increasing pass number that observers use for progress reporting.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

// ── Timestamp ─────────────────────────────────────────────────────────────────

/// Milliseconds since the Unix epoch.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub const EPOCH: Timestamp = Timestamp(0);

    #[inline]
    pub fn from_millis(ms: i64) -> Self {
        Timestamp(ms)
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Current wall-clock time.  Falls back to the epoch if the system clock
    /// reads before 1970.
    pub fn now() -> Self {
        let ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        Timestamp(ms)
    }

    /// The instant `ms` milliseconds after `self`.
    #[inline]
    pub fn offset_ms(self, ms: u64) -> Timestamp {
        Timestamp(self.0.saturating_add(i64::try_from(ms).unwrap_or(i64::MAX)))
    }

    /// Milliseconds elapsed from `earlier` to `self`; `0` if `earlier` is later.
    #[inline]
    pub fn millis_since(self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0).max(0) as u64
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

// ── Tick ─────────────────────────────────────────────────────────────────────

/// Evaluation pass counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}
