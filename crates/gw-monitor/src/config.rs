//! Monitor configuration.

use std::time::Duration;

/// What happens to occupants when a region they are inside is removed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RegionRemovalPolicy {
    /// Drop the membership silently: no Exit event, and the region id is
    /// pruned from every entity's cached set so a later re-add starts fresh.
    #[default]
    Forget,
    /// Emit one Exit event per occupant, stamped with the removal time.
    SynthesizeExit,
}

/// Default for [`MonitorConfig::history_len`].
pub const DEFAULT_HISTORY_LEN: usize = 50;

/// Tunables for a [`Monitor`][crate::Monitor].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MonitorConfig {
    /// Accepted fixes kept per entity, oldest dropped first.  Default: 50.
    pub history_len: usize,

    pub removal_policy: RegionRemovalPolicy,

    /// Upper bound on the wall time of one [`evaluate_all`] pass.  `None`
    /// disables the check.
    ///
    /// [`evaluate_all`]: crate::Monitor::evaluate_all
    pub evaluation_budget: Option<Duration>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            history_len:       DEFAULT_HISTORY_LEN,
            removal_policy:    RegionRemovalPolicy::Forget,
            evaluation_budget: None,
        }
    }
}
