//! Fluent builder for constructing a [`Sim`].

use gw_core::{EntityId, GeoPoint, SimRng};
use gw_monitor::{Monitor, MonitorConfig, MonitorError, NoopSink};
use gw_region::{RegionSpec, RegionStore};

use crate::{LocationSource, Sim, SimConfig, SimResult, SimStats, StatusToggler};

/// Seed offset for the status toggler's RNG stream.
const STATUS_STREAM: u64 = 1;

/// Fluent builder for [`Sim<L>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — timer periods, duration, seed
/// - `L: LocationSource` — where movement comes from
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                      |
/// |------------------------|------------------------------|
/// | `.monitor_config(c)`   | `MonitorConfig::default()`   |
/// | `.regions(v)`          | No regions                   |
/// | `.place(id, p)`        | No entities                  |
/// | `.toggle_status(b)`    | `true` (if the period > 0)   |
pub struct SimBuilder<L: LocationSource> {
    config:         SimConfig,
    source:         L,
    monitor_config: MonitorConfig,
    regions:        Vec<RegionSpec>,
    placements:     Vec<(EntityId, GeoPoint)>,
    toggle_status:  bool,
}

impl<L: LocationSource> SimBuilder<L> {
    pub fn new(config: SimConfig, source: L) -> Self {
        Self {
            config,
            source,
            monitor_config: MonitorConfig::default(),
            regions:        Vec::new(),
            placements:     Vec::new(),
            toggle_status:  true,
        }
    }

    pub fn monitor_config(mut self, config: MonitorConfig) -> Self {
        self.monitor_config = config;
        self
    }

    pub fn regions<I: IntoIterator<Item = RegionSpec>>(mut self, regions: I) -> Self {
        self.regions.extend(regions);
        self
    }

    pub fn region(mut self, region: RegionSpec) -> Self {
        self.regions.push(region);
        self
    }

    /// Register an entity at a starting location.  Its memberships are
    /// established by the first evaluation pass.
    pub fn place(mut self, id: impl Into<EntityId>, at: GeoPoint) -> Self {
        self.placements.push((id.into(), at));
        self
    }

    /// Enable or disable random online/offline flapping.
    pub fn toggle_status(mut self, enabled: bool) -> Self {
        self.toggle_status = enabled;
        self
    }

    /// Validate inputs, register regions and entities, and return a
    /// ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<L>> {
        self.config.validate()?;
        let start = self.config.start();

        let regions = RegionStore::with_regions(self.regions).map_err(MonitorError::from)?;
        let mut monitor = Monitor::with_regions(self.monitor_config, regions);
        for (id, p) in self.placements {
            monitor.place(id, p.lat, p.lng, start, &mut NoopSink)?;
        }

        let toggler = (self.toggle_status && self.config.status_interval_ms > 0).then(|| {
            let mut root = SimRng::new(self.config.seed);
            StatusToggler::new(root.child(STATUS_STREAM), self.config.offline_toggle_probability)
        });
        let next_status = toggler
            .as_ref()
            .map(|_| start.offset_ms(self.config.status_interval_ms));

        Ok(Sim {
            next_location: start.offset_ms(self.config.location_interval_ms),
            next_check:    start.offset_ms(self.config.check_interval_ms),
            next_status,
            now:           start,
            toggler,
            stats:         SimStats::default(),
            monitor,
            source:        self.source,
            config:        self.config,
        })
    }
}
