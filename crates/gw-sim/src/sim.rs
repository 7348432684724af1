//! The `Sim` struct and its timer loop.

use log::{debug, info};

use gw_core::Timestamp;
use gw_monitor::{EventSink, Monitor, MonitorError};

use crate::{LocationSource, SimConfig, SimResult, StatusToggler};

/// Counters accumulated over a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimStats {
    pub location_ticks: u64,
    pub passes:         u64,
    pub fixes_applied:  u64,
    pub fixes_rejected: u64,
    pub status_flips:   u64,
    pub events:         u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Timer {
    Location,
    Check,
    Status,
}

/// Drives a [`Monitor`] with three independent periodic timers on a virtual
/// clock.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<L: LocationSource> {
    pub config:  SimConfig,
    pub monitor: Monitor,
    pub source:  L,

    pub(crate) toggler:       Option<StatusToggler>,
    pub(crate) now:           Timestamp,
    pub(crate) next_location: Timestamp,
    pub(crate) next_check:    Timestamp,
    pub(crate) next_status:   Option<Timestamp>,
    pub(crate) stats:         SimStats,
}

impl<L: LocationSource> Sim<L> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Instant of the most recently fired timer (start time before any).
    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Run until `config.end()`.
    ///
    /// An [`MonitorError::EvaluationOverrun`] aborts the run: the check period
    /// is too short for the entity count.
    pub fn run<S: EventSink>(&mut self, sink: &mut S) -> SimResult<SimStats> {
        info!(
            "simulation start: {} entities, {} regions, {} ms",
            self.monitor.entities().len(),
            self.monitor.regions().len(),
            self.config.duration_ms
        );
        let end = self.config.end();
        while self.step_until(end, sink)?.is_some() {}
        info!(
            "simulation end at {}: {} passes, {} events, {} fixes ({} rejected), {} status flips",
            self.now,
            self.stats.passes,
            self.stats.events,
            self.stats.fixes_applied,
            self.stats.fixes_rejected,
            self.stats.status_flips
        );
        Ok(self.stats.clone())
    }

    /// Fire every timer due within the next `ms` milliseconds.  Ignores
    /// `config.end()`; useful for tests and incremental stepping.
    pub fn run_for<S: EventSink>(&mut self, ms: u64, sink: &mut S) -> SimResult<()> {
        let until = self.now.offset_ms(ms);
        while self.step_until(until, sink)?.is_some() {}
        Ok(())
    }

    /// Fire the next timer within `config.end()`.  Returns its instant, or
    /// `None` when the run is over.
    pub fn step<S: EventSink>(&mut self, sink: &mut S) -> SimResult<Option<Timestamp>> {
        let end = self.config.end();
        self.step_until(end, sink)
    }

    // ── Timer dispatch ────────────────────────────────────────────────────

    fn next_due(&self) -> (Timestamp, Timer) {
        let mut due = (self.next_location, Timer::Location);
        if self.next_check < due.0 {
            due = (self.next_check, Timer::Check);
        }
        if let Some(at) = self.next_status {
            if at < due.0 {
                due = (at, Timer::Status);
            }
        }
        due
    }

    fn step_until<S: EventSink>(
        &mut self,
        until: Timestamp,
        sink:  &mut S,
    ) -> SimResult<Option<Timestamp>> {
        let (at, timer) = self.next_due();
        if at > until {
            return Ok(None);
        }
        self.now = at;
        match timer {
            Timer::Location => {
                self.move_entities(at, sink)?;
                self.next_location = at.offset_ms(self.config.location_interval_ms);
            }
            Timer::Check => {
                let result = self.monitor.evaluate_all(at, sink);
                let delivered = match &result {
                    Ok(summary) => summary.events,
                    Err(MonitorError::EvaluationOverrun { events, .. }) => *events,
                    Err(_) => 0,
                };
                self.stats.passes += 1;
                self.stats.events += delivered as u64;
                self.next_check = at.offset_ms(self.config.check_interval_ms);
                result?;
            }
            Timer::Status => {
                self.toggle_status(at, sink)?;
                self.next_status = Some(at.offset_ms(self.config.status_interval_ms));
            }
        }
        Ok(Some(at))
    }

    fn move_entities<S: EventSink>(&mut self, at: Timestamp, sink: &mut S) -> SimResult<()> {
        self.stats.location_ticks += 1;
        let fixes = self.source.next_fixes(at, self.monitor.entities());
        for fix in fixes {
            match self.monitor.place(fix.entity, fix.lat, fix.lng, fix.at, sink) {
                Ok(()) => self.stats.fixes_applied += 1,
                Err(MonitorError::InvalidLocation { entity, source }) => {
                    debug!("dropping fix for {entity}: {source}");
                    self.stats.fixes_rejected += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn toggle_status<S: EventSink>(&mut self, at: Timestamp, sink: &mut S) -> SimResult<()> {
        let Some(toggler) = self.toggler.as_mut() else {
            return Ok(());
        };
        if let Some((entity, status)) = toggler.pick(self.monitor.entities()) {
            debug!("status tick at {at}: {entity} -> {status}");
            self.monitor.set_status(entity.as_str(), status, at, sink)?;
            self.stats.status_flips += 1;
        }
        Ok(())
    }
}
