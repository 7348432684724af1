//! rajshahi — field agents wandering around four Rajshahi geofences.
//!
//! Usage: `rajshahi [CONFIG.toml]`.  Without an argument the built-in
//! scenario from `rajshahi.toml` runs.  Set `RUST_LOG=debug` to see every
//! transition as it happens.

mod config;

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use log::info;

use gw_core::GeoPoint;
use gw_monitor::{EntityStatus, NoopSink};
use gw_output::{ActivityFeed, CsvEventWriter, FanOut, OutputSink, format_duration};
use gw_sim::{JitterSource, SimBuilder};

use config::load_config;

/// Alerts printed after the run.
const ALERTS_SHOWN: usize = 15;

fn main() -> Result<()> {
    init_logging();

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = load_config(path.as_deref())?;
    info!(
        "{} regions, {} agents, seed {}",
        config.regions.len(),
        config.agents.len(),
        config.sim.seed
    );

    // 1. Build the sim.
    let source = JitterSource::new(config.sim.seed, config.sim.jitter_deg);
    let mut builder = SimBuilder::new(config.sim.clone(), source)
        .monitor_config(config.monitor.clone())
        .regions(config.regions.iter().cloned());
    for agent in &config.agents {
        builder = builder.place(agent.id.clone(), GeoPoint::new(agent.lat, agent.lng));
    }
    let mut sim = builder.build()?;

    // 2. Initial statuses.  Not alerts: nothing has happened yet.
    let start = config.sim.start();
    for agent in config.agents.iter().filter(|a| a.status != EntityStatus::Active) {
        sim.monitor.set_status(agent.id.as_str(), agent.status, start, &mut NoopSink)?;
    }

    // 3. Sinks.
    let feed = ActivityFeed::new(sim.monitor.regions().names())
        .with_entity_names(config.entity_names());
    let csv = OutputSink::new(CsvEventWriter::new(&config.output_dir)?);
    let mut sink = FanOut(feed, csv);

    // 4. Run.
    let t0 = Instant::now();
    let stats = sim.run(&mut sink)?;
    let elapsed = t0.elapsed();
    sink.1.finish()?;
    let FanOut(feed, _) = sink;

    // 5. Report.
    let mut out = std::io::stdout().lock();
    writeln!(out, "Simulated {} s in {:.3} s", config.sim.duration_ms / 1_000, elapsed.as_secs_f64())?;
    writeln!(
        out,
        "  passes: {}  events: {}  fixes: {} ({} rejected)  status flips: {}",
        stats.passes, stats.events, stats.fixes_applied, stats.fixes_rejected, stats.status_flips
    )?;
    let metrics = sim.monitor.metrics(sim.now());
    writeln!(
        out,
        "  agents: {} active, {} idle, {} offline of {}  avg active: {}",
        metrics.active,
        metrics.idle,
        metrics.offline,
        metrics.total,
        format_duration(metrics.average_active_ms as f64 / 1_000.0)
    )?;
    writeln!(out, "  CSV written to {}", config.output_dir.display())?;
    writeln!(out)?;

    writeln!(out, "{:<22} {:>9}", "Geofence", "Occupants")?;
    writeln!(out, "{}", "-".repeat(32))?;
    for (id, count) in sim.monitor.occupancy() {
        writeln!(out, "{:<22} {:>9}", feed.region_name(id.as_str()), count)?;
    }
    writeln!(out)?;

    writeln!(out, "{:<16} {:<8} {:<24} {:>7}", "Agent", "Status", "Inside", "Fixes")?;
    writeln!(out, "{}", "-".repeat(58))?;
    for entity in sim.monitor.entities().sorted() {
        let inside: Vec<&str> = entity
            .current_regions()
            .iter()
            .map(|r| feed.region_name(r.as_str()))
            .collect();
        writeln!(
            out,
            "{:<16} {:<8} {:<24} {:>7}",
            feed.entity_name(entity.id()),
            entity.status().as_str(),
            if inside.is_empty() { "-".to_owned() } else { inside.join(", ") },
            entity.history().count(),
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Latest alerts ({} unread):", feed.unread_count())?;
    for alert in feed.alerts().take(ALERTS_SHOWN) {
        writeln!(out, "  {alert}")?;
    }
    let exits_with_dwell = feed.activities().filter_map(|a| a.description().map(|d| (a, d)));
    for (activity, description) in exits_with_dwell.take(5) {
        writeln!(
            out,
            "  {} left {}, {description}",
            feed.entity_name(&activity.entity_id),
            feed.region_name(activity.region_id.as_str())
        )?;
    }

    Ok(())
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
}
