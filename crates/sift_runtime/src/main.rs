//! Sift Runtime
//!
//! Headless tick loop that drives the spatial index: a swarm of enemies
//! roams the grid, the player circles the centre and auto-targets the
//! nearest enemy every tick.

mod swarm;

use anyhow::{Context, Result};
use sift_core::glam::Vec2;
use sift_core::time::SimulationTime;
use sift_core::{AutoTarget, GridConfig, NearestQuery, SpatialIndex};
use sift_services::Settings;
use swarm::Swarm;

/// Enemies closer than this to the player are destroyed and respawned.
const KILL_RANGE: f32 = 1.5;

/// Seconds per player orbit.
const ORBIT_PERIOD: f32 = 20.0;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Sift v{}", sift_core::VERSION);

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(&path)
            .inspect_err(|err| tracing::error!(%err, "failed to load settings"))
            .with_context(|| format!("loading settings from {path}"))?,
        None => Settings::default(),
    };
    let effective = settings.to_json_pretty()?;
    tracing::debug!(settings = %effective, "effective settings");

    if settings.builder.worker_threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(settings.builder.worker_threads)
            .build_global()
            .context("configuring rayon worker pool")?;
    }

    let config = settings
        .grid_config()
        .context("invalid grid configuration")?;
    let query = settings
        .nearest_query()
        .context("invalid query configuration")?;
    run(&settings, config, query);
    Ok(())
}

fn run(settings: &Settings, config: GridConfig, query: NearestQuery) {
    let sim = &settings.simulation;
    let report_every = sim.report_every.max(1);

    let mut index = SpatialIndex::new(config, settings.builder_options(), query);
    let mut swarm = Swarm::spawn(&config, sim);
    let mut time = SimulationTime::new();
    let mut target = AutoTarget::default();
    let mut snapshot = Vec::with_capacity(swarm.len());
    let mut kills = 0u64;
    let mut idle_ticks = 0u64;

    tracing::info!(
        enemies = swarm.len(),
        ticks = sim.ticks,
        metrics = sift_metrics::ENABLED,
        "simulation started"
    );

    for _ in 0..sim.ticks {
        let tick = time.advance();
        swarm.step(time.delta_seconds());
        swarm.snapshot_into(&mut snapshot);

        let stats = index.rebuild(tick, &snapshot);

        let player = player_position(&config, time.elapsed().as_secs_f32());
        match target.acquire(&index, player) {
            Some(hit) if hit.distance < KILL_RANGE => {
                if swarm.respawn(hit.entity) {
                    kills += 1;
                    tracing::debug!(tick, entity = %hit.entity, "enemy destroyed");
                }
            }
            Some(_) => {}
            None => idle_ticks += 1,
        }

        if tick % report_every == 0 {
            let builder = index.builder();
            let (fastest_ms, slowest_ms) = builder.timer().range_ms();
            tracing::info!(
                tick,
                target = ?target.entity,
                distance = target.distance,
                indexed = stats.indexed,
                out_of_bounds = stats.out_of_bounds,
                avg_rebuild_ms = builder.timer().average_ms(),
                p95_rebuild_ms = builder.timer().p95_ms(),
                fastest_ms,
                slowest_ms,
                map_us = builder.profiler().last("map").as_micros() as u64,
                commit_us = builder.profiler().last("commit").as_micros() as u64,
                "tick report"
            );
        }
    }

    tracing::info!(
        ticks = time.tick(),
        kills,
        idle_ticks,
        rebuilds = index.builder().counters().get("rebuilds"),
        "simulation finished"
    );
}

/// Player orbits the grid centre at a quarter of the grid's smaller extent.
fn player_position(config: &GridConfig, seconds: f32) -> Vec2 {
    let (min, max) = config.bounds();
    let centre = (min + max) / 2.0;
    let radius = (max - min).min_element() / 4.0;
    let angle = seconds / ORBIT_PERIOD * std::f32::consts::TAU;
    centre + Vec2::from_angle(angle) * radius
}
