use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use diffsim::bus::Topic;
use diffsim::config::{DEFAULT_CONFIG_PATH, load_config};
use diffsim::runner::{self, Snapshot};
use diffsim::Simulation;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config(&config_path)
        .with_context(|| format!("failed to load configuration from {}", config_path))?;

    let mut sim = Simulation::new(&config.robot, config.controller)
        .context("invalid robot or controller parameters")?;
    config
        .scenario
        .apply(&mut sim, config.runner.max_waypoints)
        .context("rejected scenario")?;

    let snapshots: Topic<Snapshot> = Topic::new(16);
    let snapshot_rx = snapshots.subscribe();

    info!("Starting simulation and telemetry tasks...");
    let (summary, received) = tokio::try_join!(
        runner::sim_task(sim, config.runner, snapshots),
        runner::telemetry_task(snapshot_rx),
    )?;

    let state = summary.final_state;
    info!(
        ticks = summary.ticks,
        sim_time = summary.sim_time,
        settled = summary.settled,
        snapshots = received,
        x = state.x,
        y = state.y,
        theta = state.theta,
        "Run finished."
    );
    Ok(())
}
