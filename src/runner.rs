//! Headless driver for a [`Simulation`].
//!
//! `sim_task` owns the simulation and steps it; `telemetry_task` consumes
//! the snapshots it publishes. Nothing but snapshots crosses between them.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, ensure};
use tokio::sync::broadcast;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use diffsim_kinematics::Pose;
use diffsim_navigation::ControlMode;

use crate::bus::Topic;
use crate::config::RunnerConfig;
use crate::simulation::{ManualDrive, Simulation};
use crate::state::RobotState;

/// Read-only view of the simulation at one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub tick: u64,
    pub sim_time: f64,
    pub state: RobotState,
    pub mode: &'static str,
    pub target: Option<Pose>,
    /// `(cursor, length)` while following a path.
    pub waypoint: Option<(usize, usize)>,
    pub trail_len: usize,
    pub target_reached: bool,
}

impl Snapshot {
    pub fn capture(sim: &Simulation, tick: u64) -> Self {
        let mode = sim.mode();
        let waypoint = match mode {
            ControlMode::AutoPath(path) => Some((path.index(), path.len())),
            _ => None,
        };
        Snapshot {
            tick,
            sim_time: sim.elapsed(),
            state: sim.read_state(),
            mode: mode.label(),
            target: mode.active_target(),
            waypoint,
            trail_len: sim.trail().len(),
            target_reached: sim.target_reached(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub sim_time: f64,
    /// False when the run hit `max_duration_secs` first.
    pub settled: bool,
    pub final_state: RobotState,
}

/// Step `sim` until it settles or `max_duration_secs` of simulated time pass.
///
/// In realtime mode ticks are paced by an interval and dt is the measured
/// wall-clock time since the previous tick; otherwise ticks run back to back
/// with a fixed `1 / tick_hz` step. While in manual mode no input is held, so
/// manual voltages decay every tick.
pub async fn sim_task(
    mut sim: Simulation,
    cfg: RunnerConfig,
    topic: Topic<Snapshot>,
) -> anyhow::Result<RunSummary> {
    ensure!(
        cfg.tick_hz.is_finite() && cfg.tick_hz > 0.0,
        "tick_hz must be finite and positive, got {}",
        cfg.tick_hz
    );
    let step = 1.0 / cfg.tick_hz;
    let period = Duration::try_from_secs_f64(step)
        .with_context(|| format!("tick_hz {} gives an unrepresentable period", cfg.tick_hz))?;
    ensure!(!period.is_zero(), "tick_hz {} rounds to a zero period", cfg.tick_hz);
    let publish_every = cfg.telemetry_every.max(1);

    let mut ticker = cfg.realtime.then(|| {
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    });
    let mut last_tick = Instant::now();

    info!(step, realtime = cfg.realtime, mode = %sim.mode(), "Simulation task started.");

    let mut tick: u64 = 0;
    let mut settled = false;
    while sim.elapsed() < cfg.max_duration_secs {
        let dt = match ticker.as_mut() {
            Some(ticker) => {
                ticker.tick().await;
                let now = Instant::now();
                let dt = now.duration_since(last_tick).as_secs_f64();
                last_tick = now;
                dt
            }
            None => step,
        };

        if sim.mode().is_manual() {
            sim.manual_drive(ManualDrive::Idle);
        }
        sim.update(dt);
        tick += 1;

        if tick % publish_every == 0 {
            topic.publish(Snapshot::capture(&sim, tick));
            // Give subscribers polled alongside this task a chance to drain.
            tokio::task::yield_now().await;
        }

        if sim.is_settled() {
            settled = true;
            break;
        }
    }

    topic.publish(Snapshot::capture(&sim, tick));
    let summary = RunSummary {
        ticks: tick,
        sim_time: sim.elapsed(),
        settled,
        final_state: sim.read_state(),
    };
    if settled {
        info!(ticks = tick, sim_time = summary.sim_time, "Simulation settled.");
    } else {
        warn!(ticks = tick, sim_time = summary.sim_time, "Simulation stopped at time limit.");
    }
    Ok(summary)
}

/// Log every snapshot until the topic closes. Returns how many were received.
pub async fn telemetry_task(mut rx: broadcast::Receiver<Arc<Snapshot>>) -> anyhow::Result<u64> {
    info!("Telemetry task started.");
    let mut received = 0;
    loop {
        match rx.recv().await {
            Ok(snapshot) => {
                received += 1;
                let s = &snapshot.state;
                info!(
                    tick = snapshot.tick,
                    t = snapshot.sim_time,
                    mode = snapshot.mode,
                    x = s.x,
                    y = s.y,
                    theta = s.theta,
                    left_v = s.left_voltage,
                    right_v = s.right_voltage,
                    "Robot state"
                );
                debug!(
                    goal = ?snapshot.target,
                    waypoint = ?snapshot.waypoint,
                    trail = snapshot.trail_len,
                    reached = snapshot.target_reached,
                    "Navigation state"
                );
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!("Telemetry receiver lagged by {} snapshots.", n);
            }
            Err(broadcast::error::RecvError::Closed) => {
                info!(received, "Snapshot channel closed, telemetry finished.");
                return Ok(received);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RobotParams;
    use diffsim_navigation::ControllerGains;

    fn sim() -> Simulation {
        Simulation::new(&RobotParams::default(), ControllerGains::default()).unwrap()
    }

    fn fast_runner() -> RunnerConfig {
        RunnerConfig {
            tick_hz: 50.0,
            max_duration_secs: 120.0,
            realtime: false,
            telemetry_every: 25,
            max_waypoints: 10,
        }
    }

    #[tokio::test]
    async fn test_path_run_settles_and_reports() {
        let mut sim = sim();
        sim.set_path(vec![Pose::new(1.0, 0.0, 0.0), Pose::new(2.0, 0.0, 0.0)]);

        let topic: Topic<Snapshot> = Topic::new(16);
        let rx = topic.subscribe();
        let (summary, received) =
            tokio::try_join!(sim_task(sim, fast_runner(), topic), telemetry_task(rx)).unwrap();

        assert!(summary.settled);
        assert!(summary.ticks > 0);
        assert!((summary.final_state.x - 2.0).abs() < 0.1);
        assert_eq!(summary.final_state.left_voltage, 0.0);
        assert!(received >= 1);
    }

    #[tokio::test]
    async fn test_time_limit_stops_unfinished_run() {
        let mut sim = sim();
        sim.set_target_position(50.0, 0.0, Some(0.0));
        let cfg = RunnerConfig { max_duration_secs: 1.0, ..fast_runner() };

        let topic: Topic<Snapshot> = Topic::new(16);
        let summary = sim_task(sim, cfg, topic).await.unwrap();
        assert!(!summary.settled);
        assert!(summary.sim_time >= 1.0 - 1e-9);
        assert!(summary.final_state.x > 0.0);
    }

    #[tokio::test]
    async fn test_manual_run_settles_after_decay() {
        let mut sim = sim();
        sim.manual_drive(ManualDrive::Set(diffsim_motor::DriveVoltages::new(6.0, 6.0)));
        let topic: Topic<Snapshot> = Topic::new(16);
        let summary = sim_task(sim, fast_runner(), topic).await.unwrap();
        assert!(summary.settled);
        assert_eq!(summary.final_state.left_voltage, 0.0);
        assert!(summary.final_state.x > 0.0);
    }

    #[tokio::test]
    async fn test_rejects_unusable_tick_rates() {
        for tick_hz in [0.0, -10.0, f64::NAN, f64::INFINITY, 1e12, 1e-300] {
            for realtime in [false, true] {
                let cfg = RunnerConfig { tick_hz, realtime, ..fast_runner() };
                let topic: Topic<Snapshot> = Topic::new(1);
                assert!(sim_task(sim(), cfg, topic).await.is_err(), "tick_hz {tick_hz} accepted");
            }
        }
    }

    #[tokio::test]
    async fn test_realtime_run_uses_wall_clock() {
        let mut sim = sim();
        sim.set_target_position(50.0, 0.0, Some(0.0));
        let cfg = RunnerConfig {
            tick_hz: 100.0,
            max_duration_secs: 0.2,
            realtime: true,
            ..fast_runner()
        };

        let started = std::time::Instant::now();
        let topic: Topic<Snapshot> = Topic::new(16);
        let summary = sim_task(sim, cfg, topic).await.unwrap();

        assert!(!summary.settled);
        assert!(summary.ticks > 0);
        assert!(summary.sim_time >= 0.2);
        assert!(summary.final_state.x > 0.0);
        // Simulated time is measured wall time, so the run cannot finish early.
        assert!(started.elapsed().as_secs_f64() >= summary.sim_time - 1e-3);
    }

    #[test]
    fn test_snapshot_capture() {
        let mut sim = sim();
        sim.set_path(vec![Pose::new(1.0, 0.0, 0.0), Pose::new(2.0, 0.0, 0.0)]);
        sim.update(0.02);
        let snapshot = Snapshot::capture(&sim, 1);
        assert_eq!(snapshot.mode, "AUTO_PATH");
        assert_eq!(snapshot.waypoint, Some((0, 2)));
        assert_eq!(snapshot.target, Some(Pose::new(1.0, 0.0, 0.0)));
        assert_eq!(snapshot.trail_len, 1);
        assert!(!snapshot.target_reached);
    }
}
