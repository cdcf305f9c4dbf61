//! Requests applied to a fresh simulation before the run starts.
//!
//! Headings are entered in degrees, the way an operator types them, and
//! converted to radians here. Path length is checked before anything reaches
//! the simulation.

use serde::Deserialize;
use tracing::{info, warn};

use diffsim_kinematics::Pose;
use diffsim_motor::DriveVoltages;

use crate::error::SimError;
use crate::simulation::{ManualDrive, Simulation};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WaypointConfig {
    pub x: f64,
    pub y: f64,
    pub theta_deg: f64,
}

impl WaypointConfig {
    pub fn to_pose(&self) -> Pose {
        Pose::new(self.x, self.y, self.theta_deg.to_radians())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioConfig {
    /// Start in manual mode with the given voltages and let them decay.
    Manual {
        #[serde(default)]
        left_voltage: f64,
        #[serde(default)]
        right_voltage: f64,
    },
    /// Drive to one pose. Without a heading the robot keeps the bearing it arrives on.
    Target {
        x: f64,
        y: f64,
        #[serde(default)]
        theta_deg: Option<f64>,
    },
    /// Visit waypoints in order.
    Path { waypoints: Vec<WaypointConfig> },
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        ScenarioConfig::Manual {
            left_voltage: 0.0,
            right_voltage: 0.0,
        }
    }
}

impl ScenarioConfig {
    pub fn apply(&self, sim: &mut Simulation, max_waypoints: usize) -> Result<(), SimError> {
        match self {
            ScenarioConfig::Manual {
                left_voltage,
                right_voltage,
            } => {
                info!(left_voltage, right_voltage, "Scenario: manual drive");
                let voltages = DriveVoltages::new(*left_voltage, *right_voltage);
                if !sim.manual_drive(ManualDrive::Set(voltages)) {
                    warn!(mode = sim.mode().label(), "Manual scenario voltages ignored");
                    return Err(SimError::NotManual { mode: sim.mode().label() });
                }
            }
            ScenarioConfig::Target { x, y, theta_deg } => {
                info!(x, y, ?theta_deg, "Scenario: single target");
                sim.set_target_position(*x, *y, theta_deg.map(f64::to_radians));
            }
            ScenarioConfig::Path { waypoints } => {
                if waypoints.is_empty() || waypoints.len() > max_waypoints {
                    return Err(SimError::PathLength {
                        len: waypoints.len(),
                        max: max_waypoints,
                    });
                }
                info!(waypoints = waypoints.len(), "Scenario: waypoint path");
                sim.set_path(waypoints.iter().map(WaypointConfig::to_pose).collect());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RobotParams;
    use diffsim_navigation::{ControlMode, ControllerGains};
    use std::f64::consts::FRAC_PI_2;

    fn sim() -> Simulation {
        Simulation::new(&RobotParams::default(), ControllerGains::default()).unwrap()
    }

    #[test]
    fn test_path_length_bound() {
        let mut sim = sim();
        let empty = ScenarioConfig::Path { waypoints: Vec::new() };
        assert_eq!(empty.apply(&mut sim, 10), Err(SimError::PathLength { len: 0, max: 10 }));

        let waypoint = WaypointConfig { x: 1.0, y: 1.0, theta_deg: 0.0 };
        let long = ScenarioConfig::Path { waypoints: vec![waypoint; 11] };
        assert_eq!(long.apply(&mut sim, 10), Err(SimError::PathLength { len: 11, max: 10 }));
        assert!(sim.mode().is_manual());

        let ok = ScenarioConfig::Path { waypoints: vec![waypoint; 10] };
        assert!(ok.apply(&mut sim, 10).is_ok());
        assert_eq!(sim.mode().label(), "AUTO_PATH");
    }

    #[test]
    fn test_degrees_converted_to_radians() {
        let mut sim = sim();
        let target = ScenarioConfig::Target { x: 2.0, y: 0.0, theta_deg: Some(90.0) };
        target.apply(&mut sim, 10).unwrap();
        match sim.mode() {
            ControlMode::AutoPosition(pose) => assert!((pose.theta - FRAC_PI_2).abs() < 1e-12),
            other => panic!("unexpected mode {other}"),
        }
    }

    #[test]
    fn test_manual_scenario_sets_voltages() {
        let mut sim = sim();
        let manual = ScenarioConfig::Manual { left_voltage: 4.0, right_voltage: 20.0 };
        manual.apply(&mut sim, 10).unwrap();
        let state = sim.read_state();
        assert_eq!(state.left_voltage, 4.0);
        assert_eq!(state.right_voltage, 12.0);
    }

    #[test]
    fn test_manual_scenario_outside_manual_mode_is_an_error() {
        let mut sim = sim();
        sim.set_target_position(2.0, 0.0, Some(0.0));
        let manual = ScenarioConfig::Manual { left_voltage: 4.0, right_voltage: 4.0 };
        assert_eq!(manual.apply(&mut sim, 10), Err(SimError::NotManual { mode: "AUTO_POSITION" }));
        assert_eq!(sim.read_state().voltages(), DriveVoltages::ZERO);
        assert_eq!(sim.mode().label(), "AUTO_POSITION");
    }
}
