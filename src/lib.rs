//! Differential-drive robot simulator.
//!
//! [`Simulation`] owns one robot: its state and trail, the motor model, the
//! kinematic integrator and the navigation controller. Callers feed it a
//! time step per frame and target or path requests in between, and read the
//! state back for display.

pub mod bus;
pub mod config;
pub mod error;
pub mod integrator;
pub mod runner;
pub mod scenario;
pub mod simulation;
pub mod state;

pub use config::{RobotParams, RunnerConfig, SimConfig};
pub use error::SimError;
pub use integrator::KinematicsIntegrator;
pub use scenario::{ScenarioConfig, WaypointConfig};
pub use simulation::{ManualDrive, Simulation};
pub use state::{RobotState, Trail};

pub use diffsim_kinematics::Pose;
pub use diffsim_motor::DriveVoltages;
pub use diffsim_navigation::{ControlMode, ControllerGains};
