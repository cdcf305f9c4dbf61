//! The simulation aggregate: one robot, its controller and its trail.
//!
//! Each [`Simulation::update`] runs the active controller, saturates the
//! resulting voltages through the motor model and integrates the pose. Target
//! and path requests may arrive between ticks and replace whatever was being
//! pursued.

use diffsim_kinematics::Pose;
use diffsim_motor::{DriveVoltages, MotorModel};
use diffsim_navigation::{
    ControlMode, ControlOutput, ControllerGains, PathSequencer, PathStatus, PoseController,
};
use tracing::{debug, info, warn};

use crate::config::RobotParams;
use crate::error::SimError;
use crate::integrator::KinematicsIntegrator;
use crate::state::{RobotState, Trail};

/// Per-tick multiplier applied to manual voltages while no input is held.
pub const MANUAL_DECAY: f64 = 0.95;
/// Manual voltages below this magnitude snap to zero while decaying.
pub const MANUAL_SNAP_THRESHOLD: f64 = 0.1;

/// Manual voltage input, honored only in [`ControlMode::Manual`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ManualDrive {
    /// Add to the current voltages.
    Adjust(DriveVoltages),
    /// Replace the current voltages.
    Set(DriveVoltages),
    /// No input this tick; voltages decay toward zero.
    Idle,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    state: RobotState,
    trail: Trail,
    mode: ControlMode,
    motor: MotorModel,
    integrator: KinematicsIntegrator,
    controller: PoseController,
    last_control: Option<ControlOutput>,
    target_reached: bool,
    elapsed: f64,
}

impl Simulation {
    pub fn new(params: &RobotParams, gains: ControllerGains) -> Result<Self, SimError> {
        let motor = MotorModel::new(params.motor_constant, params.max_wheel_velocity, params.max_voltage)?;
        let integrator = KinematicsIntegrator::new(params.wheel_radius, params.wheel_distance)?;
        let controller = PoseController::new(gains)?;
        info!(
            motor = %motor,
            drive = %integrator.drive(),
            trail = params.max_trail_length,
            "Simulation created"
        );

        Ok(Simulation {
            state: RobotState::default(),
            trail: Trail::new(params.max_trail_length),
            mode: ControlMode::Manual,
            motor,
            integrator,
            controller,
            last_control: None,
            target_reached: false,
            elapsed: 0.0,
        })
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// A negative or non-finite `dt` still runs the controller but leaves the
    /// pose, trail and clock untouched.
    pub fn update(&mut self, dt: f64) {
        self.apply_control();

        let voltages = self.motor.limit(self.state.voltages());
        self.state.set_voltages(voltages);
        let wheels = self.motor.wheel_speeds(voltages);

        match self.integrator.integrate(&mut self.state, &mut self.trail, wheels, dt) {
            Ok(()) => self.elapsed += dt,
            Err(e) => warn!(dt, "Skipping pose integration: {}", e),
        }
    }

    fn apply_control(&mut self) {
        let pose = self.state.pose();
        let mut path_complete = false;

        match &mut self.mode {
            ControlMode::Manual => {
                self.last_control = None;
                return;
            }
            ControlMode::AutoPosition(target) => {
                let control = self.controller.pursue(&pose, target);
                if control.reached && !self.target_reached {
                    info!(goal = %target, pose = %pose, "Target reached");
                }
                debug!(phase = %control.phase, voltages = %control.voltages, "Pursuing target");
                self.target_reached = control.reached;
                self.state.set_voltages(control.voltages);
                self.last_control = Some(control);
            }
            ControlMode::AutoPath(path) => {
                let step = path.advance(&self.controller, &pose);
                self.state.set_voltages(step.voltages);
                self.last_control = step.control;
                path_complete = step.status == PathStatus::Complete;
            }
        }

        if path_complete {
            info!(pose = %pose, "Path complete, reverting to manual control");
            self.mode = ControlMode::Manual;
            self.state.set_voltages(DriveVoltages::ZERO);
        }
    }

    /// Pursue a single pose. Without `theta` the target heading is the
    /// bearing from the current position to `(x, y)`.
    pub fn set_target_position(&mut self, x: f64, y: f64, theta: Option<f64>) {
        let theta = theta.unwrap_or_else(|| self.state.pose().bearing_to(&Pose::new(x, y, 0.0)));
        let target = Pose::new(x, y, theta);
        info!(goal = %target, "Target position set");
        self.mode = ControlMode::AutoPosition(target);
        self.target_reached = false;
    }

    /// Follow `waypoints` in order, starting from the first.
    pub fn set_path(&mut self, waypoints: Vec<Pose>) {
        info!(waypoints = waypoints.len(), "Path set");
        self.mode = ControlMode::AutoPath(PathSequencer::new(waypoints));
        self.target_reached = false;
    }

    /// Back to the origin, at rest, in manual mode, with an empty trail.
    pub fn reset(&mut self) {
        info!("Simulation reset");
        self.state = RobotState::default();
        self.trail.clear();
        self.mode = ControlMode::Manual;
        self.last_control = None;
        self.target_reached = false;
    }

    /// Apply manual input. Returns `false` and changes nothing outside manual mode.
    pub fn manual_drive(&mut self, input: ManualDrive) -> bool {
        if !self.mode.is_manual() {
            debug!(mode = self.mode.label(), "Ignoring manual input");
            return false;
        }

        let max_voltage = self.motor.max_voltage();
        let current = self.state.voltages();
        let next = match input {
            ManualDrive::Adjust(delta) => (current + delta).clamp(max_voltage),
            ManualDrive::Set(voltages) => voltages.clamp(max_voltage),
            ManualDrive::Idle => current
                .clamp(max_voltage)
                .decay(MANUAL_DECAY, MANUAL_SNAP_THRESHOLD),
        };
        self.state.set_voltages(next);
        true
    }

    pub fn read_state(&self) -> RobotState {
        self.state
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn mode(&self) -> &ControlMode {
        &self.mode
    }

    /// Controller output of the last tick, `None` in manual mode.
    pub fn last_control(&self) -> Option<&ControlOutput> {
        self.last_control.as_ref()
    }

    /// Whether the single-target pursuit has arrived. Stays in
    /// [`ControlMode::AutoPosition`] either way.
    pub fn target_reached(&self) -> bool {
        self.target_reached
    }

    /// Simulated seconds integrated so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Nothing left to do: the target is held, or manual mode with the motors off.
    pub fn is_settled(&self) -> bool {
        match &self.mode {
            ControlMode::Manual => self.state.voltages().is_zero(),
            ControlMode::AutoPosition(_) => self.target_reached,
            ControlMode::AutoPath(_) => false,
        }
    }
}
