//! Phase-based pose pursuit.
//!
//! Far from the target the controller either pivots toward it or drives
//! forward with a small differential correction. Inside the position
//! tolerance it only aligns the heading with the target's orientation.

use core::fmt;

use diffsim_kinematics::Pose;
use diffsim_motor::DriveVoltages;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::NavigationError;

/// Tunables of [`PoseController`]. Distances in meters, angles in radians,
/// voltages in volts.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerGains {
    /// Radius around the target inside which only orientation is corrected.
    pub position_tolerance: f64,
    /// Orientation error below which the target counts as reached.
    pub angle_tolerance: f64,
    /// Pivot voltage while still far from the target.
    pub rotate_voltage_far: f64,
    /// Pivot voltage for final alignment.
    pub rotate_voltage_near: f64,
    /// Voltage on both motors when driving forward.
    pub drive_base_voltage: f64,
    /// Heading error above which the robot pivots instead of driving.
    pub heading_gate: f64,
    /// Volts of differential correction per radian of heading error.
    pub steering_gain: f64,
    /// Distance below which forward drive decelerates.
    pub ramp_radius: f64,
    /// Lowest drive scaling applied while decelerating.
    pub ramp_floor: f64,
    /// Angle error at which pivot voltage reaches its full value.
    pub rotation_ramp_span: f64,
}

impl Default for ControllerGains {
    fn default() -> Self {
        ControllerGains {
            position_tolerance: 0.1,
            angle_tolerance: 0.05,
            rotate_voltage_far: 3.0,
            rotate_voltage_near: 2.0,
            drive_base_voltage: 10.0,
            heading_gate: 0.1,
            steering_gain: 2.0,
            ramp_radius: 1.0,
            ramp_floor: 0.3,
            rotation_ramp_span: 0.5,
        }
    }
}

impl ControllerGains {
    /// Check that every gain is usable.
    ///
    /// # Errors
    ///
    /// Returns the first offending parameter as a [`NavigationError`].
    pub fn validate(&self) -> Result<(), NavigationError> {
        if !positive(self.position_tolerance) {
            return Err(NavigationError::InvalidTolerance("position tolerance must be positive"));
        }
        if !positive(self.angle_tolerance) {
            return Err(NavigationError::InvalidTolerance("angle tolerance must be positive"));
        }
        if !positive(self.rotate_voltage_far) || !positive(self.rotate_voltage_near) {
            return Err(NavigationError::InvalidGain("rotate voltages must be positive"));
        }
        if !positive(self.drive_base_voltage) {
            return Err(NavigationError::InvalidGain("drive base voltage must be positive"));
        }
        if !positive(self.heading_gate) {
            return Err(NavigationError::InvalidGain("heading gate must be positive"));
        }
        if !self.steering_gain.is_finite() || self.steering_gain < 0.0 {
            return Err(NavigationError::InvalidGain("steering gain must be non-negative"));
        }
        if !positive(self.ramp_radius) || !positive(self.rotation_ramp_span) {
            return Err(NavigationError::InvalidRampSpan("ramp spans must be positive"));
        }
        if !positive(self.ramp_floor) || self.ramp_floor > 1.0 {
            return Err(NavigationError::InvalidRampSpan("ramp floor must be in (0, 1]"));
        }
        Ok(())
    }
}

/// Finite and strictly greater than zero. NaN fails.
fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Which branch of the controller produced a command.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Far from the target, pivoting in place toward it.
    Rotate,
    /// Far from the target, driving forward.
    Drive,
    /// Inside the position tolerance, pivoting to the target orientation.
    Align,
    /// Position and orientation both within tolerance.
    Arrived,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Rotate => "rotate",
            Phase::Drive => "drive",
            Phase::Align => "align",
            Phase::Arrived => "arrived",
        };
        f.write_str(name)
    }
}

/// One tick of controller output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlOutput {
    /// Voltage command for this tick.
    pub voltages: DriveVoltages,
    /// True once the target pose is reached; voltages are then zero.
    pub reached: bool,
    /// Branch that produced the command.
    pub phase: Phase,
}

/// Drives the robot toward a single target pose.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoseController {
    gains: ControllerGains,
}

impl PoseController {
    /// Build a controller from validated gains.
    ///
    /// # Errors
    ///
    /// Propagates [`ControllerGains::validate`].
    pub fn new(gains: ControllerGains) -> Result<Self, NavigationError> {
        gains.validate()?;
        Ok(PoseController { gains })
    }

    /// Returns the gains in use.
    pub fn gains(&self) -> &ControllerGains {
        &self.gains
    }

    /// Compute the voltage command that moves `pose` toward `target`.
    ///
    /// A target coincident with the current position falls inside the
    /// position tolerance, so the bearing is never taken for a zero vector.
    pub fn pursue(&self, pose: &Pose, target: &Pose) -> ControlOutput {
        let g = &self.gains;
        let distance = pose.distance_to(target);

        if distance < g.position_tolerance {
            let angle_diff = Pose::wrap_angle(target.theta - pose.theta);
            if angle_diff.abs() < g.angle_tolerance {
                return ControlOutput {
                    voltages: DriveVoltages::ZERO,
                    reached: true,
                    phase: Phase::Arrived,
                };
            }
            return ControlOutput {
                voltages: ramped_turn(angle_diff, g.rotate_voltage_near, g.rotation_ramp_span),
                reached: false,
                phase: Phase::Align,
            };
        }

        let heading_error = Pose::wrap_angle(pose.bearing_to(target) - pose.theta);
        if heading_error.abs() > g.heading_gate {
            return ControlOutput {
                voltages: ramped_turn(heading_error, g.rotate_voltage_far, g.rotation_ramp_span),
                reached: false,
                phase: Phase::Rotate,
            };
        }

        let steering = heading_error * g.steering_gain;
        let mut voltages = DriveVoltages::new(
            g.drive_base_voltage - steering,
            g.drive_base_voltage + steering,
        );
        if distance < g.ramp_radius {
            voltages = voltages.scale(g.ramp_floor.max(distance));
        }

        ControlOutput {
            voltages,
            reached: false,
            phase: Phase::Drive,
        }
    }
}

/// Pivot-in-place command for an angular error.
///
/// A positive error turns counter-clockwise (left motor reversed); any other
/// error, zero included, turns clockwise. The magnitude ramps linearly from
/// zero up to `base_voltage` as `|error|` grows to `ramp_span`.
pub fn ramped_turn(error: f64, base_voltage: f64, ramp_span: f64) -> DriveVoltages {
    let factor = (error.abs() / ramp_span).min(1.0);
    let turn = if error > 0.0 {
        DriveVoltages::new(-base_voltage, base_voltage)
    } else {
        DriveVoltages::new(base_voltage, -base_voltage)
    };
    turn.scale(factor)
}
