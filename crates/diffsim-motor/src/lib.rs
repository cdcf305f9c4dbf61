#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` model of the two drive motors of a differential-drive robot."]
#![doc = ""]
#![doc = "Commanded voltages map linearly onto wheel angular velocity and are"]
#![doc = "saturated at the wheel speed limit. No inertia, no back-EMF."]

use core::fmt;
use diffsim_kinematics::WheelSpeeds;
use libm::fabs;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::MotorError;

/// Wheel speed per volt applied (rad/s/V).
pub const DEFAULT_MOTOR_CONSTANT: f64 = 0.6;
/// Saturation limit of each wheel (rad/s).
pub const DEFAULT_MAX_WHEEL_VELOCITY: f64 = 6.0;
/// Supply limit for a single motor (V).
pub const DEFAULT_MAX_VOLTAGE: f64 = 12.0;

/// A pair of commanded motor voltages.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DriveVoltages {
    /// Left motor voltage (V).
    pub left: f64,
    /// Right motor voltage (V).
    pub right: f64,
}

impl DriveVoltages {
    /// Both motors off.
    pub const ZERO: DriveVoltages = DriveVoltages::new(0.0, 0.0);

    /// Construct a voltage pair.
    pub const fn new(left: f64, right: f64) -> Self {
        DriveVoltages { left, right }
    }

    /// Scale both sides by the same factor.
    pub fn scale(self, factor: f64) -> Self {
        DriveVoltages::new(self.left * factor, self.right * factor)
    }

    /// Clamp each side to `[-max_voltage, max_voltage]`.
    pub fn clamp(self, max_voltage: f64) -> Self {
        DriveVoltages::new(
            self.left.clamp(-max_voltage, max_voltage),
            self.right.clamp(-max_voltage, max_voltage),
        )
    }

    /// Multiply each side by `factor`, then snap any side whose magnitude
    /// falls below `snap_threshold` to exactly zero.
    pub fn decay(self, factor: f64, snap_threshold: f64) -> Self {
        let snap = |v: f64| if fabs(v) < snap_threshold { 0.0 } else { v };
        DriveVoltages::new(snap(self.left * factor), snap(self.right * factor))
    }

    /// True when both motors are commanded exactly zero volts.
    pub fn is_zero(&self) -> bool {
        self.left == 0.0 && self.right == 0.0
    }
}

impl core::ops::Add for DriveVoltages {
    type Output = DriveVoltages;

    fn add(self, rhs: DriveVoltages) -> DriveVoltages {
        DriveVoltages::new(self.left + rhs.left, self.right + rhs.right)
    }
}

impl fmt::Display for DriveVoltages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(L: {:.2} V, R: {:.2} V)", self.left, self.right)
    }
}

/// Linear voltage-driven motor pair.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorModel {
    motor_constant: f64,
    max_wheel_velocity: f64,
    max_voltage: f64,
}

impl MotorModel {
    /// Construct a motor model.
    ///
    /// # Arguments
    ///
    /// * `motor_constant`: Wheel speed per volt (rad/s/V).
    /// * `max_wheel_velocity`: Wheel speed saturation (rad/s).
    /// * `max_voltage`: Largest voltage magnitude a motor accepts (V).
    ///
    /// # Errors
    ///
    /// Returns the matching [`MotorError`] variant when any argument is not a
    /// finite positive number.
    pub const fn new(
        motor_constant: f64,
        max_wheel_velocity: f64,
        max_voltage: f64,
    ) -> Result<Self, MotorError> {
        if !is_finite_positive(motor_constant) {
            return Err(MotorError::InvalidMotorConstant("must be finite and positive"));
        }
        if !is_finite_positive(max_wheel_velocity) {
            return Err(MotorError::InvalidMaxWheelVelocity("must be finite and positive"));
        }
        if !is_finite_positive(max_voltage) {
            return Err(MotorError::InvalidMaxVoltage("must be finite and positive"));
        }
        Ok(MotorModel {
            motor_constant,
            max_wheel_velocity,
            max_voltage,
        })
    }

    /// Returns the motor constant (rad/s/V).
    pub fn motor_constant(&self) -> f64 {
        self.motor_constant
    }

    /// Returns the wheel speed limit (rad/s).
    pub fn max_wheel_velocity(&self) -> f64 {
        self.max_wheel_velocity
    }

    /// Returns the voltage limit (V).
    pub fn max_voltage(&self) -> f64 {
        self.max_voltage
    }

    /// Saturated angular velocity of one wheel for the given voltage.
    pub fn wheel_speed(&self, voltage: f64) -> f64 {
        (self.motor_constant * voltage).clamp(-self.max_wheel_velocity, self.max_wheel_velocity)
    }

    /// Wheel angular velocities produced by a voltage command.
    pub fn wheel_speeds(&self, voltages: DriveVoltages) -> WheelSpeeds {
        WheelSpeeds::new(self.wheel_speed(voltages.left), self.wheel_speed(voltages.right))
    }

    /// Clamp a voltage command to what the motors accept.
    pub fn limit(&self, voltages: DriveVoltages) -> DriveVoltages {
        voltages.clamp(self.max_voltage)
    }
}

const fn is_finite_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl Default for MotorModel {
    fn default() -> Self {
        MotorModel {
            motor_constant: DEFAULT_MOTOR_CONSTANT,
            max_wheel_velocity: DEFAULT_MAX_WHEEL_VELOCITY,
            max_voltage: DEFAULT_MAX_VOLTAGE,
        }
    }
}

impl fmt::Display for MotorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MotorModel (k: {:.2} rad/s/V, ω_max: {:.2} rad/s, V_max: {:.1} V)",
            self.motor_constant, self.max_wheel_velocity, self.max_voltage
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_linear_region() {
        let motor = MotorModel::default();
        let speeds = motor.wheel_speeds(DriveVoltages::new(5.0, -3.0));
        assert!((speeds.omega_l - 3.0).abs() < EPSILON);
        assert!((speeds.omega_r - (-1.8)).abs() < EPSILON);
    }

    #[test]
    fn test_saturation() {
        let motor = MotorModel::default();
        // 12 V * 0.6 = 7.2 rad/s, saturates at 6
        let speeds = motor.wheel_speeds(DriveVoltages::new(12.0, -12.0));
        assert_eq!(speeds.omega_l, 6.0);
        assert_eq!(speeds.omega_r, -6.0);
        // 10 V sits exactly at the limit
        assert!((motor.wheel_speed(10.0) - 6.0).abs() < EPSILON);
    }

    #[test]
    fn test_zero_voltage_is_zero_speed() {
        let motor = MotorModel::default();
        assert_eq!(motor.wheel_speeds(DriveVoltages::ZERO), WheelSpeeds::new(0.0, 0.0));
    }

    #[test]
    fn test_constructor_rejects_non_positive() {
        assert!(matches!(
            MotorModel::new(0.0, 6.0, 12.0),
            Err(MotorError::InvalidMotorConstant(_))
        ));
        assert!(matches!(
            MotorModel::new(0.6, -1.0, 12.0),
            Err(MotorError::InvalidMaxWheelVelocity(_))
        ));
        assert!(matches!(
            MotorModel::new(0.6, 6.0, 0.0),
            Err(MotorError::InvalidMaxVoltage(_))
        ));
        assert_eq!(MotorModel::new(0.6, 6.0, 12.0).unwrap(), MotorModel::default());
    }

    #[test]
    fn test_constructor_rejects_non_finite() {
        assert!(matches!(
            MotorModel::new(0.6, 6.0, f64::NAN),
            Err(MotorError::InvalidMaxVoltage(_))
        ));
        assert!(matches!(
            MotorModel::new(0.6, f64::NAN, 12.0),
            Err(MotorError::InvalidMaxWheelVelocity(_))
        ));
        assert!(matches!(
            MotorModel::new(f64::INFINITY, 6.0, 12.0),
            Err(MotorError::InvalidMotorConstant(_))
        ));
        assert!(matches!(
            MotorModel::new(0.6, 6.0, f64::INFINITY),
            Err(MotorError::InvalidMaxVoltage(_))
        ));
    }

    #[test]
    fn test_limit_clamps_each_side() {
        let motor = MotorModel::default();
        let limited = motor.limit(DriveVoltages::new(15.0, -20.0));
        assert_eq!(limited, DriveVoltages::new(12.0, -12.0));
        let untouched = motor.limit(DriveVoltages::new(4.0, -4.0));
        assert_eq!(untouched, DriveVoltages::new(4.0, -4.0));
    }

    #[test]
    fn test_decay_snaps_small_values() {
        let decayed = DriveVoltages::new(2.0, 0.1).decay(0.95, 0.1);
        assert!((decayed.left - 1.9).abs() < EPSILON);
        // 0.1 * 0.95 = 0.095 < 0.1
        assert_eq!(decayed.right, 0.0);
    }

    #[test]
    fn test_decay_reaches_zero() {
        let mut voltages = DriveVoltages::new(12.0, -12.0);
        let mut ticks = 0;
        while !voltages.is_zero() {
            voltages = voltages.decay(0.95, 0.1);
            ticks += 1;
            assert!(ticks < 200, "decay never settled");
        }
        assert_eq!(voltages, DriveVoltages::ZERO);
    }

    #[test]
    fn test_add_and_scale() {
        let sum = DriveVoltages::new(1.0, 2.0) + DriveVoltages::new(0.1, -0.1);
        assert!((sum.left - 1.1).abs() < EPSILON);
        assert!((sum.right - 1.9).abs() < EPSILON);
        assert_eq!(DriveVoltages::new(3.0, -3.0).scale(0.5), DriveVoltages::new(1.5, -1.5));
    }
}
