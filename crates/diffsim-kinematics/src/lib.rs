#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for 2D differential-drive robot kinematics."]
#![doc = ""]
#![doc = "This crate provides the pose type used across the simulator, heading"]
#![doc = "normalization helpers, and forward kinematics for a two-wheeled drive."]

use core::f64::consts::{PI, TAU};
use core::fmt;
use libm::{atan2, cos, fmod, hypot, sin};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::KinematicsError;

/// A 2‑D pose `(x, y, θ)` in meters and radians (θ measured counter‑clockwise
/// from the x‑axis in the world frame).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// World‑frame x position (m).
    pub x: f64,
    /// World‑frame y position (m).
    pub y: f64,
    /// Heading (rad). Poses produced by [`DifferentialDrive::update_pose`]
    /// are normalized to `[0, 2π)`; target poses may carry any angle.
    pub theta: f64,
}

impl Pose {
    /// Construct a new pose.
    ///
    /// # Arguments
    ///
    /// * `x`: World-frame x position in meters.
    /// * `y`: World-frame y position in meters.
    /// * `theta`: Heading in radians.
    pub const fn new(x: f64, y: f64, theta: f64) -> Self {
        Pose { x, y, theta }
    }

    /// Normalize a heading to be within `[0, 2π)`.
    ///
    /// Negative inputs wrap around to a non-negative heading. A remainder that
    /// rounds up to exactly `2π` is reported as `0`.
    ///
    /// # Arguments
    ///
    /// * `angle`: The angle in radians to normalize.
    ///
    /// # Returns
    ///
    /// The normalized heading in radians.
    pub fn normalize_heading(angle: f64) -> f64 {
        let a = fmod(angle, TAU);
        let a = if a < 0.0 { a + TAU } else { a };
        if a >= TAU { 0.0 } else { a }
    }

    /// Wrap an angular difference into `(-π, π]`.
    ///
    /// The angle is first brought into `[0, 2π)` and then shifted down by a
    /// full turn when it exceeds `π`, so differences taken across the `0/2π`
    /// seam come out small instead of close to a full turn.
    ///
    /// # Arguments
    ///
    /// * `angle`: The angle in radians to wrap.
    pub fn wrap_angle(angle: f64) -> f64 {
        let a = Self::normalize_heading(angle);
        if a > PI { a - TAU } else { a }
    }

    /// Euclidean distance between the positions of two poses (m).
    pub fn distance_to(&self, other: &Pose) -> f64 {
        hypot(other.x - self.x, other.y - self.y)
    }

    /// World-frame bearing from this pose's position to `other`'s (rad, `atan2` range).
    pub fn bearing_to(&self, other: &Pose) -> f64 {
        atan2(other.y - self.y, other.x - self.x)
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.2}, y: {:.2}, θ: {:.2} rad)", self.x, self.y, self.theta)
    }
}

/// Left and right wheel angular velocities.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelSpeeds {
    /// Left wheel angular velocity (rad/s).
    pub omega_l: f64,
    /// Right wheel angular velocity (rad/s).
    pub omega_r: f64,
}

impl WheelSpeeds {
    /// Construct wheel speeds.
    ///
    /// # Arguments
    ///
    /// * `omega_l`: Left wheel angular velocity (rad/s).
    /// * `omega_r`: Right wheel angular velocity (rad/s).
    pub const fn new(omega_l: f64, omega_r: f64) -> Self {
        WheelSpeeds { omega_l, omega_r }
    }
}

impl fmt::Display for WheelSpeeds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(ωL: {:.2} rad/s, ωR: {:.2} rad/s)", self.omega_l, self.omega_r)
    }
}

/// Linear and angular chassis velocities.
/// These represent the overall motion of the robot's chassis.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChassisSpeeds {
    /// Linear speed of the chassis center (m/s).
    pub v: f64,
    /// Angular speed of the chassis (rad/s).
    pub omega: f64,
}

impl ChassisSpeeds {
    /// Construct chassis speeds.
    ///
    /// # Arguments
    ///
    /// * `v`: Linear speed of the chassis center (m/s).
    /// * `omega`: Angular speed of the chassis (rad/s).
    pub const fn new(v: f64, omega: f64) -> Self {
        ChassisSpeeds { v, omega }
    }
}

impl fmt::Display for ChassisSpeeds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(v: {:.2} m/s, ω: {:.2} rad/s)", self.v, self.omega)
    }
}

/// Differential‑drive kinematics helper.
///
/// Holds the physical parameters of a differential-drive robot (wheel radius
/// and axle length) and integrates pose from wheel or chassis speeds.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentialDrive {
    /// Wheel radius (m).
    wheel_radius: f64,
    /// Axle length (m), the distance between the two drive wheels.
    axle_length: f64,
}

impl DifferentialDrive {
    /// Construct a drive from its wheel radius and wheel separation, both in meters.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::InvalidWheelRadius`] or
    /// [`KinematicsError::InvalidAxleLength`] carrying the rejected value when
    /// either is not a finite positive number.
    pub const fn new(wheel_radius: f64, axle_length: f64) -> Result<Self, KinematicsError> {
        if !is_finite_positive(wheel_radius) {
            return Err(KinematicsError::InvalidWheelRadius(wheel_radius));
        }
        if !is_finite_positive(axle_length) {
            return Err(KinematicsError::InvalidAxleLength(axle_length));
        }
        Ok(DifferentialDrive {
            wheel_radius,
            axle_length,
        })
    }

    /// Returns the wheel radius.
    pub fn wheel_radius(&self) -> f64 {
        self.wheel_radius
    }

    /// Returns the axle length.
    pub fn axle_length(&self) -> f64 {
        self.axle_length
    }

    /// Chassis speeds produced by the given wheel angular velocities.
    pub fn forward_kinematics(&self, wheel_speeds: WheelSpeeds) -> ChassisSpeeds {
        let v_l = wheel_speeds.omega_l * self.wheel_radius;
        let v_r = wheel_speeds.omega_r * self.wheel_radius;

        ChassisSpeeds::new((v_r + v_l) / 2.0, (v_r - v_l) / self.axle_length)
    }

    /// Step `current_pose` forward by `dt` seconds at constant chassis speeds.
    ///
    /// Forward Euler using the heading at the start of the interval. The
    /// resulting heading is normalized to `[0, 2π)`. A zero `dt` returns the
    /// pose unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::InvalidTimeStep`] if `dt` is negative or not finite.
    pub fn update_pose(
        &self,
        current_pose: Pose,
        chassis_speeds: ChassisSpeeds,
        dt: f64,
    ) -> Result<Pose, KinematicsError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(KinematicsError::InvalidTimeStep(dt));
        }

        let travel = chassis_speeds.v * dt;
        Ok(Pose {
            x: current_pose.x + travel * cos(current_pose.theta),
            y: current_pose.y + travel * sin(current_pose.theta),
            theta: Pose::normalize_heading(current_pose.theta + chassis_speeds.omega * dt),
        })
    }
}

const fn is_finite_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl fmt::Display for DifferentialDrive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DifferentialDrive (r: {:.2} m, L: {:.2} m)", self.wheel_radius, self.axle_length)
    }
}
