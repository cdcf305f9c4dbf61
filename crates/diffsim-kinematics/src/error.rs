#![warn(missing_docs)]

//! Errors raised when a drive is built from non-physical geometry or a pose
//! is stepped with an unusable time step. Each variant carries the rejected
//! value.

use core::fmt;

/// Rejected kinematic input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KinematicsError {
    /// Wheel radius that is zero, negative or not finite.
    InvalidWheelRadius(f64),
    /// Wheel separation that is zero, negative or not finite.
    InvalidAxleLength(f64),
    /// Time step that is negative or not finite.
    InvalidTimeStep(f64),
}

impl fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KinematicsError::InvalidWheelRadius(r) => {
                write!(f, "wheel radius must be finite and positive, got {}", r)
            }
            KinematicsError::InvalidAxleLength(l) => {
                write!(f, "axle length must be finite and positive, got {}", l)
            }
            KinematicsError::InvalidTimeStep(dt) => {
                write!(f, "time step must be finite and non-negative, got {}", dt)
            }
        }
    }
}

impl core::error::Error for KinematicsError {}
