#![warn(missing_docs)]

//! Error types for the motor model.

use core::fmt;

/// Errors returned when a motor model is built from non-physical parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// The voltage-to-speed gain is not a finite positive number.
    InvalidMotorConstant(&'static str),
    /// The wheel speed saturation limit is not a finite positive number.
    InvalidMaxWheelVelocity(&'static str),
    /// The supply voltage limit is not a finite positive number.
    InvalidMaxVoltage(&'static str),
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::InvalidMotorConstant(msg) => write!(f, "Invalid motor constant: {}", msg),
            MotorError::InvalidMaxWheelVelocity(msg) => {
                write!(f, "Invalid max wheel velocity: {}", msg)
            }
            MotorError::InvalidMaxVoltage(msg) => write!(f, "Invalid max voltage: {}", msg),
        }
    }
}

impl core::error::Error for MotorError {}
