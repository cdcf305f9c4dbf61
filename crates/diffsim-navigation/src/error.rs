//! This module defines the error types used by the `diffsim-navigation` crate.

#![warn(missing_docs)]

/// Error type for navigation operations.
///
/// Controller gains are validated once, when a [`crate::PoseController`] is
/// built. Pursuit itself never fails.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationError {
    /// A position or angle tolerance is not positive.
    InvalidTolerance(&'static str),
    /// A voltage, gate or steering gain is out of range.
    InvalidGain(&'static str),
    /// A deceleration ramp parameter is out of range.
    InvalidRampSpan(&'static str),
}

impl core::fmt::Display for NavigationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NavigationError::InvalidTolerance(msg) => write!(f, "Invalid tolerance: {}", msg),
            NavigationError::InvalidGain(msg) => write!(f, "Invalid controller gain: {}", msg),
            NavigationError::InvalidRampSpan(msg) => write!(f, "Invalid ramp parameter: {}", msg),
        }
    }
}

impl core::error::Error for NavigationError {}
