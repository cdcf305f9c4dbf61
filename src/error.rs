use std::fmt;

use diffsim_kinematics::KinematicsError;
use diffsim_motor::MotorError;
use diffsim_navigation::NavigationError;

/// Errors raised while building a [`crate::Simulation`] or applying a scenario to it.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    Kinematics(KinematicsError),
    Motor(MotorError),
    Navigation(NavigationError),
    /// A requested path is empty or longer than the configured bound.
    PathLength { len: usize, max: usize },
    /// Manual voltages were requested while an automatic mode is active.
    NotManual { mode: &'static str },
}

impl From<KinematicsError> for SimError {
    fn from(err: KinematicsError) -> Self {
        SimError::Kinematics(err)
    }
}

impl From<MotorError> for SimError {
    fn from(err: MotorError) -> Self {
        SimError::Motor(err)
    }
}

impl From<NavigationError> for SimError {
    fn from(err: NavigationError) -> Self {
        SimError::Navigation(err)
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Kinematics(e) => write!(f, "kinematics: {}", e),
            SimError::Motor(e) => write!(f, "motor: {}", e),
            SimError::Navigation(e) => write!(f, "navigation: {}", e),
            SimError::PathLength { len, max } => {
                write!(f, "path must have between 1 and {} waypoints, got {}", max, len)
            }
            SimError::NotManual { mode } => {
                write!(f, "manual voltages need manual mode, robot is in {}", mode)
            }
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Kinematics(e) => Some(e),
            SimError::Motor(e) => Some(e),
            SimError::Navigation(e) => Some(e),
            SimError::PathLength { .. } | SimError::NotManual { .. } => None,
        }
    }
}
