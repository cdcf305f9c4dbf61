//! Who computes the next voltage command.

use core::fmt;

use diffsim_kinematics::Pose;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::path::PathSequencer;

/// Control mode of the robot. Each automatic mode carries what it pursues.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ControlMode {
    /// Voltages come from manual input.
    #[default]
    Manual,
    /// Pursue a single target pose. Stays in this mode after arrival until
    /// another request replaces it.
    AutoPosition(Pose),
    /// Follow a path; falls back to [`ControlMode::Manual`] once it is consumed.
    AutoPath(PathSequencer),
}

impl ControlMode {
    /// Short uppercase label, as shown on a HUD.
    pub fn label(&self) -> &'static str {
        match self {
            ControlMode::Manual => "MANUAL",
            ControlMode::AutoPosition(_) => "AUTO_POSITION",
            ControlMode::AutoPath(_) => "AUTO_PATH",
        }
    }

    /// True in [`ControlMode::Manual`].
    pub fn is_manual(&self) -> bool {
        matches!(self, ControlMode::Manual)
    }

    /// The pose currently pursued: the single target, or the path's current waypoint.
    pub fn active_target(&self) -> Option<Pose> {
        match self {
            ControlMode::Manual => None,
            ControlMode::AutoPosition(target) => Some(*target),
            ControlMode::AutoPath(path) => path.current().copied(),
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlMode::Manual => f.write_str(self.label()),
            ControlMode::AutoPosition(target) => write!(f, "{} -> {}", self.label(), target),
            ControlMode::AutoPath(path) => {
                write!(f, "{} [{}/{}]", self.label(), path.index(), path.len())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_manual() {
        let mode = ControlMode::default();
        assert!(mode.is_manual());
        assert_eq!(mode.label(), "MANUAL");
        assert_eq!(mode.active_target(), None);
    }

    #[test]
    fn test_active_target() {
        let target = Pose::new(2.0, 3.0, 0.5);
        assert_eq!(ControlMode::AutoPosition(target).active_target(), Some(target));

        let path = PathSequencer::new(vec![Pose::new(1.0, 0.0, 0.0), target]);
        let mode = ControlMode::AutoPath(path);
        assert_eq!(mode.label(), "AUTO_PATH");
        assert_eq!(mode.active_target(), Some(Pose::new(1.0, 0.0, 0.0)));
        assert_eq!(mode.to_string(), "AUTO_PATH [0/2]");
    }
}
