//! Sequential waypoint following.

use diffsim_kinematics::Pose;
use diffsim_motor::DriveVoltages;
use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::controller::{ControlOutput, PoseController};

/// Whether a path still has waypoints to pursue.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStatus {
    /// A waypoint is being pursued.
    Following,
    /// Every waypoint has been consumed; the robot should fall back to manual control.
    Complete,
}

/// Result of one [`PathSequencer::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStep {
    /// Voltage command for this tick. Zero once the path is complete.
    pub voltages: DriveVoltages,
    /// Cursor after this tick.
    pub index: usize,
    /// Following or complete.
    pub status: PathStatus,
    /// Controller output for the pursued waypoint, if one was pursued.
    pub control: Option<ControlOutput>,
}

/// An ordered list of target poses and a cursor into it.
///
/// The cursor only moves forward, one waypoint per arrival.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathSequencer {
    waypoints: Vec<Pose>,
    index: usize,
}

impl PathSequencer {
    /// Start a new path at its first waypoint.
    pub fn new(waypoints: Vec<Pose>) -> Self {
        PathSequencer { waypoints, index: 0 }
    }

    /// All waypoints, consumed or not.
    pub fn waypoints(&self) -> &[Pose] {
        &self.waypoints
    }

    /// Index of the waypoint currently pursued.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of waypoints in the path.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// True for a path without waypoints.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// The waypoint currently pursued, `None` once the path is exhausted.
    pub fn current(&self) -> Option<&Pose> {
        self.waypoints.get(self.index)
    }

    /// Waypoints not reached yet, current one included.
    pub fn remaining(&self) -> &[Pose] {
        self.waypoints.get(self.index..).unwrap_or(&[])
    }

    /// True once every waypoint has been reached.
    pub fn is_finished(&self) -> bool {
        self.index >= self.waypoints.len()
    }

    /// Pursue the current waypoint from `pose` for one tick.
    ///
    /// On arrival the cursor moves to the next waypoint. When the last one is
    /// reached, or when the path was already exhausted on entry, the step
    /// reports [`PathStatus::Complete`] with zero voltages.
    pub fn advance(&mut self, controller: &PoseController, pose: &Pose) -> PathStep {
        let Some(target) = self.current().copied() else {
            return self.complete(None);
        };

        let control = controller.pursue(pose, &target);
        if control.reached {
            self.index += 1;
            info!(
                reached = self.index,
                total = self.waypoints.len(),
                waypoint = %target,
                "Waypoint reached"
            );
            if self.is_finished() {
                return self.complete(Some(control));
            }
        } else {
            debug!(index = self.index, phase = %control.phase, "Pursuing waypoint");
        }

        PathStep {
            voltages: control.voltages,
            index: self.index,
            status: PathStatus::Following,
            control: Some(control),
        }
    }

    fn complete(&self, control: Option<ControlOutput>) -> PathStep {
        PathStep {
            voltages: DriveVoltages::ZERO,
            index: self.index,
            status: PathStatus::Complete,
            control,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ControllerGains, Phase};

    fn controller() -> PoseController {
        PoseController::new(ControllerGains::default()).unwrap()
    }

    fn two_waypoints() -> PathSequencer {
        PathSequencer::new(vec![Pose::new(1.0, 0.0, 0.0), Pose::new(1.0, 2.0, 1.5)])
    }

    #[test]
    fn test_empty_path_completes_immediately() {
        let mut path = PathSequencer::new(Vec::new());
        let step = path.advance(&controller(), &Pose::default());
        assert_eq!(step.status, PathStatus::Complete);
        assert_eq!(step.voltages, DriveVoltages::ZERO);
        assert_eq!(step.index, 0);
        assert!(step.control.is_none());
    }

    #[test]
    fn test_cursor_stays_until_arrival() {
        let mut path = two_waypoints();
        let step = path.advance(&controller(), &Pose::new(0.0, 0.0, 0.0));
        assert_eq!(step.status, PathStatus::Following);
        assert_eq!(step.index, 0);
        assert_eq!(step.control.map(|c| c.phase), Some(Phase::Drive));
        assert!(!step.voltages.is_zero());
    }

    #[test]
    fn test_two_waypoints_in_order() {
        let controller = controller();
        let mut path = two_waypoints();

        let step = path.advance(&controller, &Pose::new(1.0, 0.0, 0.0));
        assert_eq!(step.index, 1);
        assert_eq!(step.status, PathStatus::Following);
        assert_eq!(path.current(), Some(&Pose::new(1.0, 2.0, 1.5)));
        assert_eq!(path.remaining().len(), 1);

        // Now the second waypoint drives the command.
        let step = path.advance(&controller, &Pose::new(1.0, 0.0, 0.0));
        assert_eq!(step.index, 1);
        assert_eq!(step.control.map(|c| c.phase), Some(Phase::Rotate));

        let step = path.advance(&controller, &Pose::new(1.0, 2.0, 1.5));
        assert_eq!(step.index, 2);
        assert_eq!(step.status, PathStatus::Complete);
        assert_eq!(step.voltages.left, 0.0);
        assert_eq!(step.voltages.right, 0.0);
        assert!(path.is_finished());
        assert!(path.current().is_none());
        assert!(path.remaining().is_empty());
    }

    #[test]
    fn test_exhausted_path_keeps_cursor() {
        let controller = controller();
        let mut path = PathSequencer::new(vec![Pose::new(0.0, 0.0, 0.0)]);
        let step = path.advance(&controller, &Pose::new(0.0, 0.0, 0.0));
        assert_eq!(step.status, PathStatus::Complete);

        let step = path.advance(&controller, &Pose::new(3.0, 3.0, 0.0));
        assert_eq!(step.status, PathStatus::Complete);
        assert_eq!(step.index, 1);
        assert_eq!(step.voltages, DriveVoltages::ZERO);
    }
}
