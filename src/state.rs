use std::collections::VecDeque;

use diffsim_kinematics::{Pose, WheelSpeeds};
use diffsim_motor::DriveVoltages;

/// Everything a renderer or HUD needs to know about the robot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RobotState {
    pub x: f64,
    pub y: f64,
    /// Heading in `[0, 2π)`.
    pub theta: f64,
    /// Left wheel angular velocity (rad/s).
    pub v_left: f64,
    /// Right wheel angular velocity (rad/s).
    pub v_right: f64,
    /// Chassis linear velocity (m/s).
    pub linear_velocity: f64,
    /// Chassis angular velocity (rad/s).
    pub angular_velocity: f64,
    pub left_voltage: f64,
    pub right_voltage: f64,
}

impl RobotState {
    pub fn pose(&self) -> Pose {
        Pose::new(self.x, self.y, self.theta)
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.x = pose.x;
        self.y = pose.y;
        self.theta = pose.theta;
    }

    pub fn voltages(&self) -> DriveVoltages {
        DriveVoltages::new(self.left_voltage, self.right_voltage)
    }

    pub fn set_voltages(&mut self, voltages: DriveVoltages) {
        self.left_voltage = voltages.left;
        self.right_voltage = voltages.right;
    }

    pub fn wheel_speeds(&self) -> WheelSpeeds {
        WheelSpeeds::new(self.v_left, self.v_right)
    }
}

/// Bounded history of visited positions. The oldest sample is dropped first.
#[derive(Debug, Clone, PartialEq)]
pub struct Trail {
    samples: VecDeque<(f64, f64)>,
    max_len: usize,
}

impl Trail {
    pub fn new(max_len: usize) -> Self {
        Trail {
            samples: VecDeque::with_capacity(max_len),
            max_len,
        }
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.samples.push_back((x, y));
        while self.samples.len() > self.max_len {
            self.samples.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn oldest(&self) -> Option<(f64, f64)> {
        self.samples.front().copied()
    }

    pub fn latest(&self) -> Option<(f64, f64)> {
        self.samples.back().copied()
    }

    /// Samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &(f64, f64)> + '_ {
        self.samples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_evicts_oldest_first() {
        let mut trail = Trail::new(3);
        for i in 0..5 {
            trail.push(i as f64, -(i as f64));
        }
        assert_eq!(trail.len(), 3);
        assert_eq!(trail.oldest(), Some((2.0, -2.0)));
        assert_eq!(trail.latest(), Some((4.0, -4.0)));
        let xs: Vec<f64> = trail.iter().map(|(x, _)| *x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_trail_clear() {
        let mut trail = Trail::new(1000);
        trail.push(1.0, 1.0);
        trail.clear();
        assert!(trail.is_empty());
        assert_eq!(trail.max_len(), 1000);
        assert_eq!(trail.latest(), None);
    }

    #[test]
    fn test_zero_length_trail_stays_empty() {
        let mut trail = Trail::new(0);
        trail.push(1.0, 2.0);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_state_accessors() {
        let mut state = RobotState::default();
        state.set_pose(Pose::new(1.0, 2.0, 0.5));
        state.set_voltages(DriveVoltages::new(3.0, -3.0));
        assert_eq!(state.pose(), Pose::new(1.0, 2.0, 0.5));
        assert_eq!(state.voltages(), DriveVoltages::new(3.0, -3.0));
        assert_eq!(state.wheel_speeds(), WheelSpeeds::new(0.0, 0.0));
    }
}
