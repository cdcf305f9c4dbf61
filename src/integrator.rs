use diffsim_kinematics::{DifferentialDrive, KinematicsError, WheelSpeeds};

use crate::state::{RobotState, Trail};

/// Advances the robot pose from wheel speeds and records the trail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicsIntegrator {
    drive: DifferentialDrive,
}

impl KinematicsIntegrator {
    pub fn new(wheel_radius: f64, wheel_distance: f64) -> Result<Self, KinematicsError> {
        Ok(KinematicsIntegrator {
            drive: DifferentialDrive::new(wheel_radius, wheel_distance)?,
        })
    }

    pub fn drive(&self) -> &DifferentialDrive {
        &self.drive
    }

    /// Integrate one step of `dt` seconds.
    ///
    /// Wheel speeds, chassis velocities and pose are written to `state` and
    /// the new position is appended to `trail`. On error nothing is modified.
    pub fn integrate(
        &self,
        state: &mut RobotState,
        trail: &mut Trail,
        wheels: WheelSpeeds,
        dt: f64,
    ) -> Result<(), KinematicsError> {
        let chassis = self.drive.forward_kinematics(wheels);
        let pose = self.drive.update_pose(state.pose(), chassis, dt)?;

        state.v_left = wheels.omega_l;
        state.v_right = wheels.omega_r;
        state.linear_velocity = chassis.v;
        state.angular_velocity = chassis.omega;
        state.set_pose(pose);
        trail.push(pose.x, pose.y);
        Ok(())
    }
}
