//! Quarter turn on the spot, then one meter straight ahead.
//!
//! Wheel speeds are what the motor model produces at 3 V pivot and at the
//! 6 rad/s saturation limit for a 0.1 m wheel on a 0.4 m axle.

use core::f64::consts::FRAC_PI_2;

use diffsim_kinematics::{DifferentialDrive, KinematicsError, Pose, WheelSpeeds};

const DT: f64 = 1.0 / 60.0;

fn run_until(
    drive: &DifferentialDrive,
    mut pose: Pose,
    wheels: WheelSpeeds,
    done: impl Fn(&Pose) -> bool,
) -> Result<(Pose, u32), KinematicsError> {
    let chassis = drive.forward_kinematics(wheels);
    let mut steps = 0;
    while !done(&pose) {
        pose = drive.update_pose(pose, chassis, DT)?;
        steps += 1;
    }
    Ok((pose, steps))
}

fn main() -> Result<(), KinematicsError> {
    let drive = DifferentialDrive::new(0.1, 0.4)?;
    println!("{}", drive);

    let start = Pose::new(0.0, 0.0, 0.0);
    let (turned, pivot_steps) =
        run_until(&drive, start, WheelSpeeds::new(-1.8, 1.8), |p| p.theta >= FRAC_PI_2)?;
    println!("pivot: {:>3} steps -> {}", pivot_steps, turned);

    let (arrived, drive_steps) =
        run_until(&drive, turned, WheelSpeeds::new(6.0, 6.0), |p| p.distance_to(&turned) >= 1.0)?;
    println!("drive: {:>3} steps -> {}", drive_steps, arrived);

    Ok(())
}
