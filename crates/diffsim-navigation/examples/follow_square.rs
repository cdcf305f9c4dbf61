use diffsim_kinematics::{DifferentialDrive, Pose};
use diffsim_motor::MotorModel;
use diffsim_navigation::{ControllerGains, PathSequencer, PathStatus, PoseController};
use std::f64::consts::{FRAC_PI_2, PI};

fn main() {
    let drive = DifferentialDrive::new(0.1, 0.4).expect("valid drive geometry");
    let motor = MotorModel::default();
    let controller = PoseController::new(ControllerGains::default()).expect("valid gains");

    // Corners of a 2 m square, each facing along the next edge.
    let mut path = PathSequencer::new(vec![
        Pose::new(2.0, 0.0, FRAC_PI_2),
        Pose::new(2.0, 2.0, PI),
        Pose::new(0.0, 2.0, -FRAC_PI_2),
        Pose::new(0.0, 0.0, 0.0),
    ]);

    let dt = 1.0 / 60.0;
    let mut pose = Pose::default();
    let mut last_index = path.index();

    println!("Following {} waypoints with {} and {}", path.len(), drive, motor);

    for tick in 0..60_000 {
        let step = path.advance(&controller, &pose);
        let wheels = motor.wheel_speeds(motor.limit(step.voltages));
        pose = drive
            .update_pose(pose, drive.forward_kinematics(wheels), dt)
            .expect("dt is positive");

        if step.index != last_index {
            println!("t = {:>6.2} s: waypoint {} reached at {}", tick as f64 * dt, step.index, pose);
            last_index = step.index;
        }
        if step.status == PathStatus::Complete {
            println!("\nPath complete after {} ticks. Final pose: {}", tick + 1, pose);
            return;
        }
    }

    println!("\nGave up before finishing; stopped at {}", pose);
}
