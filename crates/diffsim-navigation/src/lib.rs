#![warn(missing_docs)]
//! Navigation for a voltage-driven differential-drive robot.
//!
//! [`PoseController`] turns the current pose and one target pose into a
//! motor voltage command. [`PathSequencer`] walks a list of waypoints through
//! the same controller, and [`ControlMode`] records which of the two, if any,
//! is in charge.

pub mod controller;
pub mod error;
pub mod mode;
pub mod path;

pub use controller::{ControlOutput, ControllerGains, Phase, PoseController, ramped_turn};
pub use error::NavigationError;
pub use mode::ControlMode;
pub use path::{PathSequencer, PathStatus, PathStep};
