//! URDF parsing and robot model representation for Stride.
//!
//! Provides types for representing a robot's kinematic tree (links, joints,
//! inertial data) and parsing URDF XML from text or files. The rigid-body
//! model in `stride-rbd` is built on top of [`RobotModel`].

pub mod error;
pub mod parser;
pub mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use error::UrdfError;
pub use parser::{parse_file, parse_string};
pub use types::{Inertial, JointData, JointType, LinkData, Origin, RobotModel};
