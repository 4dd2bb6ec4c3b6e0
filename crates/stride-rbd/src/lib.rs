//! Floating-base rigid-body model and contact dynamics for legged robots.
//!
//! This crate supplies the whole-body side of the preview controller:
//!
//! 1. **[`FloatingBaseSystem`]**: mass distribution and kinematic tree built
//!    from a URDF: total mass, system CoM and its rate, end-effector positions
//! 2. **[`ContactDynamics`]**: center of pressure and active-contact
//!    detection from contact wrenches
//! 3. **[`WholeBodyState`]**: the full robot state (base, joints, contacts)
//!
//! Base 6-vectors are ordered `[AX, AY, AZ, LX, LY, LZ]`: roll, pitch, yaw
//! followed by the linear components. See the index constants re-exported at
//! the crate root.

pub mod dynamics;
pub mod error;
pub mod math;
pub mod state;
pub mod system;

pub use dynamics::ContactDynamics;
pub use error::RbdError;
pub use math::rotation_matrix_from_rpy;
pub use state::{
    AX, AY, AZ, BodyVector3, BodyVector6, LX, LY, LZ, WholeBodyState, WholeBodyTrajectory,
};
pub use system::FloatingBaseSystem;
