//! Reference robot descriptions.

use stride_rbd::{FloatingBaseSystem, RbdError};

/// A 10 kg quadruped with three joints per leg.
///
/// Hips at `(±0.3, ±0.15, 0)` in the trunk frame, 0.25 m thigh and shank,
/// feet 0.5 m below the hips at zero joint angles. The system CoM at zero
/// joint angles is `(0, 0, -0.07)` in the base frame.
pub const QUADRUPED_URDF: &str = include_str!("../urdf/quadruped.urdf");

/// Feet of [`QUADRUPED_URDF`], sorted.
pub const QUADRUPED_FEET: [&str; 4] = ["lf_foot", "lh_foot", "rf_foot", "rh_foot"];

/// Rigid-body model of [`QUADRUPED_URDF`].
pub fn quadruped() -> Result<FloatingBaseSystem, RbdError> {
    FloatingBaseSystem::from_urdf_str(QUADRUPED_URDF)
}
