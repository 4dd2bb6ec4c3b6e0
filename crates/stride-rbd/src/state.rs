//! Whole-body state of a floating-base robot.

use std::collections::HashMap;

use nalgebra::{DVector, Vector3, Vector6};

use crate::math::{angular_part, linear_part};

/// Roll index of a base 6-vector.
pub const AX: usize = 0;
/// Pitch index of a base 6-vector.
pub const AY: usize = 1;
/// Yaw index of a base 6-vector.
pub const AZ: usize = 2;
/// Linear x index of a base 6-vector.
pub const LX: usize = 3;
/// Linear y index of a base 6-vector.
pub const LY: usize = 4;
/// Linear z index of a base 6-vector.
pub const LZ: usize = 5;

/// Per-body 3D quantities keyed by body name.
pub type BodyVector3 = HashMap<String, Vector3<f64>>;

/// Per-body 6D quantities (wrenches) keyed by body name.
pub type BodyVector6 = HashMap<String, Vector6<f64>>;

/// Full state of the robot at one instant.
///
/// Contact positions, velocities and accelerations are expressed in the base
/// frame; contact efforts are wrenches `[AX, AY, AZ, LX, LY, LZ]` with the
/// normal force in `LZ`.
#[derive(Debug, Clone, PartialEq)]
pub struct WholeBodyState {
    /// Time in seconds.
    pub time: f64,
    /// Base pose: roll, pitch, yaw, x, y, z.
    pub base_pos: Vector6<f64>,
    /// Base velocity: world angular velocity, then linear velocity.
    pub base_vel: Vector6<f64>,
    /// Base acceleration, same layout as `base_vel`.
    pub base_acc: Vector6<f64>,
    pub joint_pos: DVector<f64>,
    pub joint_vel: DVector<f64>,
    pub joint_acc: DVector<f64>,
    pub joint_eff: DVector<f64>,
    pub contact_pos: BodyVector3,
    pub contact_vel: BodyVector3,
    pub contact_acc: BodyVector3,
    pub contact_eff: BodyVector6,
}

/// Sequence of whole-body states, one per sample.
pub type WholeBodyTrajectory = Vec<WholeBodyState>;

impl WholeBodyState {
    /// Zero state for a robot with `num_joints` joint coordinates.
    pub fn new(num_joints: usize) -> Self {
        Self {
            time: 0.0,
            base_pos: Vector6::zeros(),
            base_vel: Vector6::zeros(),
            base_acc: Vector6::zeros(),
            joint_pos: DVector::zeros(num_joints),
            joint_vel: DVector::zeros(num_joints),
            joint_acc: DVector::zeros(num_joints),
            joint_eff: DVector::zeros(num_joints),
            contact_pos: BodyVector3::new(),
            contact_vel: BodyVector3::new(),
            contact_acc: BodyVector3::new(),
            contact_eff: BodyVector6::new(),
        }
    }

    /// Number of joint coordinates.
    pub fn joint_dof(&self) -> usize {
        self.joint_pos.len()
    }

    /// Base position in the world frame.
    pub fn base_translation(&self) -> Vector3<f64> {
        linear_part(&self.base_pos)
    }

    /// Base orientation as roll, pitch, yaw.
    pub fn base_rpy(&self) -> Vector3<f64> {
        angular_part(&self.base_pos)
    }

    /// Normal force of a contact, zero if the contact has no effort entry.
    pub fn contact_normal_force(&self, name: &str) -> f64 {
        self.contact_eff.get(name).map_or(0.0, |eff| eff[LZ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_zeroed() {
        let state = WholeBodyState::new(12);
        assert_eq!(state.joint_dof(), 12);
        assert!(state.base_pos.iter().all(|v| *v == 0.0));
        assert!(state.contact_pos.is_empty());
        assert!(state.time.abs() < f64::EPSILON);
    }

    #[test]
    fn base_accessors_split_pose() {
        let mut state = WholeBodyState::new(0);
        state.base_pos = Vector6::new(0.1, 0.2, 0.3, 1.0, 2.0, 3.0);
        assert_eq!(state.base_rpy(), Vector3::new(0.1, 0.2, 0.3));
        assert_eq!(state.base_translation(), Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn contact_normal_force_reads_lz() {
        let mut state = WholeBodyState::new(0);
        state.contact_eff.insert(
            "lf_foot".into(),
            Vector6::new(0.0, 0.0, 0.0, 1.0, 2.0, 45.0),
        );
        assert!((state.contact_normal_force("lf_foot") - 45.0).abs() < 1e-12);
        assert!(state.contact_normal_force("rh_foot").abs() < f64::EPSILON);
    }
}
