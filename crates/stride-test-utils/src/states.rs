//! Whole-body state builders.

use nalgebra::{DVector, Vector3, Vector6};
use rand::Rng;
use stride_rbd::{FloatingBaseSystem, LZ, RbdError, WholeBodyState};

/// Robot standing still with the base at `height` and zero joint angles.
///
/// Every foot carries an equal share of the weight.
pub fn standing_state(
    system: &FloatingBaseSystem,
    height: f64,
) -> Result<WholeBodyState, RbdError> {
    let mut state = WholeBodyState::new(system.joint_dof());
    state.base_pos[LZ] = height;
    state.contact_pos = system.contact_positions(&state.joint_pos)?;
    for name in system.end_effector_names() {
        state.contact_vel.insert(name.clone(), Vector3::zeros());
        state.contact_acc.insert(name.clone(), Vector3::zeros());
    }

    let feet = system.end_effector_names();
    if !feet.is_empty() {
        #[allow(clippy::cast_precision_loss)]
        let share = system.total_mass() * system.gravity().norm() / feet.len() as f64;
        for name in feet {
            let mut wrench = Vector6::zeros();
            wrench[LZ] = share;
            state.contact_eff.insert(name.clone(), wrench);
        }
    }
    Ok(state)
}

/// Random but consistent whole-body state: moderate base orientation, joint
/// angles within ±0.4 rad, contact positions from forward kinematics and
/// random normal forces.
pub fn random_whole_body_state<R: Rng>(
    rng: &mut R,
    system: &FloatingBaseSystem,
) -> Result<WholeBodyState, RbdError> {
    let n = system.joint_dof();
    let mut state = WholeBodyState::new(n);
    state.time = rng.gen_range(0.0..10.0);
    state.base_pos = Vector6::from_fn(|i, _| {
        if i < 3 {
            rng.gen_range(-0.3..0.3)
        } else {
            rng.gen_range(-1.0..1.0)
        }
    });
    state.base_vel = Vector6::from_fn(|_, _| rng.gen_range(-0.5..0.5));
    state.base_acc = Vector6::from_fn(|_, _| rng.gen_range(-2.0..2.0));
    state.joint_pos = DVector::from_fn(n, |_, _| rng.gen_range(-0.4..0.4));
    state.joint_vel = DVector::from_fn(n, |_, _| rng.gen_range(-1.0..1.0));
    state.contact_pos = system.contact_positions(&state.joint_pos)?;
    for name in system.end_effector_names() {
        let mut wrench = Vector6::zeros();
        wrench[LZ] = rng.gen_range(0.0..60.0);
        state.contact_eff.insert(name.clone(), wrench);
        state
            .contact_vel
            .insert(name.clone(), Vector3::from_fn(|_, _| rng.gen_range(-0.2..0.2)));
        state.contact_acc.insert(name.clone(), Vector3::zeros());
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{quadruped, seeded_rng};

    #[test]
    fn standing_state_shares_weight() {
        let system = quadruped().unwrap();
        let state = standing_state(&system, 0.5).unwrap();
        let total: f64 = state.contact_eff.values().map(|w| w[LZ]).sum();
        assert!((total - 10.0 * 9.81).abs() < 1e-9);
        assert_eq!(state.contact_pos.len(), 4);
        assert!((state.contact_pos["lf_foot"].z + 0.5).abs() < 1e-12);
    }

    #[test]
    fn random_state_is_reproducible() {
        let system = quadruped().unwrap();
        let a = random_whole_body_state(&mut seeded_rng(7), &system).unwrap();
        let b = random_whole_body_state(&mut seeded_rng(7), &system).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.joint_dof(), 12);
    }
}
