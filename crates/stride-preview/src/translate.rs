//! Mapping between preview states and whole-body states.
//!
//! The reduced model knows the CoM, the heading and the feet. Going to the
//! whole body, the base pose is recovered from the CoM through the system CoM
//! offset (the system CoM in the base frame); joint-level fields are left as
//! they are. Going back, the CoM and its rate are computed from the base and
//! joint state, and the CoP and support region from the contact wrenches.

use nalgebra::{Vector3, Vector6};
use stride_rbd::math::{linear_part, set_linear_part};
use stride_rbd::{AX, AY, AZ, BodyVector3, WholeBodyState, WholeBodyTrajectory, rotation_matrix_from_rpy};
use tracing::debug;

use crate::error::PreviewError;
use crate::preview::PreviewLocomotion;
use crate::swing::SwingPatternGenerator;
use crate::types::{PreviewState, PreviewTrajectory};

impl<G: SwingPatternGenerator> PreviewLocomotion<G> {
    /// Write a preview state into `full`.
    ///
    /// Sets the time, the base yaw and its derivatives, the base position,
    /// velocity and acceleration, and the contact kinematics. Roll, pitch,
    /// joint fields and contact efforts of `full` are kept and used: the base
    /// position puts the system CoM at `preview.com_pos` for the current
    /// orientation, and the base velocity discounts the CoM velocity produced
    /// by the base rotation and the joint velocities.
    pub fn to_whole_body_state(
        &self,
        full: &mut WholeBodyState,
        preview: &PreviewState,
        system_com: &Vector3<f64>,
    ) -> Result<(), PreviewError> {
        let system = self.loaded_system()?;

        full.time = preview.time;
        full.base_pos[AZ] = preview.head_pos;
        full.base_vel[AZ] = preview.head_vel;
        full.base_acc[AZ] = preview.head_acc;

        let rotation =
            rotation_matrix_from_rpy(full.base_pos[AX], full.base_pos[AY], full.base_pos[AZ]);
        set_linear_part(&mut full.base_pos, &(preview.com_pos - rotation * system_com));

        let mut rotation_only = full.base_vel;
        set_linear_part(&mut rotation_only, &Vector3::zeros());
        let induced = system.system_com_rate(
            &full.base_pos,
            &full.joint_pos,
            &rotation_only,
            &full.joint_vel,
        )?;
        set_linear_part(&mut full.base_vel, &(preview.com_vel - induced));
        set_linear_part(&mut full.base_acc, &preview.com_acc);

        full.contact_pos.clone_from(&preview.foot_pos);
        full.contact_vel.clone_from(&preview.foot_vel);
        full.contact_acc.clone_from(&preview.foot_acc);
        Ok(())
    }

    /// Reduce a whole-body state to a preview state.
    ///
    /// Also returns the system CoM in the base frame for the current joint
    /// configuration. Pass it to the preview and back to
    /// [`to_whole_body_state`](Self::to_whole_body_state).
    pub fn from_whole_body_state(
        &self,
        full: &WholeBodyState,
    ) -> Result<(PreviewState, Vector3<f64>), PreviewError> {
        let system = self.loaded_system()?;

        let system_com = system.system_com(&Vector6::zeros(), &full.joint_pos)?;
        let com_pos = system.system_com(&full.base_pos, &full.joint_pos)?;
        let com_vel = system.system_com_rate(
            &full.base_pos,
            &full.joint_pos,
            &full.base_vel,
            &full.joint_vel,
        )?;

        let rpy = full.base_rpy();
        let rotation = rotation_matrix_from_rpy(rpy.x, rpy.y, rpy.z);
        let cop_wrt_base = self.dynamics().compute_center_of_pressure(
            &full.contact_eff,
            &full.contact_pos,
            system.end_effector_names(),
        );

        let support_region: BodyVector3 = self
            .dynamics()
            .active_contacts(&full.contact_eff, self.force_threshold())
            .into_iter()
            .filter_map(|name| full.contact_pos.get(&name).map(|pos| (name, *pos)))
            .collect();

        let state = PreviewState {
            time: full.time,
            com_pos,
            com_vel,
            com_acc: linear_part(&full.base_acc),
            head_pos: full.base_pos[AZ],
            head_vel: full.base_vel[AZ],
            head_acc: full.base_acc[AZ],
            cop: full.base_translation() + rotation * cop_wrt_base,
            foot_pos: full.contact_pos.clone(),
            foot_vel: full.contact_vel.clone(),
            foot_acc: full.contact_acc.clone(),
            support_region,
        };
        Ok((state, system_com))
    }

    /// Map a preview trajectory to whole-body states seeded from `reference`.
    pub fn to_whole_body_trajectory(
        &self,
        preview: &[PreviewState],
        reference: &WholeBodyState,
        system_com: &Vector3<f64>,
    ) -> Result<WholeBodyTrajectory, PreviewError> {
        let trajectory = preview
            .iter()
            .map(|state| {
                let mut full = reference.clone();
                self.to_whole_body_state(&mut full, state, system_com)?;
                Ok(full)
            })
            .collect::<Result<WholeBodyTrajectory, PreviewError>>()?;
        debug!(samples = trajectory.len(), "Converted preview to whole-body trajectory");
        Ok(trajectory)
    }

    /// Reduce a whole-body trajectory, returning the system CoM offset of
    /// every sample.
    pub fn from_whole_body_trajectory(
        &self,
        full: &[WholeBodyState],
    ) -> Result<(PreviewTrajectory, Vec<Vector3<f64>>), PreviewError> {
        let mut trajectory = PreviewTrajectory::with_capacity(full.len());
        let mut offsets = Vec::with_capacity(full.len());
        for state in full {
            let (preview, system_com) = self.from_whole_body_state(state)?;
            trajectory.push(preview);
            offsets.push(system_com);
        }
        Ok((trajectory, offsets))
    }
}
