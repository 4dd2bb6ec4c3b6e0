//! Contact-level dynamics: center of pressure and active-contact detection.

use nalgebra::Vector3;

use crate::state::{BodyVector3, BodyVector6, LZ};

/// Normal forces at or below this value do not contribute to the CoP.
const MIN_NORMAL_FORCE: f64 = 1e-9;

/// Contact dynamics of a legged robot.
///
/// Operates on contact wrenches whose `LZ` component is the force normal to
/// the ground.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactDynamics;

impl ContactDynamics {
    pub const fn new() -> Self {
        Self
    }

    /// Center of pressure of the given contacts, in the frame of
    /// `contact_pos`.
    ///
    /// Each contact is weighted by its normal force. Contacts without a
    /// position, without an effort, or pulling on the ground are ignored.
    /// Returns zero when nothing pushes on the ground.
    pub fn compute_center_of_pressure<S: AsRef<str>>(
        &self,
        contact_eff: &BodyVector6,
        contact_pos: &BodyVector3,
        names: &[S],
    ) -> Vector3<f64> {
        let mut weighted = Vector3::zeros();
        let mut total_force = 0.0;
        for name in names {
            let name = name.as_ref();
            let (Some(eff), Some(pos)) = (contact_eff.get(name), contact_pos.get(name)) else {
                continue;
            };
            let normal = eff[LZ];
            if normal <= MIN_NORMAL_FORCE {
                continue;
            }
            weighted += pos * normal;
            total_force += normal;
        }

        if total_force > MIN_NORMAL_FORCE {
            weighted / total_force
        } else {
            Vector3::zeros()
        }
    }

    /// Contacts whose normal force exceeds `force_threshold`, sorted by name.
    pub fn active_contacts(&self, contact_eff: &BodyVector6, force_threshold: f64) -> Vec<String> {
        let mut active: Vec<String> = contact_eff
            .iter()
            .filter(|(_, eff)| eff[LZ] > force_threshold)
            .map(|(name, _)| name.clone())
            .collect();
        active.sort_unstable();
        active
    }
}
