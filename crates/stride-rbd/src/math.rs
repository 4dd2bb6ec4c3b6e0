//! Frame and rotation helpers shared by the rigid-body model.

use nalgebra::{
    Isometry3, Matrix3, Translation3, UnitQuaternion, UnitVector3, Vector3, Vector6,
};
use stride_urdf::Origin;

use crate::state::{AX, AY, AZ, LX, LY, LZ};

/// Build a rotation matrix from roll-pitch-yaw (intrinsic XYZ / extrinsic ZYX).
///
/// This is the URDF fixed-axis convention: `R = Rz(yaw) * Ry(pitch) * Rx(roll)`.
pub fn rotation_matrix_from_rpy(roll: f64, pitch: f64, yaw: f64) -> Matrix3<f64> {
    let (sr, cr) = roll.sin_cos();
    let (sp, cp) = pitch.sin_cos();
    let (sy, cy) = yaw.sin_cos();

    Matrix3::new(
        cy * cp,
        cy * sp * sr - sy * cr,
        cy * sp * cr + sy * sr,
        sy * cp,
        sy * sp * sr + cy * cr,
        sy * sp * cr - cy * sr,
        -sp,
        cp * sr,
        cp * cr,
    )
}

/// Convert a URDF [`Origin`] (xyz + rpy) to an [`Isometry3`].
pub fn origin_to_isometry(origin: &Origin) -> Isometry3<f64> {
    let translation = Translation3::new(origin.xyz[0], origin.xyz[1], origin.xyz[2]);
    let rotation = UnitQuaternion::from_euler_angles(origin.rpy[0], origin.rpy[1], origin.rpy[2]);
    Isometry3::from_parts(translation, rotation)
}

/// World pose of the floating base from a `[AX, AY, AZ, LX, LY, LZ]` vector.
pub fn base_isometry(base_pos: &Vector6<f64>) -> Isometry3<f64> {
    let translation = Translation3::new(base_pos[LX], base_pos[LY], base_pos[LZ]);
    let rotation = UnitQuaternion::from_euler_angles(base_pos[AX], base_pos[AY], base_pos[AZ]);
    Isometry3::from_parts(translation, rotation)
}

/// Transform produced by a single joint at a given coordinate.
pub fn joint_transform(
    axis: &UnitVector3<f64>,
    is_prismatic: bool,
    position: f64,
) -> Isometry3<f64> {
    if is_prismatic {
        Isometry3::from_parts(
            Translation3::from(axis.into_inner() * position),
            UnitQuaternion::identity(),
        )
    } else {
        Isometry3::from_parts(
            Translation3::identity(),
            UnitQuaternion::from_axis_angle(axis, position),
        )
    }
}

/// Linear `[LX, LY, LZ]` part of a base 6-vector.
pub fn linear_part(v: &Vector6<f64>) -> Vector3<f64> {
    Vector3::new(v[LX], v[LY], v[LZ])
}

/// Angular `[AX, AY, AZ]` part of a base 6-vector.
pub fn angular_part(v: &Vector6<f64>) -> Vector3<f64> {
    Vector3::new(v[AX], v[AY], v[AZ])
}

/// Overwrite the linear part of a base 6-vector.
pub fn set_linear_part(v: &mut Vector6<f64>, linear: &Vector3<f64>) {
    v[LX] = linear.x;
    v[LY] = linear.y;
    v[LZ] = linear.z;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn rpy_zero_is_identity() {
        assert_relative_eq!(
            rotation_matrix_from_rpy(0.0, 0.0, 0.0),
            Matrix3::identity(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn yaw_quarter_turn_maps_x_to_y() {
        let r = rotation_matrix_from_rpy(0.0, 0.0, FRAC_PI_2);
        let v = r * Vector3::x();
        assert_relative_eq!(v, Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn rpy_matches_quaternion_euler_angles() {
        let r = rotation_matrix_from_rpy(0.1, -0.2, 0.3);
        let q = UnitQuaternion::from_euler_angles(0.1, -0.2, 0.3);
        assert_relative_eq!(r, q.to_rotation_matrix().into_inner(), epsilon = 1e-12);
    }

    #[test]
    fn base_isometry_places_translation() {
        let mut base = Vector6::zeros();
        base[LX] = 1.0;
        base[LY] = -2.0;
        base[LZ] = 0.5;
        base[AZ] = FRAC_PI_2;
        let iso = base_isometry(&base);
        let p = iso * nalgebra::Point3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(p.coords, Vector3::new(1.0, -1.0, 0.5), epsilon = 1e-12);
    }

    #[test]
    fn prismatic_joint_translates_along_axis() {
        let axis = UnitVector3::new_normalize(Vector3::z());
        let t = joint_transform(&axis, true, 0.2);
        assert_relative_eq!(t.translation.vector, Vector3::new(0.0, 0.0, 0.2));
    }

    #[test]
    fn linear_and_angular_parts() {
        let mut v = Vector6::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        assert_relative_eq!(angular_part(&v), Vector3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(linear_part(&v), Vector3::new(4.0, 5.0, 6.0));
        set_linear_part(&mut v, &Vector3::new(-1.0, -2.0, -3.0));
        assert_relative_eq!(v, Vector6::new(1.0, 2.0, 3.0, -1.0, -2.0, -3.0));
    }
}
