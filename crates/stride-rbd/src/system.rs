//! Floating-base rigid-body model built from a [`RobotModel`].
//!
//! The root link is the floating base. Every other link hangs off it through
//! the URDF joint tree; actuated joints contribute one coordinate each,
//! ordered by sorted joint name. Fixed, floating and planar joints are
//! treated as rigid.

use std::collections::HashMap;
use std::path::Path;

use nalgebra::{DVector, Isometry3, Point3, UnitVector3, Vector3, Vector6};
use stride_urdf::{JointData, JointType, RobotModel};
use tracing::debug;

use crate::error::RbdError;
use crate::math::{angular_part, base_isometry, joint_transform, linear_part, origin_to_isometry};
use crate::state::BodyVector3;

const DEFAULT_GRAVITY: f64 = 9.81;

/// Axes shorter than this have no direction.
const AXIS_EPSILON: f64 = 1e-12;

/// A rigid body of the tree.
#[derive(Debug, Clone)]
struct TreeBody {
    name: String,
    mass: f64,
    /// Center of mass in the body frame.
    com: Vector3<f64>,
    /// Tree joints between the base and this body, root first.
    ancestors: Vec<usize>,
}

/// A joint of the tree connecting `parent` to `child` (body indices).
#[derive(Debug, Clone)]
struct TreeJoint {
    parent: usize,
    child: usize,
    origin: Isometry3<f64>,
    axis: UnitVector3<f64>,
    is_prismatic: bool,
    /// Index into the joint coordinate vector, `None` for rigid joints.
    coordinate: Option<usize>,
}

/// Floating-base rigid-body model of a legged robot.
#[derive(Debug, Clone)]
pub struct FloatingBaseSystem {
    name: String,
    /// Bodies in topological order; index 0 is the floating base.
    bodies: Vec<TreeBody>,
    /// Joints in topological order.
    joints: Vec<TreeJoint>,
    joint_names: Vec<String>,
    end_effectors: Vec<String>,
    total_mass: f64,
    gravity: Vector3<f64>,
}

impl FloatingBaseSystem {
    /// Build the model from a parsed robot description.
    ///
    /// End-effectors default to the leaf links of the tree.
    pub fn from_model(model: &RobotModel) -> Result<Self, RbdError> {
        let joint_names: Vec<String> = model
            .actuated_joint_names()
            .into_iter()
            .map(String::from)
            .collect();
        let coordinates: HashMap<&str, usize> = joint_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let mut bodies = Vec::with_capacity(model.links.len());
        let mut joints = Vec::with_capacity(model.joints.len());
        let root = model.link(&model.root_link)?;
        bodies.push(TreeBody {
            name: root.name.clone(),
            mass: root.mass(),
            com: link_com(root),
            ancestors: Vec::new(),
        });

        // Depth-first walk from the root keeps parents ahead of children.
        let mut stack = vec![0_usize];
        while let Some(parent) = stack.pop() {
            let parent_name = bodies[parent].name.clone();
            for joint in model.child_joints(&parent_name) {
                let child_link = model.link(&joint.child)?;
                let mut ancestors = bodies[parent].ancestors.clone();
                ancestors.push(joints.len());
                let child = bodies.len();
                bodies.push(TreeBody {
                    name: child_link.name.clone(),
                    mass: child_link.mass(),
                    com: link_com(child_link),
                    ancestors,
                });
                joints.push(TreeJoint {
                    parent,
                    child,
                    origin: origin_to_isometry(&joint.origin),
                    axis: joint_axis(joint)?,
                    is_prismatic: joint.joint_type == JointType::Prismatic,
                    coordinate: coordinates.get(joint.name.as_str()).copied(),
                });
                stack.push(child);
            }
        }

        let total_mass = bodies.iter().map(|b| b.mass).sum();
        let end_effectors = model.leaf_links().into_iter().map(String::from).collect();
        debug!(
            robot = %model.name,
            bodies = bodies.len(),
            dof = joint_names.len(),
            total_mass,
            "built floating-base model"
        );

        Ok(Self {
            name: model.name.clone(),
            bodies,
            joints,
            joint_names,
            end_effectors,
            total_mass,
            gravity: Vector3::new(0.0, 0.0, -DEFAULT_GRAVITY),
        })
    }

    /// Parse a URDF string and build the model.
    pub fn from_urdf_str(xml: &str) -> Result<Self, RbdError> {
        let model = stride_urdf::parse_string(xml)?;
        Self::from_model(&model)
    }

    /// Read and parse a URDF file and build the model.
    pub fn from_urdf_file(path: impl AsRef<Path>) -> Result<Self, RbdError> {
        let model = stride_urdf::parse_file(path)?;
        Self::from_model(&model)
    }

    /// Replace the default (leaf link) end-effectors.
    pub fn with_end_effectors<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self, RbdError> {
        let mut end_effectors = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if self.body_index(name).is_none() {
                return Err(RbdError::UnknownBody(name.into()));
            }
            end_effectors.push(name.to_string());
        }
        end_effectors.sort_unstable();
        self.end_effectors = end_effectors;
        Ok(self)
    }

    /// Robot name from the description.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gravity vector in the world frame.
    pub const fn gravity(&self) -> &Vector3<f64> {
        &self.gravity
    }

    /// Override the gravity vector.
    pub fn set_gravity(&mut self, gravity: Vector3<f64>) {
        self.gravity = gravity;
    }

    /// Total mass of all bodies in kg.
    pub const fn total_mass(&self) -> f64 {
        self.total_mass
    }

    /// Center of mass of the floating base in the base frame.
    pub fn floating_base_com(&self) -> Vector3<f64> {
        self.bodies[0].com
    }

    /// Actuated joint names in coordinate order.
    pub fn joint_names(&self) -> &[String] {
        &self.joint_names
    }

    /// Number of joint coordinates.
    pub fn joint_dof(&self) -> usize {
        self.joint_names.len()
    }

    /// End-effector (foot) names, sorted.
    pub fn end_effector_names(&self) -> &[String] {
        &self.end_effectors
    }

    /// Whether `name` is a tracked end-effector.
    pub fn is_end_effector(&self, name: &str) -> bool {
        self.end_effectors.iter().any(|e| e == name)
    }

    /// System center of mass in the world frame.
    pub fn system_com(
        &self,
        base_pos: &Vector6<f64>,
        joint_pos: &DVector<f64>,
    ) -> Result<Vector3<f64>, RbdError> {
        let poses = self.body_poses(&base_isometry(base_pos), joint_pos)?;
        Ok(self.weighted_com(&poses))
    }

    /// Rate of change of the system center of mass in the world frame.
    ///
    /// The angular part of `base_vel` is the base angular velocity expressed
    /// in world coordinates.
    pub fn system_com_rate(
        &self,
        base_pos: &Vector6<f64>,
        joint_pos: &DVector<f64>,
        base_vel: &Vector6<f64>,
        joint_vel: &DVector<f64>,
    ) -> Result<Vector3<f64>, RbdError> {
        self.check_dimension(joint_vel)?;
        let base = base_isometry(base_pos);
        let poses = self.body_poses(&base, joint_pos)?;
        if self.total_mass <= 0.0 {
            return Ok(linear_part(base_vel));
        }

        // Joint origin and axis in the world frame, before the joint moves.
        let frames: Vec<(Vector3<f64>, Vector3<f64>)> = self
            .joints
            .iter()
            .map(|j| {
                let frame = poses[j.parent] * j.origin;
                (frame.translation.vector, frame.rotation * j.axis.into_inner())
            })
            .collect();

        let base_origin = base.translation.vector;
        let omega = angular_part(base_vel);
        let mut momentum = Vector3::zeros();
        for (body, pose) in self.bodies.iter().zip(&poses) {
            if body.mass <= 0.0 {
                continue;
            }
            let com = pose * Point3::from(body.com);
            let mut velocity = linear_part(base_vel) + omega.cross(&(com.coords - base_origin));
            for &j in &body.ancestors {
                let joint = &self.joints[j];
                let Some(coordinate) = joint.coordinate else {
                    continue;
                };
                let (origin, axis) = &frames[j];
                let qd = joint_vel[coordinate];
                velocity += if joint.is_prismatic {
                    axis * qd
                } else {
                    axis.cross(&(com.coords - origin)) * qd
                };
            }
            momentum += velocity * body.mass;
        }
        Ok(momentum / self.total_mass)
    }

    /// End-effector positions in the base frame.
    pub fn contact_positions(&self, joint_pos: &DVector<f64>) -> Result<BodyVector3, RbdError> {
        let poses = self.body_poses(&Isometry3::identity(), joint_pos)?;
        let mut positions = BodyVector3::with_capacity(self.end_effectors.len());
        for name in &self.end_effectors {
            let index = self
                .body_index(name)
                .ok_or_else(|| RbdError::UnknownBody(name.clone()))?;
            positions.insert(name.clone(), poses[index].translation.vector);
        }
        Ok(positions)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn body_index(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.name == name)
    }

    fn check_dimension(&self, q: &DVector<f64>) -> Result<(), RbdError> {
        if q.len() == self.joint_dof() {
            Ok(())
        } else {
            Err(RbdError::JointDimension {
                expected: self.joint_dof(),
                got: q.len(),
            })
        }
    }

    /// Forward kinematics of every body given the base pose.
    fn body_poses(
        &self,
        base: &Isometry3<f64>,
        joint_pos: &DVector<f64>,
    ) -> Result<Vec<Isometry3<f64>>, RbdError> {
        self.check_dimension(joint_pos)?;
        let mut poses = vec![*base; self.bodies.len()];
        for joint in &self.joints {
            let q = joint.coordinate.map_or(0.0, |c| joint_pos[c]);
            poses[joint.child] =
                poses[joint.parent] * joint.origin * joint_transform(&joint.axis, joint.is_prismatic, q);
        }
        Ok(poses)
    }

    fn weighted_com(&self, poses: &[Isometry3<f64>]) -> Vector3<f64> {
        if self.total_mass <= 0.0 {
            return poses[0].translation.vector;
        }
        let moment: Vector3<f64> = self
            .bodies
            .iter()
            .zip(poses)
            .map(|(body, pose)| (pose * Point3::from(body.com)).coords * body.mass)
            .sum();
        moment / self.total_mass
    }
}

/// Motion axis of a joint. Rigid joints ignore the axis, so a degenerate one
/// falls back to x.
fn joint_axis(joint: &JointData) -> Result<UnitVector3<f64>, RbdError> {
    match UnitVector3::try_new(Vector3::from(joint.axis), AXIS_EPSILON) {
        Some(axis) => Ok(axis),
        None if joint.joint_type.is_actuated() => {
            Err(RbdError::DegenerateAxis(joint.name.clone()))
        }
        None => Ok(Vector3::x_axis()),
    }
}

fn link_com(link: &stride_urdf::LinkData) -> Vector3<f64> {
    link.inertial
        .as_ref()
        .map_or_else(Vector3::zeros, |i| Vector3::from(i.origin.xyz))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
