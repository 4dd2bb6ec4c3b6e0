//! Core data types for the in-memory robot description.
//!
//! The kinematic tree and mass distribution of a robot, independent of the
//! XML parsing layer.

use std::collections::HashMap;

use crate::error::UrdfError;

// ---------------------------------------------------------------------------
// JointType
// ---------------------------------------------------------------------------

/// URDF joint type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointType {
    /// Rotation about a single axis, with position limits.
    Revolute,
    /// Unlimited rotation about a single axis.
    Continuous,
    /// Translation along an axis, with position limits.
    Prismatic,
    /// No relative motion between parent and child.
    Fixed,
    /// Unconstrained 6-DOF joint. Treated as rigid inside the tree; the
    /// floating base is modeled separately.
    Floating,
    /// Planar joint. Treated as rigid inside the tree.
    Planar,
}

impl JointType {
    /// Whether this joint type contributes a joint coordinate.
    pub const fn is_actuated(self) -> bool {
        matches!(self, Self::Revolute | Self::Continuous | Self::Prismatic)
    }
}

// ---------------------------------------------------------------------------
// Origin
// ---------------------------------------------------------------------------

/// A 3D pose specified as position + roll-pitch-yaw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Origin {
    /// Translation `[x, y, z]` in meters.
    pub xyz: [f64; 3],
    /// Rotation `[roll, pitch, yaw]` in radians.
    pub rpy: [f64; 3],
}

// ---------------------------------------------------------------------------
// Inertial
// ---------------------------------------------------------------------------

/// Inertial properties of a link.
#[derive(Debug, Clone, Default)]
pub struct Inertial {
    /// Center of mass frame relative to the link frame.
    pub origin: Origin,
    /// Mass in kilograms.
    pub mass: f64,
    /// Inertia tensor elements `[ixx, ixy, ixz, iyy, iyz, izz]`.
    pub inertia: [f64; 6],
}

// ---------------------------------------------------------------------------
// LinkData
// ---------------------------------------------------------------------------

/// In-memory representation of a URDF link.
#[derive(Debug, Clone)]
pub struct LinkData {
    /// Link name.
    pub name: String,
    /// Inertial properties. `None` for massless links.
    pub inertial: Option<Inertial>,
}

impl LinkData {
    /// Create a massless link.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inertial: None,
        }
    }

    /// Link mass, zero for massless links.
    pub fn mass(&self) -> f64 {
        self.inertial.as_ref().map_or(0.0, |i| i.mass)
    }
}

// ---------------------------------------------------------------------------
// JointData
// ---------------------------------------------------------------------------

/// In-memory representation of a URDF joint.
#[derive(Debug, Clone)]
pub struct JointData {
    /// Joint name.
    pub name: String,
    /// Joint type.
    pub joint_type: JointType,
    /// Parent link name.
    pub parent: String,
    /// Child link name.
    pub child: String,
    /// Joint origin relative to parent link.
    pub origin: Origin,
    /// Joint axis (unit vector, default `[1, 0, 0]` as in urdf-rs).
    pub axis: [f64; 3],
}

// ---------------------------------------------------------------------------
// RobotModel
// ---------------------------------------------------------------------------

/// Complete in-memory representation of a URDF robot.
///
/// The root link is taken as the floating base of a legged robot.
#[derive(Debug, Clone)]
pub struct RobotModel {
    /// Robot name.
    pub name: String,
    /// All links, keyed by name.
    pub links: HashMap<String, LinkData>,
    /// All joints, keyed by name.
    pub joints: HashMap<String, JointData>,
    /// Name of the root link (the one never referenced as a child).
    pub root_link: String,
}

impl RobotModel {
    /// Get a link by name.
    pub fn link(&self, name: &str) -> Result<&LinkData, UrdfError> {
        self.links
            .get(name)
            .ok_or_else(|| UrdfError::MissingLink(name.into()))
    }

    /// Get a joint by name.
    pub fn joint(&self, name: &str) -> Result<&JointData, UrdfError> {
        self.joints
            .get(name)
            .ok_or_else(|| UrdfError::MissingJoint(name.into()))
    }

    /// Iterate over actuatable joints (revolute, continuous, prismatic).
    pub fn actuated_joints(&self) -> impl Iterator<Item = &JointData> {
        self.joints.values().filter(|j| j.joint_type.is_actuated())
    }

    /// Number of actuatable degrees of freedom.
    pub fn dof(&self) -> usize {
        self.actuated_joints().count()
    }

    /// Names of all joints, sorted alphabetically.
    pub fn joint_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.joints.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Names of actuated joints, sorted alphabetically.
    pub fn actuated_joint_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actuated_joints().map(|j| j.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Joints whose parent is `link`, sorted by joint name.
    pub fn child_joints(&self, link: &str) -> Vec<&JointData> {
        let mut children: Vec<&JointData> =
            self.joints.values().filter(|j| j.parent == link).collect();
        children.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        children
    }

    /// Links with no child joints (excluding the root), sorted by name.
    ///
    /// For a legged robot these are the feet.
    pub fn leaf_links(&self) -> Vec<&str> {
        let mut leaves: Vec<&str> = self
            .links
            .keys()
            .map(String::as_str)
            .filter(|name| *name != self.root_link)
            .filter(|name| !self.joints.values().any(|j| j.parent == *name))
            .collect();
        leaves.sort_unstable();
        leaves
    }

    /// Sum of all link masses.
    pub fn total_mass(&self) -> f64 {
        self.links.values().map(LinkData::mass).sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
