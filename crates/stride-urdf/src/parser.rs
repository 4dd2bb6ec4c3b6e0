//! URDF XML parsing using `urdf-rs`.
//!
//! Converts `urdf_rs` types into the crate's canonical [`RobotModel`]
//! representation.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::UrdfError;
use crate::types::{Inertial, JointData, JointType, LinkData, Origin, RobotModel};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a URDF file from disk into a [`RobotModel`].
///
/// The whole file is read into memory before parsing.
pub fn parse_file(path: impl AsRef<Path>) -> Result<RobotModel, UrdfError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| UrdfError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_string(&content)
}

/// Parse a URDF XML string into a [`RobotModel`].
pub fn parse_string(xml: &str) -> Result<RobotModel, UrdfError> {
    let robot = urdf_rs::read_from_string(xml).map_err(|e| UrdfError::Parse(e.to_string()))?;
    convert_robot(&robot)
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

fn convert_robot(robot: &urdf_rs::Robot) -> Result<RobotModel, UrdfError> {
    let links: HashMap<String, LinkData> = robot
        .links
        .iter()
        .map(|l| (l.name.clone(), convert_link(l)))
        .collect();

    let joints: HashMap<String, JointData> = robot
        .joints
        .iter()
        .map(|j| convert_joint(j).map(|jd| (jd.name.clone(), jd)))
        .collect::<Result<_, _>>()?;

    for joint in joints.values() {
        for link in [&joint.parent, &joint.child] {
            if !links.contains_key(link) {
                return Err(UrdfError::MissingLink(link.clone()));
            }
        }
    }

    // Root link = a link that is never a child of any joint.
    let child_links: HashSet<&str> = joints.values().map(|j| j.child.as_str()).collect();
    let mut roots: Vec<String> = links
        .keys()
        .filter(|name| !child_links.contains(name.as_str()))
        .cloned()
        .collect();
    roots.sort_unstable();
    let root_link = match roots.len() {
        0 => return Err(UrdfError::NoRootLink),
        1 => roots.remove(0),
        _ => return Err(UrdfError::MultipleRoots(roots)),
    };

    Ok(RobotModel {
        name: robot.name.clone(),
        links,
        joints,
        root_link,
    })
}

fn convert_link(link: &urdf_rs::Link) -> LinkData {
    let inertial = &link.inertial;
    let i = &inertial.inertia;
    LinkData {
        name: link.name.clone(),
        inertial: (inertial.mass.value > 0.0).then(|| Inertial {
            origin: convert_pose(&inertial.origin),
            mass: inertial.mass.value,
            inertia: [i.ixx, i.ixy, i.ixz, i.iyy, i.iyz, i.izz],
        }),
    }
}

fn convert_joint(joint: &urdf_rs::Joint) -> Result<JointData, UrdfError> {
    Ok(JointData {
        name: joint.name.clone(),
        joint_type: convert_joint_type(&joint.joint_type)?,
        parent: joint.parent.link.clone(),
        child: joint.child.link.clone(),
        origin: convert_pose(&joint.origin),
        axis: to_array(&joint.axis.xyz),
    })
}

fn convert_joint_type(jt: &urdf_rs::JointType) -> Result<JointType, UrdfError> {
    match jt {
        urdf_rs::JointType::Revolute => Ok(JointType::Revolute),
        urdf_rs::JointType::Continuous => Ok(JointType::Continuous),
        urdf_rs::JointType::Prismatic => Ok(JointType::Prismatic),
        urdf_rs::JointType::Fixed => Ok(JointType::Fixed),
        urdf_rs::JointType::Floating => Ok(JointType::Floating),
        urdf_rs::JointType::Planar => Ok(JointType::Planar),
        urdf_rs::JointType::Spherical => Err(UrdfError::UnsupportedJointType("Spherical".into())),
    }
}

fn convert_pose(pose: &urdf_rs::Pose) -> Origin {
    Origin {
        xyz: to_array(&pose.xyz),
        rpy: to_array(&pose.rpy),
    }
}

const fn to_array(v: &[f64; 3]) -> [f64; 3] {
    [v[0], v[1], v[2]]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
