//! Foothold scoring features.

use nalgebra::{Vector2, Vector3};

use crate::error::TerrainError;
use crate::height_map::HeightMap;

/// Planar pose of the robot: position on the ground and heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotPose {
    pub position: Vector2<f64>,
    /// Yaw in radians.
    pub yaw: f64,
}

impl RobotPose {
    pub fn new(x: f64, y: f64, yaw: f64) -> Self {
        Self {
            position: Vector2::new(x, y),
            yaw,
        }
    }
}

/// Planned foothold of one leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Foothold {
    /// Index of the leg.
    pub leg: usize,
    /// Foothold position in the world frame.
    pub position: Vector3<f64>,
}

/// Rectangular search area, relative to a leg's nominal stance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchArea {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    /// Spacing of the scan grid in meters.
    pub grid_resolution: f64,
}

impl SearchArea {
    /// Square area of half-width `half_size` around the nominal stance.
    pub fn square(half_size: f64, grid_resolution: f64) -> Self {
        Self {
            min_x: -half_size,
            max_x: half_size,
            min_y: -half_size,
            max_y: half_size,
            grid_resolution,
        }
    }
}

/// Everything a feature needs to score one foothold.
#[derive(Debug, Clone)]
pub struct RobotAndTerrain {
    pub pose: RobotPose,
    pub foothold: Foothold,
    pub height_map: HeightMap,
}

/// A scoring function over footholds. Higher is better; penalties are
/// negative.
pub trait Feature {
    fn name(&self) -> &str;

    fn compute_reward(&self, info: &RobotAndTerrain) -> Result<f64, TerrainError>;
}
