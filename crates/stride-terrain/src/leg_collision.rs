//! Potential collision of a swinging leg with the terrain.

use nalgebra::{Rotation2, Vector2, Vector3};
use tracing::trace;

use crate::error::TerrainError;
use crate::feature::{Feature, RobotAndTerrain, SearchArea};

/// Penalizes footholds that lie below the terrain around the leg.
///
/// The leg's work area (its [`SearchArea`] offset by the nominal stance and
/// the robot position, rotated by the robot yaw) is scanned for the highest
/// known terrain. The reward is `-(max_height - foothold.z)` when that
/// terrain is above the foothold and `0` otherwise, including when the area
/// has no height data.
#[derive(Debug, Clone)]
pub struct LegCollisionFeature {
    leg_areas: Vec<SearchArea>,
    /// Nominal foot position of each leg relative to the robot, in meters.
    nominal_stance: Vec<Vector3<f64>>,
}

impl LegCollisionFeature {
    pub fn new(leg_areas: Vec<SearchArea>, nominal_stance: Vec<Vector3<f64>>) -> Self {
        Self {
            leg_areas,
            nominal_stance,
        }
    }

    pub fn num_legs(&self) -> usize {
        self.leg_areas.len().min(self.nominal_stance.len())
    }

    /// Highest known terrain in the work area of `leg`, `None` if the area
    /// has no height data.
    pub fn max_height(&self, info: &RobotAndTerrain) -> Result<Option<f64>, TerrainError> {
        let leg = info.foothold.leg;
        let (Some(area), Some(stance)) = (self.leg_areas.get(leg), self.nominal_stance.get(leg))
        else {
            return Err(TerrainError::UnknownLeg {
                leg,
                count: self.num_legs(),
            });
        };

        let position = info.pose.position;
        let rotation = Rotation2::new(info.pose.yaw);
        let min = position + stance.xy() + Vector2::new(area.min_x, area.min_y);
        let max = position + stance.xy() + Vector2::new(area.max_x, area.max_y);

        let mut max_height: Option<f64> = None;
        for y in grid(min.y, max.y, area.grid_resolution) {
            for x in grid(min.x, max.x, area.grid_resolution) {
                let coord = rotation * (Vector2::new(x, y) - position) + position;
                if let Some(height) = info.height_map.height_at(&coord) {
                    max_height = Some(max_height.map_or(height, |h: f64| h.max(height)));
                }
            }
        }
        Ok(max_height)
    }
}

impl Feature for LegCollisionFeature {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "Potential Leg Collision"
    }

    fn compute_reward(&self, info: &RobotAndTerrain) -> Result<f64, TerrainError> {
        let Some(max_height) = self.max_height(info)? else {
            return Ok(0.0);
        };
        let clearance_deficit = max_height - info.foothold.position.z;
        trace!(
            leg = info.foothold.leg,
            max_height,
            clearance_deficit,
            "Leg collision check"
        );
        Ok(if clearance_deficit > 0.0 {
            -clearance_deficit
        } else {
            0.0
        })
    }
}

/// Grid coordinates `start, start + step, ...` strictly below `end`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn grid(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
    let count = if step > 0.0 && end > start {
        ((end - start) / step).ceil() as usize
    } else {
        0
    };
    (0..count)
        .map(move |i| start + i as f64 * step)
        .filter(move |v| *v < end)
}
