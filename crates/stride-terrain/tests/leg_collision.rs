//! Integration test: leg collision feature over synthetic terrain.
//!
//! A single leg with a nominal stance at (0.3, 0.15) and a ±0.1 m search
//! area, scanned every 2 cm over a 2 cm height map.

use approx::assert_relative_eq;
use nalgebra::{Vector2, Vector3};
use rand::Rng;
use std::f64::consts::FRAC_PI_2;
use stride_terrain::{
    Cell, Feature, Foothold, HeightMap, LegCollisionFeature, RobotAndTerrain, RobotPose, SearchArea,
    TerrainError,
};
use stride_test_utils::seeded_rng;

const RESOLUTION: f64 = 0.02;

fn feature() -> LegCollisionFeature {
    LegCollisionFeature::new(
        vec![SearchArea::square(0.1, RESOLUTION)],
        vec![Vector3::new(0.3, 0.15, -0.5)],
    )
}

fn info(pose: RobotPose, foothold_z: f64, height_map: HeightMap) -> RobotAndTerrain {
    RobotAndTerrain {
        pose,
        foothold: Foothold {
            leg: 0,
            position: Vector3::new(0.3, 0.15, foothold_z),
        },
        height_map,
    }
}

/// Flat ground at `height` plus a 3x3-cell block of `obstacle` height
/// centered on `center`.
fn terrain(height: f64, obstacle: Option<(Vector2<f64>, f64)>) -> HeightMap {
    let mut map = HeightMap::new(RESOLUTION).unwrap();
    for i in -50..50 {
        for j in -50..50 {
            map.insert_cell(Cell::new(i, j), height);
        }
    }
    if let Some((center, value)) = obstacle {
        let cell = map.coord_to_cell(&center);
        for dx in -1..=1 {
            for dy in -1..=1 {
                map.insert_cell(Cell::new(cell.x + dx, cell.y + dy), value);
            }
        }
    }
    map
}

#[test]
fn flat_terrain_has_no_penalty() {
    let reward = feature()
        .compute_reward(&info(RobotPose::new(0.0, 0.0, 0.0), 0.0, terrain(0.0, None)))
        .unwrap();
    assert_relative_eq!(reward, 0.0);
}

#[test]
fn obstacle_above_foothold_is_penalized() {
    let map = terrain(0.0, Some((Vector2::new(0.33, 0.15), 0.08)));
    let reward = feature()
        .compute_reward(&info(RobotPose::new(0.0, 0.0, 0.0), 0.01, map))
        .unwrap();
    assert_relative_eq!(reward, -0.07, epsilon = 1e-12);
}

#[test]
fn foothold_on_top_of_obstacle_is_fine() {
    let map = terrain(0.0, Some((Vector2::new(0.33, 0.15), 0.08)));
    let reward = feature()
        .compute_reward(&info(RobotPose::new(0.0, 0.0, 0.0), 0.1, map))
        .unwrap();
    assert_relative_eq!(reward, 0.0);
}

#[test]
fn obstacle_outside_area_is_ignored() {
    let map = terrain(0.0, Some((Vector2::new(-0.3, -0.3), 0.2)));
    let reward = feature()
        .compute_reward(&info(RobotPose::new(0.0, 0.0, 0.0), 0.0, map))
        .unwrap();
    assert_relative_eq!(reward, 0.0);
}

#[test]
fn missing_height_data_has_no_penalty() {
    let map = HeightMap::new(RESOLUTION).unwrap();
    let reward = feature()
        .compute_reward(&info(RobotPose::new(0.0, 0.0, 0.0), -1.0, map))
        .unwrap();
    assert_relative_eq!(reward, 0.0);
}

#[test]
fn area_turns_with_robot_heading() {
    // The nominal stance (0.3, 0.15) turned by 90 degrees lands on (-0.15, 0.3).
    let map = terrain(0.0, Some((Vector2::new(-0.15, 0.3), 0.05)));
    let turned = feature()
        .compute_reward(&info(RobotPose::new(0.0, 0.0, FRAC_PI_2), 0.0, map.clone()))
        .unwrap();
    assert_relative_eq!(turned, -0.05, epsilon = 1e-12);

    let straight = feature()
        .compute_reward(&info(RobotPose::new(0.0, 0.0, 0.0), 0.0, map))
        .unwrap();
    assert_relative_eq!(straight, 0.0);
}

#[test]
fn area_follows_robot_position() {
    let map = terrain(0.0, Some((Vector2::new(0.6, 0.15), 0.04)));
    let feature = feature();
    let near = feature
        .compute_reward(&info(RobotPose::new(0.0, 0.0, 0.0), 0.0, map.clone()))
        .unwrap();
    let moved = feature
        .compute_reward(&info(RobotPose::new(0.3, 0.0, 0.0), 0.0, map))
        .unwrap();
    assert_relative_eq!(near, 0.0);
    assert_relative_eq!(moved, -0.04, epsilon = 1e-12);
}

#[test]
fn rough_terrain_penalty_is_bounded() {
    let mut rng = seeded_rng(11);
    let mut map = HeightMap::new(RESOLUTION).unwrap();
    let mut global_max = f64::MIN;
    for i in -50..50 {
        for j in -50..50 {
            let height: f64 = rng.gen_range(0.0..0.1);
            global_max = global_max.max(height);
            map.insert_cell(Cell::new(i, j), height);
        }
    }

    let feature = feature();
    for foothold_z in [0.0, 0.05, 0.2] {
        let reward = feature
            .compute_reward(&info(RobotPose::new(0.0, 0.0, 0.3), foothold_z, map.clone()))
            .unwrap();
        assert!(reward <= 0.0);
        assert!(reward >= -(global_max - foothold_z).max(0.0) - 1e-12);
    }
}

#[test]
fn unknown_leg_is_rejected() {
    let mut info = info(RobotPose::new(0.0, 0.0, 0.0), 0.0, terrain(0.0, None));
    info.foothold.leg = 3;
    let err = feature().compute_reward(&info).unwrap_err();
    assert!(matches!(err, TerrainError::UnknownLeg { leg: 3, count: 1 }));
}
