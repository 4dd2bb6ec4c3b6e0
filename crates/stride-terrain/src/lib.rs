//! Terrain representation and foothold features.
//!
//! A [`HeightMap`] discretizes the terrain into square cells of known height.
//! [`Feature`]s score a planned foothold against it; the
//! [`LegCollisionFeature`] penalizes footholds lying below the terrain the
//! leg sweeps through.

pub mod error;
pub mod feature;
pub mod height_map;
pub mod leg_collision;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use error::TerrainError;
pub use feature::{Feature, Foothold, RobotAndTerrain, RobotPose, SearchArea};
pub use height_map::{Cell, HeightMap};
pub use leg_collision::LegCollisionFeature;
