use thiserror::Error;

/// Terrain errors.
#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("Invalid resolution: {0} (must be > 0)")]
    InvalidResolution(f64),

    #[error("Unknown leg {leg} (robot has {count} legs)")]
    UnknownLeg { leg: usize, count: usize },
}
