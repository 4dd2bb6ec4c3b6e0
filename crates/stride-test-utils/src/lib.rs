//! Shared test fixtures and utilities for Stride crates.
//!
//! Provides a reference quadruped description, whole-body state builders and
//! deterministic RNG setup.

pub mod rng;
pub mod robots;
pub mod states;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use rng::seeded_rng;
pub use robots::{QUADRUPED_FEET, QUADRUPED_URDF, quadruped};
pub use states::{random_whole_body_state, standing_state};
