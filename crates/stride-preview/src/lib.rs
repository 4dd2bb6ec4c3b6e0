//! Reduced-order locomotion preview for legged robots.
//!
//! Given the current robot state and a plan of stance and flight phases, this
//! crate predicts the CoM, heading and foot trajectories with closed-form
//! models:
//!
//! 1. **Stance**: a 2D spring-loaded inverted pendulum (SLIP) over a moving
//!    center of pressure, coupled with a vertical spring-mass oscillator
//! 2. **Flight**: ballistic CoM motion
//! 3. **Swing**: Bezier foot trajectories for the feet that step, while the
//!    others stay planted
//! 4. **Translation**: mapping between the reduced [`PreviewState`] and the
//!    whole-body [`WholeBodyState`](stride_rbd::WholeBodyState)
//!
//! # Usage
//!
//! ```ignore
//! let mut preview = PreviewLocomotion::new(PreviewConfig::default());
//! preview.reset_from_urdf_file("robot.urdf")?;
//!
//! let (state, system_com) = preview.from_whole_body_state(&full_state)?;
//! let plan = MultiPhasePreviewControl::from(vec![
//!     PreviewControl::new(0.3).with_terminal_length(0.5),
//! ]);
//! let trajectory = preview.multi_phase_preview(&state, &plan, &system_com)?;
//! let whole_body = preview.to_whole_body_trajectory(&trajectory, &full_state, &system_com)?;
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod preview;
pub mod swing;
pub mod translate;
pub mod types;

pub use config::{PreviewConfig, SlipModel};
pub use error::{ConfigError, PreviewError};
pub use models::{HeadingMotion, HorizontalSlip, Projectile, SpringMass};
pub use preview::{MAX_PHASE_SAMPLES, PreviewLocomotion, sample_count};
pub use swing::{
    BezierSwing, StepParameters, SwingPatternGenerator, SwingSample, swing_foot_acceleration,
    swing_foot_position, swing_foot_velocity,
};
pub use types::{
    MultiPhasePreviewControl, Phase, PreviewControl, PreviewState, PreviewTrajectory,
};
