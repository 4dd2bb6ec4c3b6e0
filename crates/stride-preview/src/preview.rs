//! Multi-phase preview controller.
//!
//! [`PreviewLocomotion`] composes stance and flight phases into one sampled
//! trajectory of the reduced model, then injects the swing and stance foot
//! motion on top of it:
//!
//! ```text
//! for each phase:
//!     initial = caller state (first phase) | last sample of previous phase
//!     samples = stance_preview(initial) | flight_preview(initial)
//!     add_swing_pattern(samples, initial)
//!     trajectory += samples
//! ```
//!
//! Samples of a phase cover `(t0, t0 + T]`, so consecutive phases never share
//! a sample time.

use std::path::Path;

use nalgebra::{Vector2, Vector3};
use stride_rbd::{BodyVector3, ContactDynamics, FloatingBaseSystem};
use tracing::{debug, info, warn};

use crate::config::{PreviewConfig, SlipModel};
use crate::error::PreviewError;
use crate::models::{
    HeadingMotion, HorizontalSlip, Projectile, SpringMass, slip_frequency, spring_frequency,
};
use crate::swing::{BezierSwing, StepParameters, SwingPatternGenerator};
use crate::types::{MultiPhasePreviewControl, Phase, PreviewControl, PreviewState, PreviewTrajectory};

/// Standard gravity used until a robot model provides its own.
const DEFAULT_GRAVITY: f64 = 9.81;

/// Slack on `T / dt` so float noise does not add a sample.
const SAMPLE_TOLERANCE: f64 = 1e-9;

/// Upper bound on the samples of a single phase.
pub const MAX_PHASE_SAMPLES: usize = 10_000_000;

/// Number of samples covering a phase of `duration` at `sample_time` spacing.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn sample_count(duration: f64, sample_time: f64) -> usize {
    ((duration / sample_time) - SAMPLE_TOLERANCE).ceil().max(0.0) as usize
}

/// Sample times relative to the phase start: `dt, 2 dt, ..., T`.
#[allow(clippy::cast_precision_loss)]
fn relative_times(duration: f64, sample_time: f64) -> impl Iterator<Item = f64> {
    (1..=sample_count(duration, sample_time))
        .map(move |k| (k as f64 * sample_time).min(duration))
}

/// Reduced-order locomotion preview controller.
///
/// Owns the model parameters (sample period, SLIP model, gravity, total mass)
/// and the collaborators: the rigid-body model used by the whole-body
/// translators, the contact dynamics and the swing pattern generator.
#[derive(Debug, Clone)]
pub struct PreviewLocomotion<G = BezierSwing> {
    config: PreviewConfig,
    system: Option<FloatingBaseSystem>,
    dynamics: ContactDynamics,
    swing: G,
    gravity: f64,
    mass: f64,
}

impl PreviewLocomotion<BezierSwing> {
    /// Controller with the Bezier swing generator and no robot model.
    pub fn new(config: PreviewConfig) -> Self {
        Self::with_swing_generator(config, BezierSwing::new())
    }
}

impl Default for PreviewLocomotion<BezierSwing> {
    fn default() -> Self {
        Self::new(PreviewConfig::default())
    }
}

impl<G: SwingPatternGenerator> PreviewLocomotion<G> {
    /// Controller with a custom swing generator and no robot model.
    pub fn with_swing_generator(config: PreviewConfig, swing: G) -> Self {
        Self {
            config,
            system: None,
            dynamics: ContactDynamics::new(),
            swing,
            gravity: DEFAULT_GRAVITY,
            mass: 0.0,
        }
    }

    // -----------------------------------------------------------------------
    // Model setup
    // -----------------------------------------------------------------------

    /// Load the robot model from URDF text.
    pub fn reset_from_urdf_model(&mut self, urdf: &str) -> Result<(), PreviewError> {
        self.reset_from_system(FloatingBaseSystem::from_urdf_str(urdf)?)
    }

    /// Load the robot model from a URDF file.
    pub fn reset_from_urdf_file(&mut self, path: impl AsRef<Path>) -> Result<(), PreviewError> {
        self.reset_from_system(FloatingBaseSystem::from_urdf_file(path)?)
    }

    /// Install an already built rigid-body model.
    ///
    /// The end-effector override of the configuration, if any, replaces the
    /// model's default feet.
    pub fn reset_from_system(&mut self, system: FloatingBaseSystem) -> Result<(), PreviewError> {
        self.config.validate()?;
        let system = match &self.config.end_effectors {
            Some(names) => system.with_end_effectors(names)?,
            None => system,
        };
        self.gravity = system.gravity().norm();
        self.mass = system.total_mass();
        info!(
            robot = system.name(),
            mass = self.mass,
            gravity = self.gravity,
            dof = system.joint_dof(),
            feet = ?system.end_effector_names(),
            "Loaded robot model"
        );
        self.system = Some(system);
        Ok(())
    }

    /// Use a point-mass model without a rigid-body description.
    ///
    /// Previews work as usual; the whole-body translators need a full model
    /// and keep failing with [`PreviewError::ModelNotLoaded`].
    pub fn set_point_mass(&mut self, mass: f64, gravity: f64) {
        self.mass = mass;
        self.gravity = gravity;
    }

    /// Replace the whole configuration.
    pub fn set_config(&mut self, config: PreviewConfig) -> Result<(), PreviewError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn set_sample_time(&mut self, sample_time: f64) {
        self.config.sample_time = sample_time;
    }

    pub fn set_model(&mut self, slip: SlipModel) {
        self.config.slip = slip;
    }

    pub fn set_step_height(&mut self, step_height: f64) {
        self.config.step_height = step_height;
    }

    pub fn set_force_threshold(&mut self, force_threshold: f64) {
        self.config.force_threshold = force_threshold;
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn sample_time(&self) -> f64 {
        self.config.sample_time
    }

    pub fn slip_model(&self) -> &SlipModel {
        &self.config.slip
    }

    pub fn step_height(&self) -> f64 {
        self.config.step_height
    }

    pub fn force_threshold(&self) -> f64 {
        self.config.force_threshold
    }

    /// Gravity magnitude in m/s^2.
    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Total mass in kg, zero until a model is loaded.
    pub fn total_mass(&self) -> f64 {
        self.mass
    }

    pub fn system(&self) -> Option<&FloatingBaseSystem> {
        self.system.as_ref()
    }

    pub fn dynamics(&self) -> &ContactDynamics {
        &self.dynamics
    }

    pub fn swing_generator(&self) -> &G {
        &self.swing
    }

    /// CoM of the floating base in the base frame.
    ///
    /// A fallback CoM offset for callers that have no whole-body state to
    /// derive the actual one from.
    pub fn default_system_com(&self) -> Result<Vector3<f64>, PreviewError> {
        Ok(self.loaded_system()?.floating_base_com())
    }

    pub(crate) fn loaded_system(&self) -> Result<&FloatingBaseSystem, PreviewError> {
        self.system.as_ref().ok_or(PreviewError::ModelNotLoaded)
    }

    // -----------------------------------------------------------------------
    // Preview
    // -----------------------------------------------------------------------

    /// Preview a sequence of stance and flight phases.
    ///
    /// `system_com` is the system CoM in the base frame, as returned by
    /// [`from_whole_body_state`](Self::from_whole_body_state). It anchors the
    /// feet that stay planted.
    pub fn multi_phase_preview(
        &mut self,
        state: &PreviewState,
        plan: &MultiPhasePreviewControl,
        system_com: &Vector3<f64>,
    ) -> Result<PreviewTrajectory, PreviewError> {
        self.config.validate()?;
        if plan.is_empty() {
            return Err(PreviewError::EmptyPlan);
        }
        let dt = self.config.sample_time;
        for (index, phase) in plan.iter().enumerate() {
            validate_phase(index, phase.duration(), dt)?;
            if let Some(foot) = unknown_foot(state, phase.control()) {
                return Err(PreviewError::UnknownFoot(foot.clone()));
            }
        }
        if plan.iter().any(Phase::is_stance) {
            self.check_mass()?;
        }

        let capacity = plan
            .iter()
            .map(|phase| sample_count(phase.duration(), dt))
            .fold(0_usize, usize::saturating_add)
            .min(MAX_PHASE_SAMPLES);
        let mut trajectory = PreviewTrajectory::with_capacity(capacity);

        let mut current = state.clone();
        for (index, phase) in plan.iter().enumerate() {
            let control = phase.control();
            let mut samples = match phase {
                Phase::Stance(control) => self.stance_samples(&current, control),
                Phase::Flight(control) => self.flight_samples(&current, control),
            };
            self.add_swing_pattern(&mut samples, &current, control, system_com)?;
            debug!(
                phase = index,
                flight = phase.is_flight(),
                duration = control.duration,
                samples = samples.len(),
                swinging = control.foot_target.len(),
                "Previewed phase"
            );

            if let Some(last) = samples.last() {
                current = last.clone();
            }
            trajectory.extend(samples);
        }
        Ok(trajectory)
    }

    /// Preview one SLIP stance phase.
    ///
    /// Samples carry the CoM and heading motion and the CoP moving linearly
    /// to `control.terminal_cop`. Every foot without a target supports the
    /// robot. The foot fields keep the values of `state` until
    /// [`add_swing_pattern`](Self::add_swing_pattern) fills them.
    pub fn stance_preview(
        &self,
        state: &PreviewState,
        control: &PreviewControl,
    ) -> Result<PreviewTrajectory, PreviewError> {
        self.config.validate()?;
        validate_phase(0, control.duration, self.config.sample_time)?;
        self.check_mass()?;
        Ok(self.stance_samples(state, control))
    }

    /// Preview one ballistic flight phase.
    pub fn flight_preview(
        &self,
        state: &PreviewState,
        control: &PreviewControl,
    ) -> Result<PreviewTrajectory, PreviewError> {
        self.config.validate()?;
        validate_phase(0, control.duration, self.config.sample_time)?;
        Ok(self.flight_samples(state, control))
    }

    /// Fill the foot fields of a previewed phase.
    ///
    /// Feet with a target in `control.foot_target` follow the swing
    /// generator from their position in `state` to the target and leave the
    /// support region. The other feet stay fixed in the world, so their
    /// base-frame position moves opposite to the base; support region entries
    /// of those feet follow the same motion.
    pub fn add_swing_pattern(
        &mut self,
        trajectory: &mut [PreviewState],
        state: &PreviewState,
        control: &PreviewControl,
        system_com: &Vector3<f64>,
    ) -> Result<(), PreviewError> {
        if let Some(unknown) = unknown_foot(state, control) {
            return Err(PreviewError::UnknownFoot(unknown.clone()));
        }

        let params = StepParameters::new(control.duration, self.config.step_height);
        let end_time = state.time + control.duration;
        let initial_base = state.com_pos - system_com;

        for (foot, initial_pos) in &state.foot_pos {
            if let Some(target) = control.foot_target.get(foot) {
                self.swing.configure(state.time, initial_pos, target, &params);
                for sample in trajectory.iter_mut() {
                    let swing = self.swing.generate(sample.time.min(end_time));
                    sample.foot_pos.insert(foot.clone(), swing.position);
                    sample.foot_vel.insert(foot.clone(), swing.velocity);
                    sample.foot_acc.insert(foot.clone(), swing.acceleration);
                    sample.support_region.remove(foot);
                }
            } else {
                let anchor = initial_pos + initial_base;
                for sample in trajectory.iter_mut() {
                    let pos = anchor - (sample.com_pos - system_com);
                    if let Some(support) = sample.support_region.get_mut(foot) {
                        *support = pos;
                    }
                    sample.foot_pos.insert(foot.clone(), pos);
                    sample.foot_vel.insert(foot.clone(), Vector3::zeros());
                    sample.foot_acc.insert(foot.clone(), Vector3::zeros());
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn check_mass(&self) -> Result<(), PreviewError> {
        if self.mass > 0.0 && self.gravity > 0.0 {
            Ok(())
        } else {
            Err(PreviewError::ModelNotLoaded)
        }
    }

    fn warn_partial_sample(&self, control: &PreviewControl) {
        let ratio = control.duration / self.config.sample_time;
        if (ratio - ratio.round()).abs() > SAMPLE_TOLERANCE {
            warn!(
                duration = control.duration,
                sample_time = self.config.sample_time,
                "Phase duration is not a multiple of the sample time, last sample is shortened"
            );
        }
    }

    fn stance_samples(&self, state: &PreviewState, control: &PreviewControl) -> PreviewTrajectory {
        self.warn_partial_sample(control);
        let duration = control.duration;
        let slip = &self.config.slip;

        let horizontal = HorizontalSlip::new(
            slip_frequency(self.gravity, slip.height),
            &state.com_pos.xy(),
            &state.com_vel.xy(),
            &state.cop.xy(),
            &control.terminal_cop,
            duration,
        );
        let vertical = SpringMass::new(
            spring_frequency(slip.stiffness, self.mass),
            self.gravity,
            state.com_pos.z,
            state.com_vel.z,
            (state.com_pos - state.cop).norm(),
            control.terminal_length,
            duration,
        );
        let heading = HeadingMotion::new(state.head_pos, state.head_vel, control.head_acc);
        let cop_shift = control.terminal_cop - state.cop.xy();
        let support: BodyVector3 = state
            .foot_pos
            .iter()
            .filter(|(foot, _)| !control.foot_target.contains_key(*foot))
            .map(|(foot, pos)| (foot.clone(), *pos))
            .collect();

        relative_times(duration, self.config.sample_time)
            .map(|t| {
                let mut sample = state.clone();
                sample.time = state.time + t;
                sample.com_pos = with_height(horizontal.position(t), vertical.position(t));
                sample.com_vel = with_height(horizontal.velocity(t), vertical.velocity(t));
                sample.com_acc = with_height(horizontal.acceleration(t), vertical.acceleration(t));
                (sample.head_pos, sample.head_vel, sample.head_acc) = heading.evaluate(t);
                sample.cop = with_height(state.cop.xy() + cop_shift * (t / duration), state.cop.z);
                sample.support_region.clone_from(&support);
                sample
            })
            .collect()
    }

    fn flight_samples(&self, state: &PreviewState, control: &PreviewControl) -> PreviewTrajectory {
        self.warn_partial_sample(control);
        let projectile = Projectile::new(state.com_pos, state.com_vel, self.gravity);
        let heading = HeadingMotion::new(state.head_pos, state.head_vel, 0.0);

        relative_times(control.duration, self.config.sample_time)
            .map(|t| {
                let mut sample = state.clone();
                sample.time = state.time + t;
                sample.com_pos = projectile.position(t);
                sample.com_vel = projectile.velocity(t);
                sample.com_acc = projectile.acceleration();
                (sample.head_pos, sample.head_vel, sample.head_acc) = heading.evaluate(t);
                sample.support_region = BodyVector3::new();
                sample
            })
            .collect()
    }
}

#[allow(clippy::cast_precision_loss)]
fn validate_phase(phase: usize, duration: f64, sample_time: f64) -> Result<(), PreviewError> {
    if duration <= 0.0 || !duration.is_finite() {
        return Err(PreviewError::InvalidDuration { phase, duration });
    }
    if duration / sample_time > MAX_PHASE_SAMPLES as f64 {
        return Err(PreviewError::TooManySamples {
            phase,
            duration,
            sample_time,
        });
    }
    Ok(())
}

/// First swing target naming a foot the state does not track.
fn unknown_foot<'a>(state: &PreviewState, control: &'a PreviewControl) -> Option<&'a String> {
    control
        .foot_target
        .keys()
        .find(|foot| !state.foot_pos.contains_key(*foot))
}

fn with_height(xy: Vector2<f64>, z: f64) -> Vector3<f64> {
    Vector3::new(xy.x, xy.y, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swing::SwingSample;
    use approx::assert_relative_eq;

    fn controller(sample_time: f64) -> PreviewLocomotion {
        let config = PreviewConfig {
            sample_time,
            slip: SlipModel {
                height: 0.6,
                stiffness: 1000.0,
            },
            ..PreviewConfig::default()
        };
        let mut controller = PreviewLocomotion::new(config);
        controller.set_point_mass(10.0, 9.81);
        controller
    }

    fn standing_state() -> PreviewState {
        let mut state = PreviewState {
            com_pos: Vector3::new(0.0, 0.0, 0.6),
            ..PreviewState::default()
        };
        state
            .foot_pos
            .insert("lf_foot".into(), Vector3::new(0.3, 0.15, -0.6));
        state
            .foot_pos
            .insert("rf_foot".into(), Vector3::new(0.3, -0.15, -0.6));
        state
    }

    #[test]
    fn sample_count_rounds_up() {
        assert_eq!(sample_count(0.5, 0.01), 50);
        assert_eq!(sample_count(0.3, 0.1), 3);
        assert_eq!(sample_count(0.25, 0.1), 3);
        assert_eq!(sample_count(0.001, 0.01), 1);
    }

    #[test]
    fn relative_times_end_at_duration() {
        let times: Vec<f64> = relative_times(0.25, 0.1).collect();
        assert_eq!(times.len(), 3);
        assert_relative_eq!(times[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(times[2], 0.25, epsilon = 1e-12);
    }

    #[test]
    fn stance_requires_mass() {
        let controller = PreviewLocomotion::new(PreviewConfig::default());
        let err = controller
            .stance_preview(&standing_state(), &PreviewControl::new(0.1))
            .unwrap_err();
        assert!(matches!(err, PreviewError::ModelNotLoaded));
    }

    #[test]
    fn flight_works_without_model() {
        let controller = PreviewLocomotion::new(PreviewConfig::default());
        let samples = controller
            .flight_preview(&standing_state(), &PreviewControl::new(0.1))
            .unwrap();
        assert_eq!(samples.len(), 100);
    }

    #[test]
    fn stance_sample_times() {
        let controller = controller(0.01);
        let mut state = standing_state();
        state.time = 1.0;
        let samples = controller
            .stance_preview(&state, &PreviewControl::new(0.2).with_terminal_length(0.6))
            .unwrap();
        assert_eq!(samples.len(), 20);
        assert_relative_eq!(samples[0].time, 1.01, epsilon = 1e-12);
        assert_relative_eq!(samples[19].time, 1.2, epsilon = 1e-12);
    }

    #[test]
    fn stance_cop_moves_to_terminal() {
        let controller = controller(0.01);
        let mut state = standing_state();
        state.cop = Vector3::new(0.02, -0.01, 0.0);
        let control = PreviewControl::new(0.1)
            .with_terminal_cop(0.06, 0.03)
            .with_terminal_length(0.6);
        let samples = controller.stance_preview(&state, &control).unwrap();

        assert_relative_eq!(samples[4].cop, Vector3::new(0.04, 0.01, 0.0), epsilon = 1e-12);
        assert_relative_eq!(samples[9].cop, Vector3::new(0.06, 0.03, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn cop_chains_across_stance_phases() {
        let mut controller = controller(0.01);
        let control = PreviewControl::new(0.2)
            .with_terminal_cop(0.05, 0.0)
            .with_terminal_length(0.6);
        let plan = MultiPhasePreviewControl::from(vec![control.clone(), control.clone()]);
        let samples = controller
            .multi_phase_preview(&standing_state(), &plan, &Vector3::zeros())
            .unwrap();
        assert_eq!(samples.len(), 40);

        let terminal = Vector3::new(0.05, 0.0, 0.0);
        assert_relative_eq!(samples[19].cop, terminal, epsilon = 1e-12);
        let resumed = controller.stance_preview(&samples[19], &control).unwrap();
        for (sample, expected) in samples[20..].iter().zip(&resumed) {
            assert_relative_eq!(sample.cop, terminal, epsilon = 1e-12);
            assert_relative_eq!(sample.com_pos, expected.com_pos, epsilon = 1e-12);
        }
    }

    #[test]
    fn stance_heading_constant_acceleration() {
        let controller = controller(0.01);
        let mut state = standing_state();
        state.head_vel = 0.2;
        let samples = controller
            .stance_preview(
                &state,
                &PreviewControl::new(0.5)
                    .with_terminal_length(0.6)
                    .with_head_acc(1.0),
            )
            .unwrap();
        let last = samples.last().unwrap();
        assert_relative_eq!(last.head_pos, 0.2 * 0.5 + 0.5 * 0.25, epsilon = 1e-12);
        assert_relative_eq!(last.head_vel, 0.7, epsilon = 1e-12);
        assert_relative_eq!(last.head_acc, 1.0);
    }

    #[test]
    fn flight_clears_support_region() {
        let controller = controller(0.01);
        let mut state = standing_state();
        state.support_region = state.foot_pos.clone();
        let samples = controller
            .flight_preview(&state, &PreviewControl::new(0.05))
            .unwrap();
        assert!(samples.iter().all(|s| s.support_region.is_empty()));
    }

    #[test]
    fn swing_unknown_foot_is_rejected() {
        let mut controller = controller(0.01);
        let state = standing_state();
        let control = PreviewControl::new(0.1).with_foot_target("tail", Vector3::zeros());
        let mut samples = controller.stance_preview(&state, &control).unwrap();
        let err = controller
            .add_swing_pattern(&mut samples, &state, &control, &Vector3::zeros())
            .unwrap_err();
        assert!(matches!(err, PreviewError::UnknownFoot(name) if name == "tail"));
    }

    #[test]
    fn swing_foot_reaches_target() {
        let mut controller = controller(0.01);
        let state = standing_state();
        let target = Vector3::new(0.4, 0.15, -0.6);
        let control = PreviewControl::new(0.3)
            .with_terminal_length(0.6)
            .with_foot_target("lf_foot", target);
        let mut samples = controller.stance_preview(&state, &control).unwrap();
        controller
            .add_swing_pattern(&mut samples, &state, &control, &Vector3::zeros())
            .unwrap();

        let last = samples.last().unwrap();
        assert_relative_eq!(last.foot_pos["lf_foot"], target, epsilon = 1e-9);
        assert_relative_eq!(last.foot_vel["lf_foot"].norm(), 0.0, epsilon = 1e-9);
        let mid = &samples[14];
        assert!(mid.foot_pos["lf_foot"].z > -0.6 + 0.05);
    }

    #[test]
    fn swing_foot_leaves_support_region() {
        let mut controller = controller(0.01);
        let mut state = standing_state();
        state.support_region = state.foot_pos.clone();
        let mut plan = MultiPhasePreviewControl::new();
        plan.push_stance(
            PreviewControl::new(0.3)
                .with_terminal_cop(0.03, 0.0)
                .with_terminal_length(0.6)
                .with_foot_target("lf_foot", Vector3::new(0.4, 0.15, -0.6)),
        );
        plan.push_stance(PreviewControl::new(0.2).with_terminal_length(0.6));
        let samples = controller
            .multi_phase_preview(&state, &plan, &Vector3::zeros())
            .unwrap();
        assert_eq!(samples.len(), 50);

        for sample in &samples[..30] {
            assert_eq!(sample.support_region.len(), 1);
            assert!(!sample.support_region.contains_key("lf_foot"));
            assert_eq!(sample.support_region["rf_foot"], sample.foot_pos["rf_foot"]);
        }
        // landed
        for sample in &samples[30..] {
            assert_eq!(sample.support_region.len(), 2);
            assert_eq!(sample.support_region["lf_foot"], sample.foot_pos["lf_foot"]);
            assert_eq!(sample.support_region["rf_foot"], sample.foot_pos["rf_foot"]);
        }
    }

    #[derive(Default)]
    struct CountingSwing {
        configured: usize,
    }

    impl SwingPatternGenerator for CountingSwing {
        fn configure(
            &mut self,
            _start_time: f64,
            _start: &Vector3<f64>,
            _target: &Vector3<f64>,
            _params: &StepParameters,
        ) {
            self.configured += 1;
        }

        fn generate(&self, _time: f64) -> SwingSample {
            SwingSample {
                position: Vector3::zeros(),
                velocity: Vector3::zeros(),
                acceleration: Vector3::zeros(),
            }
        }
    }

    #[test]
    fn unknown_foot_in_later_phase_fails_before_any_swing() {
        let mut controller = PreviewLocomotion::with_swing_generator(
            PreviewConfig::default(),
            CountingSwing::default(),
        );
        controller.set_point_mass(10.0, 9.81);
        let plan = MultiPhasePreviewControl::from(vec![
            PreviewControl::new(0.1).with_foot_target("lf_foot", Vector3::new(0.4, 0.15, -0.6)),
            PreviewControl::new(0.1).with_foot_target("tail", Vector3::zeros()),
        ]);
        let err = controller
            .multi_phase_preview(&standing_state(), &plan, &Vector3::zeros())
            .unwrap_err();
        assert!(matches!(err, PreviewError::UnknownFoot(name) if name == "tail"));
        assert_eq!(controller.swing_generator().configured, 0);
    }

    #[test]
    fn planted_foot_moves_against_base() {
        let mut controller = controller(0.01);
        let mut state = standing_state();
        state.com_vel = Vector3::new(0.3, 0.0, 0.0);
        let control = PreviewControl::new(0.1);
        let mut samples = controller.flight_preview(&state, &control).unwrap();
        let offset = Vector3::new(0.05, 0.0, 0.0);
        controller
            .add_swing_pattern(&mut samples, &state, &control, &offset)
            .unwrap();

        let initial_world = state.foot_pos["rf_foot"] + (state.com_pos - offset);
        for sample in &samples {
            let world = sample.foot_pos["rf_foot"] + (sample.com_pos - offset);
            assert_relative_eq!(world, initial_world, epsilon = 1e-12);
            assert_eq!(sample.foot_vel["rf_foot"], Vector3::zeros());
        }
    }

    #[test]
    fn empty_plan_is_rejected() {
        let mut controller = controller(0.01);
        let err = controller
            .multi_phase_preview(
                &standing_state(),
                &MultiPhasePreviewControl::new(),
                &Vector3::zeros(),
            )
            .unwrap_err();
        assert!(matches!(err, PreviewError::EmptyPlan));
    }

    #[test]
    fn invalid_duration_names_phase() {
        let mut controller = controller(0.01);
        let plan = MultiPhasePreviewControl::from(vec![
            PreviewControl::new(0.1),
            PreviewControl::new(0.1),
            PreviewControl::new(-0.2),
        ]);
        let err = controller
            .multi_phase_preview(&standing_state(), &plan, &Vector3::zeros())
            .unwrap_err();
        assert!(matches!(
            err,
            PreviewError::InvalidDuration { phase: 2, .. }
        ));
    }

    #[test]
    fn oversized_phase_is_rejected() {
        let mut controller = controller(0.01);
        let plan = MultiPhasePreviewControl::from(vec![
            PreviewControl::new(0.1),
            PreviewControl::new(1e300),
        ]);
        let err = controller
            .multi_phase_preview(&standing_state(), &plan, &Vector3::zeros())
            .unwrap_err();
        assert!(matches!(err, PreviewError::TooManySamples { phase: 1, .. }));

        let err = controller
            .flight_preview(&standing_state(), &PreviewControl::new(1e6))
            .unwrap_err();
        assert!(matches!(err, PreviewError::TooManySamples { phase: 0, .. }));
    }

    #[test]
    fn invalid_sample_time_is_rejected() {
        let mut controller = controller(0.01);
        controller.set_sample_time(0.0);
        let err = controller
            .stance_preview(&standing_state(), &PreviewControl::new(0.1))
            .unwrap_err();
        assert!(matches!(err, PreviewError::Config(_)));
    }

    #[test]
    fn translators_need_model() {
        let controller = controller(0.01);
        assert!(matches!(
            controller.default_system_com(),
            Err(PreviewError::ModelNotLoaded)
        ));
    }
}
