//! Swing leg trajectory generation.
//!
//! While a foot swings it follows a trajectory from its liftoff position to a
//! target landing position, with a smooth height profile on top.
//!
//! The default [`BezierSwing`] uses 12-point (degree-11) Bezier curves for
//! both horizontal interpolation and height profile. The control points are
//! arranged to guarantee zero velocity and acceleration at liftoff (t=0) and
//! touchdown (t=1).

use nalgebra::Vector3;

// 12-point Bezier for horizontal interpolation (S-curve from 0 to 1).
// First 3 and last 3 control points are equal → zero velocity and acceleration
// at both endpoints.
const BEZIER_S: [f64; 12] = [
    0.0, 0.0, 0.0, // zero vel/accel at start
    0.5, 0.5, // transition
    0.5, 0.5, // midpoint plateau
    0.5, 0.5, // transition
    1.0, 1.0, 1.0, // zero vel/accel at end
];

// 12-point Bezier for height profile (peaks at t=0.5).
// First 3 and last 3 are 0 → zero height + zero vel/accel at endpoints.
const BEZIER_H: [f64; 12] = [
    0.0, 0.0, 0.0, // zero at liftoff
    0.9, 0.9, // rise
    1.0, 1.0, // peak
    0.9, 0.9, // descent
    0.0, 0.0, 0.0, // zero at touchdown
];

// bezier_eval(&BEZIER_H, 0.5), used to scale the profile peak to step_height.
const BEZIER_H_PEAK: f64 = 0.886_230_468_75;

/// Swing durations below this are treated as instantaneous.
const MIN_SWING_DURATION: f64 = 1e-10;

/// De Casteljau evaluation of a Bezier curve of any degree.
fn de_casteljau<const N: usize>(mut work: [f64; N], t: f64) -> f64 {
    for k in 1..N {
        for i in 0..(N - k) {
            work[i] = work[i] * (1.0 - t) + work[i + 1] * t;
        }
    }
    work[0]
}

/// Evaluate a degree-11 Bezier curve at parameter `t`.
fn bezier_eval(points: &[f64; 12], t: f64) -> f64 {
    de_casteljau(*points, t)
}

/// First derivative of a degree-11 Bezier curve at parameter `t`.
///
/// Hodograph property: B'(t) = 11 * degree-10 Bezier on the forward
/// differences of the control points.
fn bezier_derivative(points: &[f64; 12], t: f64) -> f64 {
    let mut diffs = [0.0; 11];
    for (i, d) in diffs.iter_mut().enumerate() {
        *d = points[i + 1] - points[i];
    }
    11.0 * de_casteljau(diffs, t)
}

/// Second derivative of a degree-11 Bezier curve at parameter `t`.
///
/// B''(t) = 11 * 10 * degree-9 Bezier on the second differences.
fn bezier_second_derivative(points: &[f64; 12], t: f64) -> f64 {
    let mut diffs = [0.0; 10];
    for (i, d) in diffs.iter_mut().enumerate() {
        *d = points[i + 2] - 2.0 * points[i + 1] + points[i];
    }
    110.0 * de_casteljau(diffs, t)
}

/// Compute a swing foot position.
///
/// # Arguments
/// * `start` - Foot position at liftoff
/// * `target` - Foot position at touchdown
/// * `phase` - Swing phase in [0, 1] (0=liftoff, 1=touchdown)
/// * `step_height` - Maximum height above the straight-line path
pub fn swing_foot_position(
    start: &Vector3<f64>,
    target: &Vector3<f64>,
    phase: f64,
    step_height: f64,
) -> Vector3<f64> {
    let t = phase.clamp(0.0, 1.0);
    let s = bezier_eval(&BEZIER_S, t);
    let height_offset = bezier_eval(&BEZIER_H, t) * (step_height / BEZIER_H_PEAK);

    let mut pos = start + (target - start) * s;
    pos.z += height_offset;
    pos
}

/// Compute the swing foot velocity at a given phase.
///
/// Uses the hodograph of the Bezier curves, scaled by 1/swing_duration to
/// convert from parametric to time domain.
pub fn swing_foot_velocity(
    start: &Vector3<f64>,
    target: &Vector3<f64>,
    phase: f64,
    step_height: f64,
    swing_duration: f64,
) -> Vector3<f64> {
    if swing_duration < MIN_SWING_DURATION {
        return Vector3::zeros();
    }
    let t = phase.clamp(0.0, 1.0);
    let inv_dur = 1.0 / swing_duration;

    let ds_dt = bezier_derivative(&BEZIER_S, t) * inv_dur;
    let dh_dt = bezier_derivative(&BEZIER_H, t) * (step_height / BEZIER_H_PEAK) * inv_dur;

    let mut vel = (target - start) * ds_dt;
    vel.z += dh_dt;
    vel
}

/// Compute the swing foot acceleration at a given phase.
///
/// Second hodograph of the Bezier curves, scaled by 1/swing_duration^2.
pub fn swing_foot_acceleration(
    start: &Vector3<f64>,
    target: &Vector3<f64>,
    phase: f64,
    step_height: f64,
    swing_duration: f64,
) -> Vector3<f64> {
    if swing_duration < MIN_SWING_DURATION {
        return Vector3::zeros();
    }
    let t = phase.clamp(0.0, 1.0);
    let inv_dur2 = swing_duration.powi(-2);

    let d2s_dt2 = bezier_second_derivative(&BEZIER_S, t) * inv_dur2;
    let d2h_dt2 =
        bezier_second_derivative(&BEZIER_H, t) * (step_height / BEZIER_H_PEAK) * inv_dur2;

    let mut acc = (target - start) * d2s_dt2;
    acc.z += d2h_dt2;
    acc
}

/// Timing and clearance of one swing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepParameters {
    /// Swing duration in seconds.
    pub duration: f64,
    /// Foot clearance at mid-swing in meters.
    pub step_height: f64,
}

impl StepParameters {
    pub fn new(duration: f64, step_height: f64) -> Self {
        Self {
            duration,
            step_height,
        }
    }
}

/// Foot position, velocity and acceleration at one instant of a swing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwingSample {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub acceleration: Vector3<f64>,
}

/// Generator of swing foot trajectories.
///
/// `configure` is called once per swing; `generate` is then queried at
/// absolute times within `[start_time, start_time + duration]`.
pub trait SwingPatternGenerator {
    fn configure(
        &mut self,
        start_time: f64,
        start: &Vector3<f64>,
        target: &Vector3<f64>,
        params: &StepParameters,
    );

    fn generate(&self, time: f64) -> SwingSample;
}

/// Bezier swing trajectory (see the module docs).
#[derive(Clone, Debug)]
pub struct BezierSwing {
    start_time: f64,
    start: Vector3<f64>,
    target: Vector3<f64>,
    params: StepParameters,
}

impl Default for BezierSwing {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            start: Vector3::zeros(),
            target: Vector3::zeros(),
            params: StepParameters::new(0.0, 0.0),
        }
    }
}

impl BezierSwing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swing phase in [0, 1] at absolute `time`.
    fn phase(&self, time: f64) -> f64 {
        if self.params.duration < MIN_SWING_DURATION {
            return 1.0;
        }
        ((time - self.start_time) / self.params.duration).clamp(0.0, 1.0)
    }
}

impl SwingPatternGenerator for BezierSwing {
    fn configure(
        &mut self,
        start_time: f64,
        start: &Vector3<f64>,
        target: &Vector3<f64>,
        params: &StepParameters,
    ) {
        self.start_time = start_time;
        self.start = *start;
        self.target = *target;
        self.params = *params;
    }

    fn generate(&self, time: f64) -> SwingSample {
        let phase = self.phase(time);
        let StepParameters {
            duration,
            step_height,
        } = self.params;
        SwingSample {
            position: swing_foot_position(&self.start, &self.target, phase, step_height),
            velocity: swing_foot_velocity(&self.start, &self.target, phase, step_height, duration),
            acceleration: swing_foot_acceleration(
                &self.start,
                &self.target,
                phase,
                step_height,
                duration,
            ),
        }
    }
}
