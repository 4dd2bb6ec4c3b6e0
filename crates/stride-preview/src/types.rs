//! Core types of the reduced-order preview.

use nalgebra::{Vector2, Vector3};
use stride_rbd::BodyVector3;

/// Reduced state of the robot at one preview sample.
///
/// Foot and support-region positions are expressed in the base frame. The
/// center of pressure lives in the world frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PreviewState {
    /// Time in seconds.
    pub time: f64,
    /// Center of mass position in world frame (meters).
    pub com_pos: Vector3<f64>,
    /// Center of mass velocity in world frame (m/s).
    pub com_vel: Vector3<f64>,
    /// Center of mass acceleration in world frame (m/s^2).
    pub com_acc: Vector3<f64>,
    /// Heading (yaw) angle in radians.
    pub head_pos: f64,
    pub head_vel: f64,
    pub head_acc: f64,
    /// Center of pressure in world frame.
    pub cop: Vector3<f64>,
    pub foot_pos: BodyVector3,
    pub foot_vel: BodyVector3,
    pub foot_acc: BodyVector3,
    /// Positions of the feet currently in contact.
    pub support_region: BodyVector3,
}

impl Default for PreviewState {
    fn default() -> Self {
        Self {
            time: 0.0,
            com_pos: Vector3::zeros(),
            com_vel: Vector3::zeros(),
            com_acc: Vector3::zeros(),
            head_pos: 0.0,
            head_vel: 0.0,
            head_acc: 0.0,
            cop: Vector3::zeros(),
            foot_pos: BodyVector3::new(),
            foot_vel: BodyVector3::new(),
            foot_acc: BodyVector3::new(),
            support_region: BodyVector3::new(),
        }
    }
}

/// Ordered preview samples. Each phase appends its samples to the end.
pub type PreviewTrajectory = Vec<PreviewState>;

/// Control parameters of a single preview phase.
#[derive(Clone, Debug, PartialEq)]
pub struct PreviewControl {
    /// Phase duration in seconds, must be positive.
    pub duration: f64,
    /// CoP (x, y) reached at the end of a stance phase.
    pub terminal_cop: Vector2<f64>,
    /// Spring length reached at the end of a stance phase.
    pub terminal_length: f64,
    /// Constant heading acceleration over the phase.
    pub head_acc: f64,
    /// Landing targets of the feet that swing during this phase.
    pub foot_target: BodyVector3,
}

impl PreviewControl {
    /// Control with the given duration and everything else zeroed.
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            terminal_cop: Vector2::zeros(),
            terminal_length: 0.0,
            head_acc: 0.0,
            foot_target: BodyVector3::new(),
        }
    }

    /// Set the terminal center of pressure.
    pub fn with_terminal_cop(mut self, x: f64, y: f64) -> Self {
        self.terminal_cop = Vector2::new(x, y);
        self
    }

    /// Set the terminal spring length.
    pub fn with_terminal_length(mut self, length: f64) -> Self {
        self.terminal_length = length;
        self
    }

    /// Set the heading acceleration.
    pub fn with_head_acc(mut self, head_acc: f64) -> Self {
        self.head_acc = head_acc;
        self
    }

    /// Make `foot` swing to `target` during this phase.
    pub fn with_foot_target(mut self, foot: impl Into<String>, target: Vector3<f64>) -> Self {
        self.foot_target.insert(foot.into(), target);
        self
    }
}

/// A preview phase: which reduced model applies, and with what control.
#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    /// SLIP stance: spring-loaded pendulum over the center of pressure.
    Stance(PreviewControl),
    /// Ballistic flight: no ground contact.
    Flight(PreviewControl),
}

impl Phase {
    pub fn control(&self) -> &PreviewControl {
        match self {
            Self::Stance(control) | Self::Flight(control) => control,
        }
    }

    pub fn duration(&self) -> f64 {
        self.control().duration
    }

    pub fn is_stance(&self) -> bool {
        matches!(self, Self::Stance(_))
    }

    pub fn is_flight(&self) -> bool {
        matches!(self, Self::Flight(_))
    }
}

/// Ordered sequence of preview phases.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiPhasePreviewControl {
    pub phases: Vec<Phase>,
}

impl MultiPhasePreviewControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stance phase.
    pub fn push_stance(&mut self, control: PreviewControl) -> &mut Self {
        self.phases.push(Phase::Stance(control));
        self
    }

    /// Append a flight phase.
    pub fn push_flight(&mut self, control: PreviewControl) -> &mut Self {
        self.phases.push(Phase::Flight(control));
        self
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Phase> {
        self.phases.iter()
    }

    /// Sum of the phase durations in seconds.
    pub fn total_duration(&self) -> f64 {
        self.phases.iter().map(Phase::duration).sum()
    }
}

/// A plain list of controls is an all-stance plan.
impl From<Vec<PreviewControl>> for MultiPhasePreviewControl {
    fn from(controls: Vec<PreviewControl>) -> Self {
        Self {
            phases: controls.into_iter().map(Phase::Stance).collect(),
        }
    }
}

impl FromIterator<Phase> for MultiPhasePreviewControl {
    fn from_iter<I: IntoIterator<Item = Phase>>(iter: I) -> Self {
        Self {
            phases: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MultiPhasePreviewControl {
    type Item = &'a Phase;
    type IntoIter = std::slice::Iter<'a, Phase>;

    fn into_iter(self) -> Self::IntoIter {
        self.phases.iter()
    }
}
