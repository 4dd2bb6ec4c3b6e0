//! Closed-form reduced-order dynamic models.
//!
//! Each model is built from the boundary conditions of one phase and then
//! evaluated at a time `t` relative to the phase start. Nothing here carries
//! state between phases.
//!
//! - [`HorizontalSlip`]: SLIP linearized about the nominal pendulum height,
//!   with a CoP moving linearly toward its terminal value
//! - [`SpringMass`]: vertical spring-mass oscillator with a linearly varying
//!   rest length
//! - [`Projectile`]: ballistic CoM motion under gravity
//! - [`HeadingMotion`]: constant-acceleration yaw

use nalgebra::{Vector2, Vector3};

/// Natural frequency `sqrt(g / height)` of the linearized pendulum.
pub fn slip_frequency(gravity: f64, height: f64) -> f64 {
    (gravity / height).sqrt()
}

/// Natural frequency `sqrt(stiffness / mass)` of the spring-mass system.
pub fn spring_frequency(stiffness: f64, mass: f64) -> f64 {
    (stiffness / mass).sqrt()
}

/// Horizontal SLIP response over one stance phase.
#[derive(Clone, Copy, Debug)]
pub struct HorizontalSlip {
    omega: f64,
    beta_1: Vector2<f64>,
    beta_2: Vector2<f64>,
    /// CoP drift per second.
    cop_rate: Vector2<f64>,
    cop: Vector2<f64>,
}

impl HorizontalSlip {
    /// # Arguments
    /// * `omega` - Pendulum natural frequency, see [`slip_frequency`]
    /// * `com_pos` / `com_vel` - Horizontal CoM state at the phase start
    /// * `cop` - Horizontal CoP at the phase start
    /// * `terminal_cop` - Planned horizontal CoP at the phase end
    /// * `duration` - Phase duration `T` (> 0)
    pub fn new(
        omega: f64,
        com_pos: &Vector2<f64>,
        com_vel: &Vector2<f64>,
        cop: &Vector2<f64>,
        terminal_cop: &Vector2<f64>,
        duration: f64,
    ) -> Self {
        let alpha = 2.0 * omega * duration;
        let delta_pos = com_pos - cop;
        let delta_cop = cop - terminal_cop;
        let boundary = (com_vel * duration - delta_cop) / alpha;

        Self {
            omega,
            beta_1: delta_pos / 2.0 + boundary,
            beta_2: delta_pos / 2.0 - boundary,
            cop_rate: delta_cop / duration,
            cop: *cop,
        }
    }

    pub fn position(&self, t: f64) -> Vector2<f64> {
        let (grow, decay) = self.exponentials(t);
        self.beta_1 * grow + self.beta_2 * decay + self.cop_rate * t + self.cop
    }

    pub fn velocity(&self, t: f64) -> Vector2<f64> {
        let (grow, decay) = self.exponentials(t);
        (self.beta_1 * grow - self.beta_2 * decay) * self.omega + self.cop_rate
    }

    pub fn acceleration(&self, t: f64) -> Vector2<f64> {
        let (grow, decay) = self.exponentials(t);
        (self.beta_1 * grow + self.beta_2 * decay) * self.omega.powi(2)
    }

    fn exponentials(&self, t: f64) -> (f64, f64) {
        let grow = (self.omega * t).exp();
        (grow, 1.0 / grow)
    }
}

/// Vertical spring-mass response over one stance phase.
#[derive(Clone, Copy, Debug)]
pub struct SpringMass {
    omega: f64,
    d_1: f64,
    d_2: f64,
    length_rate: f64,
    /// Rest height offset `L0 - g / omega^2`.
    rest: f64,
}

impl SpringMass {
    /// # Arguments
    /// * `omega` - Spring natural frequency, see [`spring_frequency`]
    /// * `gravity` - Gravity magnitude (positive)
    /// * `height` / `vertical_vel` - CoM height and vertical velocity at the phase start
    /// * `initial_length` - Leg length `L0` at the phase start
    /// * `terminal_length` - Planned leg length at the phase end
    /// * `duration` - Phase duration `T` (> 0)
    pub fn new(
        omega: f64,
        gravity: f64,
        height: f64,
        vertical_vel: f64,
        initial_length: f64,
        terminal_length: f64,
        duration: f64,
    ) -> Self {
        let sag = gravity / omega.powi(2);
        let delta_length = terminal_length - initial_length;
        let length_rate = delta_length / duration;

        Self {
            omega,
            d_1: height - initial_length + sag,
            d_2: vertical_vel / omega - length_rate / omega,
            length_rate,
            rest: initial_length - sag,
        }
    }

    pub fn position(&self, t: f64) -> f64 {
        let (sin, cos) = (self.omega * t).sin_cos();
        self.d_1 * cos + self.d_2 * sin + self.length_rate * t + self.rest
    }

    pub fn velocity(&self, t: f64) -> f64 {
        let (sin, cos) = (self.omega * t).sin_cos();
        (-self.d_1 * sin + self.d_2 * cos) * self.omega + self.length_rate
    }

    pub fn acceleration(&self, t: f64) -> f64 {
        let (sin, cos) = (self.omega * t).sin_cos();
        -(self.d_1 * cos + self.d_2 * sin) * self.omega.powi(2)
    }
}

/// Ballistic motion of the CoM.
#[derive(Clone, Copy, Debug)]
pub struct Projectile {
    position: Vector3<f64>,
    velocity: Vector3<f64>,
    gravity: Vector3<f64>,
}

impl Projectile {
    /// Projectile launched from `position` with `velocity`, under a gravity
    /// of magnitude `gravity` pointing down the world z axis.
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>, gravity: f64) -> Self {
        Self {
            position,
            velocity,
            gravity: Vector3::new(0.0, 0.0, -gravity),
        }
    }

    pub fn position(&self, t: f64) -> Vector3<f64> {
        self.position + self.velocity * t + self.gravity * (0.5 * t * t)
    }

    pub fn velocity(&self, t: f64) -> Vector3<f64> {
        self.velocity + self.gravity * t
    }

    pub fn acceleration(&self) -> Vector3<f64> {
        self.gravity
    }
}

/// Yaw under constant angular acceleration.
#[derive(Clone, Copy, Debug)]
pub struct HeadingMotion {
    pub position: f64,
    pub velocity: f64,
    pub acceleration: f64,
}

impl HeadingMotion {
    pub fn new(position: f64, velocity: f64, acceleration: f64) -> Self {
        Self {
            position,
            velocity,
            acceleration,
        }
    }

    /// Heading, rate and acceleration at `t`.
    pub fn evaluate(&self, t: f64) -> (f64, f64, f64) {
        (
            self.position + self.velocity * t + 0.5 * self.acceleration * t * t,
            self.velocity + self.acceleration * t,
            self.acceleration,
        )
    }
}
