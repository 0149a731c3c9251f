//! Damped harmonic oscillator driving card animations.
//!
//!   acceleration = -stiffness × (position - target) - damping × velocity
//!
//! Integrated with semi-implicit Euler. Large frame deltas are split into
//! sub-steps of at most 4 ms so stiff springs stay stable.

use std::time::Duration;

/// Maximum dt per integration step.
const MAX_STEP_SECS: f64 = 0.004;

/// Minimum stiffness to prevent degenerate springs.
const MIN_STIFFNESS: f64 = 0.1;

pub const DEFAULT_STIFFNESS: f64 = 170.0;
pub const DEFAULT_DAMPING: f64 = 26.0;

/// A single animated scalar.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    rest_threshold: f64,
    velocity_threshold: f64,
    at_rest: bool,
}

impl Spring {
    /// Spring at `initial` heading for `target`, slightly underdamped.
    pub fn new(initial: f64, target: f64) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            stiffness: DEFAULT_STIFFNESS,
            damping: DEFAULT_DAMPING,
            rest_threshold: 0.001,
            velocity_threshold: 0.01,
            at_rest: false,
        }
    }

    /// Spring that is already settled at `position`.
    pub fn resting(position: f64) -> Self {
        let mut spring = Self::new(position, position);
        spring.at_rest = true;
        spring
    }

    pub fn with_stiffness(mut self, k: f64) -> Self {
        self.stiffness = k.max(MIN_STIFFNESS);
        self
    }

    pub fn with_damping(mut self, c: f64) -> Self {
        self.damping = c.max(0.0);
        self
    }

    /// Damping that converges fastest without overshoot.
    pub fn critically_damped(self) -> Self {
        let c = 2.0 * self.stiffness.sqrt();
        self.with_damping(c)
    }

    /// Position and velocity tolerances for settling, in the spring's units.
    pub fn with_rest_thresholds(mut self, position: f64, velocity: f64) -> Self {
        self.rest_threshold = position.abs();
        self.velocity_threshold = velocity.abs();
        self
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Change the target. Wakes the spring if it moved.
    pub fn set_target(&mut self, target: f64) {
        if (self.target - target).abs() > self.rest_threshold {
            self.target = target;
            self.at_rest = false;
        }
    }

    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let acceleration = -self.stiffness * displacement - self.damping * self.velocity;

        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance by `dt`, snapping onto the target once within tolerance.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }

        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }

        if (self.position - self.target).abs() < self.rest_threshold
            && self.velocity.abs() < self.velocity_threshold
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}
