//! Verlet discs: position-based dynamics with implicit velocity.

use crate::color::Rgba8;
use crate::float::Float;
use crate::vec::Vec2;

/// A simulated disc.
///
/// Velocity is never stored: it is `current - previous`, measured in
/// distance per integration step.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle<F: Float> {
    /// Authoritative position.
    pub current: Vec2<F>,
    /// Position one integration step ago.
    pub previous: Vec2<F>,
    /// Acceleration accumulated for the next integration step only.
    pub acceleration: Vec2<F>,
    pub radius: F,
    pub color: Rgba8,
}

impl<F: Float> Particle<F> {
    /// A particle at rest at `pos`.
    pub fn new(pos: Vec2<F>, radius: F, color: Rgba8) -> Self {
        debug_assert!(radius > F::zero(), "particle radius must be positive");
        Particle {
            current: pos,
            previous: pos,
            acceleration: Vec2::zero(),
            radius,
            color,
        }
    }

    pub fn accelerate(&mut self, accel: Vec2<F>) {
        self.acceleration = self.acceleration + accel;
    }

    /// Störmer-Verlet step; consumes the accumulated acceleration.
    pub fn integrate(&mut self, dt: F) {
        let velocity = self.current - self.previous;
        self.previous = self.current;
        self.current = self.current + velocity + self.acceleration.scale(dt * dt);
        self.acceleration = Vec2::zero();
    }

    /// Displacement over the last step.
    pub fn velocity_raw(&self) -> Vec2<F> {
        self.current - self.previous
    }

    /// Velocity in distance per unit time for a step of length `dt`.
    pub fn velocity(&self, dt: F) -> Vec2<F> {
        if dt.is_near_zero(F::from_f32(1e-30)) {
            return Vec2::zero();
        }
        self.velocity_raw().scale(F::one() / dt)
    }
}
