//! Fixed-step Verlet integration under gravity.

use crate::float::Float;
use crate::particle::Particle;
use crate::vec::Vec2;

/// Applies gravity and advances every particle by one Störmer-Verlet step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VerletIntegrator<F: Float> {
    pub gravity: Vec2<F>,
}

impl<F: Float> VerletIntegrator<F> {
    pub fn new(gravity: Vec2<F>) -> Self {
        VerletIntegrator { gravity }
    }

    /// Gravity is added on top of whatever forces were queued since the
    /// last step, then consumed together with them.
    pub fn integrate(&self, particles: &mut [Particle<F>], dt: F) {
        for p in particles.iter_mut() {
            p.accelerate(self.gravity);
            p.integrate(dt);
        }
    }
}
