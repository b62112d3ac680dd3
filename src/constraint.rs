//! Boundary confinement for Verlet discs.

use crate::config::ContactPolicy;
use crate::float::Float;
use crate::particle::Particle;
use crate::vec::Vec2;

/// Keeps every disc inside `[0, width] x [0, height]`.
///
/// Each axis is handled independently, so a disc in a corner is clamped on
/// both axes in the same call. On contact `current` is clamped to the wall
/// and `previous` is rewritten according to the [`ContactPolicy`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstraintSolver<F: Float> {
    pub width: F,
    pub height: F,
    pub policy: ContactPolicy<F>,
}

impl<F: Float> ConstraintSolver<F> {
    pub fn new(width: F, height: F, policy: ContactPolicy<F>) -> Self {
        ConstraintSolver { width, height, policy }
    }

    /// Confine all particles. `dt` is the step the velocities were taken
    /// over; only the restitution policy's rest threshold uses it.
    ///
    /// Returns how many particles touched a wall.
    pub fn solve(&self, particles: &mut [Particle<F>], dt: F) -> usize {
        let mut contacts = 0;
        for p in particles.iter_mut() {
            if self.confine(p, dt) {
                contacts += 1;
            }
        }
        contacts
    }

    /// Confine one particle. Returns true if it touched a wall.
    pub fn confine(&self, p: &mut Particle<F>, dt: F) -> bool {
        let r = p.radius;
        let hit_x = self.clamp_axis(&mut p.current.x, &mut p.previous.x, r, self.width, dt);
        let hit_y = self.clamp_axis(&mut p.current.y, &mut p.previous.y, r, self.height, dt);
        hit_x || hit_y
    }

    /// Pull centres pushed past a wall by the collision pass back inside,
    /// shifting `previous` by the same amount so velocity is unchanged.
    ///
    /// Returns how many particles were moved.
    pub fn contain(&self, particles: &mut [Particle<F>]) -> usize {
        let mut moved = 0;
        for p in particles.iter_mut() {
            let r = p.radius;
            let dx = shift_inside(p.current.x, r, self.width);
            let dy = shift_inside(p.current.y, r, self.height);
            if dx != F::zero() || dy != F::zero() {
                let shift = Vec2::new(dx, dy);
                p.current = p.current + shift;
                p.previous = p.previous + shift;
                moved += 1;
            }
        }
        moved
    }

    fn clamp_axis(&self, pos: &mut F, prev: &mut F, radius: F, extent: F, dt: F) -> bool {
        let velocity = *pos - *prev;
        if *pos - radius < F::zero() {
            *pos = radius;
        } else if *pos + radius > extent {
            *pos = extent - radius;
        } else {
            return false;
        }
        *prev = *pos + self.bounce(velocity, dt);
        true
    }

    /// Offset from the clamped position to the new `previous`. The implicit
    /// velocity after contact is the negation of this offset.
    fn bounce(&self, velocity: F, dt: F) -> F {
        match self.policy {
            ContactPolicy::Damped { damp } => velocity * damp,
            ContactPolicy::Restitution { cor, damping, rest_speed } => {
                let speed = if dt > F::zero() { velocity.abs() / dt } else { F::zero() };
                if speed < rest_speed {
                    F::zero()
                } else {
                    velocity * cor * damping
                }
            }
        }
    }
}

/// Distance to move `pos` so the disc lies within `[0, extent]`.
fn shift_inside<F: Float>(pos: F, radius: F, extent: F) -> F {
    if pos - radius < F::zero() {
        radius - pos
    } else if pos + radius > extent {
        extent - radius - pos
    } else {
        F::zero()
    }
}
