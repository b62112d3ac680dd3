//! Owned, index-stable particle storage.

use crate::color::Rgba8;
use crate::float::Float;
use crate::particle::Particle;
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;
use core::ops::Range;

/// Stable handle to a particle: its insertion index.
///
/// Valid until the next [`ParticleStore::clear`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticleId(pub usize);

impl ParticleId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Direction of a point force.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForceMode {
    /// Pull particles toward the point.
    Attract,
    /// Push particles away from the point.
    Repel,
}

/// Growable particle sequence. Particles are never reordered and only
/// removed all at once.
#[derive(Clone, Debug, Default)]
pub struct ParticleStore<F: Float> {
    particles: AllocVec<Particle<F>>,
}

impl<F: Float> ParticleStore<F> {
    pub fn new() -> Self {
        ParticleStore { particles: AllocVec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ParticleStore { particles: AllocVec::with_capacity(capacity) }
    }

    /// Append a particle at rest at `(x, y)`.
    pub fn spawn(&mut self, x: F, y: F, radius: F, color: Rgba8) -> ParticleId {
        let id = ParticleId(self.particles.len());
        self.particles.push(Particle::new(Vec2::new(x, y), radius, color));
        id
    }

    /// Spawn `count` particles around `(x, y)`, colored from consecutive
    /// [`Rgba8::hashed`] seeds starting at `palette_seed`.
    ///
    /// Particles are laid out on a golden-angle spiral with one `radius`
    /// of spacing, so no two share a position and the collision solver can
    /// push them apart. The first particle sits exactly on the point.
    pub fn spawn_burst(
        &mut self,
        x: F,
        y: F,
        count: usize,
        radius: F,
        palette_seed: u32,
    ) -> Range<usize> {
        let start = self.particles.len();
        self.particles.reserve(count);
        for i in 0..count {
            let offset = spiral_offset(i, radius);
            let color = Rgba8::hashed(palette_seed.wrapping_add(i as u32));
            self.spawn(x + offset.x, y + offset.y, radius, color);
        }
        start..self.particles.len()
    }

    /// Remove every particle and release the storage.
    pub fn clear(&mut self) {
        self.particles = AllocVec::new();
    }

    /// Accumulate a fixed-magnitude force toward (or away from) `(x, y)`.
    ///
    /// `strength` is the magnitude for [`ForceMode::Attract`]; for
    /// [`ForceMode::Repel`] it is applied away from the point. Particles
    /// exactly at the point receive nothing.
    pub fn apply_force(&mut self, x: F, y: F, mode: ForceMode, strength: F) {
        let target = Vec2::new(x, y);
        let signed = match mode {
            ForceMode::Attract => strength,
            ForceMode::Repel => -strength,
        };
        for p in self.particles.iter_mut() {
            let disp = target - p.current;
            let dist = disp.length();
            if dist > F::zero() {
                p.accelerate(disp.scale(signed / dist));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle<F>> {
        self.particles.get(id.0)
    }

    pub fn get_mut(&mut self, id: ParticleId) -> Option<&mut Particle<F>> {
        self.particles.get_mut(id.0)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Particle<F>> {
        self.particles.iter()
    }

    pub fn as_slice(&self) -> &[Particle<F>] {
        &self.particles
    }

    pub fn as_mut_slice(&mut self) -> &mut [Particle<F>] {
        &mut self.particles
    }
}

/// Offset of the `i`-th point of a Vogel spiral with the given spacing.
fn spiral_offset<F: Float>(i: usize, spacing: F) -> Vec2<F> {
    if i == 0 {
        return Vec2::zero();
    }
    let golden_angle = F::from_f32(2.399_963_2);
    let angle = F::from_usize(i) * golden_angle;
    let dist = spacing * F::from_usize(i).sqrt();
    Vec2::new(angle.cos() * dist, angle.sin() * dist)
}
