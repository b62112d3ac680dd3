//! Static simulation configuration.

use crate::error::PhysicsError;
use crate::float::Float;
use crate::vec::Vec2;

/// How candidate collision pairs are found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BroadPhase {
    /// Every unordered pair, O(n²).
    Exhaustive,
    /// Uniform spatial grid, only neighbouring cells are compared.
    Grid,
}

/// What happens to a particle's implicit velocity when it hits a wall.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ContactPolicy<F: Float> {
    /// Clamp and reflect the normal velocity scaled by `damp`.
    Damped { damp: F },
    /// Coefficient-of-restitution bounce followed by `damping`; normal
    /// speeds below `rest_speed` (distance per second) are zeroed however
    /// deep the disc sits past the wall.
    Restitution { cor: F, damping: F, rest_speed: F },
}

impl<F: Float> ContactPolicy<F> {
    pub fn damped() -> Self {
        ContactPolicy::Damped { damp: F::from_f32(0.3) }
    }

    pub fn restitution() -> Self {
        ContactPolicy::Restitution {
            cor: F::from_f32(0.9),
            damping: F::from_f32(0.98),
            rest_speed: F::from_f32(0.5),
        }
    }

    fn is_valid(&self) -> bool {
        let ok = |v: F| v.is_finite() && v >= F::zero();
        match *self {
            ContactPolicy::Damped { damp } => ok(damp),
            ContactPolicy::Restitution { cor, damping, rest_speed } => {
                ok(cor) && ok(damping) && ok(rest_speed)
            }
        }
    }
}

impl<F: Float> Default for ContactPolicy<F> {
    fn default() -> Self {
        Self::damped()
    }
}

/// Configuration supplied once at construction.
///
/// # Builder Pattern
/// ```
/// use discus::{BroadPhase, SimulationConfig, Vec2};
///
/// let config: SimulationConfig<f64> = SimulationConfig::new()
///     .with_bounds(1000.0, 1000.0)
///     .with_gravity(Vec2::new(0.0, 980.0))
///     .with_sub_steps(8)
///     .with_radius_range(5.0, 5.0)
///     .with_broad_phase(BroadPhase::Grid);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig<F: Float> {
    /// World width; particles live in `[0, width]`. Default: 800.
    pub width: F,
    /// World height; `y` grows downward. Default: 600.
    pub height: F,
    /// Gravity acceleration. Default: `(0, 1000)`.
    pub gravity: Vec2<F>,
    /// Fixed micro-steps per `advance` call. Default: 8.
    pub sub_steps: usize,
    /// Smallest spawn radius. Default: 8.
    pub min_radius: F,
    /// Largest spawn radius; also sizes grid tiles. Default: 8.
    pub max_radius: F,
    /// Default: [`BroadPhase::Grid`].
    pub broad_phase: BroadPhase,
    /// Slots per grid cell; extra occupants are skipped for the step. Default: 16.
    pub cell_capacity: usize,
    /// Default: [`ContactPolicy::Damped`] with `damp = 0.3`.
    pub contact: ContactPolicy<F>,
    /// Magnitude of [`ForceMode::Attract`](crate::ForceMode). Default: 5000.
    pub attract_strength: F,
    /// Magnitude of [`ForceMode::Repel`](crate::ForceMode). Default: 10000.
    pub repel_strength: F,
    /// Longest frame delta a single `advance` will simulate. Default: 0.25 s.
    pub max_frame_dt: F,
}

impl<F: Float> SimulationConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        SimulationConfig {
            width: F::from_f32(800.0),
            height: F::from_f32(600.0),
            gravity: Vec2::new(F::zero(), F::from_f32(1000.0)),
            sub_steps: 8,
            min_radius: F::from_f32(8.0),
            max_radius: F::from_f32(8.0),
            broad_phase: BroadPhase::Grid,
            cell_capacity: 16,
            contact: ContactPolicy::damped(),
            attract_strength: F::from_f32(5000.0),
            repel_strength: F::from_f32(10000.0),
            max_frame_dt: F::from_f32(0.25),
        }
    }

    pub fn with_bounds(mut self, width: F, height: F) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec2<F>) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_sub_steps(mut self, sub_steps: usize) -> Self {
        self.sub_steps = sub_steps;
        self
    }

    pub fn with_radius_range(mut self, min_radius: F, max_radius: F) -> Self {
        self.min_radius = min_radius;
        self.max_radius = max_radius;
        self
    }

    pub fn with_broad_phase(mut self, broad_phase: BroadPhase) -> Self {
        self.broad_phase = broad_phase;
        self
    }

    pub fn with_cell_capacity(mut self, cell_capacity: usize) -> Self {
        self.cell_capacity = cell_capacity;
        self
    }

    pub fn with_contact(mut self, contact: ContactPolicy<F>) -> Self {
        self.contact = contact;
        self
    }

    pub fn with_force_strengths(mut self, attract: F, repel: F) -> Self {
        self.attract_strength = attract;
        self.repel_strength = repel;
        self
    }

    pub fn with_max_frame_dt(mut self, max_frame_dt: F) -> Self {
        self.max_frame_dt = max_frame_dt;
        self
    }

    /// Check every field. Grid tile sizing is checked separately when the
    /// grid is built.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let positive = |v: F| v.is_finite() && v > F::zero();
        if !positive(self.width) || !positive(self.height) {
            return Err(PhysicsError::InvalidBounds);
        }
        if !positive(self.min_radius) || !positive(self.max_radius) {
            return Err(PhysicsError::InvalidRadius);
        }
        if self.min_radius > self.max_radius {
            return Err(PhysicsError::RadiusRangeInverted);
        }
        let diameter = self.max_radius * F::two();
        if diameter > self.width || diameter > self.height {
            return Err(PhysicsError::RadiusExceedsBounds);
        }
        if self.sub_steps == 0 {
            return Err(PhysicsError::InvalidSubSteps);
        }
        if self.cell_capacity == 0 {
            return Err(PhysicsError::InvalidCellCapacity);
        }
        if !self.contact.is_valid() {
            return Err(PhysicsError::InvalidContactPolicy);
        }
        if !positive(self.max_frame_dt) {
            return Err(PhysicsError::InvalidFrameLimit);
        }
        Ok(())
    }
}

impl<F: Float> Default for SimulationConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}
