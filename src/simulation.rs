//! The frame driver: owns every particle and runs fixed sub-steps.

use crate::collision::{CollisionSolver, CollisionStats};
use crate::color::Rgba8;
use crate::config::{BroadPhase, SimulationConfig};
use crate::constraint::ConstraintSolver;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::grid::SpatialGrid;
use crate::integrator::VerletIntegrator;
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::particle::Particle;
use crate::store::{ForceMode, ParticleId, ParticleStore};
use crate::vec::Vec2;
use core::ops::Range;

/// What a renderer needs to draw one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleView<F: Float> {
    pub position: Vec2<F>,
    pub radius: F,
    pub color: Rgba8,
}

/// Running counters since construction (or the last [`Simulation::reset`]
/// for `particles`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimulationStats {
    /// Live particles.
    pub particles: usize,
    /// `advance` calls that ran at least one sub-step.
    pub frames: u64,
    /// Micro-steps run.
    pub sub_steps: u64,
    /// Frames whose delta was cut down by the spike guard.
    pub clamped_frames: u64,
    /// Particle-wall contacts.
    pub wall_contacts: u64,
    /// Candidate pairs examined by the collision solver.
    pub collision_checks: u64,
    /// Overlapping pairs pushed apart.
    pub contacts_resolved: u64,
    /// Steps in which at least one grid cell overflowed.
    pub grid_overflow_events: u64,
    /// Particles left out of collision checks, summed over all steps.
    pub grid_dropped_total: u64,
}

/// A bounded 2D world of Verlet discs.
///
/// Commands (`spawn_particle`, `apply_force`, `reset`) take effect between
/// frames; `advance` then runs `sub_steps` micro-steps of
/// integrate, confine, collide.
///
/// ```
/// use discus::{Rgba8, Simulation, SimulationConfig, Vec2};
///
/// let config = SimulationConfig::new()
///     .with_bounds(1000.0, 1000.0)
///     .with_gravity(Vec2::new(0.0, 980.0))
///     .with_radius_range(5.0, 5.0);
/// let mut sim: Simulation<f64> = Simulation::new(config).unwrap();
/// sim.spawn_particle(500.0, 100.0, 5.0, Rgba8::WHITE);
/// sim.advance(1.0 / 60.0);
/// assert!(sim.snapshot().all(|p| p.position.y > 100.0));
/// ```
pub struct Simulation<F: Float> {
    config: SimulationConfig<F>,
    store: ParticleStore<F>,
    grid: Option<SpatialGrid<F>>,
    integrator: VerletIntegrator<F>,
    constraints: ConstraintSolver<F>,
    stats: SimulationStats,
    palette_seed: u32,
}

impl<F: Float> Simulation<F> {
    /// Validate `config` and build the world. Grid mode also sizes the
    /// spatial grid here, so tile search failures surface immediately.
    pub fn new(config: SimulationConfig<F>) -> Result<Self, PhysicsError> {
        config.validate()?;
        let grid = match config.broad_phase {
            BroadPhase::Grid => {
                let grid = SpatialGrid::new(
                    config.width,
                    config.height,
                    config.max_radius,
                    config.cell_capacity,
                )?;
                log::info!(
                    "spatial grid: {}x{} cells of {} units, reach {}, {} slots per cell",
                    grid.cols(),
                    grid.rows(),
                    grid.tile_len(),
                    grid.reach(),
                    grid.capacity()
                );
                Some(grid)
            }
            BroadPhase::Exhaustive => None,
        };
        log::info!(
            "simulation {}x{}, {} sub-steps, {:?} broad phase",
            config.width,
            config.height,
            config.sub_steps,
            config.broad_phase
        );
        Ok(Simulation {
            integrator: VerletIntegrator::new(config.gravity),
            constraints: ConstraintSolver::new(config.width, config.height, config.contact),
            config,
            store: ParticleStore::new(),
            grid,
            stats: SimulationStats::default(),
            palette_seed: 0,
        })
    }

    /// Add a particle at rest. `radius` is clamped into the configured
    /// spawn range so grid tiles always cover a full diameter.
    pub fn spawn_particle(&mut self, x: F, y: F, radius: F, color: Rgba8) -> ParticleId {
        let radius = radius.clamp(self.config.min_radius, self.config.max_radius);
        let id = self.store.spawn(x, y, radius, color);
        self.stats.particles = self.store.len();
        id
    }

    /// Drop `count` particles at one point with distinct hashed colors.
    pub fn spawn_burst(&mut self, x: F, y: F, count: usize, radius: F) -> Range<usize> {
        let radius = radius.clamp(self.config.min_radius, self.config.max_radius);
        let ids = self.store.spawn_burst(x, y, count, radius, self.palette_seed);
        self.palette_seed = self.palette_seed.wrapping_add(count as u32);
        self.stats.particles = self.store.len();
        log::trace!("burst of {} particles at ({}, {})", count, x, y);
        ids
    }

    /// Queue a point force for the next micro-step, using the configured
    /// attract or repel strength.
    pub fn apply_force(&mut self, x: F, y: F, mode: ForceMode) {
        let strength = match mode {
            ForceMode::Attract => self.config.attract_strength,
            ForceMode::Repel => self.config.repel_strength,
        };
        self.store.apply_force(x, y, mode, strength);
    }

    /// Remove every particle.
    pub fn reset(&mut self) {
        log::trace!("reset: clearing {} particles", self.store.len());
        self.store.clear();
        self.stats.particles = 0;
    }

    /// Advance by `frame_dt` seconds of wall-clock time.
    pub fn advance(&mut self, frame_dt: F) -> usize {
        self.advance_with(frame_dt, &mut NoOpStepObserver)
    }

    /// Advance by `frame_dt`, reporting progress to `observer`.
    ///
    /// Deltas above `max_frame_dt` are clamped to it; non-positive or
    /// non-finite deltas do nothing. Returns the number of micro-steps run.
    pub fn advance_with<O: StepObserver>(&mut self, frame_dt: F, observer: &mut O) -> usize {
        if !frame_dt.is_finite() || frame_dt <= F::zero() {
            return 0;
        }
        let frame_dt = if frame_dt > self.config.max_frame_dt {
            log::debug!("frame delta {} clamped to {}", frame_dt, self.config.max_frame_dt);
            self.stats.clamped_frames += 1;
            self.config.max_frame_dt
        } else {
            frame_dt
        };

        let sub_steps = self.config.sub_steps;
        let dt = frame_dt / F::from_usize(sub_steps);
        for _ in 0..sub_steps {
            self.step(dt, observer);
        }
        self.stats.frames += 1;
        observer.on_frame_complete(sub_steps);
        sub_steps
    }

    /// Run one micro-step of length `dt`: gravity and queued forces,
    /// Verlet integration, wall confinement, collisions, then a final
    /// position-only pass that keeps every disc inside the bounds.
    pub fn step<O: StepObserver>(&mut self, dt: F, observer: &mut O) -> CollisionStats {
        let particles = self.store.as_mut_slice();

        self.integrator.integrate(particles, dt);
        observer.on_integrate();

        let walls = self.constraints.solve(particles, dt);
        observer.on_constraints();

        let collisions = match self.grid.as_mut() {
            Some(grid) => CollisionSolver::solve_grid(particles, grid, observer),
            None => CollisionSolver::solve_exhaustive(particles, observer),
        };
        // Collision pushes can cross a wall; keep centres in bounds.
        self.constraints.contain(particles);

        self.stats.sub_steps += 1;
        self.stats.wall_contacts += walls as u64;
        self.stats.collision_checks += collisions.checks as u64;
        self.stats.contacts_resolved += collisions.resolved as u64;
        if collisions.dropped > 0 {
            self.stats.grid_overflow_events += 1;
            self.stats.grid_dropped_total += collisions.dropped as u64;
        }
        observer.on_step_complete();
        collisions
    }

    /// Read-only view of every live particle in insertion order.
    pub fn snapshot(&self) -> impl Iterator<Item = ParticleView<F>> + '_ {
        self.store.iter().map(|p| ParticleView {
            position: p.current,
            radius: p.radius,
            color: p.color,
        })
    }

    /// Recolor every particle red in proportion to its speed per micro-step.
    pub fn colorize_by_speed(&mut self, gain: F) {
        for p in self.store.as_mut_slice() {
            p.color = Rgba8::speed_tint(p.velocity_raw().length(), gain);
        }
    }

    pub fn particles(&self) -> &[Particle<F>] {
        self.store.as_slice()
    }

    pub fn particles_mut(&mut self) -> &mut [Particle<F>] {
        self.store.as_mut_slice()
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle<F>> {
        self.store.get(id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn config(&self) -> &SimulationConfig<F> {
        &self.config
    }

    /// The broad-phase grid, if grid mode is configured.
    pub fn grid(&self) -> Option<&SpatialGrid<F>> {
        self.grid.as_ref()
    }

    pub fn stats(&self) -> SimulationStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> Simulation<f64> {
        let config = SimulationConfig::new()
            .with_bounds(200.0, 200.0)
            .with_radius_range(2.0, 5.0);
        Simulation::new(config).unwrap()
    }

    #[test]
    fn spawn_clamps_radius_into_range() {
        let mut sim = world();
        let small = sim.spawn_particle(50.0, 50.0, 0.5, Rgba8::WHITE);
        let large = sim.spawn_particle(90.0, 50.0, 50.0, Rgba8::WHITE);
        assert_eq!(sim.particle(small).unwrap().radius, 2.0);
        assert_eq!(sim.particle(large).unwrap().radius, 5.0);
        assert_eq!(sim.stats().particles, 2);
    }

    #[test]
    fn exhaustive_mode_has_no_grid() {
        let config = SimulationConfig::<f64>::new().with_broad_phase(BroadPhase::Exhaustive);
        let sim = Simulation::new(config).unwrap();
        assert!(sim.grid().is_none());
        let sim = world();
        assert_eq!(sim.grid().map(|g| g.tile_len()), Some(10));
    }

    #[test]
    fn invalid_config_fails_fast() {
        let config = SimulationConfig::<f64>::new().with_sub_steps(0);
        assert_eq!(Simulation::new(config).err(), Some(PhysicsError::InvalidSubSteps));
        let config = SimulationConfig::<f64>::new()
            .with_bounds(1000.0, 999.0)
            .with_radius_range(5.0, 5.0);
        assert!(matches!(
            Simulation::new(config).err(),
            Some(PhysicsError::NoGridTileSize { .. })
        ));
    }

    #[test]
    fn huge_cell_capacity_is_rejected() {
        let config = SimulationConfig::<f64>::new().with_cell_capacity(usize::MAX / 2);
        assert!(matches!(
            Simulation::new(config).err(),
            Some(PhysicsError::GridTooLarge { cols: 40, rows: 30, .. })
        ));
        // Exhaustive mode never builds the grid.
        let config = SimulationConfig::<f64>::new()
            .with_cell_capacity(usize::MAX / 2)
            .with_broad_phase(BroadPhase::Exhaustive);
        assert!(Simulation::new(config).is_ok());
    }

    #[test]
    fn advance_runs_configured_sub_steps() {
        let mut sim = world();
        sim.spawn_particle(100.0, 100.0, 3.0, Rgba8::WHITE);
        assert_eq!(sim.advance(1.0 / 60.0), 8);
        assert_eq!(sim.stats().sub_steps, 8);
        assert_eq!(sim.stats().frames, 1);
    }

    #[test]
    fn degenerate_deltas_do_nothing() {
        let mut sim = world();
        sim.spawn_particle(100.0, 100.0, 3.0, Rgba8::WHITE);
        assert_eq!(sim.advance(0.0), 0);
        assert_eq!(sim.advance(-1.0), 0);
        assert_eq!(sim.advance(f64::NAN), 0);
        assert_eq!(sim.particles()[0].current, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn spike_guard_clamps_long_frames() {
        let mut sim = world();
        sim.advance(10.0);
        assert_eq!(sim.stats().clamped_frames, 1);
        assert_eq!(sim.stats().sub_steps, 8);
    }

    #[test]
    fn reset_clears_particles() {
        let mut sim = world();
        sim.spawn_burst(100.0, 100.0, 20, 3.0);
        assert_eq!(sim.len(), 20);
        sim.reset();
        assert!(sim.is_empty());
        assert_eq!(sim.snapshot().count(), 0);
        assert_eq!(sim.stats().particles, 0);
    }

    #[test]
    fn bursts_continue_the_palette() {
        let mut sim = world();
        sim.spawn_burst(100.0, 100.0, 2, 3.0);
        sim.spawn_burst(100.0, 100.0, 1, 3.0);
        assert_eq!(sim.particles()[2].color, Rgba8::hashed(2));
    }

    #[test]
    fn snapshot_preserves_insertion_order() {
        let mut sim = world();
        sim.spawn_particle(10.0, 20.0, 3.0, Rgba8::RED);
        sim.spawn_particle(30.0, 40.0, 4.0, Rgba8::WHITE);
        let views: alloc::vec::Vec<_> = sim.snapshot().collect();
        assert_eq!(views[0].position, Vec2::new(10.0, 20.0));
        assert_eq!(views[0].color, Rgba8::RED);
        assert_eq!(views[1].radius, 4.0);
    }

    #[test]
    fn colorize_tints_moving_particles() {
        let mut sim = world();
        sim.spawn_particle(100.0, 100.0, 3.0, Rgba8::WHITE);
        sim.particles_mut()[0].previous = Vec2::new(99.0, 100.0);
        sim.colorize_by_speed(0.5);
        assert_eq!(sim.particles()[0].color, Rgba8::new(127, 0, 0, 255));
    }
}
