use discus::{
    BroadPhase, CollisionSolver, NoOpStepObserver, Particle, Rgba8, Simulation,
    SimulationConfig, SpatialGrid, StepObserver, Vec2,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Default)]
struct RecordingObserver {
    contacts: Vec<(usize, usize)>,
    overflows: Vec<usize>,
}

impl StepObserver for RecordingObserver {
    fn on_contact(&mut self, a: usize, b: usize) {
        self.contacts.push((a, b));
    }

    fn on_grid_overflow(&mut self, dropped: usize) {
        self.overflows.push(dropped);
    }
}

fn disc(pos: Vec2<f64>) -> Particle<f64> {
    Particle::new(pos, 5.0, Rgba8::WHITE)
}

/// Ten overlapping pairs, each far from every other pair.
fn isolated_pairs(seed: u64) -> Vec<Particle<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut particles = Vec::new();
    for k in 0..10 {
        let centre = Vec2::new(100.0 + 200.0 * (k % 5) as f64, 200.0 + 300.0 * (k / 5) as f64);
        let a = centre + Vec2::new(rng.random_range(-3.0..3.0), rng.random_range(-3.0..3.0));
        let b = a + Vec2::new(6.0 + rng.random_range(-2.0..2.0), rng.random_range(-2.0..2.0));
        particles.push(disc(a));
        particles.push(disc(b));
    }
    particles
}

fn scattered(count: usize, seed: u64) -> Vec<Particle<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| disc(Vec2::new(rng.random_range(5.0..995.0), rng.random_range(5.0..995.0))))
        .collect()
}

#[test]
fn grid_finds_the_same_pairs_as_exhaustive() {
    for seed in [1, 2, 3] {
        let mut exhaustive = isolated_pairs(seed);
        let mut gridded = exhaustive.clone();

        let mut expected = RecordingObserver::default();
        CollisionSolver::solve_exhaustive(&mut exhaustive, &mut expected);

        let mut grid = SpatialGrid::new(1000.0, 1000.0, 5.0, 16).unwrap();
        let mut found = RecordingObserver::default();
        CollisionSolver::solve_grid(&mut gridded, &mut grid, &mut found);

        expected.contacts.sort_unstable();
        found.contacts.sort_unstable();
        assert_eq!(expected.contacts.len(), 10, "seed {}", seed);
        assert_eq!(found.contacts, expected.contacts, "seed {}", seed);
        assert_eq!(gridded, exhaustive, "seed {}", seed);
        assert!(found.overflows.is_empty());
    }
}

#[test]
fn grid_pairs_across_cell_borders() {
    // Tiles are 10 units; these discs sit on either side of x = 100.
    let mut exhaustive = vec![disc(Vec2::new(96.0, 55.0)), disc(Vec2::new(104.0, 55.0))];
    let mut gridded = exhaustive.clone();
    let mut grid = SpatialGrid::new(1000.0, 1000.0, 5.0, 4).unwrap();
    assert_ne!(
        grid.cell_index(gridded[0].current),
        grid.cell_index(gridded[1].current)
    );

    CollisionSolver::solve_exhaustive(&mut exhaustive, &mut NoOpStepObserver);
    let stats = CollisionSolver::solve_grid(&mut gridded, &mut grid, &mut NoOpStepObserver);

    assert_eq!(stats.resolved, 1);
    assert_eq!(gridded, exhaustive);
}

#[test]
fn grid_checks_far_fewer_pairs() {
    let mut particles = scattered(200, 42);
    let exhaustive = CollisionSolver::solve_exhaustive(&mut particles.clone(), &mut NoOpStepObserver);
    assert_eq!(exhaustive.checks, 200 * 199 / 2);

    let mut grid = SpatialGrid::new(1000.0, 1000.0, 5.0, 16).unwrap();
    let gridded = CollisionSolver::solve_grid(&mut particles, &mut grid, &mut NoOpStepObserver);
    assert!(
        gridded.checks * 10 < exhaustive.checks,
        "grid checked {} pairs, exhaustive {}",
        gridded.checks,
        exhaustive.checks
    );
}

#[test]
fn fallback_tiles_still_find_neighbours() {
    // 30x20 has no common divisor >= 16, so tiles shrink to 10 and reach widens.
    let mut grid = SpatialGrid::new(30.0, 20.0, 8.0, 8).unwrap();
    assert_eq!(grid.tile_len(), 10);
    assert_eq!(grid.reach(), 2);

    let mut particles = vec![
        Particle::new(Vec2::new(8.0, 10.0), 8.0, Rgba8::WHITE),
        Particle::new(Vec2::new(22.0, 10.0), 8.0, Rgba8::WHITE),
    ];
    let stats = CollisionSolver::solve_grid(&mut particles, &mut grid, &mut NoOpStepObserver);
    assert_eq!(stats.resolved, 1);
    let gap: f64 = particles[0].current.distance(particles[1].current);
    assert!((gap - 16.0).abs() < 1e-9);
}

#[test]
fn overflow_reaches_observer_and_stats() {
    let config = SimulationConfig::new()
        .with_bounds(100.0, 100.0)
        .with_gravity(Vec2::new(0.0, 0.0))
        .with_radius_range(5.0, 5.0)
        .with_broad_phase(BroadPhase::Grid)
        .with_cell_capacity(1);
    let mut sim = Simulation::new(config).unwrap();
    for _ in 0..3 {
        sim.spawn_particle(50.0, 50.0, 5.0, Rgba8::WHITE);
    }

    let mut observer = RecordingObserver::default();
    sim.step(1.0 / 480.0, &mut observer);

    assert_eq!(observer.overflows, vec![2]);
    assert_eq!(sim.stats().grid_overflow_events, 1);
    assert_eq!(sim.stats().grid_dropped_total, 2);
}
