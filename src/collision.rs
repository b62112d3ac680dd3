//! Pairwise disc collision by positional correction.

use crate::float::Float;
use crate::grid::SpatialGrid;
use crate::observer::StepObserver;
use crate::particle::Particle;

/// Work done by one collision pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Candidate pairs examined.
    pub checks: usize,
    /// Pairs that overlapped and were pushed apart.
    pub resolved: usize,
    /// Particles left out of the pass because their grid cell was full.
    pub dropped: usize,
}

/// Separates overlapping discs with a single positional correction per pair.
///
/// One pass does not guarantee zero overlap when three or more discs
/// overlap each other; repeated sub-steps converge instead.
pub struct CollisionSolver;

impl CollisionSolver {
    /// Push `a` and `b` apart by half the penetration depth each.
    ///
    /// Self pairs, out-of-range indices, coincident centres and discs that
    /// merely touch are left alone. Returns true if a correction was applied.
    pub fn resolve_pair<F: Float>(particles: &mut [Particle<F>], a: usize, b: usize) -> bool {
        if a == b || a >= particles.len() || b >= particles.len() {
            return false;
        }
        let axis = particles[a].current - particles[b].current;
        let dist = axis.length();
        let radii = particles[a].radius + particles[b].radius;
        if !(dist < radii) || dist <= F::zero() {
            return false;
        }
        let normal = axis.scale(F::one() / dist);
        let push = normal.scale(F::half() * (radii - dist));
        particles[a].current = particles[a].current + push;
        particles[b].current = particles[b].current - push;
        true
    }

    /// Check every unordered pair `i < j`.
    pub fn solve_exhaustive<F: Float, O: StepObserver>(
        particles: &mut [Particle<F>],
        observer: &mut O,
    ) -> CollisionStats {
        let mut stats = CollisionStats::default();
        let n = particles.len();
        for i in 0..n {
            for j in (i + 1)..n {
                stats.checks += 1;
                if Self::resolve_pair(particles, i, j) {
                    stats.resolved += 1;
                    observer.on_contact(i, j);
                }
            }
        }
        stats
    }

    /// Rebuild `grid` from the current positions, then check pairs inside
    /// each cell and between each cell and its forward neighbours.
    pub fn solve_grid<F: Float, O: StepObserver>(
        particles: &mut [Particle<F>],
        grid: &mut SpatialGrid<F>,
        observer: &mut O,
    ) -> CollisionStats {
        let mut stats = CollisionStats::default();
        stats.dropped = grid.rebuild(particles);
        if stats.dropped > 0 {
            log::debug!("grid overflow: {} particles skipped this step", stats.dropped);
            observer.on_grid_overflow(stats.dropped);
        }
        let grid = &*grid;
        for cell in 0..grid.cell_count() {
            let here = grid.cell(cell);
            if here.is_empty() {
                continue;
            }
            for (k, &i) in here.iter().enumerate() {
                for &j in &here[k + 1..] {
                    Self::check(particles, i, j, &mut stats, observer);
                }
            }
            for other in grid.forward_neighbours(cell) {
                for &i in here {
                    for &j in grid.cell(other) {
                        Self::check(particles, i, j, &mut stats, observer);
                    }
                }
            }
        }
        stats
    }

    fn check<F: Float, O: StepObserver>(
        particles: &mut [Particle<F>],
        i: usize,
        j: usize,
        stats: &mut CollisionStats,
        observer: &mut O,
    ) {
        stats.checks += 1;
        if Self::resolve_pair(particles, i, j) {
            stats.resolved += 1;
            observer.on_contact(i.min(j), i.max(j));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba8;
    use crate::observer::NoOpStepObserver;
    use crate::vec::Vec2;

    fn disc(x: f64, y: f64, r: f64) -> Particle<f64> {
        Particle::new(Vec2::new(x, y), r, Rgba8::WHITE)
    }

    #[test]
    fn overlapping_pair_is_separated_symmetrically() {
        let mut particles = [disc(10.0, 10.0, 5.0), disc(16.0, 10.0, 5.0)];
        assert!(CollisionSolver::resolve_pair(&mut particles, 0, 1));
        assert!((particles[0].current.x - 8.0).abs() < 1e-12);
        assert!((particles[1].current.x - 18.0).abs() < 1e-12);
        assert_eq!(particles[0].current.y, 10.0);
    }

    #[test]
    fn touching_pair_is_not_moved() {
        let mut particles = [disc(10.0, 10.0, 5.0), disc(20.0, 10.0, 5.0)];
        assert!(!CollisionSolver::resolve_pair(&mut particles, 0, 1));
        assert_eq!(particles[0].current, Vec2::new(10.0, 10.0));
        assert_eq!(particles[1].current, Vec2::new(20.0, 10.0));
    }

    #[test]
    fn degenerate_pairs_are_no_ops() {
        let mut particles = [disc(10.0, 10.0, 5.0), disc(10.0, 10.0, 5.0)];
        assert!(!CollisionSolver::resolve_pair(&mut particles, 0, 0));
        assert!(!CollisionSolver::resolve_pair(&mut particles, 0, 7));
        assert!(!CollisionSolver::resolve_pair(&mut particles, 0, 1), "coincident centres");
        assert_eq!(particles[0].current, particles[1].current);
    }

    #[test]
    fn resolution_leaves_previous_untouched() {
        let mut particles = [disc(10.0, 10.0, 5.0), disc(12.0, 10.0, 5.0)];
        CollisionSolver::resolve_pair(&mut particles, 0, 1);
        assert_eq!(particles[0].previous, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn exhaustive_counts_pairs() {
        let mut particles = [disc(10.0, 10.0, 5.0), disc(14.0, 10.0, 5.0), disc(80.0, 80.0, 5.0)];
        let stats = CollisionSolver::solve_exhaustive(&mut particles, &mut NoOpStepObserver);
        assert_eq!(stats.checks, 3);
        assert_eq!(stats.resolved, 1);
    }

    #[test]
    fn grid_finds_pairs_across_cell_borders() {
        let mut grid: SpatialGrid<f64> = SpatialGrid::new(100.0, 100.0, 5.0, 4).unwrap();
        // Straddles the corner shared by four cells.
        let mut particles = [disc(9.0, 9.0, 5.0), disc(11.0, 11.0, 5.0)];
        let stats = CollisionSolver::solve_grid(&mut particles, &mut grid, &mut NoOpStepObserver);
        assert_eq!(stats.resolved, 1);
        let dist = particles[0].current.distance(particles[1].current);
        assert!((dist - 10.0).abs() < 1e-9, "dist = {}", dist);
    }

    #[test]
    fn grid_skips_far_pairs() {
        let mut grid: SpatialGrid<f64> = SpatialGrid::new(100.0, 100.0, 5.0, 4).unwrap();
        let mut particles = [disc(5.0, 5.0, 5.0), disc(95.0, 95.0, 5.0)];
        let stats = CollisionSolver::solve_grid(&mut particles, &mut grid, &mut NoOpStepObserver);
        assert_eq!(stats.checks, 0);
    }

    #[test]
    fn grid_overflow_skips_but_keeps_state() {
        let mut grid: SpatialGrid<f64> = SpatialGrid::new(100.0, 100.0, 5.0, 1).unwrap();
        let mut particles = [disc(5.0, 5.0, 5.0), disc(6.0, 5.0, 5.0)];
        let stats = CollisionSolver::solve_grid(&mut particles, &mut grid, &mut NoOpStepObserver);
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.resolved, 0);
        assert_eq!(particles[1].current, Vec2::new(6.0, 5.0));
    }
}
