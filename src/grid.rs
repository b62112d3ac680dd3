//! Uniform spatial grid used as the collision broad phase.

use crate::error::PhysicsError;
use crate::float::Float;
use crate::particle::Particle;
use crate::vec::Vec2;
use alloc::vec;
use alloc::vec::Vec as AllocVec;

/// Upper bound on `cells * capacity`; a larger grid is a configuration error.
pub const MAX_GRID_SLOTS: usize = 1 << 26;

/// Result of the tile size search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileLayout {
    /// Side length of a square cell, in world units.
    pub len: usize,
    /// How many cells away a colliding neighbour can be. 1 unless the
    /// search had to fall back to tiles smaller than a particle diameter.
    pub reach: usize,
}

/// Pick a square tile size that evenly divides both extents.
///
/// Prefers the *smallest* size of at least one particle diameter, not the
/// largest: any such size keeps colliding pairs in neighbouring cells, and
/// smaller cells mean fewer candidate pairs per cell. If none exists, falls
/// back to the smallest size of at least one radius and widens the
/// neighbour reach to compensate. The search is bounded by the shorter
/// extent.
pub fn tile_layout<F: Float>(width: F, height: F, max_radius: F) -> Result<TileLayout, PhysicsError> {
    let w = whole_units(width.floor());
    let h = whole_units(height.floor());
    let diameter = whole_units((max_radius * F::two()).ceil()).max(1);
    let radius = whole_units(max_radius.ceil()).max(1);
    let limit = w.min(h);
    let fits = |size: usize| w % size == 0 && h % size == 0;

    if let Some(len) = (diameter..=limit).find(|&s| fits(s)) {
        return Ok(TileLayout { len, reach: 1 });
    }
    if let Some(len) = (radius..diameter.min(limit + 1)).find(|&s| fits(s)) {
        let reach = diameter.div_ceil(len);
        log::warn!(
            "no {}-unit tile divides {}x{}; using {}-unit tiles with reach {}",
            diameter, w, h, len, reach
        );
        return Ok(TileLayout { len, reach });
    }
    Err(PhysicsError::NoGridTileSize { width: w, height: h, max_radius: radius })
}

fn whole_units<F: Float>(v: F) -> usize {
    let n = v.to_isize();
    if n > 0 { n as usize } else { 0 }
}

/// A fixed partition of the world into `cols * rows` square cells.
///
/// Cells hold particle *indices* into the slice passed to
/// [`rebuild`](SpatialGrid::rebuild), never references, and at most
/// `capacity` of them. The grid is a derived index: rebuild it whenever
/// positions change.
#[derive(Clone, Debug)]
pub struct SpatialGrid<F: Float> {
    tile: F,
    layout: TileLayout,
    cols: usize,
    rows: usize,
    capacity: usize,
    counts: AllocVec<usize>,
    slots: AllocVec<usize>,
    dropped: usize,
}

impl<F: Float> SpatialGrid<F> {
    pub fn new(width: F, height: F, max_radius: F, capacity: usize) -> Result<Self, PhysicsError> {
        if capacity == 0 {
            return Err(PhysicsError::InvalidCellCapacity);
        }
        let layout = tile_layout(width, height, max_radius)?;
        let cols = whole_units(width.floor()) / layout.len;
        let rows = whole_units(height.floor()) / layout.len;
        let cells = cols.checked_mul(rows);
        let slots = cells.and_then(|cells| cells.checked_mul(capacity));
        let (cells, slots) = match (cells, slots) {
            (Some(cells), Some(slots)) if slots <= MAX_GRID_SLOTS => (cells, slots),
            _ => return Err(PhysicsError::GridTooLarge { cols, rows, capacity }),
        };
        Ok(SpatialGrid {
            tile: F::from_usize(layout.len),
            layout,
            cols,
            rows,
            capacity,
            counts: vec![0; cells],
            slots: vec![0; slots],
            dropped: 0,
        })
    }

    /// Clear every cell and insert each particle by its current position.
    ///
    /// Particles landing in a full cell are skipped; the number skipped is
    /// returned and kept until the next rebuild.
    pub fn rebuild(&mut self, particles: &[Particle<F>]) -> usize {
        self.counts.iter_mut().for_each(|c| *c = 0);
        self.dropped = 0;
        for (index, p) in particles.iter().enumerate() {
            let cell = self.cell_index(p.current);
            let count = self.counts[cell];
            if count < self.capacity {
                self.slots[cell * self.capacity + count] = index;
                self.counts[cell] = count + 1;
            } else {
                self.dropped += 1;
            }
        }
        self.dropped
    }

    /// The cell containing `pos`. Positions outside the tiled area map to
    /// the nearest edge cell.
    pub fn cell_index(&self, pos: Vec2<F>) -> usize {
        let col = self.axis_cell(pos.x, self.cols);
        let row = self.axis_cell(pos.y, self.rows);
        row * self.cols + col
    }

    fn axis_cell(&self, v: F, cells: usize) -> usize {
        // Also catches NaN.
        if !(v > F::zero()) {
            return 0;
        }
        whole_units((v / self.tile).floor()).min(cells - 1)
    }

    /// Particle indices stored in `cell`, in insertion order.
    pub fn cell(&self, cell: usize) -> &[usize] {
        let start = cell * self.capacity;
        &self.slots[start..start + self.counts[cell]]
    }

    /// Cells within `reach` of `cell` whose index is greater than `cell`,
    /// clamped at the grid edge. Visiting these for every cell covers each
    /// unordered pair of neighbouring cells exactly once.
    pub fn forward_neighbours(&self, cell: usize) -> impl Iterator<Item = usize> + '_ {
        let reach = self.layout.reach;
        let col = cell % self.cols;
        let row = cell / self.cols;
        let (c0, c1) = (col.saturating_sub(reach), (col + reach).min(self.cols - 1));
        let (r0, r1) = (row.saturating_sub(reach), (row + reach).min(self.rows - 1));
        let cols = self.cols;
        (r0..=r1)
            .flat_map(move |r| (c0..=c1).map(move |c| r * cols + c))
            .filter(move |&n| n > cell)
    }

    /// Top-left corner of `cell` in world coordinates.
    pub fn cell_origin(&self, cell: usize) -> Vec2<F> {
        let col = F::from_usize(cell % self.cols);
        let row = F::from_usize(cell / self.cols);
        Vec2::new(col * self.tile, row * self.tile)
    }

    pub fn tile_len(&self) -> usize { self.layout.len }
    pub fn reach(&self) -> usize { self.layout.reach }
    pub fn cols(&self) -> usize { self.cols }
    pub fn rows(&self) -> usize { self.rows }
    pub fn cell_count(&self) -> usize { self.counts.len() }
    pub fn capacity(&self) -> usize { self.capacity }
    /// Particles skipped by the last rebuild.
    pub fn dropped(&self) -> usize { self.dropped }
    /// Particles stored by the last rebuild.
    pub fn occupied(&self) -> usize { self.counts.iter().sum() }
}
