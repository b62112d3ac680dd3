//! Configuration errors. Runtime operations never fail.

use core::fmt;

/// Errors raised when a simulation is constructed from an invalid config.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Width and height must be positive and finite.
    InvalidBounds,
    /// Spawn radii must be positive and finite.
    InvalidRadius,
    /// `min_radius` is larger than `max_radius`.
    RadiusRangeInverted,
    /// A particle of `max_radius` does not fit inside the bounds.
    RadiusExceedsBounds,
    /// At least one sub-step per frame is required.
    InvalidSubSteps,
    /// Grid cells must hold at least one particle.
    InvalidCellCapacity,
    /// Contact policy factors must be finite and non-negative.
    InvalidContactPolicy,
    /// The frame spike guard must be positive and finite.
    InvalidFrameLimit,
    /// No tile size evenly divides both extents.
    NoGridTileSize { width: usize, height: usize, max_radius: usize },
    /// The grid's `cols * rows * capacity` slot table is too large to allocate.
    GridTooLarge { cols: usize, rows: usize, capacity: usize },
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::InvalidBounds => write!(f, "bounds must be positive and finite"),
            PhysicsError::InvalidRadius => write!(f, "radius must be positive and finite"),
            PhysicsError::RadiusRangeInverted => write!(f, "min radius exceeds max radius"),
            PhysicsError::RadiusExceedsBounds => {
                write!(f, "max radius does not fit inside the bounds")
            }
            PhysicsError::InvalidSubSteps => write!(f, "sub-step count must be at least 1"),
            PhysicsError::InvalidCellCapacity => write!(f, "grid cell capacity must be at least 1"),
            PhysicsError::InvalidContactPolicy => {
                write!(f, "contact policy factors must be finite and non-negative")
            }
            PhysicsError::InvalidFrameLimit => write!(f, "max frame delta must be positive"),
            PhysicsError::NoGridTileSize { width, height, max_radius } => write!(
                f,
                "no grid tile size >= {} evenly divides {}x{}",
                max_radius, width, height
            ),
            PhysicsError::GridTooLarge { cols, rows, capacity } => write!(
                f,
                "grid of {}x{} cells with {} slots each is too large",
                cols, rows, capacity
            ),
        }
    }
}
