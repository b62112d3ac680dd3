//! Real-time 2D Verlet disc physics.
//!
//! `discus` simulates discs under gravity and point forces inside a
//! rectangular world. Discs are integrated with position-based (Verlet)
//! dynamics over fixed sub-steps, confined to the world with damped wall
//! contacts, and separated pairwise, either exhaustively or through a
//! uniform spatial grid.
//!
//! # Features
//!
//! - **Verlet integration**: Implicit velocity, fixed-timestep sub-stepping
//! - **Wall contacts**: Positional damping or coefficient-of-restitution bounce
//! - **Collisions**: O(n²) reference solver and a grid broad phase
//! - **Observable**: Monitor steps, contacts and grid overflow via `StepObserver`
//! - **`no_std` compatible**: Only needs `alloc`
//!
//! Rendering, input and windowing are left to the caller: feed commands in
//! between frames and draw from [`Simulation::snapshot`].

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod color;
pub mod particle;
pub mod store;
pub mod integrator;
pub mod constraint;
pub mod collision;
pub mod grid;
pub mod simulation;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::Vec2;
pub use color::Rgba8;
pub use particle::Particle;
pub use store::{ForceMode, ParticleId, ParticleStore};
pub use integrator::VerletIntegrator;
pub use constraint::ConstraintSolver;
pub use collision::{CollisionSolver, CollisionStats};
pub use grid::{SpatialGrid, TileLayout};
pub use simulation::{ParticleView, Simulation, SimulationStats};
pub use config::{BroadPhase, ContactPolicy, SimulationConfig};
pub use observer::{StepObserver, NoOpStepObserver};
pub use error::PhysicsError;
