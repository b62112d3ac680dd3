//! Step observer trait for monitoring simulation progress.

/// Trait for observing simulation steps.
///
/// Implement this trait to monitor solver progress (e.g., for debugging,
/// visualization, or performance profiling). All methods have default
/// no-op implementations.
pub trait StepObserver {
    /// Called after all particles have been integrated (Verlet step).
    fn on_integrate(&mut self) {}

    /// Called after boundary confinement.
    fn on_constraints(&mut self) {}

    /// Called for every overlapping pair the collision solver separated.
    fn on_contact(&mut self, _a: usize, _b: usize) {}

    /// Called when grid cells were full and `dropped` particles were left
    /// out of collision checks for this step.
    fn on_grid_overflow(&mut self, _dropped: usize) {}

    /// Called when one micro-step is fully complete.
    fn on_step_complete(&mut self) {}

    /// Called after every micro-step of an `advance` call has run.
    fn on_frame_complete(&mut self, _sub_steps: usize) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
