//! Transition kernel trait definition
//!
//! This module defines the `TransitionKernel` trait, the execution-agnostic
//! contract for one fire-spread step. Implementations may run sequentially,
//! in parallel or on an accelerator; all of them must produce the same next
//! buffer and markers for the same inputs.

use super::{CellState, SpreadParams, StepMarker};

/// Pure function of the current buffer and parameters to the next buffer and markers
///
/// No cell's result may depend on another cell's *new* value, only on the
/// `current` buffer, so cells can be evaluated in any order.
pub trait TransitionKernel: Send + Sync {
    /// Compute one step
    ///
    /// # Arguments
    ///
    /// * `current` - Neighbour input, `resolution²` cells in row-major order
    /// * `next` - Output buffer, same layout
    /// * `markers` - Output markers, one per cell, overwritten every step
    /// * `resolution` - Grid side length R
    /// * `params` - Wind, spread rate and perturbation seed
    fn step(
        &self,
        current: &[CellState],
        next: &mut [CellState],
        markers: &mut [StepMarker],
        resolution: usize,
        params: &SpreadParams,
    );

    /// Short backend name for logging
    fn name(&self) -> &'static str;

    /// Check if this kernel evaluates cells concurrently
    fn is_parallel(&self) -> bool;
}
