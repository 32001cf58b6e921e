//! Rayon-backed transition kernel
//!
//! Splits the grid into bands of [`KERNEL_TILE`] rows and evaluates the bands
//! on the rayon pool. Each band writes only its own slice of the next buffer
//! and markers, so no synchronisation is needed inside a step.

use super::cpu::transition_cell;
use super::{CellState, SpreadParams, StepMarker, TransitionKernel, KERNEL_TILE};
use rayon::prelude::*;

/// Multi-threaded transition kernel
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelKernel;

impl TransitionKernel for ParallelKernel {
    fn step(
        &self,
        current: &[CellState],
        next: &mut [CellState],
        markers: &mut [StepMarker],
        resolution: usize,
        params: &SpreadParams,
    ) {
        let chances = params.neighbour_chances();
        let seed = params.seed;
        let band_len = resolution * KERNEL_TILE;

        next.par_chunks_mut(band_len)
            .zip(markers.par_chunks_mut(band_len))
            .enumerate()
            .for_each(|(band, (next_band, marker_band))| {
                let first_row = band * KERNEL_TILE;
                let rows = next_band.len() / resolution;
                for row in 0..rows {
                    let y = first_row + row;
                    for x in 0..resolution {
                        let local = row * resolution + x;
                        let (state, marker) =
                            transition_cell(current, resolution, x, y, &chances, seed);
                        next_band[local] = state;
                        marker_band[local] = marker;
                    }
                }
            });
    }

    fn name(&self) -> &'static str {
        "parallel"
    }

    fn is_parallel(&self) -> bool {
        true
    }
}
