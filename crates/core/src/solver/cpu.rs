//! Sequential reference kernel
//!
//! Evaluates cells one row at a time. Every other kernel is checked against
//! this one.

use super::noise::{cell_noise, BURNOUT_SALT};
use super::params::{BURNOUT_CHANCE, GROUND_SPREAD_FACTOR, NEIGHBOUR_OFFSETS};
use super::{CellState, SpreadParams, StepMarker, TransitionKernel};

/// Single-threaded transition kernel
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialKernel;

impl TransitionKernel for SequentialKernel {
    fn step(
        &self,
        current: &[CellState],
        next: &mut [CellState],
        markers: &mut [StepMarker],
        resolution: usize,
        params: &SpreadParams,
    ) {
        let chances = params.neighbour_chances();

        for y in 0..resolution {
            for x in 0..resolution {
                let idx = y * resolution + x;
                let (state, marker) =
                    transition_cell(current, resolution, x, y, &chances, params.seed);
                next[idx] = state;
                markers[idx] = marker;
            }
        }
    }

    fn name(&self) -> &'static str {
        "sequential"
    }

    fn is_parallel(&self) -> bool {
        false
    }
}

/// New value and marker for the cell at `(x, y)`
///
/// # Arguments
///
/// * `current` - Previous step's buffer
/// * `resolution` - Grid side length
/// * `x`, `y` - Cell coordinates
/// * `chances` - Per-neighbour ignition chances from [`SpreadParams::neighbour_chances`]
/// * `seed` - Perturbation seed for this step
#[inline]
pub(crate) fn transition_cell(
    current: &[CellState],
    resolution: usize,
    x: usize,
    y: usize,
    chances: &[f32; 8],
    seed: u32,
) -> (CellState, StepMarker) {
    let cell = current[y * resolution + x];

    match cell {
        CellState::Burnt => (CellState::Burnt, StepMarker::QUIET),
        CellState::Burning => {
            let burnt_out = cell_noise(x, y, seed ^ BURNOUT_SALT) < BURNOUT_CHANCE;
            let state = if burnt_out {
                CellState::Burnt
            } else {
                CellState::Burning
            };
            (
                state,
                StepMarker {
                    combusting: true,
                    burnt_out,
                },
            )
        }
        CellState::Fuel | CellState::Ground => {
            let flammability = if cell == CellState::Fuel {
                1.0
            } else {
                GROUND_SPREAD_FACTOR
            };

            let mut survive = 1.0_f32;
            for (&(dx, dy), &chance) in NEIGHBOUR_OFFSETS.iter().zip(chances) {
                if chance <= 0.0 {
                    continue;
                }
                let nx = x as i64 + i64::from(dx);
                let ny = y as i64 + i64::from(dy);
                if nx < 0 || ny < 0 || nx >= resolution as i64 || ny >= resolution as i64 {
                    continue;
                }
                if current[ny as usize * resolution + nx as usize] == CellState::Burning {
                    survive *= 1.0 - chance * flammability;
                }
            }

            let ignition = 1.0 - survive;
            if ignition > 0.0 && (ignition >= 1.0 || cell_noise(x, y, seed) < ignition) {
                (
                    CellState::Burning,
                    StepMarker {
                        combusting: true,
                        burnt_out: false,
                    },
                )
            } else {
                (cell, StepMarker::QUIET)
            }
        }
    }
}
