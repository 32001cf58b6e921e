//! Double-buffered fire propagation grid
//!
//! Holds two R×R cell buffers that swap roles every step (the same ping-pong
//! pattern the field solvers use), the cumulative set of cells already
//! reported as burning, and a queue of manual overrides.
//!
//! Overrides are written to *both* buffers before the next step so that the
//! swap cannot silently revert a manual edit.

use super::{normalized_of, BaselineImage};
use crate::core_types::Vec2;
use crate::error::ConfigError;
use crate::solver::{CellState, SpreadParams, StepMarker, TransitionKernel};
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingOverride {
    index: usize,
    state: CellState,
}

/// Cells that changed during one step, as row-major indices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepCells {
    /// Cells combusting this step that were not yet known to burn
    pub ignited: Vec<usize>,
    /// Cells that burnt out this step
    pub burnt_out: Vec<usize>,
}

impl StepCells {
    /// Whether the step produced nothing worth reporting
    pub fn is_empty(&self) -> bool {
        self.ignited.is_empty() && self.burnt_out.is_empty()
    }
}

/// Per-tile R×R fire grid
#[derive(Debug, Clone)]
pub struct PropagationGrid {
    resolution: usize,
    buffers: [Vec<CellState>; 2],
    current: usize,
    markers: Vec<StepMarker>,
    known_burnt: FxHashSet<usize>,
    pending: Vec<PendingOverride>,
    baseline: BaselineImage,
}

impl PropagationGrid {
    /// Create a grid initialised from `baseline`
    ///
    /// # Errors
    ///
    /// Returns `InvalidResolution` if the baseline resolution is zero or not a
    /// multiple of [`crate::solver::KERNEL_TILE`]
    pub fn new(baseline: BaselineImage) -> Result<Self, ConfigError> {
        let resolution = ConfigError::check_resolution(baseline.resolution())?;
        let cells = resolution * resolution;

        Ok(Self {
            resolution,
            buffers: [baseline.cells().to_vec(), baseline.cells().to_vec()],
            current: 0,
            markers: vec![StepMarker::QUIET; cells],
            known_burnt: FxHashSet::default(),
            pending: Vec::new(),
            baseline,
        })
    }

    /// Grid side length
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// The buffer currently holding the latest state
    pub fn cells(&self) -> &[CellState] {
        &self.buffers[self.current]
    }

    /// Cell at `(x, y)` in the current buffer
    pub fn cell(&self, x: usize, y: usize) -> CellState {
        self.buffers[self.current][y * self.resolution + x]
    }

    /// Baseline this grid resets to
    pub fn baseline(&self) -> &BaselineImage {
        &self.baseline
    }

    /// Queue a manual write of `state` at `(x, y)`
    ///
    /// Out-of-range cells are ignored with a warning.
    pub fn mark(&mut self, x: usize, y: usize, state: CellState) {
        if x >= self.resolution || y >= self.resolution {
            warn!(
                "Ignoring override at ({}, {}): outside {}x{} grid",
                x, y, self.resolution, self.resolution
            );
            return;
        }
        self.pending.push(PendingOverride {
            index: y * self.resolution + x,
            state,
        });
    }

    /// Number of queued overrides
    pub fn pending_overrides(&self) -> usize {
        self.pending.len()
    }

    /// Write every queued override into both buffers and clear the queue
    ///
    /// # Returns
    ///
    /// Number of overrides applied
    pub fn apply_overrides(&mut self) -> usize {
        let applied = self.pending.len();
        for PendingOverride { index, state } in self.pending.drain(..) {
            self.buffers[0][index] = state;
            self.buffers[1][index] = state;
        }
        applied
    }

    /// Advance one step with `kernel`
    ///
    /// Applies pending overrides first, runs the kernel from the current
    /// buffer into the other one, swaps, then diffs the markers against the
    /// known-burnt set.
    pub fn step(&mut self, kernel: &dyn TransitionKernel, params: &SpreadParams) -> StepCells {
        self.apply_overrides();

        let next = 1 - self.current;
        let (first, second) = self.buffers.split_at_mut(1);
        let (current_buf, next_buf) = if self.current == 0 {
            (&first[0], &mut second[0])
        } else {
            (&second[0], &mut first[0])
        };

        kernel.step(
            current_buf,
            next_buf,
            &mut self.markers,
            self.resolution,
            params,
        );
        self.current = next;

        let mut changes = StepCells::default();
        for (index, marker) in self.markers.iter().enumerate() {
            if marker.combusting && self.known_burnt.insert(index) {
                changes.ignited.push(index);
            }
            if marker.burnt_out {
                changes.burnt_out.push(index);
            }
        }

        debug!(
            "Grid step via {} kernel: {} new ignitions, {} burnt out, {} known burnt",
            kernel.name(),
            changes.ignited.len(),
            changes.burnt_out.len(),
            self.known_burnt.len()
        );

        changes
    }

    /// Reinitialise both buffers from the baseline
    ///
    /// The known-burnt set and queued overrides survive a reset.
    pub fn reset(&mut self) {
        for buffer in &mut self.buffers {
            buffer.copy_from_slice(self.baseline.cells());
        }
        self.markers.fill(StepMarker::QUIET);
        self.current = 0;
    }

    /// Replace the baseline and rebuild from it, forgetting every known-burnt cell
    /// and every queued override
    ///
    /// # Errors
    ///
    /// Returns `InvalidResolution` if the new baseline's resolution is invalid
    pub fn reinit(&mut self, baseline: BaselineImage) -> Result<(), ConfigError> {
        let resolution = ConfigError::check_resolution(baseline.resolution())?;
        if resolution != self.resolution {
            let cells = resolution * resolution;
            self.resolution = resolution;
            self.buffers = [vec![CellState::Ground; cells], vec![CellState::Ground; cells]];
            self.markers = vec![StepMarker::QUIET; cells];
        }
        self.baseline = baseline;
        self.known_burnt.clear();
        self.pending.clear();
        self.reset();
        Ok(())
    }

    /// Clear the baseline to bare ground and reset onto it, dropping queued overrides
    pub fn clear_baseline(&mut self) {
        self.baseline.clear();
        self.pending.clear();
        self.reset();
    }

    /// Whether a cell index has ever been reported as burning
    pub fn is_known_burnt(&self, index: usize) -> bool {
        self.known_burnt.contains(&index)
    }

    /// Number of cells ever reported as burning
    pub fn known_burnt_count(&self) -> usize {
        self.known_burnt.len()
    }

    /// Normalized position of a cell index
    pub fn normalized_position(&self, index: usize) -> Vec2 {
        normalized_of(index, self.resolution)
    }

    /// Number of cells in a given state in the current buffer
    pub fn count(&self, state: CellState) -> usize {
        self.cells().iter().filter(|&&cell| cell == state).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::SequentialKernel;

    fn calm(seed: u32) -> SpreadParams {
        SpreadParams {
            wind_direction: 0.0,
            wind_speed: 0.0,
            natural_spread: 0.0,
            seed,
        }
    }

    fn fuel_grid(resolution: usize) -> PropagationGrid {
        let baseline =
            BaselineImage::from_cells(resolution, vec![CellState::Fuel; resolution * resolution])
                .unwrap();
        PropagationGrid::new(baseline).unwrap()
    }

    #[test]
    fn test_resolution_must_tile() {
        let err = PropagationGrid::new(BaselineImage::ground(12)).unwrap_err();
        assert_eq!(err, ConfigError::InvalidResolution { resolution: 12 });
        assert!(PropagationGrid::new(BaselineImage::ground(0)).is_err());
        assert!(PropagationGrid::new(BaselineImage::ground(16)).is_ok());
    }

    #[test]
    fn test_overrides_written_to_both_buffers() {
        let mut grid = fuel_grid(16);
        grid.mark(3, 4, CellState::Burnt);
        assert_eq!(grid.pending_overrides(), 1);
        assert_eq!(grid.cell(3, 4), CellState::Fuel, "queued, not applied");

        assert_eq!(grid.apply_overrides(), 1);
        assert_eq!(grid.pending_overrides(), 0);
        assert_eq!(grid.buffers[0][4 * 16 + 3], CellState::Burnt);
        assert_eq!(grid.buffers[1][4 * 16 + 3], CellState::Burnt);
    }

    #[test]
    fn test_override_survives_swaps() {
        let mut grid = fuel_grid(16);
        grid.mark(9, 9, CellState::Ground);
        for seed in 0..4 {
            grid.step(&SequentialKernel, &calm(seed));
            assert_eq!(grid.cell(9, 9), CellState::Ground);
        }
    }

    #[test]
    fn test_out_of_range_override_ignored() {
        let mut grid = fuel_grid(16);
        grid.mark(16, 0, CellState::Burning);
        assert_eq!(grid.pending_overrides(), 0);
    }

    #[test]
    fn test_ignition_reported_once() {
        let mut grid = fuel_grid(16);
        grid.mark(5, 5, CellState::Burning);

        let first = grid.step(&SequentialKernel, &calm(1));
        assert_eq!(first.ignited, vec![5 * 16 + 5]);
        assert!(grid.is_known_burnt(5 * 16 + 5));

        for seed in 2..10 {
            let later = grid.step(&SequentialKernel, &calm(seed));
            assert!(later.ignited.is_empty());
        }
        assert_eq!(grid.known_burnt_count(), 1);
    }

    #[test]
    fn test_reset_keeps_known_burnt_reinit_drops_it() {
        let mut grid = fuel_grid(16);
        grid.mark(2, 2, CellState::Burning);
        grid.step(&SequentialKernel, &calm(0));
        assert_eq!(grid.known_burnt_count(), 1);

        grid.reset();
        assert_eq!(grid.count(CellState::Fuel), 256);
        assert_eq!(grid.known_burnt_count(), 1);

        let baseline = grid.baseline().clone();
        grid.reinit(baseline).unwrap();
        assert_eq!(grid.known_burnt_count(), 0);
    }

    #[test]
    fn test_reinit_and_clear_drop_queued_overrides() {
        let mut grid = fuel_grid(16);
        grid.mark(4, 4, CellState::Burning);
        grid.reset();
        assert_eq!(grid.pending_overrides(), 1, "reset keeps the queue");

        let baseline = grid.baseline().clone();
        grid.reinit(baseline).unwrap();
        assert_eq!(grid.pending_overrides(), 0);
        let cells = grid.step(&SequentialKernel, &calm(3));
        assert!(cells.is_empty());
        assert_eq!(grid.count(CellState::Fuel), 256);

        grid.mark(6, 6, CellState::Fuel);
        grid.clear_baseline();
        assert_eq!(grid.pending_overrides(), 0);
        grid.step(&SequentialKernel, &calm(4));
        assert_eq!(grid.count(CellState::Ground), 256);
    }

    #[test]
    fn test_clear_baseline() {
        let mut grid = fuel_grid(8);
        grid.clear_baseline();
        assert_eq!(grid.count(CellState::Ground), 64);
        assert_eq!(grid.baseline().count(CellState::Ground), 64);
    }

    #[test]
    fn test_normalized_position() {
        let grid = fuel_grid(512);
        let pos = grid.normalized_position(3 * 512 + 256);
        assert_eq!(pos, Vec2::new(0.5, 3.0 / 512.0));
    }
}
