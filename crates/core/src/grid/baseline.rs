//! Baseline occupancy image
//!
//! The baseline is what a tile's grid resets to: one cell state per grid
//! cell describing where vegetation stands before any fire. It is either
//! supplied by the terrain collaborator or rasterized from the tile's trees.

use super::cell_of;
use crate::core_types::{ObjectState, TrackedObject};
use crate::error::ConfigError;
use crate::solver::CellState;

/// R×R image of initial cell states in row-major order
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineImage {
    resolution: usize,
    cells: Vec<CellState>,
}

impl BaselineImage {
    /// All-ground image
    pub fn ground(resolution: usize) -> Self {
        Self {
            resolution,
            cells: vec![CellState::Ground; resolution * resolution],
        }
    }

    /// Wrap externally supplied cells
    ///
    /// # Errors
    ///
    /// Returns `BaselineMismatch` if `cells` does not hold `resolution²` entries
    pub fn from_cells(resolution: usize, cells: Vec<CellState>) -> Result<Self, ConfigError> {
        let expected = resolution * resolution;
        if cells.len() != expected {
            return Err(ConfigError::BaselineMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { resolution, cells })
    }

    /// Rasterize tracked trees: live → fuel, burning → burning, dead → burnt
    ///
    /// Invalidated entries are skipped. When several trees share a cell the
    /// last one wins.
    pub fn rasterize(resolution: usize, trees: &[TrackedObject]) -> Self {
        let mut image = Self::ground(resolution);
        for tree in trees.iter().filter(|tree| tree.is_valid()) {
            let (x, y) = cell_of(tree.position, resolution);
            let state = match tree.state {
                ObjectState::Alive => CellState::Fuel,
                ObjectState::Burning => CellState::Burning,
                ObjectState::Dead => CellState::Burnt,
            };
            image.set(x, y, state);
        }
        image
    }

    /// Grid side length
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Cells in row-major order
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Cell at `(x, y)`
    pub fn get(&self, x: usize, y: usize) -> CellState {
        self.cells[y * self.resolution + x]
    }

    /// Overwrite the cell at `(x, y)`
    pub fn set(&mut self, x: usize, y: usize, state: CellState) {
        self.cells[y * self.resolution + x] = state;
    }

    /// Reset every cell to ground
    pub fn clear(&mut self) {
        self.cells.fill(CellState::Ground);
    }

    /// Number of cells in a given state
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&cell| cell == state).count()
    }
}
