//! Grid-based propagation modules

pub mod baseline;
pub mod propagation_grid;

// Re-export main types
pub use baseline::BaselineImage;
pub use propagation_grid::{PropagationGrid, StepCells};

use crate::core_types::Vec2;

/// Cell containing a tile-local normalized position
///
/// Positions are clamped onto the grid, so `1.0` maps to the last cell.
#[inline]
pub fn cell_of(normalized: Vec2, resolution: usize) -> (usize, usize) {
    let max = resolution.saturating_sub(1);
    let scale = resolution as f32;
    let x = (normalized.x * scale).floor().max(0.0) as usize;
    let y = (normalized.y * scale).floor().max(0.0) as usize;
    (x.min(max), y.min(max))
}

/// Normalized position of a row-major cell index
///
/// `((index mod R) / R, (index div R) / R)`
#[inline]
pub fn normalized_of(index: usize, resolution: usize) -> Vec2 {
    let scale = resolution as f32;
    Vec2::new(
        (index % resolution) as f32 / scale,
        (index / resolution) as f32 / scale,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_of_clamps() {
        assert_eq!(cell_of(Vec2::new(0.0, 0.0), 512), (0, 0));
        assert_eq!(cell_of(Vec2::new(1.0, 1.0), 512), (511, 511));
        assert_eq!(cell_of(Vec2::new(0.5, 0.25), 512), (256, 128));
        assert_eq!(cell_of(Vec2::new(-0.2, 2.0), 8), (0, 7));
    }

    #[test]
    fn test_normalized_of_row_major() {
        let pos = normalized_of(3 * 16 + 5, 16);
        assert_eq!(pos, Vec2::new(5.0 / 16.0, 3.0 / 16.0));
    }

    #[test]
    fn test_cell_round_trip() {
        let resolution = 64;
        for index in [0, 1, 63, 64, 1000, 4095] {
            let (x, y) = cell_of(normalized_of(index, resolution), resolution);
            assert_eq!(y * resolution + x, index);
        }
    }
}
