//! Events handed from a tile's controller to its registry at step boundaries

use crate::core_types::Vec2;
use crate::grid::normalized_of;

/// Cells that started burning during one step and were never reported before
///
/// Positions are tile-local normalized coordinates of each cell's low corner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IgnitionBatch {
    /// Normalized cell positions
    pub positions: Vec<Vec2>,
}

/// Cells that burnt out during one step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BurnoutBatch {
    /// Normalized cell positions
    pub positions: Vec<Vec2>,
}

impl IgnitionBatch {
    /// Build from row-major cell indices
    pub fn from_cells(cells: &[usize], resolution: usize) -> Self {
        Self {
            positions: cells
                .iter()
                .map(|&index| normalized_of(index, resolution))
                .collect(),
        }
    }

    /// Number of ignited cells
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the batch is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl BurnoutBatch {
    /// Build from row-major cell indices
    pub fn from_cells(cells: &[usize], resolution: usize) -> Self {
        Self {
            positions: cells
                .iter()
                .map(|&index| normalized_of(index, resolution))
                .collect(),
        }
    }

    /// Number of burnt-out cells
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the batch is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Notification emitted by a [`super::TileSimulationController`]
#[derive(Debug, Clone, PartialEq)]
pub enum FireEvent {
    /// Newly burning cells
    Ignition(IgnitionBatch),
    /// Newly burnt-out cells
    Burnout(BurnoutBatch),
}

impl FireEvent {
    /// Number of cells carried by the event
    pub fn len(&self) -> usize {
        match self {
            FireEvent::Ignition(batch) => batch.len(),
            FireEvent::Burnout(batch) => batch.len(),
        }
    }

    /// Whether the event carries no cells
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_positions_from_cells() {
        let batch = IgnitionBatch::from_cells(&[0, 17, 64 * 64 - 1], 64);
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.positions[0], Vec2::new(0.0, 0.0));
        assert_eq!(batch.positions[1], Vec2::new(17.0 / 64.0, 0.0));
        assert_eq!(batch.positions[2], Vec2::new(63.0 / 64.0, 63.0 / 64.0));
    }

    #[test]
    fn test_event_len() {
        let event = FireEvent::Burnout(BurnoutBatch::from_cells(&[8, 9], 8));
        assert_eq!(event.len(), 2);
        assert!(!event.is_empty());
        assert!(FireEvent::Ignition(IgnitionBatch::default()).is_empty());
    }
}
