//! Cell values and per-step markers

use crate::core_types::ObjectState;
use serde::{Deserialize, Serialize};

/// Visual/simulation state of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum CellState {
    /// Open ground, burns reluctantly
    #[default]
    Ground = 0,
    /// Cell occupied by live vegetation
    Fuel = 1,
    /// Actively burning
    Burning = 2,
    /// Burnt out (terminal)
    Burnt = 3,
}

impl CellState {
    /// Whether a cell can still catch fire
    pub fn is_flammable(&self) -> bool {
        matches!(self, CellState::Ground | CellState::Fuel)
    }
}

impl From<ObjectState> for CellState {
    fn from(state: ObjectState) -> Self {
        match state {
            ObjectState::Alive => CellState::Fuel,
            ObjectState::Burning => CellState::Burning,
            ObjectState::Dead => CellState::Burnt,
        }
    }
}

/// What happened to a cell during one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepMarker {
    /// Cell was burning before or after the step
    pub combusting: bool,
    /// Cell went from burning to burnt during the step
    pub burnt_out: bool,
}

impl StepMarker {
    /// Nothing happened
    pub const QUIET: Self = Self {
        combusting: false,
        burnt_out: false,
    };

    /// Whether this marker carries any event
    pub fn is_quiet(&self) -> bool {
        !self.combusting && !self.burnt_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_state_to_cell() {
        assert_eq!(CellState::from(ObjectState::Alive), CellState::Fuel);
        assert_eq!(CellState::from(ObjectState::Burning), CellState::Burning);
        assert_eq!(CellState::from(ObjectState::Dead), CellState::Burnt);
    }

    #[test]
    fn test_flammability() {
        assert!(CellState::Ground.is_flammable());
        assert!(CellState::Fuel.is_flammable());
        assert!(!CellState::Burning.is_flammable());
        assert!(!CellState::Burnt.is_flammable());
    }
}
