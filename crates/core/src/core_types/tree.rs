//! Tree records exchanged with the terrain collaborator and their tracked counterparts.

use super::Vec2;
use crate::spatial::Positioned;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a tracked tree
///
/// `Dead` is terminal: it is only reached through fire bookkeeping, never by a
/// direct toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ObjectState {
    /// Unburnt tree
    #[default]
    Alive,
    /// Tree currently on fire
    Burning,
    /// Burnt-out tree
    Dead,
}

impl ObjectState {
    /// Convert from u8 for external tag compatibility
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ObjectState::Alive),
            1 => Some(ObjectState::Burning),
            2 => Some(ObjectState::Dead),
            _ => None,
        }
    }

    /// Convert to u8 for external tag compatibility
    pub fn as_u8(&self) -> u8 {
        match self {
            ObjectState::Alive => 0,
            ObjectState::Burning => 1,
            ObjectState::Dead => 2,
        }
    }

    /// State after a manual toggle, `None` for the terminal `Dead` state
    pub fn toggled(&self) -> Option<Self> {
        match self {
            ObjectState::Alive => Some(ObjectState::Burning),
            ObjectState::Burning => Some(ObjectState::Alive),
            ObjectState::Dead => None,
        }
    }
}

/// Mapping between object states and the terrain's prototype tags
///
/// The terrain collaborator renders trees by prototype; swapping the prototype
/// is how a state change becomes visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrototypeMap {
    /// Prototype used for live trees
    pub live: u16,
    /// Prototype used for burning trees
    pub burning: u16,
    /// Prototype used for dead trees
    pub dead: u16,
}

impl Default for PrototypeMap {
    fn default() -> Self {
        Self {
            live: 0,
            burning: 1,
            dead: 2,
        }
    }
}

impl PrototypeMap {
    /// State encoded by a prototype tag; unknown tags count as live vegetation
    pub fn state_of(&self, prototype: u16) -> ObjectState {
        if prototype == self.burning {
            ObjectState::Burning
        } else if prototype == self.dead {
            ObjectState::Dead
        } else {
            ObjectState::Alive
        }
    }

    /// Prototype tag for a state
    pub fn prototype_of(&self, state: ObjectState) -> u16 {
        match state {
            ObjectState::Alive => self.live,
            ObjectState::Burning => self.burning,
            ObjectState::Dead => self.dead,
        }
    }
}

/// Tree record as supplied by the terrain collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeRecord {
    /// Tile-local normalized position in [0, 1] x [0, 1]
    pub position: Vec2,
    /// Prototype (type) tag
    pub prototype: u16,
    /// Height/visibility scale
    pub height_scale: f32,
}

impl TreeRecord {
    /// Create a full-height record
    pub fn new(position: Vec2, prototype: u16) -> Self {
        Self {
            position,
            prototype,
            height_scale: 1.0,
        }
    }
}

/// Entry of a tile's authoritative backing list
///
/// Entries are never physically removed so that external indices stay valid;
/// removal sets `invalidated` and hides the tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedObject {
    /// Tile-local normalized position
    pub position: Vec2,
    /// Prototype tag mirrored from `state`
    pub prototype: u16,
    /// Height/visibility scale (zero once invalidated)
    pub height_scale: f32,
    /// Lifecycle state
    pub state: ObjectState,
    /// Soft-delete marker
    pub invalidated: bool,
}

impl TrackedObject {
    /// Track a record, deriving its state from the prototype tag
    pub fn from_record(record: &TreeRecord, prototypes: &PrototypeMap) -> Self {
        Self {
            position: record.position,
            prototype: record.prototype,
            height_scale: record.height_scale,
            state: prototypes.state_of(record.prototype),
            invalidated: false,
        }
    }

    /// A freshly placed live tree
    pub fn alive(position: Vec2, prototypes: &PrototypeMap) -> Self {
        Self {
            position,
            prototype: prototypes.live,
            height_scale: 1.0,
            state: ObjectState::Alive,
            invalidated: false,
        }
    }

    /// Change state and swap to the matching prototype
    pub fn set_state(&mut self, state: ObjectState, prototypes: &PrototypeMap) {
        self.state = state;
        self.prototype = prototypes.prototype_of(state);
    }

    /// Soft-delete this entry
    pub fn invalidate(&mut self) {
        self.invalidated = true;
        self.height_scale = 0.0;
    }

    /// Whether this entry still represents a tree
    pub fn is_valid(&self) -> bool {
        !self.invalidated
    }

    /// Back-convert for handing to the terrain collaborator
    pub fn to_record(&self) -> TreeRecord {
        TreeRecord {
            position: self.position,
            prototype: self.prototype,
            height_scale: self.height_scale,
        }
    }
}

/// Spatial index entry pointing back into a tile's backing list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeNode {
    /// World position (x east, y north)
    pub position: Vec2,
    /// Stable index into the tile's backing list
    pub index: usize,
}

impl Positioned for TreeNode {
    fn position(&self) -> Vec2 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_conversion() {
        assert_eq!(ObjectState::Alive.as_u8(), 0);
        assert_eq!(ObjectState::Burning.as_u8(), 1);
        assert_eq!(ObjectState::Dead.as_u8(), 2);

        assert_eq!(ObjectState::from_u8(0), Some(ObjectState::Alive));
        assert_eq!(ObjectState::from_u8(1), Some(ObjectState::Burning));
        assert_eq!(ObjectState::from_u8(2), Some(ObjectState::Dead));
        assert_eq!(ObjectState::from_u8(3), None);
    }

    #[test]
    fn test_toggle_never_leaves_dead() {
        assert_eq!(ObjectState::Alive.toggled(), Some(ObjectState::Burning));
        assert_eq!(ObjectState::Burning.toggled(), Some(ObjectState::Alive));
        assert_eq!(ObjectState::Dead.toggled(), None);
    }

    #[test]
    fn test_prototype_mapping() {
        let map = PrototypeMap {
            live: 4,
            burning: 7,
            dead: 9,
        };
        assert_eq!(map.state_of(7), ObjectState::Burning);
        assert_eq!(map.state_of(9), ObjectState::Dead);
        assert_eq!(map.state_of(4), ObjectState::Alive);
        // Unknown prototypes are ordinary vegetation
        assert_eq!(map.state_of(12), ObjectState::Alive);

        let mut tree = TrackedObject::alive(Vec2::new(0.5, 0.5), &map);
        tree.set_state(ObjectState::Burning, &map);
        assert_eq!(tree.prototype, 7);
    }

    #[test]
    fn test_invalidate_keeps_entry() {
        let map = PrototypeMap::default();
        let record = TreeRecord::new(Vec2::new(0.25, 0.75), map.burning);
        let mut tree = TrackedObject::from_record(&record, &map);
        assert_eq!(tree.state, ObjectState::Burning);

        tree.invalidate();
        assert!(!tree.is_valid());
        assert_eq!(tree.height_scale, 0.0);
        assert_eq!(tree.position, record.position);
    }
}
