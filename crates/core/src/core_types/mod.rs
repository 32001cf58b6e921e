//! Core types and utilities

pub mod region;
pub mod tree;
pub mod vec2;

// Re-export
pub use region::Region;
pub use tree::{ObjectState, PrototypeMap, TrackedObject, TreeNode, TreeRecord};
pub use vec2::Vec2;
