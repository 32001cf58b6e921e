//! Spatial indexing for tracked objects
//!
//! Trees are looked up on every interaction and for every ignited cell, so
//! lookups go through a region quadtree instead of scanning a tile's list.

mod quadtree;

pub use quadtree::{SpatialIndex, MAX_DEPTH};

use crate::core_types::Vec2;

/// Anything that can be stored in a [`SpatialIndex`]
pub trait Positioned {
    /// Position used for routing and queries
    fn position(&self) -> Vec2;
}
