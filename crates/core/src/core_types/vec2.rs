//! Vector type alias for 2-D positions and directions.

use nalgebra::Vector2;

/// 2-D vector type for positions and offsets.
///
/// This is a simple alias for `nalgebra::Vector2<f32>`, used throughout
/// the crate for world positions, tile-local normalized positions and
/// region extents. `x` runs east, `y` runs north.
pub type Vec2 = Vector2<f32>;
