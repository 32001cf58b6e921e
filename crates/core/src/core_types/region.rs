//! Axis-aligned rectangles used as index node bounds and query windows.

use super::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle described by its minimum corner and extents
///
/// Regions are immutable once created. Containment and overlap use closed
/// bounds on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Minimum corner (south-west)
    pub origin: Vec2,
    /// Extent along x
    pub width: f32,
    /// Extent along y
    pub height: f32,
}

impl Region {
    /// Create a region from its minimum corner and extents
    #[must_use]
    pub fn new(origin: Vec2, width: f32, height: f32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Create a square region centered on `center` reaching `half_extent` in every direction
    #[must_use]
    pub fn around(center: Vec2, half_extent: f32) -> Self {
        Self {
            origin: Vec2::new(center.x - half_extent, center.y - half_extent),
            width: half_extent * 2.0,
            height: half_extent * 2.0,
        }
    }

    /// Create a region spanning two corners
    #[must_use]
    pub fn from_corners(min: Vec2, max: Vec2) -> Self {
        Self {
            origin: min,
            width: max.x - min.x,
            height: max.y - min.y,
        }
    }

    /// Minimum corner
    pub fn min(&self) -> Vec2 {
        self.origin
    }

    /// Maximum corner
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.origin.x + self.width, self.origin.y + self.height)
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.origin.x + self.width * 0.5,
            self.origin.y + self.height * 0.5,
        )
    }

    /// Point-in-rect test with closed bounds on both axes
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.origin.x && point.x <= max.x && point.y >= self.origin.y && point.y <= max.y
    }

    /// Two regions overlap iff their projections overlap on both axes
    pub fn overlaps(&self, other: &Region) -> bool {
        let x_overlap = intervals_overlap(self.origin.x, self.width, other.origin.x, other.width);
        let y_overlap =
            intervals_overlap(self.origin.y, self.height, other.origin.y, other.height);
        x_overlap && y_overlap
    }

    /// Split into four equal quadrants ordered NE, NW, SW, SE
    ///
    /// The quadrants exactly partition this region.
    pub fn quadrants(&self) -> [Region; 4] {
        let half_w = self.width * 0.5;
        let half_h = self.height * 0.5;
        let (x, y) = (self.origin.x, self.origin.y);
        let mid_x = x + half_w;
        let mid_y = y + half_h;

        [
            Region::new(Vec2::new(mid_x, mid_y), half_w, half_h),
            Region::new(Vec2::new(x, mid_y), half_w, half_h),
            Region::new(Vec2::new(x, y), half_w, half_h),
            Region::new(Vec2::new(mid_x, y), half_w, half_h),
        ]
    }
}

#[inline]
fn in_closed_range(value: f32, min: f32, max: f32) -> bool {
    value >= min && value <= max
}

// Either interval's start lies within the other interval's closed span.
#[inline]
fn intervals_overlap(a_start: f32, a_len: f32, b_start: f32, b_len: f32) -> bool {
    in_closed_range(a_start, b_start, b_start + b_len)
        || in_closed_range(b_start, a_start, a_start + a_len)
}
