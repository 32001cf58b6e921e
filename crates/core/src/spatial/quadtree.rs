//! Region quadtree over 2-D points
//!
//! Leaves hold objects directly. A leaf that overflows its capacity splits
//! into four equal quadrants (NE, NW, SW, SE) and hands every stored object to
//! the quadrant it falls in. Splitting is lazy and there is no merge on
//! underflow: removal churn in this workload never justifies it.
//!
//! # Routing
//!
//! Children are chosen by comparing a position against the parent's midpoint
//! (`x >= mid_x` is east, `y >= mid_y` is north). Every point inside the
//! parent's closed region therefore maps to exactly one child, inner nodes
//! never keep objects of their own, and removal can follow the same route
//! insertion took.

use super::Positioned;
use crate::core_types::{Region, Vec2};
use crate::error::ConfigError;
use tracing::debug;

/// Depth at which leaves stop splitting
///
/// Guards against unbounded recursion when more than `capacity` objects share
/// one position.
pub const MAX_DEPTH: u32 = 24;

/// Dynamic 2-D spatial index supporting insert, remove and region queries
#[derive(Debug, Clone)]
pub struct SpatialIndex<T> {
    region: Region,
    capacity: usize,
    depth: u32,
    objects: Vec<T>,
    children: Option<Box<[SpatialIndex<T>; 4]>>,
}

impl<T: Positioned + PartialEq + Clone> SpatialIndex<T> {
    /// Create an empty index covering `region`
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of objects a leaf holds before it splits
    /// * `region` - Bounds of the root node
    ///
    /// # Errors
    ///
    /// Returns `InvalidCapacity` if `capacity` is zero
    pub fn new(capacity: usize, region: Region) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::InvalidCapacity);
        }
        Ok(Self::leaf(region, capacity, 0))
    }

    fn leaf(region: Region, capacity: usize, depth: u32) -> Self {
        Self {
            region,
            capacity,
            depth,
            objects: Vec::with_capacity(capacity + 1),
            children: None,
        }
    }

    /// Insert an object at its current position
    ///
    /// Returns `false` (and stores nothing) if the position lies outside the
    /// root region.
    pub fn insert(&mut self, object: T) -> bool {
        let position = object.position();
        if !self.region.contains(position) {
            debug!(
                "Rejected insert at ({:.2}, {:.2}): outside index bounds",
                position.x, position.y
            );
            return false;
        }

        self.insert_routed(object, position);
        true
    }

    fn insert_routed(&mut self, object: T, position: Vec2) {
        let mid = self.region.center();
        if let Some(children) = self.children.as_mut() {
            children[quadrant_index(mid, position)].insert_routed(object, position);
            return;
        }

        self.objects.push(object);
        if self.objects.len() > self.capacity && self.depth < MAX_DEPTH {
            self.split();
        }
    }

    fn split(&mut self) {
        let mid = self.region.center();
        let depth = self.depth + 1;
        let capacity = self.capacity;
        let mut children = Box::new(
            self.region
                .quadrants()
                .map(|quadrant| Self::leaf(quadrant, capacity, depth)),
        );

        for object in self.objects.drain(..) {
            let position = object.position();
            children[quadrant_index(mid, position)].insert_routed(object, position);
        }

        self.children = Some(children);
    }

    /// Remove an object previously inserted
    ///
    /// Matching uses `PartialEq`; the first equal entry on the object's route
    /// is removed. Removing an object that was never indexed is a no-op.
    ///
    /// # Returns
    ///
    /// `true` if an entry was removed
    pub fn remove(&mut self, object: &T) -> bool {
        let position = object.position();
        if !self.region.contains(position) {
            return false;
        }
        self.remove_routed(object, position)
    }

    fn remove_routed(&mut self, object: &T, position: Vec2) -> bool {
        if let Some(slot) = self.objects.iter().position(|stored| stored == object) {
            self.objects.remove(slot);
            return true;
        }

        let mid = self.region.center();
        match self.children.as_mut() {
            Some(children) => children[quadrant_index(mid, position)].remove_routed(object, position),
            None => false,
        }
    }

    /// All stored objects whose position lies inside `area`
    pub fn query(&self, area: &Region) -> Vec<T> {
        let mut results = Vec::new();
        self.query_into(area, &mut results);
        results
    }

    /// Append every stored object inside `area` to `results`
    ///
    /// Non-allocating variant of [`SpatialIndex::query`] for callers that keep
    /// a reusable buffer. Only subtrees whose region overlaps `area` are
    /// visited.
    pub fn query_into(&self, area: &Region, results: &mut Vec<T>) {
        if !self.region.overlaps(area) {
            return;
        }

        results.extend(
            self.objects
                .iter()
                .filter(|stored| area.contains(stored.position()))
                .cloned(),
        );

        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.query_into(area, results);
            }
        }
    }

    /// Drop every object and collapse back to a single leaf
    pub fn clear(&mut self) {
        self.objects.clear();
        if let Some(mut children) = self.children.take() {
            for child in children.iter_mut() {
                child.clear();
            }
        }
    }

    /// Point-in-bounds test (closed on both axes)
    pub fn contains(&self, position: Vec2) -> bool {
        self.region.contains(position)
    }

    /// Bounds of this node
    pub fn region(&self) -> Region {
        self.region
    }

    /// Leaf capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total number of stored objects
    pub fn len(&self) -> usize {
        let own = self.objects.len();
        match self.children.as_ref() {
            Some(children) => own + children.iter().map(Self::len).sum::<usize>(),
            None => own,
        }
    }

    /// Whether the index holds no objects
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this node has been split
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Number of levels below the root (0 for a single leaf)
    pub fn depth(&self) -> u32 {
        match self.children.as_ref() {
            Some(children) => 1 + children.iter().map(Self::depth).max().unwrap_or(0),
            None => 0,
        }
    }

    /// Bounds of every node, parents before children
    ///
    /// Debug accessor for drawing the subdivision.
    pub fn node_regions(&self) -> Vec<Region> {
        let mut regions = Vec::new();
        self.collect_regions(&mut regions);
        regions
    }

    fn collect_regions(&self, regions: &mut Vec<Region>) {
        regions.push(self.region);
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.collect_regions(regions);
            }
        }
    }
}

// NE, NW, SW, SE
#[inline]
fn quadrant_index(mid: Vec2, position: Vec2) -> usize {
    let east = position.x >= mid.x;
    let north = position.y >= mid.y;
    match (east, north) {
        (true, true) => 0,
        (false, true) => 1,
        (false, false) => 2,
        (true, false) => 3,
    }
}
