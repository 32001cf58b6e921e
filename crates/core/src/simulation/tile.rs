//! One terrain tile: its spatial index, fire controller and tree list
//!
//! The backing list is authoritative and only ever grows: removal
//! soft-invalidates an entry so every stable index stays valid. The spatial
//! index mirrors the valid entries in world space, and ignition events are
//! correlated back to trees through it.

use super::controller::TileSimulationController;
use super::events::{BurnoutBatch, FireEvent, IgnitionBatch};
use super::scheduler::TickSummary;
use crate::config::SimulationConfig;
use crate::core_types::{ObjectState, PrototypeMap, Region, TrackedObject, TreeNode, TreeRecord, Vec2};
use crate::error::ConfigError;
use crate::grid::BaselineImage;
use crate::solver::CellState;
use crate::spatial::SpatialIndex;
use rand::Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Stable handle of a registered tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub usize);

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tile#{}", self.0)
    }
}

/// World placement and grid resolution of a tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileGeometry {
    /// World position of the tile's low corner (x east, y north)
    pub origin: Vec2,
    /// World extent along each axis
    pub size: Vec2,
    /// Fire grid resolution
    pub resolution: usize,
}

impl TileGeometry {
    /// Square tile of side `size`
    pub fn square(origin: Vec2, size: f32, resolution: usize) -> Self {
        Self {
            origin,
            size: Vec2::new(size, size),
            resolution,
        }
    }

    /// Check that the geometry describes a usable tile
    ///
    /// # Errors
    ///
    /// Returns `InvalidGeometry` for a non-finite origin or a non-positive size,
    /// `InvalidResolution` for a resolution the kernel cannot tile
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("origin.x", self.origin.x), ("origin.y", self.origin.y)] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidGeometry { name, value });
            }
        }
        for (name, value) in [("size.x", self.size.x), ("size.y", self.size.y)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidGeometry { name, value });
            }
        }
        ConfigError::check_resolution(self.resolution)?;
        Ok(())
    }

    /// World rectangle covered by the tile (closed bounds)
    pub fn world_region(&self) -> Region {
        Region::new(self.origin, self.size.x, self.size.y)
    }

    /// Whether a world position belongs to this tile
    pub fn contains(&self, world: Vec2) -> bool {
        self.world_region().contains(world)
    }

    /// Tile-local normalized position of a world position, `None` outside the tile
    pub fn to_normalized(&self, world: Vec2) -> Option<Vec2> {
        if !self.contains(world) {
            return None;
        }
        Some((world - self.origin).component_div(&self.size))
    }

    /// World position of a tile-local normalized position
    pub fn to_world(&self, normalized: Vec2) -> Vec2 {
        self.origin + normalized.component_mul(&self.size)
    }
}

/// Everything the terrain collaborator hands over for one tile
#[derive(Debug, Clone, PartialEq)]
pub struct TileSource {
    /// World placement and grid resolution
    pub geometry: TileGeometry,
    /// Existing tree records, in the terrain's order
    pub trees: Vec<TreeRecord>,
    /// Initial occupancy image; rasterized from `trees` when absent
    pub baseline: Option<BaselineImage>,
}

impl TileSource {
    /// Tile with trees and a rasterized baseline
    pub fn new(geometry: TileGeometry, trees: Vec<TreeRecord>) -> Self {
        Self {
            geometry,
            trees,
            baseline: None,
        }
    }

    /// Attach an explicit baseline image
    #[must_use]
    pub fn with_baseline(mut self, baseline: BaselineImage) -> Self {
        self.baseline = Some(baseline);
        self
    }
}

/// Owning context of one terrain tile
#[derive(Debug)]
pub struct Tile {
    id: TileId,
    geometry: TileGeometry,
    index: SpatialIndex<TreeNode>,
    controller: TileSimulationController,
    trees: Vec<TrackedObject>,
    snapshot: Vec<TreeRecord>,
    original_baseline: BaselineImage,
    prototypes: PrototypeMap,
    selection_range: f32,
    revision: u64,
    scratch: Vec<TreeNode>,
}

impl Tile {
    /// Prepare a tile from its source records
    ///
    /// Tracks every record, builds the spatial index in world space, and
    /// creates an idle controller over the supplied or rasterized baseline.
    ///
    /// # Errors
    ///
    /// Returns `InvalidGeometry`/`InvalidResolution` for unusable geometry,
    /// `BaselineMismatch` if a supplied baseline does not match the resolution,
    /// and any error from building the index or controller
    pub fn prepare(id: TileId, source: TileSource, config: &SimulationConfig) -> Result<Self, ConfigError> {
        let TileSource {
            geometry,
            trees: records,
            baseline,
        } = source;
        geometry.validate()?;

        let prototypes = config.prototypes;
        let trees: Vec<TrackedObject> = records
            .iter()
            .map(|record| TrackedObject::from_record(record, &prototypes))
            .collect();

        let baseline = match baseline {
            Some(image) if image.resolution() == geometry.resolution => image,
            Some(image) => {
                return Err(ConfigError::BaselineMismatch {
                    expected: geometry.resolution * geometry.resolution,
                    actual: image.cells().len(),
                })
            }
            None => BaselineImage::rasterize(geometry.resolution, &trees),
        };

        let index = SpatialIndex::new(config.index_capacity, geometry.world_region())?;
        let controller = TileSimulationController::new(
            baseline.clone(),
            config.fire,
            config.kernel,
            config.seed.map(|seed| seed.wrapping_add(id.0 as u64)),
        )?;

        let mut tile = Self {
            id,
            geometry,
            index,
            controller,
            trees,
            snapshot: records,
            original_baseline: baseline,
            prototypes,
            selection_range: config.selection_range,
            revision: 0,
            scratch: Vec::new(),
        };
        tile.rebuild_index();

        info!(
            "Prepared {}: {} trees, {}x{} grid, origin ({:.1}, {:.1}), size {:.1}x{:.1}",
            id,
            tile.trees.len(),
            geometry.resolution,
            geometry.resolution,
            geometry.origin.x,
            geometry.origin.y,
            geometry.size.x,
            geometry.size.y
        );

        Ok(tile)
    }

    /// Tile handle
    pub fn id(&self) -> TileId {
        self.id
    }

    /// World placement and resolution
    pub fn geometry(&self) -> &TileGeometry {
        &self.geometry
    }

    /// Authoritative backing list, invalidated entries included
    pub fn trees(&self) -> &[TrackedObject] {
        &self.trees
    }

    /// Backing list converted back to terrain records
    pub fn records(&self) -> Vec<TreeRecord> {
        self.trees.iter().map(TrackedObject::to_record).collect()
    }

    /// Backing list as it was when the tile was prepared
    pub fn snapshot(&self) -> &[TreeRecord] {
        &self.snapshot
    }

    /// Number of valid trees in a given state
    pub fn count(&self, state: ObjectState) -> usize {
        self.trees
            .iter()
            .filter(|tree| tree.is_valid() && tree.state == state)
            .count()
    }

    /// Bumped once per rewrite of the backing list
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Spatial index over the valid trees
    pub fn index(&self) -> &SpatialIndex<TreeNode> {
        &self.index
    }

    /// Fire controller
    pub fn controller(&self) -> &TileSimulationController {
        &self.controller
    }

    /// Fire controller, mutably
    pub fn controller_mut(&mut self) -> &mut TileSimulationController {
        &mut self.controller
    }

    /// Boundaries of every index node, for visualisation
    pub fn index_regions(&self) -> Vec<Region> {
        self.index.node_regions()
    }

    /// Place a live tree at a world position
    ///
    /// # Returns
    ///
    /// Stable index of the new entry, `None` if the position is outside the tile
    pub fn place(&mut self, world: Vec2) -> Option<usize> {
        let Some(normalized) = self.geometry.to_normalized(world) else {
            warn!(
                "Cannot place tree at ({:.2}, {:.2}): outside {}",
                world.x, world.y, self.id
            );
            return None;
        };

        let index = self.trees.len();
        self.index.insert(TreeNode {
            position: world,
            index,
        });
        self.trees.push(TrackedObject::alive(normalized, &self.prototypes));
        self.controller.mark_normalized(normalized, CellState::Fuel);
        self.revision += 1;

        debug!("Placed tree {} on {}", index, self.id);
        Some(index)
    }

    /// Closest indexed tree within the selection range of a world position
    ///
    /// Ties keep the first candidate the query returned.
    pub fn nearest(&self, world: Vec2) -> Option<TreeNode> {
        let area = Region::around(world, self.selection_range);
        let mut best: Option<(f32, TreeNode)> = None;
        for node in self.index.query(&area) {
            let distance = (node.position - world).norm_squared();
            match best {
                Some((closest, _)) if distance >= closest => {}
                _ => best = Some((distance, node)),
            }
        }
        best.map(|(_, node)| node)
    }

    /// Soft-delete the tree closest to a world position
    ///
    /// # Returns
    ///
    /// Stable index of the removed entry, `None` if nothing is in range
    pub fn remove_near(&mut self, world: Vec2) -> Option<usize> {
        let Some(node) = self.nearest(world) else {
            warn!(
                "No tree near ({:.2}, {:.2}) on {} to remove",
                world.x, world.y, self.id
            );
            return None;
        };

        self.index.remove(&node);
        if let Some(tree) = self.trees.get_mut(node.index) {
            tree.invalidate();
        }
        self.revision += 1;

        debug!("Removed tree {} on {}", node.index, self.id);
        Some(node.index)
    }

    /// Flip the tree closest to a world position between alive and burning
    ///
    /// The new state is forwarded to the grid as a manual override.
    ///
    /// # Returns
    ///
    /// The tree's new state, `None` if nothing is in range or the tree is dead
    pub fn toggle_near(&mut self, world: Vec2) -> Option<ObjectState> {
        let Some(node) = self.nearest(world) else {
            warn!(
                "No tree near ({:.2}, {:.2}) on {} to toggle",
                world.x, world.y, self.id
            );
            return None;
        };

        let prototypes = self.prototypes;
        let tree = self.trees.get_mut(node.index)?;
        let Some(next) = tree.state.toggled() else {
            warn!("Tree {} on {} is dead and cannot be toggled", node.index, self.id);
            return None;
        };
        tree.set_state(next, &prototypes);
        let position = tree.position;

        self.controller.mark_normalized(position, CellState::from(next));
        self.revision += 1;

        debug!("Toggled tree {} on {} to {:?}", node.index, self.id, next);
        Some(next)
    }

    /// Advance the controller and handle whatever it emits
    pub fn tick(&mut self, dt: f32) -> TickSummary {
        let steps_before = self.controller.steps();
        let events = self.controller.tick(dt);

        let mut summary = TickSummary {
            steps: self.controller.steps() - steps_before,
            ..TickSummary::default()
        };
        for event in &events {
            summary += self.handle_event(event);
        }
        summary
    }

    /// Apply one fire event to the backing list
    pub fn handle_event(&mut self, event: &FireEvent) -> TickSummary {
        match event {
            FireEvent::Ignition(batch) => TickSummary {
                ignitions: batch.len(),
                objects_ignited: self.handle_ignition(batch),
                ..TickSummary::default()
            },
            FireEvent::Burnout(batch) => TickSummary {
                burnouts: batch.len(),
                objects_burnt_out: self.handle_burnout(batch),
                ..TickSummary::default()
            },
        }
    }

    /// Set every live tree within twice the selection range of an ignited cell on fire
    ///
    /// # Returns
    ///
    /// Number of trees that started burning
    pub fn handle_ignition(&mut self, batch: &IgnitionBatch) -> usize {
        let matches = self.collect_matches(&batch.positions, 2.0 * self.selection_range);
        let changed = self.apply_bulk(&matches, ObjectState::Alive, ObjectState::Burning);
        debug!(
            "{}: {} ignited cells, {} candidate trees, {} set burning",
            self.id,
            batch.len(),
            matches.len(),
            changed
        );
        changed
    }

    /// Move every burning tree within the selection range of a burnt-out cell to dead
    ///
    /// # Returns
    ///
    /// Number of trees that died
    pub fn handle_burnout(&mut self, batch: &BurnoutBatch) -> usize {
        let matches = self.collect_matches(&batch.positions, self.selection_range);
        let changed = self.apply_bulk(&matches, ObjectState::Burning, ObjectState::Dead);
        debug!(
            "{}: {} burnt-out cells, {} trees died",
            self.id,
            batch.len(),
            changed
        );
        changed
    }

    /// Stable indices of every indexed tree near any of `positions`
    fn collect_matches(&mut self, positions: &[Vec2], half_extent: f32) -> FxHashSet<usize> {
        let mut matches = FxHashSet::default();
        let mut scratch = std::mem::take(&mut self.scratch);
        for &normalized in positions {
            let world = self.geometry.to_world(normalized);
            scratch.clear();
            self.index
                .query_into(&Region::around(world, half_extent), &mut scratch);
            matches.extend(scratch.iter().map(|node| node.index));
        }
        self.scratch = scratch;
        matches
    }

    /// Move every matched valid tree from `from` to `to`, as one rewrite
    fn apply_bulk(&mut self, matches: &FxHashSet<usize>, from: ObjectState, to: ObjectState) -> usize {
        let prototypes = self.prototypes;
        let mut changed = 0;
        for &index in matches {
            if let Some(tree) = self.trees.get_mut(index) {
                if tree.is_valid() && tree.state == from {
                    tree.set_state(to, &prototypes);
                    changed += 1;
                }
            }
        }
        if changed > 0 {
            self.revision += 1;
        }
        changed
    }

    /// Re-insert every valid tree into a cleared index
    fn rebuild_index(&mut self) {
        self.index.clear();
        let mut rejected = 0;
        for (index, tree) in self.trees.iter().enumerate() {
            if !tree.is_valid() {
                continue;
            }
            let inserted = self.index.insert(TreeNode {
                position: self.geometry.to_world(tree.position),
                index,
            });
            if !inserted {
                rejected += 1;
            }
        }
        if rejected > 0 {
            warn!(
                "{}: {} trees lie outside the tile and were not indexed",
                self.id, rejected
            );
        }
    }

    /// Rebuild the baseline from the current backing list and drop known-burnt cells
    pub fn reinit(&mut self, resume: bool) {
        let baseline = BaselineImage::rasterize(self.geometry.resolution, &self.trees);
        if let Err(err) = self.controller.reinit(baseline, resume) {
            warn!("{}: reinit failed: {}", self.id, err);
        }
    }

    /// Replace every tree with `count` live trees at random positions
    pub fn generate<R: Rng>(&mut self, count: usize, rng: &mut R) {
        let prototypes = self.prototypes;
        self.trees = (0..count)
            .map(|_| {
                let position = Vec2::new(rng.random_range(0.0..1.0), rng.random_range(0.0..1.0));
                TrackedObject::alive(position, &prototypes)
            })
            .collect();
        self.rebuild_index();
        self.revision += 1;

        let running = self.controller.is_running();
        self.reinit(running);
        info!("{}: generated {} trees", self.id, count);
    }

    /// Empty the backing list and the index, and clear the grid
    ///
    /// The snapshot is kept so [`Tile::cleanup`] can still restore it.
    pub fn clear_trees(&mut self) {
        let removed = self.trees.len();
        self.trees.clear();
        self.index.clear();
        self.controller.clear_simulation();
        self.revision += 1;
        info!("{}: cleared {} trees", self.id, removed);
    }

    /// Set up to `count` random live trees on fire
    ///
    /// # Returns
    ///
    /// Number of trees ignited
    pub fn ignite_random<R: Rng>(&mut self, count: usize, rng: &mut R) -> usize {
        let candidates: Vec<usize> = self
            .trees
            .iter()
            .enumerate()
            .filter(|(_, tree)| tree.is_valid() && tree.state == ObjectState::Alive)
            .map(|(index, _)| index)
            .collect();
        let amount = count.min(candidates.len());
        if amount == 0 {
            return 0;
        }

        let prototypes = self.prototypes;
        for pick in rand::seq::index::sample(rng, candidates.len(), amount) {
            let tree = &mut self.trees[candidates[pick]];
            tree.set_state(ObjectState::Burning, &prototypes);
            let position = tree.position;
            self.controller.mark_normalized(position, CellState::Burning);
        }
        self.revision += 1;

        debug!("{}: ignited {} random trees", self.id, amount);
        amount
    }

    /// Restore the backing list to its snapshot and stop the simulation
    ///
    /// The index is rebuilt and the grid reinitialised on the original baseline.
    pub fn cleanup(&mut self) {
        let prototypes = self.prototypes;
        self.trees = self
            .snapshot
            .iter()
            .map(|record| TrackedObject::from_record(record, &prototypes))
            .collect();
        self.rebuild_index();
        self.revision += 1;

        if let Err(err) = self.controller.reinit(self.original_baseline.clone(), false) {
            warn!("{}: cleanup could not reset the grid: {}", self.id, err);
        }
        info!("{}: restored {} trees from snapshot", self.id, self.trees.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::KernelBackend;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config() -> SimulationConfig {
        SimulationConfig {
            kernel: KernelBackend::Sequential,
            seed: Some(3),
            ..SimulationConfig::default()
        }
    }

    fn geometry() -> TileGeometry {
        TileGeometry::square(Vec2::new(100.0, 200.0), 64.0, 64)
    }

    fn tile_with(trees: Vec<TreeRecord>) -> Tile {
        Tile::prepare(TileId(0), TileSource::new(geometry(), trees), &config()).unwrap()
    }

    #[test]
    fn test_geometry_round_trip() {
        let geometry = geometry();
        let world = Vec2::new(116.0, 248.0);
        let normalized = geometry.to_normalized(world).unwrap();
        assert_eq!(normalized, Vec2::new(0.25, 0.75));
        assert_eq!(geometry.to_world(normalized), world);
        assert!(geometry.to_normalized(Vec2::new(99.0, 210.0)).is_none());
    }

    #[test]
    fn test_geometry_validation() {
        let mut geometry = geometry();
        geometry.size.x = 0.0;
        assert!(matches!(
            geometry.validate(),
            Err(ConfigError::InvalidGeometry { name: "size.x", .. })
        ));
        let geometry = TileGeometry::square(Vec2::zeros(), 10.0, 12);
        assert!(matches!(
            geometry.validate(),
            Err(ConfigError::InvalidResolution { .. })
        ));
    }

    #[test]
    fn test_baseline_mismatch() {
        let source = TileSource::new(geometry(), Vec::new()).with_baseline(BaselineImage::ground(32));
        let err = Tile::prepare(TileId(0), source, &config()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::BaselineMismatch {
                expected: 64 * 64,
                actual: 32 * 32
            }
        );
    }

    #[test]
    fn test_prepare_indexes_records() {
        let map = PrototypeMap::default();
        let tile = tile_with(vec![
            TreeRecord::new(Vec2::new(0.1, 0.1), map.live),
            TreeRecord::new(Vec2::new(0.9, 0.9), map.burning),
        ]);
        assert_eq!(tile.index().len(), 2);
        assert_eq!(tile.count(ObjectState::Alive), 1);
        assert_eq!(tile.count(ObjectState::Burning), 1);
        assert_eq!(tile.controller().grid().count(CellState::Fuel), 1);
        assert_eq!(tile.controller().grid().count(CellState::Burning), 1);
    }

    #[test]
    fn test_place_outside_is_declined() {
        let mut tile = tile_with(Vec::new());
        assert_eq!(tile.place(Vec2::new(0.0, 0.0)), None);
        assert_eq!(tile.revision(), 0);
        assert_eq!(tile.place(Vec2::new(120.0, 220.0)), Some(0));
        assert_eq!(tile.revision(), 1);
        assert_eq!(tile.controller().grid().pending_overrides(), 1);
    }

    #[test]
    fn test_nearest_prefers_closest() {
        let mut tile = tile_with(Vec::new());
        let target = Vec2::new(130.0, 230.0);
        tile.place(target + Vec2::new(3.0, 0.0));
        tile.place(target + Vec2::new(0.0, 2.0));
        let nearest = tile.nearest(target).unwrap();
        assert_eq!(nearest.index, 1);
    }

    #[test]
    fn test_toggle_cycle_skips_dead() {
        let map = PrototypeMap::default();
        let mut tile = tile_with(vec![TreeRecord::new(Vec2::new(0.5, 0.5), map.dead)]);
        assert_eq!(tile.toggle_near(Vec2::new(132.0, 232.0)), None);

        let placed = Vec2::new(110.0, 210.0);
        tile.place(placed);
        assert_eq!(tile.toggle_near(placed), Some(ObjectState::Burning));
        let node = tile.nearest(placed).unwrap();
        assert_eq!(tile.trees()[node.index].prototype, map.burning);
        assert_eq!(tile.toggle_near(placed), Some(ObjectState::Alive));
        assert_eq!(tile.trees()[node.index].prototype, map.live);
    }

    #[test]
    fn test_ignition_batch_sets_trees_burning_once() {
        let map = PrototypeMap::default();
        let mut tile = tile_with(vec![
            TreeRecord::new(Vec2::new(0.5, 0.5), map.live),
            TreeRecord::new(Vec2::new(0.52, 0.5), map.live),
            TreeRecord::new(Vec2::new(0.05, 0.05), map.live),
        ]);
        let batch = IgnitionBatch {
            positions: vec![Vec2::new(0.5, 0.5), Vec2::new(0.51, 0.5)],
        };
        assert_eq!(tile.handle_ignition(&batch), 2);
        assert_eq!(tile.revision(), 1);
        assert_eq!(tile.trees()[2].state, ObjectState::Alive);

        // Already burning: no rewrite
        assert_eq!(tile.handle_ignition(&batch), 0);
        assert_eq!(tile.revision(), 1);

        let burnout = BurnoutBatch {
            positions: vec![Vec2::new(0.5, 0.5)],
        };
        assert_eq!(tile.handle_burnout(&burnout), 2);
        assert_eq!(tile.count(ObjectState::Dead), 2);
    }

    #[test]
    fn test_removed_trees_ignore_ignition() {
        let mut tile = tile_with(Vec::new());
        let world = Vec2::new(132.0, 232.0);
        tile.place(world);
        assert_eq!(tile.remove_near(world), Some(0));
        assert!(tile.index().is_empty());
        assert_eq!(tile.trees().len(), 1, "entry kept for index stability");

        let batch = IgnitionBatch {
            positions: vec![Vec2::new(0.5, 0.5)],
        };
        assert_eq!(tile.handle_ignition(&batch), 0);
    }

    #[test]
    fn test_generate_clear_and_cleanup() {
        let map = PrototypeMap::default();
        let mut tile = tile_with(vec![TreeRecord::new(Vec2::new(0.5, 0.5), map.live)]);
        let mut rng = StdRng::seed_from_u64(15);

        tile.generate(40, &mut rng);
        assert_eq!(tile.trees().len(), 40);
        assert_eq!(tile.index().len(), 40);

        assert_eq!(tile.ignite_random(5, &mut rng), 5);
        assert_eq!(tile.count(ObjectState::Burning), 5);

        tile.clear_trees();
        assert!(tile.trees().is_empty());
        assert!(tile.index().is_empty());
        assert_eq!(tile.ignite_random(5, &mut rng), 0);

        tile.cleanup();
        assert_eq!(tile.records(), tile.snapshot().to_vec());
        assert_eq!(tile.index().len(), 1);
        assert!(!tile.controller().is_running());
    }

    #[test]
    fn test_cleanup_discards_queued_toggle() {
        let map = PrototypeMap::default();
        let mut tile = tile_with(vec![TreeRecord::new(Vec2::new(0.5, 0.5), map.live)]);
        assert_eq!(
            tile.toggle_near(Vec2::new(132.0, 232.0)),
            Some(ObjectState::Burning)
        );
        assert_eq!(tile.controller().grid().pending_overrides(), 1);

        tile.cleanup();
        assert_eq!(tile.controller().grid().pending_overrides(), 0);

        let events = tile.controller_mut().step_now();
        assert!(events.is_empty());
        assert_eq!(tile.controller().grid().count(CellState::Burning), 0);
        assert_eq!(tile.controller().grid().count(CellState::Fuel), 1);
    }

    #[test]
    fn test_clear_trees_discards_queued_ignitions() {
        let mut tile = tile_with(Vec::new());
        let mut rng = StdRng::seed_from_u64(15);
        tile.generate(20, &mut rng);
        assert_eq!(tile.ignite_random(5, &mut rng), 5);

        tile.clear_trees();
        let events = tile.controller_mut().step_now();
        assert!(events.is_empty());
        assert_eq!(tile.controller().grid().count(CellState::Ground), 64 * 64);
    }
}
