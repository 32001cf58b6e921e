//! Tile table and object registry
//!
//! The registry owns every tile, addressed by [`TileId`]. Each tile carries
//! its own index, controller and backing list, so ticking fans out across
//! tiles (with rayon under the `parallel` feature) and every tile is borrowed exclusively for its own step
//! and event handling. Unknown tile ids and unresolvable positions degrade to
//! logged no-ops.

use super::scheduler::TickSummary;
use super::tile::{Tile, TileId, TileSource};
use crate::config::{FireParameter, SimulationConfig};
use crate::core_types::{ObjectState, Region, Vec2};
use crate::error::ConfigError;
use rand::rngs::StdRng;
use rand::SeedableRng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Owns every tile and routes requests to them
#[derive(Debug)]
pub struct ObjectRegistry {
    config: SimulationConfig,
    tiles: Vec<Tile>,
}

impl ObjectRegistry {
    /// Create an empty registry
    ///
    /// # Errors
    ///
    /// Returns the first constraint `config` violates
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            "Object registry created: kernel {:?}, index capacity {}, selection range {}",
            config.kernel, config.index_capacity, config.selection_range
        );
        Ok(Self {
            config,
            tiles: Vec::new(),
        })
    }

    /// Registry configuration, including the current global fire parameters
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Prepare and register a tile
    ///
    /// # Errors
    ///
    /// Returns any error from [`Tile::prepare`]; nothing is registered then
    pub fn add_tile(&mut self, source: TileSource) -> Result<TileId, ConfigError> {
        let id = TileId(self.tiles.len());
        let tile = Tile::prepare(id, source, &self.config)?;
        self.tiles.push(tile);
        Ok(id)
    }

    /// Number of registered tiles
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Every registered tile
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile by id
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.0)
    }

    /// Tile by id, mutably
    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(id.0)
    }

    fn resolve(&mut self, id: TileId, operation: &str) -> Option<&mut Tile> {
        let tile = self.tiles.get_mut(id.0);
        if tile.is_none() {
            warn!("{} on unknown {}", operation, id);
        }
        tile
    }

    fn with_tile(&mut self, id: TileId, operation: &str, apply: impl FnOnce(&mut Tile)) -> bool {
        match self.resolve(id, operation) {
            Some(tile) => {
                apply(tile);
                true
            }
            None => false,
        }
    }

    /// First tile whose world rectangle contains a position
    pub fn tile_at(&self, world: Vec2) -> Option<TileId> {
        self.tiles
            .iter()
            .find(|tile| tile.geometry().contains(world))
            .map(Tile::id)
    }

    /// Place a live tree on a tile
    ///
    /// # Returns
    ///
    /// Stable index of the new entry, `None` for an unknown tile or a position
    /// outside it
    pub fn place_object(&mut self, world: Vec2, tile: TileId) -> Option<usize> {
        self.resolve(tile, "place_object")?.place(world)
    }

    /// Soft-delete the tree closest to a world position
    pub fn remove_object_near(&mut self, world: Vec2, tile: TileId) -> Option<usize> {
        self.resolve(tile, "remove_object_near")?.remove_near(world)
    }

    /// Flip the tree closest to a world position between alive and burning
    pub fn toggle_object_near(&mut self, world: Vec2, tile: TileId) -> Option<ObjectState> {
        self.resolve(tile, "toggle_object_near")?.toggle_near(world)
    }

    /// Resolve the tile under a world position, then toggle there
    pub fn toggle_object_at(&mut self, world: Vec2) -> Option<ObjectState> {
        let Some(tile) = self.tile_at(world) else {
            warn!(
                "No tile contains ({:.2}, {:.2}); nothing to toggle",
                world.x, world.y
            );
            return None;
        };
        self.toggle_object_near(world, tile)
    }

    /// Advance every tile by `dt` seconds
    pub fn tick(&mut self, dt: f32) -> TickSummary {
        #[cfg(feature = "parallel")]
        let mut summary = self
            .tiles
            .par_iter_mut()
            .map(|tile| tile.tick(dt))
            .reduce(TickSummary::default, |a, b| a + b);
        #[cfg(not(feature = "parallel"))]
        let mut summary = self
            .tiles
            .iter_mut()
            .map(|tile| tile.tick(dt))
            .fold(TickSummary::default(), |a, b| a + b);
        summary.ticks = 1;
        summary
    }

    /// Restore every tile to its prepared snapshot with the simulation stopped
    pub fn cleanup(&mut self) {
        for tile in &mut self.tiles {
            tile.cleanup();
        }
        info!("Cleanup restored {} tiles", self.tiles.len());
    }

    /// Start every tile's simulation
    pub fn start_all(&mut self) {
        for tile in &mut self.tiles {
            tile.controller_mut().start();
        }
    }

    /// Stop every tile's simulation
    pub fn stop_all(&mut self) {
        for tile in &mut self.tiles {
            tile.controller_mut().stop();
        }
    }

    /// Whether any tile is running
    pub fn any_running(&self) -> bool {
        self.tiles.iter().any(|tile| tile.controller().is_running())
    }

    /// Stop everything if anything runs, otherwise start everything
    ///
    /// # Returns
    ///
    /// Whether the simulation is running afterwards
    pub fn toggle_global_simulation(&mut self) -> bool {
        if self.any_running() {
            self.stop_all();
            false
        } else {
            self.start_all();
            !self.tiles.is_empty()
        }
    }

    /// Start one tile; `false` for an unknown tile
    pub fn start_tile(&mut self, tile: TileId) -> bool {
        self.with_tile(tile, "start_tile", |tile| tile.controller_mut().start())
    }

    /// Stop one tile; `false` for an unknown tile
    pub fn stop_tile(&mut self, tile: TileId) -> bool {
        self.with_tile(tile, "stop_tile", |tile| tile.controller_mut().stop())
    }

    /// Reset one tile's grid to its baseline; `false` for an unknown tile
    pub fn reset_tile(&mut self, tile: TileId) -> bool {
        self.with_tile(tile, "reset_tile", |tile| tile.controller_mut().reset())
    }

    /// Stop one tile and clear its grid to bare ground; `false` for an unknown tile
    pub fn clear_simulation(&mut self, tile: TileId) -> bool {
        self.with_tile(tile, "clear_simulation", |tile| tile.controller_mut().clear_simulation())
    }

    /// Rebuild one tile's baseline from its trees; `false` for an unknown tile
    pub fn reinit_tile(&mut self, tile: TileId, resume: bool) -> bool {
        self.with_tile(tile, "reinit_tile", |tile| tile.reinit(resume))
    }

    /// Set a fire parameter on every tile and as the registry default
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` and changes nothing if `value` is rejected
    pub fn set_parameter(&mut self, parameter: FireParameter, value: f32) -> Result<(), ConfigError> {
        if let Err(err) = self.config.fire.set(parameter, value) {
            warn!("Rejected global {} = {}: {}", parameter.name(), value, err);
            return Err(err);
        }
        for tile in &mut self.tiles {
            tile.controller_mut().set_parameter(parameter, value)?;
        }
        info!("Set {} = {} on {} tiles", parameter.name(), value, self.tiles.len());
        Ok(())
    }

    /// Set a fire parameter on one tile
    ///
    /// # Returns
    ///
    /// `Ok(false)` for an unknown tile
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` and changes nothing if `value` is rejected
    pub fn set_tile_parameter(
        &mut self,
        tile: TileId,
        parameter: FireParameter,
        value: f32,
    ) -> Result<bool, ConfigError> {
        match self.resolve(tile, "set_tile_parameter") {
            Some(tile) => tile.controller_mut().set_parameter(parameter, value).map(|()| true),
            None => Ok(false),
        }
    }

    /// Set wind direction (degrees, 0..=360) everywhere
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the direction is out of range
    pub fn set_wind_direction(&mut self, degrees: f32) -> Result<(), ConfigError> {
        self.set_parameter(FireParameter::WindDirection, degrees)
    }

    /// Set wind speed everywhere
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the speed is negative or not finite
    pub fn set_wind_speed(&mut self, speed: f32) -> Result<(), ConfigError> {
        self.set_parameter(FireParameter::WindSpeed, speed)
    }

    /// Set natural spread rate everywhere
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the rate is negative or not finite
    pub fn set_natural_spread(&mut self, rate: f32) -> Result<(), ConfigError> {
        self.set_parameter(FireParameter::NaturalSpread, rate)
    }

    /// Set seconds between steps everywhere
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the interval is negative or not finite
    pub fn set_step_interval(&mut self, seconds: f32) -> Result<(), ConfigError> {
        self.set_parameter(FireParameter::StepInterval, seconds)
    }

    /// Replace every tile's trees with `count` random live trees
    ///
    /// Each tile draws from its own generator seeded from `seed` and its id.
    pub fn generate_trees(&mut self, count: usize, seed: u64) {
        for tile in &mut self.tiles {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(tile.id().0 as u64));
            tile.generate(count, &mut rng);
        }
    }

    /// Remove every tree from one tile; `false` for an unknown tile
    pub fn clear_trees(&mut self, tile: TileId) -> bool {
        self.with_tile(tile, "clear_trees", Tile::clear_trees)
    }

    /// Remove every tree from every tile
    pub fn clear_all_trees(&mut self) {
        for tile in &mut self.tiles {
            tile.clear_trees();
        }
    }

    /// Set up to `count` random live trees on fire in each tile
    ///
    /// # Returns
    ///
    /// Total number of trees ignited
    pub fn ignite_random_trees(&mut self, count: usize, seed: u64) -> usize {
        let ignited = self
            .tiles
            .iter_mut()
            .map(|tile| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(tile.id().0 as u64));
                tile.ignite_random(count, &mut rng)
            })
            .sum();
        debug!("Ignited {} random trees across {} tiles", ignited, self.tiles.len());
        ignited
    }

    /// Boundaries of every index node of one tile, for visualisation
    pub fn index_regions(&self, tile: TileId) -> Vec<Region> {
        match self.tile(tile) {
            Some(tile) => tile.index_regions(),
            None => {
                warn!("index_regions on unknown {}", tile);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{PrototypeMap, TreeRecord};
    use crate::simulation::TileGeometry;
    use crate::solver::KernelBackend;

    fn registry() -> ObjectRegistry {
        let config = SimulationConfig {
            kernel: KernelBackend::Sequential,
            seed: Some(11),
            ..SimulationConfig::default()
        };
        ObjectRegistry::new(config).unwrap()
    }

    fn source(x: f32) -> TileSource {
        TileSource::new(TileGeometry::square(Vec2::new(x, 0.0), 100.0, 64), Vec::new())
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig {
            selection_range: -1.0,
            ..SimulationConfig::default()
        };
        assert!(ObjectRegistry::new(config).is_err());
    }

    #[test]
    fn test_unknown_tile_is_noop() {
        let mut reg = registry();
        assert_eq!(reg.place_object(Vec2::new(1.0, 1.0), TileId(3)), None);
        assert!(!reg.start_tile(TileId(3)));
        assert_eq!(reg.set_tile_parameter(TileId(3), FireParameter::WindSpeed, 1.0), Ok(false));
        assert!(reg.index_regions(TileId(3)).is_empty());
    }

    #[test]
    fn test_tile_at_picks_first_match() {
        let mut reg = registry();
        let a = reg.add_tile(source(0.0)).unwrap();
        let b = reg.add_tile(source(100.0)).unwrap();
        assert_eq!(reg.tile_at(Vec2::new(50.0, 50.0)), Some(a));
        assert_eq!(reg.tile_at(Vec2::new(150.0, 50.0)), Some(b));
        // Shared edge belongs to the first tile registered
        assert_eq!(reg.tile_at(Vec2::new(100.0, 50.0)), Some(a));
        assert_eq!(reg.tile_at(Vec2::new(250.0, 50.0)), None);
    }

    #[test]
    fn test_toggle_object_at() {
        let mut reg = registry();
        reg.add_tile(source(0.0)).unwrap();
        let b = reg.add_tile(source(100.0)).unwrap();
        let world = Vec2::new(160.0, 40.0);
        assert_eq!(reg.place_object(world, b), Some(0));
        assert_eq!(reg.toggle_object_at(world), Some(ObjectState::Burning));
        assert_eq!(reg.toggle_object_at(Vec2::new(500.0, 500.0)), None);
    }

    #[test]
    fn test_global_controls() {
        let mut reg = registry();
        assert!(!reg.toggle_global_simulation(), "nothing to run");
        let a = reg.add_tile(source(0.0)).unwrap();
        reg.add_tile(source(100.0)).unwrap();

        assert!(reg.toggle_global_simulation());
        assert!(reg.tiles().iter().all(|t| t.controller().is_running()));
        assert!(reg.stop_tile(a));
        assert!(reg.any_running());
        assert!(!reg.toggle_global_simulation());
        assert!(!reg.any_running());
    }

    #[test]
    fn test_global_setter_validates_first() {
        let mut reg = registry();
        reg.add_tile(source(0.0)).unwrap();
        assert!(reg.set_wind_speed(-3.0).is_err());
        assert_eq!(reg.config().fire.wind_speed, 5.0);
        assert_eq!(reg.tiles()[0].controller().fire().wind_speed, 5.0);

        reg.set_wind_direction(270.0).unwrap();
        assert_eq!(reg.tiles()[0].controller().fire().wind_direction, 270.0);
    }

    #[test]
    fn test_generate_and_ignite_are_reproducible() {
        let mut first = registry();
        let mut second = registry();
        for reg in [&mut first, &mut second] {
            reg.add_tile(source(0.0)).unwrap();
            reg.generate_trees(30, 15);
            assert_eq!(reg.ignite_random_trees(5, 15), 5);
        }
        assert_eq!(first.tiles()[0].records(), second.tiles()[0].records());
    }

    #[test]
    fn test_tick_sums_every_tile() {
        let mut reg = registry();
        let mut ids = Vec::new();
        for x in [0.0, 100.0, 200.0] {
            ids.push(reg.add_tile(source(x)).unwrap());
        }
        reg.start_tile(ids[0]);
        reg.start_tile(ids[2]);

        let summary = reg.tick(0.5);
        assert_eq!(summary.ticks, 1);
        assert_eq!(summary.steps, 2);
        assert_eq!(reg.tile(ids[1]).unwrap().controller().steps(), 0);
    }

    #[test]
    fn test_cleanup_restores_snapshot() {
        let mut reg = registry();
        let map = PrototypeMap::default();
        let id = reg
            .add_tile(TileSource::new(
                TileGeometry::square(Vec2::zeros(), 100.0, 64),
                vec![TreeRecord::new(Vec2::new(0.5, 0.5), map.live)],
            ))
            .unwrap();
        reg.place_object(Vec2::new(10.0, 10.0), id);
        reg.toggle_object_near(Vec2::new(50.0, 50.0), id);
        reg.start_all();

        reg.cleanup();
        let tile = reg.tile(id).unwrap();
        assert_eq!(tile.records(), tile.snapshot().to_vec());
        assert!(!reg.any_running());
    }
}
