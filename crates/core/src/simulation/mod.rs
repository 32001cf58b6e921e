//! Per-tile fire simulation and tree/tile coupling
//!
//! - `controller`: steps one tile's grid on a cadence and emits fire events
//! - `events`: ignition and burn-out batches handed over at step boundaries
//! - `tile`: one terrain tile's index, controller and backing list
//! - `registry`: tile table with placement, removal, toggling and bulk control
//! - `scheduler`: explicit driver turning elapsed time into registry ticks

pub mod controller;
pub mod events;
pub mod registry;
pub mod scheduler;
pub mod tile;

// Re-export public types
pub use controller::{SimulationState, TileSimulationController};
pub use events::{BurnoutBatch, FireEvent, IgnitionBatch};
pub use registry::ObjectRegistry;
pub use scheduler::{Scheduler, TickSummary, MAX_TICKS_PER_ADVANCE};
pub use tile::{Tile, TileGeometry, TileId, TileSource};
