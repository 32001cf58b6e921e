//! Tree Fire Simulation Core Library
//!
//! Spreads fire across large populations of trees scattered over tiled 2-D
//! terrains and answers "which trees are near this point?" while that
//! population changes at runtime.
//!
//! ## Components
//!
//! - [`SpatialIndex`]: region quadtree over 2-D points, generic over anything
//!   exposing a position
//! - [`PropagationGrid`]: double-buffered per-tile cell grid driven by a
//!   pluggable [`TransitionKernel`]
//! - [`TileSimulationController`]: steps a grid on a cadence and turns newly
//!   burning cells into [`IgnitionBatch`] events
//! - [`ObjectRegistry`]: owns every tile's index, controller and tree list and
//!   correlates ignition events back to individual trees
//!
//! A [`Scheduler`] drives [`ObjectRegistry::tick`]; there is no implicit global
//! update order.

// Core types and utilities
pub mod core_types;

pub mod config;
pub mod error;

// Spatial indexing
pub mod spatial;

// Fire propagation (kernels, grid, per-tile controllers)
pub mod grid;
pub mod solver;

// Tile coupling and scheduling
pub mod simulation;

// Re-export core types
pub use core_types::{ObjectState, PrototypeMap, Region, TrackedObject, TreeNode, TreeRecord, Vec2};

pub use config::{FireParameter, FireParameters, SimulationConfig};
pub use error::ConfigError;

pub use spatial::{Positioned, SpatialIndex};

pub use grid::{BaselineImage, PropagationGrid};
pub use solver::{
    create_kernel, CellState, KernelBackend, SequentialKernel, SpreadParams, StepMarker,
    TransitionKernel, KERNEL_TILE,
};

#[cfg(feature = "parallel")]
pub use solver::ParallelKernel;

pub use simulation::{
    BurnoutBatch, FireEvent, IgnitionBatch, ObjectRegistry, Scheduler, SimulationState, Tile,
    TileGeometry, TileId, TileSimulationController, TileSource, TickSummary,
};
