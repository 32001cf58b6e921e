//! Explicit tick driver
//!
//! Nothing in the core updates itself. A [`Scheduler`] turns wall-clock
//! intervals into bounded ticks and feeds them to [`ObjectRegistry::tick`].

use super::registry::ObjectRegistry;
use crate::error::ConfigError;
use std::ops::{Add, AddAssign};
use tracing::{debug, warn};

/// Upper bound on ticks driven by a single [`Scheduler::advance`] call
pub const MAX_TICKS_PER_ADVANCE: usize = 10_000;

/// Totals over one or more ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickSummary {
    /// Ticks driven
    pub ticks: usize,
    /// Grid steps run across all tiles
    pub steps: u64,
    /// Cells reported in ignition batches
    pub ignitions: usize,
    /// Cells reported in burn-out batches
    pub burnouts: usize,
    /// Trees that went from alive to burning
    pub objects_ignited: usize,
    /// Trees that went from burning to dead
    pub objects_burnt_out: usize,
}

impl TickSummary {
    /// Whether nothing happened
    pub fn is_quiet(&self) -> bool {
        self.steps == 0 && self.ignitions == 0 && self.burnouts == 0
    }
}

impl AddAssign for TickSummary {
    fn add_assign(&mut self, other: Self) {
        self.ticks += other.ticks;
        self.steps += other.steps;
        self.ignitions += other.ignitions;
        self.burnouts += other.burnouts;
        self.objects_ignited += other.objects_ignited;
        self.objects_burnt_out += other.objects_burnt_out;
    }
}

impl Add for TickSummary {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

/// Splits elapsed time into ticks no longer than `max_tick`
#[derive(Debug, Clone, PartialEq)]
pub struct Scheduler {
    max_tick: f32,
    elapsed: f64,
    totals: TickSummary,
}

impl Scheduler {
    /// Create a scheduler
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `max_tick` is not finite and positive
    pub fn new(max_tick: f32) -> Result<Self, ConfigError> {
        if !max_tick.is_finite() || max_tick <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_tick",
                value: max_tick,
                constraint: "must be finite and positive",
            });
        }
        Ok(Self {
            max_tick,
            elapsed: 0.0,
            totals: TickSummary::default(),
        })
    }

    /// Longest tick handed to the registry
    pub fn max_tick(&self) -> f32 {
        self.max_tick
    }

    /// Total simulated time driven so far
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Totals since creation
    pub fn totals(&self) -> TickSummary {
        self.totals
    }

    /// Drive `registry` through `elapsed` seconds
    ///
    /// The interval is split into equal ticks, each at most `max_tick` long.
    /// Invalid intervals are ignored with a warning. At most
    /// [`MAX_TICKS_PER_ADVANCE`] ticks run; time beyond that is dropped.
    pub fn advance(&mut self, registry: &mut ObjectRegistry, elapsed: f32) -> TickSummary {
        if !elapsed.is_finite() || elapsed < 0.0 {
            warn!("Ignoring invalid elapsed time {}", elapsed);
            return TickSummary::default();
        }
        if elapsed == 0.0 {
            return TickSummary::default();
        }

        let wanted = (elapsed / self.max_tick).ceil().max(1.0);
        let (ticks, elapsed) = if wanted > MAX_TICKS_PER_ADVANCE as f32 {
            let driven = self.max_tick * MAX_TICKS_PER_ADVANCE as f32;
            warn!(
                "Elapsed time {}s needs {} ticks, driving only {:.3}s",
                elapsed, wanted, driven
            );
            (MAX_TICKS_PER_ADVANCE, driven)
        } else {
            (wanted as usize, elapsed)
        };
        let dt = elapsed / ticks as f32;

        let mut summary = TickSummary::default();
        for _ in 0..ticks {
            summary += registry.tick(dt);
        }

        self.elapsed += f64::from(elapsed);
        self.totals += summary;
        debug!(
            "Advanced {:.3}s in {} ticks: {} steps, {} cells ignited, {} trees ignited",
            elapsed, ticks, summary.steps, summary.ignitions, summary.objects_ignited
        );
        summary
    }
}
