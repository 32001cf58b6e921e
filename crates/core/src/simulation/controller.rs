//! Per-tile simulation controller
//!
//! Owns one [`PropagationGrid`] and its transition kernel, accumulates
//! simulated time while running, and steps the grid once the configured
//! interval has elapsed. Each step's changes leave as [`FireEvent`]s; empty
//! batches are never emitted.

use super::events::{BurnoutBatch, FireEvent, IgnitionBatch};
use crate::config::{FireParameter, FireParameters};
use crate::core_types::Vec2;
use crate::error::ConfigError;
use crate::grid::{cell_of, BaselineImage, PropagationGrid};
use crate::solver::{create_kernel, CellState, KernelBackend, TransitionKernel};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

/// Lifecycle of a tile's simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SimulationState {
    /// Not stepping
    #[default]
    Idle,
    /// Stepping on every elapsed interval
    Running,
    /// Buffers are being rebuilt from the baseline
    Resetting,
}

impl SimulationState {
    /// Convert from u8 for external tag compatibility
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(SimulationState::Idle),
            1 => Some(SimulationState::Running),
            2 => Some(SimulationState::Resetting),
            _ => None,
        }
    }

    /// Convert to u8 for external tag compatibility
    pub fn as_u8(&self) -> u8 {
        match self {
            SimulationState::Idle => 0,
            SimulationState::Running => 1,
            SimulationState::Resetting => 2,
        }
    }
}

/// Steps one tile's grid on a cadence
pub struct TileSimulationController {
    grid: PropagationGrid,
    kernel: Box<dyn TransitionKernel>,
    fire: FireParameters,
    state: SimulationState,
    accumulated: f32,
    rng: StdRng,
    steps: u64,
}

impl std::fmt::Debug for TileSimulationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileSimulationController")
            .field("resolution", &self.grid.resolution())
            .field("kernel", &self.kernel.name())
            .field("fire", &self.fire)
            .field("state", &self.state)
            .field("accumulated", &self.accumulated)
            .field("steps", &self.steps)
            .finish_non_exhaustive()
    }
}

impl TileSimulationController {
    /// Create an idle controller over `baseline`
    ///
    /// # Arguments
    ///
    /// * `baseline` - Initial occupancy image; its resolution becomes the grid's
    /// * `fire` - Spread parameters and step interval
    /// * `backend` - Transition kernel to run
    /// * `seed` - Seed for the per-step perturbation RNG, entropy when `None`
    ///
    /// # Errors
    ///
    /// Returns `InvalidResolution` for a resolution the kernel cannot tile, or
    /// `InvalidParameter` for out-of-range fire parameters
    pub fn new(
        baseline: BaselineImage,
        fire: FireParameters,
        backend: KernelBackend,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        fire.validate()?;
        let grid = PropagationGrid::new(baseline)?;
        let kernel = create_kernel(backend);
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        debug!(
            "Tile controller ready: {}x{} grid, {} kernel, step every {:.2}s",
            grid.resolution(),
            grid.resolution(),
            kernel.name(),
            fire.step_interval
        );

        Ok(Self {
            grid,
            kernel,
            fire,
            state: SimulationState::Idle,
            accumulated: 0.0,
            rng,
            steps: 0,
        })
    }

    /// Current lifecycle state
    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// Whether the controller steps on tick
    pub fn is_running(&self) -> bool {
        self.state == SimulationState::Running
    }

    /// Current fire parameters
    pub fn fire(&self) -> &FireParameters {
        &self.fire
    }

    /// Underlying grid
    pub fn grid(&self) -> &PropagationGrid {
        &self.grid
    }

    /// Number of steps run since creation
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Time accumulated toward the next step
    pub fn accumulated(&self) -> f32 {
        self.accumulated
    }

    /// Begin stepping; the accumulator restarts from zero
    pub fn start(&mut self) {
        if self.state != SimulationState::Running {
            self.state = SimulationState::Running;
            self.accumulated = 0.0;
            info!("Tile simulation started");
        }
    }

    /// Stop stepping; takes effect before the next tick examines the state
    pub fn stop(&mut self) {
        if self.state == SimulationState::Running {
            self.state = SimulationState::Idle;
            info!("Tile simulation stopped after {} steps", self.steps);
        }
    }

    /// Flip between running and idle
    ///
    /// # Returns
    ///
    /// Whether the controller is running afterwards
    pub fn toggle(&mut self) -> bool {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
        self.is_running()
    }

    /// Rebuild both buffers from the baseline and go idle
    ///
    /// Cells reported as burning before the reset stay known.
    pub fn reset(&mut self) {
        self.state = SimulationState::Resetting;
        self.grid.reset();
        self.accumulated = 0.0;
        self.state = SimulationState::Idle;
        debug!("Tile simulation reset to baseline");
    }

    /// Stop, replace the baseline and discard every known-burnt cell
    ///
    /// # Arguments
    ///
    /// * `baseline` - New baseline image
    /// * `resume` - Start running again immediately
    ///
    /// # Errors
    ///
    /// Returns `InvalidResolution` if the baseline's resolution is invalid; the
    /// controller is left stopped with its previous grid
    pub fn reinit(&mut self, baseline: BaselineImage, resume: bool) -> Result<(), ConfigError> {
        self.stop();
        self.state = SimulationState::Resetting;
        let result = self.grid.reinit(baseline);
        self.accumulated = 0.0;
        self.state = SimulationState::Idle;
        result?;

        info!(
            "Tile simulation reinitialised at {}x{}",
            self.grid.resolution(),
            self.grid.resolution()
        );
        if resume {
            self.start();
        }
        Ok(())
    }

    /// Stop, clear the baseline to bare ground and reset onto it
    pub fn clear_simulation(&mut self) {
        self.stop();
        self.state = SimulationState::Resetting;
        self.grid.clear_baseline();
        self.accumulated = 0.0;
        self.state = SimulationState::Idle;
        info!("Tile simulation cleared");
    }

    /// Queue a manual cell override
    pub fn mark(&mut self, x: usize, y: usize, state: CellState) {
        self.grid.mark(x, y, state);
    }

    /// Queue a manual override at the cell containing a normalized position
    pub fn mark_normalized(&mut self, position: Vec2, state: CellState) {
        let (x, y) = cell_of(position, self.grid.resolution());
        self.grid.mark(x, y, state);
    }

    /// Validate and apply one fire parameter
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` and keeps the previous value if `value` is
    /// rejected
    pub fn set_parameter(&mut self, parameter: FireParameter, value: f32) -> Result<(), ConfigError> {
        if let Err(err) = self.fire.set(parameter, value) {
            warn!("Rejected {} = {}: {}", parameter.name(), value, err);
            return Err(err);
        }
        debug!("Set {} = {}", parameter.name(), value);
        Ok(())
    }

    /// Set wind direction in degrees (0..=360)
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the direction is out of range
    pub fn set_wind_direction(&mut self, degrees: f32) -> Result<(), ConfigError> {
        self.set_parameter(FireParameter::WindDirection, degrees)
    }

    /// Set wind speed
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the speed is negative or not finite
    pub fn set_wind_speed(&mut self, speed: f32) -> Result<(), ConfigError> {
        self.set_parameter(FireParameter::WindSpeed, speed)
    }

    /// Set natural spread rate
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the rate is negative or not finite
    pub fn set_natural_spread(&mut self, rate: f32) -> Result<(), ConfigError> {
        self.set_parameter(FireParameter::NaturalSpread, rate)
    }

    /// Set seconds between steps
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the interval is negative or not finite
    pub fn set_step_interval(&mut self, seconds: f32) -> Result<(), ConfigError> {
        self.set_parameter(FireParameter::StepInterval, seconds)
    }

    /// Advance simulated time by `dt` seconds
    ///
    /// Time only accumulates while running. At most one step runs per tick;
    /// leftover time carries into the next tick.
    pub fn tick(&mut self, dt: f32) -> Vec<FireEvent> {
        if !self.is_running() {
            return Vec::new();
        }
        if !dt.is_finite() || dt < 0.0 {
            warn!("Ignoring tick with invalid dt {}", dt);
            return Vec::new();
        }

        self.accumulated += dt;
        if self.accumulated < self.fire.step_interval {
            return Vec::new();
        }
        self.accumulated -= self.fire.step_interval;
        self.step_now()
    }

    /// Run one step immediately, regardless of state and accumulated time
    pub fn step_now(&mut self) -> Vec<FireEvent> {
        let params = self.fire.spread_params(self.rng.random::<u32>());
        let cells = self.grid.step(self.kernel.as_ref(), &params);
        self.steps += 1;

        let resolution = self.grid.resolution();
        let mut events = Vec::with_capacity(2);
        if !cells.ignited.is_empty() {
            events.push(FireEvent::Ignition(IgnitionBatch::from_cells(
                &cells.ignited,
                resolution,
            )));
        }
        if !cells.burnt_out.is_empty() {
            events.push(FireEvent::Burnout(BurnoutBatch::from_cells(
                &cells.burnt_out,
                resolution,
            )));
        }
        events
    }
}
