//! Simulation configuration
//!
//! Every value here has a working default, so `SimulationConfig::default()`
//! is a usable configuration. Deserialized or hand-built configurations go
//! through [`SimulationConfig::validate`] before any tile is built.

use crate::core_types::PrototypeMap;
use crate::error::ConfigError;
use crate::solver::{KernelBackend, SpreadParams};
use serde::{Deserialize, Serialize};

/// Scalar inputs of the spread rule plus the stepping cadence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireParameters {
    /// Direction the wind pushes fire toward, degrees in 0..=360 (0 = north)
    pub wind_direction: f32,
    /// Wind strength, non-negative
    pub wind_speed: f32,
    /// Natural spread rate in percent per step, non-negative
    pub natural_spread: f32,
    /// Seconds of simulated time between grid steps, non-negative
    pub step_interval: f32,
}

impl Default for FireParameters {
    /// Moderate north-east wind, stepping twice per second
    fn default() -> Self {
        Self {
            wind_direction: 45.0,
            wind_speed: 5.0,
            natural_spread: 45.0,
            step_interval: 0.5,
        }
    }
}

impl FireParameters {
    /// Validate every field
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming the first rejected field
    pub fn validate(&self) -> Result<(), ConfigError> {
        for parameter in [
            FireParameter::WindDirection,
            FireParameter::WindSpeed,
            FireParameter::NaturalSpread,
            FireParameter::StepInterval,
        ] {
            parameter.check(self.get(parameter))?;
        }
        Ok(())
    }

    /// Current value of one field
    pub fn get(&self, parameter: FireParameter) -> f32 {
        match parameter {
            FireParameter::WindDirection => self.wind_direction,
            FireParameter::WindSpeed => self.wind_speed,
            FireParameter::NaturalSpread => self.natural_spread,
            FireParameter::StepInterval => self.step_interval,
        }
    }

    /// Validate and store one field, leaving it untouched on rejection
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the value is rejected
    pub fn set(&mut self, parameter: FireParameter, value: f32) -> Result<(), ConfigError> {
        let value = parameter.check(value)?;
        match parameter {
            FireParameter::WindDirection => self.wind_direction = value,
            FireParameter::WindSpeed => self.wind_speed = value,
            FireParameter::NaturalSpread => self.natural_spread = value,
            FireParameter::StepInterval => self.step_interval = value,
        }
        Ok(())
    }

    /// Kernel parameters for one step
    pub fn spread_params(&self, seed: u32) -> SpreadParams {
        SpreadParams {
            wind_direction: self.wind_direction,
            wind_speed: self.wind_speed,
            natural_spread: self.natural_spread,
            seed,
        }
    }
}

/// Selects one field of [`FireParameters`] for a setter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FireParameter {
    /// Wind direction in degrees
    WindDirection,
    /// Wind speed
    WindSpeed,
    /// Natural spread rate
    NaturalSpread,
    /// Seconds between steps
    StepInterval,
}

impl FireParameter {
    /// Field name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            FireParameter::WindDirection => "wind_direction",
            FireParameter::WindSpeed => "wind_speed",
            FireParameter::NaturalSpread => "natural_spread",
            FireParameter::StepInterval => "step_interval",
        }
    }

    /// Check `value` against this field's constraint
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the value is rejected
    pub fn check(&self, value: f32) -> Result<f32, ConfigError> {
        match self {
            FireParameter::WindDirection => ConfigError::check_direction(self.name(), value),
            _ => ConfigError::check_non_negative(self.name(), value),
        }
    }
}

/// Registry-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Initial fire parameters for every tile
    pub fire: FireParameters,
    /// Half-size of the query square used for single-point interactions
    pub selection_range: f32,
    /// Spatial index leaf capacity
    pub index_capacity: usize,
    /// Transition kernel backend
    pub kernel: KernelBackend,
    /// Seed for the per-step perturbation RNG (entropy when `None`)
    pub seed: Option<u64>,
    /// Prototype tags for each object state
    pub prototypes: PrototypeMap,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fire: FireParameters::default(),
            selection_range: 6.5,
            index_capacity: 5,
            kernel: KernelBackend::default(),
            seed: None,
            prototypes: PrototypeMap::default(),
        }
    }
}

impl SimulationConfig {
    /// Validate the whole configuration
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint: fire parameters, selection
    /// range, then index capacity
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fire.validate()?;
        ConfigError::check_non_negative("selection_range", self.selection_range)?;
        if self.index_capacity == 0 {
            return Err(ConfigError::InvalidCapacity);
        }
        Ok(())
    }

    /// Builder-style fire parameter override
    #[must_use]
    pub fn with_fire(mut self, fire: FireParameters) -> Self {
        self.fire = fire;
        self
    }

    /// Builder-style kernel override
    #[must_use]
    pub fn with_kernel(mut self, kernel: KernelBackend) -> Self {
        self.kernel = kernel;
        self
    }

    /// Builder-style seed override
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
