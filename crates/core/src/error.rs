//! Configuration errors
//!
//! Only malformed initialization parameters are fatal. Everything that can go
//! wrong at runtime (nothing near a point, a position outside a tile, an
//! unknown tile id) degrades to a logged no-op instead of an error value.

use crate::solver::KERNEL_TILE;

/// Errors raised while building or reconfiguring the simulation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Grid resolution is zero or not a multiple of the kernel tile size
    InvalidResolution {
        /// Offending resolution
        resolution: usize,
    },
    /// Scalar parameter is non-finite, negative or out of range
    InvalidParameter {
        /// Parameter name (e.g. `"wind_speed"`)
        name: &'static str,
        /// Rejected value
        value: f32,
        /// Description of the constraint that was violated
        constraint: &'static str,
    },
    /// Baseline image does not match the grid resolution
    BaselineMismatch {
        /// Expected number of cells (R²)
        expected: usize,
        /// Number of cells supplied
        actual: usize,
    },
    /// Tile geometry is not usable (non-finite or non-positive size)
    InvalidGeometry {
        /// Geometry field name
        name: &'static str,
        /// Rejected value
        value: f32,
    },
    /// Spatial index capacity must be at least one
    InvalidCapacity,
}

impl ConfigError {
    /// Check a scalar that must be finite and non-negative
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `value` is NaN, infinite or negative
    pub fn check_non_negative(name: &'static str, value: f32) -> Result<f32, ConfigError> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(ConfigError::InvalidParameter {
                name,
                value,
                constraint: "must be finite and non-negative",
            })
        }
    }

    /// Check a compass direction in degrees
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `value` is not within 0..=360
    pub fn check_direction(name: &'static str, value: f32) -> Result<f32, ConfigError> {
        if value.is_finite() && (0.0..=360.0).contains(&value) {
            Ok(value)
        } else {
            Err(ConfigError::InvalidParameter {
                name,
                value,
                constraint: "must be within 0..=360 degrees",
            })
        }
    }

    /// Check a grid resolution against the kernel tile size
    ///
    /// # Errors
    /// Returns `InvalidResolution` if `resolution` is zero or not a multiple of 8
    pub fn check_resolution(resolution: usize) -> Result<usize, ConfigError> {
        if resolution > 0 && resolution % KERNEL_TILE == 0 {
            Ok(resolution)
        } else {
            Err(ConfigError::InvalidResolution { resolution })
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidResolution { resolution } => write!(
                f,
                "Grid resolution {resolution} must be a positive multiple of {KERNEL_TILE}"
            ),
            ConfigError::InvalidParameter {
                name,
                value,
                constraint,
            } => write!(f, "Parameter {name}: {constraint}, got {value}"),
            ConfigError::BaselineMismatch { expected, actual } => write!(
                f,
                "Baseline image has {actual} cells, grid expects {expected}"
            ),
            ConfigError::InvalidGeometry { name, value } => write!(
                f,
                "Tile geometry {name}: must be finite and positive, got {value}"
            ),
            ConfigError::InvalidCapacity => {
                write!(f, "Spatial index capacity must be at least 1")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
