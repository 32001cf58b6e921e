//! Spread rule parameters
//!
//! A flammable cell ignites with probability `1 - Π(1 - p_n)` over its burning
//! 8-neighbours. The per-neighbour chance `p_n` combines:
//!
//! - natural spread: `natural_spread / 100`, divided by the neighbour
//!   distance (1 orthogonal, √2 diagonal)
//! - wind: `wind_speed × WIND_SPREAD_FACTOR × cos θ`, where θ is the angle
//!   between the neighbour→cell direction and the wind direction; fire
//!   travelling upwind is slowed
//!
//! clamped to [0, 1] and scaled by the target cell's flammability.

use crate::core_types::Vec2;

/// Spread chance added per unit of wind speed for perfectly aligned neighbours
pub const WIND_SPREAD_FACTOR: f32 = 0.1;

/// Flammability of open ground relative to vegetation
pub const GROUND_SPREAD_FACTOR: f32 = 0.5;

/// Per-step chance that a burning cell burns out
pub const BURNOUT_CHANCE: f32 = 0.3;

/// Neighbour offsets `(dx, dy)`, row-major, centre excluded
pub const NEIGHBOUR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Scalar inputs to one transition step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadParams {
    /// Direction the wind pushes fire toward, degrees (0 = north/+y, 90 = east/+x)
    pub wind_direction: f32,
    /// Wind speed (dimensionless strength)
    pub wind_speed: f32,
    /// Natural spread rate in percent per step
    pub natural_spread: f32,
    /// Perturbation seed for this step
    pub seed: u32,
}

impl SpreadParams {
    /// Unit vector the wind blows toward
    pub fn wind_vector(&self) -> Vec2 {
        let radians = self.wind_direction.to_radians();
        Vec2::new(radians.sin(), radians.cos())
    }

    /// Chance that a burning neighbour at each of [`NEIGHBOUR_OFFSETS`] ignites the centre cell
    ///
    /// Computed once per step and shared by every cell.
    pub fn neighbour_chances(&self) -> [f32; 8] {
        let wind = self.wind_vector();
        let natural = self.natural_spread / 100.0;

        NEIGHBOUR_OFFSETS.map(|(dx, dy)| {
            // Fire travels from the neighbour back toward the centre cell
            let travel = Vec2::new(-dx as f32, -dy as f32);
            let distance = travel.norm();
            let alignment = travel.dot(&wind) / distance;

            let chance = natural / distance + self.wind_speed * WIND_SPREAD_FACTOR * alignment;
            chance.clamp(0.0, 1.0)
        })
    }
}
