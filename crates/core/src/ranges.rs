//! Uniform sampling ranges for sprite speeds and sizes.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SpriteError;

/// Lower bound of a velocity draw, matching the floor it must escape.
pub const DEFAULT_SPEED_MIN: f64 = 0.1;
/// Upper bound of a velocity draw.
pub const DEFAULT_SPEED_MAX: f64 = 3.1;
pub const DEFAULT_SIZE_MIN: f64 = 40.0;
pub const DEFAULT_SIZE_MAX: f64 = 100.0;

/// Uniform draw in `[min, max)`; a collapsed range returns `min`.
fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    min + rng.gen::<f64>() * (max - min)
}

/// Per-axis speed magnitude range.
///
/// With `signed` set, each axis gets an independent random direction so the
/// draw covers `(-max, -min] ∪ [min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedRange {
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub signed: bool,
}

impl SpeedRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            signed: false,
        }
    }

    /// Symmetric range `(-max, max)` used by the tethered scene.
    pub fn symmetric(max: f64) -> Self {
        Self {
            min: 0.0,
            max,
            signed: true,
        }
    }

    /// A range that always yields zero velocity.
    pub fn still() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn validate(&self) -> Result<(), SpriteError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(SpriteError::config("speed range must be finite"));
        }
        if self.min < 0.0 || self.max < self.min {
            return Err(SpriteError::config(format!(
                "speed range must satisfy 0 <= min <= max, got [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Draws one velocity component.
    pub fn sample_component<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let magnitude = uniform(rng, self.min, self.max);
        if self.signed && rng.gen::<bool>() {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Draws both components independently.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DVec2 {
        let vx = self.sample_component(rng);
        let vy = self.sample_component(rng);
        DVec2::new(vx, vy)
    }
}

impl Default for SpeedRange {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED_MIN, DEFAULT_SPEED_MAX)
    }
}

/// Render size range; both ends strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: f64,
    pub max: f64,
}

impl SizeRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn validate(&self) -> Result<(), SpriteError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(SpriteError::config("size range must be finite"));
        }
        if self.min <= 0.0 || self.max < self.min {
            return Err(SpriteError::config(format!(
                "size range must satisfy 0 < min <= max, got [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(())
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        uniform(rng, self.min, self.max)
    }
}

impl Default for SizeRange {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE_MIN, DEFAULT_SIZE_MAX)
    }
}
