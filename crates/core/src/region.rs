//! Axis-aligned rectangular regions used both for placement and as motion bounds.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SpriteError;

/// Axis-aligned rectangle `[x_min, x_max] x [y_min, y_max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Region {
    /// The percentage space used by the drift scene: `0..100` on both axes.
    pub const PERCENT: Region = Region {
        x_min: 0.0,
        x_max: 100.0,
        y_min: 0.0,
        y_max: 100.0,
    };

    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Region spanning `[0, width] x [0, height]`.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, width, 0.0, height)
    }

    /// Region of the given size centred on the origin.
    pub fn centered(width: f64, height: f64) -> Self {
        Self::new(-width / 2.0, width / 2.0, -height / 2.0, height / 2.0)
    }

    /// Region spanning `center ± half_extent`.
    pub fn around(center: DVec2, half_extent: DVec2) -> Self {
        Self::new(
            center.x - half_extent.x,
            center.x + half_extent.x,
            center.y - half_extent.y,
            center.y + half_extent.y,
        )
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Fails unless every bound and both extents are finite and the extents
    /// are positive.
    pub fn validate(&self) -> Result<(), SpriteError> {
        let bounds = [self.x_min, self.x_max, self.y_min, self.y_max];
        if bounds.iter().any(|v| !v.is_finite()) {
            return Err(SpriteError::config("region bounds must be finite"));
        }
        if !self.width().is_finite() || !self.height().is_finite() {
            return Err(SpriteError::config("region extent overflows f64"));
        }
        if self.width() <= 0.0 || self.height() <= 0.0 {
            return Err(SpriteError::config(format!(
                "region extent must be positive, got {} x {}",
                self.width(),
                self.height()
            )));
        }
        Ok(())
    }

    /// True when `x` lies strictly outside `[x_min, x_max]`.
    pub fn outside_x(&self, x: f64) -> bool {
        x < self.x_min || x > self.x_max
    }

    /// True when `y` lies strictly outside `[y_min, y_max]`.
    pub fn outside_y(&self, y: f64) -> bool {
        y < self.y_min || y > self.y_max
    }

    pub fn contains(&self, p: DVec2) -> bool {
        !self.outside_x(p.x) && !self.outside_y(p.y)
    }

    /// Uniform random point in `[x_min, x_max) x [y_min, y_max)`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DVec2 {
        DVec2::new(
            self.x_min + rng.gen::<f64>() * self.width(),
            self.y_min + rng.gen::<f64>() * self.height(),
        )
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::PERCENT
    }
}
