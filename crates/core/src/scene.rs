//! Serializable description of a run.
//!
//! A [`SceneSpec`] names a preset and carries everything needed to rebuild a
//! run: output size, sprite count, asset pool, parameter overrides, tick
//! count, and optionally an RNG seed. Without a seed each run is different.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::SpriteError;
use crate::sprite::AssetRef;

/// Description of a scene run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneSpec {
    pub scene: String,
    pub width: usize,
    pub height: usize,
    /// Signed so that a negative request is reported instead of wrapping.
    pub count: i64,
    pub assets: Vec<AssetRef>,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub ticks: usize,
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl SceneSpec {
    /// Creates a spec with no overrides, no seed, and zero ticks.
    pub fn new(scene: &str, width: usize, height: usize, count: i64, assets: Vec<AssetRef>) -> Self {
        Self {
            scene: scene.to_string(),
            width,
            height,
            count,
            assets,
            params: empty_params(),
            seed: None,
            ticks: 0,
        }
    }

    /// Checks the fields that do not depend on the preset.
    pub fn validate(&self) -> Result<(), SpriteError> {
        if self.width == 0 || self.height == 0 {
            return Err(SpriteError::config(format!(
                "output size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.count < 0 {
            return Err(SpriteError::config(format!(
                "sprite count must be >= 0, got {}",
                self.count
            )));
        }
        if self.assets.is_empty() {
            return Err(SpriteError::config("asset pool is empty"));
        }
        if !self.params.is_object() {
            return Err(SpriteError::config("params must be a JSON object"));
        }
        Ok(())
    }

    /// RNG for this run: seeded when `seed` is set, from entropy otherwise.
    pub fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        }
    }
}
