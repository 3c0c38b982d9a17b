//! Rejection-sampling placement of a fresh [`SpriteSet`].
//!
//! Each slot draws candidate positions and exclusion radii until one sits at
//! least its own radius away from every sprite already accepted; rejected
//! candidates retry the same slot. Attempts per slot are bounded, and what
//! happens when a slot runs out is chosen by [`FallbackPolicy`].

use std::fmt;
use std::str::FromStr;

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SpriteError;
use crate::params::{param_bool, param_f64, param_parse, param_usize};
use crate::ranges::{SizeRange, SpeedRange};
use crate::region::Region;
use crate::sprite::{AssetRef, Sprite, SpriteId, SpriteSet};

/// Upper bound of the random exclusion radius.
pub const DEFAULT_MAX_EXCLUSION_RADIUS: f64 = 3.0;
/// Candidate draws per slot before the fallback kicks in.
pub const DEFAULT_ATTEMPTS_PER_SPRITE: usize = 64;
/// Rounds of radius halving under [`FallbackPolicy::ShrinkRadius`]; the last
/// round runs with a zero radius and always accepts.
pub const MAX_SHRINK_ROUNDS: usize = 8;

/// How assets are picked from the pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetOrder {
    /// Uniform draw per sprite.
    #[default]
    Random,
    /// Round-robin through the pool in order.
    Sequential,
}

impl FromStr for AssetOrder {
    type Err = SpriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(AssetOrder::Random),
            "sequential" => Ok(AssetOrder::Sequential),
            other => Err(SpriteError::config(format!("unknown asset order '{other}'"))),
        }
    }
}

/// What the generator does when a slot exhausts its attempts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Halve the radius scale and keep trying, ending with a zero radius.
    /// Always yields the requested count.
    #[default]
    ShrinkRadius,
    /// Stop and return the sprites placed so far.
    Truncate,
}

impl FromStr for FallbackPolicy {
    type Err = SpriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shrink" | "shrink_radius" => Ok(FallbackPolicy::ShrinkRadius),
            "truncate" => Ok(FallbackPolicy::Truncate),
            other => Err(SpriteError::config(format!("unknown fallback policy '{other}'"))),
        }
    }
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackPolicy::ShrinkRadius => f.write_str("shrink"),
            FallbackPolicy::Truncate => f.write_str("truncate"),
        }
    }
}

/// Tunables for [`RandomLayoutGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub max_exclusion_radius: f64,
    pub speed: SpeedRange,
    pub size: SizeRange,
    pub asset_order: AssetOrder,
    pub attempts_per_sprite: usize,
    pub fallback: FallbackPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_exclusion_radius: DEFAULT_MAX_EXCLUSION_RADIUS,
            speed: SpeedRange::default(),
            size: SizeRange::default(),
            asset_order: AssetOrder::default(),
            attempts_per_sprite: DEFAULT_ATTEMPTS_PER_SPRITE,
            fallback: FallbackPolicy::default(),
        }
    }
}

impl LayoutConfig {
    /// Applies JSON overrides on top of `self`; unknown or mistyped keys are ignored.
    pub fn with_overrides(self, params: &Value) -> Self {
        Self {
            max_exclusion_radius: param_f64(
                params,
                "max_exclusion_radius",
                self.max_exclusion_radius,
            ),
            speed: SpeedRange {
                min: param_f64(params, "speed_min", self.speed.min),
                max: param_f64(params, "speed_max", self.speed.max),
                signed: param_bool(params, "speed_signed", self.speed.signed),
            },
            size: SizeRange {
                min: param_f64(params, "size_min", self.size.min),
                max: param_f64(params, "size_max", self.size.max),
            },
            asset_order: param_parse(params, "asset_order", self.asset_order),
            attempts_per_sprite: param_usize(
                params,
                "attempts_per_sprite",
                self.attempts_per_sprite,
            ),
            fallback: param_parse(params, "fallback", self.fallback),
        }
    }

    pub fn validate(&self) -> Result<(), SpriteError> {
        if !self.max_exclusion_radius.is_finite() || self.max_exclusion_radius < 0.0 {
            return Err(SpriteError::config(format!(
                "max exclusion radius must be finite and non-negative, got {}",
                self.max_exclusion_radius
            )));
        }
        if self.attempts_per_sprite == 0 {
            return Err(SpriteError::config("attempts per sprite must be at least 1"));
        }
        self.speed.validate()?;
        self.size.validate()
    }
}

/// Result of a generation run, with the bookkeeping needed to reason about it.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOutcome {
    pub sprites: SpriteSet,
    /// Number of candidates discarded across all slots.
    pub rejections: usize,
    /// Highest shrink round any slot needed (0 when no slot fell back).
    pub max_shrink_round: usize,
    /// True when [`FallbackPolicy::Truncate`] stopped early.
    pub truncated: bool,
}

struct Placement {
    position: DVec2,
    radius: f64,
    rejections: usize,
    round: usize,
}

/// Scatters sprites over a region by bounded rejection sampling.
#[derive(Debug, Clone, Default)]
pub struct RandomLayoutGenerator {
    config: LayoutConfig,
}

impl RandomLayoutGenerator {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Generates up to `count` sprites inside `region`.
    ///
    /// Fails with `InvalidConfiguration` for a negative count, an empty asset
    /// pool, a degenerate region, or an invalid [`LayoutConfig`].
    pub fn generate<R: Rng + ?Sized>(
        &self,
        count: i64,
        region: &Region,
        assets: &[AssetRef],
        rng: &mut R,
    ) -> Result<SpriteSet, SpriteError> {
        self.generate_detailed(count, region, assets, rng)
            .map(|outcome| outcome.sprites)
    }

    /// Same as [`generate`](Self::generate) but also reports rejection statistics.
    pub fn generate_detailed<R: Rng + ?Sized>(
        &self,
        count: i64,
        region: &Region,
        assets: &[AssetRef],
        rng: &mut R,
    ) -> Result<LayoutOutcome, SpriteError> {
        let count = usize::try_from(count)
            .map_err(|_| SpriteError::config(format!("sprite count must be >= 0, got {count}")))?;
        if assets.is_empty() {
            return Err(SpriteError::config("asset pool is empty"));
        }
        region.validate()?;
        self.config.validate()?;

        let mut placed: Vec<Sprite> = Vec::with_capacity(count);
        let mut rejections = 0;
        let mut max_shrink_round = 0;
        let mut truncated = false;

        for slot in 0..count {
            let Some(placement) = self.place_slot(&placed, region, rng) else {
                log::warn!(
                    "layout truncated: placed {} of {count} sprites after {} attempts on slot {slot}",
                    placed.len(),
                    self.config.attempts_per_sprite
                );
                rejections += self.config.attempts_per_sprite;
                truncated = true;
                break;
            };
            rejections += placement.rejections;
            max_shrink_round = max_shrink_round.max(placement.round);

            let asset = self.pick_asset(slot, assets, rng);
            let velocity = self.config.speed.sample(rng);
            let size = self.config.size.sample(rng);
            placed.push(Sprite::new(
                SpriteId(slot as u64),
                asset,
                placement.position,
                velocity,
                size,
                placement.radius,
            ));
        }

        log::debug!(
            "layout placed {} sprites in {:.1}x{:.1} region ({rejections} rejections, shrink round {max_shrink_round})",
            placed.len(),
            region.width(),
            region.height()
        );

        Ok(LayoutOutcome {
            sprites: SpriteSet::from_unique(placed),
            rejections,
            max_shrink_round,
            truncated,
        })
    }

    /// Retries one slot until a candidate clears every placed sprite, or the
    /// fallback policy gives up.
    fn place_slot<R: Rng + ?Sized>(
        &self,
        placed: &[Sprite],
        region: &Region,
        rng: &mut R,
    ) -> Option<Placement> {
        let rounds = match self.config.fallback {
            FallbackPolicy::ShrinkRadius => MAX_SHRINK_ROUNDS,
            FallbackPolicy::Truncate => 1,
        };
        let mut rejections = 0;

        for round in 0..rounds {
            let scale = match self.config.fallback {
                FallbackPolicy::ShrinkRadius => shrink_scale(round),
                FallbackPolicy::Truncate => 1.0,
            };
            if round > 0 {
                log::debug!("slot {} shrinking exclusion radius to {scale}x", placed.len());
            }
            for _ in 0..self.config.attempts_per_sprite {
                let position = region.sample(rng);
                let radius = rng.gen::<f64>() * self.config.max_exclusion_radius * scale;
                if is_clear(placed, position, radius) {
                    return Some(Placement {
                        position,
                        radius,
                        rejections,
                        round,
                    });
                }
                rejections += 1;
            }
        }
        None
    }

    fn pick_asset<R: Rng + ?Sized>(&self, slot: usize, assets: &[AssetRef], rng: &mut R) -> AssetRef {
        let index = match self.config.asset_order {
            AssetOrder::Random => rng.gen_range(0..assets.len()),
            AssetOrder::Sequential => slot % assets.len(),
        };
        assets[index].clone()
    }
}

/// Radius multiplier for a shrink round: 1, 1/2, 1/4, ... and 0 on the last round.
fn shrink_scale(round: usize) -> f64 {
    if round + 1 >= MAX_SHRINK_ROUNDS {
        0.0
    } else {
        0.5_f64.powi(round as i32)
    }
}

/// True when `position` is at least `radius` from every placed sprite.
fn is_clear(placed: &[Sprite], position: DVec2, radius: f64) -> bool {
    placed
        .iter()
        .all(|other| other.position().distance(position) >= radius)
}
