#![deny(unsafe_code)]
//! Scene registry: maps preset names to layout and motion configuration and
//! provides CPU-side raster snapshots.
//!
//! This crate sits between `cowspots-core` (generator, simulator, driver) and
//! the CLI, so preset dispatch lives in one place.

pub mod raster;

#[cfg(feature = "png")]
pub mod snapshot;

use std::sync::Arc;

use cowspots_core::driver::{AnimationDriver, FixedTick, SpriteRenderer};
use cowspots_core::error::SpriteError;
use cowspots_core::layout::{LayoutConfig, RandomLayoutGenerator};
use cowspots_core::motion::{BoundaryPolicy, FloorPolicy, MotionConfig, MotionSimulator};
use cowspots_core::params::param_f64;
use cowspots_core::ranges::{SizeRange, SpeedRange};
use cowspots_core::{Region, SceneSpec, SpriteSet};
use rand::rngs::SmallRng;
use serde_json::{json, Value};

/// All available preset names.
const SCENE_NAMES: &[&str] = &["drift", "tethered", "orbs"];

/// Visible extent of the tethered scene, in world units.
const TETHERED_WIDTH: f64 = 53.0;
const TETHERED_HEIGHT: f64 = 27.0;
/// Initial speed bound for the tethered scene.
const TETHERED_MAX_SPEED: f64 = 20.0;
/// The tethered scene advances by real frame time.
const TETHERED_DT: f64 = 1.0 / 60.0;
const ORB_MAX_SIZE: f64 = 100.0;

/// Named scene configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePreset {
    /// Cow spots drifting across a 0–100 percentage space, bouncing off its edges.
    Drift,
    /// Sprites in a centred world region, bouncing off its edges at a fixed speed.
    Tethered,
    /// Static orbs scattered over the canvas in pixel space.
    Orbs,
}

impl ScenePreset {
    /// Looks a preset up by name.
    ///
    /// Returns `SpriteError::UnknownScene` if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, SpriteError> {
        match name {
            "drift" => Ok(ScenePreset::Drift),
            "tethered" => Ok(ScenePreset::Tethered),
            "orbs" => Ok(ScenePreset::Orbs),
            _ => Err(SpriteError::UnknownScene(name.to_string())),
        }
    }

    /// Returns a slice of all recognized preset names.
    pub fn list_names() -> &'static [&'static str] {
        SCENE_NAMES
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScenePreset::Drift => "drift",
            ScenePreset::Tethered => "tethered",
            ScenePreset::Orbs => "orbs",
        }
    }

    /// Placement region for a `width x height` pixel canvas.
    pub fn region(&self, width: usize, height: usize) -> Region {
        match self {
            ScenePreset::Drift => Region::PERCENT,
            ScenePreset::Tethered => Region::centered(TETHERED_WIDTH, TETHERED_HEIGHT),
            ScenePreset::Orbs => Region::from_size(width as f64, height as f64),
        }
    }

    pub fn layout_config(&self) -> LayoutConfig {
        match self {
            ScenePreset::Drift => LayoutConfig::default(),
            ScenePreset::Tethered => LayoutConfig {
                speed: SpeedRange::symmetric(TETHERED_MAX_SPEED),
                ..LayoutConfig::default()
            },
            ScenePreset::Orbs => LayoutConfig {
                max_exclusion_radius: ORB_MAX_SIZE,
                speed: SpeedRange::still(),
                size: SizeRange::new(4.0, ORB_MAX_SIZE),
                ..LayoutConfig::default()
            },
        }
    }

    pub fn motion_config(&self, width: usize, height: usize) -> MotionConfig {
        match self {
            ScenePreset::Drift => MotionConfig::default(),
            ScenePreset::Tethered => MotionConfig {
                boundary: BoundaryPolicy::Region(self.region(width, height)),
                floor_policy: FloorPolicy::Disabled,
                reinject: SpeedRange::symmetric(TETHERED_MAX_SPEED),
                ..MotionConfig::default()
            },
            ScenePreset::Orbs => MotionConfig {
                boundary: BoundaryPolicy::Region(self.region(width, height)),
                floor_policy: FloorPolicy::Disabled,
                reinject: SpeedRange::still(),
                ..MotionConfig::default()
            },
        }
    }

    pub fn default_dt(&self) -> f64 {
        match self {
            ScenePreset::Tethered => TETHERED_DT,
            ScenePreset::Drift | ScenePreset::Orbs => cowspots_core::driver::DEFAULT_DT,
        }
    }

    /// Schema describing every JSON override, with this preset's defaults.
    pub fn param_schema(&self) -> Value {
        let layout = self.layout_config();
        let motion = self.motion_config(1, 1);
        json!({
            "max_exclusion_radius": {
                "type": "number",
                "default": layout.max_exclusion_radius,
                "min": 0.0,
                "description": "Upper bound of the random placement exclusion radius"
            },
            "speed_min": {
                "type": "number",
                "default": layout.speed.min,
                "min": 0.0,
                "description": "Lower bound of per-axis speed draws (initial and reinjected)"
            },
            "speed_max": {
                "type": "number",
                "default": layout.speed.max,
                "min": 0.0,
                "description": "Upper bound of per-axis speed draws"
            },
            "speed_signed": {
                "type": "boolean",
                "default": layout.speed.signed,
                "description": "Give each axis a random direction"
            },
            "size_min": {
                "type": "number",
                "default": layout.size.min,
                "description": "Smallest render size in pixels"
            },
            "size_max": {
                "type": "number",
                "default": layout.size.max,
                "description": "Largest render size in pixels"
            },
            "asset_order": {
                "type": "string",
                "default": "random",
                "enum": ["random", "sequential"],
                "description": "How assets are picked from the pool"
            },
            "attempts_per_sprite": {
                "type": "integer",
                "default": layout.attempts_per_sprite,
                "min": 1,
                "description": "Candidate draws per sprite before the fallback applies"
            },
            "fallback": {
                "type": "string",
                "default": layout.fallback.to_string(),
                "enum": ["shrink", "truncate"],
                "description": "Shrink the exclusion radius or return fewer sprites"
            },
            "speed_floor": {
                "type": "number",
                "default": motion.speed_floor,
                "min": 0.0,
                "description": "Speeds at or below this are reinjected"
            },
            "floor_policy": {
                "type": "string",
                "default": motion.floor_policy.to_string(),
                "enum": ["either", "horizontal", "both", "disabled"],
                "description": "Which components must be slow to trigger reinjection"
            },
            "dt": {
                "type": "number",
                "default": self.default_dt(),
                "min": 0.0,
                "description": "Simulation time advanced per tick"
            }
        })
    }
}

/// A preset brought to life: the generated set plus the driver that moves it.
pub struct Scene {
    preset: ScenePreset,
    region: Region,
    layout: LayoutConfig,
    dt: f64,
    driver: AnimationDriver<FixedTick, SmallRng>,
}

impl Scene {
    /// Builds the scene a [`SceneSpec`] describes and generates its initial layout.
    ///
    /// Returns `UnknownScene` for an unrecognized preset and
    /// `InvalidConfiguration` for bad spec fields or overrides.
    pub fn from_spec(spec: &SceneSpec) -> Result<Self, SpriteError> {
        spec.validate()?;
        let preset = ScenePreset::from_name(&spec.scene)?;
        let region = preset.region(spec.width, spec.height);
        let layout = preset.layout_config().with_overrides(&spec.params);
        let motion = preset
            .motion_config(spec.width, spec.height)
            .with_overrides(&spec.params);
        let dt = param_f64(&spec.params, "dt", preset.default_dt());

        let mut rng = spec.rng();
        let sprites =
            RandomLayoutGenerator::new(layout).generate(spec.count, &region, &spec.assets, &mut rng)?;
        let simulator = MotionSimulator::new(motion)?;
        log::info!(
            "scene '{}' ready: {} sprites, dt {dt}",
            preset.name(),
            sprites.len()
        );

        Ok(Self {
            preset,
            region,
            layout,
            dt,
            driver: AnimationDriver::new(sprites, simulator, FixedTick::new(dt), rng),
        })
    }

    pub fn preset(&self) -> ScenePreset {
        self.preset
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn sprites(&self) -> Arc<SpriteSet> {
        self.driver.snapshot()
    }

    pub fn driver(&self) -> &AnimationDriver<FixedTick, SmallRng> {
        &self.driver
    }

    /// Advances the scene by `n` ticks.
    pub fn run(&mut self, n: usize) -> Result<Arc<SpriteSet>, SpriteError> {
        self.driver.run(n)
    }

    pub fn render<S: SpriteRenderer>(&self, renderer: &mut S) -> Result<(), S::Error> {
        self.driver.render(renderer)
    }

    /// Effective parameter values after overrides.
    pub fn params(&self) -> Value {
        let motion = self.driver.simulator().config();
        json!({
            "max_exclusion_radius": self.layout.max_exclusion_radius,
            "speed_min": self.layout.speed.min,
            "speed_max": self.layout.speed.max,
            "speed_signed": self.layout.speed.signed,
            "size_min": self.layout.size.min,
            "size_max": self.layout.size.max,
            "asset_order": self.layout.asset_order,
            "attempts_per_sprite": self.layout.attempts_per_sprite,
            "fallback": self.layout.fallback.to_string(),
            "speed_floor": motion.speed_floor,
            "floor_policy": motion.floor_policy.to_string(),
            "dt": self.dt,
        })
    }
}
