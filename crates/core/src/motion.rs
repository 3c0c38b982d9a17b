//! Per-tick motion update: edge reflection, explicit Euler integration, and
//! velocity-floor reinjection.
//!
//! [`MotionSimulator::step`] borrows the current set and returns a new one.
//! Every sprite is updated from its own state only, so the order of sprites
//! in the set has no influence on the result.

use std::fmt;
use std::str::FromStr;

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SpriteError;
use crate::params::{param_bool, param_f64, param_parse};
use crate::ranges::SpeedRange;
use crate::region::Region;
use crate::sprite::{Sprite, SpriteSet};

/// Speeds at or below this are considered stalled.
pub const DEFAULT_SPEED_FLOOR: f64 = 0.1;

/// Where a sprite bounces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BoundaryPolicy {
    /// Absolute bounds shared by every sprite.
    Region(Region),
    /// Bounds of `spawn ± half extent`, so each sprite wanders around its origin.
    AroundSpawn { half_width: f64, half_height: f64 },
}

impl BoundaryPolicy {
    /// Bounds that apply to `sprite`.
    pub fn bounds_for(&self, sprite: &Sprite) -> Region {
        match *self {
            BoundaryPolicy::Region(region) => region,
            BoundaryPolicy::AroundSpawn {
                half_width,
                half_height,
            } => Region::around(sprite.spawn_position(), DVec2::new(half_width, half_height)),
        }
    }

    pub fn validate(&self) -> Result<(), SpriteError> {
        match *self {
            BoundaryPolicy::Region(region) => region.validate(),
            BoundaryPolicy::AroundSpawn {
                half_width,
                half_height,
            } => {
                if !(half_width.is_finite() && half_height.is_finite())
                    || half_width <= 0.0
                    || half_height <= 0.0
                {
                    return Err(SpriteError::config(format!(
                        "spawn-relative bounds must be positive, got ±{half_width} x ±{half_height}"
                    )));
                }
                Ok(())
            }
        }
    }
}

impl Default for BoundaryPolicy {
    fn default() -> Self {
        BoundaryPolicy::Region(Region::PERCENT)
    }
}

/// Which velocity components must be slow for a reinjection to fire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorPolicy {
    /// Either component at or below the floor.
    #[default]
    EitherAxis,
    /// Only the horizontal component is checked.
    HorizontalOnly,
    /// Both components at or below the floor.
    BothAxes,
    /// Never reinject; used by static scenes.
    Disabled,
}

impl FloorPolicy {
    pub fn is_stalled(&self, velocity: DVec2, floor: f64) -> bool {
        let x = velocity.x.abs() <= floor;
        let y = velocity.y.abs() <= floor;
        match self {
            FloorPolicy::EitherAxis => x || y,
            FloorPolicy::HorizontalOnly => x,
            FloorPolicy::BothAxes => x && y,
            FloorPolicy::Disabled => false,
        }
    }
}

impl FromStr for FloorPolicy {
    type Err = SpriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "either" => Ok(FloorPolicy::EitherAxis),
            "horizontal" => Ok(FloorPolicy::HorizontalOnly),
            "both" => Ok(FloorPolicy::BothAxes),
            "disabled" => Ok(FloorPolicy::Disabled),
            other => Err(SpriteError::config(format!("unknown floor policy '{other}'"))),
        }
    }
}

impl fmt::Display for FloorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FloorPolicy::EitherAxis => "either",
            FloorPolicy::HorizontalOnly => "horizontal",
            FloorPolicy::BothAxes => "both",
            FloorPolicy::Disabled => "disabled",
        };
        f.write_str(name)
    }
}

/// Tunables for [`MotionSimulator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    pub boundary: BoundaryPolicy,
    pub speed_floor: f64,
    pub floor_policy: FloorPolicy,
    /// Range fresh velocities are drawn from on reinjection.
    pub reinject: SpeedRange,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            boundary: BoundaryPolicy::default(),
            speed_floor: DEFAULT_SPEED_FLOOR,
            floor_policy: FloorPolicy::default(),
            reinject: SpeedRange::default(),
        }
    }
}

impl MotionConfig {
    /// Applies JSON overrides on top of `self`. Reinjection follows the same
    /// `speed_*` keys as the initial layout draw.
    pub fn with_overrides(self, params: &Value) -> Self {
        Self {
            boundary: self.boundary,
            speed_floor: param_f64(params, "speed_floor", self.speed_floor),
            floor_policy: param_parse(params, "floor_policy", self.floor_policy),
            reinject: SpeedRange {
                min: param_f64(params, "speed_min", self.reinject.min),
                max: param_f64(params, "speed_max", self.reinject.max),
                signed: param_bool(params, "speed_signed", self.reinject.signed),
            },
        }
    }

    pub fn validate(&self) -> Result<(), SpriteError> {
        if !self.speed_floor.is_finite() || self.speed_floor < 0.0 {
            return Err(SpriteError::config(format!(
                "speed floor must be finite and non-negative, got {}",
                self.speed_floor
            )));
        }
        self.boundary.validate()?;
        self.reinject.validate()
    }
}

/// Stateless per-tick updater.
#[derive(Debug, Clone, Default)]
pub struct MotionSimulator {
    config: MotionConfig,
}

impl MotionSimulator {
    /// Creates a simulator, rejecting an invalid [`MotionConfig`].
    pub fn new(config: MotionConfig) -> Result<Self, SpriteError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Advances every sprite by `dt` and returns the new set.
    ///
    /// `rng` is consulted only for velocity reinjection. Fails with
    /// `InvalidTimestep` for a negative or non-finite `dt`, and with
    /// `NonFiniteState` if any sprite would end up NaN or infinite; on
    /// failure no output set is produced.
    pub fn step<R: Rng + ?Sized>(
        &self,
        sprites: &SpriteSet,
        dt: f64,
        rng: &mut R,
    ) -> Result<SpriteSet, SpriteError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(SpriteError::InvalidTimestep(dt));
        }
        let next = sprites
            .iter()
            .map(|sprite| {
                let moved = self.advance(sprite, dt, rng);
                if moved.is_finite() {
                    Ok(moved)
                } else {
                    Err(SpriteError::NonFiniteState(sprite.id()))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SpriteSet::from_unique(next))
    }

    /// reflect → integrate → maybe reinject, for a single sprite.
    fn advance<R: Rng + ?Sized>(&self, sprite: &Sprite, dt: f64, rng: &mut R) -> Sprite {
        let bounds = self.config.boundary.bounds_for(sprite);
        let mut position = sprite.position();
        let mut velocity = sprite.velocity();

        if bounds.outside_x(position.x) {
            velocity.x = -velocity.x;
        }
        if bounds.outside_y(position.y) {
            velocity.y = -velocity.y;
        }

        position += velocity * dt;

        if self
            .config
            .floor_policy
            .is_stalled(velocity, self.config.speed_floor)
        {
            velocity = self.config.reinject.sample(rng);
            log::trace!("{} stalled, reinjected velocity {velocity}", sprite.id());
        }

        sprite.moved(position, velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::{AssetRef, SpriteId};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use serde_json::json;

    const DT: f64 = 1.0 / 50.0;

    fn sprite(id: u64, position: DVec2, velocity: DVec2) -> Sprite {
        Sprite::new(
            SpriteId(id),
            AssetRef::from("/cowspots/spot.svg"),
            position,
            velocity,
            50.0,
            1.0,
        )
    }

    fn set(sprites: Vec<Sprite>) -> SpriteSet {
        SpriteSet::new(sprites).unwrap()
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(77)
    }

    fn sim() -> MotionSimulator {
        MotionSimulator::new(MotionConfig::default()).unwrap()
    }

    fn only(set: &SpriteSet) -> &Sprite {
        &set.as_slice()[0]
    }

    #[test]
    fn interior_sprite_moves_by_velocity_times_dt() {
        let input = set(vec![sprite(0, DVec2::new(50.0, 50.0), DVec2::new(2.0, -1.5))]);
        let out = sim().step(&input, DT, &mut rng()).unwrap();
        let s = only(&out);
        assert_eq!(s.position(), DVec2::new(50.0 + 2.0 * DT, 50.0 - 1.5 * DT));
        assert_eq!(s.velocity(), DVec2::new(2.0, -1.5));
    }

    #[test]
    fn crossing_right_edge_reflects_before_integrating() {
        let x_max = 100.0;
        let input = set(vec![sprite(0, DVec2::new(x_max + 1.0, 50.0), DVec2::new(5.0, 2.0))]);
        let out = sim().step(&input, DT, &mut rng()).unwrap();
        let s = only(&out);
        assert_eq!(s.velocity().x, -5.0);
        assert_eq!(s.position().x, (x_max + 1.0) + (-5.0) * DT);
        assert_eq!(s.velocity().y, 2.0);
    }

    #[test]
    fn crossing_left_and_top_edges_reflect() {
        let input = set(vec![sprite(0, DVec2::new(-0.5, 40.0), DVec2::new(-3.0, 1.0))]);
        let out = sim().step(&input, DT, &mut rng()).unwrap();
        assert_eq!(only(&out).velocity(), DVec2::new(3.0, 1.0));

        let input = set(vec![sprite(0, DVec2::new(40.0, -2.0), DVec2::new(1.0, -3.0))]);
        let out = sim().step(&input, DT, &mut rng()).unwrap();
        assert_eq!(only(&out).velocity(), DVec2::new(1.0, 3.0));
    }

    #[test]
    fn corner_reflects_both_components_in_one_tick() {
        let input = set(vec![sprite(0, DVec2::new(101.0, 102.0), DVec2::new(2.0, 4.0))]);
        let out = sim().step(&input, DT, &mut rng()).unwrap();
        let s = only(&out);
        assert_eq!(s.velocity(), DVec2::new(-2.0, -4.0));
        assert_eq!(s.position(), DVec2::new(101.0 - 2.0 * DT, 102.0 - 4.0 * DT));
    }

    #[test]
    fn sitting_exactly_on_the_edge_does_not_reflect() {
        let input = set(vec![sprite(0, DVec2::new(100.0, 0.0), DVec2::new(1.0, -1.0))]);
        let out = sim().step(&input, DT, &mut rng()).unwrap();
        assert_eq!(only(&out).velocity(), DVec2::new(1.0, -1.0));
    }

    #[test]
    fn spawn_relative_bounds_follow_each_sprite() {
        let sim = MotionSimulator::new(MotionConfig {
            boundary: BoundaryPolicy::AroundSpawn {
                half_width: 2.0,
                half_height: 2.0,
            },
            ..MotionConfig::default()
        })
        .unwrap();
        // Spawned at (10, 10); still inside after drifting to (11.5, 10).
        let base = sprite(0, DVec2::new(10.0, 10.0), DVec2::new(1.0, 1.0));
        let inside = base.moved(DVec2::new(11.5, 10.0), DVec2::new(1.0, 1.0));
        let outside = base.moved(DVec2::new(12.5, 10.0), DVec2::new(1.0, 1.0));

        let out = sim.step(&set(vec![inside]), DT, &mut rng()).unwrap();
        assert_eq!(only(&out).velocity().x, 1.0);
        let out = sim.step(&set(vec![outside]), DT, &mut rng()).unwrap();
        assert_eq!(only(&out).velocity().x, -1.0);
    }

    #[test]
    fn stalled_velocity_is_reinjected_into_range() {
        let input = set(vec![sprite(0, DVec2::new(50.0, 50.0), DVec2::new(0.01, 0.01))]);
        let config = MotionConfig::default();
        let mut rng = rng();
        for _ in 0..200 {
            let out = sim().step(&input, DT, &mut rng).unwrap();
            let v = only(&out).velocity();
            let range = config.reinject.min..config.reinject.max;
            assert!(range.contains(&v.x) && range.contains(&v.y), "{v}");
        }
    }

    #[test]
    fn reinjection_uses_the_pre_reinjection_velocity_for_movement() {
        let input = set(vec![sprite(0, DVec2::new(50.0, 50.0), DVec2::new(0.05, 2.0))]);
        let out = sim().step(&input, DT, &mut rng()).unwrap();
        let s = only(&out);
        assert_eq!(s.position(), DVec2::new(50.0 + 0.05 * DT, 50.0 + 2.0 * DT));
        assert_ne!(s.velocity(), DVec2::new(0.05, 2.0));
    }

    #[test]
    fn floor_policies_decide_when_to_fire() {
        let floor = 0.1;
        let slow_x = DVec2::new(0.05, 2.0);
        let slow_y = DVec2::new(2.0, -0.05);
        let slow_both = DVec2::new(-0.05, 0.0);
        assert!(FloorPolicy::EitherAxis.is_stalled(slow_x, floor));
        assert!(FloorPolicy::EitherAxis.is_stalled(slow_y, floor));
        assert!(FloorPolicy::HorizontalOnly.is_stalled(slow_x, floor));
        assert!(!FloorPolicy::HorizontalOnly.is_stalled(slow_y, floor));
        assert!(!FloorPolicy::BothAxes.is_stalled(slow_x, floor));
        assert!(FloorPolicy::BothAxes.is_stalled(slow_both, floor));
        assert!(!FloorPolicy::Disabled.is_stalled(DVec2::ZERO, floor));
    }

    #[test]
    fn zero_dt_keeps_positions_and_fast_velocities() {
        let input = set(vec![
            sprite(0, DVec2::new(10.0, 20.0), DVec2::new(1.0, 2.0)),
            sprite(1, DVec2::new(90.0, 80.0), DVec2::new(-2.5, 0.7)),
        ]);
        let out = sim().step(&input, 0.0, &mut rng()).unwrap();
        for (before, after) in input.iter().zip(out.iter()) {
            assert_eq!(before.position(), after.position());
            assert_eq!(before.velocity(), after.velocity());
        }
    }

    #[test]
    fn zero_dt_on_stalled_sprite_keeps_position_but_may_reinject() {
        let input = set(vec![sprite(0, DVec2::new(10.0, 20.0), DVec2::ZERO)]);
        let out = sim().step(&input, 0.0, &mut rng()).unwrap();
        assert_eq!(only(&out).position(), DVec2::new(10.0, 20.0));
        assert_ne!(only(&out).velocity(), DVec2::ZERO);
    }

    #[test]
    fn negative_or_non_finite_dt_is_rejected() {
        let input = set(vec![sprite(0, DVec2::new(10.0, 20.0), DVec2::ONE)]);
        for dt in [-1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = sim().step(&input, dt, &mut rng());
            assert!(
                matches!(result, Err(SpriteError::InvalidTimestep(_))),
                "dt {dt} accepted"
            );
        }
    }

    #[test]
    fn overflowing_state_fails_the_whole_step() {
        let input = set(vec![
            sprite(0, DVec2::new(10.0, 20.0), DVec2::ONE),
            sprite(1, DVec2::new(50.0, 50.0), DVec2::new(f64::MAX, 1.0)),
        ]);
        let result = sim().step(&input, 10.0, &mut rng());
        assert_eq!(result, Err(SpriteError::NonFiniteState(SpriteId(1))));
    }

    #[test]
    fn identity_fields_are_untouched() {
        let input = set(vec![sprite(3, DVec2::new(101.0, -1.0), DVec2::new(0.0, 0.0))]);
        let out = sim().step(&input, DT, &mut rng()).unwrap();
        let (a, b) = (only(&input), only(&out));
        assert_eq!(a.id(), b.id());
        assert_eq!(a.asset(), b.asset());
        assert_eq!(a.size(), b.size());
        assert_eq!(a.spawn_position(), b.spawn_position());
        assert_eq!(a.exclusion_radius(), b.exclusion_radius());
    }

    #[test]
    fn same_input_and_rng_state_give_same_output() {
        let input = set(vec![
            sprite(0, DVec2::new(10.0, 20.0), DVec2::new(0.0, 0.0)),
            sprite(1, DVec2::new(101.0, 50.0), DVec2::new(3.0, 1.0)),
        ]);
        let a = sim().step(&input, DT, &mut rng()).unwrap();
        let b = sim().step(&input, DT, &mut rng()).unwrap();
        assert_eq!(a, b);
        // The input is borrowed, never edited.
        assert_eq!(only(&input).velocity(), DVec2::ZERO);
    }

    #[test]
    fn slow_sprite_past_edge_oscillates_outside() {
        // Overshoot larger than one tick of travel: reflection flips the sign
        // every tick and the sprite never gets back inside on its own.
        let dt = 0.02;
        let mut current = set(vec![sprite(0, DVec2::new(100.05, 50.0), DVec2::new(0.2, 1.0))]);
        let mut r = rng();
        for tick in 0..10 {
            current = sim().step(&current, dt, &mut r).unwrap();
            let s = only(&current);
            assert!(s.position().x > 100.0, "tick {tick}: {}", s.position());
            let expected_vx = if tick % 2 == 0 { -0.2 } else { 0.2 };
            assert_eq!(s.velocity().x, expected_vx, "tick {tick}");
        }
        assert!((only(&current).position().x - 100.05).abs() < 1e-9);
    }

    #[test]
    fn sprite_order_does_not_change_per_sprite_results() {
        let a = sprite(0, DVec2::new(101.0, 20.0), DVec2::new(3.0, 1.0));
        let b = sprite(1, DVec2::new(40.0, -5.0), DVec2::new(-2.0, -2.0));
        let forward = sim()
            .step(&set(vec![a.clone(), b.clone()]), DT, &mut rng())
            .unwrap();
        let backward = sim().step(&set(vec![b, a]), DT, &mut rng()).unwrap();
        for s in &forward {
            assert_eq!(Some(s), backward.get(s.id()));
        }
    }

    #[test]
    fn new_rejects_invalid_config() {
        let bad_floor = MotionConfig {
            speed_floor: -0.1,
            ..MotionConfig::default()
        };
        assert!(MotionSimulator::new(bad_floor).is_err());
        let bad_bounds = MotionConfig {
            boundary: BoundaryPolicy::AroundSpawn {
                half_width: 0.0,
                half_height: 1.0,
            },
            ..MotionConfig::default()
        };
        assert!(MotionSimulator::new(bad_bounds).is_err());
    }

    #[test]
    fn overrides_apply_floor_and_reinject_range() {
        let config = MotionConfig::default().with_overrides(&json!({
            "speed_floor": 0.5,
            "floor_policy": "both",
            "speed_min": 1.0,
            "speed_max": 4.0
        }));
        assert_eq!(config.speed_floor, 0.5);
        assert_eq!(config.floor_policy, FloorPolicy::BothAxes);
        assert_eq!(config.reinject, SpeedRange::new(1.0, 4.0));
        assert_eq!(config.boundary, BoundaryPolicy::default());
    }

    #[test]
    fn boundary_policy_json_is_tagged() {
        let v = serde_json::to_value(BoundaryPolicy::AroundSpawn {
            half_width: 1.0,
            half_height: 2.0,
        })
        .unwrap();
        assert_eq!(v["kind"], "around_spawn");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn sprites_inside_bounds_never_flip(
                x in 0.0_f64..=100.0,
                y in 0.0_f64..=100.0,
                vx in 0.2_f64..5.0,
                vy in 0.2_f64..5.0,
            ) {
                let input = set(vec![sprite(0, DVec2::new(x, y), DVec2::new(vx, -vy))]);
                let out = sim().step(&input, DT, &mut rng()).unwrap();
                prop_assert_eq!(only(&out).velocity(), DVec2::new(vx, -vy));
            }

            #[test]
            fn step_output_is_always_finite(
                x in -500.0_f64..500.0,
                y in -500.0_f64..500.0,
                vx in -50.0_f64..50.0,
                vy in -50.0_f64..50.0,
                dt in 0.0_f64..1.0,
            ) {
                let input = set(vec![sprite(0, DVec2::new(x, y), DVec2::new(vx, vy))]);
                let out = sim().step(&input, dt, &mut rng()).unwrap();
                prop_assert!(only(&out).is_finite());
            }
        }
    }
}
