#![deny(unsafe_code)]
//! Core of the cowspots drifting-sprite background.
//!
//! Provides the `Sprite`/`SpriteSet` data model, the rejection-sampling
//! `RandomLayoutGenerator`, the per-tick `MotionSimulator`, the
//! `AnimationDriver` that owns and republishes the live set, and the
//! `SceneSpec` run description with its JSON parameter helpers.

pub mod driver;
pub mod error;
pub mod layout;
pub mod motion;
pub mod params;
pub mod ranges;
pub mod region;
pub mod scene;
pub mod sprite;

pub use driver::{AnimationDriver, FixedTick, SnapshotReader, SpriteRenderer, TickSource};
pub use error::SpriteError;
pub use layout::{AssetOrder, FallbackPolicy, LayoutConfig, LayoutOutcome, RandomLayoutGenerator};
pub use motion::{BoundaryPolicy, FloorPolicy, MotionConfig, MotionSimulator};
pub use ranges::{SizeRange, SpeedRange};
pub use region::Region;
pub use scene::SceneSpec;
pub use sprite::{AssetRef, Sprite, SpriteId, SpriteSet};

pub use glam::DVec2;
