//! Sprite records and the id-unique [`SpriteSet`] that carries them between ticks.

use std::collections::HashSet;
use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::SpriteError;

/// Stable identifier of a sprite within its set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpriteId(pub u64);

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque reference to the image a sprite is drawn with (usually a URL path).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(String);

impl AssetRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AssetRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single movable decorative element.
///
/// Only `position` and `velocity` ever change after creation, and only through
/// [`MotionSimulator::step`](crate::motion::MotionSimulator::step), which
/// returns new records instead of editing these in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    id: SpriteId,
    asset: AssetRef,
    position: DVec2,
    spawn_position: DVec2,
    velocity: DVec2,
    size: f64,
    exclusion_radius: f64,
}

impl Sprite {
    /// Creates a sprite whose spawn position equals `position`.
    pub fn new(
        id: SpriteId,
        asset: AssetRef,
        position: DVec2,
        velocity: DVec2,
        size: f64,
        exclusion_radius: f64,
    ) -> Self {
        Self {
            id,
            asset,
            position,
            spawn_position: position,
            velocity,
            size,
            exclusion_radius,
        }
    }

    pub fn id(&self) -> SpriteId {
        self.id
    }

    pub fn asset(&self) -> &AssetRef {
        &self.asset
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn spawn_position(&self) -> DVec2 {
        self.spawn_position
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn exclusion_radius(&self) -> f64 {
        self.exclusion_radius
    }

    /// Copy of this sprite with new live fields; everything else is carried over.
    pub(crate) fn moved(&self, position: DVec2, velocity: DVec2) -> Self {
        Self {
            position,
            velocity,
            ..self.clone()
        }
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

/// Ordered collection of sprites with unique ids.
///
/// Order has no meaning to the simulation; renderers use it for stable keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Sprite>", into = "Vec<Sprite>")]
pub struct SpriteSet {
    sprites: Vec<Sprite>,
}

impl SpriteSet {
    /// Builds a set, failing with `DuplicateSpriteId` if two sprites share an id.
    pub fn new(sprites: Vec<Sprite>) -> Result<Self, SpriteError> {
        let mut seen = HashSet::with_capacity(sprites.len());
        for sprite in &sprites {
            if !seen.insert(sprite.id) {
                return Err(SpriteError::DuplicateSpriteId(sprite.id));
            }
        }
        Ok(Self { sprites })
    }

    /// Wraps sprites already known to carry distinct ids.
    pub(crate) fn from_unique(sprites: Vec<Sprite>) -> Self {
        debug_assert!(Self::new(sprites.clone()).is_ok());
        Self { sprites }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sprite> {
        self.sprites.iter()
    }

    pub fn as_slice(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.id == id)
    }
}

impl TryFrom<Vec<Sprite>> for SpriteSet {
    type Error = SpriteError;

    fn try_from(sprites: Vec<Sprite>) -> Result<Self, Self::Error> {
        Self::new(sprites)
    }
}

impl From<SpriteSet> for Vec<Sprite> {
    fn from(set: SpriteSet) -> Self {
        set.sprites
    }
}

impl<'a> IntoIterator for &'a SpriteSet {
    type Item = &'a Sprite;
    type IntoIter = std::slice::Iter<'a, Sprite>;

    fn into_iter(self) -> Self::IntoIter {
        self.sprites.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite(id: u64, x: f64, y: f64) -> Sprite {
        Sprite::new(
            SpriteId(id),
            AssetRef::from("/cowspots/spot1.svg"),
            DVec2::new(x, y),
            DVec2::new(1.0, -1.0),
            40.0,
            2.0,
        )
    }

    #[test]
    fn new_sprite_spawns_where_it_starts() {
        let s = sprite(0, 12.0, 34.0);
        assert_eq!(s.spawn_position(), s.position());
    }

    #[test]
    fn moved_keeps_identity_and_spawn() {
        let s = sprite(3, 1.0, 2.0);
        let m = s.moved(DVec2::new(5.0, 6.0), DVec2::new(-1.0, 0.5));
        assert_eq!(m.id(), s.id());
        assert_eq!(m.asset(), s.asset());
        assert_eq!(m.size(), s.size());
        assert_eq!(m.exclusion_radius(), s.exclusion_radius());
        assert_eq!(m.spawn_position(), DVec2::new(1.0, 2.0));
        assert_eq!(m.position(), DVec2::new(5.0, 6.0));
        assert_eq!(m.velocity(), DVec2::new(-1.0, 0.5));
    }

    #[test]
    fn set_rejects_duplicate_ids() {
        let result = SpriteSet::new(vec![sprite(1, 0.0, 0.0), sprite(1, 5.0, 5.0)]);
        assert_eq!(result, Err(SpriteError::DuplicateSpriteId(SpriteId(1))));
    }

    #[test]
    fn set_lookup_by_id() {
        let set = SpriteSet::new(vec![sprite(4, 0.0, 0.0), sprite(9, 5.0, 5.0)]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(SpriteId(9)).unwrap().position(), DVec2::new(5.0, 5.0));
        assert!(set.get(SpriteId(2)).is_none());
    }

    #[test]
    fn deserializing_duplicate_ids_fails() {
        let set = SpriteSet::new(vec![sprite(1, 0.0, 0.0)]).unwrap();
        let one = serde_json::to_value(&set).unwrap();
        let doubled = serde_json::json!([one[0], one[0]]);
        let result: Result<SpriteSet, _> = serde_json::from_value(doubled);
        assert!(result.is_err());
    }

    #[test]
    fn json_round_trip_preserves_set() {
        let set = SpriteSet::new(vec![sprite(0, 1.5, 2.5), sprite(1, 3.0, 4.0)]).unwrap();
        let json = serde_json::to_string(&set).unwrap();
        let restored: SpriteSet = serde_json::from_str(&json).unwrap();
        assert_eq!(set, restored);
    }

    #[test]
    fn asset_ref_serializes_as_plain_string() {
        let v = serde_json::to_value(AssetRef::from("/cowspots/a.svg")).unwrap();
        assert_eq!(v, serde_json::json!("/cowspots/a.svg"));
    }

    #[test]
    fn non_finite_detection() {
        let s = sprite(0, 0.0, 0.0);
        assert!(s.is_finite());
        assert!(!s.moved(DVec2::new(f64::NAN, 0.0), DVec2::ZERO).is_finite());
        assert!(!s.moved(DVec2::ZERO, DVec2::new(0.0, f64::INFINITY)).is_finite());
    }
}
