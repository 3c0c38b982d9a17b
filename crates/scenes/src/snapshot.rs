//! PNG snapshots of a sprite set.
//!
//! Feature-gated behind `png` (default on) so lighter frontends can depend on
//! this crate without pulling in the `image` crate. The pixel conversion lives
//! in [`crate::raster`].

use std::path::Path;

use cowspots_core::error::SpriteError;
use cowspots_core::{Region, SpriteSet};

use crate::raster::sprites_to_rgba;

/// Rasterizes `sprites` onto a `width x height` canvas and writes it as a PNG.
///
/// Returns `SpriteError::InvalidConfiguration` if the canvas dimensions are
/// zero or overflow `u32`, or `SpriteError::Io` on write failure.
pub fn write_png(
    sprites: &SpriteSet,
    region: &Region,
    width: usize,
    height: usize,
    path: &Path,
) -> Result<(), SpriteError> {
    if width == 0 || height == 0 {
        return Err(SpriteError::InvalidConfiguration(
            "snapshot size must be non-zero".into(),
        ));
    }
    let w = u32::try_from(width)
        .map_err(|_| SpriteError::InvalidConfiguration("snapshot width overflows u32".into()))?;
    let h = u32::try_from(height)
        .map_err(|_| SpriteError::InvalidConfiguration("snapshot height overflows u32".into()))?;
    let rgba = sprites_to_rgba(sprites, region, width, height);
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| SpriteError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| SpriteError::Io(e.to_string()))?;
    log::info!("wrote {width}x{height} snapshot to {}", path.display());
    Ok(())
}
