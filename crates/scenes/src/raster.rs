//! Pure-computation RGBA rasterization of a [`SpriteSet`].
//!
//! Always available (no feature gate) so the PNG snapshot path and any other
//! frontend can share the same conversion. Each sprite becomes a filled disc
//! whose diameter is its `size` in pixels, centred on its position mapped from
//! region coordinates onto the canvas.

use std::convert::Infallible;

use cowspots_core::driver::SpriteRenderer;
use cowspots_core::{DVec2, Region, SpriteSet};

/// Page background.
pub const BACKGROUND: [u8; 4] = [255, 255, 255, 255];
/// Spot colour.
pub const INK: [u8; 4] = [0, 0, 0, 255];

/// Maps a region coordinate to pixel space on a `width x height` canvas.
pub fn to_pixel(region: &Region, width: usize, height: usize, p: DVec2) -> DVec2 {
    DVec2::new(
        (p.x - region.x_min) / region.width() * width as f64,
        (p.y - region.y_min) / region.height() * height as f64,
    )
}

/// Paints one RGBA8 frame. The buffer length is `width * height * 4`.
pub fn sprites_to_rgba(sprites: &SpriteSet, region: &Region, width: usize, height: usize) -> Vec<u8> {
    let mut renderer = RasterRenderer::new(*region, width, height);
    match renderer.draw(sprites) {
        Ok(()) => renderer.into_pixels(),
        Err(never) => match never {},
    }
}

/// [`SpriteRenderer`] that paints into an in-memory RGBA8 buffer.
#[derive(Debug, Clone)]
pub struct RasterRenderer {
    region: Region,
    width: usize,
    height: usize,
    background: [u8; 4],
    ink: [u8; 4],
    pixels: Vec<u8>,
}

impl RasterRenderer {
    pub fn new(region: Region, width: usize, height: usize) -> Self {
        Self {
            region,
            width,
            height,
            background: BACKGROUND,
            ink: INK,
            pixels: BACKGROUND.repeat(width * height),
        }
    }

    pub fn with_colors(mut self, background: [u8; 4], ink: [u8; 4]) -> Self {
        self.background = background;
        self.ink = ink;
        self.clear();
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    fn clear(&mut self) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&self.background);
        }
    }

    /// Fills every pixel whose centre lies inside the disc.
    fn fill_disc(&mut self, center: DVec2, radius: f64) {
        if self.width == 0 || self.height == 0 || radius <= 0.0 {
            return;
        }
        let x0 = (center.x - radius).floor().max(0.0) as usize;
        let y0 = (center.y - radius).floor().max(0.0) as usize;
        let x1 = ((center.x + radius).ceil().max(0.0) as usize).min(self.width);
        let y1 = ((center.y + radius).ceil().max(0.0) as usize).min(self.height);
        let r2 = radius * radius;

        for y in y0..y1 {
            let dy = y as f64 + 0.5 - center.y;
            for x in x0..x1 {
                let dx = x as f64 + 0.5 - center.x;
                if dx * dx + dy * dy <= r2 {
                    let idx = (y * self.width + x) * 4;
                    self.pixels[idx..idx + 4].copy_from_slice(&self.ink);
                }
            }
        }
    }
}

impl SpriteRenderer for RasterRenderer {
    type Error = Infallible;

    fn draw(&mut self, sprites: &SpriteSet) -> Result<(), Self::Error> {
        self.clear();
        for sprite in sprites {
            let center = to_pixel(&self.region, self.width, self.height, sprite.position());
            self.fill_disc(center, sprite.size() / 2.0);
        }
        Ok(())
    }
}
