//! Immediate-mode 2D drawing surfaces.
//!
//! Scenes draw through the [`Canvas`] trait so the same frame code can target
//! the window presenter, a headless PNG export or a recording canvas in tests.
//! Drawing outside the surface is clipped silently; a zero-sized surface is
//! valid and simply draws nothing.

use crate::visuals::Color;
use glam::Vec2;
use image::{Rgba, RgbaImage};
use std::path::Path;

/// A 2D drawing surface in pixel coordinates (origin top-left, y down).
pub trait Canvas {
    /// Surface size in pixels as `(width, height)`.
    fn size(&self) -> (u32, u32);

    /// Fill the whole surface with an opaque color.
    fn clear(&mut self, color: Color);

    /// Fill a circle blended over the existing contents with `alpha`.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: f32);

    /// Draw a one pixel wide line blended with `alpha`.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, alpha: f32);

    /// Blend a single pixel.
    fn plot(&mut self, x: i64, y: i64, color: Color, alpha: f32);
}

/// CPU rasterizer backed by an RGBA8 image.
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    image: RgbaImage,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// Reallocate the backing image. Contents are discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.image.dimensions() != (width, height) {
            self.image = RgbaImage::new(width, height);
        }
    }

    /// Raw RGBA8 bytes, row-major, suitable for a texture upload.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.image.width() && y < self.image.height() {
            Some(self.image.get_pixel(x, y).0)
        } else {
            None
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Write the current contents as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        self.image
            .save_with_format(path, image::ImageFormat::Png)
    }

    fn blend(&mut self, x: i64, y: i64, color: Color, alpha: f32) {
        if x < 0 || y < 0 || alpha <= 0.0 {
            return;
        }
        if x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        let a = alpha.min(1.0);
        let dst = self.image.get_pixel_mut(x, y);
        let mix = |s: u8, d: u8| (s as f32 * a + d as f32 * (1.0 - a)).round() as u8;
        let out_a = a + (dst[3] as f32 / 255.0) * (1.0 - a);
        *dst = Rgba([
            mix(color.r, dst[0]),
            mix(color.g, dst[1]),
            mix(color.b, dst[2]),
            (out_a * 255.0).round() as u8,
        ]);
    }
}

impl Canvas for PixelCanvas {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn clear(&mut self, color: Color) {
        let px = Rgba([color.r, color.g, color.b, 255]);
        for p in self.image.pixels_mut() {
            *p = px;
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: f32) {
        if !center.is_finite() || !radius.is_finite() || radius <= 0.0 {
            return;
        }
        // One pixel of feathering keeps sub-pixel stars visible.
        let reach = radius + 0.5;
        let min_x = (center.x - reach).floor() as i64;
        let max_x = (center.x + reach).ceil() as i64;
        let min_y = (center.y - reach).floor() as i64;
        let max_y = (center.y + reach).ceil() as i64;
        let (w, h) = self.size();
        if max_x < 0 || max_y < 0 || min_x >= w as i64 || min_y >= h as i64 {
            return;
        }
        for y in min_y.max(0)..=max_y.min(h as i64 - 1) {
            for x in min_x.max(0)..=max_x.min(w as i64 - 1) {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                let coverage = (reach - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, alpha * coverage);
                }
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, alpha: f32) {
        if !from.is_finite() || !to.is_finite() {
            return;
        }
        let delta = to - from;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0);
        // Lines are clipped by `blend`; cap the walk so a wild projection
        // cannot stall a frame.
        let steps = steps.min(4096.0) as u32;
        for i in 0..=steps {
            let p = from + delta * (i as f32 / steps as f32);
            self.blend(p.x.floor() as i64, p.y.floor() as i64, color, alpha);
        }
    }

    fn plot(&mut self, x: i64, y: i64, color: Color, alpha: f32) {
        self.blend(x, y, color, alpha);
    }
}
