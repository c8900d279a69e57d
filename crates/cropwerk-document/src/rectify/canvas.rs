// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Drawing capability used by the rectification engine, and an offline
// software implementation over `image::RgbaImage`.

use cropwerk_core::config::Interpolation;
use cropwerk_core::error::{CropwerkError, Result};
use cropwerk_core::geometry::{Affine, Point, triangle_contains};
use image::{Rgba, RgbaImage};
use tracing::{debug, trace, warn};

/// The drawing operations the rectification engine needs.
///
/// Mirrors a 2-D canvas: a clip path restricts where `draw_image` may write,
/// and the current affine maps source-image coordinates onto the canvas.
pub trait Canvas {
    /// Canvas size in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Fill a rectangle with the background colour, ignoring the clip.
    fn clear_rect(&mut self, x: u32, y: u32, width: u32, height: u32);

    /// Restrict subsequent draws to the inside of `triangle` (canvas pixels).
    fn clip_to_path(&mut self, triangle: &[Point; 3]);

    /// Set the source-to-canvas transform for subsequent draws.
    fn apply_affine(&mut self, transform: Affine);

    /// Composite `source` through the current transform, inside the clip.
    fn draw_image(&mut self, source: &RgbaImage);

    /// Drop the clip and reset the transform to identity.
    fn reset(&mut self);

    /// Encode the canvas as JPEG with the given quality (1-100).
    fn encode(&self, quality: u8) -> Result<Vec<u8>>;
}

/// CPU canvas backed by an `RgbaImage`.
///
/// `draw_image` walks the canvas pixels inside the clip triangle, maps each
/// pixel centre back through the inverse transform, and samples the source
/// there. Pixels outside the clip are never written.
pub struct SoftwareCanvas {
    pixels: RgbaImage,
    background: Rgba<u8>,
    interpolation: Interpolation,
    clip: Option<[Point; 3]>,
    transform: Affine,
}

impl SoftwareCanvas {
    /// A canvas of `width` x `height` filled with `background`.
    pub fn new(width: u32, height: u32, background: [u8; 4], interpolation: Interpolation) -> Self {
        let background = Rgba(background);
        Self {
            pixels: RgbaImage::from_pixel(width, height, background),
            background,
            interpolation,
            clip: None,
            transform: Affine::IDENTITY,
        }
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Consume the canvas and return its pixels.
    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Canvas pixel rows/columns touched by the clip (or the whole canvas).
    fn clip_bounds(&self) -> (u32, u32, u32, u32) {
        let (w, h) = self.pixels.dimensions();
        let Some(tri) = &self.clip else {
            return (0, 0, w, h);
        };
        let min_x = tri.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = tri.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = tri.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = tri.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        let to_px = |v: f64, limit: u32| -> u32 { v.clamp(0.0, limit as f64) as u32 };
        (
            to_px(min_x.floor(), w),
            to_px(min_y.floor(), h),
            to_px(max_x.ceil(), w),
            to_px(max_y.ceil(), h),
        )
    }
}

impl Canvas for SoftwareCanvas {
    fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    fn clear_rect(&mut self, x: u32, y: u32, width: u32, height: u32) {
        let (w, h) = self.pixels.dimensions();
        let x_end = x.saturating_add(width).min(w);
        let y_end = y.saturating_add(height).min(h);
        for py in y.min(h)..y_end {
            for px in x.min(w)..x_end {
                self.pixels.put_pixel(px, py, self.background);
            }
        }
    }

    fn clip_to_path(&mut self, triangle: &[Point; 3]) {
        trace!(?triangle, "clip set");
        self.clip = Some(*triangle);
    }

    fn apply_affine(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn draw_image(&mut self, source: &RgbaImage) {
        let (src_w, src_h) = source.dimensions();
        if src_w == 0 || src_h == 0 {
            warn!("draw_image called with an empty source; nothing drawn");
            return;
        }
        let Some(inverse) = self.transform.inverse() else {
            warn!(transform = ?self.transform, "singular transform; nothing drawn");
            return;
        };

        let (x0, y0, x1, y1) = self.clip_bounds();
        let mut written = 0usize;
        for py in y0..y1 {
            for px in x0..x1 {
                let centre = Point::new(px as f64 + 0.5, py as f64 + 0.5);
                if let Some(tri) = &self.clip {
                    if !triangle_contains(tri, centre) {
                        continue;
                    }
                }
                let src = inverse.apply(centre);
                // Source pixel centres sit at integer + 0.5.
                let (sx, sy) = (src.x - 0.5, src.y - 0.5);
                let pixel = match self.interpolation {
                    Interpolation::Nearest => sample_nearest(source, sx, sy),
                    Interpolation::Bilinear => sample_bilinear(source, sx, sy),
                };
                self.pixels.put_pixel(px, py, pixel);
                written += 1;
            }
        }
        debug!(written, "draw_image composited");
    }

    fn reset(&mut self) {
        self.clip = None;
        self.transform = Affine::IDENTITY;
    }

    fn encode(&self, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let rgb = image::DynamicImage::ImageRgba8(self.pixels.clone()).to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder)
            .map_err(|err| CropwerkError::Encode(format!("JPEG encoding failed: {}", err)))?;
        Ok(buffer)
    }
}

// -- Sampling helpers ---------------------------------------------------------

/// Nearest-neighbour sample at continuous pixel-index coordinates, clamped to
/// the image border.
fn sample_nearest(image: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let (w, h) = image.dimensions();
    let ix = x.round().clamp(0.0, (w - 1) as f64) as u32;
    let iy = y.round().clamp(0.0, (h - 1) as f64) as u32;
    *image.get_pixel(ix, iy)
}

/// Bilinear sample at continuous pixel-index coordinates, clamped to the
/// image border. Integer coordinates return the stored pixel exactly.
fn sample_bilinear(image: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let (w, h) = image.dimensions();
    let x = x.clamp(0.0, (w - 1) as f64);
    let y = y.clamp(0.0, (h - 1) as f64);

    let left = x.floor() as u32;
    let top = y.floor() as u32;
    let right = (left + 1).min(w - 1);
    let bottom = (top + 1).min(h - 1);
    let fx = x - left as f64;
    let fy = y - top as f64;

    let tl = image.get_pixel(left, top).0;
    let tr = image.get_pixel(right, top).0;
    let bl = image.get_pixel(left, bottom).0;
    let br = image.get_pixel(right, bottom).0;

    let mut out = [0u8; 4];
    for c in 0..4 {
        let upper = tl[c] as f64 * (1.0 - fx) + tr[c] as f64 * fx;
        let lower = bl[c] as f64 * (1.0 - fx) + br[c] as f64 * fx;
        out[c] = (upper * (1.0 - fy) + lower * fy).round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}

// -- Tests --------------------------------------------------------------------
