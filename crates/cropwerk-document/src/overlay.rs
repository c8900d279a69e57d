// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Crop overlay — draws the quad outline, corner handles, and edge-midpoint
// handles over the source photo, as the interactive crop screen shows them.

use cropwerk_core::error::Result;
use cropwerk_core::geometry::Point;
use cropwerk_core::quad::Quad;
use cropwerk_core::types::{Corner, DragTarget, Edge};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};
use tracing::{debug, instrument};

use crate::source::SourceImage;

/// Colours and sizes for the overlay.
#[derive(Debug, Clone, Copy)]
pub struct OverlayStyle {
    pub outline: Rgba<u8>,
    pub corner_handle: Rgba<u8>,
    pub edge_handle: Rgba<u8>,
    /// Colour of the handle currently being dragged.
    pub active_handle: Rgba<u8>,
    /// Handle radius as a fraction of the shorter image side.
    pub handle_radius_fraction: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            outline: Rgba([0, 122, 255, 255]),
            corner_handle: Rgba([0, 122, 255, 255]),
            edge_handle: Rgba([255, 255, 255, 255]),
            active_handle: Rgba([255, 149, 0, 255]),
            handle_radius_fraction: 0.015,
        }
    }
}

/// Render the crop overlay on a copy of the source pixels.
///
/// Handles are derived from the quad at render time.
#[instrument(skip_all, fields(uri = %source.uri(), active = ?active))]
pub fn render_overlay(
    source: &SourceImage,
    quad: &Quad,
    active: Option<DragTarget>,
    style: &OverlayStyle,
) -> Result<RgbaImage> {
    let pixels = source.pixels()?;
    let (w, h) = pixels.dimensions();
    let mut out = pixels.clone();

    let px = quad.to_pixel_space(w, h);
    let to_f32 = |p: Point| (p.x as f32, p.y as f32);
    let to_i32 = |p: Point| (p.x.round() as i32, p.y.round() as i32);
    let radius = ((w.min(h) as f32 * style.handle_radius_fraction).round() as i32).max(2);

    for edge in Edge::ALL {
        let (a, b) = edge.endpoints();
        draw_line_segment_mut(&mut out, to_f32(px.corner(a)), to_f32(px.corner(b)), style.outline);
    }

    let (sx, sy) = (w as f64 / 100.0, h as f64 / 100.0);
    let edge_handles = quad.handles().map(|p| Point::new(p.x * sx, p.y * sy));
    for (edge, centre) in Edge::ALL.iter().zip(edge_handles) {
        let colour = if active == Some(DragTarget::Edge(*edge)) {
            style.active_handle
        } else {
            style.edge_handle
        };
        draw_filled_circle_mut(&mut out, to_i32(centre), radius, colour);
        draw_hollow_circle_mut(&mut out, to_i32(centre), radius, style.outline);
    }

    for corner in Corner::ALL {
        let colour = if active == Some(DragTarget::Corner(corner)) {
            style.active_handle
        } else {
            style.corner_handle
        };
        draw_filled_circle_mut(&mut out, to_i32(px.corner(corner)), radius, colour);
    }

    debug!(width = w, height = h, radius, "overlay rendered");
    Ok(out)
}
