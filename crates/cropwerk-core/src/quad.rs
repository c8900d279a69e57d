// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quadrilateral model — four ordered corners in normalized [0,100] space,
// derived edge handles, and constrained updates.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{CropwerkError, Result};
use crate::geometry::{Point, distance};
use crate::types::{Corner, CornerSeed, Edge};

/// Lower bound of normalized space on each axis.
pub const NORMALIZED_MIN: f64 = 0.0;
/// Upper bound of normalized space on each axis.
pub const NORMALIZED_MAX: f64 = 100.0;
/// Inset of the default crop box from each image side, in normalized units.
pub const DEFAULT_INSET: f64 = 10.0;

fn in_range(v: f64) -> bool {
    (NORMALIZED_MIN..=NORMALIZED_MAX).contains(&v)
}

/// The crop region: four corners in normalized image-fraction coordinates.
///
/// Corners are stored as top-left, top-right, bottom-right, bottom-left.
/// Every update returns a new value; a `Quad` is never mutated in place.
///
/// Simplicity (no self-intersection) is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[Point; 4]", into = "[Point; 4]")]
pub struct Quad {
    corners: [Point; 4],
}

impl Quad {
    /// Build a quad from four normalized points, clamping each into range.
    pub fn new(corners: [Point; 4]) -> Self {
        Self {
            corners: corners.map(|p| p.clamp(NORMALIZED_MIN, NORMALIZED_MAX)),
        }
    }

    /// An axis-aligned box inset by `inset` units from every side.
    pub fn inset(inset: f64) -> Self {
        let lo = inset.clamp(NORMALIZED_MIN, NORMALIZED_MAX / 2.0);
        let hi = NORMALIZED_MAX - lo;
        Self::new([
            Point::new(lo, lo),
            Point::new(hi, lo),
            Point::new(hi, hi),
            Point::new(lo, hi),
        ])
    }

    /// The quad covering the whole image.
    pub fn full() -> Self {
        Self::inset(0.0)
    }

    /// Build a quad from a detector seed expressed in `[0,1]` fractions.
    ///
    /// Fractions outside `[0,1]` are clamped; non-finite values are rejected.
    pub fn from_seed(seed: &CornerSeed) -> Result<Self> {
        let mut corners = [Point::default(); 4];
        for (slot, [x, y]) in corners.iter_mut().zip(seed.0) {
            let p = Point::new(x, y);
            if !p.is_finite() {
                return Err(CropwerkError::InvalidSeed(format!(
                    "non-finite corner ({}, {})",
                    x, y
                )));
            }
            *slot = Point::new(x.clamp(0.0, 1.0) * 100.0, y.clamp(0.0, 1.0) * 100.0);
        }
        Ok(Self::new(corners))
    }

    /// All four corners in storage order.
    pub fn corners(&self) -> [Point; 4] {
        self.corners
    }

    pub fn corner(&self, corner: Corner) -> Point {
        self.corners[corner.index()]
    }

    /// Replace one corner, clamping both coordinates into `[0,100]`.
    ///
    /// A non-finite point leaves the quad unchanged.
    #[must_use]
    pub fn set_corner(self, corner: Corner, p: Point) -> Self {
        if !p.is_finite() {
            trace!(?corner, ?p, "ignoring non-finite corner");
            return self;
        }
        let mut corners = self.corners;
        corners[corner.index()] = p.clamp(NORMALIZED_MIN, NORMALIZED_MAX);
        Self { corners }
    }

    /// Translate both endpoints of `edge` by `delta`.
    ///
    /// The x and y components are judged independently: a component is applied
    /// only if both endpoints stay inside `[0,100]` on that axis. An edge pushed
    /// against the left border can therefore still slide vertically.
    #[must_use]
    pub fn move_edge(self, edge: Edge, delta: Point) -> Self {
        let (a, b) = edge.endpoints();
        let (pa, pb) = (self.corner(a), self.corner(b));

        let accept_x = in_range(pa.x + delta.x) && in_range(pb.x + delta.x);
        let accept_y = in_range(pa.y + delta.y) && in_range(pb.y + delta.y);
        trace!(?edge, accept_x, accept_y, "edge translation");

        let step = Point::new(
            if accept_x { delta.x } else { 0.0 },
            if accept_y { delta.y } else { 0.0 },
        );

        let mut corners = self.corners;
        corners[a.index()] = pa + step;
        corners[b.index()] = pb + step;
        Self { corners }
    }

    /// Midpoint of one edge.
    pub fn handle(&self, edge: Edge) -> Point {
        let (a, b) = edge.endpoints();
        self.corner(a).midpoint(self.corner(b))
    }

    /// The four edge-midpoint handles, derived from the current corners.
    pub fn handles(&self) -> [Point; 4] {
        Edge::ALL.map(|edge| self.handle(edge))
    }

    /// Convert into pixel space for an image of the given natural size.
    pub fn to_pixel_space(&self, width: u32, height: u32) -> PixelQuad {
        let (w, h) = (width as f64, height as f64);
        PixelQuad {
            corners: self
                .corners
                .map(|p| Point::new(p.x / NORMALIZED_MAX * w, p.y / NORMALIZED_MAX * h)),
        }
    }
}

impl From<[Point; 4]> for Quad {
    fn from(corners: [Point; 4]) -> Self {
        Self::new(corners)
    }
}

impl From<Quad> for [Point; 4] {
    fn from(quad: Quad) -> Self {
        quad.corners
    }
}

impl Default for Quad {
    fn default() -> Self {
        Self::inset(DEFAULT_INSET)
    }
}

/// A quadrilateral in source-image pixel coordinates.
///
/// Only produced by [`Quad::to_pixel_space`]; the corner order is the same.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelQuad {
    corners: [Point; 4],
}

impl PixelQuad {
    pub fn corners(&self) -> [Point; 4] {
        self.corners
    }

    pub fn corner(&self, corner: Corner) -> Point {
        self.corners[corner.index()]
    }

    /// Pixel length of one edge.
    pub fn edge_length(&self, edge: Edge) -> f64 {
        let (a, b) = edge.endpoints();
        distance(self.corner(a), self.corner(b))
    }
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(points: [(f64, f64); 4]) -> Quad {
        Quad::new(points.map(Point::from))
    }

    #[test]
    fn default_is_centered_inset_box() {
        let q = Quad::default();
        assert_eq!(
            q.corners(),
            [
                Point::new(10.0, 10.0),
                Point::new(90.0, 10.0),
                Point::new(90.0, 90.0),
                Point::new(10.0, 90.0),
            ]
        );
    }

    #[test]
    fn set_corner_clamps_out_of_range_input() {
        let samples = [
            (-5.0, 50.0),
            (150.0, 20.0),
            (30.0, -0.1),
            (30.0, 100.5),
            (-1e9, 1e9),
        ];
        for (x, y) in samples {
            let q = Quad::default().set_corner(Corner::BottomRight, Point::new(x, y));
            let p = q.corner(Corner::BottomRight);
            assert!(in_range(p.x) && in_range(p.y), "({x}, {y}) stored as {p:?}");
            assert_eq!(p, Point::new(x.clamp(0.0, 100.0), y.clamp(0.0, 100.0)));
        }
    }

    #[test]
    fn set_corner_leaves_other_corners_untouched() {
        let before = Quad::default();
        let after = before.set_corner(Corner::TopLeft, Point::new(3.0, 4.0));
        assert_eq!(after.corner(Corner::TopLeft), Point::new(3.0, 4.0));
        for c in [Corner::TopRight, Corner::BottomRight, Corner::BottomLeft] {
            assert_eq!(after.corner(c), before.corner(c));
        }
        // the original value is not mutated
        assert_eq!(before, Quad::default());
    }

    #[test]
    fn move_edge_applies_both_axes_when_in_range() {
        let q = Quad::default().move_edge(Edge::Top, Point::new(5.0, -5.0));
        assert_eq!(q.corner(Corner::TopLeft), Point::new(15.0, 5.0));
        assert_eq!(q.corner(Corner::TopRight), Point::new(95.0, 5.0));
        assert_eq!(q.corner(Corner::BottomRight), Point::new(90.0, 90.0));
    }

    #[test]
    fn move_edge_accepts_axes_independently() {
        // Top-right would leave the image on x (90 + 15 = 105) but y is fine.
        let q = Quad::default().move_edge(Edge::Top, Point::new(15.0, 4.0));
        assert_eq!(q.corner(Corner::TopLeft), Point::new(10.0, 14.0));
        assert_eq!(q.corner(Corner::TopRight), Point::new(90.0, 14.0));

        // And the converse: y clips, x slides.
        let q = Quad::default().move_edge(Edge::Left, Point::new(-4.0, 20.0));
        assert_eq!(q.corner(Corner::BottomLeft), Point::new(6.0, 90.0));
        assert_eq!(q.corner(Corner::TopLeft), Point::new(6.0, 10.0));
    }

    #[test]
    fn move_edge_allows_reaching_the_border_exactly() {
        let q = Quad::default().move_edge(Edge::Right, Point::new(10.0, 0.0));
        assert_eq!(q.corner(Corner::TopRight).x, 100.0);
        assert_eq!(q.corner(Corner::BottomRight).x, 100.0);
    }

    #[test]
    fn handles_are_midpoints_and_never_stale() {
        let mut q = quad([(0.0, 0.0), (80.0, 10.0), (70.0, 90.0), (5.0, 60.0)]);
        for step in 0..4 {
            let corners = q.corners();
            let handles = q.handles();
            for i in 0..4 {
                let expected = corners[i].midpoint(corners[(i + 1) % 4]);
                assert_eq!(handles[i], expected, "step {step}, handle {i}");
            }
            q = q
                .set_corner(Corner::ALL[step], Point::new(step as f64 * 7.0, 33.0))
                .move_edge(Edge::ALL[step], Point::new(1.5, -2.5));
        }
    }

    #[test]
    fn seed_scales_fractions_to_normalized_space() {
        let seed = CornerSeed([[0.1, 0.2], [0.9, 0.15], [0.85, 0.9], [1.2, -0.3]]);
        let q = Quad::from_seed(&seed).unwrap();
        assert!((q.corner(Corner::TopLeft).x - 10.0).abs() < 1e-9);
        assert!((q.corner(Corner::TopLeft).y - 20.0).abs() < 1e-9);
        assert_eq!(q.corner(Corner::BottomLeft), Point::new(100.0, 0.0));
    }

    #[test]
    fn seed_with_nan_is_rejected() {
        let seed = CornerSeed([[0.1, f64::NAN], [0.9, 0.1], [0.9, 0.9], [0.1, 0.9]]);
        assert!(matches!(
            Quad::from_seed(&seed),
            Err(CropwerkError::InvalidSeed(_))
        ));
    }

    #[test]
    fn pixel_conversion_scales_per_axis() {
        let q = quad([(10.0, 10.0), (90.0, 15.0), (85.0, 90.0), (15.0, 85.0)]);
        let px = q.to_pixel_space(1000, 500);
        assert_eq!(px.corner(Corner::TopRight), Point::new(900.0, 75.0));
        assert_eq!(px.corner(Corner::BottomLeft), Point::new(150.0, 425.0));
    }

    #[test]
    fn pixel_edge_lengths() {
        let px = Quad::full().to_pixel_space(640, 480);
        assert_eq!(px.edge_length(Edge::Top), 640.0);
        assert_eq!(px.edge_length(Edge::Bottom), 640.0);
        assert_eq!(px.edge_length(Edge::Left), 480.0);
        assert_eq!(px.edge_length(Edge::Right), 480.0);
    }

    #[test]
    fn non_finite_corner_is_ignored() {
        let before = Quad::default();
        for p in [
            Point::new(f64::NAN, 20.0),
            Point::new(20.0, f64::NAN),
            Point::new(f64::INFINITY, 20.0),
        ] {
            assert_eq!(before.set_corner(Corner::TopLeft, p), before);
        }
    }

    #[test]
    fn constructor_never_stores_nan() {
        let q = quad([(f64::NAN, 5.0), (90.0, f64::NAN), (f64::INFINITY, 90.0), (10.0, 90.0)]);
        for p in q.corners() {
            assert!(in_range(p.x) && in_range(p.y), "stored {p:?}");
        }
    }

    #[test]
    fn deserialized_quad_is_clamped() {
        let json = r#"[{"x":-20,"y":5},{"x":140,"y":5},{"x":90,"y":300},{"x":10,"y":90}]"#;
        let q: Quad = serde_json::from_str(json).unwrap();
        assert_eq!(q.corner(Corner::TopLeft), Point::new(0.0, 5.0));
        assert_eq!(q.corner(Corner::TopRight), Point::new(100.0, 5.0));
        assert_eq!(q.corner(Corner::BottomRight), Point::new(90.0, 100.0));
        assert_eq!(serde_json::from_str::<Quad>(&serde_json::to_string(&q).unwrap()).unwrap(), q);
    }
}
