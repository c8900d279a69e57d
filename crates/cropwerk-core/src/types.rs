// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Cropwerk crop flow.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// One of the four corners of the crop quadrilateral.
///
/// The discriminant order is the storage order inside [`crate::Quad`] and must
/// not change: the rectification triangulation depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    /// Storage index (0..4).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// One of the four edges of the crop quadrilateral.
///
/// Edge *i* joins corner *i* to corner *(i+1) mod 4*.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The two corners this edge connects, in winding order.
    pub fn endpoints(self) -> (Corner, Corner) {
        match self {
            Edge::Top => (Corner::TopLeft, Corner::TopRight),
            Edge::Right => (Corner::TopRight, Corner::BottomRight),
            Edge::Bottom => (Corner::BottomRight, Corner::BottomLeft),
            Edge::Left => (Corner::BottomLeft, Corner::TopLeft),
        }
    }
}

/// What a drag gesture moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "at", rename_all = "snake_case")]
pub enum DragTarget {
    /// Relocate a single corner.
    Corner(Corner),
    /// Translate both endpoints of an edge together.
    Edge(Edge),
}

impl std::fmt::Display for DragTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DragTarget::Corner(c) => write!(f, "corner:{:?}", c),
            DragTarget::Edge(e) => write!(f, "edge:{:?}", e),
        }
    }
}

/// Live bounding rectangle of the surface the image is rendered on, in the
/// same client coordinates as pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Convert a client-space pointer position into normalized `[0,100]`
    /// image-fraction coordinates, clamped per axis.
    ///
    /// Returns `None` for a collapsed surface (non-positive width or height)
    /// or when the position does not resolve to a number.
    pub fn to_normalized(&self, client: Point) -> Option<Point> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return None;
        }
        let x = (client.x - self.left) / self.width * 100.0;
        let y = (client.y - self.top) / self.height * 100.0;
        if x.is_nan() || y.is_nan() {
            return None;
        }
        Some(Point::new(x, y).clamp(0.0, 100.0))
    }
}

/// Four corner estimates from an external detector, each `[x, y]` in `[0,1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CornerSeed(pub [[f64; 2]; 4]);

impl CornerSeed {
    /// Reorder the points into top-left, top-right, bottom-right, bottom-left.
    ///
    /// Top-left has the smallest `x + y` and bottom-right the largest;
    /// top-right has the smallest `y - x` and bottom-left the largest.
    pub fn ordered(self) -> CornerSeed {
        let pts = &self.0;
        let sum = |p: &[f64; 2]| p[0] + p[1];
        let diff = |p: &[f64; 2]| p[1] - p[0];
        CornerSeed([
            extreme_by(pts, sum, false),
            extreme_by(pts, diff, false),
            extreme_by(pts, sum, true),
            extreme_by(pts, diff, true),
        ])
    }
}

/// The point with the smallest (or largest) `key`; ties keep the earliest.
fn extreme_by(pts: &[[f64; 2]; 4], key: impl Fn(&[f64; 2]) -> f64, want_max: bool) -> [f64; 2] {
    let mut best = pts[0];
    for p in &pts[1..] {
        let better = if want_max {
            key(p) > key(&best)
        } else {
            key(p) < key(&best)
        };
        if better {
            best = *p;
        }
    }
    best
}

/// The final product of the crop flow, handed to the recognition collaborator.
///
/// `blob` and `preview_uri` always describe the same pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RectifiedImage {
    /// Transmittable encoded bytes.
    pub blob: Vec<u8>,
    /// Directly renderable URI for the preview.
    pub preview_uri: String,
    /// MIME type of `blob`.
    pub mime_type: String,
    /// Pixel dimensions, when known.
    pub dimensions: Option<(u32, u32)>,
    /// `false` when the user skipped correction and `blob` is the untouched source.
    pub rectified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_endpoints_follow_winding() {
        for edge in Edge::ALL {
            let (a, b) = edge.endpoints();
            assert_eq!(a.index(), edge.index());
            assert_eq!(b.index(), (edge.index() + 1) % 4);
        }
    }

    #[test]
    fn surface_conversion_uses_offset_and_size() {
        let surface = SurfaceRect::new(100.0, 50.0, 400.0, 200.0);
        let p = surface.to_normalized(Point::new(300.0, 100.0)).unwrap();
        assert!((p.x - 50.0).abs() < 1e-9);
        assert!((p.y - 25.0).abs() < 1e-9);
    }

    #[test]
    fn surface_conversion_clamps() {
        let surface = SurfaceRect::new(0.0, 0.0, 100.0, 100.0);
        let p = surface.to_normalized(Point::new(-20.0, 250.0)).unwrap();
        assert_eq!(p, Point::new(0.0, 100.0));
    }

    #[test]
    fn collapsed_surface_is_rejected() {
        let surface = SurfaceRect::new(0.0, 0.0, 0.0, 100.0);
        assert!(surface.to_normalized(Point::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn nan_pointer_is_rejected() {
        let surface = SurfaceRect::new(0.0, 0.0, 100.0, 100.0);
        assert!(surface.to_normalized(Point::new(f64::NAN, 10.0)).is_none());
    }

    #[test]
    fn seed_ordering_sorts_shuffled_corners() {
        let seed = CornerSeed([[0.9, 0.85], [0.1, 0.1], [0.15, 0.9], [0.85, 0.12]]);
        assert_eq!(
            seed.ordered().0,
            [[0.1, 0.1], [0.85, 0.12], [0.9, 0.85], [0.15, 0.9]]
        );
    }

    #[test]
    fn drag_target_serializes_tagged() {
        let json = serde_json::to_string(&DragTarget::Edge(Edge::Left)).unwrap();
        assert_eq!(json, r#"{"kind":"edge","at":"left"}"#);
        let back: DragTarget = serde_json::from_str(r#"{"kind":"corner","at":"top_right"}"#).unwrap();
        assert_eq!(back, DragTarget::Corner(Corner::TopRight));
    }
}
