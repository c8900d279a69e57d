// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometry utilities: points, distances, and triangle-to-triangle affine
// solving. Pure functions only; no image or coordinate-space knowledge lives
// here.

use serde::{Deserialize, Serialize};

/// Determinants with a smaller magnitude are treated as zero (collinear
/// triangle or singular transform).
pub const DETERMINANT_EPSILON: f64 = 1e-9;

/// True for magnitudes below [`DETERMINANT_EPSILON`] and for NaN.
fn negligible(v: f64) -> bool {
    !(v.abs() >= DETERMINANT_EPSILON)
}

/// A 2-D point with real-valued coordinates.
///
/// The coordinate space (normalized or pixel) is decided by the container the
/// point lives in: [`crate::Quad`] holds normalized points,
/// [`crate::PixelQuad`] holds pixel points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        distance(self, other)
    }

    /// Arithmetic midpoint of `self` and `other`.
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Clamp both coordinates into `[min, max]` independently. NaN becomes `min`.
    pub fn clamp(self, min: f64, max: f64) -> Point {
        let clamp = |v: f64| if v.is_nan() { min } else { v.clamp(min, max) };
        Point::new(clamp(self.x), clamp(self.y))
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Twice the signed area of triangle `(p0, p1, p2)`.
///
/// Positive for counter-clockwise winding in a y-up frame (clockwise on
/// screen), zero when the points are collinear.
pub fn signed_area2(p0: Point, p1: Point, p2: Point) -> f64 {
    (p1.x - p0.x) * (p2.y - p0.y) - (p2.x - p0.x) * (p1.y - p0.y)
}

/// Whether the three points are (numerically) collinear. A triangle with a
/// non-finite vertex has no usable area and counts as degenerate.
pub fn is_degenerate(triangle: &[Point; 3]) -> bool {
    !triangle.iter().all(|p| p.is_finite())
        || negligible(signed_area2(triangle[0], triangle[1], triangle[2]))
}

/// Whether `p` lies inside triangle `tri` or on its boundary.
///
/// Works for either winding. Points exactly on a shared edge belong to both
/// triangles that share it. Nothing is inside a triangle with a non-finite
/// vertex.
pub fn triangle_contains(tri: &[Point; 3], p: Point) -> bool {
    if !p.is_finite() || !tri.iter().all(|v| v.is_finite()) {
        return false;
    }
    let d0 = signed_area2(tri[0], tri[1], p);
    let d1 = signed_area2(tri[1], tri[2], p);
    let d2 = signed_area2(tri[2], tri[0], p);
    let has_neg = d0 < 0.0 || d1 < 0.0 || d2 < 0.0;
    let has_pos = d0 > 0.0 || d1 > 0.0 || d2 > 0.0;
    !(has_neg && has_pos)
}

/// A 2-D affine transform.
///
/// Maps `(x, y)` to `(u, v)` with
///
/// ```text
/// u = a·x + b·y + c
/// v = d·x + e·y + f
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 0.0,
        e: 1.0,
        f: 0.0,
    };

    /// Solve for the affine transform taking `src[i]` onto `dst[i]` for
    /// `i in 0..3`.
    ///
    /// Uses the closed-form Cramer's-rule solution of the two 3×3 systems
    ///
    /// ```text
    /// | x0 y0 1 |   | a d |   | u0 v0 |
    /// | x1 y1 1 | · | b e | = | u1 v1 |
    /// | x2 y2 1 |   | c f |   | u2 v2 |
    /// ```
    ///
    /// Returns `None` when the source triangle is degenerate (its determinant
    /// is numerically zero).
    pub fn from_triangles(src: &[Point; 3], dst: &[Point; 3]) -> Option<Affine> {
        let [p0, p1, p2] = *src;
        let (x0, y0, x1, y1, x2, y2) = (p0.x, p0.y, p1.x, p1.y, p2.x, p2.y);

        let det = x0 * (y1 - y2) - y0 * (x1 - x2) + (x1 * y2 - x2 * y1);
        if !dst.iter().all(|p| p.is_finite()) || negligible(det) {
            return None;
        }

        // Solves one row (u or v) of the system with Cramer's rule.
        let solve = |w0: f64, w1: f64, w2: f64| -> (f64, f64, f64) {
            let det_a = w0 * (y1 - y2) - y0 * (w1 - w2) + (w1 * y2 - w2 * y1);
            let det_b = x0 * (w1 - w2) - w0 * (x1 - x2) + (x1 * w2 - x2 * w1);
            let det_c = x0 * (y1 * w2 - y2 * w1) - y0 * (x1 * w2 - x2 * w1)
                + w0 * (x1 * y2 - x2 * y1);
            (det_a / det, det_b / det, det_c / det)
        };

        let (a, b, c) = solve(dst[0].x, dst[1].x, dst[2].x);
        let (d, e, f) = solve(dst[0].y, dst[1].y, dst[2].y);

        Some(Affine { a, b, c, d, e, f })
    }

    /// Apply the transform to a point.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.b * p.y + self.c,
            self.d * p.x + self.e * p.y + self.f,
        )
    }

    /// Determinant of the linear part.
    pub fn determinant(&self) -> f64 {
        self.a * self.e - self.b * self.d
    }

    /// The inverse transform, or `None` if the linear part is singular.
    pub fn inverse(&self) -> Option<Affine> {
        let det = self.determinant();
        if negligible(det) || !self.c.is_finite() || !self.f.is_finite() {
            return None;
        }
        let a = self.e / det;
        let b = -self.b / det;
        let d = -self.d / det;
        let e = self.a / det;
        Some(Affine {
            a,
            b,
            c: -(a * self.c + b * self.f),
            d,
            e,
            f: -(d * self.c + e * self.f),
        })
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// -- Tests --------------------------------------------------------------------
