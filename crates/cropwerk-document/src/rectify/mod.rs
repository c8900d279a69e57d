// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The drawing capability and the two-triangle warp engine.

pub mod canvas;
pub mod engine;

pub use canvas::{Canvas, SoftwareCanvas};
pub use engine::{RenderReport, Rectifier, TrianglePair, draw_quad, output_size, triangle_pairs};
