// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Drag interaction controller. Turns pointer movement into corner relocation
// or coupled edge translation on a `Quad`.

use tracing::{debug, trace};

use crate::geometry::Point;
use crate::quad::Quad;
use crate::types::{DragTarget, SurfaceRect};

/// Tracks the active drag gesture and applies pointer moves to a quad.
///
/// Which handle moves is decided by [`DragTarget`]; how it moves is decided by
/// the quad's own update rules (`set_corner` for corners, `move_edge` for
/// edges).
#[derive(Debug, Clone, Default)]
pub struct DragController {
    active: Option<DragTarget>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The handle currently being dragged, if any.
    pub fn active(&self) -> Option<DragTarget> {
        self.active
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Start dragging `target`. Repeating the same target is a no-op.
    pub fn begin(&mut self, target: DragTarget) {
        if self.active == Some(target) {
            trace!(%target, "drag already active");
            return;
        }
        debug!(%target, previous = ?self.active, "drag begin");
        self.active = Some(target);
    }

    /// Apply one pointer move.
    ///
    /// `surface` must be the rendering surface's bounding rectangle as of this
    /// event; layout can shift between moves. Returns `quad` unchanged when no
    /// drag is active or the surface has collapsed.
    #[must_use]
    pub fn update(&self, quad: Quad, client: Point, surface: &SurfaceRect) -> Quad {
        let Some(target) = self.active else {
            return quad;
        };
        let Some(pointer) = surface.to_normalized(client) else {
            trace!(?surface, "ignoring move on collapsed surface");
            return quad;
        };

        match target {
            DragTarget::Corner(corner) => quad.set_corner(corner, pointer),
            DragTarget::Edge(edge) => {
                let delta = pointer - quad.handle(edge);
                quad.move_edge(edge, delta)
            }
        }
    }

    /// Finish the gesture. Always clears the active target.
    pub fn end(&mut self) {
        if let Some(target) = self.active.take() {
            debug!(%target, "drag end");
        }
    }
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Corner, Edge};

    fn surface() -> SurfaceRect {
        SurfaceRect::new(20.0, 40.0, 200.0, 400.0)
    }

    #[test]
    fn update_without_target_is_noop() {
        let ctl = DragController::new();
        let q = Quad::default();
        assert_eq!(ctl.update(q, Point::new(0.0, 0.0), &surface()), q);
    }

    #[test]
    fn corner_drag_follows_pointer() {
        let mut ctl = DragController::new();
        ctl.begin(DragTarget::Corner(Corner::TopLeft));
        // 20 + 0.25 * 200 = 70, 40 + 0.05 * 400 = 60
        let q = ctl.update(Quad::default(), Point::new(70.0, 60.0), &surface());
        let p = q.corner(Corner::TopLeft);
        assert!((p.x - 25.0).abs() < 1e-9 && (p.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn corner_drag_outside_surface_is_clamped() {
        let mut ctl = DragController::new();
        ctl.begin(DragTarget::Corner(Corner::BottomRight));
        let q = ctl.update(Quad::default(), Point::new(5000.0, -100.0), &surface());
        assert_eq!(q.corner(Corner::BottomRight), Point::new(100.0, 0.0));
    }

    #[test]
    fn edge_drag_moves_midpoint_to_pointer() {
        let mut ctl = DragController::new();
        ctl.begin(DragTarget::Edge(Edge::Bottom));
        // Bottom midpoint of the default quad is (50, 90). Pointer at (50, 80).
        let pointer = Point::new(20.0 + 0.5 * 200.0, 40.0 + 0.8 * 400.0);
        let q = ctl.update(Quad::default(), pointer, &surface());
        let h = q.handle(Edge::Bottom);
        assert!((h.x - 50.0).abs() < 1e-9 && (h.y - 80.0).abs() < 1e-9);
        assert!((q.corner(Corner::BottomLeft).y - 80.0).abs() < 1e-9);
        assert!((q.corner(Corner::BottomRight).y - 80.0).abs() < 1e-9);
        assert_eq!(q.corner(Corner::TopLeft), Point::new(10.0, 10.0));
    }

    #[test]
    fn edge_drag_keeps_sliding_on_free_axis() {
        let mut ctl = DragController::new();
        ctl.begin(DragTarget::Edge(Edge::Top));
        // Pull the top edge far left (x would clip) and slightly down.
        let pointer = Point::new(20.0, 40.0 + 0.2 * 400.0);
        let q = ctl.update(Quad::default(), pointer, &surface());
        assert!((q.corner(Corner::TopLeft).x - 10.0).abs() < 1e-9);
        assert!((q.corner(Corner::TopLeft).y - 20.0).abs() < 1e-9);
        assert!((q.corner(Corner::TopRight).y - 20.0).abs() < 1e-9);
    }

    #[test]
    fn surface_is_requeried_on_every_move() {
        let mut ctl = DragController::new();
        ctl.begin(DragTarget::Corner(Corner::TopRight));
        let client = Point::new(150.0, 150.0);
        let q1 = ctl.update(Quad::default(), client, &SurfaceRect::new(0.0, 0.0, 300.0, 300.0));
        let q2 = ctl.update(q1, client, &SurfaceRect::new(100.0, 100.0, 300.0, 300.0));
        assert!((q1.corner(Corner::TopRight).x - 50.0).abs() < 1e-9);
        assert!((q2.corner(Corner::TopRight).x - 50.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn collapsed_surface_is_ignored() {
        let mut ctl = DragController::new();
        ctl.begin(DragTarget::Corner(Corner::TopLeft));
        let q = Quad::default();
        let out = ctl.update(q, Point::new(5.0, 5.0), &SurfaceRect::new(0.0, 0.0, 0.0, 0.0));
        assert_eq!(out, q);
    }

    #[test]
    fn begin_is_idempotent_and_end_clears() {
        let mut ctl = DragController::new();
        let target = DragTarget::Edge(Edge::Right);
        ctl.begin(target);
        ctl.begin(target);
        assert_eq!(ctl.active(), Some(target));
        ctl.end();
        assert!(!ctl.is_dragging());
        ctl.end();
        assert!(ctl.active().is_none());
    }
}
