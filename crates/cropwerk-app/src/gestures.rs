// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recorded pointer gestures, replayed against a crop session.

use std::path::Path;

use cropwerk_core::error::Result;
use cropwerk_core::geometry::Point;
use cropwerk_core::session::CropSession;
use cropwerk_core::types::{DragTarget, SurfaceRect};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// One pointer event as the crop screen would deliver it.
///
/// ```json
/// {"event": "begin", "target": {"kind": "corner", "at": "top_left"}}
/// {"event": "move", "x": 120.0, "y": 80.0,
///  "surface": {"left": 0.0, "top": 0.0, "width": 400.0, "height": 300.0}}
/// {"event": "end"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GestureEvent {
    Begin { target: DragTarget },
    Move { x: f64, y: f64, surface: SurfaceRect },
    End,
}

pub fn load_script(path: impl AsRef<Path>) -> Result<Vec<GestureEvent>> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    let events: Vec<GestureEvent> = serde_json::from_str(&raw)?;
    debug!(path = %path.as_ref().display(), count = events.len(), "gesture script loaded");
    Ok(events)
}

/// Feed one event to the session.
pub fn apply(session: &mut CropSession, event: &GestureEvent) -> Result<()> {
    match event {
        GestureEvent::Begin { target } => {
            trace!(%target, "drag begin");
            session.begin_drag(*target)
        }
        GestureEvent::Move { x, y, surface } => {
            let quad = session.drag_to(Point::new(*x, *y), surface)?;
            trace!(?quad, "drag move");
            Ok(())
        }
        GestureEvent::End => {
            session.end_drag();
            Ok(())
        }
    }
}
