// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Crop session — owns the quad for one crop, routes drag events to the
// controller, and decides whether a late-arriving corner seed may still apply.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::CropConfig;
use crate::drag::DragController;
use crate::error::{CropwerkError, Result};
use crate::geometry::Point;
use crate::quad::Quad;
use crate::types::{CornerSeed, DragTarget, SurfaceRect};

/// Unique identifier for a crop session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handed to the corner-detection request when it is issued and presented
/// back with its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedTicket {
    session: SessionId,
}

/// Why a seed was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedIgnored {
    /// The user already started dragging; their edits win.
    UserInteracted,
    /// Cropping already finished (confirmed or skipped).
    Finished,
    /// The ticket belongs to a different session.
    ForeignSession,
}

/// Result of presenting a seed to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Applied,
    Ignored(SeedIgnored),
}

/// State of one crop: the quad, the drag controller, and the guards that
/// protect user edits from a late seed.
#[derive(Debug, Clone)]
pub struct CropSession {
    id: SessionId,
    quad: Quad,
    drag: DragController,
    interacted: bool,
    finished: bool,
}

impl CropSession {
    /// Start a session with the configured default inset box.
    pub fn new(config: &CropConfig) -> Self {
        Self::with_quad(Quad::inset(config.default_inset))
    }

    pub fn with_quad(quad: Quad) -> Self {
        let id = SessionId::new();
        debug!(session = %id, ?quad, "crop session started");
        Self {
            id,
            quad,
            drag: DragController::new(),
            interacted: false,
            finished: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current crop region.
    pub fn quad(&self) -> Quad {
        self.quad
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Whether the user has started at least one drag.
    pub fn has_interacted(&self) -> bool {
        self.interacted
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    // -- Seed -----------------------------------------------------------------

    /// Ticket to attach to an outgoing corner-detection request.
    pub fn seed_ticket(&self) -> SeedTicket {
        SeedTicket { session: self.id }
    }

    /// Apply a detector seed unless the user has already taken over.
    ///
    /// A seed is only honoured before the first drag `begin` and before the
    /// crop finishes; later seeds are dropped so they cannot clobber manual
    /// edits. A malformed seed is an error.
    #[instrument(skip(self, seed), fields(session = %self.id))]
    pub fn apply_seed(&mut self, ticket: SeedTicket, seed: &CornerSeed) -> Result<SeedOutcome> {
        let ignored = if ticket.session != self.id {
            Some(SeedIgnored::ForeignSession)
        } else if self.finished {
            Some(SeedIgnored::Finished)
        } else if self.interacted {
            Some(SeedIgnored::UserInteracted)
        } else {
            None
        };
        if let Some(reason) = ignored {
            debug!(?reason, "late corner seed ignored");
            return Ok(SeedOutcome::Ignored(reason));
        }

        self.quad = Quad::from_seed(seed)?;
        info!(quad = ?self.quad, "corner seed applied");
        Ok(SeedOutcome::Applied)
    }

    // -- Drag -----------------------------------------------------------------

    pub fn begin_drag(&mut self, target: DragTarget) -> Result<()> {
        self.ensure_open()?;
        self.interacted = true;
        self.drag.begin(target);
        Ok(())
    }

    /// Route one pointer move to the active drag, returning the new quad.
    pub fn drag_to(&mut self, client: Point, surface: &SurfaceRect) -> Result<Quad> {
        self.ensure_open()?;
        self.quad = self.drag.update(self.quad, client, surface);
        Ok(self.quad)
    }

    pub fn end_drag(&mut self) {
        self.drag.end();
    }

    // -- Completion -----------------------------------------------------------

    /// Mark the crop as done. Call after rectification (or skip) succeeded;
    /// a failed attempt leaves the session open for retry.
    pub fn finish(&mut self) -> Result<Quad> {
        self.ensure_open()?;
        self.drag.end();
        self.finished = true;
        info!(session = %self.id, quad = ?self.quad, "crop session finished");
        Ok(self.quad)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.finished {
            Err(CropwerkError::SessionFinished)
        } else {
            Ok(())
        }
    }
}

// -- Tests --------------------------------------------------------------------
