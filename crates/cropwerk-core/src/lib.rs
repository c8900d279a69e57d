// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cropwerk — Core geometry, crop model, and error definitions shared across all crates.

pub mod config;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod human_errors;
pub mod quad;
pub mod session;
pub mod types;

pub use config::CropConfig;
pub use drag::DragController;
pub use error::CropwerkError;
pub use geometry::{Affine, Point};
pub use quad::{PixelQuad, Quad};
pub use session::CropSession;
pub use types::*;
