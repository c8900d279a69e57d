// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// cropwerk-document — Image side of the crop flow.
//
// Provides the source-image wrapper, the two-triangle rectification engine
// (behind a drawing-capability trait), the crop overlay renderer used for the
// interactive screen, data-URI previews, and the skip path that forwards the
// untouched original.

pub mod overlay;
pub mod preview;
pub mod rectify;
pub mod skip;
pub mod source;

// Re-export the primary structs so callers can use `cropwerk_document::Rectifier` etc.
pub use overlay::OverlayStyle;
pub use rectify::canvas::{Canvas, SoftwareCanvas};
pub use rectify::engine::Rectifier;
pub use skip::skip;
pub use source::SourceImage;
