// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Collaborator trait definitions.

use cropwerk_core::error::Result;
use cropwerk_core::types::CornerSeed;

/// Re-read the original bytes of a source image.
///
/// Used by the skip path, which forwards the photo untouched.
pub trait SourceFetcher: Send + Sync {
    /// Return the encoded bytes behind `uri`.
    ///
    /// Failures should be reported as `CropwerkError::SourceFetch` so the
    /// caller can keep the crop screen open for a retry.
    fn fetch_source(&self, uri: &str) -> Result<Vec<u8>>;
}

/// Estimate the document corners in a photo.
///
/// The result only seeds the crop quad; the user can always adjust it.
pub trait CornerDetector: Send + Sync {
    /// Returns `Ok(None)` when no document outline was found.
    fn detect_corners(&self, image: &[u8]) -> Result<Option<CornerSeed>>;
}
