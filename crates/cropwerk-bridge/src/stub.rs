// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for builds without a corner-detection service or source store.
//
// Every trait method returns `PlatformUnavailable`.

use cropwerk_core::error::{CropwerkError, Result};
use cropwerk_core::types::CornerSeed;

use crate::traits::*;

/// No-op collaborator.
pub struct StubBridge;

impl SourceFetcher for StubBridge {
    fn fetch_source(&self, _uri: &str) -> Result<Vec<u8>> {
        tracing::warn!("SourceFetcher::fetch_source called on stub bridge");
        Err(CropwerkError::PlatformUnavailable)
    }
}

impl CornerDetector for StubBridge {
    fn detect_corners(&self, _image: &[u8]) -> Result<Option<CornerSeed>> {
        tracing::debug!("CornerDetector::detect_corners called on stub bridge");
        Err(CropwerkError::PlatformUnavailable)
    }
}
