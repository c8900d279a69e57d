// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filesystem-backed collaborators for desktop and headless use.

use std::path::{Path, PathBuf};

use cropwerk_core::error::{CropwerkError, Result};
use cropwerk_core::types::CornerSeed;
use tracing::{debug, info, instrument};

use crate::traits::{CornerDetector, SourceFetcher};

/// Resolve a `file://` URI or a plain path to a filesystem path.
pub fn uri_to_path(uri: &str) -> PathBuf {
    PathBuf::from(uri.strip_prefix("file://").unwrap_or(uri))
}

/// Reads source bytes from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSourceFetcher;

impl SourceFetcher for FileSourceFetcher {
    #[instrument(skip(self))]
    fn fetch_source(&self, uri: &str) -> Result<Vec<u8>> {
        let path = uri_to_path(uri);
        let bytes = std::fs::read(&path).map_err(|err| {
            CropwerkError::SourceFetch(format!("failed to read {}: {}", path.display(), err))
        })?;
        debug!(bytes = bytes.len(), "source bytes fetched");
        Ok(bytes)
    }
}

/// Serves a corner seed recorded in a JSON file (`[[x, y], ...]`, fractions).
///
/// Stands in for the remote corner-detection call in headless runs; the image
/// bytes are not inspected.
#[derive(Debug, Clone)]
pub struct JsonSeedDetector {
    path: PathBuf,
}

impl JsonSeedDetector {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CornerDetector for JsonSeedDetector {
    #[instrument(skip(self, _image), fields(path = %self.path.display()))]
    fn detect_corners(&self, _image: &[u8]) -> Result<Option<CornerSeed>> {
        let raw = std::fs::read_to_string(&self.path).map_err(|err| {
            CropwerkError::CornerDetection(format!(
                "failed to read seed {}: {}",
                self.path.display(),
                err
            ))
        })?;
        let seed: Option<CornerSeed> = serde_json::from_str(&raw)?;
        info!(found = seed.is_some(), "corner seed loaded");
        Ok(seed)
    }
}
