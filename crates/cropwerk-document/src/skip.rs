// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Skip path — forward the original photo untouched, in the same shape as a
// rectified result.

use cropwerk_bridge::traits::SourceFetcher;
use cropwerk_core::error::{CropwerkError, Result};
use cropwerk_core::types::RectifiedImage;
use tracing::{info, instrument, warn};

use crate::source::SourceImage;

const FALLBACK_MIME: &str = "application/octet-stream";

/// Bypass rectification: re-read the source bytes and hand them on unchanged.
///
/// The preview is the source's own URI. A fetch failure is returned as
/// `SourceFetch` so the crop screen can stay open for another try.
#[instrument(skip_all, fields(uri = %source.uri()))]
pub fn skip(source: &SourceImage, fetcher: &dyn SourceFetcher) -> Result<RectifiedImage> {
    let blob = fetcher
        .fetch_source(source.uri())
        .map_err(|err| match err {
            CropwerkError::SourceFetch(_) => err,
            other => CropwerkError::SourceFetch(other.to_string()),
        })
        .inspect_err(|err| warn!(error = %err, "skip failed; crop stays open"))?;

    let mime_type = image::guess_format(&blob)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| FALLBACK_MIME.to_string());
    info!(bytes = blob.len(), mime = %mime_type, "Rectification skipped; forwarding original");

    Ok(RectifiedImage {
        blob,
        preview_uri: source.uri().to_string(),
        mime_type,
        dimensions: source.natural_size(),
        rectified: false,
    })
}
