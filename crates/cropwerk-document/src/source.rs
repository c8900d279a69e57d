// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The photographed page, identified by URI and decoded once.

use cropwerk_core::error::{CropwerkError, Result};
use image::{DynamicImage, RgbaImage};
use tracing::{debug, info, instrument};

/// The photo being cropped.
///
/// A source starts out pending (URI known, pixels not yet decoded) and becomes
/// ready after [`SourceImage::decode`]. Rectification requires a ready source.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Where the original bytes live; used as the preview on the skip path.
    uri: String,
    /// MIME type sniffed from the encoded bytes, once decoded.
    mime_type: Option<String>,
    /// Decoded pixels.
    pixels: Option<RgbaImage>,
}

impl SourceImage {
    // -- Construction ---------------------------------------------------------

    /// A source whose pixels have not been decoded yet.
    pub fn pending(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: None,
            pixels: None,
        }
    }

    /// Decode raw image bytes (JPEG, PNG, TIFF, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(uri: &str, data: &[u8]) -> Result<Self> {
        let mut source = Self::pending(uri);
        source.decode(data)?;
        Ok(source)
    }

    /// Wrap an already-decoded image.
    pub fn from_dynamic(uri: impl Into<String>, image: DynamicImage) -> Self {
        Self {
            uri: uri.into(),
            mime_type: None,
            pixels: Some(image.to_rgba8()),
        }
    }

    /// Decode `data` into this source, replacing any previous pixels.
    pub fn decode(&mut self, data: &[u8]) -> Result<()> {
        let image = image::load_from_memory(data).map_err(|err| {
            CropwerkError::ImageError(format!("failed to decode {}: {}", self.uri, err))
        })?;
        self.mime_type = image::guess_format(data)
            .ok()
            .map(|format| format.to_mime_type().to_string());
        info!(
            uri = %self.uri,
            width = image.width(),
            height = image.height(),
            mime = ?self.mime_type,
            "Source image decoded"
        );
        self.pixels = Some(image.to_rgba8());
        Ok(())
    }

    // -- Accessors ------------------------------------------------------------

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn is_ready(&self) -> bool {
        self.pixels.is_some()
    }

    /// Natural pixel size, once decoded.
    pub fn natural_size(&self) -> Option<(u32, u32)> {
        self.pixels.as_ref().map(|p| p.dimensions())
    }

    /// Decoded pixels, or [`CropwerkError::ImageNotReady`].
    pub fn pixels(&self) -> Result<&RgbaImage> {
        match &self.pixels {
            Some(pixels) => Ok(pixels),
            None => {
                debug!(uri = %self.uri, "pixels requested before decode");
                Err(CropwerkError::ImageNotReady)
            }
        }
    }
}
