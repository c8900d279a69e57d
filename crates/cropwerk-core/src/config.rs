// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Crop and rectification configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CropwerkError, Result};

/// Resampling filter used when warping source pixels into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Nearest source pixel.
    Nearest,
    /// Bilinear blend of the four surrounding source pixels.
    #[default]
    Bilinear,
}

/// Settings for a crop session and its rectification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// JPEG quality (1-100) for the rectified blob.
    pub jpeg_quality: u8,
    /// Inset of the initial crop box from each side, in normalized units.
    pub default_inset: f64,
    /// RGBA colour of output regions no triangle covers.
    pub background: [u8; 4],
    /// Resampling filter.
    pub interpolation: Interpolation,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 95,
            default_inset: crate::quad::DEFAULT_INSET,
            background: [255, 255, 255, 255],
            interpolation: Interpolation::Bilinear,
        }
    }
}

impl CropConfig {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: CropConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        debug!(path = %path.as_ref().display(), ?config, "crop config loaded");
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(CropwerkError::Config(format!(
                "jpeg_quality must be 1-100, got {}",
                self.jpeg_quality
            )));
        }
        if !(0.0..50.0).contains(&self.default_inset) {
            return Err(CropwerkError::Config(format!(
                "default_inset must be in [0, 50), got {}",
                self.default_inset
            )));
        }
        Ok(())
    }
}
