// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Cropwerk.

use thiserror::Error;

/// Top-level error type for all Cropwerk operations.
#[derive(Debug, Error)]
pub enum CropwerkError {
    // -- Rectification errors --
    #[error("source image is not ready (not yet decoded)")]
    ImageNotReady,

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("image encoding failed: {0}")]
    Encode(String),

    // -- Crop session --
    #[error("invalid corner seed: {0}")]
    InvalidSeed(String),

    #[error("crop session already finished")]
    SessionFinished,

    #[error("invalid configuration: {0}")]
    Config(String),

    // -- External collaborators --
    #[error("failed to fetch source image: {0}")]
    SourceFetch(String),

    #[error("corner detection failed: {0}")]
    CornerDetection(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,

    // -- Storage / serialization --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CropwerkError>;
