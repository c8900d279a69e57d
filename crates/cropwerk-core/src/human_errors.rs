// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the crop screen.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives whether the crop screen stays open for another attempt.

use crate::error::CropwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Slow load or a missing file that may come back. Retrying usually works.
    Transient,
    /// User must do something (pick another photo, adjust the corners).
    ActionRequired,
    /// Retrying will not help.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the crop screen should stay open for a retry.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

impl HumanError {
    fn new(message: &str, suggestion: &str, retriable: bool, severity: Severity) -> Self {
        Self {
            message: message.into(),
            suggestion: suggestion.into(),
            retriable,
            severity,
        }
    }
}

/// Convert a `CropwerkError` into a `HumanError`.
pub fn humanize_error(err: &CropwerkError) -> HumanError {
    match err {
        CropwerkError::ImageNotReady => HumanError::new(
            "The photo is still loading.",
            "Wait a moment for the picture to appear, then press Done again.",
            true,
            Severity::Transient,
        ),
        CropwerkError::ImageError(_) => HumanError::new(
            "We couldn't read this photo.",
            "Try taking the picture again or choose a different image file.",
            false,
            Severity::ActionRequired,
        ),
        CropwerkError::Encode(_) => HumanError::new(
            "We couldn't save the straightened page.",
            "Try again. If it keeps failing, drag the corners so the page is a little larger.",
            true,
            Severity::Transient,
        ),
        CropwerkError::SourceFetch(_) => HumanError::new(
            "We couldn't reload the original photo.",
            "Check the file is still there and press Skip again.",
            true,
            Severity::Transient,
        ),
        CropwerkError::CornerDetection(_) | CropwerkError::InvalidSeed(_) => HumanError::new(
            "We couldn't find the page edges automatically.",
            "Drag the corners onto the page yourself.",
            true,
            Severity::ActionRequired,
        ),
        CropwerkError::SessionFinished => HumanError::new(
            "This page has already been cropped.",
            "Take or choose a new photo to crop another page.",
            false,
            Severity::ActionRequired,
        ),
        CropwerkError::Config(_) | CropwerkError::Serialization(_) => HumanError::new(
            "The app settings look damaged.",
            "Reset the settings to their defaults.",
            false,
            Severity::Permanent,
        ),
        CropwerkError::Io(_) => HumanError::new(
            "We couldn't read or write a file.",
            "Make sure there is free space on the device and try again.",
            true,
            Severity::Transient,
        ),
        CropwerkError::PlatformUnavailable => HumanError::new(
            "This feature isn't available on this device.",
            "Choose a photo from your files instead.",
            false,
            Severity::Permanent,
        ),
    }
}
