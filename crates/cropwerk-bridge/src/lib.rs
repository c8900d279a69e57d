// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cropwerk — Boundaries to the collaborators outside the crop core.
//
// The crop engine never talks to the network or the filesystem directly. It
// consumes two capabilities: re-reading the original photo bytes (skip path)
// and an optional corner-detection seed. Implementations live here.

pub mod file;
pub mod stub;
pub mod traits;

pub use file::{FileSourceFetcher, JsonSeedDetector};
pub use stub::StubBridge;
pub use traits::{CornerDetector, SourceFetcher};
