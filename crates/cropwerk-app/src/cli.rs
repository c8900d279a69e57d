// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "cropwerk", version, about = "Straighten a photographed page", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Crop and rectify a photo into a flat JPEG.
    Rectify(RectifyArgs),
    /// Forward the original photo untouched.
    Skip(SkipArgs),
}

#[derive(Debug, Args)]
pub struct RectifyArgs {
    /// Photo to crop.
    pub source: PathBuf,

    /// Where to write the rectified JPEG.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Corner seed JSON (`[[x, y], ...]`, fractions of width and height).
    #[arg(long)]
    pub seed: Option<PathBuf>,

    /// Sort seed corners into TL, TR, BR, BL before applying.
    #[arg(long, requires = "seed")]
    pub reorder_seed: bool,

    /// Gesture script JSON replayed through the drag controller.
    #[arg(long)]
    pub gestures: Option<PathBuf>,

    /// Crop settings JSON.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also write the source with the final crop overlay drawn on it (PNG).
    #[arg(long)]
    pub overlay: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SkipArgs {
    /// Photo to forward.
    pub source: PathBuf,

    /// Where to write the untouched bytes.
    #[arg(short, long)]
    pub output: PathBuf,
}

pub fn parse() -> Cli {
    Cli::parse()
}
