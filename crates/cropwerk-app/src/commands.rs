// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand drivers. Each one runs a full crop session: load the photo,
// race the corner seed against the user's gestures, then confirm or skip.

use std::path::Path;
use std::sync::Arc;

use cropwerk_bridge::{CornerDetector, FileSourceFetcher, JsonSeedDetector, SourceFetcher, StubBridge};
use cropwerk_core::config::CropConfig;
use cropwerk_core::error::{CropwerkError, Result};
use cropwerk_core::session::{CropSession, SeedOutcome, SeedTicket};
use cropwerk_core::types::{CornerSeed, RectifiedImage};
use cropwerk_document::overlay::{OverlayStyle, render_overlay};
use cropwerk_document::{Rectifier, SourceImage, skip};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::cli::{Command, RectifyArgs, SkipArgs};
use crate::gestures::{self, GestureEvent};

type Detection = Result<Option<CornerSeed>>;

pub async fn run(command: Command) -> Result<()> {
    match command {
        Command::Rectify(args) => rectify(args).await,
        Command::Skip(args) => skip_crop(args),
    }
}

fn source_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

#[instrument(skip_all, fields(source = %args.source.display()))]
async fn rectify(args: RectifyArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => CropConfig::load(path)?,
        None => CropConfig::default(),
    };

    let uri = source_uri(&args.source);
    let bytes = FileSourceFetcher.fetch_source(&uri)?;
    let source = SourceImage::from_bytes(&uri, &bytes)?;

    let detector: Arc<dyn CornerDetector> = match &args.seed {
        Some(path) => Arc::new(JsonSeedDetector::new(path)),
        None => Arc::new(StubBridge),
    };
    let events = match &args.gestures {
        Some(path) => gestures::load_script(path)?,
        None => Vec::new(),
    };

    let mut session = CropSession::new(&config);
    let seeds = spawn_detection(detector, bytes);
    interact(&mut session, seeds, &events, args.reorder_seed).await?;

    let out = Rectifier::new(config).rectify(&source, &session.quad())?;
    std::fs::write(&args.output, &out.blob)?;
    session.finish()?;

    if let Some(path) = &args.overlay {
        render_overlay(&source, &session.quad(), None, &OverlayStyle::default())?
            .save(path)
            .map_err(|err| CropwerkError::ImageError(format!("failed to write overlay: {err}")))?;
        debug!(path = %path.display(), "overlay written");
    }

    report(&out, &args.output);
    Ok(())
}

#[instrument(skip_all, fields(source = %args.source.display()))]
fn skip_crop(args: SkipArgs) -> Result<()> {
    let mut session = CropSession::new(&CropConfig::default());
    let source = SourceImage::pending(source_uri(&args.source));

    let out = skip(&source, &FileSourceFetcher)?;
    std::fs::write(&args.output, &out.blob)?;
    session.finish()?;

    report(&out, &args.output);
    Ok(())
}

fn report(out: &RectifiedImage, path: &Path) {
    info!(
        path = %path.display(),
        bytes = out.blob.len(),
        rectified = out.rectified,
        dimensions = ?out.dimensions,
        "Output written"
    );
    println!("{}", path.display());
}

/// Run corner detection off the async runtime; the result arrives on the
/// returned channel whenever it is ready.
fn spawn_detection(detector: Arc<dyn CornerDetector>, bytes: Vec<u8>) -> mpsc::Receiver<Detection> {
    let (tx, rx) = mpsc::channel(1);
    tokio::task::spawn_blocking(move || {
        let detected = detector.detect_corners(&bytes);
        if tx.blocking_send(detected).is_err() {
            debug!("seed receiver dropped before detection finished");
        }
    });
    rx
}

/// Replay `events` while the seed may still land. A seed that arrives after
/// the first drag is turned away by the session.
async fn interact(
    session: &mut CropSession,
    mut seeds: mpsc::Receiver<Detection>,
    events: &[GestureEvent],
    reorder: bool,
) -> Result<()> {
    let ticket = session.seed_ticket();
    let mut pending = true;

    for event in events {
        if pending {
            if let Ok(detected) = seeds.try_recv() {
                present_seed(session, ticket, detected, reorder);
                pending = false;
            }
        }
        gestures::apply(session, event)?;
    }

    // Once the user has dragged, no seed can apply; confirm without waiting.
    if pending && !session.has_interacted() {
        if let Some(detected) = seeds.recv().await {
            present_seed(session, ticket, detected, reorder);
        }
    } else if pending {
        debug!("user took over before detection finished; not waiting for seed");
    }
    Ok(())
}

/// Detection problems never block cropping; the default box stays in place.
fn present_seed(session: &mut CropSession, ticket: SeedTicket, detected: Detection, reorder: bool) {
    let seed = match detected {
        Ok(Some(seed)) if reorder => seed.ordered(),
        Ok(Some(seed)) => seed,
        Ok(None) => {
            info!("no document outline detected; keeping default crop");
            return;
        }
        Err(err) => {
            warn!(error = %err, "corner detection unavailable; keeping default crop");
            return;
        }
    };

    match session.apply_seed(ticket, &seed) {
        Ok(SeedOutcome::Applied) => {}
        Ok(SeedOutcome::Ignored(reason)) => debug!(?reason, "seed arrived too late"),
        Err(err) => warn!(error = %err, "seed rejected; keeping default crop"),
    }
}
