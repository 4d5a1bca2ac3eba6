//! badgewatchd - marker association daemon
//!
//! This daemon:
//! 1. Loads configuration (JSON file + env + flags)
//! 2. Resolves the marker class allow-list against the marker detector
//! 3. Opens the configured stream source
//! 4. Runs the annotate/associate loop until end of stream or Ctrl-C
//! 5. Writes annotated frames to the output directory

use anyhow::Result;
use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use badgewatch::{
    AnnotatorConfig, DiskSink, Session, StreamSource, SyntheticBackend,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Stream source URL (stub://name for synthetic frames).
    #[arg(long)]
    source: Option<String>,
    /// Output directory for annotated frames.
    #[arg(long)]
    out: Option<String>,
    /// IoU threshold for marker-to-subject matching.
    #[arg(long)]
    match_iou: Option<f32>,
    /// Stop after this many frames (0 = unbounded, synthetic sources only).
    #[arg(long)]
    frames: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut cfg = AnnotatorConfig::load()?;
    if let Some(source) = args.source {
        cfg.source.url = source;
    }
    if let Some(out) = args.out {
        cfg.output_dir = out;
    }
    if let Some(match_iou) = args.match_iou {
        cfg.match_threshold = match_iou;
    }
    if let Some(frames) = args.frames {
        cfg.source.frame_limit = frames;
    }

    log::info!(
        "badgewatchd {} starting: source={} out={} match_iou={}",
        env!("CARGO_PKG_VERSION"),
        cfg.source.url,
        cfg.output_dir,
        cfg.match_threshold
    );
    if let Some(device) = &cfg.device {
        log::info!("compute device requested: {}", device);
    }

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            cancel.store(true, Ordering::Relaxed);
        })?;
    }

    let source = StreamSource::new(cfg.source.clone())?;
    let sink = DiskSink::new(&cfg.output_dir, cancel)?;

    // One detector instance per role: subjects restricted to one class,
    // markers to the resolved allow-list.
    let subject_detector = SyntheticBackend::new();
    let marker_detector = SyntheticBackend::new();

    let mut session = Session::open(
        source,
        subject_detector,
        marker_detector,
        sink,
        cfg.session_config(),
    )?;

    let summary = session.run()?;
    log::info!(
        "session closed: {} frames processed, cancelled={}",
        summary.frames,
        summary.cancelled
    );
    Ok(())
}
