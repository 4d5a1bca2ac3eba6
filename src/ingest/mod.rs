//! Frame ingestion sources.
//!
//! Sources produce decoded RGB `Frame`s for the session loop:
//! - Synthetic noise frames (`stub://` URLs, tests and demos)
//! - GStreamer capture (feature: capture-gstreamer)
//!
//! A source is a blocking pull collaborator. `next_frame` returning
//! `Ok(None)` means end of stream; the session treats that as a clean close,
//! never a fault, and there is no retry or reconnect logic anywhere in the
//! core. Timeout behavior belongs entirely to the source implementation.

mod synthetic;

#[cfg(feature = "capture-gstreamer")]
pub(crate) mod gst;

use anyhow::Result;

use crate::frame::Frame;

pub use synthetic::SyntheticSource;

/// Configuration for a stream source.
#[derive(Clone, Debug)]
pub struct SourceConfig {
    /// Source identifier: `stub://name` for synthetic, otherwise a capture
    /// URI handed to the production backend.
    pub url: String,
    /// Requested capture width; 0 leaves the device default.
    pub width: u32,
    /// Requested capture height; 0 leaves the device default.
    pub height: u32,
    /// Stop after this many frames (synthetic sources only; 0 = unbounded).
    pub frame_limit: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: "stub://camera".to_string(),
            width: 640,
            height: 480,
            frame_limit: 0,
        }
    }
}

/// Stream source trait: acquire, pull, report.
///
/// `connect` failing is fatal to the session (the loop never starts).
pub trait FrameSource {
    fn connect(&mut self) -> Result<()>;

    /// Pull the next frame. `Ok(None)` signals end of stream.
    fn next_frame(&mut self) -> Result<Option<Frame>>;

    fn stats(&self) -> SourceStats;

    /// Release the source. Called once when the session closes.
    fn close(&mut self) {}
}

/// Counters reported by a source.
#[derive(Clone, Debug)]
pub struct SourceStats {
    pub frames_captured: u64,
    pub url: String,
}

/// Stream source facade. Picks a backend from the URL scheme.
pub struct StreamSource {
    backend: SourceBackend,
}

enum SourceBackend {
    Synthetic(SyntheticSource),
    #[cfg(feature = "capture-gstreamer")]
    Gstreamer(gst::GstreamerSource),
}

impl StreamSource {
    pub fn new(config: SourceConfig) -> Result<Self> {
        if config.url.starts_with("stub://") {
            Ok(Self {
                backend: SourceBackend::Synthetic(SyntheticSource::new(config)),
            })
        } else {
            #[cfg(feature = "capture-gstreamer")]
            {
                Ok(Self {
                    backend: SourceBackend::Gstreamer(gst::GstreamerSource::new(config)?),
                })
            }
            #[cfg(not(feature = "capture-gstreamer"))]
            {
                anyhow::bail!("capture from {} requires the capture-gstreamer feature", config.url)
            }
        }
    }
}

impl FrameSource for StreamSource {
    fn connect(&mut self) -> Result<()> {
        match &mut self.backend {
            SourceBackend::Synthetic(source) => source.connect(),
            #[cfg(feature = "capture-gstreamer")]
            SourceBackend::Gstreamer(source) => source.connect(),
        }
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        match &mut self.backend {
            SourceBackend::Synthetic(source) => source.next_frame(),
            #[cfg(feature = "capture-gstreamer")]
            SourceBackend::Gstreamer(source) => source.next_frame(),
        }
    }

    fn stats(&self) -> SourceStats {
        match &self.backend {
            SourceBackend::Synthetic(source) => source.stats(),
            #[cfg(feature = "capture-gstreamer")]
            SourceBackend::Gstreamer(source) => source.stats(),
        }
    }

    fn close(&mut self) {
        match &mut self.backend {
            SourceBackend::Synthetic(source) => source.close(),
            #[cfg(feature = "capture-gstreamer")]
            SourceBackend::Gstreamer(source) => source.close(),
        }
    }
}
