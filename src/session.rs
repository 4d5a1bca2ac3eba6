//! Frame processing session.
//!
//! A `Session` owns the whole per-stream lifecycle:
//!
//! ```text
//! OPEN -> (READING)* -> CLOSED
//! ```
//!
//! `open` resolves the marker class allow-list and connects the source;
//! either failing is fatal and the session never reads a frame. Each
//! `READING` iteration pulls one frame, runs both detectors, evaluates the
//! association decision per subject, updates the smoothed fps, draws the
//! annotations, and polls the cancel signal. End of stream (or a failed
//! read) closes the session cleanly - no retry, no reconnect; resumption is
//! the caller's business.
//!
//! Everything is synchronous and single-threaded: capture, both detector
//! calls, and rendering block in turn inside one iteration. The only
//! mutable state carried across frames is the smoothed fps scalar and the
//! source handle, both fields of the session, so independent sessions can
//! coexist and tests can drive `step_frame` directly with synthetic
//! collaborators.

use anyhow::Result;
use std::time::Instant;

use crate::assoc::{count_associated, is_associated};
use crate::detect::{resolve_marker_classes, DetectOptions, DetectorBackend};
use crate::frame::Frame;
use crate::ingest::FrameSource;
use crate::render::{aggregate_line, subject_style, RenderSink};

/// Smoothing guard against zero-length frame intervals.
const MIN_INTERVAL_SECS: f32 = 1e-6;

/// Exponential moving average of the instantaneous frame rate.
///
/// `fps = 0.9 * fps + 0.1 * (1 / max(dt, 1e-6))`. The heavy weight on the
/// previous value keeps the display stable through single-frame timing
/// spikes. One estimator lives per session, seeded at zero when the stream
/// opens.
#[derive(Clone, Copy, Debug, Default)]
pub struct FpsEstimator {
    fps: f32,
}

impl FpsEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one frame interval (seconds) into the estimate.
    pub fn update(&mut self, dt_secs: f32) -> f32 {
        let instantaneous = 1.0 / dt_secs.max(MIN_INTERVAL_SECS);
        self.fps = 0.9 * self.fps + 0.1 * instantaneous;
        self.fps
    }

    pub fn value(&self) -> f32 {
        self.fps
    }
}

/// Session configuration resolved before the loop starts.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Class id the subject detector is restricted to.
    pub subject_class: u32,
    /// Marker label names resolved against the marker detector at startup.
    pub marker_labels: Vec<String>,
    /// IoU threshold for the loose half of the association decision.
    pub match_threshold: f32,
    pub subject_opts: DetectOptions,
    pub marker_opts: DetectOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            subject_class: 0,
            marker_labels: vec![
                "card".to_string(),
                "cards".to_string(),
                "lanyard".to_string(),
            ],
            match_threshold: 0.05,
            subject_opts: DetectOptions {
                confidence: 0.40,
                iou: 0.5,
            },
            marker_opts: DetectOptions {
                confidence: 0.35,
                iou: 0.5,
            },
        }
    }
}

/// Session lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Reading,
    Closed,
}

/// What one frame produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    pub subjects: usize,
    pub associated: usize,
}

/// Aggregate result of a finished session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub frames: u64,
    pub cancelled: bool,
}

pub struct Session<Src, Sub, Mark, Sink> {
    source: Src,
    subject_detector: Sub,
    marker_detector: Mark,
    sink: Sink,
    config: SessionConfig,
    marker_classes: Vec<u32>,
    marker_class_count: usize,
    fps: FpsEstimator,
    frames: u64,
    state: SessionState,
}

impl<Src, Sub, Mark, Sink> Session<Src, Sub, Mark, Sink>
where
    Src: FrameSource,
    Sub: DetectorBackend,
    Mark: DetectorBackend,
    Sink: RenderSink,
{
    /// Open a session: resolve the marker allow-list, then acquire the
    /// source. Both failures are fatal configuration/I-O errors; the loop
    /// is never entered and no frame is read.
    pub fn open(
        mut source: Src,
        mut subject_detector: Sub,
        mut marker_detector: Mark,
        sink: Sink,
        config: SessionConfig,
    ) -> Result<Self> {
        let marker_classes =
            resolve_marker_classes(marker_detector.class_names(), &config.marker_labels)?;
        let marker_class_count = marker_detector.class_names().len();
        log::info!(
            "marker classes resolved: {:?} (of {} model classes)",
            marker_classes,
            marker_class_count
        );

        subject_detector.warm_up()?;
        marker_detector.warm_up()?;
        source.connect()?;

        Ok(Self {
            source,
            subject_detector,
            marker_detector,
            sink,
            config,
            marker_classes,
            marker_class_count,
            fps: FpsEstimator::new(),
            frames: 0,
            state: SessionState::Open,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames
    }

    pub fn fps(&self) -> f32 {
        self.fps.value()
    }

    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    pub fn source(&self) -> &Src {
        &self.source
    }

    /// Process one already-pulled frame: detect, associate, annotate,
    /// present. `dt_secs` is the interval since the previous frame; tests
    /// drive it synthetically, `run` measures it.
    pub fn step_frame(&mut self, frame: &mut Frame, dt_secs: f32) -> Result<FrameReport> {
        let subjects = self
            .subject_detector
            .detect(
                frame,
                Some(&[self.config.subject_class]),
                &self.config.subject_opts,
            )?
            .boxes();

        let marker_set = self.marker_detector.detect(
            frame,
            Some(&self.marker_classes),
            &self.config.marker_opts,
        )?;
        // Out-of-range class ids from the backend are dropped, not raised.
        let markers = marker_set.boxes_for_classes(&self.marker_classes, self.marker_class_count);

        let associated = count_associated(&subjects, &markers, self.config.match_threshold);
        for &subject in &subjects {
            let has_marker = is_associated(subject, &markers, self.config.match_threshold);
            let style = subject_style(has_marker);
            self.sink.draw_rect(frame, subject, style.color, 2);
            self.sink.draw_text(
                frame,
                subject.x1,
                (subject.y1 - 10).max(20),
                style.label,
                style.color,
            );
        }

        let fps = self.fps.update(dt_secs);
        let line = aggregate_line(subjects.len(), associated, fps);
        self.sink
            .draw_text(frame, 10, 30, &line, crate::render::Color([240, 240, 240]));
        self.sink.present(frame)?;

        self.frames += 1;
        Ok(FrameReport {
            subjects: subjects.len(),
            associated,
        })
    }

    /// Run the blocking pull loop until end of stream or cancel, then
    /// release the source. Frame-read failure ends the session cleanly;
    /// it is not surfaced as a fault.
    pub fn run(&mut self) -> Result<SessionSummary> {
        self.state = SessionState::Reading;
        let mut prev = Instant::now();
        let mut cancelled = false;

        loop {
            let frame = match self.source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    log::info!("end of stream after {} frames", self.frames);
                    break;
                }
                Err(e) => {
                    // Treated as expected end of stream, not a crash.
                    log::warn!("frame read failed, closing session: {}", e);
                    break;
                }
            };

            let now = Instant::now();
            let dt = now.duration_since(prev).as_secs_f32();
            prev = now;

            let mut frame = frame;
            let report = self.step_frame(&mut frame, dt)?;
            log::debug!(
                "frame {}: {} subjects, {} with marker, fps {:.1}",
                self.frames,
                report.subjects,
                report.associated,
                self.fps.value()
            );

            if self.sink.poll_cancel() {
                log::info!("cancel signalled after {} frames", self.frames);
                cancelled = true;
                break;
            }
        }

        self.close();
        Ok(SessionSummary {
            frames: self.frames,
            cancelled,
        })
    }

    fn close(&mut self) {
        if self.state != SessionState::Closed {
            let stats = self.source.stats();
            log::info!(
                "releasing source {} ({} frames captured)",
                stats.url,
                stats.frames_captured
            );
            self.source.close();
            self.state = SessionState::Closed;
        }
    }
}
