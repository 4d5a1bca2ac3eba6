//! badgewatch
//!
//! Frame annotator: given two independently detected box sets per video
//! frame - subjects and markers - decide per subject whether a marker is
//! associated with it, draw the verdicts onto the frame, and report
//! aggregate counts plus a smoothed frame rate.
//!
//! # Architecture
//!
//! Dependency order inside the crate:
//!
//! 1. `geometry`: IoU and center-containment primitives
//! 2. `assoc`: the per-subject association decision (any-marker OR of a
//!    loose IoU threshold and a strict containment test)
//! 3. `render`: per-subject outlines/labels and the aggregate overlay
//! 4. `session`: the blocking pull loop over a stream source
//!
//! Detection itself is an external collaborator behind `DetectorBackend`;
//! capture is behind `FrameSource`; output is behind `RenderSink`. The
//! session is generic over all three, so tests run the full loop with
//! synthetic implementations and no camera, model, or display.
//!
//! Association is deliberately not an assignment: markers are never claimed
//! or consumed, so one marker can satisfy any number of subjects. Nothing
//! persists across frames except the smoothed fps scalar owned by the
//! session.

pub mod assoc;
pub mod config;
pub mod detect;
pub mod frame;
pub mod geometry;
pub mod ingest;
pub mod render;
pub mod session;

pub use assoc::{count_associated, is_associated};
pub use config::AnnotatorConfig;
pub use detect::{
    resolve_marker_classes, DetectOptions, Detection, DetectionSet, DetectorBackend,
    ScriptedBackend, SyntheticBackend, SYNTHETIC_MARKER_CLASS, SYNTHETIC_SUBJECT_CLASS,
};
pub use frame::Frame;
pub use geometry::{center_inside, overlap_ratio, BoundingBox};
pub use ingest::{FrameSource, SourceConfig, SourceStats, StreamSource, SyntheticSource};
pub use render::{
    aggregate_line, subject_style, Color, DiskSink, RecordedOp, RecordingSink, RenderSink,
    SubjectStyle, COLOR_ASSOCIATED, COLOR_UNASSOCIATED,
};
pub use session::{
    FpsEstimator, FrameReport, Session, SessionConfig, SessionState, SessionSummary,
};
