//! Annotated output.
//!
//! The session talks to a `RenderSink`: draw rectangles and text onto the
//! current frame, present it, and answer a non-blocking cancel check. Two
//! sinks ship:
//! - `RecordingSink`: records every call, scripted cancel (tests)
//! - `DiskSink`: burns outlines into the frame and encodes JPEGs to a
//!   directory, cancel wired to a shared flag (headless daemon output)
//!
//! Styling decisions (colors, labels, the aggregate line) live in
//! `overlay`, separate from any sink, so the per-frame step stays drivable
//! without a display.

mod disk;
mod overlay;
mod recording;

use anyhow::Result;

use crate::frame::Frame;
use crate::geometry::BoundingBox;

pub use disk::DiskSink;
pub use overlay::{aggregate_line, subject_style, SubjectStyle, COLOR_ASSOCIATED, COLOR_UNASSOCIATED};
pub use recording::{RecordedOp, RecordingSink};

/// RGB draw color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color(pub [u8; 3]);

/// Display/render collaborator for the session loop.
pub trait RenderSink {
    /// Draw a rectangle outline onto the frame.
    fn draw_rect(&mut self, frame: &mut Frame, rect: BoundingBox, color: Color, thickness: u32);

    /// Draw a text overlay anchored at `(x, y)`.
    fn draw_text(&mut self, frame: &mut Frame, x: i32, y: i32, text: &str, color: Color);

    /// Present the annotated frame.
    fn present(&mut self, frame: &Frame) -> Result<()>;

    /// Non-blocking cancel check, polled once per iteration.
    fn poll_cancel(&mut self) -> bool;
}
