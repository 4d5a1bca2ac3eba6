use anyhow::Result;

use super::{Color, RenderSink};
use crate::frame::Frame;
use crate::geometry::BoundingBox;

/// Everything a sink was asked to do, in call order.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedOp {
    Rect {
        rect: BoundingBox,
        color: Color,
        thickness: u32,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        color: Color,
    },
    Present,
}

/// Test sink. Records draw calls without touching pixels and reports
/// cancel after a scripted number of `poll_cancel` calls.
#[derive(Default)]
pub struct RecordingSink {
    pub ops: Vec<RecordedOp>,
    cancel_after_polls: Option<u64>,
    polls: u64,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report cancel on the `n`-th `poll_cancel` call (1-based).
    pub fn cancel_after_polls(mut self, n: u64) -> Self {
        self.cancel_after_polls = Some(n);
        self
    }

    pub fn presented_frames(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, RecordedOp::Present))
            .count()
    }

    pub fn text_ops(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                RecordedOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl RenderSink for RecordingSink {
    fn draw_rect(&mut self, _frame: &mut Frame, rect: BoundingBox, color: Color, thickness: u32) {
        self.ops.push(RecordedOp::Rect {
            rect,
            color,
            thickness,
        });
    }

    fn draw_text(&mut self, _frame: &mut Frame, x: i32, y: i32, text: &str, color: Color) {
        self.ops.push(RecordedOp::Text {
            x,
            y,
            text: text.to_string(),
            color,
        });
    }

    fn present(&mut self, _frame: &Frame) -> Result<()> {
        self.ops.push(RecordedOp::Present);
        Ok(())
    }

    fn poll_cancel(&mut self) -> bool {
        self.polls += 1;
        self.cancel_after_polls
            .is_some_and(|n| self.polls >= n)
    }
}
