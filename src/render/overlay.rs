//! Overlay styling.
//!
//! Pure decisions shared by every sink: which color and label a subject
//! gets, and the aggregate status line.

use super::Color;

/// Green outline for subjects with an associated marker.
pub const COLOR_ASSOCIATED: Color = Color([0, 200, 0]);
/// Red outline for subjects without one.
pub const COLOR_UNASSOCIATED: Color = Color([255, 0, 0]);

/// Outline color and label for one subject.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubjectStyle {
    pub color: Color,
    pub label: &'static str,
}

pub fn subject_style(has_marker: bool) -> SubjectStyle {
    if has_marker {
        SubjectStyle {
            color: COLOR_ASSOCIATED,
            label: "with_marker",
        }
    } else {
        SubjectStyle {
            color: COLOR_UNASSOCIATED,
            label: "without_marker",
        }
    }
}

/// One aggregate line per frame: subject count, associated count, smoothed fps.
pub fn aggregate_line(subjects: usize, associated: usize, fps: f32) -> String {
    format!(
        "subjects: {}  |  with marker: {}  |  fps: {:.1}",
        subjects, associated, fps
    )
}
