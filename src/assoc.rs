//! Marker-to-subject association.
//!
//! For every subject box in a frame we ask one question: does any marker box
//! overlap it enough, or sit entirely inside it? The answer is an existence
//! check, not an assignment - markers are never claimed or removed from the
//! candidate pool, so one marker may satisfy several subjects at once.
//! `Session` recomputes the answer from scratch every frame; nothing here
//! carries state.

use crate::geometry::{center_inside, overlap_ratio, BoundingBox};

/// True iff any marker satisfies `overlap_ratio(subject, marker) >=
/// match_threshold` or has its midpoint inside the subject box.
///
/// The two heuristics are independent: a loose IoU threshold (the default
/// configuration uses 0.05, effectively "touches at all") and a strict
/// containment test that catches small markers fully inside a large subject
/// where IoU stays near zero. Short-circuits on the first satisfying marker.
///
/// `match_threshold` is accepted as-is; values >= 1 make the IoU branch
/// unreachable and leave containment as the only trigger.
pub fn is_associated(subject: BoundingBox, markers: &[BoundingBox], match_threshold: f32) -> bool {
    markers
        .iter()
        .any(|&m| overlap_ratio(subject, m) >= match_threshold || center_inside(subject, m))
}

/// Number of subjects with at least one associated marker.
pub fn count_associated(
    subjects: &[BoundingBox],
    markers: &[BoundingBox],
    match_threshold: f32,
) -> usize {
    subjects
        .iter()
        .filter(|&&s| is_associated(s, markers, match_threshold))
        .count()
}
