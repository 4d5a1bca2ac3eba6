use anyhow::Result;

use crate::detect::backend::{DetectOptions, DetectorBackend};
use crate::detect::result::{Detection, DetectionSet};
use crate::frame::Frame;
use crate::geometry::BoundingBox;

/// Synthetic backend for `stub://` runs.
///
/// Generates one subject box sweeping across the frame, plus - on
/// alternating stretches - a marker box riding inside it. Useful for
/// exercising the whole annotate/associate path without a model or camera.
pub struct SyntheticBackend {
    class_names: Vec<String>,
    frame_count: u64,
}

/// Subject class id emitted by the synthetic backend.
pub const SYNTHETIC_SUBJECT_CLASS: u32 = 0;
/// Marker class id emitted by the synthetic backend.
pub const SYNTHETIC_MARKER_CLASS: u32 = 1;

impl SyntheticBackend {
    pub fn new() -> Self {
        Self {
            class_names: vec!["person".to_string(), "card".to_string()],
            frame_count: 0,
        }
    }

    fn scene(&self, width: i32, height: i32) -> Vec<Detection> {
        // Sweep the subject horizontally, one pixel per frame, wrapping.
        let span = (width - 80).max(1);
        let x = (self.frame_count % span as u64) as i32;
        let subject = BoundingBox::new(x, height / 4, x + 80, (height * 3) / 4);

        let mut detections = vec![Detection::new(subject, SYNTHETIC_SUBJECT_CLASS, 0.92)];

        // Marker present on alternating 25-frame stretches.
        if (self.frame_count / 25) % 2 == 0 {
            let (cx, cy) = subject.center();
            let marker = BoundingBox::new(cx - 8, cy - 5, cx + 8, cy + 5);
            detections.push(Detection::new(marker, SYNTHETIC_MARKER_CLASS, 0.81));
        }

        detections
    }
}

impl Default for SyntheticBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorBackend for SyntheticBackend {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn class_names(&self) -> &[String] {
        &self.class_names
    }

    fn detect(
        &mut self,
        frame: &Frame,
        class_filter: Option<&[u32]>,
        opts: &DetectOptions,
    ) -> Result<DetectionSet> {
        self.frame_count += 1;
        let detections = self
            .scene(frame.width() as i32, frame.height() as i32)
            .into_iter()
            .filter(|d| d.confidence >= opts.confidence)
            .filter(|d| class_filter.is_none_or(|f| f.contains(&d.class_id)))
            .collect();
        Ok(DetectionSet::new(detections))
    }
}
