use std::collections::VecDeque;

use anyhow::Result;

use crate::detect::backend::{DetectOptions, DetectorBackend};
use crate::detect::result::{Detection, DetectionSet};
use crate::frame::Frame;

/// Scripted backend for tests. Plays back a fixed per-frame script of
/// detections, applying the class filter and confidence threshold the same
/// way a real backend would. Calls past the end of the script return empty
/// sets.
pub struct ScriptedBackend {
    class_names: Vec<String>,
    script: VecDeque<Vec<Detection>>,
    calls: u64,
}

impl ScriptedBackend {
    pub fn new(class_names: Vec<String>) -> Self {
        Self {
            class_names,
            script: VecDeque::new(),
            calls: 0,
        }
    }

    /// Queue the detections returned by the next `detect` call.
    pub fn push_frame(&mut self, detections: Vec<Detection>) {
        self.script.push_back(detections);
    }

    /// Number of `detect` calls made so far.
    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl DetectorBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn class_names(&self) -> &[String] {
        &self.class_names
    }

    fn detect(
        &mut self,
        _frame: &Frame,
        class_filter: Option<&[u32]>,
        opts: &DetectOptions,
    ) -> Result<DetectionSet> {
        self.calls += 1;
        let scripted = self.script.pop_front().unwrap_or_default();
        let detections = scripted
            .into_iter()
            .filter(|d| d.confidence >= opts.confidence)
            .filter(|d| class_filter.is_none_or(|f| f.contains(&d.class_id)))
            .collect();
        Ok(DetectionSet::new(detections))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox;

    #[test]
    fn applies_confidence_and_class_filter() {
        let mut backend = ScriptedBackend::new(vec!["person".into(), "card".into()]);
        backend.push_frame(vec![
            Detection::new(BoundingBox::new(0, 0, 10, 10), 0, 0.9),
            Detection::new(BoundingBox::new(0, 0, 10, 10), 1, 0.9),
            Detection::new(BoundingBox::new(0, 0, 10, 10), 0, 0.1),
        ]);

        let frame = Frame::filled(4, 4, [0, 0, 0]);
        let opts = DetectOptions {
            confidence: 0.5,
            iou: 0.5,
        };
        let set = backend.detect(&frame, Some(&[0]), &opts).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.detections[0].class_id, 0);
        assert_eq!(backend.calls(), 1);
    }

    #[test]
    fn exhausted_script_returns_empty_sets() {
        let mut backend = ScriptedBackend::new(vec!["person".into()]);
        let frame = Frame::filled(4, 4, [0, 0, 0]);
        let set = backend
            .detect(&frame, None, &DetectOptions::default())
            .unwrap();
        assert!(set.is_empty());
    }
}
