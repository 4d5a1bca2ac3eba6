use crate::geometry::BoundingBox;

/// One detected box with its class and confidence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub class_id: u32,
    pub confidence: f32,
}

impl Detection {
    pub fn new(bbox: BoundingBox, class_id: u32, confidence: f32) -> Self {
        Self {
            bbox,
            class_id,
            confidence,
        }
    }
}

/// Ordered detections produced by one detector call on one frame.
///
/// Detection sets are per-frame values; nothing carries over between
/// frames (no tracking, no identity persistence).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionSet {
    pub detections: Vec<Detection>,
}

impl DetectionSet {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    /// Boxes in detection order.
    pub fn boxes(&self) -> Vec<BoundingBox> {
        self.detections.iter().map(|d| d.bbox).collect()
    }

    /// Boxes whose class id is in `allowed`, dropping ids the detector's
    /// label table does not cover. Malformed per-box data is filtered, not
    /// raised.
    pub fn boxes_for_classes(&self, allowed: &[u32], class_count: usize) -> Vec<BoundingBox> {
        self.detections
            .iter()
            .filter(|d| (d.class_id as usize) < class_count && allowed.contains(&d.class_id))
            .map(|d| d.bbox)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_filter_drops_out_of_range_ids() {
        let set = DetectionSet::new(vec![
            Detection::new(BoundingBox::new(0, 0, 10, 10), 0, 0.9),
            Detection::new(BoundingBox::new(5, 5, 15, 15), 1, 0.8),
            // Class id beyond the 2-entry label table: silently dropped
            // even though it is in the allow-list.
            Detection::new(BoundingBox::new(20, 20, 30, 30), 7, 0.8),
        ]);
        let boxes = set.boxes_for_classes(&[1, 7], 2);
        assert_eq!(boxes, vec![BoundingBox::new(5, 5, 15, 15)]);
    }
}
