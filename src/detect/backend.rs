use anyhow::Result;

use crate::detect::result::DetectionSet;
use crate::frame::Frame;

/// Per-call detector thresholds.
#[derive(Clone, Copy, Debug)]
pub struct DetectOptions {
    /// Minimum confidence for a detection to be reported.
    pub confidence: f32,
    /// NMS IoU threshold, forwarded to the backend.
    pub iou: f32,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            confidence: 0.35,
            iou: 0.5,
        }
    }
}

/// Detector backend trait.
///
/// The session treats a backend as an opaque synchronous collaborator: one
/// blocking `detect` call per frame, boxes out in pixel-space `xyxy` with an
/// integer class id. Backends own their model state; the session owns
/// nothing about how detection happens.
pub trait DetectorBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Class-name table, indexed by class id. Resolved once at startup by
    /// the marker label allow-list; stable for the life of the backend.
    fn class_names(&self) -> &[String];

    /// Run detection on a frame.
    ///
    /// `class_filter` restricts output to the given class ids; `None` means
    /// all classes. Implementations apply `opts.confidence` themselves so
    /// every backend honors the same contract.
    fn detect(
        &mut self,
        frame: &Frame,
        class_filter: Option<&[u32]>,
        opts: &DetectOptions,
    ) -> Result<DetectionSet>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
