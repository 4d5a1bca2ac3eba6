mod backend;
mod backends;
mod labels;
mod result;

pub use backend::{DetectOptions, DetectorBackend};
pub use backends::{
    ScriptedBackend, SyntheticBackend, SYNTHETIC_MARKER_CLASS, SYNTHETIC_SUBJECT_CLASS,
};
pub use labels::resolve_marker_classes;
pub use result::{Detection, DetectionSet};
