pub mod scripted;
pub mod synthetic;

pub use scripted::ScriptedBackend;
pub use synthetic::{SyntheticBackend, SYNTHETIC_MARKER_CLASS, SYNTHETIC_SUBJECT_CLASS};
