use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

use crate::detect::DetectOptions;
use crate::ingest::SourceConfig;
use crate::session::SessionConfig;

const DEFAULT_SOURCE_URL: &str = "stub://camera";
const DEFAULT_WIDTH: u32 = 640;
const DEFAULT_HEIGHT: u32 = 480;
const DEFAULT_OUTPUT_DIR: &str = "annotated";
const DEFAULT_SUBJECT_CLASS: u32 = 0;
const DEFAULT_SUBJECT_CONF: f32 = 0.40;
const DEFAULT_MARKER_CONF: f32 = 0.35;
const DEFAULT_DETECT_IOU: f32 = 0.50;
const DEFAULT_MATCH_IOU: f32 = 0.05;
const DEFAULT_MARKER_LABELS: [&str; 3] = ["card", "cards", "lanyard"];

#[derive(Debug, Deserialize, Default)]
struct AnnotatorConfigFile {
    output_dir: Option<String>,
    source: Option<SourceConfigFile>,
    detect: Option<DetectConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct SourceConfigFile {
    url: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    frame_limit: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct DetectConfigFile {
    subject_class: Option<u32>,
    subject_confidence: Option<f32>,
    marker_confidence: Option<f32>,
    iou: Option<f32>,
    match_threshold: Option<f32>,
    marker_labels: Option<Vec<String>>,
    device: Option<String>,
}

/// Resolved daemon configuration.
///
/// Loaded from an optional JSON file (`BADGEWATCH_CONFIG`), then overridden
/// by environment variables, then validated. The match threshold is
/// deliberately NOT range-checked: values at or above 1 simply leave the
/// containment test as the only association trigger.
#[derive(Debug, Clone)]
pub struct AnnotatorConfig {
    pub output_dir: String,
    pub source: SourceConfig,
    pub subject_class: u32,
    pub subject_confidence: f32,
    pub marker_confidence: f32,
    pub detect_iou: f32,
    pub match_threshold: f32,
    pub marker_labels: Vec<String>,
    pub device: Option<String>,
}

impl AnnotatorConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("BADGEWATCH_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: AnnotatorConfigFile) -> Self {
        let source = SourceConfig {
            url: file
                .source
                .as_ref()
                .and_then(|s| s.url.clone())
                .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
            width: file
                .source
                .as_ref()
                .and_then(|s| s.width)
                .unwrap_or(DEFAULT_WIDTH),
            height: file
                .source
                .as_ref()
                .and_then(|s| s.height)
                .unwrap_or(DEFAULT_HEIGHT),
            frame_limit: file.source.as_ref().and_then(|s| s.frame_limit).unwrap_or(0),
        };
        let detect = file.detect.unwrap_or_default();
        Self {
            output_dir: file
                .output_dir
                .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            source,
            subject_class: detect.subject_class.unwrap_or(DEFAULT_SUBJECT_CLASS),
            subject_confidence: detect.subject_confidence.unwrap_or(DEFAULT_SUBJECT_CONF),
            marker_confidence: detect.marker_confidence.unwrap_or(DEFAULT_MARKER_CONF),
            detect_iou: detect.iou.unwrap_or(DEFAULT_DETECT_IOU),
            match_threshold: detect.match_threshold.unwrap_or(DEFAULT_MATCH_IOU),
            marker_labels: detect.marker_labels.unwrap_or_else(|| {
                DEFAULT_MARKER_LABELS.iter().map(|s| s.to_string()).collect()
            }),
            device: detect.device,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("BADGEWATCH_SOURCE_URL") {
            if !url.trim().is_empty() {
                self.source.url = url;
            }
        }
        if let Ok(dir) = std::env::var("BADGEWATCH_OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                self.output_dir = dir;
            }
        }
        if let Ok(labels) = std::env::var("BADGEWATCH_MARKER_LABELS") {
            let parsed = split_csv(&labels);
            if !parsed.is_empty() {
                self.marker_labels = parsed;
            }
        }
        if let Ok(raw) = std::env::var("BADGEWATCH_MATCH_IOU") {
            self.match_threshold = raw
                .parse()
                .map_err(|_| anyhow!("BADGEWATCH_MATCH_IOU must be a number"))?;
        }
        if let Ok(raw) = std::env::var("BADGEWATCH_DEVICE") {
            if !raw.trim().is_empty() {
                self.device = Some(raw);
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.marker_labels.is_empty() {
            return Err(anyhow!("marker label list must not be empty"));
        }
        if self.output_dir.trim().is_empty() {
            return Err(anyhow!("output_dir must not be empty"));
        }
        Ok(())
    }

    /// Session-level view of this configuration.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            subject_class: self.subject_class,
            marker_labels: self.marker_labels.clone(),
            match_threshold: self.match_threshold,
            subject_opts: DetectOptions {
                confidence: self.subject_confidence,
                iou: self.detect_iou,
            },
            marker_opts: DetectOptions {
                confidence: self.marker_confidence,
                iou: self.detect_iou,
            },
        }
    }
}

fn read_config_file(path: &Path) -> Result<AnnotatorConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.to_string())
        .collect()
}
