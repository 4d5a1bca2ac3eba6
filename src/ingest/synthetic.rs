use anyhow::Result;
use rand::Rng;

use super::{FrameSource, SourceConfig, SourceStats};
use crate::frame::Frame;

/// Synthetic frame source for `stub://` URLs.
///
/// Produces noise frames at the configured dimensions. With a nonzero
/// `frame_limit` the source signals end of stream after that many frames,
/// which lets tests drive the session through its full open/read/close
/// lifecycle without a capture device.
pub struct SyntheticSource {
    config: SourceConfig,
    frame_count: u64,
}

impl SyntheticSource {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            frame_count: 0,
        }
    }
}

impl FrameSource for SyntheticSource {
    fn connect(&mut self) -> Result<()> {
        log::info!("SyntheticSource: connected to {}", self.config.url);
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.config.frame_limit > 0 && self.frame_count >= self.config.frame_limit {
            return Ok(None);
        }
        self.frame_count += 1;

        let width = if self.config.width > 0 {
            self.config.width
        } else {
            640
        };
        let height = if self.config.height > 0 {
            self.config.height
        } else {
            480
        };

        // Low-level noise so consecutive frames differ, like a live sensor.
        let mut rng = rand::thread_rng();
        let mut pixels = vec![0u8; width as usize * height as usize * 3];
        for px in pixels.iter_mut() {
            *px = rng.gen_range(16..48);
        }

        Ok(Some(Frame::from_rgb(pixels, width, height)?))
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            frames_captured: self.frame_count,
            url: self.config.url.clone(),
        }
    }
}
