use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use image::RgbImage;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use super::{Color, RenderSink};
use crate::frame::Frame;
use crate::geometry::BoundingBox;

/// Headless production sink.
///
/// Outlines are burned into the frame pixels with `imageproc`; each
/// presented frame is encoded as `frame_NNNNNN.jpg` in the output
/// directory. Text overlays are emitted through the log rather than
/// rasterized (no font assets in the daemon). Cancel is a shared flag,
/// normally wired to the process signal handler.
pub struct DiskSink {
    out_dir: PathBuf,
    cancel: Arc<AtomicBool>,
    presented: u64,
}

impl DiskSink {
    pub fn new(out_dir: impl Into<PathBuf>, cancel: Arc<AtomicBool>) -> Result<Self> {
        let out_dir = out_dir.into();
        std::fs::create_dir_all(&out_dir)
            .with_context(|| format!("create output directory {}", out_dir.display()))?;
        Ok(Self {
            out_dir,
            cancel,
            presented: 0,
        })
    }

    pub fn frames_written(&self) -> u64 {
        self.presented
    }
}

impl RenderSink for DiskSink {
    fn draw_rect(&mut self, frame: &mut Frame, rect: BoundingBox, color: Color, thickness: u32) {
        let (fw, fh) = (frame.width(), frame.height());
        let Some(mut img) = RgbImage::from_raw(fw, fh, frame.pixels().to_vec()) else {
            return;
        };

        // Clip to the frame; skip boxes fully outside or degenerate.
        let x1 = rect.x1.clamp(0, fw as i32 - 1);
        let y1 = rect.y1.clamp(0, fh as i32 - 1);
        let x2 = rect.x2.clamp(0, fw as i32 - 1);
        let y2 = rect.y2.clamp(0, fh as i32 - 1);
        if x2 > x1 && y2 > y1 {
            for t in 0..thickness.max(1) as i32 {
                let w = (x2 - x1) - 2 * t;
                let h = (y2 - y1) - 2 * t;
                if w <= 0 || h <= 0 {
                    break;
                }
                draw_hollow_rect_mut(
                    &mut img,
                    Rect::at(x1 + t, y1 + t).of_size(w as u32, h as u32),
                    image::Rgb(color.0),
                );
            }
        }

        if let Ok(updated) = Frame::from_rgb(img.into_raw(), fw, fh) {
            *frame = updated;
        }
    }

    fn draw_text(&mut self, _frame: &mut Frame, _x: i32, _y: i32, text: &str, _color: Color) {
        // Headless sink: overlay text goes to the log, not to pixels.
        log::info!("overlay: {}", text);
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        let path = self.out_dir.join(format!("frame_{:06}.jpg", self.presented));
        let img = RgbImage::from_raw(frame.width(), frame.height(), frame.pixels().to_vec())
            .context("frame buffer does not match its dimensions")?;
        img.save(&path)
            .with_context(|| format!("write annotated frame {}", path.display()))?;
        self.presented += 1;
        Ok(())
    }

    fn poll_cancel(&mut self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}
