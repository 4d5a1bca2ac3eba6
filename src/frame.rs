//! Frame container.
//!
//! A `Frame` is one decoded RGB image pulled from a `FrameSource`. Frames
//! are not retained across loop iterations - detection sets are recomputed
//! from the current frame only, with no tracking or identity persistence.

/// One decoded video frame, tightly packed RGB8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl Frame {
    /// Wrap decoded pixel data. `pixels` must hold `width * height * 3` bytes.
    pub fn from_rgb(pixels: Vec<u8>, width: u32, height: u32) -> anyhow::Result<Self> {
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            anyhow::bail!(
                "frame buffer is {} bytes, expected {} for {}x{} RGB",
                pixels.len(),
                expected,
                width,
                height
            );
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Solid-color frame, mostly useful to sources and tests.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
        for _ in 0..(width as usize * height as usize) {
            pixels.extend_from_slice(&rgb);
        }
        Self {
            pixels,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgb_checks_buffer_size() {
        assert!(Frame::from_rgb(vec![0u8; 12], 2, 2).is_ok());
        assert!(Frame::from_rgb(vec![0u8; 11], 2, 2).is_err());
    }

    #[test]
    fn filled_frame_has_expected_layout() {
        let frame = Frame::filled(2, 1, [1, 2, 3]);
        assert_eq!(frame.pixels(), &[1, 2, 3, 1, 2, 3]);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 1);
    }
}
