//! Read access to decoded RGBA8 images.
//!
//! Image decoding belongs to the host. The sampler only needs dimensions and
//! a flat buffer where pixel `(x, y)` occupies the four bytes `[r, g, b, a]`
//! at offset `(x + y * width) * 4`.

use crate::error::EngineError;

/// A decoded image the sampler can scan.
pub trait PixelSource {
    /// Image width in pixels.
    fn width(&self) -> usize;

    /// Image height in pixels.
    fn height(&self) -> usize;

    /// Row-major RGBA8 data, `width * height * 4` bytes.
    fn pixels(&self) -> &[u8];

    /// The `[r, g, b, a]` channels of pixel `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the image.
    fn rgba(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (x + y * self.width()) * 4;
        let p = self.pixels();
        [p[i], p[i + 1], p[i + 2], p[i + 3]]
    }
}

/// Owned RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbaBuffer {
    /// Wraps an existing buffer, checking that it holds exactly `width * height * 4` bytes.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, EngineError> {
        let expected = rgba_len(width, height)?;
        if data.len() != expected {
            return Err(EngineError::BufferSizeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates an image where every pixel is `rgba`.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Result<Self, EngineError> {
        let len = rgba_len(width, height)?;
        let data = rgba.iter().copied().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Overwrites pixel `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (x + y * self.width) * 4;
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Consumes the buffer, returning the raw bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

impl PixelSource for RgbaBuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn pixels(&self) -> &[u8] {
        &self.data
    }
}

/// Byte length of a `width x height` RGBA8 buffer.
///
/// Zero dimensions and byte counts that overflow `usize` are
/// `EngineError::InvalidDimensions`.
pub fn rgba_len(width: usize, height: usize) -> Result<usize, EngineError> {
    if width == 0 || height == 0 {
        return Err(EngineError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(4))
        .ok_or(EngineError::InvalidDimensions)
}
