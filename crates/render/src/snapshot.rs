//! PNG input and output.
//!
//! Feature-gated behind `png` (default on). Decoding reference images and
//! encoding frames are host concerns; the engine only sees
//! [`RgbaBuffer`]s and particle positions.

use std::path::Path;

use morph_core::error::EngineError;
use morph_core::{Particle, PixelSource, RgbaBuffer};
use tracing::debug;

use crate::pixel::{draw_previews, particles_to_rgba, Previews};

/// Decodes an image file into an RGBA8 buffer.
pub fn load_image(path: &Path) -> Result<RgbaBuffer, EngineError> {
    let img = image::open(path)
        .map_err(|e| EngineError::Io(format!("{}: {e}", path.display())))?
        .to_rgba8();
    let (w, h) = img.dimensions();
    debug!(path = %path.display(), width = w, height = h, "loaded image");
    RgbaBuffer::from_raw(w as usize, h as usize, img.into_raw())
}

/// Writes a raw RGBA8 buffer as a PNG.
///
/// Returns `EngineError::InvalidDimensions` if a dimension overflows `u32`,
/// or `EngineError::Io` on a size mismatch or write failure.
pub fn write_png(
    rgba: Vec<u8>,
    width: usize,
    height: usize,
    path: &Path,
) -> Result<(), EngineError> {
    let w = u32::try_from(width).map_err(|_| EngineError::InvalidDimensions)?;
    let h = u32::try_from(height).map_err(|_| EngineError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EngineError::Io(format!("{}: {e}", path.display())))?;
    debug!(path = %path.display(), width, height, "wrote png");
    Ok(())
}

/// Rasterises `particles`, overlays the reference thumbnails when
/// `previews` is given, and writes the frame as a PNG.
pub fn write_frame(
    particles: &[Particle],
    width: usize,
    height: usize,
    background: u8,
    previews: Option<Previews<'_>>,
    path: &Path,
) -> Result<(), EngineError> {
    let mut rgba = particles_to_rgba(particles, width, height, background)?;
    if let Some(previews) = previews {
        draw_previews(&mut rgba, width, height, previews.start, previews.end)?;
    }
    write_png(rgba, width, height, path)
}

/// Writes any pixel source as a PNG.
pub fn write_pixels(image: &dyn PixelSource, path: &Path) -> Result<(), EngineError> {
    write_png(image.pixels().to_vec(), image.width(), image.height(), path)
}
