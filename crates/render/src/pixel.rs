//! Pure-computation rasterisation of particles into an RGBA8 buffer.
//!
//! Always available (no feature gate) so hosts without PNG support can
//! still produce frames.

use morph_core::{rgba_len, EngineError, Particle, PixelSource};

/// Grey level of the canvas background.
pub const DEFAULT_BACKGROUND: u8 = 20;

/// Side length of each reference-image thumbnail.
pub const PREVIEW_SIZE: usize = 100;
/// Gap between the thumbnails and between them and the canvas edge.
pub const PREVIEW_MARGIN: usize = 20;
const PREVIEW_PADDING: usize = 5;
const PREVIEW_BACKING_ALPHA: f64 = 150.0 / 255.0;
const PREVIEW_MISSING_GREY: u8 = 100;

/// The two reference images to show as thumbnails on a frame. `None`
/// marks an image that never loaded.
#[derive(Clone, Copy, Default)]
pub struct Previews<'a> {
    pub start: Option<&'a dyn PixelSource>,
    pub end: Option<&'a dyn PixelSource>,
}

/// Draws every particle as a white square of side `size` centred on its
/// current position, alpha-blended by its opacity over an opaque grey
/// background. Squares are clipped to the canvas.
///
/// A pixel is covered when its centre lies inside the half-open square
/// `[x - size/2, x + size/2)`. The buffer length is `width * height * 4`;
/// zero dimensions or a length that overflows `usize` are
/// `EngineError::InvalidDimensions`.
pub fn particles_to_rgba(
    particles: &[Particle],
    width: usize,
    height: usize,
    background: u8,
) -> Result<Vec<u8>, EngineError> {
    let len = rgba_len(width, height)?;
    let mut buf: Vec<u8> = [background, background, background, 255]
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect();

    for particle in particles {
        let half = particle.size() / 2.0;
        let c = particle.current();
        let Some((x0, x1)) = covered_span(c.x - half, c.x + half, width) else {
            continue;
        };
        let Some((y0, y1)) = covered_span(c.y - half, c.y + half, height) else {
            continue;
        };
        let alpha = particle.opacity().clamp(0.0, 1.0);
        for y in y0..y1 {
            for x in x0..x1 {
                let i = (y * width + x) * 4;
                for channel in &mut buf[i..i + 3] {
                    *channel = blend(*channel, 255, alpha);
                }
            }
        }
    }
    Ok(buf)
}

/// Overlays thumbnails of the two reference images in the lower-right
/// corner of a frame: start on top, end below it.
///
/// Each thumbnail is a `PREVIEW_SIZE` square on a translucent black backing
/// and is scaled nearest-neighbour, honouring the image's alpha. A missing
/// image (or one whose buffer is too short) is drawn as a grey square.
/// Everything is clipped to the canvas.
pub fn draw_previews(
    buf: &mut [u8],
    width: usize,
    height: usize,
    start: Option<&dyn PixelSource>,
    end: Option<&dyn PixelSource>,
) -> Result<(), EngineError> {
    let expected = rgba_len(width, height)?;
    if buf.len() != expected {
        return Err(EngineError::BufferSizeMismatch {
            expected,
            got: buf.len(),
        });
    }
    let mut canvas = Canvas { buf, width, height };
    let size = PREVIEW_SIZE as i64;
    let margin = PREVIEW_MARGIN as i64;
    let pad = PREVIEW_PADDING as i64;
    let x = width as i64 - size - margin;
    let top = height as i64 - 2 * (size + margin);
    for (y, image) in [(top, start), (top + size + margin, end)] {
        canvas.fill_square(x - pad, y - pad, size + 2 * pad, 0, PREVIEW_BACKING_ALPHA);
        match image.filter(|img| is_drawable(*img)) {
            Some(img) => canvas.blit_scaled(x, y, size, img),
            None => canvas.fill_square(x, y, size, PREVIEW_MISSING_GREY, 1.0),
        }
    }
    Ok(())
}

fn is_drawable(image: &dyn PixelSource) -> bool {
    rgba_len(image.width(), image.height()).is_ok_and(|len| image.pixels().len() >= len)
}

/// A mutable RGBA8 frame addressed with signed coordinates, clipping writes.
struct Canvas<'a> {
    buf: &'a mut [u8],
    width: usize,
    height: usize,
}

impl Canvas<'_> {
    /// Buffer offset of `(x, y)`, or `None` off-canvas.
    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        let x = usize::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = usize::try_from(y).ok().filter(|&y| y < self.height)?;
        Some((y * self.width + x) * 4)
    }

    fn blend_pixel(&mut self, x: i64, y: i64, rgb: [u8; 3], alpha: f64) {
        if let Some(i) = self.offset(x, y) {
            for (channel, src) in self.buf[i..i + 3].iter_mut().zip(rgb) {
                *channel = blend(*channel, src, alpha);
            }
        }
    }

    fn fill_square(&mut self, x: i64, y: i64, side: i64, grey: u8, alpha: f64) {
        for dy in 0..side {
            for dx in 0..side {
                self.blend_pixel(x + dx, y + dy, [grey; 3], alpha);
            }
        }
    }

    fn blit_scaled(&mut self, x: i64, y: i64, side: i64, image: &dyn PixelSource) {
        let (iw, ih) = (image.width(), image.height());
        let side_u = side as usize;
        for dy in 0..side {
            let sy = dy as usize * ih / side_u;
            for dx in 0..side {
                let sx = dx as usize * iw / side_u;
                let [r, g, b, a] = image.rgba(sx, sy);
                self.blend_pixel(x + dx, y + dy, [r, g, b], f64::from(a) / 255.0);
            }
        }
    }
}

/// Pixel index range `[first, last)` whose centres fall in `[lo, hi)`,
/// clipped to `[0, len)`.
fn covered_span(lo: f64, hi: f64, len: usize) -> Option<(usize, usize)> {
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    let first = (lo - 0.5).ceil().max(0.0);
    let last = (hi - 0.5).ceil().min(len as f64);
    (first < last).then(|| (first as usize, last as usize))
}

fn blend(dst: u8, src: u8, alpha: f64) -> u8 {
    let v = f64::from(dst) + (f64::from(src) - f64::from(dst)) * alpha;
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use morph_core::{Point, RgbaBuffer};

    fn pixel(buf: &[u8], width: usize, x: usize, y: usize) -> [u8; 4] {
        let i = (y * width + x) * 4;
        [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
    }

    fn at(x: f64, y: f64, size: f64) -> Particle {
        let p = Point::new(x, y);
        Particle::new(p, p, size)
    }

    #[test]
    fn correct_length_and_background() {
        let buf = particles_to_rgba(&[], 8, 4, DEFAULT_BACKGROUND).unwrap();
        assert_eq!(buf.len(), 8 * 4 * 4);
        assert!(buf.chunks(4).all(|px| px == [20, 20, 20, 255]));
    }

    #[test]
    fn overflowing_byte_count_is_rejected() {
        // width * height fits in usize, width * height * 4 does not.
        let width = usize::MAX / 4 + 1;
        assert!(matches!(
            particles_to_rgba(&[], width, 1, 0),
            Err(EngineError::InvalidDimensions)
        ));
        assert!(matches!(
            particles_to_rgba(&[], usize::MAX, 2, 0),
            Err(EngineError::InvalidDimensions)
        ));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(particles_to_rgba(&[], 0, 10, 0).is_err());
    }

    #[test]
    fn square_covers_size_by_size_pixels() {
        let buf = particles_to_rgba(&[at(5.0, 5.0, 4.0)], 10, 10, 0).unwrap();
        let white = buf.chunks(4).filter(|px| px[0] == 255).count();
        assert_eq!(white, 16);
        assert_eq!(pixel(&buf, 10, 3, 3), [255, 255, 255, 255]);
        assert_eq!(pixel(&buf, 10, 6, 6), [255, 255, 255, 255]);
        assert_eq!(pixel(&buf, 10, 7, 7), [0, 0, 0, 255]);
        assert_eq!(pixel(&buf, 10, 2, 5), [0, 0, 0, 255]);
    }

    #[test]
    fn square_is_clipped_at_canvas_edge() {
        let buf = particles_to_rgba(&[at(0.0, 0.0, 4.0)], 10, 10, 0).unwrap();
        let white = buf.chunks(4).filter(|px| px[0] == 255).count();
        assert_eq!(white, 4);
    }

    #[test]
    fn particle_outside_canvas_draws_nothing() {
        let buf = particles_to_rgba(&[at(-50.0, 500.0, 8.0)], 10, 10, 0).unwrap();
        assert!(buf.chunks(4).all(|px| px == [0, 0, 0, 255]));
    }

    #[test]
    fn draws_current_position_not_start() {
        let mut p = Particle::new(Point::new(2.0, 2.0), Point::new(8.0, 8.0), 2.0);
        p.update(1.0);
        let buf = particles_to_rgba(&[p], 10, 10, 0).unwrap();
        assert_eq!(pixel(&buf, 10, 8, 8)[0], 255);
        assert_eq!(pixel(&buf, 10, 2, 2)[0], 0);
    }

    #[test]
    fn blend_interpolates() {
        assert_eq!(blend(0, 255, 0.0), 0);
        assert_eq!(blend(0, 255, 1.0), 255);
        assert_eq!(blend(20, 255, 0.5), 138);
    }

    #[test]
    fn previews_sit_in_the_lower_right_corner() {
        let (w, h) = (400, 300);
        let mut buf = particles_to_rgba(&[], w, h, 0).unwrap();
        let start = RgbaBuffer::filled(10, 10, [255, 0, 0, 255]).unwrap();
        let end = RgbaBuffer::filled(50, 20, [0, 0, 255, 255]).unwrap();
        draw_previews(&mut buf, w, h, Some(&start), Some(&end)).unwrap();

        // Start thumbnail spans x 280..380, y 60..160; end spans y 180..280.
        assert_eq!(pixel(&buf, w, 280, 60), [255, 0, 0, 255]);
        assert_eq!(pixel(&buf, w, 379, 159), [255, 0, 0, 255]);
        assert_eq!(pixel(&buf, w, 280, 180), [0, 0, 255, 255]);
        assert_eq!(pixel(&buf, w, 379, 279), [0, 0, 255, 255]);
        // Padding between them is the black backing over a black canvas.
        assert_eq!(pixel(&buf, w, 300, 170), [0, 0, 0, 255]);
        // Outside the preview column nothing changes.
        assert_eq!(pixel(&buf, w, 10, 10), [0, 0, 0, 255]);
    }

    #[test]
    fn backing_darkens_the_frame() {
        let (w, h) = (200, 260);
        let mut buf = particles_to_rgba(&[], w, h, 200).unwrap();
        let img = RgbaBuffer::filled(4, 4, [255, 255, 255, 255]).unwrap();
        draw_previews(&mut buf, w, h, Some(&img), Some(&img)).unwrap();
        // Start thumbnail spans x 80..180; x = 77 is inside its 5 px backing.
        assert_eq!(pixel(&buf, w, 77, 30), [82, 82, 82, 255]);
        assert_eq!(pixel(&buf, w, 50, 30), [200, 200, 200, 255]);
    }

    #[test]
    fn missing_image_is_a_grey_square() {
        let (w, h) = (300, 300);
        let mut buf = particles_to_rgba(&[], w, h, 0).unwrap();
        draw_previews(&mut buf, w, h, None, None).unwrap();
        assert_eq!(pixel(&buf, w, 230, 110), [100, 100, 100, 255]);
        assert_eq!(pixel(&buf, w, 230, 230), [100, 100, 100, 255]);
    }

    #[test]
    fn transparent_image_pixels_keep_the_backing() {
        let (w, h) = (300, 300);
        let mut buf = particles_to_rgba(&[], w, h, 255).unwrap();
        let clear = RgbaBuffer::filled(8, 8, [255, 0, 0, 0]).unwrap();
        draw_previews(&mut buf, w, h, Some(&clear), None).unwrap();
        // White canvas under the 150/255 black backing, image adds nothing.
        assert_eq!(pixel(&buf, w, 230, 110), [105, 105, 105, 255]);
    }

    #[test]
    fn previews_are_clipped_on_a_small_canvas() {
        let (w, h) = (50, 40);
        let mut buf = particles_to_rgba(&[], w, h, 0).unwrap();
        draw_previews(&mut buf, w, h, None, None).unwrap();
        assert_eq!(buf.len(), w * h * 4);
        assert!(buf.chunks(4).all(|px| px[3] == 255));
        // The end thumbnail spans x -70..30, y -80..20 and covers the corner.
        assert_eq!(pixel(&buf, w, 0, 0), [100, 100, 100, 255]);
    }

    #[test]
    fn preview_rejects_mismatched_buffer() {
        let mut buf = vec![0; 15];
        assert!(matches!(
            draw_previews(&mut buf, 2, 2, None, None),
            Err(EngineError::BufferSizeMismatch { expected: 16, got: 15 })
        ));
    }
}
