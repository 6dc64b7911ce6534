//! Image sampling: turn a reference image into canvas-space points.
//!
//! Two predicates are supported. Brightness mode keeps near-white opaque
//! pixels on a strided grid sized from the particle budget. Edge mode keeps
//! pixels whose luminance differs enough from their right and bottom
//! neighbours, and stops as soon as the budget is reached.
//!
//! Selected pixel coordinates are normalized by the image size and rescaled
//! to the canvas, so the source resolution never leaks into the output.

use morph_core::error::EngineError;
use morph_core::{rgba_len, PixelSource, Point};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::TransitionConfig;

/// Channel value a pixel must exceed in R, G and B to count as bright.
const BRIGHT_CHANNEL_MIN: u8 = 200;
/// Alpha a pixel must exceed to count as opaque.
const OPAQUE_ALPHA_MIN: u8 = 100;
/// Stride of the edge-mode scan on both axes.
const EDGE_STRIDE: usize = 2;

/// Pixel predicate used by [`ImageSampler`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    #[default]
    Brightness,
    Edge,
}

impl SelectionMode {
    pub fn name(self) -> &'static str {
        match self {
            SelectionMode::Brightness => "brightness",
            SelectionMode::Edge => "edge",
        }
    }

    pub fn names() -> &'static [&'static str] {
        &["brightness", "edge"]
    }

    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "brightness" => Ok(SelectionMode::Brightness),
            "edge" => Ok(SelectionMode::Edge),
            _ => Err(EngineError::UnknownMode {
                kind: "selection".into(),
                name: name.to_string(),
            }),
        }
    }
}

/// Ordered points sampled from one image, in scan order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    points: Vec<Point>,
}

impl SampleSet {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

impl FromIterator<Point> for SampleSet {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// True for near-white, non-transparent pixels.
pub fn is_bright([r, g, b, a]: [u8; 4]) -> bool {
    r > BRIGHT_CHANNEL_MIN
        && g > BRIGHT_CHANNEL_MIN
        && b > BRIGHT_CHANNEL_MIN
        && a > OPAQUE_ALPHA_MIN
}

/// Mean of the R, G and B channels. Alpha is ignored.
pub fn luminance([r, g, b, _]: [u8; 4]) -> f64 {
    (f64::from(r) + f64::from(g) + f64::from(b)) / 3.0
}

/// Extracts a [`SampleSet`] from an image for a given canvas size.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSampler {
    max_particles: usize,
    mode: SelectionMode,
    edge_threshold: f64,
    canvas_width: f64,
    canvas_height: f64,
}

impl ImageSampler {
    /// Creates a sampler.
    ///
    /// Returns `EngineError::InvalidConfig` for a zero budget or a negative
    /// threshold, and `EngineError::InvalidDimensions` for an empty canvas.
    pub fn new(
        max_particles: usize,
        mode: SelectionMode,
        edge_threshold: f64,
        canvas_width: usize,
        canvas_height: usize,
    ) -> Result<Self, EngineError> {
        if max_particles == 0 {
            return Err(EngineError::invalid_config(
                "max_particles",
                "must be greater than zero",
            ));
        }
        if !edge_threshold.is_finite() || edge_threshold < 0.0 {
            return Err(EngineError::invalid_config(
                "edge_threshold",
                format!("must be finite and >= 0, got {edge_threshold}"),
            ));
        }
        if canvas_width == 0 || canvas_height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        Ok(Self {
            max_particles,
            mode,
            edge_threshold,
            canvas_width: canvas_width as f64,
            canvas_height: canvas_height as f64,
        })
    }

    /// Creates a sampler from the sampling fields of `config`.
    pub fn from_config(
        config: &TransitionConfig,
        canvas_width: usize,
        canvas_height: usize,
    ) -> Result<Self, EngineError> {
        Self::new(
            config.max_particles,
            config.selection_mode,
            config.edge_threshold,
            canvas_width,
            canvas_height,
        )
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Grid stride for brightness mode: `max(1, floor(sqrt(w * h / max_particles)))`.
    pub fn step_size(&self, width: usize, height: usize) -> usize {
        let area = width as f64 * height as f64;
        let step = (area / self.max_particles as f64).sqrt().floor();
        (step as usize).max(1)
    }

    /// Samples `image`, or returns an empty set when there is no image.
    ///
    /// A zero-sized image or a buffer shorter than `w * h * 4` bytes also
    /// yields an empty set.
    pub fn sample(&self, image: Option<&dyn PixelSource>) -> SampleSet {
        let Some(image) = image else {
            return SampleSet::default();
        };
        let (w, h) = (image.width(), image.height());
        if w == 0 || h == 0 {
            return SampleSet::default();
        }
        if rgba_len(w, h).map_or(true, |n| image.pixels().len() < n) {
            warn!(
                width = w,
                height = h,
                bytes = image.pixels().len(),
                "pixel buffer too short for image size, skipping"
            );
            return SampleSet::default();
        }
        match self.mode {
            SelectionMode::Brightness => self.sample_brightness(image),
            SelectionMode::Edge => self.sample_edges(image),
        }
    }

    /// Visits the whole strided grid, column by column.
    fn sample_brightness(&self, image: &dyn PixelSource) -> SampleSet {
        let (w, h) = (image.width(), image.height());
        let step = self.step_size(w, h);
        let mut points = Vec::new();
        for x in (0..w).step_by(step) {
            for y in (0..h).step_by(step) {
                if is_bright(image.rgba(x, y)) {
                    points.push(self.to_canvas(x, y, w, h));
                }
            }
        }
        SampleSet::new(points)
    }

    /// Visits interior pixels at stride 2 until `max_particles` are found.
    fn sample_edges(&self, image: &dyn PixelSource) -> SampleSet {
        let (w, h) = (image.width(), image.height());
        let mut points = Vec::new();
        'scan: for x in (1..w.saturating_sub(1)).step_by(EDGE_STRIDE) {
            for y in (1..h.saturating_sub(1)).step_by(EDGE_STRIDE) {
                let center = luminance(image.rgba(x, y));
                let right = luminance(image.rgba(x + 1, y));
                let bottom = luminance(image.rgba(x, y + 1));
                let strength = (center - right).abs() + (center - bottom).abs();
                if strength > self.edge_threshold {
                    points.push(self.to_canvas(x, y, w, h));
                    if points.len() >= self.max_particles {
                        break 'scan;
                    }
                }
            }
        }
        SampleSet::new(points)
    }

    fn to_canvas(&self, x: usize, y: usize, w: usize, h: usize) -> Point {
        let rel_x = x as f64 / w as f64;
        let rel_y = y as f64 / h as f64;
        Point::new(rel_x * self.canvas_width, rel_y * self.canvas_height)
    }
}
