//! Procedural sample sets that stand in for a missing reference image.
//!
//! The start image falls back to a loose three-turn spiral around the canvas
//! centre, the end image to a heart curve.

use std::f64::consts::TAU;

use morph_core::{Point, RandomSource};

use crate::sampler::SampleSet;

/// Number of turns the fallback spiral makes.
const SPIRAL_TURNS: f64 = 3.0;
/// Radius range of the fallback spiral, in canvas pixels.
const SPIRAL_RADIUS_MIN: f64 = 50.0;
const SPIRAL_RADIUS_MAX: f64 = 150.0;
/// Pixels per heart-curve unit.
pub const HEART_SCALE: f64 = 3.0;

/// `count` points at evenly spaced angles over three turns, each at a random radius.
pub fn spiral(count: usize, center: Point, rng: &mut dyn RandomSource) -> SampleSet {
    (0..count)
        .map(|i| {
            let angle = i as f64 / count as f64 * TAU * SPIRAL_TURNS;
            let radius = rng.range(SPIRAL_RADIUS_MIN, SPIRAL_RADIUS_MAX);
            center + Point::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// `count` points along the classic heart curve, scaled by `scale`.
///
/// `x = 16 sin³t`, `y = 13 cos t - 5 cos 2t - 2 cos 3t - cos 4t`, with y
/// flipped so the heart points down on a y-down canvas.
pub fn heart(count: usize, center: Point, scale: f64) -> SampleSet {
    (0..count)
        .map(|i| {
            let t = i as f64 / count as f64 * TAU;
            let x = 16.0 * t.sin().powi(3);
            let y = 13.0 * t.cos()
                - 5.0 * (2.0 * t).cos()
                - 2.0 * (3.0 * t).cos()
                - (4.0 * t).cos();
            Point::new(center.x + x * scale, center.y - y * scale)
        })
        .collect()
}
