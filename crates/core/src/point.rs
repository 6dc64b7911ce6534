//! Canvas-space points.

/// An immutable 2D coordinate in canvas space.
pub type Point = glam::DVec2;

/// Linear interpolation `a + (b - a) * t`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
