//! A single morphing particle.
//!
//! A [`Particle`] is a plain record: fixed start and target positions, a
//! mutable current position, and display attributes. The transition
//! controller writes `current` through [`Particle::update`] and
//! [`Particle::reset`]; nothing else mutates it.

use serde::{Deserialize, Serialize};

use crate::point::{lerp, Point};

/// Opacity every particle is drawn with.
pub const DEFAULT_OPACITY: f64 = 1.0;

/// One point travelling from `start` to `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    start: Point,
    target: Point,
    current: Point,
    size: f64,
    opacity: f64,
}

impl Particle {
    /// Creates a particle resting at `start`.
    pub fn new(start: Point, target: Point, size: f64) -> Self {
        Self {
            start,
            target,
            current: start,
            size,
            opacity: DEFAULT_OPACITY,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn target(&self) -> Point {
        self.target
    }

    /// Position to draw this frame.
    pub fn current(&self) -> Point {
        self.current
    }

    /// Side length of the drawn square, in canvas pixels.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Opacity in [0, 1].
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Moves `current` to the interpolated position for `progress` in [0, 1].
    ///
    /// The endpoints are written directly so `update(0.0)` lands exactly on
    /// `start` and `update(1.0)` exactly on `target`. A NaN progress counts
    /// as zero.
    pub fn update(&mut self, progress: f64) {
        let t = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        self.current = if t <= 0.0 {
            self.start
        } else if t >= 1.0 {
            self.target
        } else {
            Point::new(
                lerp(self.start.x, self.target.x, t),
                lerp(self.start.y, self.target.y, t),
            )
        };
    }

    /// Puts the particle back at `start`.
    pub fn reset(&mut self) {
        self.current = self.start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle() -> Particle {
        Particle::new(Point::new(10.0, 20.0), Point::new(110.0, 220.0), 8.0)
    }

    #[test]
    fn new_particle_rests_at_start() {
        let p = particle();
        assert_eq!(p.current(), p.start());
        assert_eq!(p.size(), 8.0);
        assert_eq!(p.opacity(), DEFAULT_OPACITY);
    }

    #[test]
    fn update_half_is_midpoint() {
        let mut p = particle();
        p.update(0.5);
        assert!((p.current().x - 60.0).abs() < 1e-12);
        assert!((p.current().y - 120.0).abs() < 1e-12);
    }

    #[test]
    fn update_one_then_zero_restores_start() {
        let mut p = particle();
        p.update(1.0);
        assert_eq!(p.current(), p.target());
        p.update(0.0);
        assert_eq!(p.current(), p.start());
    }

    #[test]
    fn update_clamps_out_of_range_progress() {
        let mut p = particle();
        p.update(1.5);
        assert_eq!(p.current(), p.target());
        p.update(-0.5);
        assert_eq!(p.current(), p.start());
    }

    #[test]
    fn update_nan_rests_at_start() {
        let mut p = particle();
        p.update(0.6);
        p.update(f64::NAN);
        assert_eq!(p.current(), p.start());
        assert!(p.current().is_finite());
    }

    #[test]
    fn reset_returns_to_start() {
        let mut p = particle();
        p.update(0.7);
        p.reset();
        assert_eq!(p.current(), p.start());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn coord() -> impl Strategy<Value = f64> {
            -1e4_f64..1e4
        }

        proptest! {
            #[test]
            fn endpoints_are_exact(
                sx in coord(), sy in coord(), tx in coord(), ty in coord(),
                mid in 0.0_f64..=1.0,
            ) {
                let mut p = Particle::new(Point::new(sx, sy), Point::new(tx, ty), 7.0);
                p.update(mid);
                p.update(1.0);
                prop_assert_eq!(p.current(), p.target());
                p.update(mid);
                p.update(0.0);
                prop_assert_eq!(p.current(), p.start());
            }

            #[test]
            fn interior_stays_inside_bounding_box(
                sx in coord(), sy in coord(), tx in coord(), ty in coord(),
                t in 0.0_f64..=1.0,
            ) {
                let mut p = Particle::new(Point::new(sx, sy), Point::new(tx, ty), 7.0);
                p.update(t);
                let c = p.current();
                let eps = 1e-9;
                prop_assert!(c.x >= sx.min(tx) - eps && c.x <= sx.max(tx) + eps);
                prop_assert!(c.y >= sy.min(ty) - eps && c.y <= sy.max(ty) + eps);
            }
        }
    }
}
