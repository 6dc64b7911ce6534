//! The `Engine` trait a host drives once per frame.
//!
//! The trait is object-safe so a host can hold a `Box<dyn Engine>` and stay
//! ignorant of how particles were seeded.

use crate::particle::Particle;
use serde_json::Value;

/// A frame-driven particle animation.
///
/// The host owns the loop: it samples its clock, calls [`Engine::tick`], then
/// draws every particle at its current position.
pub trait Engine {
    /// Advances the animation to the timestamp `now_ms`.
    fn tick(&mut self, now_ms: f64);

    /// Particles to draw this frame.
    fn particles(&self) -> &[Particle];

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all parameters, their types and defaults.
    fn param_schema(&self) -> Value;
}
