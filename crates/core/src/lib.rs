#![deny(unsafe_code)]
//! Core types and traits for the particle morphing system.
//!
//! Provides the `Engine` trait, the `Particle` record and `Point` alias,
//! cubic easing, the `PixelSource` image abstraction (`RgbaBuffer`), the
//! `Clock` abstraction (`SystemClock`, `ManualClock`), the `Xorshift64` PRNG
//! behind `RandomSource`, `Seed`, and parameter helpers.

pub mod clock;
pub mod ease;
pub mod engine;
pub mod error;
pub mod params;
pub mod particle;
pub mod pixels;
pub mod point;
pub mod prng;
pub mod seed;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ease::{ease_in_out_cubic, Ease};
pub use engine::Engine;
pub use error::EngineError;
pub use particle::Particle;
pub use pixels::{rgba_len, PixelSource, RgbaBuffer};
pub use point::{lerp, Point};
pub use prng::{RandomSource, Xorshift64};
pub use seed::Seed;
