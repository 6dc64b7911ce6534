#![deny(unsafe_code)]
//! Host-side rendering helpers for the morph engine.
//!
//! The engine itself only produces particle positions. This crate draws
//! them into an RGBA8 buffer, optionally with reference-image thumbnails
//! ([`pixel`]). Behind the default `png` feature it also reads reference
//! images and writes frames ([`snapshot`]).

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

pub use pixel::{draw_previews, particles_to_rgba, Previews, DEFAULT_BACKGROUND};
