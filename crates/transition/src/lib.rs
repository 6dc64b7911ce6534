#![deny(unsafe_code)]
//! Image-to-image particle transition engine.
//!
//! Two reference images are scanned into point sets ([`ImageSampler`]), the
//! sets are paired index by index ([`PositionMatcher`]), one particle is
//! created per pair, and a [`TransitionController`] eases every particle from
//! its start to its target over a fixed duration. [`Morph`] wires the steps
//! together and implements the core `Engine` trait for a host loop.
//!
//! Everything runs on the host's thread: sampling and matching once at
//! setup, then one `tick(now_ms)` per rendered frame.

pub mod config;
pub mod controller;
pub mod fallback;
pub mod matcher;
pub mod morph;
pub mod sampler;

pub use config::TransitionConfig;
pub use controller::{Phase, TransitionController, TransitionState};
pub use matcher::{MatchedPairing, PairingMode, PositionMatcher};
pub use morph::{Diagnostics, Morph};
pub use sampler::{ImageSampler, SampleSet, SelectionMode};
