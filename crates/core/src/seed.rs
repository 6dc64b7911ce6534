//! Reproducible description of a morph run.
//!
//! A [`Seed`] captures the canvas size, parameter overrides, PRNG seed and
//! the two reference image paths. Feeding the same seed and the same image
//! files to the same binary reproduces the same particles.

use std::path::PathBuf;

use crate::error::EngineError;
use crate::pixels::rgba_len;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub width: usize,
    pub height: usize,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
    pub seed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_image: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_image: Option<PathBuf>,
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Seed {
    /// Creates a seed with empty params and no reference images.
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        Self {
            width,
            height,
            params: empty_params(),
            seed,
            start_image: None,
            end_image: None,
        }
    }

    /// Sets both reference image paths.
    pub fn with_images(mut self, start: Option<PathBuf>, end: Option<PathBuf>) -> Self {
        self.start_image = start;
        self.end_image = end;
        self
    }

    /// Validates that the canvas has non-zero dimensions and that its
    /// RGBA8 byte count `width * height * 4` does not overflow.
    pub fn validate(&self) -> Result<(), EngineError> {
        rgba_len(self.width, self.height)?;
        if !self.params.is_object() {
            return Err(EngineError::invalid_config("params", "must be a JSON object"));
        }
        Ok(())
    }
}
