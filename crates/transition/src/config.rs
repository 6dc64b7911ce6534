//! Transition configuration parsed from a JSON params object.

use morph_core::error::EngineError;
use morph_core::params::{param_f64, param_string, param_usize};
use morph_core::Ease;
use serde::Serialize;
use serde_json::{json, Value};

use crate::matcher::PairingMode;
use crate::sampler::SelectionMode;

/// Default particle budget requested from each image.
pub const DEFAULT_MAX_PARTICLES: usize = 2000;
/// Upper bound on `max_particles` and `fallback_particles`.
pub const PARTICLE_LIMIT: usize = 1_000_000;
/// Default luminance-gradient threshold for edge sampling.
pub const DEFAULT_EDGE_THRESHOLD: f64 = 50.0;
/// Default transition length in milliseconds.
pub const DEFAULT_DURATION_MS: f64 = 3000.0;
/// Points generated for each procedural fallback shape.
pub const DEFAULT_FALLBACK_PARTICLES: usize = 200;
/// Lower bound of the random particle size.
pub const DEFAULT_PARTICLE_SIZE_MIN: f64 = 7.0;
/// Upper bound (exclusive) of the random particle size.
pub const DEFAULT_PARTICLE_SIZE_MAX: f64 = 10.0;

/// Every tunable value of a morph, validated on construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionConfig {
    pub max_particles: usize,
    pub selection_mode: SelectionMode,
    pub edge_threshold: f64,
    pub pairing_mode: PairingMode,
    pub duration_ms: f64,
    pub ease: Ease,
    pub fallback_particles: usize,
    pub particle_size_min: f64,
    pub particle_size_max: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            max_particles: DEFAULT_MAX_PARTICLES,
            selection_mode: SelectionMode::default(),
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            pairing_mode: PairingMode::default(),
            duration_ms: DEFAULT_DURATION_MS,
            ease: Ease::default(),
            fallback_particles: DEFAULT_FALLBACK_PARTICLES,
            particle_size_min: DEFAULT_PARTICLE_SIZE_MIN,
            particle_size_max: DEFAULT_PARTICLE_SIZE_MAX,
        }
    }
}

impl TransitionConfig {
    /// Reads a config from JSON, falling back to defaults for missing keys,
    /// then validates it.
    ///
    /// Values of the wrong JSON type, unknown mode names and out-of-range
    /// values are rejected.
    pub fn from_json(params: &Value) -> Result<Self, EngineError> {
        let d = Self::default();
        let selection = param_string(params, "selection_mode", d.selection_mode.name())?;
        let pairing = param_string(params, "pairing_mode", d.pairing_mode.name())?;
        let ease = param_string(params, "ease", d.ease.name())?;
        let config = Self {
            max_particles: param_usize(params, "max_particles", d.max_particles)?,
            selection_mode: SelectionMode::from_name(&selection)?,
            edge_threshold: param_f64(params, "edge_threshold", d.edge_threshold)?,
            pairing_mode: PairingMode::from_name(&pairing)?,
            duration_ms: param_f64(params, "duration_ms", d.duration_ms)?,
            ease: Ease::from_name(&ease)?,
            fallback_particles: param_usize(params, "fallback_particles", d.fallback_particles)?,
            particle_size_min: param_f64(params, "particle_size_min", d.particle_size_min)?,
            particle_size_max: param_f64(params, "particle_size_max", d.particle_size_max)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks every value is in range.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_particles == 0 {
            return Err(EngineError::invalid_config(
                "max_particles",
                "must be greater than zero",
            ));
        }
        for (name, value) in [
            ("max_particles", self.max_particles),
            ("fallback_particles", self.fallback_particles),
        ] {
            if value > PARTICLE_LIMIT {
                return Err(EngineError::invalid_config(
                    name,
                    format!("must be at most {PARTICLE_LIMIT}, got {value}"),
                ));
            }
        }
        if !self.edge_threshold.is_finite() || self.edge_threshold < 0.0 {
            return Err(EngineError::invalid_config(
                "edge_threshold",
                format!("must be finite and >= 0, got {}", self.edge_threshold),
            ));
        }
        if !self.duration_ms.is_finite() || self.duration_ms <= 0.0 {
            return Err(EngineError::invalid_config(
                "duration_ms",
                format!("must be finite and > 0, got {}", self.duration_ms),
            ));
        }
        let (lo, hi) = (self.particle_size_min, self.particle_size_max);
        if !lo.is_finite() || !hi.is_finite() || lo <= 0.0 || lo > hi {
            return Err(EngineError::invalid_config(
                "particle_size_min",
                format!("size range must satisfy 0 < min <= max, got [{lo}, {hi})"),
            ));
        }
        Ok(())
    }

    /// Current values as a JSON object.
    pub fn to_json(&self) -> Value {
        json!({
            "max_particles": self.max_particles,
            "selection_mode": self.selection_mode.name(),
            "edge_threshold": self.edge_threshold,
            "pairing_mode": self.pairing_mode.name(),
            "duration_ms": self.duration_ms,
            "ease": self.ease.name(),
            "fallback_particles": self.fallback_particles,
            "particle_size_min": self.particle_size_min,
            "particle_size_max": self.particle_size_max,
        })
    }

    /// Types, defaults and descriptions for every recognized key.
    pub fn schema() -> Value {
        json!({
            "max_particles": {
                "type": "integer",
                "min": 1,
                "max": PARTICLE_LIMIT,
                "default": DEFAULT_MAX_PARTICLES,
                "description": "Particle budget requested from each reference image"
            },
            "selection_mode": {
                "type": "string",
                "options": SelectionMode::names(),
                "default": SelectionMode::default().name(),
                "description": "Pixel predicate used to sample reference images"
            },
            "edge_threshold": {
                "type": "number",
                "min": 0.0,
                "default": DEFAULT_EDGE_THRESHOLD,
                "description": "Minimum luminance gradient for edge sampling"
            },
            "pairing_mode": {
                "type": "string",
                "options": PairingMode::names(),
                "default": PairingMode::default().name(),
                "description": "How start points are paired with target points"
            },
            "duration_ms": {
                "type": "number",
                "min": 0.0,
                "exclusive_min": true,
                "default": DEFAULT_DURATION_MS,
                "description": "Transition length in milliseconds"
            },
            "ease": {
                "type": "string",
                "options": ["linear", "in_out_cubic"],
                "default": Ease::default().name(),
                "description": "Curve applied to linear progress"
            },
            "fallback_particles": {
                "type": "integer",
                "min": 0,
                "max": PARTICLE_LIMIT,
                "default": DEFAULT_FALLBACK_PARTICLES,
                "description": "Points in the procedural shape that replaces a missing image"
            },
            "particle_size_min": {
                "type": "number",
                "default": DEFAULT_PARTICLE_SIZE_MIN,
                "description": "Smallest particle side length in pixels"
            },
            "particle_size_max": {
                "type": "number",
                "default": DEFAULT_PARTICLE_SIZE_MAX,
                "description": "Exclusive upper bound of particle side length"
            }
        })
    }
}
