//! Setup orchestration: images in, armed transition out.

use std::fmt;

use morph_core::error::EngineError;
use morph_core::{Engine, Particle, PixelSource, Point, RandomSource, Seed, Xorshift64};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::TransitionConfig;
use crate::controller::{Phase, TransitionController};
use crate::fallback::{self, HEART_SCALE};
use crate::matcher::PositionMatcher;
use crate::sampler::{ImageSampler, SampleSet};

/// Status values a host shows as on-screen text.
///
/// `*_image_loaded` distinguishes "nothing matched" (loaded, zero samples)
/// from "never loaded" (fallback shape in use).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pub start_image_loaded: bool,
    pub end_image_loaded: bool,
    pub start_samples: usize,
    pub end_samples: usize,
    pub particles: usize,
    pub phase: Phase,
    pub progress: f64,
    pub eased_progress: f64,
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let yes_no = |b: bool| if b { "yes" } else { "no" };
        let percent = self.progress * 100.0;
        writeln!(f, "progress: {percent:.1}% ({})", self.phase)?;
        writeln!(
            f,
            "images loaded: start={}, end={}",
            yes_no(self.start_image_loaded),
            yes_no(self.end_image_loaded)
        )?;
        writeln!(f, "particles: {}", self.particles)?;
        write!(
            f,
            "start positions: {}, end positions: {}",
            self.start_samples, self.end_samples
        )
    }
}

/// A complete image-to-image morph: sampled, matched and ready to play.
///
/// Particles are created once here. `reset` rewinds them; building a new
/// `Morph` replaces them.
#[derive(Debug, Clone)]
pub struct Morph {
    width: usize,
    height: usize,
    config: TransitionConfig,
    controller: TransitionController,
    start_image_loaded: bool,
    end_image_loaded: bool,
    start_samples: usize,
    end_samples: usize,
}

impl Morph {
    /// Samples both images, pairs the samples and arms an idle controller.
    ///
    /// A missing image is replaced by a procedural shape (a spiral for the
    /// start, a heart for the end). An image that loads but matches nothing
    /// yields zero samples and, in turn, zero particles.
    pub fn new(
        width: usize,
        height: usize,
        seed: u64,
        config: TransitionConfig,
        start_image: Option<&dyn PixelSource>,
        end_image: Option<&dyn PixelSource>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let sampler = ImageSampler::from_config(&config, width, height)?;
        let mut rng = Xorshift64::new(seed);
        let center = Point::new(width as f64 / 2.0, height as f64 / 2.0);

        let count = config.fallback_particles;
        let starts = match start_image {
            Some(_) => sampler.sample(start_image),
            None => {
                warn!(count, "start image missing, using spiral");
                fallback::spiral(count, center, &mut rng)
            }
        };
        let targets = match end_image {
            Some(_) => sampler.sample(end_image),
            None => {
                warn!(count, "end image missing, using heart");
                fallback::heart(count, center, HEART_SCALE)
            }
        };

        let particles = build_particles(&config, &starts, &targets, &mut rng);
        info!(
            start_samples = starts.len(),
            end_samples = targets.len(),
            particles = particles.len(),
            selection = config.selection_mode.name(),
            pairing = config.pairing_mode.name(),
            "morph ready"
        );

        let controller = TransitionController::new(config.duration_ms, config.ease, particles)?;
        Ok(Self {
            width,
            height,
            config,
            controller,
            start_image_loaded: start_image.is_some(),
            end_image_loaded: end_image.is_some(),
            start_samples: starts.len(),
            end_samples: targets.len(),
        })
    }

    /// Builds a morph from a [`Seed`], parsing its params as a [`TransitionConfig`].
    pub fn from_seed(
        seed: &Seed,
        start_image: Option<&dyn PixelSource>,
        end_image: Option<&dyn PixelSource>,
    ) -> Result<Self, EngineError> {
        seed.validate()?;
        let config = TransitionConfig::from_json(&seed.params)?;
        Self::new(
            seed.width,
            seed.height,
            seed.seed,
            config,
            start_image,
            end_image,
        )
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    pub fn controller(&self) -> &TransitionController {
        &self.controller
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn progress(&self) -> f64 {
        self.controller.progress()
    }

    /// See [`TransitionController::start`].
    pub fn start(&mut self, now_ms: f64) {
        self.controller.start(now_ms);
    }

    /// See [`TransitionController::reset`].
    pub fn reset(&mut self) {
        self.controller.reset();
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            start_image_loaded: self.start_image_loaded,
            end_image_loaded: self.end_image_loaded,
            start_samples: self.start_samples,
            end_samples: self.end_samples,
            particles: self.controller.particles().len(),
            phase: self.controller.phase(),
            progress: self.controller.progress(),
            eased_progress: self.controller.eased_progress(),
        }
    }
}

impl Engine for Morph {
    fn tick(&mut self, now_ms: f64) {
        self.controller.tick(now_ms);
    }

    fn particles(&self) -> &[Particle] {
        self.controller.particles()
    }

    fn params(&self) -> Value {
        self.config.to_json()
    }

    fn param_schema(&self) -> Value {
        TransitionConfig::schema()
    }
}

fn build_particles(
    config: &TransitionConfig,
    starts: &SampleSet,
    targets: &SampleSet,
    rng: &mut dyn RandomSource,
) -> Vec<Particle> {
    PositionMatcher::new(config.pairing_mode)
        .pair(starts, targets)
        .pairs()
        .map(|(start, target)| {
            let size = rng.range(config.particle_size_min, config.particle_size_max);
            Particle::new(start, target, size)
        })
        .collect()
}
