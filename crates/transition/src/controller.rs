//! Timed playback of a particle transition.
//!
//! The controller is a three-state machine (`Idle -> Running -> Complete`)
//! driven entirely by timestamps the host passes in. Each `tick` while
//! running converts elapsed time into linear progress, shapes it with the
//! configured easing curve and moves every particle. `reset` is valid from
//! any state.

use std::fmt;

use morph_core::error::EngineError;
use morph_core::{Ease, Particle};
use serde::Serialize;
use tracing::debug;

/// Lifecycle state of a transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Playback state owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransitionState {
    pub phase: Phase,
    pub start_timestamp: f64,
    /// Linear fraction of the duration elapsed, in [0, 1].
    pub progress: f64,
    pub duration_ms: f64,
}

impl TransitionState {
    fn new(duration_ms: f64) -> Self {
        Self {
            phase: Phase::Idle,
            start_timestamp: 0.0,
            progress: 0.0,
            duration_ms,
        }
    }
}

/// Owns the particles and moves them from start to target over `duration_ms`.
#[derive(Debug, Clone)]
pub struct TransitionController {
    state: TransitionState,
    ease: Ease,
    particles: Vec<Particle>,
}

impl TransitionController {
    /// Creates an idle controller.
    ///
    /// Returns `EngineError::InvalidConfig` unless `duration_ms` is finite and positive.
    pub fn new(
        duration_ms: f64,
        ease: Ease,
        particles: Vec<Particle>,
    ) -> Result<Self, EngineError> {
        if !duration_ms.is_finite() || duration_ms <= 0.0 {
            return Err(EngineError::invalid_config(
                "duration_ms",
                format!("must be finite and > 0, got {duration_ms}"),
            ));
        }
        Ok(Self {
            state: TransitionState::new(duration_ms),
            ease,
            particles,
        })
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Linear progress in [0, 1].
    pub fn progress(&self) -> f64 {
        self.state.progress
    }

    /// Progress after the easing curve.
    pub fn eased_progress(&self) -> f64 {
        self.ease.apply(self.state.progress)
    }

    pub fn duration_ms(&self) -> f64 {
        self.state.duration_ms
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Arms the transition at `now_ms`. Ignored while already running; from
    /// `Complete` it restarts at zero progress.
    pub fn start(&mut self, now_ms: f64) {
        if self.state.phase == Phase::Running {
            return;
        }
        self.state.phase = Phase::Running;
        self.state.start_timestamp = now_ms;
        self.state.progress = 0.0;
        let particles = self.particles.len();
        debug!(now_ms, particles, "transition started");
    }

    /// Advances a running transition to `now_ms`. A no-op in any other phase.
    pub fn tick(&mut self, now_ms: f64) {
        if self.state.phase != Phase::Running {
            return;
        }
        let elapsed = now_ms - self.state.start_timestamp;
        let raw = elapsed / self.state.duration_ms;
        let progress = if raw.is_nan() {
            0.0
        } else {
            raw.clamp(0.0, 1.0)
        };
        let eased = self.ease.apply(progress);

        for particle in &mut self.particles {
            particle.update(eased);
        }
        self.state.progress = progress;

        if progress >= 1.0 {
            self.state.phase = Phase::Complete;
            debug!(elapsed, "transition complete");
        }
    }

    /// Returns to `Idle` with zero progress and every particle back at its start.
    pub fn reset(&mut self) {
        self.state.phase = Phase::Idle;
        self.state.progress = 0.0;
        for particle in &mut self.particles {
            particle.reset();
        }
    }
}
