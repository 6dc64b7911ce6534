//! Easing curves that shape linear progress into eased progress.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Cubic ease-in/ease-out on [0, 1].
///
/// `4t³` below the midpoint, `1 - (-2t + 2)³ / 2` from it. Input is clamped.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Shaping curve applied by the transition controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    Linear,
    #[default]
    InOutCubic,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Ease::Linear => t.clamp(0.0, 1.0),
            Ease::InOutCubic => ease_in_out_cubic(t),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Ease::Linear => "linear",
            Ease::InOutCubic => "in_out_cubic",
        }
    }

    /// Parses a curve name.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "linear" => Ok(Ease::Linear),
            "in_out_cubic" => Ok(Ease::InOutCubic),
            _ => Err(EngineError::UnknownMode {
                kind: "ease".into(),
                name: name.to_string(),
            }),
        }
    }
}
