//! Error types for the morph core.

use thiserror::Error;

/// Errors produced by engine construction and configuration.
///
/// Missing images, empty sample sets and mismatched sample counts are not
/// errors; they are handled as degenerate but valid states.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Width or height was zero, or the RGBA byte count overflowed, for a canvas or image.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A configuration value was outside its valid range.
    #[error("invalid configuration for '{name}': {reason}")]
    InvalidConfig { name: String, reason: String },

    /// A mode name (selection, pairing, easing) was not recognized.
    #[error("unknown {kind} mode: {name}")]
    UnknownMode { kind: String, name: String },

    /// A raw pixel buffer did not have `width * height * 4` bytes.
    #[error("pixel buffer size mismatch: expected {expected} bytes, got {got}")]
    BufferSizeMismatch { expected: usize, got: usize },

    /// Reading or writing an image file failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl EngineError {
    /// Shorthand for [`EngineError::InvalidConfig`].
    pub fn invalid_config(name: &str, reason: impl Into<String>) -> Self {
        EngineError::InvalidConfig {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_displays_readable_message() {
        let err = EngineError::InvalidDimensions;
        let msg = format!("{err}");
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn invalid_config_includes_name_and_reason() {
        let err = EngineError::invalid_config("duration_ms", "must be positive");
        let msg = format!("{err}");
        assert!(msg.contains("duration_ms"), "missing name in: {msg}");
        assert!(msg.contains("must be positive"), "missing reason in: {msg}");
    }

    #[test]
    fn unknown_mode_includes_kind_and_name() {
        let err = EngineError::UnknownMode {
            kind: "pairing".into(),
            name: "hungarian".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("pairing"), "missing kind in: {msg}");
        assert!(msg.contains("hungarian"), "missing name in: {msg}");
    }

    #[test]
    fn buffer_size_mismatch_includes_both_sizes() {
        let err = EngineError::BufferSizeMismatch {
            expected: 400,
            got: 399,
        };
        let msg = format!("{err}");
        assert!(msg.contains("400"), "missing expected in: {msg}");
        assert!(msg.contains("399"), "missing got in: {msg}");
    }

    #[test]
    fn io_includes_message() {
        let err = EngineError::Io("disk full".into());
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn engine_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineError>();
    }

    #[test]
    fn engine_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<EngineError>();
    }
}
