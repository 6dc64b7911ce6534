//! Helpers for reading typed values out of a JSON params object.
//!
//! A missing key (or an explicit `null`) yields the default. A key that is
//! present with the wrong JSON type is an `EngineError::InvalidConfig`, so a
//! typo in a params file never silently turns into a default. Range checks
//! happen afterwards, in the config's own `validate`.

use serde_json::Value;

use crate::error::EngineError;

/// Returns the value under `name`, or `None` when absent or `null`.
fn present<'a>(params: &'a Value, name: &str) -> Option<&'a Value> {
    params.get(name).filter(|v| !v.is_null())
}

fn type_error(name: &str, expected: &str, got: &Value) -> EngineError {
    EngineError::invalid_config(name, format!("expected {expected}, got {got}"))
}

/// Reads an `f64`, accepting integers too.
pub fn param_f64(params: &Value, name: &str, default: f64) -> Result<f64, EngineError> {
    match present(params, name) {
        None => Ok(default),
        Some(v) => v.as_f64().ok_or_else(|| type_error(name, "a number", v)),
    }
}

/// Reads a non-negative integer that fits in `usize`.
///
/// Floats (even integral ones such as `1000.0`), negative numbers and values
/// beyond `usize::MAX` are rejected.
pub fn param_usize(params: &Value, name: &str, default: usize) -> Result<usize, EngineError> {
    let Some(v) = present(params, name) else {
        return Ok(default);
    };
    if let Some(n) = v.as_u64() {
        return usize::try_from(n)
            .map_err(|_| EngineError::invalid_config(name, format!("{n} is out of range")));
    }
    if v.as_i64().is_some() {
        return Err(EngineError::invalid_config(name, format!("must not be negative, got {v}")));
    }
    Err(type_error(name, "a non-negative integer", v))
}

/// Reads a string.
pub fn param_string(params: &Value, name: &str, default: &str) -> Result<String, EngineError> {
    match present(params, name) {
        None => Ok(default.to_owned()),
        Some(v) => v
            .as_str()
            .map(String::from)
            .ok_or_else(|| type_error(name, "a string", v)),
    }
}
