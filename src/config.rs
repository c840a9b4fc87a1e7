//! Draw loop configuration and forgiving config parsing.
//!
//! Nothing here ever fails. Missing or malformed values, whether they come
//! from the environment or from a plugin's JSON config, quietly fall back to
//! their defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::consts::DEFAULT_FRAME_INTERVAL_MS;

/// Draw loop tuning, loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Time between frames.
    pub frame_interval: Duration,
    /// Keep drawing the remaining hooks when one fails, instead of abandoning the frame.
    pub isolate_hooks: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self { frame_interval: Duration::from_millis(DEFAULT_FRAME_INTERVAL_MS), isolate_hooks: false }
    }
}

impl LoopConfig {
    /// Read `PLANET_FRAME_INTERVAL_MS` and `PLANET_ISOLATE_DRAW_HOOKS`.
    #[must_use]
    pub fn from_env() -> Self {
        let interval_ms = env_parse("PLANET_FRAME_INTERVAL_MS", DEFAULT_FRAME_INTERVAL_MS).max(1);
        Self {
            frame_interval: Duration::from_millis(interval_ms),
            isolate_hooks: env_parse("PLANET_ISOLATE_DRAW_HOOKS", false),
        }
    }
}

/// Parse an environment variable, or return `default` when it is unset or malformed.
pub fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Serde field adapter: a value of the wrong shape becomes `T::default()`
/// instead of failing the whole config.
///
/// # Errors
///
/// Only fails if the input is not well-formed JSON-like data at all.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Deserialize a plugin config from JSON, falling back to defaults for anything unusable.
#[must_use]
pub fn from_json<T>(value: &serde_json::Value) -> T
where
    T: DeserializeOwned + Default,
{
    match value {
        serde_json::Value::Null => T::default(),
        other => serde_json::from_value(other.clone()).unwrap_or_default(),
    }
}
