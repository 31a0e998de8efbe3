//! Editor configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use crate::consts::{
    DEFAULT_API_BASE_URL, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_CONNECT_TIMEOUT_SECS,
    DEFAULT_HISTORY_CAP, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SHAPE_SIZE, MAX_SHAPE_SIZE, MIN_SHAPE_SIZE,
};
use crate::error::ErrorCode;

/// Errors produced while building configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment value could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    Parse { key: &'static str, value: String },

    /// Values parsed but do not describe a usable editor.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "E_CONFIG_PARSE",
            Self::Invalid(_) => "E_CONFIG_INVALID",
        }
    }
}

/// Canvas geometry, size limits and history depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSettings {
    pub width: f64,
    pub height: f64,
    pub min_size: f64,
    pub max_size: f64,
    pub default_size: f64,
    pub history_cap: usize,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            min_size: MIN_SHAPE_SIZE,
            max_size: MAX_SHAPE_SIZE,
            default_size: DEFAULT_SHAPE_SIZE,
            history_cap: DEFAULT_HISTORY_CAP,
        }
    }
}

impl CanvasSettings {
    /// Check that a shape of any allowed size and rotation fits the canvas.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::Invalid(format!("canvas must be positive, got {}x{}", self.width, self.height)));
        }
        if !(self.min_size > 0.0 && self.min_size <= self.default_size && self.default_size <= self.max_size) {
            return Err(ConfigError::Invalid(format!(
                "sizes must satisfy 0 < min <= default <= max, got {} / {} / {}",
                self.min_size, self.default_size, self.max_size
            )));
        }
        if self.max_size * std::f64::consts::SQRT_2 > self.width.min(self.height) {
            return Err(ConfigError::Invalid(format!(
                "max size {} cannot rotate freely inside a {}x{} canvas",
                self.max_size, self.width, self.height
            )));
        }
        if self.history_cap < 2 {
            return Err(ConfigError::Invalid(format!("history cap must be at least 2, got {}", self.history_cap)));
        }
        Ok(())
    }
}

/// HTTP timeouts for the task backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

/// Where and how to reach the task backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    pub base_url: String,
    pub timeouts: Timeouts,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_owned(),
            timeouts: Timeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorConfig {
    pub canvas: CanvasSettings,
    pub gateway: GatewaySettings,
}

impl EditorConfig {
    /// Build typed config from environment variables.
    ///
    /// All optional:
    /// - `SHAPE_CANVAS_WIDTH`, `SHAPE_CANVAS_HEIGHT`: default 600
    /// - `SHAPE_MIN_SIZE`, `SHAPE_MAX_SIZE`, `SHAPE_DEFAULT_SIZE`: default 20 / 140 / 60
    /// - `SHAPE_HISTORY_CAP`: default 20
    /// - `SHAPE_API_BASE_URL`: default `http://127.0.0.1:5000`
    /// - `SHAPE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `SHAPE_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if a value does not parse or the result is unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Build typed config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`EditorConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let canvas = CanvasSettings {
            width: parse_or(&lookup, "SHAPE_CANVAS_WIDTH", DEFAULT_CANVAS_WIDTH)?,
            height: parse_or(&lookup, "SHAPE_CANVAS_HEIGHT", DEFAULT_CANVAS_HEIGHT)?,
            min_size: parse_or(&lookup, "SHAPE_MIN_SIZE", MIN_SHAPE_SIZE)?,
            max_size: parse_or(&lookup, "SHAPE_MAX_SIZE", MAX_SHAPE_SIZE)?,
            default_size: parse_or(&lookup, "SHAPE_DEFAULT_SIZE", DEFAULT_SHAPE_SIZE)?,
            history_cap: parse_or(&lookup, "SHAPE_HISTORY_CAP", DEFAULT_HISTORY_CAP)?,
        };
        canvas.validate()?;

        let base_url = lookup("SHAPE_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let timeouts = Timeouts {
            request_secs: parse_or(&lookup, "SHAPE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_or(&lookup, "SHAPE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self { canvas, gateway: GatewaySettings { base_url, timeouts } })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Parse { key, value: raw }),
        None => Ok(default),
    }
}
