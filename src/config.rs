//! Application configuration.
//!
//! Every field has a default, so an empty TOML file (or no file at all)
//! yields the stock behaviour.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::document::Footer;
use crate::error::ConfigError;
use crate::qr::{CodeStyle, MAX_OVERLAY_RATIO};
use crate::record::Escaping;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub code: CodeStyle,
    pub record: RecordConfig,
    pub footer: Footer,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "botiscan=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordConfig {
    pub escaping: Escaping,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ratio = self.code.overlay_ratio;
        if !(ratio > 0.0 && ratio <= MAX_OVERLAY_RATIO) {
            return Err(ConfigError::invalid(format!(
                "code.overlay_ratio must be in (0, {MAX_OVERLAY_RATIO}], got {ratio}"
            )));
        }
        if self.code.raster_width == 0 || self.code.preview_size == 0 {
            return Err(ConfigError::invalid(
                "code.raster_width and code.preview_size must be positive",
            ));
        }
        Ok(())
    }
}
