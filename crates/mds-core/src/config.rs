//! MDS Configuration Module
//!
//! Provides configuration file support via `mds.toml`, environment variables,
//! and runtime overrides.
//!
//! # Priority (highest to lowest)
//!
//! 1. Runtime overrides (API)
//! 2. Environment variables (`MDS_*`, nested keys separated by `__`)
//! 3. Configuration file (`mds.toml`)
//! 4. Default values

use std::collections::BTreeMap;
use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compressor::{self, DEFAULT_COMPRESSOR};

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue {
        /// Configuration key that failed validation.
        key: String,
        /// Validation error message.
        message: String,
    },
}

/// Per-column encoding settings.
///
/// Nested columns look up their own settings by name in `custom` and fall
/// back to their parent's settings otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MakerConfig {
    /// Compressor id used for the column payload.
    pub compressor: String,
    /// Overrides for named child columns.
    pub custom: BTreeMap<String, MakerConfig>,
}

impl Default for MakerConfig {
    fn default() -> Self {
        Self {
            compressor: DEFAULT_COMPRESSOR.to_string(),
            custom: BTreeMap::new(),
        }
    }
}

impl MakerConfig {
    /// Settings with a specific compressor and no overrides.
    #[must_use]
    pub fn with_compressor(compressor: impl Into<String>) -> Self {
        Self {
            compressor: compressor.into(),
            custom: BTreeMap::new(),
        }
    }

    /// Settings for the child column `name`.
    #[must_use]
    pub fn for_child(&self, name: &str) -> &MakerConfig {
        self.custom.get(name).unwrap_or(self)
    }

    fn validate(&self, key: &str) -> Result<(), ConfigError> {
        if !compressor::registry().contains(&self.compressor) {
            return Err(ConfigError::InvalidValue {
                key: format!("{key}.compressor"),
                message: format!(
                    "unknown compressor '{}', expected one of: {:?}",
                    self.compressor,
                    compressor::registry().ids()
                ),
            });
        }
        for (name, child) in &self.custom {
            child.validate(&format!("{key}.custom.{name}"))?;
        }
        Ok(())
    }
}

/// Writer configuration section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Encoding settings for top-level columns.
    pub maker: MakerConfig,
}

/// One flatten link: an output column bound to a path into nested columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenColumnConfig {
    /// Name of the flat output column.
    pub link_name: String,
    /// Column names from the top level down to the leaf.
    pub path: Vec<String>,
}

/// Reader configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Largest block body accepted from a stream.
    pub max_block_bytes: usize,
    /// Largest row count a block header may declare.
    pub max_block_rows: usize,
    /// Flatten links applied to every block read.
    pub flatten: Vec<FlattenColumnConfig>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_block_bytes: 256 * 1024 * 1024, // 256 MB
            max_block_rows: 16 * 1024 * 1024,
            flatten: Vec::new(),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace.
    pub level: String,
    /// Log format: text or json.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Main MDS configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MdsConfig {
    /// Writer configuration.
    pub writer: WriterConfig,
    /// Reader configuration.
    pub reader: ReaderConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl MdsConfig {
    /// Loads configuration from default sources.
    ///
    /// Priority: defaults < file < environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("mds.toml")
    }

    /// Loads configuration from a specific file path.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("MDS_").split("__"));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Creates a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml_str));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.writer.maker.validate("writer.maker")?;

        if self.reader.max_block_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "reader.max_block_bytes".to_string(),
                message: "value must be > 0".to_string(),
            });
        }

        if self.reader.max_block_rows == 0 {
            return Err(ConfigError::InvalidValue {
                key: "reader.max_block_rows".to_string(),
                message: "value must be > 0".to_string(),
            });
        }

        for link in &self.reader.flatten {
            if link.path.is_empty() || link.path.iter().any(String::is_empty) {
                return Err(ConfigError::InvalidValue {
                    key: "reader.flatten".to_string(),
                    message: format!("link '{}' has an empty path segment", link.link_name),
                });
            }
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                message: format!(
                    "value '{}' is invalid, expected one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.format".to_string(),
                message: format!(
                    "value '{}' is invalid, expected one of: {:?}",
                    self.logging.format, valid_formats
                ),
            });
        }

        Ok(())
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}
