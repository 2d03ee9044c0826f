//! # Configuration Management
//!
//! Centralized configuration for the attribute engine.
//!
//! This module provides structured configuration for the engine's field access
//! strategy, the limits applied by the built-in codecs, and logging.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-specific overrides via `from_env()`
//!
//! ## Security Considerations
//! - Length-prefixed codecs check the declared length against a limit before
//!   allocating, so a forged prefix cannot trigger a huge allocation

use crate::access::StrategyKind;
use crate::error::{Result, WireError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Longest string the 16-bit length prefix can express
pub const DEFAULT_MAX_STRING_BYTES: usize = u16::MAX as usize;

/// Max allowed blob / bincode payload (16 MB)
pub const DEFAULT_MAX_BLOB_BYTES: usize = 16 * 1024 * 1024;

/// Hard ceiling for blob limits (the prefix is 32 bits, but 100 MB is already generous)
pub const MAX_BLOB_LIMIT: usize = 100 * 1024 * 1024;

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct WireConfig {
    /// Engine configuration
    #[serde(default)]
    pub engine: EngineConfig,

    /// Codec limits
    #[serde(default)]
    pub codec: CodecConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WireConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| WireError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| WireError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| WireError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(strategy) = std::env::var("ATTRIBUTE_WIRE_STRATEGY") {
            config.engine.strategy = strategy.parse().map_err(WireError::ConfigError)?;
        }

        if let Ok(limit) = std::env::var("ATTRIBUTE_WIRE_MAX_STRING_BYTES") {
            if let Ok(val) = limit.parse::<usize>() {
                config.codec.max_string_bytes = val;
            }
        }

        if let Ok(limit) = std::env::var("ATTRIBUTE_WIRE_MAX_BLOB_BYTES") {
            if let Ok(val) = limit.parse::<usize>() {
                config.codec.max_blob_bytes = val;
            }
        }

        if let Ok(level) = std::env::var("ATTRIBUTE_WIRE_LOG_LEVEL") {
            if let Ok(val) = level.parse::<Level>() {
                config.logging.log_level = val;
            }
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| WireError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| WireError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.codec.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(WireError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Field access strategy used for every attribute
    #[serde(default)]
    pub strategy: StrategyKind,
}

/// Limits applied by the built-in codecs
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodecConfig {
    /// Maximum encoded string length in bytes
    pub max_string_bytes: usize,

    /// Maximum blob / bincode payload length in bytes
    pub max_blob_bytes: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_string_bytes: DEFAULT_MAX_STRING_BYTES,
            max_blob_bytes: DEFAULT_MAX_BLOB_BYTES,
        }
    }
}

impl CodecConfig {
    /// Validate codec limits
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_string_bytes == 0 {
            errors.push("Max string bytes must be greater than 0".to_string());
        } else if self.max_string_bytes > DEFAULT_MAX_STRING_BYTES {
            errors.push(format!(
                "Max string bytes too large: {} (16-bit prefix allows at most {})",
                self.max_string_bytes, DEFAULT_MAX_STRING_BYTES
            ));
        }

        if self.max_blob_bytes == 0 {
            errors.push("Max blob bytes must be greater than 0".to_string());
        } else if self.max_blob_bytes > MAX_BLOB_LIMIT {
            errors.push(format!(
                "Max blob bytes too large: {} bytes (maximum recommended: 100 MB)",
                self.max_blob_bytes
            ));
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to log to console
    pub log_to_console: bool,

    /// Whether to log to file (takes precedence over console output)
    pub log_to_file: bool,

    /// Path to log file (if log_to_file is true)
    pub log_file_path: Option<String>,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("attribute-wire"),
            log_level: Level::INFO,
            log_to_console: true,
            log_to_file: false,
            log_file_path: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        if self.log_to_file {
            if let Some(ref path) = self.log_file_path {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        errors.push(format!(
                            "Log file directory does not exist: {}",
                            parent.display()
                        ));
                    }
                }
            } else {
                errors.push("log_file_path must be specified when log_to_file is true".to_string());
            }
        }

        if !self.log_to_console && !self.log_to_file {
            errors
                .push("At least one logging output (console or file) must be enabled".to_string());
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_roundtrip() {
        let config = WireConfig::default_with_overrides(|c| {
            c.engine.strategy = StrategyKind::Reflective;
            c.codec.max_string_bytes = 128;
        });
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("strategy = \"reflective\""));

        let parsed = WireConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.engine.strategy, StrategyKind::Reflective);
        assert_eq!(parsed.codec.max_string_bytes, 128);
        assert_eq!(parsed.logging.log_level, Level::INFO);
    }

    #[test]
    fn test_sections_default_when_missing() {
        let parsed = WireConfig::from_toml("[engine]\nstrategy = \"compiled\"\n").unwrap();
        assert_eq!(parsed.codec.max_blob_bytes, DEFAULT_MAX_BLOB_BYTES);
        assert!(parsed.validate().is_empty());
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let err = WireConfig::from_toml("[engine]\nstrategy = \"bytecode\"\n").unwrap_err();
        assert!(matches!(err, WireError::ConfigError(_)));
    }
}
