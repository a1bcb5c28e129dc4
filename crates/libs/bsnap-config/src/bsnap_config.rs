//! Core configuration types.

use crate::prelude::*;
use std::path::Path;

use bsnap::{DateFormatter, formatter::DEFAULT_DATE_FORMAT};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Global configuration settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BsnapGlobalConfig {
    /// Configuration version.
    pub version: String,
}

/// Timestamp rendering settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BsnapFormatterConfig {
    /// `strftime` pattern used for every timestamp in a snapshot or payload.
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

/// Identity stamped on log payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BsnapPayloadConfig {
    /// Kind of system emitting payloads.
    #[serde(default = "default_source")]
    pub source: String,
    /// Base URL of the emitting system.
    #[serde(default)]
    pub source_host: String,
}

/// User-provided configuration from TOML files. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BsnapUserConfig {
    /// Global settings.
    #[serde(default)]
    pub global: BsnapGlobalConfig,
    /// Timestamp settings.
    #[serde(default)]
    pub formatter: BsnapFormatterConfig,
    /// Payload settings.
    #[serde(default)]
    pub payload: BsnapPayloadConfig,
}

fn default_date_format() -> String {
    String::from(DEFAULT_DATE_FORMAT)
}

fn default_source() -> String {
    String::from("ci")
}

impl Default for BsnapGlobalConfig {
    fn default() -> Self {
        Self {
            version: String::from("1.0.0"),
        }
    }
}

impl Default for BsnapFormatterConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
        }
    }
}

impl Default for BsnapPayloadConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            source_host: String::new(),
        }
    }
}

impl BsnapUserConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(file_path: &Path) -> Result<Self> {
        info!("Loading configuration from {}", file_path.display());
        let contents = std::fs::read_to_string(file_path)?;
        Self::from_toml(&contents)
    }
    /// Parse configuration from TOML string.
    pub fn from_toml(value: &str) -> Result<Self> {
        Ok(toml::from_str(value)?)
    }
    /// Render configuration as TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
    /// Build the formatter selected by this configuration.
    pub fn date_formatter(&self) -> Result<DateFormatter> {
        Ok(DateFormatter::new(self.formatter.date_format.clone())?)
    }
}
