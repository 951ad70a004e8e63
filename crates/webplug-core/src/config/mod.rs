//! # Webplug Host Configuration
//!
//! A host declares its preferences and the plugins it offers in one file.
//! Each `[[plugins]]` record becomes a [`PluginEntry`](crate::plugin_system::PluginEntry);
//! the `[preferences]` table becomes the [`Preferences`] every plugin is
//! initialized with.
//!
//! JSON is always supported. YAML and TOML need the `yaml-config` and
//! `toml-config` features, both on by default.
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
#[cfg(feature = "yaml-config")]
use serde_yaml;
#[cfg(feature = "toml-config")]
use toml;

use crate::host::Preferences;

pub mod error;

pub use error::ConfigError;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// One plugin declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginEntryConfig {
    /// Service name scripted content uses to reach the plugin
    #[serde(default)]
    pub service: String,

    /// Class name looked up in the host's plugin factory
    #[serde(default, alias = "plugin_class")]
    pub class: String,

    /// Build the plugin when the host starts instead of on first use
    #[serde(default)]
    pub onload: bool,

    /// Lower values take precedence
    #[serde(default)]
    pub priority: f32,

    /// URL prefixes the plugin is restricted to; absent means all URLs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_filters: Option<Vec<String>>,
}

/// Everything a host file declares
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub preferences: Preferences,

    #[serde(default)]
    pub plugins: Vec<PluginEntryConfig>,
}

impl HostConfig {
    /// Load a config file, picking the format from its extension
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::deserialize(&data, format)?;
        log::debug!(
            "Loaded {} plugin declaration(s) from {}",
            config.plugins.len(),
            path.display()
        );
        Ok(config)
    }

    /// Deserialize from string based on format
    pub fn deserialize(data: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let failed = |message: String| ConfigError::Deserialization {
            format: format.extension().to_string(),
            message,
        };
        match format {
            ConfigFormat::Json => serde_json::from_str(data).map_err(|e| failed(e.to_string())),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|e| failed(e.to_string())),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| failed(e.to_string())),
        }
    }

    /// Serialize to string based on format
    pub fn serialize(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        let failed = |message: String| ConfigError::Serialization {
            format: format.extension().to_string(),
            message,
        };
        match format {
            ConfigFormat::Json => {
                serde_json::to_string_pretty(self).map_err(|e| failed(e.to_string()))
            }
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(self).map_err(|e| failed(e.to_string())),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| failed(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests;
