//! # Webplug Configuration Errors
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error while reading config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown or unsupported config format for path: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to deserialize config from {format}: {message}")]
    Deserialization { format: String, message: String },

    #[error("Failed to serialize config to {format}: {message}")]
    Serialization { format: String, message: String },
}
