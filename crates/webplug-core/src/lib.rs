pub mod config;
pub mod error;
pub mod host;
pub mod plugin_system;

// Re-export key public types/traits for the binary and plugin crates
pub use config::{ConfigFormat, HostConfig, PluginEntryConfig};
pub use error::{Error, Result};
pub use host::{HostContext, Preferences, WebView};
pub use plugin_system::{
    Plugin, PluginEntry, PluginError, PluginFactory, PluginRegistry, PluginSystemError,
    ResolvedType, TypeResolver,
};
