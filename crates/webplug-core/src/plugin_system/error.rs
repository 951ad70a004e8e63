//! # Webplug Plugin System Errors
//!
//! [`PluginSystemError`] covers everything that can go wrong while turning a
//! registered class name into a live plugin: the name resolves to nothing,
//! it resolves to a type that is not a plugin, or building the instance
//! fails. [`PluginEntry::create_or_get_plugin`] logs these instead of
//! returning them.
//!
//! [`PluginEntry::create_or_get_plugin`]: crate::plugin_system::PluginEntry::create_or_get_plugin
use crate::plugin_system::traits::PluginError;

#[derive(Debug, thiserror::Error)]
pub enum PluginSystemError {
    #[error("Plugin entry for service '{service}' has no class name")]
    EmptyClassName { service: String },

    #[error("Plugin class '{class_name}' not found")]
    TypeNotFound { class_name: String },

    #[error("Class '{class_name}' (type '{type_name}') does not implement the plugin capability")]
    CapabilityMismatch {
        class_name: String,
        type_name: String,
    },

    #[error("Failed to construct plugin '{class_name}': {source}")]
    ConstructionFailed {
        class_name: String,
        #[source]
        source: PluginError,
    },

    #[error("Failed to initialize plugin '{class_name}': {source}")]
    InitializationFailed {
        class_name: String,
        #[source]
        source: PluginError,
    },

    #[error("Plugin class '{class_name}' is already registered")]
    DuplicateClass { class_name: String },
}

impl PluginSystemError {
    /// Class name the error refers to, if any
    pub fn class_name(&self) -> Option<&str> {
        match self {
            PluginSystemError::EmptyClassName { .. } => None,
            PluginSystemError::TypeNotFound { class_name }
            | PluginSystemError::CapabilityMismatch { class_name, .. }
            | PluginSystemError::ConstructionFailed { class_name, .. }
            | PluginSystemError::InitializationFailed { class_name, .. }
            | PluginSystemError::DuplicateClass { class_name } => Some(class_name),
        }
    }
}
