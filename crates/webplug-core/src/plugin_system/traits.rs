use std::fmt;

use serde_json::Value;

use crate::host::{HostContext, Preferences, WebView};

/// Error type for failures a plugin reports from its own hooks
#[derive(Debug, Clone, PartialEq)]
pub enum PluginError {
    InitError(String),
    ExecutionError(String),
    UnknownAction(String),
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginError::InitError(msg) => write!(f, "Plugin initialization error: {}", msg),
            PluginError::ExecutionError(msg) => write!(f, "Plugin execution error: {}", msg),
            PluginError::UnknownAction(action) => {
                write!(f, "Plugin does not support action '{}'", action)
            }
        }
    }
}

impl std::error::Error for PluginError {}

/// Core trait that all plugins must implement
pub trait Plugin: Send + Sync {
    /// Name of the implementing type.
    ///
    /// Entries built from a live instance record this as their class name.
    /// Plugins registered in a [`PluginFactory`](crate::plugin_system::PluginFactory)
    /// under a stable name should return that same name here.
    fn class_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Standard initialization hook, run once right after construction.
    /// The default implementation does nothing and succeeds.
    fn initialize(
        &mut self,
        _context: &dyn HostContext,
        _webview: &dyn WebView,
        _preferences: &Preferences,
    ) -> Result<(), PluginError> {
        Ok(())
    }

    /// Run an action requested by scripted content
    fn execute(&self, action: &str, _args: &Value) -> Result<Value, PluginError> {
        Err(PluginError::UnknownAction(action.to_string()))
    }
}
