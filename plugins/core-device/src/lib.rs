//! Device information plugin.
//!
//! Captures a snapshot of the host when initialized and serves it to
//! scripted content through the `getDeviceInfo` action.
use log::debug;
use serde::Serialize;
use serde_json::Value;

use webplug_core::host::{HostContext, Preferences, WebView};
use webplug_core::plugin_system::{Plugin, PluginError, PluginFactory, PluginSystemError};

/// Class name hosts declare to use this plugin
pub const CLASS_NAME: &str = "webplug.core.Device";

/// Snapshot returned by `getDeviceInfo`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceInfo {
    pub platform: String,
    pub arch: String,
    pub model: String,
    pub app_id: String,
    pub data_dir: Option<String>,
}

#[derive(Default)]
pub struct DevicePlugin {
    info: Option<DeviceInfo>,
}

impl DevicePlugin {
    pub fn info(&self) -> Option<&DeviceInfo> {
        self.info.as_ref()
    }
}

/// Register this plugin in a host factory under [`CLASS_NAME`]
pub fn register(factory: &mut PluginFactory) -> Result<(), PluginSystemError> {
    factory.register::<DevicePlugin>(CLASS_NAME)
}

impl Plugin for DevicePlugin {
    fn class_name(&self) -> &'static str {
        CLASS_NAME
    }

    fn initialize(
        &mut self,
        context: &dyn HostContext,
        _webview: &dyn WebView,
        preferences: &Preferences,
    ) -> Result<(), PluginError> {
        let info = DeviceInfo {
            platform: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            model: preferences.get_string("DeviceModel", "generic"),
            app_id: context.app_id().to_string(),
            data_dir: context.data_dir().map(|p| p.display().to_string()),
        };
        debug!("Device plugin initialized for {} on {}", info.app_id, info.platform);
        self.info = Some(info);
        Ok(())
    }

    fn execute(&self, action: &str, _args: &Value) -> Result<Value, PluginError> {
        match action {
            "getDeviceInfo" => {
                let info = self.info.as_ref().ok_or_else(|| {
                    PluginError::ExecutionError("device plugin not initialized".to_string())
                })?;
                serde_json::to_value(info).map_err(|e| PluginError::ExecutionError(e.to_string()))
            }
            other => Err(PluginError::UnknownAction(other.to_string())),
        }
    }
}
