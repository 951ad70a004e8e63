use log::{info, warn};
use serde_json::{json, Value};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use webplug_core::host::{HostContext, Preferences, WebView};
use webplug_core::plugin_system::{Plugin, PluginError, PluginFactory, PluginSystemError};

/// Class name hosts declare to use this plugin
pub const CLASS_NAME: &str = "webplug.core.Logging";

/// Preference naming the minimum level to emit
pub const LOG_LEVEL_PREFERENCE: &str = "LogLevel";

/// Installs the process-wide tracing subscriber at startup.
///
/// Meant to be declared `onload` with a low priority so it runs before other
/// plugins log anything. `RUST_LOG`, when set, overrides `LogLevel`.
#[derive(Default)]
pub struct LoggingPlugin {
    level: Option<LevelFilter>,
    installed: bool,
}

impl LoggingPlugin {
    pub fn level(&self) -> Option<LevelFilter> {
        self.level
    }
}

/// Register this plugin in a host factory under [`CLASS_NAME`]
pub fn register(factory: &mut PluginFactory) -> Result<(), PluginSystemError> {
    factory.register::<LoggingPlugin>(CLASS_NAME)
}

/// Parse a `LogLevel` preference value; `verbose` is an alias for `trace`
pub fn parse_level(raw: &str) -> Option<LevelFilter> {
    match raw.trim().to_lowercase().as_str() {
        "verbose" | "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" | "warning" => Some(LevelFilter::WARN),
        "error" => Some(LevelFilter::ERROR),
        "off" | "none" => Some(LevelFilter::OFF),
        _ => None,
    }
}

fn install_subscriber(level: LevelFilter) -> Result<(), String> {
    tracing_log::LogTracer::init().map_err(|e| e.to_string())?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| e.to_string())
}

impl Plugin for LoggingPlugin {
    fn class_name(&self) -> &'static str {
        CLASS_NAME
    }

    fn initialize(
        &mut self,
        _context: &dyn HostContext,
        _webview: &dyn WebView,
        preferences: &Preferences,
    ) -> Result<(), PluginError> {
        let raw = preferences.get_string(LOG_LEVEL_PREFERENCE, "info");
        let level = parse_level(&raw)
            .ok_or_else(|| PluginError::InitError(format!("unknown log level '{}'", raw)))?;
        self.level = Some(level);

        match install_subscriber(level) {
            Ok(()) => {
                self.installed = true;
                info!("Logging initialized at level {}", level);
            }
            // Another component owns the global logger; keep it.
            Err(e) => warn!("Log subscriber already installed, keeping it: {}", e),
        }
        Ok(())
    }

    fn execute(&self, action: &str, _args: &Value) -> Result<Value, PluginError> {
        match action {
            "getLevel" => Ok(json!({
                "level": self.level.map(|l| l.to_string()),
                "installed": self.installed,
            })),
            other => Err(PluginError::UnknownAction(other.to_string())),
        }
    }
}
