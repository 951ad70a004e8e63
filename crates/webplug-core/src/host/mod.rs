//! # Webplug Host Abstractions
//!
//! The handles a plugin receives from the hosting application when it is
//! initialized. The concrete webview and host live outside this crate; they
//! only need to implement [`WebView`] and [`HostContext`].
//!
//! - **[`preferences`]**: the case-insensitive [`Preferences`] map passed to
//!   every plugin's initialization hook.
use std::path::Path;

pub mod preferences;

pub use preferences::Preferences;

/// A webview that hosts scripted content and exposes the host's preferences.
pub trait WebView: Send + Sync {
    /// Preferences the host was configured with
    fn preferences(&self) -> &Preferences;

    /// URL of the page currently loaded, if any
    fn url(&self) -> Option<String> {
        None
    }
}

/// Process-level context of the hosting application.
pub trait HostContext: Send + Sync {
    /// Identifier of the hosting application
    fn app_id(&self) -> &str;

    /// Directory where plugins may persist data
    fn data_dir(&self) -> Option<&Path> {
        None
    }
}
