use webplug_core::host::{HostContext, Preferences, WebView};

/// Preference overriding the application id reported to plugins
pub const APP_ID_PREFERENCE: &str = "AppId";

const DEFAULT_APP_ID: &str = "webplug.cli";

/// Headless host used by the command-line interface.
///
/// Stands in for both the webview and the application context: it carries
/// the preferences from the host file and has no page loaded.
#[derive(Debug)]
pub struct CliHost {
    preferences: Preferences,
    app_id: String,
}

impl CliHost {
    pub fn new(preferences: Preferences) -> Self {
        let app_id = preferences.get_string(APP_ID_PREFERENCE, DEFAULT_APP_ID);
        Self { preferences, app_id }
    }
}

impl WebView for CliHost {
    fn preferences(&self) -> &Preferences {
        &self.preferences
    }
}

impl HostContext for CliHost {
    fn app_id(&self) -> &str {
        &self.app_id
    }
}
