#![cfg(test)]
// Shared host doubles and plugins for plugin system tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use crate::host::{HostContext, Preferences, WebView};
use crate::plugin_system::factory::{PluginFactory, ResolvedType, TypeResolver};
use crate::plugin_system::traits::{Plugin, PluginError};

pub struct TestWebView {
    pub preferences: Preferences,
}

impl TestWebView {
    pub fn new() -> Self {
        let mut preferences = Preferences::new();
        preferences.set("CameraQuality", "80");
        Self { preferences }
    }
}

impl WebView for TestWebView {
    fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    fn url(&self) -> Option<String> {
        Some("https://app.example.com/index.html".to_string())
    }
}

pub struct TestContext;

impl HostContext for TestContext {
    fn app_id(&self) -> &str {
        "com.example.test"
    }
}

/// Counts how often a plugin type is constructed and initialized
#[derive(Clone, Default)]
pub struct Counters {
    pub constructed: Arc<AtomicUsize>,
    pub initialized: Arc<AtomicUsize>,
}

impl Counters {
    pub fn constructed(&self) -> usize {
        self.constructed.load(Ordering::SeqCst)
    }

    pub fn initialized(&self) -> usize {
        self.initialized.load(Ordering::SeqCst)
    }
}

/// Plugin that records its lifecycle and what it was initialized with
pub struct CountingPlugin {
    counters: Counters,
    fail_init: bool,
    seen_app_id: Mutex<Option<String>>,
    seen_quality: Mutex<Option<i64>>,
}

impl CountingPlugin {
    pub fn new(counters: Counters, fail_init: bool) -> Self {
        counters.constructed.fetch_add(1, Ordering::SeqCst);
        Self {
            counters,
            fail_init,
            seen_app_id: Mutex::new(None),
            seen_quality: Mutex::new(None),
        }
    }
}

impl Plugin for CountingPlugin {
    fn class_name(&self) -> &'static str {
        "test.Counting"
    }

    fn initialize(
        &mut self,
        context: &dyn HostContext,
        _webview: &dyn WebView,
        preferences: &Preferences,
    ) -> Result<(), PluginError> {
        self.counters.initialized.fetch_add(1, Ordering::SeqCst);
        if self.fail_init {
            return Err(PluginError::InitError("refusing to start".to_string()));
        }
        *self.seen_app_id.lock().unwrap() = Some(context.app_id().to_string());
        *self.seen_quality.lock().unwrap() = Some(preferences.get_i64("CameraQuality", -1));
        Ok(())
    }

    fn execute(&self, action: &str, _args: &Value) -> Result<Value, PluginError> {
        match action {
            "seen" => Ok(json!({
                "app_id": self.seen_app_id.lock().unwrap().clone(),
                "quality": *self.seen_quality.lock().unwrap(),
            })),
            other => Err(PluginError::UnknownAction(other.to_string())),
        }
    }
}

/// Plain plugin relying on every default
#[derive(Default)]
pub struct FakeCamera;

impl Plugin for FakeCamera {}

/// Resolver wrapper counting lookups
pub struct CountingResolver {
    pub inner: PluginFactory,
    pub lookups: AtomicUsize,
}

impl CountingResolver {
    pub fn new(inner: PluginFactory) -> Self {
        Self {
            inner,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl TypeResolver for CountingResolver {
    fn resolve(&self, class_name: &str) -> Option<ResolvedType> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(class_name)
    }
}

/// Factory with `FakeCamera`, a counting plugin, a failing plugin and a
/// foreign (non-plugin) type
pub fn test_factory(counters: &Counters) -> PluginFactory {
    let mut factory = PluginFactory::new();
    factory.register::<FakeCamera>("FakeCamera").unwrap();

    let ok = counters.clone();
    factory
        .register_with("test.Counting", move || {
            Ok(Box::new(CountingPlugin::new(ok.clone(), false)) as Box<dyn Plugin>)
        })
        .unwrap();

    let failing = counters.clone();
    factory
        .register_with("test.FailingInit", move || {
            Ok(Box::new(CountingPlugin::new(failing.clone(), true)) as Box<dyn Plugin>)
        })
        .unwrap();

    factory.register_foreign("test.NotAPlugin", "std::string::String").unwrap();
    factory
}
