use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError, TryLockError};

use log::{debug, error};

use crate::config::PluginEntryConfig;
use crate::host::{HostContext, WebView};
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::factory::{ResolvedType, TypeResolver};
use crate::plugin_system::traits::{Plugin, PluginError};

/// A registered binding between a service name and the plugin implementing it.
///
/// The plugin object is built lazily: [`create_or_get_plugin`](Self::create_or_get_plugin)
/// resolves the class name on first use and caches the instance, unless the
/// entry was built around an existing instance. Entries flagged `onload` are
/// built by the owning registry when the host starts.
///
/// Entries order by `priority` alone, lowest first. Two entries compare equal
/// when their priorities do, whatever their services.
pub struct PluginEntry {
    service: String,
    plugin_class: String,
    onload: bool,
    priority: f32,
    url_filters: Option<Vec<String>>,
    /// Set at most once, under the lock, by a successful construction
    plugin: Mutex<Option<Arc<dyn Plugin>>>,
}

impl PluginEntry {
    /// Entry for a plugin the host already built.
    ///
    /// The class name is taken from the instance, `onload` is forced on and
    /// the instance is served as-is without resolution or initialization.
    pub fn from_plugin(service: impl Into<String>, plugin: Arc<dyn Plugin>) -> Self {
        let class_name = plugin.class_name().to_string();
        let entry = Self::build(service.into(), class_name, true, 0.0, None);
        *entry.slot() = Some(plugin);
        entry
    }

    pub fn new(service: impl Into<String>, plugin_class: impl Into<String>, onload: bool) -> Self {
        Self::build(service.into(), plugin_class.into(), onload, 0.0, None)
    }

    pub fn with_priority(
        service: impl Into<String>,
        plugin_class: impl Into<String>,
        onload: bool,
        priority: f32,
    ) -> Self {
        Self::build(service.into(), plugin_class.into(), onload, priority, None)
    }

    pub fn with_url_filters(
        service: impl Into<String>,
        plugin_class: impl Into<String>,
        onload: bool,
        url_filters: Option<Vec<String>>,
    ) -> Self {
        Self::build(service.into(), plugin_class.into(), onload, 0.0, url_filters)
    }

    /// Entry declared in a host configuration file
    pub fn from_config(config: &PluginEntryConfig) -> Self {
        Self::build(
            config.service.clone(),
            config.class.clone(),
            config.onload,
            config.priority,
            config.url_filters.clone(),
        )
    }

    fn build(
        service: String,
        plugin_class: String,
        onload: bool,
        priority: f32,
        url_filters: Option<Vec<String>>,
    ) -> Self {
        Self {
            service,
            plugin_class,
            onload,
            priority,
            url_filters,
            plugin: Mutex::new(None),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn plugin_class(&self) -> &str {
        &self.plugin_class
    }

    pub fn onload(&self) -> bool {
        self.onload
    }

    pub fn priority(&self) -> f32 {
        self.priority
    }

    /// URL prefixes this plugin is restricted to; `None` means unrestricted
    pub fn url_filters(&self) -> Option<&[String]> {
        self.url_filters.as_deref()
    }

    /// Whether a page at `url` is in this plugin's scope
    pub fn applies_to(&self, url: &str) -> bool {
        match &self.url_filters {
            None => true,
            Some(filters) => filters.iter().any(|filter| url.starts_with(filter.as_str())),
        }
    }

    /// The cached plugin, without triggering construction
    pub fn plugin(&self) -> Option<Arc<dyn Plugin>> {
        self.slot().clone()
    }

    pub fn is_materialized(&self) -> bool {
        self.slot().is_some()
    }

    /// Return the plugin, building and initializing it on first use.
    ///
    /// Failures are logged with the offending class name and reported as
    /// `None`; nothing is cached, so a later call tries again.
    ///
    /// The entry stays locked while the plugin is constructed and initialized.
    /// A constructor or `initialize` hook must not call back into
    /// `create_or_get_plugin`, [`plugin`](Self::plugin) or
    /// [`is_materialized`](Self::is_materialized) on the same entry: that
    /// call would deadlock.
    pub fn create_or_get_plugin(
        &self,
        webview: &dyn WebView,
        context: &dyn HostContext,
        resolver: &dyn TypeResolver,
    ) -> Option<Arc<dyn Plugin>> {
        match self.try_create_or_get_plugin(webview, context, resolver) {
            Ok(plugin) => Some(plugin),
            Err(e) => {
                error!("Error adding plugin {}: {}", self.plugin_class, e);
                None
            }
        }
    }

    /// Same as [`create_or_get_plugin`](Self::create_or_get_plugin) but
    /// returns the reason construction failed.
    pub fn try_create_or_get_plugin(
        &self,
        webview: &dyn WebView,
        context: &dyn HostContext,
        resolver: &dyn TypeResolver,
    ) -> Result<Arc<dyn Plugin>, PluginSystemError> {
        // The lock is held across construction so concurrent callers build once.
        let mut slot = self.slot();
        if let Some(plugin) = slot.as_ref() {
            return Ok(Arc::clone(plugin));
        }
        let plugin = self.instantiate(webview, context, resolver)?;
        *slot = Some(Arc::clone(&plugin));
        Ok(plugin)
    }

    fn instantiate(
        &self,
        webview: &dyn WebView,
        context: &dyn HostContext,
        resolver: &dyn TypeResolver,
    ) -> Result<Arc<dyn Plugin>, PluginSystemError> {
        if self.plugin_class.is_empty() {
            return Err(PluginSystemError::EmptyClassName {
                service: self.service.clone(),
            });
        }

        let constructor = match resolver.resolve(&self.plugin_class) {
            Some(ResolvedType::Plugin(constructor)) => constructor,
            Some(ResolvedType::Foreign { type_name }) => {
                return Err(PluginSystemError::CapabilityMismatch {
                    class_name: self.plugin_class.clone(),
                    type_name,
                });
            }
            None => {
                return Err(PluginSystemError::TypeNotFound {
                    class_name: self.plugin_class.clone(),
                });
            }
        };

        let mut plugin =
            guarded(|| (*constructor)()).map_err(|source| PluginSystemError::ConstructionFailed {
                class_name: self.plugin_class.clone(),
                source,
            })?;

        guarded(|| plugin.initialize(context, webview, webview.preferences())).map_err(
            |source| PluginSystemError::InitializationFailed {
                class_name: self.plugin_class.clone(),
                source,
            },
        )?;

        debug!(
            "Created plugin '{}' for service '{}'",
            self.plugin_class, self.service
        );
        Ok(Arc::from(plugin))
    }

    /// Compare by priority only; lower values sort first.
    ///
    /// Every NaN compares equal to every other NaN and after all numbers,
    /// whatever its sign bit.
    pub fn compare_priority(&self, other: &Self) -> Ordering {
        sort_key(self.priority).total_cmp(&sort_key(other.priority))
    }

    /// `None` while another caller holds the entry, e.g. during construction
    fn peek_materialized(&self) -> Option<bool> {
        match self.plugin.try_lock() {
            Ok(slot) => Some(slot.is_some()),
            Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner().is_some()),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Arc<dyn Plugin>>> {
        // Panics are caught before they can unwind through the guard.
        self.plugin.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn sort_key(priority: f32) -> f32 {
    if priority.is_nan() {
        f32::NAN
    } else {
        priority
    }
}

/// Run a plugin-supplied hook, turning a panic into an error.
fn guarded<T>(hook: impl FnOnce() -> Result<T, PluginError>) -> Result<T, PluginError> {
    match panic::catch_unwind(AssertUnwindSafe(hook)) {
        Ok(result) => result,
        Err(panic_obj) => Err(PluginError::InitError(format!(
            "panic: {}",
            panic_message(&*panic_obj)
        ))),
    }
}

fn panic_message(panic_obj: &(dyn Any + Send)) -> String {
    if let Some(s_ref) = panic_obj.downcast_ref::<&'static str>() {
        (*s_ref).to_string()
    } else if let Some(s_obj) = panic_obj.downcast_ref::<String>() {
        s_obj.clone()
    } else {
        "Unknown panic reason".to_string()
    }
}

impl fmt::Debug for PluginEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginEntry")
            .field("service", &self.service)
            .field("plugin_class", &self.plugin_class)
            .field("onload", &self.onload)
            .field("priority", &self.priority)
            .field("url_filters", &self.url_filters)
            .field("materialized", &self.peek_materialized())
            .finish()
    }
}

impl PartialEq for PluginEntry {
    fn eq(&self, other: &Self) -> bool {
        self.compare_priority(other) == Ordering::Equal
    }
}

impl Eq for PluginEntry {}

impl PartialOrd for PluginEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PluginEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_priority(other)
    }
}
