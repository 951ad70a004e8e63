use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use log::{error, info};

use crate::config::HostConfig;
use crate::host::{HostContext, WebView};
use crate::plugin_system::entry::PluginEntry;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::factory::TypeResolver;
use crate::plugin_system::traits::Plugin;

/// Outcome of materializing `onload` entries at host start
#[derive(Debug, Default)]
pub struct StartupReport {
    /// Services whose plugin is now live, in the order they were built
    pub loaded: Vec<String>,
    /// Services whose plugin could not be built, with the reason
    pub failed: Vec<(String, PluginSystemError)>,
}

impl StartupReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Registry of plugin entries, kept in priority order.
///
/// Several entries may share a service; the lowest priority value wins.
/// Entries with equal priority keep their registration order.
pub struct PluginRegistry {
    /// Sorted by [`PluginEntry::compare_priority`]
    entries: Vec<PluginEntry>,
    /// Resolves class names for lazily built entries
    resolver: Arc<dyn TypeResolver>,
}

impl PluginRegistry {
    /// Create an empty registry backed by `resolver`
    pub fn new(resolver: Arc<dyn TypeResolver>) -> Self {
        Self {
            entries: Vec::new(),
            resolver,
        }
    }

    /// Create a registry holding every plugin declared in `config`
    pub fn from_config(config: &HostConfig, resolver: Arc<dyn TypeResolver>) -> Self {
        let mut registry = Self::new(resolver);
        for declaration in &config.plugins {
            registry.add(PluginEntry::from_config(declaration));
        }
        registry
    }

    /// Register an entry after any entry of lower or equal priority
    pub fn add(&mut self, entry: PluginEntry) {
        let position = self
            .entries
            .partition_point(|existing| existing.compare_priority(&entry) != Ordering::Greater);
        self.entries.insert(position, entry);
    }

    /// All entries, highest precedence first
    pub fn entries(&self) -> &[PluginEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolver(&self) -> &dyn TypeResolver {
        self.resolver.as_ref()
    }

    /// Entries bound to `service`, highest precedence first
    pub fn entries_for<'a, 's>(
        &'a self,
        service: &'s str,
    ) -> impl Iterator<Item = &'a PluginEntry> + 's
    where
        'a: 's,
    {
        self.entries
            .iter()
            .filter(move |entry| entry.service() == service)
    }

    /// The winning entry for `service`
    pub fn entry(&self, service: &str) -> Option<&PluginEntry> {
        self.entries.iter().find(|entry| entry.service() == service)
    }

    /// Build every `onload` entry, in priority order.
    ///
    /// A failing plugin is logged and recorded in the report; the remaining
    /// entries are still built.
    pub fn startup(&self, webview: &dyn WebView, context: &dyn HostContext) -> StartupReport {
        let mut report = StartupReport::default();
        for entry in self.entries.iter().filter(|entry| entry.onload()) {
            match entry.try_create_or_get_plugin(webview, context, self.resolver()) {
                Ok(_) => report.loaded.push(entry.service().to_string()),
                Err(e) => {
                    error!("Error adding plugin {}: {}", entry.plugin_class(), e);
                    report.failed.push((entry.service().to_string(), e));
                }
            }
        }
        info!(
            "Startup built {} onload plugin(s), {} failed",
            report.loaded.len(),
            report.failed.len()
        );
        report
    }

    /// Plugin for `service` from the first entry that can provide one
    pub fn create_or_get(
        &self,
        service: &str,
        webview: &dyn WebView,
        context: &dyn HostContext,
    ) -> Option<Arc<dyn Plugin>> {
        self.entries_for(service)
            .find_map(|entry| entry.create_or_get_plugin(webview, context, self.resolver()))
    }

    /// Services with at least one entry whose filters admit `url`
    pub fn services_for_url(&self, url: &str) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|entry| entry.applies_to(url))
            .map(PluginEntry::service)
            .filter(|service| seen.insert(*service))
            .collect()
    }
}
