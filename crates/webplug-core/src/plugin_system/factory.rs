use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::traits::{Plugin, PluginError};

/// Parameterless constructor producing a fresh, uninitialized plugin
pub type PluginConstructor = Arc<dyn Fn() -> Result<Box<dyn Plugin>, PluginError> + Send + Sync>;

/// Outcome of resolving a class name
#[derive(Clone)]
pub enum ResolvedType {
    /// The type implements [`Plugin`] and can be constructed
    Plugin(PluginConstructor),
    /// The type is known to the host but is not a plugin
    Foreign { type_name: String },
}

impl ResolvedType {
    pub fn is_plugin(&self) -> bool {
        matches!(self, ResolvedType::Plugin(_))
    }
}

impl fmt::Debug for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedType::Plugin(_) => f.write_str("Plugin(<constructor>)"),
            ResolvedType::Foreign { type_name } => {
                f.debug_struct("Foreign").field("type_name", type_name).finish()
            }
        }
    }
}

/// Late-binding lookup from a configured class name to a constructible type
pub trait TypeResolver: Send + Sync {
    /// Resolve `class_name`, or `None` when no such type is known
    fn resolve(&self, class_name: &str) -> Option<ResolvedType>;
}

/// Table of the types a host can build by name.
///
/// Hosts fill this at startup with every plugin they ship, so that entries
/// declared in configuration can name their implementation as a string.
#[derive(Clone, Default)]
pub struct PluginFactory {
    types: HashMap<String, ResolvedType>,
}

impl PluginFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin type built through its `Default` impl
    pub fn register<P>(&mut self, class_name: &str) -> Result<(), PluginSystemError>
    where
        P: Plugin + Default + 'static,
    {
        self.register_with(class_name, || Ok(Box::new(P::default()) as Box<dyn Plugin>))
    }

    /// Register a plugin type with a custom constructor
    pub fn register_with<F>(
        &mut self,
        class_name: &str,
        constructor: F,
    ) -> Result<(), PluginSystemError>
    where
        F: Fn() -> Result<Box<dyn Plugin>, PluginError> + Send + Sync + 'static,
    {
        self.insert(class_name, ResolvedType::Plugin(Arc::new(constructor)))
    }

    /// Register a type that resolves but does not implement [`Plugin`]
    pub fn register_foreign(
        &mut self,
        class_name: &str,
        type_name: &str,
    ) -> Result<(), PluginSystemError> {
        self.insert(
            class_name,
            ResolvedType::Foreign {
                type_name: type_name.to_string(),
            },
        )
    }

    fn insert(
        &mut self,
        class_name: &str,
        resolved: ResolvedType,
    ) -> Result<(), PluginSystemError> {
        if self.types.contains_key(class_name) {
            return Err(PluginSystemError::DuplicateClass {
                class_name: class_name.to_string(),
            });
        }
        debug!("Registered class '{}' ({:?})", class_name, resolved);
        self.types.insert(class_name.to_string(), resolved);
        Ok(())
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.types.contains_key(class_name)
    }

    /// Registered class names in lexical order
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeResolver for PluginFactory {
    fn resolve(&self, class_name: &str) -> Option<ResolvedType> {
        self.types.get(class_name).cloned()
    }
}
