//! # Webplug Plugin System
//!
//! Describes the plugins a host offers and builds them on demand.
//!
//! ## Key Submodules and Responsibilities:
//!
//! - **[`entry`]**: [`PluginEntry`], the descriptor binding a service name to
//!   a plugin class. It builds and caches the plugin the first time it is
//!   asked for, and orders against other entries by priority.
//! - **[`factory`]**: [`PluginFactory`] and the [`TypeResolver`] seam that
//!   turn a configured class name into a constructor.
//! - **[`registry`]**: [`PluginRegistry`], the priority-ordered collection of
//!   entries that materializes `onload` plugins at startup.
//! - **[`traits`]**: the [`Plugin`] capability every plugin implements.
//! - **[`error`]**: [`PluginSystemError`](error::PluginSystemError).
//!
//! Routing script calls to plugins is left to the host.
pub mod entry;
pub mod error;
pub mod factory;
pub mod registry;
pub mod traits;

pub use entry::PluginEntry;
pub use error::PluginSystemError;
pub use factory::{PluginConstructor, PluginFactory, ResolvedType, TypeResolver};
pub use registry::{PluginRegistry, StartupReport};
pub use traits::{Plugin, PluginError};

// Test module declaration
#[cfg(test)]
mod tests;
