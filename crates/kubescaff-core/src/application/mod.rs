//! Application layer for kubescaff.
//!
//! This layer contains:
//! - **Plugins**: the `Plugin`, `Subcommand` and `TransformPlugin` contracts
//! - **Registry / Resolver / Binder**: choosing the plugin that serves a command
//! - **Services**: scaffold execution, project state and config persistence
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Errors**: application-specific error types
//!
//! Business rules on plugin identity and project data live in
//! `crate::domain`.

pub mod binder;
pub mod error;
pub mod plugin;
pub mod ports;
pub mod registry;
pub mod resolver;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use binder::{Binder, BoundCommand, Capability};
pub use error::ApplicationError;
pub use plugin::{
    CommandContext, FlagKind, FlagSet, FlagSpec, FlagValue, FlagValues, Invocation, Plugin,
    Subcommand, TransformPlugin, key_for,
};
pub use ports::{CommandRunner, Filesystem, Ports, Prompter, TemplateRenderer};
pub use registry::{PluginRegistry, PluginRegistryBuilder};
pub use resolver::{filter_plugins_by_keys, resolve_plugins_by_key};
pub use services::{ConfigStore, ProjectState, Scaffold, TrackedFile};
