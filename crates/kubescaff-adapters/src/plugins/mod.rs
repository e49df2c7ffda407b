//! Plugins shipped with kubescaff.

pub mod addon;
pub mod common;
pub mod golang;

use std::sync::Arc;

use kubescaff_core::application::{Plugin, PluginRegistry, PluginRegistryBuilder};
use kubescaff_core::domain::config::VERSION_2;
use kubescaff_core::error::KsResult;

pub use addon::AddonTransform;
pub use golang::{GoPluginV1, GoPluginV2};

/// Project version used when neither a PROJECT file nor a flag picks one.
pub const DEFAULT_PROJECT_VERSION: &str = VERSION_2;

/// Every built-in plugin, oldest first.
pub fn builtin_plugins() -> Vec<Arc<dyn Plugin>> {
    vec![Arc::new(GoPluginV1), Arc::new(GoPluginV2)]
}

/// A registry holding the built-in plugins under `command_name`.
pub fn builtin_registry(command_name: &str) -> KsResult<PluginRegistry> {
    PluginRegistryBuilder::new()
        .command_name(command_name)
        .default_project_version(DEFAULT_PROJECT_VERSION)
        .plugins(builtin_plugins())
        .build()
}
