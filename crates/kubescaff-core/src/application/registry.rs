//! The immutable plugin registry.
//!
//! Built once at startup through [`PluginRegistryBuilder`] and never
//! mutated afterwards. Plugins are grouped by the project versions they
//! support.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use super::ApplicationError;
use super::plugin::{Plugin, key_for};
use crate::domain::{plugin_key, validation};
use crate::error::KsResult;

/// Accumulates plugins and settings before validation.
#[derive(Default)]
pub struct PluginRegistryBuilder {
    command_name: String,
    default_project_version: String,
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binary name shown in help examples.
    #[must_use]
    pub fn command_name(mut self, name: impl Into<String>) -> Self {
        self.command_name = name.into();
        self
    }

    /// Project version used when neither a PROJECT file nor
    /// `--project-version` selects one.
    #[must_use]
    pub fn default_project_version(mut self, version: impl Into<String>) -> Self {
        self.default_project_version = version.into();
        self
    }

    #[must_use]
    pub fn plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    #[must_use]
    pub fn plugins(mut self, plugins: impl IntoIterator<Item = Arc<dyn Plugin>>) -> Self {
        self.plugins.extend(plugins);
        self
    }

    /// Validates every plugin and freezes the registry.
    pub fn build(self) -> KsResult<PluginRegistry> {
        validation::validate_project_version(&self.default_project_version)?;

        let mut by_version: BTreeMap<String, Vec<Arc<dyn Plugin>>> = BTreeMap::new();
        for plugin in self.plugins {
            validation::validate_name(plugin.name())?;
            validation::validate_version(plugin.version())?;

            let supported = plugin.supported_project_versions();
            if supported.is_empty() {
                return Err(ApplicationError::PluginRegistration {
                    reason: format!(
                        "plugin {:?} must support at least one project version",
                        key_for(plugin.as_ref())
                    ),
                }
                .into());
            }

            for project_version in supported {
                validation::validate_project_version(project_version)?;
                let slot = by_version.entry((*project_version).to_string()).or_default();
                if slot
                    .iter()
                    .any(|p| plugin_key::names_equal(p.name(), plugin.name()))
                {
                    return Err(ApplicationError::PluginRegistration {
                        reason: format!("two plugins have the same name: {:?}", plugin.name()),
                    }
                    .into());
                }
                debug!(
                    plugin = %key_for(plugin.as_ref()),
                    project_version = %project_version,
                    "Registered plugin"
                );
                slot.push(Arc::clone(&plugin));
            }
        }

        Ok(PluginRegistry {
            command_name: self.command_name,
            default_project_version: self.default_project_version,
            by_version,
        })
    }
}

/// Validated plugins indexed by project version.
pub struct PluginRegistry {
    command_name: String,
    default_project_version: String,
    by_version: BTreeMap<String, Vec<Arc<dyn Plugin>>>,
}

impl PluginRegistry {
    pub fn builder() -> PluginRegistryBuilder {
        PluginRegistryBuilder::new()
    }

    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    pub fn default_project_version(&self) -> &str {
        &self.default_project_version
    }

    /// Plugins serving `project_version`, in registration order.
    pub fn plugins_for(&self, project_version: &str) -> &[Arc<dyn Plugin>] {
        self.by_version
            .get(project_version)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every project version with at least one plugin.
    pub fn project_versions(&self) -> Vec<&str> {
        self.by_version.keys().map(String::as_str).collect()
    }

    /// Project versions served by at least one non-deprecated plugin.
    pub fn available_project_versions(&self) -> Vec<&str> {
        self.by_version
            .iter()
            .filter(|(_, plugins)| plugins.iter().any(|p| p.deprecation_warning().is_none()))
            .map(|(version, _)| version.as_str())
            .collect()
    }

    /// Every registered plugin once, sorted by key.
    pub fn all_plugins(&self) -> Vec<Arc<dyn Plugin>> {
        let mut seen: BTreeMap<String, Arc<dyn Plugin>> = BTreeMap::new();
        for plugin in self.by_version.values().flatten() {
            seen.entry(key_for(plugin.as_ref()))
                .or_insert_with(|| Arc::clone(plugin));
        }
        seen.into_values().collect()
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let versions: BTreeMap<&str, Vec<String>> = self
            .by_version
            .iter()
            .map(|(v, ps)| (v.as_str(), ps.iter().map(|p| key_for(p.as_ref())).collect()))
            .collect();
        f.debug_struct("PluginRegistry")
            .field("command_name", &self.command_name)
            .field("default_project_version", &self.default_project_version)
            .field("plugins", &versions)
            .finish()
    }
}
