//! Binding one plugin per command for the active project version.
//!
//! The [`Binder`] holds the plugin set selected for a project version. For
//! each [`Capability`] it finds the single plugin providing it, lets that
//! plugin declare its flags and help text, and hands back a
//! [`BoundCommand`] the CLI executes once arguments are parsed.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::ApplicationError;
use super::plugin::{CommandContext, FlagSet, FlagValues, Invocation, Plugin, Subcommand, key_for};
use super::ports::Ports;
use super::registry::PluginRegistry;
use super::resolver::filter_plugins_by_keys;
use super::services::ConfigStore;
use crate::domain::{ProjectConfig, validation};
use crate::error::{KsResult, KubescaffError};

/// A plugin-provided command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Init,
    CreateApi,
    CreateWebhook,
    Edit,
}

impl Capability {
    pub const ALL: [Capability; 4] = [Self::Init, Self::CreateApi, Self::CreateWebhook, Self::Edit];

    /// Command name as typed by the user.
    pub fn label(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::CreateApi => "create api",
            Self::CreateWebhook => "create webhook",
            Self::Edit => "edit",
        }
    }

    /// Verb phrase used when a run fails.
    pub fn action(self) -> &'static str {
        match self {
            Self::Init => "initialize project",
            Self::CreateApi => "create api",
            Self::CreateWebhook => "create webhook",
            Self::Edit => "edit project",
        }
    }

    /// `false` only for `init`, which requires the opposite.
    pub fn requires_project(self) -> bool {
        !matches!(self, Self::Init)
    }

    fn query(self, plugin: &dyn Plugin) -> Option<Box<dyn Subcommand>> {
        match self {
            Self::Init => plugin.init(),
            Self::CreateApi => plugin.create_api(),
            Self::CreateWebhook => plugin.create_webhook(),
            Self::Edit => plugin.edit(),
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The plugin set chosen for one invocation.
pub struct Binder<'r> {
    registry: &'r PluginRegistry,
    project_version: String,
    plugins: Vec<Arc<dyn Plugin>>,
}

impl<'r> Binder<'r> {
    /// Selects the plugins for `project_version`, narrowed by `plugin_keys`
    /// when any are given.
    ///
    /// `configured` says whether the working tree already holds a project;
    /// unconfigured trees may only choose versions that still have a
    /// non-deprecated plugin.
    #[instrument(skip_all, fields(project_version = %project_version))]
    pub fn new(
        registry: &'r PluginRegistry,
        project_version: &str,
        plugin_keys: &[String],
        configured: bool,
    ) -> KsResult<Self> {
        validation::validate_project_version(project_version)?;

        let known = if configured {
            registry.project_versions()
        } else {
            registry.available_project_versions()
        };
        if !known.contains(&project_version) {
            return Err(ApplicationError::UnknownProjectVersion {
                version: project_version.to_string(),
                available: known.join(", "),
            }
            .into());
        }

        let plugins = filter_plugins_by_keys(registry.plugins_for(project_version), plugin_keys)?;
        debug!(plugins = plugins.len(), "Selected plugins");

        Ok(Self {
            registry,
            project_version: project_version.to_string(),
            plugins,
        })
    }

    pub fn project_version(&self) -> &str {
        &self.project_version
    }

    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    /// One `key: notice` line per selected deprecated plugin.
    pub fn deprecation_notices(&self) -> Vec<String> {
        self.plugins
            .iter()
            .filter_map(|p| {
                p.deprecation_warning()
                    .map(|w| format!("{}: {w}", key_for(p.as_ref())))
            })
            .collect()
    }

    /// Finds the single plugin providing `capability` and binds it.
    ///
    /// Zero providers is [`ApplicationError::UnsupportedCapability`]; more
    /// than one is the fatal [`ApplicationError::DuplicateCapability`].
    pub fn bind(&self, capability: Capability) -> KsResult<BoundCommand> {
        let mut providers: Vec<(String, Box<dyn Subcommand>)> = self
            .plugins
            .iter()
            .filter_map(|p| capability.query(p.as_ref()).map(|s| (key_for(p.as_ref()), s)))
            .collect();

        if providers.len() > 1 {
            return Err(ApplicationError::DuplicateCapability {
                capability: capability.label(),
                project_version: self.project_version.clone(),
                plugins: providers.into_iter().map(|(k, _)| k).collect(),
            }
            .into());
        }
        let Some((plugin_key, subcommand)) = providers.pop() else {
            return Err(ApplicationError::UnsupportedCapability {
                capability: capability.label(),
                project_version: self.project_version.clone(),
            }
            .into());
        };

        let mut flags = FlagSet::new();
        subcommand.bind_flags(&mut flags);
        let mut context = CommandContext::new(self.registry.command_name());
        subcommand.update_context(&mut context);

        debug!(capability = %capability, plugin = %plugin_key, "Bound command");
        Ok(BoundCommand {
            capability,
            project_version: self.project_version.clone(),
            plugin_key,
            subcommand,
            flags,
            context,
        })
    }
}

/// A command wired to its plugin, ready to run once flags are parsed.
pub struct BoundCommand {
    capability: Capability,
    project_version: String,
    plugin_key: String,
    subcommand: Box<dyn Subcommand>,
    flags: FlagSet,
    context: CommandContext,
}

impl BoundCommand {
    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn plugin_key(&self) -> &str {
        &self.plugin_key
    }

    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    /// Checks preconditions, runs the plugin, saves the project
    /// configuration, then runs the plugin's post-scaffold hook.
    ///
    /// Returns the configuration as saved.
    #[instrument(skip_all, fields(command = %self.capability, plugin = %self.plugin_key))]
    pub fn execute(
        mut self,
        values: &FlagValues,
        ports: &Ports,
        store: &ConfigStore,
    ) -> KsResult<ProjectConfig> {
        let configured = store.exists();
        let mut config = match (self.capability, configured) {
            (Capability::Init, true) => return Err(ApplicationError::AlreadyInitialized.into()),
            (Capability::Init, false) => ProjectConfig::new(self.project_version.clone()),
            (cap, false) => {
                return Err(ApplicationError::NotInitialized {
                    command: cap.label(),
                }
                .into());
            }
            (_, true) => store.load_initialized()?,
        };

        let mut invocation = Invocation {
            command_name: &self.context.command_name,
            project_version: &self.project_version,
            flags: values,
            config: &mut config,
            ports,
        };
        info!("Running plugin");
        if let Err(e) = self.subcommand.run(&mut invocation) {
            warn!(error = %e, "Plugin run failed");
            return Err(self.wrap(e));
        }

        store.save(invocation.config)?;

        if let Err(e) = self.subcommand.post_scaffold(&invocation) {
            return Err(self.wrap(e));
        }
        info!("Command completed");
        Ok(config)
    }

    fn wrap(&self, source: KubescaffError) -> KubescaffError {
        ApplicationError::SubcommandFailed {
            action: self.capability.action(),
            project_version: self.project_version.clone(),
            source: Box::new(source),
        }
        .into()
    }
}

impl std::fmt::Debug for Binder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let plugins: Vec<String> = self.plugins.iter().map(|p| key_for(p.as_ref())).collect();
        f.debug_struct("Binder")
            .field("project_version", &self.project_version)
            .field("plugins", &plugins)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for BoundCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundCommand")
            .field("capability", &self.capability)
            .field("project_version", &self.project_version)
            .field("plugin_key", &self.plugin_key)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}
