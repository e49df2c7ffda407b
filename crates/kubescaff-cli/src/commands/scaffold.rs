//! Running a plugin command.

use clap::ArgMatches;
use serde_json::json;
use tracing::{debug, instrument};

use kubescaff_core::application::Capability;
use kubescaff_core::domain::ProjectConfig;

use crate::cli::{OutputFormat, Slot, base_flags::PROJECT_VERSION_FLAG, flags};
use crate::error::{CliError, CliResult};
use crate::output::OutputManager;
use crate::workspace::Workspace;

/// Executes the plugin behind `slot` with the flags parsed into `matches`.
#[instrument(skip_all, fields(command = %capability))]
pub fn execute(
    capability: Capability,
    slot: Slot,
    matches: &ArgMatches,
    workspace: &Workspace,
    output: &OutputManager,
) -> CliResult<()> {
    let bound = match slot {
        Slot::Bound(bound) => bound,
        Slot::Unsupported(err) => return Err(err.into()),
        Slot::Generic => {
            return Err(CliError::invalid_input(format!(
                "{capability} needs a project version, set --{PROJECT_VERSION_FLAG}"
            )));
        }
    };

    let values = flags::values(bound.flags(), matches);
    let plugin = bound.plugin_key().to_string();
    debug!(root = %workspace.root().display(), plugin = %plugin, "Executing");

    let config = bound.execute(&values, &workspace.ports(), workspace.store())?;

    if output.format() == OutputFormat::Json {
        output.json(&json!({
            "command": capability.label(),
            "plugin": plugin,
            "project_version": config.version,
            "resources": config.resources,
        }))?;
    } else {
        output.success(&summary(capability, &plugin, &config))?;
    }
    Ok(())
}

fn summary(capability: Capability, plugin: &str, config: &ProjectConfig) -> String {
    match capability {
        Capability::Init => format!(
            "Initialized project version {} with {plugin}",
            config.version
        ),
        Capability::CreateApi => match config.resources.last() {
            Some(gvk) => format!("Scaffolded API {}/{}, Kind={}", gvk.group, gvk.version, gvk.kind),
            None => "Scaffolded API".to_string(),
        },
        Capability::CreateWebhook => "Scaffolded webhook".to_string(),
        Capability::Edit => "Updated project configuration".to_string(),
    }
}
