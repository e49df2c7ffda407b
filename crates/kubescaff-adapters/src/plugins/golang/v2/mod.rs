//! The go/v2 plugin: controller-runtime based Go projects.

mod api;
mod edit;
mod init;
pub(crate) mod templates;
mod webhook;

pub(crate) use api::resource_data;

use kubescaff_core::{
    application::{Plugin, Subcommand},
    domain::config::{VERSION_2, VERSION_3_ALPHA},
};

pub const PLUGIN_NAME: &str = "go.kubebuilder.io";
pub const PLUGIN_VERSION: &str = "2.0.0";

/// Scaffolds project version 2 (and 3-alpha) Go operators.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoPluginV2;

impl Plugin for GoPluginV2 {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn version(&self) -> &str {
        PLUGIN_VERSION
    }

    fn supported_project_versions(&self) -> &[&str] {
        &[VERSION_2, VERSION_3_ALPHA]
    }

    fn init(&self) -> Option<Box<dyn Subcommand>> {
        Some(Box::new(init::InitSubcommand))
    }

    fn create_api(&self) -> Option<Box<dyn Subcommand>> {
        Some(Box::new(api::CreateApiSubcommand))
    }

    fn create_webhook(&self) -> Option<Box<dyn Subcommand>> {
        Some(Box::new(webhook::CreateWebhookSubcommand))
    }

    fn edit(&self) -> Option<Box<dyn Subcommand>> {
        Some(Box::new(edit::EditSubcommand))
    }
}
