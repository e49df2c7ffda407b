//! The deprecated go/v1 plugin.

mod api;
mod init;
mod templates;

use kubescaff_core::{
    application::{Plugin, Subcommand},
    domain::config::VERSION_1,
};

pub const PLUGIN_VERSION: &str = "1.0.0";

const DEPRECATION: &str = "The v1 projects are deprecated and will not be supported beyond Feb 1, 2020.
See how to upgrade your project to v2: https://book.kubebuilder.io/migration/guide.html";

/// Scaffolds project version 1 Go operators.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoPluginV1;

impl Plugin for GoPluginV1 {
    fn name(&self) -> &str {
        super::v2::PLUGIN_NAME
    }

    fn version(&self) -> &str {
        PLUGIN_VERSION
    }

    fn supported_project_versions(&self) -> &[&str] {
        &[VERSION_1]
    }

    fn init(&self) -> Option<Box<dyn Subcommand>> {
        Some(Box::new(init::InitSubcommand))
    }

    fn create_api(&self) -> Option<Box<dyn Subcommand>> {
        Some(Box::new(api::CreateApiSubcommand))
    }

    fn deprecation_warning(&self) -> Option<&str> {
        Some(DEPRECATION)
    }
}
