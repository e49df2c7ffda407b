//! `create webhook` for go/v2 projects.

use kubescaff_core::{
    application::{ApplicationError, CommandContext, FlagSet, Invocation, Scaffold, Subcommand},
    domain::{FileBuilder, IfExistsAction, Universe},
    error::KsResult,
};
use tracing::info;

use super::{api::resource_data, templates as t};
use crate::plugins::common;

pub(super) struct CreateWebhookSubcommand;

impl Subcommand for CreateWebhookSubcommand {
    fn bind_flags(&self, flags: &mut FlagSet) {
        common::bind_resource_flags(flags);
        flags
            .bool("defaulting", false, "if set, scaffold the defaulting webhook")
            .bool("programmatic-validation", false, "if set, scaffold the validating webhook")
            .bool("conversion", false, "if set, scaffold the conversion webhook");
    }

    fn update_context(&self, ctx: &mut CommandContext) {
        ctx.description = "Scaffold a webhook for an API resource. You can choose to scaffold defaulting,
validating and (or) conversion webhooks.
"
        .into();
        ctx.examples = format!(
            "  # Create defaulting and validating webhooks for CRD of group ship, version v1beta1
  # and kind Frigate.
  {0} create webhook --group ship --version v1beta1 --kind Frigate --defaulting --programmatic-validation

  # Create conversion webhook for CRD of group ship, version v1beta1 and kind Frigate.
  {0} create webhook --group ship --version v1beta1 --kind Frigate --conversion
",
            ctx.command_name
        );
    }

    fn run(&mut self, inv: &mut Invocation<'_>) -> KsResult<()> {
        let ports = inv.ports;
        let flags = inv.flags;

        let options = common::resource_options(flags);
        options.validate()?;

        let defaulting = flags.bool("defaulting");
        let validating = flags.bool("programmatic-validation");
        let conversion = flags.bool("conversion");
        if !defaulting && !validating && !conversion {
            return Err(ApplicationError::ValidationFailed(format!(
                "{} webhook requires at least one of --defaulting, \
                 --programmatic-validation and --conversion to be true",
                inv.command_name
            ))
            .into());
        }

        let resource = options.into_resource(inv.config, false);
        let data = resource_data(inv.config, &resource);
        let api_dir = common::api_dir(inv.config.multigroup);

        let mut builders = Vec::new();
        if defaulting || validating {
            builders.push(
                FileBuilder::template(
                    format!("{api_dir}/{{{{ resource.kind | lower }}}}_webhook.go"),
                    t::WEBHOOK_GO,
                )
                .if_exists(IfExistsAction::Error)
                .with_data("defaulting", defaulting)
                .with_data("validating", validating),
            );
            builders.push(
                FileBuilder::inserter("main.go").marker(t::MAIN_BUILDER_MARKER, t::MAIN_SETUP_WEBHOOK),
            );
        }
        for builder in &mut builders {
            builder.data.extend(data.clone());
        }

        let boilerplate = common::load_boilerplate(ports.filesystem.as_ref())?;
        let mut universe = Universe::new(inv.config.clone())
            .with_resource(resource)
            .with_boilerplate(boilerplate);
        Scaffold::from_ports(ports).execute(&mut universe, &builders)?;

        if conversion {
            info!("Webhook server has been set up for you.");
            info!("You need to implement the conversion.Hub and conversion.Convertible interfaces for your CRD types.");
        }
        Ok(())
    }
}
