//! `create api` for go/v1 projects. Resources are not tracked in v1 configs.

use kubescaff_core::{
    application::{CommandContext, FlagSet, Invocation, Scaffold, Subcommand},
    domain::{FileBuilder, IfExistsAction, Universe},
    error::KsResult,
};
use tracing::info;

use super::templates as t;
use crate::plugins::common;

pub(super) struct CreateApiSubcommand;

impl Subcommand for CreateApiSubcommand {
    fn bind_flags(&self, flags: &mut FlagSet) {
        flags
            .bool("make", true, "if true, run make after generating files")
            .bool("resource", true, "if set, generate the resource without prompting the user")
            .bool("controller", true, "if set, generate the controller without prompting the user");
        common::bind_resource_flags(flags);
        flags.bool("namespaced", true, "resource is namespaced");
    }

    fn update_context(&self, ctx: &mut CommandContext) {
        ctx.description = "Scaffold a Kubernetes API by creating a Resource definition and / or a Controller.

create resource will prompt the user for if it should scaffold the Resource and / or Controller.
"
        .into();
        ctx.examples = format!(
            "  # Create a frigates API with Group: ship, Version: v1beta1 and Kind: Frigate
  {0} create api --group ship --version v1beta1 --kind Frigate

  # Edit the API Scheme
  nano pkg/apis/ship/v1beta1/frigate_types.go
",
            ctx.command_name
        );
    }

    fn run(&mut self, inv: &mut Invocation<'_>) -> KsResult<()> {
        let ports = inv.ports;
        let flags = inv.flags;

        let options = common::resource_options(flags);
        options.validate()?;

        let do_resource = common::confirm_flag(inv, "resource", "Create Resource [y/n]")?;
        let do_controller = common::confirm_flag(inv, "controller", "Create Controller [y/n]")?;

        let resource = options.into_resource(inv.config, do_resource);
        let mut builders = Vec::new();
        if do_resource {
            builders.extend([
                FileBuilder::template(
                    "pkg/apis/{{ resource.group }}/{{ resource.version }}/{{ resource.kind | lower }}_types.go",
                    t::TYPES_GO,
                ),
                FileBuilder::template(
                    "pkg/apis/{{ resource.group }}/{{ resource.version }}/register.go",
                    t::REGISTER_GO,
                )
                .if_exists(IfExistsAction::Skip),
                FileBuilder::template(
                    "pkg/apis/addtoscheme_{{ resource.group_package_name }}_{{ resource.version }}.go",
                    t::ADD_TO_SCHEME_GO,
                )
                .if_exists(IfExistsAction::Skip),
                FileBuilder::template(
                    "config/samples/{{ resource.group_package_name }}_{{ resource.version }}_{{ resource.kind | lower }}.yaml",
                    t::CRD_SAMPLE,
                ),
            ]);
        }
        if do_controller {
            builders.extend([
                FileBuilder::template(
                    "pkg/controller/add_{{ resource.kind | lower }}.go",
                    t::ADD_CONTROLLER_GO,
                ),
                FileBuilder::template(
                    "pkg/controller/{{ resource.kind | lower }}/{{ resource.kind | lower }}_controller.go",
                    t::KIND_CONTROLLER_GO,
                ),
            ]);
        }

        let boilerplate = common::load_boilerplate(ports.filesystem.as_ref())?;
        let mut universe = Universe::new(inv.config.clone())
            .with_resource(resource)
            .with_boilerplate(boilerplate);
        Scaffold::from_ports(ports).execute(&mut universe, &builders)?;
        info!(files = universe.files.len(), "API scaffolded");
        Ok(())
    }

    fn post_scaffold(&mut self, inv: &Invocation<'_>) -> KsResult<()> {
        if inv.flags.bool("make") {
            inv.ports.runner.run("Running make", "make", &[])?;
        }
        Ok(())
    }
}
