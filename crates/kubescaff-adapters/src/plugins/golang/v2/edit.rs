//! `edit` for go/v2 projects.

use kubescaff_core::{
    application::{CommandContext, FlagSet, Invocation, Subcommand},
    error::KsResult,
};
use tracing::info;

pub(super) struct EditSubcommand;

impl Subcommand for EditSubcommand {
    fn bind_flags(&self, flags: &mut FlagSet) {
        flags.bool("multigroup", false, "enable or disable multigroup layout");
    }

    fn update_context(&self, ctx: &mut CommandContext) {
        ctx.description = "Edit the project configuration.\n".into();
        ctx.examples = format!(
            "  # Enable the multigroup layout
  {0} edit --multigroup

  # Disable the multigroup layout
  {0} edit --multigroup=false
",
            ctx.command_name
        );
    }

    fn run(&mut self, inv: &mut Invocation<'_>) -> KsResult<()> {
        let multigroup = inv.flags.bool("multigroup");
        if inv.config.multigroup != multigroup {
            info!(multigroup, "Updating project layout");
        }
        inv.config.multigroup = multigroup;
        Ok(())
    }
}
