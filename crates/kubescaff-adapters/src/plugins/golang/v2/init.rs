//! `init` for go/v2 projects.

use kubescaff_core::{
    application::{CommandContext, FlagSet, Invocation, Scaffold, Subcommand},
    domain::{FileBuilder, IfExistsAction, Universe},
    error::KsResult,
};
use tracing::info;

use super::templates as t;
use crate::plugins::common;

const MIN_GO_VERSION: (u64, u64) = (1, 13);

pub(super) struct InitSubcommand;

impl Subcommand for InitSubcommand {
    fn bind_flags(&self, flags: &mut FlagSet) {
        flags
            .bool("skip-go-version-check", false, "if specified, skip checking the Go version")
            .bool("fetch-deps", true, "ensure dependencies are downloaded")
            .string(
                "license",
                Some("apache2"),
                "license to use to boilerplate, may be one of 'apache2', 'none'",
            )
            .string("owner", None, "owner to add to the copyright")
            .string("project-name", None, "name of this project")
            .string(
                "repo",
                None,
                "name to use for go module (e.g., github.com/user/repo), \
                 defaults to the go package of the current working directory.",
            )
            .string("domain", Some("my.domain"), "domain for groups");
    }

    fn update_context(&self, ctx: &mut CommandContext) {
        ctx.description = "Initialize a new project including vendor/ directory and Go package directories.

Writes the following files:
- a boilerplate license file
- a PROJECT file with the domain and repo
- a Makefile to build the project
- a go.mod with project dependencies
- a Kustomization.yaml for customizating manifests
- a main.go to run
"
        .into();
        ctx.examples = format!(
            "  # Scaffold a project using the apache2 license with \"The Kubernetes authors\" as owners
  {0} init --project-version=2 --domain example.org --license apache2 --owner \"The Kubernetes authors\"
",
            ctx.command_name
        );
    }

    fn run(&mut self, inv: &mut Invocation<'_>) -> KsResult<()> {
        let ports = inv.ports;
        let flags = inv.flags;

        if !flags.bool("skip-go-version-check") {
            common::check_go_version(ports.runner.as_ref(), MIN_GO_VERSION)?;
        }

        let project_name = common::resolve_project_name(flags, &ports.working_dir)?;
        inv.config.repo = common::resolve_repo(flags, ports.filesystem.as_ref())?;
        inv.config.domain = flags.string_or_empty("domain");

        let boilerplate = common::boilerplate(
            flags.string("license").unwrap_or("apache2"),
            &flags.string_or_empty("owner"),
        )?;

        let builders: Vec<FileBuilder> = [
            FileBuilder::template(common::BOILERPLATE_PATH, "{{ boilerplate }}\n"),
            FileBuilder::template("go.mod", t::GO_MOD).if_exists(IfExistsAction::Skip),
            FileBuilder::template("Makefile", t::MAKEFILE),
            FileBuilder::template("Dockerfile", t::DOCKERFILE),
            FileBuilder::template(".gitignore", t::GITIGNORE).if_exists(IfExistsAction::Skip),
            FileBuilder::template("main.go", t::MAIN_GO),
            FileBuilder::template("config/default/kustomization.yaml", t::DEFAULT_KUSTOMIZATION),
            FileBuilder::template("config/manager/kustomization.yaml", t::MANAGER_KUSTOMIZATION),
            FileBuilder::template("config/manager/manager.yaml", t::MANAGER_YAML),
            FileBuilder::template("config/rbac/kustomization.yaml", t::RBAC_KUSTOMIZATION),
            FileBuilder::template("config/rbac/role_binding.yaml", t::RBAC_ROLE_BINDING),
        ]
        .into_iter()
        .map(|b| b.with_data("project_name", project_name.as_str()))
        .collect();

        let mut universe = Universe::new(inv.config.clone()).with_boilerplate(boilerplate);
        Scaffold::from_ports(ports).execute(&mut universe, &builders)?;
        info!(project = %project_name, "Project scaffolded");
        Ok(())
    }

    fn post_scaffold(&mut self, inv: &Invocation<'_>) -> KsResult<()> {
        if inv.flags.bool("fetch-deps") {
            inv.ports
                .runner
                .run("Fetching dependencies", "go", &["mod", "tidy"])?;
        }
        Ok(())
    }
}
