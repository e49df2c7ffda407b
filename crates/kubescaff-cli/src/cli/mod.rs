//! The command tree.
//!
//! Which commands and flags exist depends on the plugins serving the active
//! project version, so the tree is assembled at runtime with clap's builder
//! API from [`BoundCommand`]s. `version` and `completions` are fixed.

use clap::{Arg, ArgAction, ArgMatches, Args, Command};
use clap_complete::Shell;

use kubescaff_core::application::{Binder, BoundCommand, Capability};
use kubescaff_core::error::{KsResult, KubescaffError};

pub mod base_flags;
pub mod flags;
pub mod global;

pub use global::{GlobalArgs, OutputFormat};

pub const BIN_NAME: &str = "kubescaff";

const LONG_ABOUT: &str = "kubescaff scaffolds Kubernetes operator projects.

Commands and their flags are provided by versioned plugins. The version in \
the PROJECT file selects them for an existing project; new projects take \
--project-version, or the default version.";

const PROJECT_NOTE: &str =
    "For project-specific information, run this command in the root directory of a project.";

/// What backs a plugin command.
pub enum Slot {
    Bound(BoundCommand),
    /// No plugin serves the command for this project version.
    Unsupported(KubescaffError),
    /// Help-only placeholder used before a project version is chosen.
    Generic,
}

/// The clap command plus the plugin command behind each capability.
pub struct CommandTree {
    pub command: Command,
    slots: Vec<(Capability, Slot)>,
}

impl CommandTree {
    /// Binds every capability.
    ///
    /// Fatal wiring errors abort. A capability nobody serves still gets a
    /// command, which reports why when run.
    pub fn bound(binder: &Binder<'_>) -> KsResult<Self> {
        let mut slots = Vec::with_capacity(Capability::ALL.len());
        for capability in Capability::ALL {
            let slot = match binder.bind(capability) {
                Ok(bound) => Slot::Bound(bound),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => Slot::Unsupported(e),
            };
            slots.push((capability, slot));
        }
        Ok(Self::assemble(slots, &[]))
    }

    /// The tree shown for `--help` outside a project when no project version
    /// was given. `project_versions` feeds the `init` examples.
    pub fn generic(project_versions: &[&str]) -> Self {
        let slots = Capability::ALL.map(|c| (c, Slot::Generic)).into();
        Self::assemble(slots, project_versions)
    }

    /// Removes and returns the slot for `capability`.
    pub fn take(&mut self, capability: Capability) -> Option<Slot> {
        let index = self.slots.iter().position(|(c, _)| *c == capability)?;
        Some(self.slots.swap_remove(index).1)
    }

    fn assemble(slots: Vec<(Capability, Slot)>, project_versions: &[&str]) -> Self {
        let mut root = GlobalArgs::augment_args(
            Command::new(BIN_NAME)
                .version(env!("CARGO_PKG_VERSION"))
                .about("Scaffold Kubernetes operator projects")
                .long_about(LONG_ABOUT)
                .subcommand_required(true)
                .arg_required_else_help(true),
        );
        let generic = slots.iter().all(|(_, s)| matches!(s, Slot::Generic));
        if generic {
            root = root.after_help(PROJECT_NOTE);
        }

        let mut create = Command::new("create")
            .about("Scaffold a Kubernetes API or webhook")
            .subcommand_required(true)
            .arg_required_else_help(true);
        for (capability, slot) in &slots {
            let cmd = plugin_command(*capability, slot, project_versions);
            match capability {
                Capability::CreateApi | Capability::CreateWebhook => {
                    create = create.subcommand(cmd);
                }
                Capability::Init | Capability::Edit => root = root.subcommand(cmd),
            }
        }

        let command = root
            .subcommand(create)
            .subcommand(Command::new("version").about("Print the kubescaff version"))
            .subcommand(
                Command::new("completions")
                    .about("Generate shell completions")
                    .arg(
                        Arg::new("shell")
                            .required(true)
                            .value_parser(clap::value_parser!(Shell))
                            .help("Shell to generate completions for"),
                    ),
            );
        Self { command, slots }
    }
}

/// The capability a parsed command line selects, with its own matches.
pub fn capability_of(matches: &ArgMatches) -> Option<(Capability, &ArgMatches)> {
    match matches.subcommand()? {
        ("init", m) => Some((Capability::Init, m)),
        ("edit", m) => Some((Capability::Edit, m)),
        ("create", m) => match m.subcommand()? {
            ("api", m) => Some((Capability::CreateApi, m)),
            ("webhook", m) => Some((Capability::CreateWebhook, m)),
            _ => None,
        },
        _ => None,
    }
}

fn leaf_name(capability: Capability) -> &'static str {
    match capability {
        Capability::Init => "init",
        Capability::CreateApi => "api",
        Capability::CreateWebhook => "webhook",
        Capability::Edit => "edit",
    }
}

fn summary(capability: Capability) -> &'static str {
    match capability {
        Capability::Init => "Initialize a new project",
        Capability::CreateApi => "Scaffold a Kubernetes API",
        Capability::CreateWebhook => "Scaffold a webhook for an API resource",
        Capability::Edit => "Update the project configuration",
    }
}

fn plugin_command(capability: Capability, slot: &Slot, project_versions: &[&str]) -> Command {
    let cmd = Command::new(leaf_name(capability)).about(summary(capability));
    match slot {
        Slot::Bound(bound) => {
            let context = bound.context();
            let mut cmd = cmd.args(flags::to_args(bound.flags()));
            if !context.description.is_empty() {
                cmd = cmd.long_about(context.description.clone());
            }
            if !context.examples.is_empty() {
                cmd = cmd.after_help(format!("Examples:\n{}", context.examples));
            }
            cmd
        }
        Slot::Unsupported(err) => cmd.long_about(err.to_string()).arg(passthrough()),
        Slot::Generic if capability == Capability::Init => cmd
            .long_about(format!(
                "{}.\n\nFor further help about a specific project version, set --{}.",
                summary(capability),
                base_flags::PROJECT_VERSION_FLAG
            ))
            .after_help(generic_init_examples(project_versions))
            .arg(passthrough()),
        Slot::Generic => cmd.arg(passthrough()),
    }
}

fn generic_init_examples(project_versions: &[&str]) -> String {
    let mut text = String::from("Examples:\n");
    for version in project_versions {
        text.push_str(&format!(
            "  {BIN_NAME} init --{}={version} -h\n",
            base_flags::PROJECT_VERSION_FLAG
        ));
    }
    text
}

/// Swallows any arguments so placeholder commands reach dispatch or help.
fn passthrough() -> Arg {
    Arg::new("args")
        .num_args(0..)
        .action(ArgAction::Append)
        .trailing_var_arg(true)
        .allow_hyphen_values(true)
        .hide(true)
}
