//! # kubescaff
//!
//! Scaffolds Kubernetes operator projects through versioned plugins.
//!
//! ## Startup sequence
//!
//! 1. Pre-scan `--project-version`, `--plugins` and `--config`.
//! 2. Load the tool configuration (file + env + defaults).
//! 3. Read the PROJECT file, pick the project version and bind plugins.
//! 4. Build the command tree and parse the full command line.
//! 5. Initialise logging and output, print deprecation notices.
//! 6. Dispatch, then translate any [`CliError`] into a message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                 |
//! |------|-------------------------|
//! |  0   | Success                 |
//! |  1   | Internal / system error |
//! |  2   | User / input error      |
//! |  3   | Resource not found      |
//! |  4   | Configuration error     |

use std::process::ExitCode;

use clap::FromArgMatches;
use clap_complete::Shell;
use tracing::{debug, info};

use kubescaff_adapters::builtin_registry;
use kubescaff_core::application::{Binder, key_for};

use crate::{
    cli::{BIN_NAME, CommandTree, GlobalArgs, base_flags},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
    workspace::Workspace,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod prompt;
mod workspace;

/// Plugins chosen for this invocation.
struct Selection {
    project_version: String,
    plugins: Vec<String>,
    notices: Vec<String>,
}

fn main() -> ExitCode {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().collect();
    match run(&args) {
        Ok(code) => code,
        Err(e) => handle_error(e, wants_verbose_errors(&args)),
    }
}

fn run(args: &[String]) -> CliResult<ExitCode> {
    let base = base_flags::scan(args.get(1..).unwrap_or_default())?;

    let config = AppConfig::load(base.config.as_deref()).map_err(|e| CliError::ConfigError {
        message: format!("{e:#}"),
        source: Some(e.into()),
    })?;

    let workspace = Workspace::open(std::env::current_dir()?);
    let registry = builtin_registry(BIN_NAME)?;
    let existing = workspace.store().load()?;
    let configured = existing.is_some();

    let (mut tree, selection) = if base.wants_generic_help() && !configured {
        (
            CommandTree::generic(&registry.available_project_versions()),
            None,
        )
    } else {
        let project_version = existing
            .map(|c| c.version)
            .or(base.project_version)
            .or(config.project.default_version.clone())
            .unwrap_or_else(|| registry.default_project_version().to_string());
        let keys = if base.plugins.is_empty() {
            base_flags::parse_plugin_keys(config.project.plugins.clone())?
        } else {
            base.plugins
        };

        let binder = Binder::new(&registry, &project_version, &keys, configured)?;
        let selection = Selection {
            plugins: binder.plugins().iter().map(|p| key_for(p.as_ref())).collect(),
            notices: binder.deprecation_notices(),
            project_version,
        };
        (CommandTree::bound(&binder)?, Some(selection))
    };

    let matches = match tree.command.try_get_matches_from_mut(args) {
        Ok(matches) => matches,
        Err(e) => {
            e.print()?;
            return Ok(ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(2)));
        }
    };

    let global = GlobalArgs::from_arg_matches(&matches)
        .map_err(|e| CliError::invalid_input(e.to_string()))?;
    if let Err(e) = init_logging(&global) {
        eprintln!("Failed to initialise logging: {e}");
        return Ok(ExitCode::from(1));
    }
    debug!(configured, verbose = global.verbose, "CLI started");

    let output = OutputManager::new(&global, &config);
    if let Some(selection) = &selection {
        for notice in &selection.notices {
            output.warning(notice)?;
        }
    }

    match matches.subcommand() {
        Some(("version", _)) => commands::version::execute(
            &output,
            selection.as_ref().map(|s| s.project_version.as_str()),
            selection.as_ref().map(|s| s.plugins.as_slice()).unwrap_or_default(),
        )?,
        Some(("completions", sub)) => {
            let shell = sub
                .get_one::<Shell>("shell")
                .copied()
                .ok_or_else(|| CliError::invalid_input("a shell is required"))?;
            commands::completions::execute(shell, &mut tree.command)?;
        }
        _ => {
            let (capability, sub) = cli::capability_of(&matches)
                .ok_or_else(|| CliError::invalid_input("unknown command"))?;
            let slot = tree
                .take(capability)
                .ok_or_else(|| CliError::invalid_input(format!("{capability} is unavailable")))?;
            commands::scaffold::execute(capability, slot, sub, &workspace, &output)?;
        }
    }

    info!("kubescaff completed successfully");
    Ok(ExitCode::SUCCESS)
}

/// `-vv`-style flags before parsing succeeded or failed.
fn wants_verbose_errors(args: &[String]) -> bool {
    args.iter().skip(1).any(|a| {
        a == "--verbose" || (a.len() > 1 && a.starts_with('-') && a[1..].chars().all(|c| c == 'v'))
    })
}

/// Writes the error to stderr and picks the exit code.
fn handle_error(err: CliError, verbose: bool) -> ExitCode {
    err.log();

    let color = std::io::IsTerminal::is_terminal(&std::io::stderr());
    eprint!("{}", err.render(verbose, color));

    ExitCode::from(err.exit_code())
}
