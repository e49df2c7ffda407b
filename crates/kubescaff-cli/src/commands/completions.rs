//! Shell completion generation.

use clap::Command;
use clap_complete::{Shell, generate};

use crate::cli::BIN_NAME;
use crate::error::CliResult;

/// Writes completions for the tree as built for this invocation.
pub fn execute(shell: Shell, command: &mut Command) -> CliResult<()> {
    generate(shell, command, BIN_NAME, &mut std::io::stdout());
    Ok(())
}
