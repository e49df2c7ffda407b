//! External command runner using std::process.

use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use kubescaff_core::{
    application::{ApplicationError, ports::CommandRunner},
    error::{KsResult, KubescaffError},
};
use tracing::{debug, info, instrument};

/// Runs tools such as `make` or `go mod tidy` in the project root.
///
/// Output is inherited so the user sees it directly. No timeout is applied.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    working_dir: PathBuf,
}

impl ProcessRunner {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }
}

impl ProcessRunner {
    fn command(&self, program: &str, args: &[&str]) -> Command {
        let mut command = Command::new(program);
        command.args(args).current_dir(&self.working_dir);
        command
    }
}

fn failed(description: &str, reason: String) -> KubescaffError {
    ApplicationError::ExternalCommandFailed {
        description: description.to_string(),
        reason,
    }
    .into()
}

fn check_status(description: &str, program: &str, status: ExitStatus) -> KsResult<()> {
    if status.success() {
        Ok(())
    } else {
        Err(failed(description, format!("{program} exited with {status}")))
    }
}

impl CommandRunner for ProcessRunner {
    #[instrument(skip(self, args), fields(program = %program))]
    fn run(&self, description: &str, program: &str, args: &[&str]) -> KsResult<()> {
        info!(args = ?args, "Running external command");
        let status = self
            .command(program, args)
            .status()
            .map_err(|e| failed(description, e.to_string()))?;
        check_status(description, program, status)
    }

    #[instrument(skip(self, args), fields(program = %program))]
    fn output(&self, description: &str, program: &str, args: &[&str]) -> KsResult<String> {
        debug!(args = ?args, "Capturing external command output");
        let output = self
            .command(program, args)
            .output()
            .map_err(|e| failed(description, e.to_string()))?;
        check_status(description, program, output.status)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
