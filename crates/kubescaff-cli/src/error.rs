//! CLI-level errors and how they reach the terminal.
//!
//! Everything the binary can fail with funnels into [`CliError`], which
//! knows its exit code and renders a short report with hints.

use std::error::Error;
use std::io;

use owo_colors::OwoColorize;
use thiserror::Error;

use kubescaff_core::error::{ErrorCategory as CoreCategory, KubescaffError};

pub type CliResult<T> = Result<T, CliError>;

type BoxedCause = Box<dyn Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Rejected before any plugin ran.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },

    /// The tool's own config.toml or KUBESCAFF_* environment was unusable.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },

    #[error(transparent)]
    Core(#[from] KubescaffError),

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: io::Error,
    },
}

impl From<io::Error> for CliError {
    fn from(source: io::Error) -> Self {
        let message = source.to_string();
        Self::IoError { message, source }
    }
}

/// Coarse classification driving the exit code and log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserError,
    NotFound,
    Configuration,
    Internal,
}

impl CliError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            source: None,
        }
    }

    /// Hints shown under the error message.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { .. } => vec!["Run the command with --help to see its flags".into()],
            Self::ConfigError { .. } => vec![
                "Check the file passed with --config, or the default config.toml".into(),
                "KUBESCAFF_* environment variables override file values".into(),
            ],
            Self::Core(inner) => inner.suggestions(),
            Self::IoError { .. } => vec!["Check that the project directory is writable".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        let inner = match self {
            Self::InvalidInput { .. } => return ErrorCategory::UserError,
            Self::ConfigError { .. } => return ErrorCategory::Configuration,
            Self::IoError { .. } => return ErrorCategory::Internal,
            Self::Core(inner) => inner,
        };
        if inner.is_fatal() {
            return ErrorCategory::Internal;
        }
        match inner.category() {
            CoreCategory::Validation => ErrorCategory::UserError,
            CoreCategory::NotFound => ErrorCategory::NotFound,
            CoreCategory::Configuration => ErrorCategory::Configuration,
            CoreCategory::External | CoreCategory::Internal => ErrorCategory::Internal,
        }
    }

    /// Process exit status: 2 user error, 3 not found, 4 configuration,
    /// 1 for everything else including plugin wiring failures.
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Multi-line report for stderr. With `verbose` the source chain is
    /// listed; without it a hint about `--verbose` closes the report.
    pub fn render(&self, verbose: bool, color: bool) -> String {
        let paint = |text: &str, style: fn(&str) -> String| {
            if color { style(text) } else { text.to_string() }
        };

        let mut lines = vec![
            String::new(),
            format!("{} {self}", paint("Error:", |t| t.red().bold().to_string())),
        ];

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                let line = format!("  Caused by: {err}");
                lines.push(paint(&line, |t| t.dimmed().to_string()));
                cause = err.source();
            }
        }

        let hints = self.suggestions();
        if !hints.is_empty() {
            lines.push(String::new());
            lines.push(paint("Suggestions:", |t| t.yellow().bold().to_string()));
            lines.extend(hints.iter().map(|h| format!("  {h}")));
        }

        if !verbose {
            lines.push(String::new());
            lines.push(paint("Use -v / --verbose for more details.", |t| {
                t.dimmed().to_string()
            }));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Records the failure in the log before it is printed.
    pub fn log(&self) {
        let chain = self.source().map(ToString::to_string);
        match self.category() {
            ErrorCategory::UserError | ErrorCategory::NotFound => {
                tracing::warn!(exit_code = self.exit_code(), cause = ?chain, "{self}")
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(exit_code = self.exit_code(), cause = ?chain, "{self}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubescaff_core::application::ApplicationError;

    fn from_app(err: ApplicationError) -> CliError {
        CliError::Core(err.into())
    }

    #[test]
    fn project_state_errors_exit_with_two() {
        for err in [
            ApplicationError::AlreadyInitialized,
            ApplicationError::NotInitialized { command: "edit" },
        ] {
            assert_eq!(from_app(err).exit_code(), 2);
        }
    }

    #[test]
    fn duplicate_providers_exit_with_one() {
        let err = from_app(ApplicationError::DuplicateCapability {
            capability: "init",
            project_version: "2".into(),
            plugins: vec!["a/v1".into(), "b/v1".into()],
        });
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn missing_project_file_exits_with_three() {
        let err = from_app(ApplicationError::ConfigNotFound {
            path: "PROJECT".into(),
        });
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn tool_config_and_io_codes() {
        let config = CliError::ConfigError {
            message: "bad toml".into(),
            source: None,
        };
        assert_eq!(config.exit_code(), 4);
        assert_eq!(CliError::from(io::Error::other("disk")).exit_code(), 1);
    }

    #[test]
    fn core_message_passes_through() {
        assert_eq!(
            from_app(ApplicationError::AlreadyInitialized).to_string(),
            "failed to initialize project because project is already initialized"
        );
    }

    #[test]
    fn plain_report_has_hints_and_verbose_tip() {
        let report = CliError::invalid_input("bad").render(false, false);
        assert!(report.contains("Error: Invalid input: bad"));
        assert!(report.contains("Suggestions:"));
        assert!(report.contains("--verbose"));
    }

    #[test]
    fn verbose_report_walks_the_cause_chain() {
        let err = CliError::IoError {
            message: "reading PROJECT".into(),
            source: io::Error::other("denied"),
        };
        let report = err.render(true, false);
        assert!(report.contains("Caused by: denied"));
        assert!(!report.contains("Use -v"));
    }
}
