//! Arguments accepted by every command.
//!
//! `--project-version`, `--plugins` and `--config` are also read by
//! [`super::base_flags::scan`] before the tree is built; they are declared
//! here so clap accepts them and renders them in help.

use clap::Args;
use clap::builder::FalseyValueParser;
use std::path::PathBuf;

use super::base_flags::{PLUGINS_FLAG, PROJECT_VERSION_FLAG};

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Project version used to pick plugins for a new project.
    #[arg(long = PROJECT_VERSION_FLAG, global = true, value_name = "VERSION")]
    pub project_version: Option<String>,

    /// Plugin keys to narrow the plugin set, e.g. `go/v2`.
    #[arg(
        long = PLUGINS_FLAG,
        global = true,
        value_name = "KEYS",
        value_delimiter = ',',
        action = clap::ArgAction::Append
    )]
    pub plugins: Vec<String>,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v info, -vv debug, -vvv trace)"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Only print errors"
    )]
    pub quiet: bool,

    /// Honours `NO_COLOR` (<https://no-color.org>). Empty or falsy values
    /// such as `0` or `false` leave colour on.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        value_parser = FalseyValueParser::new(),
        help = "Disable colored output"
    )]
    pub no_color: bool,

    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "kubescaff configuration file"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Output format"
    )]
    pub output_format: OutputFormat,
}

/// How command output is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human on a terminal, plain otherwise.
    #[default]
    Auto,
    Human,
    Plain,
    Json,
}

impl OutputFormat {
    /// Parses `output.format` from the config file; unknown names are `Auto`.
    pub fn from_config(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "human" => Self::Human,
            "plain" => Self::Plain,
            "json" => Self::Json,
            _ => Self::Auto,
        }
    }
}
