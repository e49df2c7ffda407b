//! Tool configuration.
//!
//! [`AppConfig`] is loaded once at startup. Sources, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. `config.toml` in the platform config directory, or the file given with
//!    `--config` (which must then exist)
//! 3. `KUBESCAFF_*` environment variables, `__` separating sections, e.g.
//!    `KUBESCAFF_PROJECT__DEFAULT_VERSION=3-alpha`
//!
//! Command-line flags override all of these at the call site.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "KUBESCAFF";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub project: ProjectDefaults,
    pub output: OutputConfig,
}

/// Defaults applied when a new project is initialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDefaults {
    /// Used when neither a PROJECT file nor `--project-version` names one.
    pub default_version: Option<String>,
    /// Used when `--plugins` is not given.
    pub plugins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

/// `KUBESCAFF_` prefix, `__` between nested keys.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

impl AppConfig {
    /// Loads configuration, layering file and environment over defaults.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let file = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::from(Self::config_path()).required(false),
        };
        Self::load_from(file, environment())
    }

    fn load_from(
        file: File<config::FileSourceFile, config::FileFormat>,
        env: Environment,
    ) -> anyhow::Result<Self> {
        let settings = Config::builder()
            .add_source(file)
            .add_source(
                env.try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("project.plugins"),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Default configuration file location.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("io", "kubescaff", "kubescaff")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".kubescaff.toml"))
    }
}
