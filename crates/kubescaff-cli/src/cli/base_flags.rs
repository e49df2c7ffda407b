//! Pre-scan of raw arguments for the flags that decide how the command tree
//! is built.
//!
//! The project version and plugin keys must be known before clap sees the
//! arguments, because they select which plugins contribute commands and
//! flags. Unknown arguments are ignored here; clap reports them later.

use std::collections::BTreeSet;
use std::path::PathBuf;

use kubescaff_core::application::ApplicationError;
use kubescaff_core::domain::plugin_key;

use crate::error::{CliError, CliResult};

pub const PROJECT_VERSION_FLAG: &str = "project-version";
pub const PLUGINS_FLAG: &str = "plugins";

/// Flags read ahead of full argument parsing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BaseFlags {
    pub project_version: Option<String>,
    pub plugins: Vec<String>,
    pub config: Option<PathBuf>,
    pub help: bool,
}

impl BaseFlags {
    /// Help was asked for without choosing a project version.
    pub fn wants_generic_help(&self) -> bool {
        self.help && self.project_version.is_none()
    }
}

/// Scans `args` (without the program name).
pub fn scan<S: AsRef<str>>(args: &[S]) -> CliResult<BaseFlags> {
    let mut flags = BaseFlags::default();
    let mut keys = Vec::new();

    let mut rest = args.iter().map(AsRef::as_ref);
    while let Some(arg) = rest.next() {
        if arg == "--" {
            break;
        }
        if arg == "-h" || arg == "--help" {
            flags.help = true;
        } else if let Some(value) = value_of(arg, PROJECT_VERSION_FLAG, None, &mut rest)? {
            flags.project_version = Some(value);
        } else if let Some(value) = value_of(arg, PLUGINS_FLAG, None, &mut rest)? {
            keys.extend(value.split(',').map(str::trim).map(str::to_string));
        } else if let Some(value) = value_of(arg, "config", Some('c'), &mut rest)? {
            flags.config = Some(PathBuf::from(value));
        }
    }

    flags.plugins = parse_plugin_keys(keys)?;
    Ok(flags)
}

/// Checks every key and rejects two keys naming the same plugin.
pub fn parse_plugin_keys(keys: Vec<String>) -> CliResult<Vec<String>> {
    let mut names = BTreeSet::new();
    for key in &keys {
        let (name, _) = plugin_key::split_key(key);
        if name.is_empty() {
            return Err(CliError::invalid_input(format!(
                "plugin key {key:?} must at least have a name"
            )));
        }
        plugin_key::validate_key(key).map_err(kubescaff_core::error::KubescaffError::from)?;
        if !names.insert(name.to_string()) {
            return Err(CliError::Core(
                ApplicationError::DuplicatePluginKey {
                    name: name.to_string(),
                }
                .into(),
            ));
        }
    }
    Ok(keys)
}

/// The value of `--name <v>`, `--name=v` or `-s <v>`, if `arg` is that flag.
fn value_of<'a>(
    arg: &str,
    name: &str,
    short: Option<char>,
    rest: &mut impl Iterator<Item = &'a str>,
) -> CliResult<Option<String>> {
    let long = format!("--{name}");
    let is_short = short.is_some_and(|s| arg.len() == 2 && arg.starts_with('-') && arg.ends_with(s));

    if arg == long || is_short {
        return rest
            .next()
            .map(|value| Some(value.to_string()))
            .ok_or_else(|| CliError::invalid_input(format!("flag needs an argument: --{name}")));
    }
    Ok(arg
        .strip_prefix(long.as_str())
        .and_then(|tail| tail.strip_prefix('='))
        .map(str::to_string))
}
