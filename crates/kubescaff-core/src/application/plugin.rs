//! Plugin contracts.
//!
//! A [`Plugin`] declares its identity and which subcommands it can serve.
//! Capabilities are discovered through the optional getters (`init`,
//! `create_api`, ...): a plugin that does not override a getter does not
//! provide that capability.

use std::collections::{BTreeMap, BTreeSet};

use crate::application::ports::{Ports, TemplateRenderer};
use crate::domain::{ProjectConfig, Universe, plugin_key};
use crate::error::KsResult;

/// A versioned, named provider of scaffolding subcommands.
pub trait Plugin: Send + Sync {
    /// Fully qualified or short plugin name, e.g. `go.kubebuilder.io`.
    fn name(&self) -> &str;

    /// Plugin version, e.g. `2.0.0`.
    fn version(&self) -> &str;

    /// Project versions this plugin scaffolds for.
    fn supported_project_versions(&self) -> &[&str];

    fn init(&self) -> Option<Box<dyn Subcommand>> {
        None
    }

    fn create_api(&self) -> Option<Box<dyn Subcommand>> {
        None
    }

    fn create_webhook(&self) -> Option<Box<dyn Subcommand>> {
        None
    }

    fn edit(&self) -> Option<Box<dyn Subcommand>> {
        None
    }

    /// A notice shown whenever this plugin is selected.
    fn deprecation_warning(&self) -> Option<&str> {
        None
    }
}

/// `name/v<version>` for a plugin.
pub fn key_for(plugin: &dyn Plugin) -> String {
    plugin_key::key(plugin.name(), plugin.version())
}

/// One plugin-provided subcommand.
///
/// The binder calls `bind_flags`, then `update_context`; on execution it
/// calls `run`, persists the project configuration, then `post_scaffold`.
pub trait Subcommand: Send {
    fn bind_flags(&self, flags: &mut FlagSet);

    fn update_context(&self, ctx: &mut CommandContext);

    fn run(&mut self, inv: &mut Invocation<'_>) -> KsResult<()>;

    fn post_scaffold(&mut self, _inv: &Invocation<'_>) -> KsResult<()> {
        Ok(())
    }
}

/// A pass that rewrites the universe after builders have run.
pub trait TransformPlugin: Send + Sync {
    fn name(&self) -> &str;

    fn transform(&self, universe: &mut Universe, renderer: &dyn TemplateRenderer) -> KsResult<()>;
}

/// Help text a subcommand contributes to its command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandContext {
    /// Binary name used in examples.
    pub command_name: String,
    pub description: String,
    pub examples: String,
}

impl CommandContext {
    pub fn new(command_name: impl Into<String>) -> Self {
        Self {
            command_name: command_name.into(),
            ..Self::default()
        }
    }
}

/// The type and default of a flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagKind {
    Bool { default: bool },
    String { default: Option<String> },
}

/// A flag a subcommand accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    pub name: String,
    pub kind: FlagKind,
    pub help: String,
}

/// Declarative flag set filled by [`Subcommand::bind_flags`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    specs: Vec<FlagSpec>,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a boolean flag. Redeclaring a name replaces it.
    pub fn bool(&mut self, name: &str, default: bool, help: &str) -> &mut Self {
        self.push(FlagSpec {
            name: name.into(),
            kind: FlagKind::Bool { default },
            help: help.into(),
        })
    }

    /// Declare a string flag. Redeclaring a name replaces it.
    pub fn string(&mut self, name: &str, default: Option<&str>, help: &str) -> &mut Self {
        self.push(FlagSpec {
            name: name.into(),
            kind: FlagKind::String {
                default: default.map(str::to_string),
            },
            help: help.into(),
        })
    }

    fn push(&mut self, spec: FlagSpec) -> &mut Self {
        match self.specs.iter_mut().find(|s| s.name == spec.name) {
            Some(slot) => *slot = spec,
            None => self.specs.push(spec),
        }
        self
    }

    pub fn specs(&self) -> &[FlagSpec] {
        &self.specs
    }

    pub fn lookup(&self, name: &str) -> Option<&FlagSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    /// Values holding every declared default, none marked as changed.
    pub fn defaults(&self) -> FlagValues {
        let mut values = FlagValues::default();
        for spec in &self.specs {
            match &spec.kind {
                FlagKind::Bool { default } => {
                    values.set(&spec.name, FlagValue::Bool(*default), false);
                }
                FlagKind::String { default: Some(d) } => {
                    values.set(&spec.name, FlagValue::String(d.clone()), false);
                }
                FlagKind::String { default: None } => {}
            }
        }
        values
    }
}

/// A parsed flag value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Bool(bool),
    String(String),
}

/// Parsed flag values, with a record of which were given explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagValues {
    values: BTreeMap<String, FlagValue>,
    changed: BTreeSet<String>,
}

impl FlagValues {
    pub fn set(&mut self, name: &str, value: FlagValue, changed: bool) {
        self.values.insert(name.to_string(), value);
        if changed {
            self.changed.insert(name.to_string());
        } else {
            self.changed.remove(name);
        }
    }

    /// Builder-style [`set`](Self::set) marking the value as changed.
    #[must_use]
    pub fn with(mut self, name: &str, value: FlagValue) -> Self {
        self.set(name, value, true);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.values.get(name)
    }

    pub fn bool(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(FlagValue::Bool(true)))
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(FlagValue::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// String value or the empty string.
    pub fn string_or_empty(&self, name: &str) -> String {
        self.string(name).unwrap_or_default().to_string()
    }

    /// `true` if the flag was given on the command line.
    pub fn changed(&self, name: &str) -> bool {
        self.changed.contains(name)
    }
}

/// Everything a subcommand's run hook may touch.
pub struct Invocation<'a> {
    pub command_name: &'a str,
    pub project_version: &'a str,
    pub flags: &'a FlagValues,
    /// The configuration persisted after a successful run.
    pub config: &'a mut ProjectConfig,
    pub ports: &'a Ports,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_set_replaces_redeclared_names() {
        let mut fs = FlagSet::new();
        fs.bool("make", true, "run make").bool("make", false, "again");
        assert_eq!(fs.specs().len(), 1);
        assert_eq!(fs.lookup("make").unwrap().kind, FlagKind::Bool { default: false });
    }

    #[test]
    fn defaults_are_not_changed() {
        let mut fs = FlagSet::new();
        fs.bool("resource", true, "")
            .string("domain", Some("my.domain"), "")
            .string("repo", None, "");
        let values = fs.defaults();
        assert!(values.bool("resource"));
        assert!(!values.changed("resource"));
        assert_eq!(values.string("domain"), Some("my.domain"));
        assert_eq!(values.string("repo"), None);
        assert_eq!(values.string_or_empty("repo"), "");
    }

    #[test]
    fn explicit_values_are_changed() {
        let values = FlagValues::default().with("force", FlagValue::Bool(true));
        assert!(values.bool("force"));
        assert!(values.changed("force"));
        assert!(!values.bool("missing"));
    }
}
