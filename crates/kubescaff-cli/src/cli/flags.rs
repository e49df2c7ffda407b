//! Conversion between plugin flag declarations and clap arguments.

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches};
use kubescaff_core::application::{FlagKind, FlagSet, FlagSpec, FlagValue, FlagValues};

/// A clap argument for one plugin flag.
///
/// Booleans take an optional `=value` so both `--force` and
/// `--force=false` parse.
pub fn to_arg(spec: &FlagSpec) -> Arg {
    let arg = Arg::new(spec.name.clone())
        .long(spec.name.clone())
        .help(spec.help.clone());

    match &spec.kind {
        FlagKind::Bool { default } => arg
            .action(ArgAction::Set)
            .value_parser(clap::value_parser!(bool))
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .default_value(if *default { "true" } else { "false" }),
        FlagKind::String { default } => {
            let arg = arg.action(ArgAction::Set).value_name("STRING");
            match default {
                Some(value) => arg.default_value(value.clone()),
                None => arg,
            }
        }
    }
}

/// Every flag in `flags` as a clap argument.
pub fn to_args(flags: &FlagSet) -> Vec<Arg> {
    flags.specs().iter().map(to_arg).collect()
}

/// Reads the values for `flags` back out of parsed matches.
///
/// A flag counts as changed only when it was given on the command line.
pub fn values(flags: &FlagSet, matches: &ArgMatches) -> FlagValues {
    let mut values = flags.defaults();
    for spec in flags.specs() {
        let changed = matches.value_source(&spec.name) == Some(ValueSource::CommandLine);
        let value = match spec.kind {
            FlagKind::Bool { .. } => matches
                .get_one::<bool>(&spec.name)
                .map(|v| FlagValue::Bool(*v)),
            FlagKind::String { .. } => matches
                .get_one::<String>(&spec.name)
                .map(|v| FlagValue::String(v.clone())),
        };
        if let Some(value) = value {
            values.set(&spec.name, value, changed);
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Command;

    fn flags() -> FlagSet {
        let mut flags = FlagSet::new();
        flags
            .bool("force", false, "overwrite")
            .bool("make", true, "run make")
            .string("group", None, "resource group")
            .string("domain", Some("my.domain"), "domain");
        flags
    }

    fn parse(args: &[&str]) -> FlagValues {
        let flags = flags();
        let cmd = Command::new("api").args(to_args(&flags));
        let matches = cmd
            .try_get_matches_from(std::iter::once("api").chain(args.iter().copied()))
            .unwrap();
        values(&flags, &matches)
    }

    #[test]
    fn defaults_are_unchanged() {
        let values = parse(&[]);
        assert!(!values.bool("force"));
        assert!(values.bool("make"));
        assert_eq!(values.string("domain"), Some("my.domain"));
        assert!(values.string("group").is_none());
        assert!(!values.changed("make"));
        assert!(!values.changed("domain"));
    }

    #[test]
    fn bare_bool_means_true() {
        let values = parse(&["--force"]);
        assert!(values.bool("force"));
        assert!(values.changed("force"));
    }

    #[test]
    fn explicit_false_is_a_change() {
        let values = parse(&["--make=false"]);
        assert!(!values.bool("make"));
        assert!(values.changed("make"));
    }

    #[test]
    fn strings_are_read() {
        let values = parse(&["--group", "ship", "--domain=example.com"]);
        assert_eq!(values.string("group"), Some("ship"));
        assert_eq!(values.string("domain"), Some("example.com"));
        assert!(values.changed("group"));
    }
}
