//! Plugin identity: names, versions and their `name/vX.Y` key form.

use std::cmp::Ordering;

use super::{
    DomainError,
    validation::{validate_name, validate_version},
};

/// Suffix appended to undotted plugin names before comparison.
pub const DEFAULT_NAME_QUALIFIER: &str = ".kubebuilder.io";

/// Joins a plugin name and version into `name/v<version>`.
///
/// A leading `v` on `version` is not doubled. An empty version yields the
/// bare name.
pub fn key(name: &str, version: &str) -> String {
    if version.is_empty() {
        return name.to_string();
    }
    let version = version.strip_prefix('v').unwrap_or(version);
    format!("{name}/v{version}")
}

/// Splits a key fragment into `(name, version)` at the first `/`.
///
/// The returned version has its leading `v` stripped; it is empty when the
/// fragment carries no version.
pub fn split_key(key: &str) -> (&str, &str) {
    match key.split_once('/') {
        Some((name, version)) => (name, version.strip_prefix('v').unwrap_or(version)),
        None => (key, ""),
    }
}

/// The portion of `name` before its first `.`.
pub fn short_name(name: &str) -> &str {
    name.split_once('.').map_or(name, |(short, _)| short)
}

/// Fully qualifies `name` with [`DEFAULT_NAME_QUALIFIER`] if it has no dot.
pub fn qualified_name(name: &str) -> String {
    if name.contains('.') {
        name.to_string()
    } else {
        format!("{name}{DEFAULT_NAME_QUALIFIER}")
    }
}

/// `true` if both names are the same after default qualification.
pub fn names_equal(a: &str, b: &str) -> bool {
    qualified_name(a) == qualified_name(b)
}

/// Orders two names after default qualification.
pub fn cmp_names(a: &str, b: &str) -> Ordering {
    qualified_name(a).cmp(&qualified_name(b))
}

/// Validates a full key fragment: its name and, if present, its version.
pub fn validate_key(fragment: &str) -> Result<(), DomainError> {
    let (name, version) = split_key(fragment);
    if name.is_empty() {
        return Err(DomainError::InvalidPluginKey {
            key: fragment.into(),
            reason: "plugin key must at least have a name".into(),
        });
    }
    validate_name(name)?;
    if fragment.contains('/') {
        validate_version(version)?;
    }
    Ok(())
}
