//! Name and version grammars shared by plugins, projects and resources.
//!
//! Two version checkers live side by side: [`validate_version`] is the
//! tolerant semver check applied to plugin versions and `--plugins` keys,
//! while [`validate_version_strict`] only admits `v?MAJOR.MINOR` and guards
//! toolchain versions reported by external tools.

use std::sync::OnceLock;

use regex::Regex;

use super::DomainError;

const DNS1123_SUBDOMAIN_MAX_LEN: usize = 253;
const DNS1123_LABEL_MAX_LEN: usize = 63;

fn dns1123_subdomain() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
            .expect("valid regex")
    })
}

fn dns1123_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("valid regex"))
}

fn dns1035_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z]([-a-z0-9]*[a-z0-9])?$").expect("valid regex"))
}

fn project_version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[1-9][0-9]*(-(alpha|beta))?$").expect("valid regex"))
}

fn strict_version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^v?(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)$").expect("valid regex"))
}

fn api_version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^v\d+(?:alpha\d+|beta\d+)?$").expect("valid regex"))
}

/// Checks `value` against the DNS-1123 subdomain grammar.
pub fn is_dns1123_subdomain(value: &str) -> Result<(), String> {
    if value.len() > DNS1123_SUBDOMAIN_MAX_LEN {
        return Err(format!(
            "must be no more than {DNS1123_SUBDOMAIN_MAX_LEN} characters"
        ));
    }
    if !dns1123_subdomain().is_match(value) {
        return Err("a DNS-1123 subdomain must consist of lower case alphanumeric characters, \
                    '-' or '.', and must start and end with an alphanumeric character"
            .into());
    }
    Ok(())
}

/// Checks `value` against the DNS-1123 label grammar.
pub fn is_dns1123_label(value: &str) -> Result<(), String> {
    if value.len() > DNS1123_LABEL_MAX_LEN {
        return Err(format!("must be no more than {DNS1123_LABEL_MAX_LEN} characters"));
    }
    if !dns1123_label().is_match(value) {
        return Err("a DNS-1123 label must consist of lower case alphanumeric characters or '-', \
                    and must start and end with an alphanumeric character"
            .into());
    }
    Ok(())
}

/// Checks `value` against the DNS-1035 label grammar.
pub fn is_dns1035_label(value: &str) -> Result<(), String> {
    if value.len() > DNS1123_LABEL_MAX_LEN {
        return Err(format!("must be no more than {DNS1123_LABEL_MAX_LEN} characters"));
    }
    if !dns1035_label().is_match(value) {
        return Err("a DNS-1035 label must consist of lower case alphanumeric characters or '-', \
                    start with an alphabetic character, and end with an alphanumeric character"
            .into());
    }
    Ok(())
}

/// `true` if `version` looks like a Kubernetes API version (`v1`, `v1beta1`).
pub fn is_api_version(version: &str) -> bool {
    api_version_re().is_match(version)
}

/// Validates a plugin name.
pub fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.is_empty() {
        return Err(DomainError::InvalidPluginName {
            name: name.into(),
            reason: "name cannot be empty".into(),
        });
    }
    is_dns1123_subdomain(name).map_err(|reason| DomainError::InvalidPluginName {
        name: name.into(),
        reason,
    })
}

/// Parses a plugin version with the tolerant grammar.
///
/// Accepts a leading `v` and fills in a missing minor or patch component,
/// so `1`, `v1.2` and `1.2.3` all parse.
pub fn parse_version(version: &str) -> Result<semver::Version, DomainError> {
    let invalid = |reason: String| DomainError::InvalidPluginVersion {
        version: version.into(),
        reason,
    };

    let trimmed = version.strip_prefix('v').unwrap_or(version);
    if trimmed.is_empty() {
        return Err(invalid("version cannot be empty".into()));
    }

    // Split off pre-release/build metadata so only the numeric core is padded.
    let split_at = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, rest) = trimmed.split_at(split_at);
    let normalized = match core.split('.').count() {
        1 => format!("{core}.0.0{rest}"),
        2 => format!("{core}.0{rest}"),
        _ => trimmed.to_string(),
    };

    semver::Version::parse(&normalized).map_err(|e| invalid(e.to_string()))
}

/// Validates a plugin version with the tolerant semver grammar.
pub fn validate_version(version: &str) -> Result<(), DomainError> {
    parse_version(version).map(|_| ())
}

/// Validates a plugin version that must be exactly `v?MAJOR.MINOR`.
pub fn validate_version_strict(version: &str) -> Result<(), DomainError> {
    if strict_version_re().is_match(version) {
        return Ok(());
    }
    Err(DomainError::InvalidPluginVersion {
        version: version.into(),
        reason: "version must be of the form v<major>.<minor>".into(),
    })
}

/// Validates a project version such as `2` or `3-alpha`.
pub fn validate_project_version(version: &str) -> Result<(), DomainError> {
    if version.is_empty() {
        return Err(DomainError::InvalidProjectVersion {
            version: version.into(),
            reason: "project version is empty".into(),
        });
    }
    if !project_version_re().is_match(version) {
        return Err(DomainError::InvalidProjectVersion {
            version: version.into(),
            reason: format!("must match {}", project_version_re().as_str()),
        });
    }
    Ok(())
}

/// Validates a project name used for generated manifests.
pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
    is_dns1123_label(name).map_err(|reason| DomainError::InvalidProjectName {
        name: name.into(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_names() {
        assert!(validate_name("go").is_ok());
        assert!(validate_name("go.kubebuilder.io").is_ok());
        assert!(validate_name("my-plugin.example.com").is_ok());

        assert!(validate_name("").is_err());
        assert!(validate_name("Go").is_err());
        assert!(validate_name("-go").is_err());
        assert!(validate_name("go.").is_err());
        assert!(validate_name("go/v1").is_err());
        assert!(validate_name(&"a".repeat(254)).is_err());
    }

    #[test]
    fn tolerant_versions() {
        for ok in ["1", "v1", "v1.2", "1.2.3", "v2.0.0", "3", "1.0.0-alpha"] {
            assert!(validate_version(ok).is_ok(), "{ok} should be accepted");
        }
        for bad in ["", "v", "abc", "1.x", "v1.2.3.4"] {
            assert!(validate_version(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn tolerant_parse_pads_components() {
        let v = parse_version("v2").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (2, 0, 0));
        let v = parse_version("1.3").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 3, 0));
    }

    #[test]
    fn strict_versions() {
        assert!(validate_version_strict("v1.2").is_ok());
        assert!(validate_version_strict("2.0").is_ok());

        assert!(validate_version_strict("1.2.3").is_err());
        assert!(validate_version_strict("v1").is_err());
        assert!(validate_version_strict("").is_err());
        assert!(validate_version_strict("abc").is_err());
    }

    #[test]
    fn project_versions() {
        for ok in ["1", "2", "3-alpha", "10-beta"] {
            assert!(validate_project_version(ok).is_ok(), "{ok}");
        }
        for bad in ["0", "v2", "3-gamma", "2.0", "-alpha"] {
            assert!(validate_project_version(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn empty_project_version_has_dedicated_message() {
        let err = validate_project_version("").unwrap_err();
        assert!(err.to_string().contains("project version is empty"));
    }

    #[test]
    fn api_versions() {
        assert!(is_api_version("v1"));
        assert!(is_api_version("v1beta1"));
        assert!(is_api_version("v2alpha3"));
        assert!(!is_api_version("1"));
        assert!(!is_api_version("v1beta"));
    }

    #[test]
    fn project_names() {
        assert!(validate_project_name("guestbook").is_ok());
        assert!(validate_project_name("guest-book2").is_ok());
        assert!(validate_project_name(".tmpdir").is_err());
        assert!(validate_project_name("Guestbook").is_err());
    }
}
