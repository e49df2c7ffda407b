//! Resolving user-supplied plugin key fragments against candidates.

use std::sync::Arc;

use tracing::{debug, instrument};

use super::ApplicationError;
use super::plugin::{Plugin, key_for};
use crate::domain::{plugin_key, validation};
use crate::error::KsResult;

/// Returns every candidate matching `key`.
///
/// `key` may be a short name (`go`), a full name (`go.kubebuilder.io`), or
/// either with a version (`go/v2`, `go.kubebuilder.io/v2.0`). A version
/// keeps candidates with the same major and minor, falling back to the
/// same major when no candidate matches exactly. Several survivors are
/// returned as-is; the caller decides whether that is ambiguous.
#[instrument(skip_all, fields(key = %key))]
pub fn resolve_plugins_by_key(
    candidates: &[Arc<dyn Plugin>],
    key: &str,
) -> KsResult<Vec<Arc<dyn Plugin>>> {
    let (name, version) = plugin_key::split_key(key);
    let raw_version = key.split_once('/').map_or("", |(_, v)| v);

    let mut matched: Vec<Arc<dyn Plugin>> = candidates.to_vec();
    if !version.is_empty() {
        let wanted = validation::parse_version(version)?;
        let (exact, major_only): (Vec<_>, Vec<_>) = matched
            .into_iter()
            .filter_map(|p| {
                let v = validation::parse_version(p.version()).ok()?;
                (v.major == wanted.major).then_some((p, v.minor == wanted.minor))
            })
            .partition(|(_, same_minor)| *same_minor);

        matched = (if exact.is_empty() { major_only } else { exact })
            .into_iter()
            .map(|(p, _)| p)
            .collect();

        if matched.is_empty() {
            return Err(ApplicationError::AmbiguousPluginVersion {
                version: raw_version.to_string(),
            }
            .into());
        }
    }

    let short = !name.contains('.');
    matched.retain(|p| {
        if short {
            plugin_key::short_name(p.name()) == name
        } else {
            p.name() == name
        }
    });

    if matched.is_empty() {
        return Err(ApplicationError::AmbiguousPluginName { name: name.to_string() }.into());
    }

    debug!(matches = matched.len(), "Resolved plugin key");
    Ok(matched)
}

/// Narrows `candidates` to the plugins selected by `--plugins` keys.
///
/// Every key must resolve to exactly one plugin. Keys resolving to several
/// are reported together in one [`ApplicationError::AmbiguousPlugins`].
/// An empty key list selects all candidates.
pub fn filter_plugins_by_keys(
    candidates: &[Arc<dyn Plugin>],
    keys: &[String],
) -> KsResult<Vec<Arc<dyn Plugin>>> {
    if keys.is_empty() {
        return Ok(candidates.to_vec());
    }

    let mut selected: Vec<Arc<dyn Plugin>> = Vec::new();
    let mut ambiguous = Vec::new();
    for key in keys {
        let matches = resolve_plugins_by_key(candidates, key)?;
        if let [only] = matches.as_slice() {
            if !selected.iter().any(|p| Arc::ptr_eq(p, only)) {
                selected.push(Arc::clone(only));
            }
        } else {
            let names: Vec<String> = matches.iter().map(|p| key_for(p.as_ref())).collect();
            ambiguous.push(format!("{key:?}: {}", names.join(", ")));
        }
    }

    if !ambiguous.is_empty() {
        return Err(ApplicationError::AmbiguousPlugins {
            details: ambiguous.join("; "),
        }
        .into());
    }
    Ok(selected)
}
