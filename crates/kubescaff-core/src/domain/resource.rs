//! API resources targeted by `create api` / `create webhook`.

use serde::Serialize;

use super::{
    DomainError, Gvk, ProjectConfig,
    validation::{is_api_version, is_dns1035_label, is_dns1123_subdomain, is_dns1123_label},
};

/// Raw resource options as supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceOptions {
    pub group: String,
    pub version: String,
    pub kind: String,
    /// Explicit plural; derived from `kind` when `None`.
    pub plural: Option<String>,
    pub namespaced: bool,
}

/// A validated resource enriched with derived naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub group: String,
    pub version: String,
    pub kind: String,
    pub plural: String,
    pub namespaced: bool,
    /// Project domain the group lives under.
    pub domain: String,
    /// Group name usable as a Go package (dots removed).
    pub group_package_name: String,
    /// Go import alias for the API package.
    pub import_alias: String,
    /// Whether the controller gets an example reconcile body.
    pub create_example_reconcile_body: bool,
}

impl ResourceOptions {
    pub fn new(group: impl Into<String>, version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
            plural: None,
            namespaced: true,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let invalid = |field: &'static str, reason: String| DomainError::InvalidResource { field, reason };

        if self.group.is_empty() {
            return Err(invalid("group", "group cannot be empty".into()));
        }
        if self.version.is_empty() {
            return Err(invalid("version", "version cannot be empty".into()));
        }
        if self.kind.is_empty() {
            return Err(invalid("kind", "kind cannot be empty".into()));
        }

        is_dns1123_subdomain(&self.group)
            .map_err(|e| invalid("group", format!("group name is invalid: ({e})")))?;

        if !is_api_version(&self.version) {
            return Err(invalid(
                "version",
                format!(
                    r"version must match ^v\d+(?:alpha\d+|beta\d+)?$ (was {})",
                    self.version
                ),
            ));
        }

        if !self.kind.starts_with(|c: char| c.is_ascii_uppercase()) {
            return Err(invalid(
                "kind",
                "kind must start with an uppercase character".into(),
            ));
        }
        is_dns1035_label(&self.kind.to_lowercase())
            .map_err(|e| invalid("kind", format!("invalid Kind: {e}")))?;

        if let Some(plural) = &self.plural {
            is_dns1123_label(plural)
                .map_err(|e| invalid("plural", format!("invalid plural: {e}")))?;
        }

        Ok(())
    }

    /// Resolve the options against a project into a [`Resource`].
    pub fn into_resource(self, config: &ProjectConfig, create_example_reconcile_body: bool) -> Resource {
        let plural = self.plural.unwrap_or_else(|| pluralize(&self.kind));
        let group_package_name = self.group.replace('.', "");
        let import_alias = format!("{group_package_name}{}", self.version).to_lowercase();
        Resource {
            group: self.group,
            version: self.version,
            kind: self.kind,
            plural,
            namespaced: self.namespaced,
            domain: config.domain.clone(),
            group_package_name,
            import_alias,
            create_example_reconcile_body,
        }
    }
}

impl Resource {
    pub fn gvk(&self) -> Gvk {
        Gvk::new(&self.group, &self.version, &self.kind)
    }

    /// `group.domain`, or the bare group without a domain.
    pub fn qualified_group(&self) -> String {
        if self.domain.is_empty() {
            self.group.clone()
        } else {
            format!("{}.{}", self.group, self.domain)
        }
    }
}

/// Lowercase English plural of a Kind.
pub fn pluralize(kind: &str) -> String {
    let lower = kind.to_lowercase();
    if let Some(stem) = lower.strip_suffix('y') {
        if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{stem}ies");
        }
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
        return format!("{lower}es");
    }
    format!("{lower}s")
}
