//! The per-invocation scaffold universe.

use serde_json::{Value, json};

use super::{DomainError, ProjectConfig, Resource};

/// A file produced during a scaffold pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldFile {
    pub path: String,
    pub contents: String,
}

impl ScaffoldFile {
    pub fn new(path: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Shared context for one scaffold execution.
///
/// Built fresh before each pass and discarded afterwards. `files` records
/// every file the pass produced, in order, so transform plugins can inspect
/// and rewrite them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Universe {
    pub config: ProjectConfig,
    pub resource: Option<Resource>,
    pub boilerplate: String,
    pub files: Vec<ScaffoldFile>,
}

impl Universe {
    pub fn new(config: ProjectConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    #[must_use]
    pub fn with_boilerplate(mut self, boilerplate: impl Into<String>) -> Self {
        self.boilerplate = boilerplate.into();
        self
    }

    pub fn file(&self, path: &str) -> Option<&ScaffoldFile> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Appends `file` unless its path is already present.
    ///
    /// Returns `Ok(true)` if the file was added.
    pub fn add_file(&mut self, file: ScaffoldFile) -> Result<bool, DomainError> {
        if file.path.is_empty() {
            return Err(DomainError::EmptyFilePath);
        }
        if self.file(&file.path).is_some() {
            return Ok(false);
        }
        self.files.push(file);
        Ok(true)
    }

    /// Replaces the file at the same path, if any. Returns `true` on replace.
    pub fn replace_file_if_exists(&mut self, file: ScaffoldFile) -> bool {
        match self.files.iter_mut().find(|f| f.path == file.path) {
            Some(slot) => {
                *slot = file;
                true
            }
            None => false,
        }
    }

    /// Replaces the file at the same path, failing if it is absent.
    pub fn replace_file(&mut self, file: ScaffoldFile) -> Result<(), DomainError> {
        if file.path.is_empty() {
            return Err(DomainError::EmptyFilePath);
        }
        let path = file.path.clone();
        if self.replace_file_if_exists(file) {
            Ok(())
        } else {
            Err(DomainError::FileNotInUniverse { path })
        }
    }

    /// Template data exposed to builders.
    pub fn template_context(&self) -> Value {
        let resource = self.resource.as_ref().map(|r| {
            json!({
                "group": r.group,
                "version": r.version,
                "kind": r.kind,
                "plural": r.plural,
                "namespaced": r.namespaced,
                "domain": r.domain,
                "qualified_group": r.qualified_group(),
                "group_package_name": r.group_package_name,
                "import_alias": r.import_alias,
                "create_example_reconcile_body": r.create_example_reconcile_body,
            })
        });
        json!({
            "domain": self.config.domain,
            "repo": self.config.repo,
            "multigroup": self.config.multigroup,
            "project_version": self.config.version,
            "boilerplate": self.boilerplate,
            "resource": resource,
        })
    }
}
