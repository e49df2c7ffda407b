//! Loading and saving the PROJECT file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::application::{ApplicationError, ports::Filesystem};
use crate::domain::{DEFAULT_FILE_MODE, ProjectConfig, config::DEFAULT_PATH};
use crate::error::KsResult;

/// Project configuration persistence over the [`Filesystem`] port.
#[derive(Clone)]
pub struct ConfigStore {
    filesystem: Arc<dyn Filesystem>,
    path: PathBuf,
}

impl ConfigStore {
    /// A store for `PROJECT` at the filesystem root.
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            filesystem,
            path: PathBuf::from(DEFAULT_PATH),
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `true` once a project has been initialized.
    pub fn exists(&self) -> bool {
        self.filesystem.exists(&self.path)
    }

    /// The stored configuration, or `None` for an uninitialized tree.
    pub fn load(&self) -> KsResult<Option<ProjectConfig>> {
        if !self.exists() {
            return Ok(None);
        }
        let bytes = self.filesystem.read(&self.path)?;
        let config = ProjectConfig::unmarshal(&bytes)?;
        debug!(path = %self.path.display(), version = %config.version, "Loaded project config");
        Ok(Some(config))
    }

    /// The stored configuration; an uninitialized tree is an error.
    pub fn load_initialized(&self) -> KsResult<ProjectConfig> {
        self.load()?.ok_or_else(|| {
            ApplicationError::ConfigNotFound {
                path: self.path.clone(),
            }
            .into()
        })
    }

    pub fn save(&self, config: &ProjectConfig) -> KsResult<()> {
        let bytes = config.marshal()?;
        self.filesystem.write_all(&self.path, &bytes, DEFAULT_FILE_MODE)?;
        debug!(path = %self.path.display(), "Saved project config");
        Ok(())
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore").field("path", &self.path).finish()
    }
}
