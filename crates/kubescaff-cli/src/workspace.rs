//! The project directory a command runs in.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use kubescaff_adapters::{LocalFilesystem, MinijinjaRenderer, ProcessRunner};
use kubescaff_core::application::{ConfigStore, Ports};

use crate::prompt::TerminalPrompter;

/// A project root with its PROJECT store and the real port adapters.
pub struct Workspace {
    root: PathBuf,
    filesystem: Arc<LocalFilesystem>,
    store: ConfigStore,
}

impl Workspace {
    pub fn open(root: PathBuf) -> Self {
        let filesystem = Arc::new(LocalFilesystem::new(root.clone()));
        let store = ConfigStore::new(filesystem.clone());
        Self {
            root,
            filesystem,
            store,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn ports(&self) -> Ports {
        Ports {
            filesystem: self.filesystem.clone(),
            renderer: Arc::new(MinijinjaRenderer::new()),
            prompter: Arc::new(TerminalPrompter),
            runner: Arc::new(ProcessRunner::new(self.root.clone())),
            working_dir: self.root.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_directory_is_not_a_project() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::open(dir.path().to_path_buf());
        assert!(!workspace.store().exists());
        assert_eq!(workspace.ports().working_dir, dir.path());
    }

    #[test]
    fn project_file_marks_a_project() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("PROJECT"), "version: \"2\"\ndomain: example.com\n").unwrap();
        let workspace = Workspace::open(dir.path().to_path_buf());
        let config = workspace.store().load().unwrap().unwrap();
        assert_eq!(config.version, "2");
        assert_eq!(config.domain, "example.com");
    }
}
