//! Whole-tree project state for transforms that rewrite existing files.
//!
//! Additions are persisted immediately. Deletions are recorded as
//! tombstones and only applied by [`ProjectState::flush`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::ports::Filesystem;
use crate::domain::{DEFAULT_FILE_MODE, config::DEFAULT_PATH};
use crate::error::KsResult;

/// A file as tracked in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    pub contents: Vec<u8>,
    pub mode: u32,
    pub deleted: bool,
}

impl TrackedFile {
    pub fn new(contents: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: contents.into(),
            mode: DEFAULT_FILE_MODE,
            deleted: false,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }
}

/// In-memory snapshot of the project tree over a [`Filesystem`].
pub struct ProjectState {
    filesystem: Arc<dyn Filesystem>,
    files: BTreeMap<PathBuf, TrackedFile>,
}

impl ProjectState {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            filesystem,
            files: BTreeMap::new(),
        }
    }

    /// Walks the filesystem into a fresh state.
    pub fn load(filesystem: Arc<dyn Filesystem>) -> KsResult<Self> {
        let mut state = Self::new(filesystem);
        state.update()?;
        Ok(state)
    }

    /// Tracks `file` at `path` and writes it straight away.
    pub fn add(&mut self, path: impl Into<PathBuf>, file: TrackedFile) -> KsResult<()> {
        let path = path.into();
        self.filesystem.write_all(&path, &file.contents, file.mode)?;
        self.files.insert(path, TrackedFile { deleted: false, ..file });
        Ok(())
    }

    /// Marks `path` deleted. Nothing happens on disk until [`flush`](Self::flush).
    ///
    /// A no-op while nothing is tracked.
    pub fn delete(&mut self, path: impl AsRef<Path>) {
        if self.files.is_empty() {
            return;
        }
        let path = path.as_ref();
        match self.files.get_mut(path) {
            Some(file) => file.deleted = true,
            None => {
                self.files.insert(
                    path.to_path_buf(),
                    TrackedFile {
                        deleted: true,
                        ..TrackedFile::new(Vec::new())
                    },
                );
            }
        }
    }

    /// `true` when `path` is absent from the tracked set or marked deleted.
    ///
    /// Note the inverted sense: this answers "may I generate this file?".
    pub fn has(&self, path: impl AsRef<Path>) -> bool {
        self.files.get(path.as_ref()).is_none_or(|f| f.deleted)
    }

    /// Alias of [`has`](Self::has) with a self-describing name.
    pub fn is_absent(&self, path: impl AsRef<Path>) -> bool {
        self.has(path)
    }

    /// A live (non-deleted) tracked file.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&TrackedFile> {
        self.files.get(path.as_ref()).filter(|f| !f.deleted)
    }

    /// Every live tracked file, ordered by path.
    pub fn files(&self) -> impl Iterator<Item = (&Path, &TrackedFile)> {
        self.files
            .iter()
            .filter(|(_, f)| !f.deleted)
            .map(|(p, f)| (p.as_path(), f))
    }

    /// Re-reads the tree, keeping pending tombstones.
    ///
    /// Paths starting with `.git` and the PROJECT file are ignored.
    #[instrument(skip_all)]
    pub fn update(&mut self) -> KsResult<()> {
        let mut fresh: BTreeMap<PathBuf, TrackedFile> = self
            .files
            .iter()
            .filter(|(_, f)| f.deleted)
            .map(|(p, f)| (p.clone(), f.clone()))
            .collect();

        for entry in self.filesystem.walk_files()? {
            if is_ignored(&entry.path) || fresh.contains_key(&entry.path) {
                continue;
            }
            let contents = self.filesystem.read(&entry.path)?;
            fresh.insert(entry.path, TrackedFile::new(contents).with_mode(entry.mode));
        }

        debug!(files = fresh.len(), "Refreshed project state");
        self.files = fresh;
        Ok(())
    }

    /// Removes tombstoned files and writes every live one.
    #[instrument(skip_all)]
    pub fn flush(&self) -> KsResult<()> {
        for (path, file) in &self.files {
            if file.deleted {
                if self.filesystem.exists(path) {
                    self.filesystem.remove_file(path)?;
                    debug!(path = %path.display(), "Removed file");
                }
            } else {
                self.filesystem.write_all(path, &file.contents, file.mode)?;
            }
        }
        Ok(())
    }
}

fn is_ignored(path: &Path) -> bool {
    let text = path.to_string_lossy();
    text.starts_with(".git") || text.starts_with(DEFAULT_PATH)
}

impl std::fmt::Debug for ProjectState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectState")
            .field("files", &self.files.keys().collect::<Vec<_>>())
            .finish()
    }
}
