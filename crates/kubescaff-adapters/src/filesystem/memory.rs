//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use kubescaff_core::{
    application::{ApplicationError, ports::FileEntry, ports::Filesystem},
    error::KsResult,
};

/// In-memory filesystem for testing.
///
/// Cloning shares the same underlying tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, (Vec<u8>, u32)>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn add_dirs(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating its parent directories (testing helper).
    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            let path = path.as_ref();
            if let Some(parent) = path.parent() {
                inner.add_dirs(parent);
            }
            inner
                .files
                .insert(path.to_path_buf(), (content.as_bytes().to_vec(), 0o644));
        }
        self
    }

    /// Read a file's content as text (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        let (bytes, _) = inner.files.get(path.as_ref())?;
        String::from_utf8(bytes.clone()).ok()
    }

    pub fn mode(&self, path: impl AsRef<Path>) -> Option<u32> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).map(|(_, mode)| *mode)
    }

    /// All file paths, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn read(&self, path: &Path) -> KsResult<Vec<u8>> {
        let inner = self.inner.read().map_err(|_| ApplicationError::LockPoisoned)?;
        inner
            .files
            .get(path)
            .map(|(bytes, _)| bytes.clone())
            .ok_or_else(|| {
                ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "no such file".into(),
                }
                .into()
            })
    }

    fn write(&self, path: &Path, content: &[u8], mode: u32) -> KsResult<()> {
        let mut inner = self.inner.write().map_err(|_| ApplicationError::LockPoisoned)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner
            .files
            .insert(path.to_path_buf(), (content.to_vec(), mode));
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> KsResult<()> {
        let mut inner = self.inner.write().map_err(|_| ApplicationError::LockPoisoned)?;
        inner.add_dirs(path);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> KsResult<()> {
        let mut inner = self.inner.write().map_err(|_| ApplicationError::LockPoisoned)?;
        inner.files.remove(path).map(|_| ()).ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "no such file".into(),
            }
            .into()
        })
    }

    fn walk_files(&self) -> KsResult<Vec<FileEntry>> {
        let inner = self.inner.read().map_err(|_| ApplicationError::LockPoisoned)?;
        Ok(inner
            .files
            .iter()
            .map(|(path, (_, mode))| FileEntry {
                path: path.clone(),
                mode: *mode,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write(Path::new("a/b.txt"), b"x", 0o600).is_err());
        fs.write_all(Path::new("a/b.txt"), b"x", 0o600).unwrap();
        assert_eq!(fs.read_file("a/b.txt").as_deref(), Some("x"));
        assert_eq!(fs.mode("a/b.txt"), Some(0o600));
        assert!(fs.exists(Path::new("a")));
    }

    #[test]
    fn clones_share_state() {
        let fs = MemoryFilesystem::new().with_file("main.go", "package main");
        let other = fs.clone();
        other.remove_file(Path::new("main.go")).unwrap();
        assert!(!fs.exists(Path::new("main.go")));
        assert!(fs.remove_file(Path::new("main.go")).is_err());
    }
}
