//! Local filesystem adapter using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use kubescaff_core::{
    application::{ApplicationError, ports::FileEntry, ports::Filesystem},
    error::{KsResult, KubescaffError},
};
use tracing::trace;
use walkdir::WalkDir;

/// Production filesystem rooted at a project directory.
///
/// Relative paths handed to the port resolve against `root`.
#[derive(Debug, Clone)]
pub struct LocalFilesystem {
    root: PathBuf,
}

impl LocalFilesystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn read(&self, path: &Path) -> KsResult<Vec<u8>> {
        std::fs::read(self.resolve(path)).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write(&self, path: &Path, content: &[u8], mode: u32) -> KsResult<()> {
        let full = self.resolve(path);
        std::fs::write(&full, content).map_err(|e| map_io_error(path, e, "write file"))?;
        set_mode(&full, mode).map_err(|e| map_io_error(path, e, "set permissions"))?;
        trace!(path = %path.display(), bytes = content.len(), "Wrote file");
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> KsResult<()> {
        std::fs::create_dir_all(self.resolve(path))
            .map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn remove_file(&self, path: &Path) -> KsResult<()> {
        std::fs::remove_file(self.resolve(path)).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn walk_files(&self) -> KsResult<Vec<FileEntry>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: e.path().map_or_else(|| self.root.clone(), Path::to_path_buf),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .unwrap_or(entry.path())
                .to_path_buf();
            let metadata = entry
                .metadata()
                .map_err(|e| ApplicationError::FilesystemError {
                    path: relative.clone(),
                    reason: e.to_string(),
                })?;
            entries.push(FileEntry {
                path: relative,
                mode: mode_of(&metadata),
            });
        }
        Ok(entries)
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn mode_of(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn mode_of(metadata: &std::fs::Metadata) -> u32 {
    if metadata.permissions().readonly() { 0o444 } else { 0o644 }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> KubescaffError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("failed to {operation}: {e}"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_all_creates_parents_relative_to_root() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new(dir.path());

        fs.write_all(Path::new("config/rbac/role.yaml"), b"kind: Role\n", 0o600)
            .unwrap();

        assert!(fs.exists(Path::new("config/rbac/role.yaml")));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("config/rbac/role.yaml")).unwrap(),
            "kind: Role\n"
        );
        assert_eq!(fs.read_to_string(Path::new("config/rbac/role.yaml")).unwrap(), "kind: Role\n");
    }

    #[cfg(unix)]
    #[test]
    fn write_applies_mode() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new(dir.path());
        fs.write(Path::new("PROJECT"), b"version: \"2\"\n", 0o600).unwrap();
        let mode = std::fs::metadata(dir.path().join("PROJECT")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn write_without_parent_fails_with_path() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new(dir.path());
        let err = fs.write(Path::new("missing/x.go"), b"x", 0o600).unwrap_err();
        assert!(err.to_string().starts_with("filesystem error at missing/x.go: failed to write file"));
    }

    #[test]
    fn walk_lists_relative_files_sorted() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new(dir.path());
        fs.write_all(Path::new("main.go"), b"package main", 0o644).unwrap();
        fs.write_all(Path::new("api/v1/types.go"), b"package v1", 0o644).unwrap();

        let paths: Vec<PathBuf> = fs.walk_files().unwrap().into_iter().map(|e| e.path).collect();
        assert_eq!(paths, vec![PathBuf::from("api/v1/types.go"), PathBuf::from("main.go")]);

        fs.remove_file(Path::new("main.go")).unwrap();
        assert!(!fs.exists(Path::new("main.go")));
    }
}
