//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `kubescaff-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::application::ApplicationError;
use crate::error::KsResult;

/// A regular file discovered by [`Filesystem::walk_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the filesystem root.
    pub path: PathBuf,
    pub mode: u32,
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `kubescaff_adapters::filesystem::LocalFilesystem` (production)
/// - `kubescaff_adapters::filesystem::MemoryFilesystem` (testing)
///
/// All paths are relative to the project root the adapter is bound to.
pub trait Filesystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Read a file's bytes.
    fn read(&self, path: &Path) -> KsResult<Vec<u8>>;

    /// Write bytes to a file with the given permission bits.
    ///
    /// The parent directory must already exist.
    fn write(&self, path: &Path, content: &[u8], mode: u32) -> KsResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> KsResult<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> KsResult<()>;

    /// Every regular file under the root, in a stable order.
    fn walk_files(&self) -> KsResult<Vec<FileEntry>>;

    /// Read a file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> KsResult<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: format!("invalid UTF-8: {e}"),
            }
            .into()
        })
    }

    /// Write a file, creating its parent directories first.
    fn write_all(&self, path: &Path, content: &[u8], mode: u32) -> KsResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_dir_all(parent)?;
            }
        }
        self.write(path, content, mode)
    }
}

/// Port for template rendering.
///
/// Implemented by:
/// - `kubescaff_adapters::renderer::MinijinjaRenderer`
pub trait TemplateRenderer: Send + Sync {
    /// Render `template` against `context`. `name` identifies the template
    /// in error messages.
    fn render(&self, name: &str, template: &str, context: &Value) -> KsResult<String>;
}

/// Port for interactive confirmation.
pub trait Prompter: Send + Sync {
    /// Ask a yes/no question; `default` applies when no answer is given.
    fn confirm(&self, question: &str, default: bool) -> KsResult<bool>;
}

/// Port for running external tools.
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` in the project root, blocking until done.
    fn run(&self, description: &str, program: &str, args: &[&str]) -> KsResult<()>;

    /// Like [`run`](Self::run) but captures and returns stdout.
    fn output(&self, description: &str, program: &str, args: &[&str]) -> KsResult<String>;
}
