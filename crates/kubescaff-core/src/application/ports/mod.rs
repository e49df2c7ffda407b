//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `kubescaff-adapters` and the
//! CLI implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: project tree access rooted at the project directory
//!   - `TemplateRenderer`: path and body rendering
//!   - `Prompter`: yes/no questions to the user
//!   - `CommandRunner`: external tools such as `make`

pub mod output;

use std::path::PathBuf;
use std::sync::Arc;

pub use output::{CommandRunner, FileEntry, Filesystem, Prompter, TemplateRenderer};

/// The bundle of driven ports handed to a plugin's run hook.
#[derive(Clone)]
pub struct Ports {
    pub filesystem: Arc<dyn Filesystem>,
    pub renderer: Arc<dyn TemplateRenderer>,
    pub prompter: Arc<dyn Prompter>,
    pub runner: Arc<dyn CommandRunner>,
    /// Absolute path of the project root the filesystem is rooted at.
    pub working_dir: PathBuf,
}

impl std::fmt::Debug for Ports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ports")
            .field("working_dir", &self.working_dir)
            .finish_non_exhaustive()
    }
}
