//! Infrastructure adapters for kubescaff.
//!
//! This crate implements the ports defined in `kubescaff_core::application::ports`
//! and ships the built-in plugins. It holds every external dependency and I/O
//! operation of the tool.

pub mod filesystem;
pub mod plugins;
pub mod renderer;
pub mod runner;

pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use plugins::{DEFAULT_PROJECT_VERSION, builtin_plugins, builtin_registry};
pub use renderer::MinijinjaRenderer;
pub use runner::ProcessRunner;
