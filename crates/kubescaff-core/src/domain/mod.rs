// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for kubescaff.
//!
//! Pure data and rules with no I/O:
//!
//! - **Plugin identity**: key form, name equivalence, version grammars
//! - **Project configuration**: the PROJECT file model and its YAML form
//! - **Resources**: GVK options, validation and derived naming
//! - **Scaffolding**: file builders, the universe, marker insertion
//!
//! Filesystem, templating and prompting are reached through ports defined
//! in the application layer.

pub mod builder;
pub mod config;
pub mod error;
pub mod marker;
pub mod plugin_key;
pub mod resource;
pub mod universe;
pub mod validation;

pub use builder::{BuilderBody, DEFAULT_FILE_MODE, FileBuilder, IfExistsAction, MarkerInsert};
pub use config::{Gvk, ProjectConfig};
pub use error::{DomainError, ErrorCategory};
pub use resource::{Resource, ResourceOptions};
pub use universe::{ScaffoldFile, Universe};
