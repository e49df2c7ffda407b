//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to carry out the work a
//! bound plugin asks for: executing file builders, tracking a project tree
//! and persisting the PROJECT file.

pub mod config_store;
pub mod project_state;
pub mod scaffold_service;

pub use config_store::ConfigStore;
pub use project_state::{ProjectState, TrackedFile};
pub use scaffold_service::Scaffold;
