//! Command handlers.

pub mod completions;
pub mod scaffold;
pub mod version;
