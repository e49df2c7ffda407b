//! Built-in Go plugins.

pub mod v1;
pub mod v2;

pub use v1::GoPluginV1;
pub use v2::GoPluginV2;
