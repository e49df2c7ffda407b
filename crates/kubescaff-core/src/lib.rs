//! kubescaff core - plugin model, resolution, binding and scaffolding.
//!
//! This crate provides the domain and application layers for the kubescaff
//! operator scaffolding tool, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          kubescaff-cli (CLI)            │
//! │   base flags, command tree, prompts     │
//! └──────────────────┬──────────────────────┘
//!                    │ binds through
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Application layer                │
//! │  Registry, Resolver, Binder, Scaffold,  │
//! │  ProjectState, ConfigStore              │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ Filesystem, TemplateRenderer, Prompter, │
//! │ CommandRunner                           │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    kubescaff-adapters (Infrastructure)  │
//! │  LocalFilesystem, MinijinjaRenderer,    │
//! │  built-in go/addon plugins              │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ plugin keys, ProjectConfig, Resource,   │
//! │ Universe, FileBuilder, markers          │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kubescaff_core::application::{Binder, Capability, PluginRegistry};
//!
//! # fn demo(registry: PluginRegistry) -> kubescaff_core::error::KsResult<()> {
//! let binder = Binder::new(&registry, "2", &[], false)?;
//! let bound = binder.bind(Capability::Init)?;
//! println!("{}", bound.context().description);
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

pub mod prelude {
    pub use crate::application::{
        Binder, BoundCommand, Capability, CommandContext, ConfigStore, FlagSet, FlagValues,
        Invocation, Plugin, PluginRegistry, PluginRegistryBuilder, ProjectState, Scaffold,
        Subcommand, TransformPlugin,
        ports::{CommandRunner, Filesystem, Ports, Prompter, TemplateRenderer},
    };
    pub use crate::domain::{
        FileBuilder, Gvk, IfExistsAction, ProjectConfig, Resource, ResourceOptions, Universe,
    };
    pub use crate::error::{KsResult, KubescaffError};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
