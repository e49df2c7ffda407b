//! Application layer errors.
//!
//! These errors represent failures in resolution, binding and orchestration.
//! Data-model violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::{ErrorCategory, KubescaffError};

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    // ── Registry ─────────────────────────────────────────────────────────────
    /// A plugin failed registration checks.
    #[error("{reason}")]
    PluginRegistration { reason: String },

    /// No plugin set exists for a project version.
    #[error("unknown project version {version:?}, available versions: {available}")]
    UnknownProjectVersion { version: String, available: String },

    // ── Resolution ───────────────────────────────────────────────────────────
    #[error("ambiguous plugin version {version:?}: no versions match")]
    AmbiguousPluginVersion { version: String },

    #[error("ambiguous plugin name {name:?}: no names match")]
    AmbiguousPluginName { name: String },

    /// One or more `--plugins` keys matched several plugins.
    #[error("ambiguous plugin keys, possible matches: {details}")]
    AmbiguousPlugins { details: String },

    /// `--plugins` named the same plugin twice.
    #[error("duplicate plugin name {name:?}")]
    DuplicatePluginKey { name: String },

    // ── Binding ──────────────────────────────────────────────────────────────
    #[error("project version {project_version:?} does not support {} {capability} plugin", article(.capability))]
    UnsupportedCapability {
        capability: &'static str,
        project_version: String,
    },

    #[error(
        "duplicate {capability} plugins for project version {project_version:?}: {}",
        .plugins.join(", ")
    )]
    DuplicateCapability {
        capability: &'static str,
        project_version: String,
        plugins: Vec<String>,
    },

    #[error("failed to initialize project because project is already initialized")]
    AlreadyInitialized,

    #[error("{command} requires an existing project")]
    NotInitialized { command: &'static str },

    /// A plugin's run hook failed.
    #[error("failed to {action} for project with version {project_version:?}: {source}")]
    SubcommandFailed {
        action: &'static str,
        project_version: String,
        #[source]
        source: Box<KubescaffError>,
    },

    /// Plugin-level input validation failed.
    #[error("{0}")]
    ValidationFailed(String),

    #[error("unknown pattern {pattern:?}")]
    UnknownPattern { pattern: String },

    // ── Scaffolding ──────────────────────────────────────────────────────────
    #[error("failed to render {template}: {reason}")]
    RenderingFailed { template: String, reason: String },

    #[error("failed to create {path}: file already exists")]
    FileExists { path: PathBuf },

    #[error("cannot insert into {path}: file does not exist")]
    InsertTargetMissing { path: PathBuf },

    #[error("marker {marker:?} not found in {path}")]
    MarkerNotFound { path: PathBuf, marker: String },

    // ── Infrastructure ───────────────────────────────────────────────────────
    /// Filesystem operation failed.
    #[error("filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    #[error("unable to find configuration file {path}, project must be initialized")]
    ConfigNotFound { path: PathBuf },

    #[error("{description} failed: {reason}")]
    ExternalCommandFailed { description: String, reason: String },

    #[error("prompt failed: {reason}")]
    PromptFailed { reason: String },

    /// Adapter state lock poisoned.
    #[error("adapter lock poisoned")]
    LockPoisoned,
}

fn article(capability: &str) -> &'static str {
    match capability.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::AmbiguousPluginVersion { .. }
            | Self::AmbiguousPluginName { .. }
            | Self::AmbiguousPlugins { .. } => vec![
                "Use a more specific plugin key, e.g. go.kubebuilder.io/v2.0".into(),
                "Run `kubescaff version` to list registered plugins".into(),
            ],
            Self::UnknownProjectVersion { available, .. } => vec![
                format!("Available project versions: {available}"),
                "Pass one with --project-version".into(),
            ],
            Self::UnsupportedCapability { .. } => vec![
                "Pick a project version whose plugins provide this command".into(),
            ],
            Self::DuplicateCapability { .. } | Self::PluginRegistration { .. } => vec![
                "This is a plugin wiring problem, not a usage error".into(),
                "Narrow the plugin set with --plugins".into(),
            ],
            Self::AlreadyInitialized => vec![
                "A PROJECT file already exists in this directory".into(),
                "Run `kubescaff create api` to add APIs instead".into(),
            ],
            Self::NotInitialized { .. } | Self::ConfigNotFound { .. } => vec![
                "Run this command from the project root".into(),
                "Or initialize a project first: kubescaff init --domain example.com".into(),
            ],
            Self::SubcommandFailed { source, .. } => source.suggestions(),
            Self::FileExists { path } => vec![
                format!("{} already exists", path.display()),
                "Use --force where supported, or remove the file".into(),
            ],
            Self::MarkerNotFound { marker, .. } => vec![
                format!("Restore the marker line `{marker}` in the file"),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::ExternalCommandFailed { .. } => vec![
                "Ensure the command is installed and in your PATH".into(),
                "Check the command output above for details".into(),
            ],
            Self::UnknownPattern { .. } => vec!["Supported patterns: addon".into()],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::PluginRegistration { .. } | Self::DuplicateCapability { .. } => {
                ErrorCategory::Configuration
            }
            Self::UnknownProjectVersion { .. }
            | Self::AmbiguousPluginVersion { .. }
            | Self::AmbiguousPluginName { .. }
            | Self::AmbiguousPlugins { .. }
            | Self::DuplicatePluginKey { .. }
            | Self::UnsupportedCapability { .. }
            | Self::AlreadyInitialized
            | Self::NotInitialized { .. }
            | Self::ValidationFailed(_)
            | Self::UnknownPattern { .. }
            | Self::FileExists { .. }
            | Self::PromptFailed { .. } => ErrorCategory::Validation,
            Self::ConfigNotFound { .. } => ErrorCategory::NotFound,
            Self::SubcommandFailed { source, .. } => source.category(),
            Self::ExternalCommandFailed { .. } => ErrorCategory::External,
            Self::RenderingFailed { .. }
            | Self::InsertTargetMissing { .. }
            | Self::MarkerNotFound { .. }
            | Self::FilesystemError { .. }
            | Self::LockPoisoned => ErrorCategory::Internal,
        }
    }
}
