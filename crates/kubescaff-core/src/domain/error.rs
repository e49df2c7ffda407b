use thiserror::Error;

/// Violations of the data model: bad identifiers, bad resources, bad
/// PROJECT contents. Cloned into wrapped subcommand failures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // plugin identity
    #[error("invalid plugin name {name:?}: {reason}")]
    InvalidPluginName { name: String, reason: String },

    #[error("invalid plugin version {version:?}: {reason}")]
    InvalidPluginVersion { version: String, reason: String },

    #[error("invalid plugin key {key:?}: {reason}")]
    InvalidPluginKey { key: String, reason: String },

    #[error("invalid project version {version:?}: {reason}")]
    InvalidProjectVersion { version: String, reason: String },

    // resources
    #[error("invalid resource {field}: {reason}")]
    InvalidResource { field: &'static str, reason: String },

    #[error("project name ({name}) is invalid: {reason}")]
    InvalidProjectName { name: String, reason: String },

    // PROJECT file
    #[error("v1 project configs do not have extra fields")]
    ExtraFieldsUnsupported,

    #[error("failed to parse project configuration: {0}")]
    MalformedConfig(String),

    #[error("failed to encode extra field {key:?}: {reason}")]
    ExtraFieldEncoding { key: String, reason: String },

    // scaffold universe
    #[error("path must be set")]
    EmptyFilePath,

    #[error("file not found {path:?}")]
    FileNotInUniverse { path: String },
}

impl DomainError {
    /// Hints for the user, most specific first.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidPluginName { .. } => vec![
                "Plugin names must be DNS-1123 subdomains, e.g. go.kubebuilder.io".into(),
                "Use lowercase letters, digits, '-' and '.' only".into(),
            ],
            Self::InvalidPluginVersion { .. } | Self::InvalidPluginKey { .. } => vec![
                "Plugin keys look like <name>/v<major>.<minor>, e.g. go/v2.0".into(),
            ],
            Self::InvalidProjectVersion { .. } => vec![
                "Project versions look like 2 or 3-alpha".into(),
                "Run `kubescaff version` to list supported project versions".into(),
            ],
            Self::InvalidResource { field, .. } => vec![
                format!("Check the --{field} flag"),
                "Example: --group ship --version v1beta1 --kind Frigate".into(),
            ],
            Self::InvalidProjectName { .. } => vec![
                "Project names must be DNS-1123 labels (lowercase, digits, '-')".into(),
                "Pass an explicit name with --project-name".into(),
            ],
            Self::MalformedConfig(_) => vec![
                "The PROJECT file could not be parsed".into(),
                "Check it for YAML syntax errors".into(),
            ],
            Self::ExtraFieldsUnsupported => vec![
                "Upgrade the project to version 2 to store plugin settings".into(),
            ],
            Self::EmptyFilePath
            | Self::FileNotInUniverse { .. }
            | Self::ExtraFieldEncoding { .. } => Vec::new(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FileNotInUniverse { .. } => ErrorCategory::NotFound,
            Self::EmptyFilePath | Self::ExtraFieldEncoding { .. } => ErrorCategory::Internal,
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
