//! The error every core operation returns.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Either layer's error, or a wrapped foreign failure.
#[derive(Debug, Error, Clone)]
pub enum KubescaffError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// A foreign error given context with [`Context::context`].
    #[error("{message}")]
    Internal { message: String },
}

impl KubescaffError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(inner) => inner.suggestions(),
            Self::Application(inner) => inner.suggestions(),
            Self::Internal { .. } => vec!["Re-run with -vv to see the full log".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(inner) => inner.category().into(),
            Self::Application(inner) => inner.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// `true` for static plugin-wiring errors that should abort the process.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Application(ApplicationError::DuplicateCapability { .. })
                | Self::Application(ApplicationError::PluginRegistration { .. })
        )
    }
}

/// How the CLI classifies a failure when choosing an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    External,
    Internal,
}

impl From<crate::domain::ErrorCategory> for ErrorCategory {
    fn from(category: crate::domain::ErrorCategory) -> Self {
        use crate::domain::ErrorCategory as Domain;
        match category {
            Domain::Validation => Self::Validation,
            Domain::NotFound => Self::NotFound,
            Domain::Internal => Self::Internal,
        }
    }
}

pub type KsResult<T> = Result<T, KubescaffError>;

/// Wraps any error as [`KubescaffError::Internal`] prefixed with `msg`.
pub trait Context<T> {
    fn context(self, msg: impl Into<String>) -> KsResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> KsResult<T> {
        self.map_err(|e| KubescaffError::Internal {
            message: format!("{}: {e}", msg.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_capability_is_fatal() {
        let err: KubescaffError = ApplicationError::DuplicateCapability {
            capability: "init",
            project_version: "2".into(),
            plugins: vec!["a/v1".into(), "b/v1".into()],
        }
        .into();
        assert!(err.is_fatal());
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn precondition_errors_are_not_fatal() {
        let err: KubescaffError = ApplicationError::AlreadyInitialized.into();
        assert!(!err.is_fatal());
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn domain_errors_display_transparently() {
        let err: KubescaffError = DomainError::ExtraFieldsUnsupported.into();
        assert_eq!(err.to_string(), "v1 project configs do not have extra fields");
    }

    #[test]
    fn context_wraps_as_internal() {
        let res: Result<(), std::io::Error> = Err(std::io::Error::other("boom"));
        let err = res.context("reading").unwrap_err();
        assert!(matches!(err, KubescaffError::Internal { .. }));
        assert!(err.to_string().contains("reading: boom"));
    }
}
