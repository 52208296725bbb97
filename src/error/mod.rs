//! Error types for the JobBlog client.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use reqwest::StatusCode;
use thiserror::Error;

use crate::auth::RefreshError;
use crate::client::{ApiError, TransportError};

/// Primary error type for crate-level operations (CLI handlers, bootstrapping).
#[derive(Error, Debug)]
pub enum JobBlogError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Session refresh failed: {0}")]
    Refresh(#[from] RefreshError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<TransportError> for JobBlogError {
    fn from(error: TransportError) -> Self {
        Self::Api(ApiError::Transport(error))
    }
}

impl JobBlogError {
    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotSignedIn | Self::Refresh(_) => ErrorCategory::Authentication,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::InvalidArgument(_) => ErrorCategory::Validation,
            Self::Io(_) => ErrorCategory::Unknown,
            Self::Api(api) => match api {
                ApiError::Transport(_) => ErrorCategory::Network,
                ApiError::Decode(_) => ErrorCategory::Serialization,
                ApiError::InvalidAttachment(_) | ApiError::InvalidRequest(_) => {
                    ErrorCategory::Validation
                }
                ApiError::Status { status, .. } => match *status {
                    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                        ErrorCategory::Authentication
                    }
                    s if s.is_server_error() => ErrorCategory::Server,
                    _ => ErrorCategory::Api,
                },
            },
        }
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Authentication => RecoverySuggestion::SignInAgain,
            ErrorCategory::Network | ErrorCategory::Server => RecoverySuggestion::RetryLater,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::Validation => RecoverySuggestion::FixInput,
            _ => RecoverySuggestion::ContactSupport,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, JobBlogError>;
