use reqwest::StatusCode;
use thiserror::Error;

/// Failure of the underlying transport (no HTTP status was obtained).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Transport error: {0}")]
    Other(String),
}

/// Failure of an API call made through the pipeline.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API error (status {status}): {body}")]
    Status { status: StatusCode, body: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid attachment: {0}")]
    InvalidAttachment(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}
