use reqwest::StatusCode;
use thiserror::Error;

/// Outcome of a failed refresh attempt.
///
/// Cloneable so every caller that joined the same in-flight refresh receives
/// the identical failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error("Refresh credential rejected (status {status})")]
    Rejected { status: StatusCode },
    #[error("Refresh returned unexpected status {status}")]
    UnexpectedStatus { status: StatusCode },
    #[error("Refresh response did not contain an access token")]
    EmptyToken,
    #[error("Network error: {0}")]
    Transport(String),
}

impl RefreshError {
    /// Classify a non-success status returned by the refresh route.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Rejected { status },
            status => Self::UnexpectedStatus { status },
        }
    }

    /// Whether the server explicitly refused the durable credential.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}
