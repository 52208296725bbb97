//! Convenience re-exports for common use.

pub use crate::api::{
    Attachment, AttachmentApi, JobBlogClient, JobPost, JobPostApi, JobPostRequest, JobPostSummary,
    JobStatus, OAuthApi, UserApi,
};
pub use crate::auth::{AccessToken, LogoutReason, LogoutSignal, RefreshError, Session};
pub use crate::client::{ApiError, ApiRequest, ApiResponse, AuthPipeline, Method, Transport};
pub use crate::config::ClientConfig;
pub use crate::error::{JobBlogError, Result};
