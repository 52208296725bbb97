//! Typed JobBlog endpoints layered on the authenticated pipeline.

pub mod attachments;
pub mod job_posts;
pub mod oauth;
pub mod users;

use std::sync::Arc;

pub use attachments::{Attachment, AttachmentApi, AttachmentConfirm, PresignedUpload};
pub use job_posts::{BadgeTone, JobPost, JobPostApi, JobPostRequest, JobPostSummary, JobStatus};
pub use oauth::{google_authorize_url, token_from_callback, OAuthApi};
pub use users::UserApi;

use crate::auth::Session;
use crate::client::{AuthPipeline, Transport, TransportError};
use crate::config::ClientConfig;

/// Entry point bundling every endpoint group over one pipeline.
///
/// # Example
/// ```no_run
/// use jobblog::api::JobBlogClient;
/// use jobblog::auth::Session;
/// use jobblog::config::ClientConfig;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = JobBlogClient::new(ClientConfig::from_env(), Session::new())?;
/// if client.oauth().bootstrap().await {
///     for post in client.job_posts().list_mine().await? {
///         println!("{} - {}", post.company_name, post.title);
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct JobBlogClient {
    config: ClientConfig,
    pipeline: AuthPipeline,
}

impl JobBlogClient {
    pub fn new(config: ClientConfig, session: Session) -> Result<Self, TransportError> {
        let pipeline = AuthPipeline::from_config(&config, session)?;
        Ok(Self { config, pipeline })
    }

    /// Use a caller-supplied transport (custom cookies, test doubles).
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>, session: Session) -> Self {
        let pipeline = AuthPipeline::new(transport, session, config.refresh_policy());
        Self { config, pipeline }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &AuthPipeline {
        &self.pipeline
    }

    pub fn session(&self) -> &Session {
        self.pipeline.session()
    }

    pub fn job_posts(&self) -> JobPostApi {
        JobPostApi::new(self.pipeline.clone())
    }

    pub fn attachments(&self) -> AttachmentApi {
        AttachmentApi::new(self.pipeline.clone())
    }

    pub fn users(&self) -> UserApi {
        UserApi::new(self.pipeline.clone())
    }

    pub fn oauth(&self) -> OAuthApi {
        OAuthApi::new(self.pipeline.clone(), self.config.logout_route.clone())
    }
}
