use crate::client::{ApiError, ApiRequest, AuthPipeline};

/// Profile endpoints.
#[derive(Debug, Clone)]
pub struct UserApi {
    pipeline: AuthPipeline,
}

impl UserApi {
    pub fn new(pipeline: AuthPipeline) -> Self {
        Self { pipeline }
    }

    /// Display name of the signed-in user.
    pub async fn me(&self) -> Result<String, ApiError> {
        let response = self.pipeline.send(ApiRequest::get("/users/me")).await?;
        Ok(response.text_value())
    }

    /// Whether the backend answers its health probe.
    pub async fn health(&self) -> bool {
        match self.pipeline.send(ApiRequest::get("/health")).await {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!(error = %err, "health check failed");
                false
            }
        }
    }
}
