//! Authenticated request pipeline.
//!
//! Two decisions wrap every call: [`AuthPipeline::decorate_request`] attaches
//! a live token (renewing it first when it is about to expire) and
//! [`AuthPipeline::classify_response`] decides whether a response is final or
//! should trigger refresh-and-retry. [`AuthPipeline::send`] composes them
//! around the injected [`Transport`].

use std::fmt;
use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::{ApiError, TransportError};
use super::request::{ApiRequest, ApiResponse};
use super::transport::{HttpTransport, Transport};
use crate::auth::claims::{is_expiring_soon, DEFAULT_EXPIRY_THRESHOLD_SECS};
use crate::auth::{AccessToken, LogoutReason, RefreshError, Refresher, Session};
use crate::config::{ClientConfig, DEFAULT_REFRESH_ROUTE};

/// Knobs for the token lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// Route that exchanges the refresh cookie for a new access token.
    pub refresh_route: String,
    /// Renew when the token expires within this many seconds.
    pub expiry_threshold_secs: i64,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            refresh_route: DEFAULT_REFRESH_ROUTE.to_string(),
            expiry_threshold_secs: DEFAULT_EXPIRY_THRESHOLD_SECS,
        }
    }
}

/// What to do with a response.
#[derive(Debug)]
pub enum ResponseAction {
    /// Success; hand it to the caller.
    Return(ApiResponse),
    /// Failure the pipeline does not handle; propagate as-is.
    Fail(ApiError),
    /// The refresh route itself was refused; end the session, then propagate.
    EndSession(ApiError),
    /// First 401 on an ordinary call; refresh and re-dispatch once.
    RefreshAndRetry(ApiError),
}

impl ResponseAction {
    fn into_result(self) -> Result<ApiResponse, ApiError> {
        match self {
            Self::Return(response) => Ok(response),
            Self::Fail(err) | Self::EndSession(err) | Self::RefreshAndRetry(err) => Err(err),
        }
    }
}

/// Wraps a [`Transport`] with proactive and reactive token handling.
///
/// # Example
/// ```no_run
/// use jobblog::auth::Session;
/// use jobblog::client::AuthPipeline;
/// use jobblog::config::ClientConfig;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pipeline = AuthPipeline::from_config(&ClientConfig::from_env(), Session::new())?;
/// let name = pipeline.get("/users/me").await?.text();
/// println!("{name}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AuthPipeline {
    transport: Arc<dyn Transport>,
    session: Session,
    refresher: Refresher,
    policy: RefreshPolicy,
}

impl fmt::Debug for AuthPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthPipeline")
            .field("session", &self.session)
            .field("refresher", &self.refresher)
            .field("policy", &self.policy)
            .finish()
    }
}

impl AuthPipeline {
    pub fn new(transport: Arc<dyn Transport>, session: Session, policy: RefreshPolicy) -> Self {
        let refresher = Refresher::new(
            Arc::clone(&transport),
            session.clone(),
            policy.refresh_route.clone(),
        );
        Self {
            transport,
            session,
            refresher,
            policy,
        }
    }

    /// Build a pipeline over an [`HttpTransport`] for `config`.
    pub fn from_config(config: &ClientConfig, session: Session) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), session, config.refresh_policy()))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn policy(&self) -> &RefreshPolicy {
        &self.policy
    }

    /// Run (or join) the single-flight refresh.
    pub async fn refresh(&self) -> Result<AccessToken, RefreshError> {
        self.refresher.refresh().await
    }

    pub fn is_refresh_request(&self, request: &ApiRequest) -> bool {
        request.route() == self.policy.refresh_route
    }

    /// Proactive step: attach a live token to `request`.
    ///
    /// The refresh route passes through untouched. A token close to expiry is
    /// renewed first; if renewal fails the request goes out without a token
    /// and the server's 401 is left to the reactive step.
    pub async fn decorate_request(&self, mut request: ApiRequest) -> ApiRequest {
        if self.is_refresh_request(&request) {
            return request;
        }
        let mut token = self.session.get_token();
        if let Some(current) = &token {
            if is_expiring_soon(Some(current.as_str()), self.policy.expiry_threshold_secs) {
                tracing::debug!(route = request.route(), "access token expiring soon");
                token = match self.refresher.refresh().await {
                    Ok(fresh) => Some(fresh),
                    Err(err) => {
                        tracing::debug!(error = %err, "proactive refresh failed; sending without token");
                        None
                    }
                };
            }
        }
        if let Some(token) = token {
            request.set_bearer(&token);
        }
        request
    }

    /// Reactive step: classify the response to `request`.
    pub fn classify_response(&self, request: &ApiRequest, response: ApiResponse) -> ResponseAction {
        if response.is_success() {
            return ResponseAction::Return(response);
        }
        if response.status() != StatusCode::UNAUTHORIZED {
            return ResponseAction::Fail(response.into_error());
        }
        if self.is_refresh_request(request) {
            ResponseAction::EndSession(response.into_error())
        } else if request.is_retried() {
            ResponseAction::Fail(response.into_error())
        } else {
            ResponseAction::RefreshAndRetry(response.into_error())
        }
    }

    /// Send `request` with full token handling.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut request = self.decorate_request(request).await;
        let response = self.transport.send(&request).await?;
        match self.classify_response(&request, response) {
            ResponseAction::EndSession(err) => {
                tracing::warn!(route = request.route(), "refresh route rejected; ending session");
                self.session.end(LogoutReason::RefreshRejected);
                Err(err)
            }
            ResponseAction::RefreshAndRetry(original) => {
                request.mark_retried();
                match self.refresher.refresh().await {
                    Ok(token) => {
                        tracing::debug!(route = request.route(), "retrying with refreshed token");
                        request.set_bearer(&token);
                        let retry = self.transport.send(&request).await?;
                        self.classify_response(&request, retry).into_result()
                    }
                    Err(err) => {
                        tracing::warn!(
                            route = request.route(),
                            error = %err,
                            "refresh after 401 failed"
                        );
                        Err(original)
                    }
                }
            }
            action => action.into_result(),
        }
    }

    pub async fn get(&self, path: impl Into<String>) -> Result<ApiResponse, ApiError> {
        self.send(ApiRequest::get(path)).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: impl Into<String>,
        body: &B,
    ) -> Result<ApiResponse, ApiError> {
        self.send(ApiRequest::post(path).with_json(body)?).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: impl Into<String>,
        body: &B,
    ) -> Result<ApiResponse, ApiError> {
        self.send(ApiRequest::put(path).with_json(body)?).await
    }

    pub async fn delete(&self, path: impl Into<String>) -> Result<ApiResponse, ApiError> {
        self.send(ApiRequest::delete(path)).await
    }

    /// Send and decode a JSON body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.send(request).await?.json()
    }
}
