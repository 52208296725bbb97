//! Transport seam: the raw `request(method, path, body, headers)` primitive.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::Url;

use super::error::TransportError;
use super::request::{ApiRequest, ApiResponse};
use crate::config::ClientConfig;

/// Name of the cookie that carries the durable refresh credential.
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Sends one request and reports whatever status came back.
///
/// Non-success statuses are `Ok`; only failures to obtain a response at all
/// are errors. Authentication policy lives in the pipeline, not here.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// `reqwest`-backed transport rooted at the API base URL.
///
/// Keeps a cookie jar so the refresh credential set by `/oauth/refresh` and
/// the Google callback rides along automatically.
///
/// # Example
/// ```no_run
/// use jobblog::client::HttpTransport;
/// use jobblog::config::ClientConfig;
///
/// let transport = HttpTransport::new(&ClientConfig::new("https://api.jobblog.dev"))?;
/// transport.set_refresh_credential("opaque-refresh-token")?;
/// # Ok::<(), jobblog::client::TransportError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    cookies: Arc<Jar>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|err| TransportError::InvalidUrl(format!("{base_url}: {err}")))?;
        let cookies = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url,
            cookies,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Seed the cookie jar with a refresh credential obtained elsewhere.
    pub fn set_refresh_credential(&self, value: &str) -> Result<(), TransportError> {
        let url = Url::parse(&self.base_url)
            .map_err(|err| TransportError::InvalidUrl(format!("{}: {err}", self.base_url)))?;
        self.cookies
            .add_cookie_str(&format!("{REFRESH_COOKIE}={value}; Path=/"), &url);
        Ok(())
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url, TransportError> {
        let path = request.path();
        let joined = if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        };
        let mut url = Url::parse(&joined)
            .map_err(|err| TransportError::InvalidUrl(format!("{joined}: {err}")))?;
        if !request.query().is_empty() {
            url.query_pairs_mut().extend_pairs(request.query());
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url_for(request)?;
        let mut builder = self
            .client
            .request(request.method().into(), url)
            .headers(request.headers().clone());
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }
        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        tracing::debug!(
            method = %request.method(),
            route = request.route(),
            status = status.as_u16(),
            "api call finished"
        );
        Ok(ApiResponse::new(status, headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> HttpTransport {
        HttpTransport::new(&ClientConfig::new(base)).unwrap()
    }

    #[test]
    fn joins_paths_and_query() {
        let transport = transport("https://api.example.com/");
        let request = ApiRequest::get("/job-posts/search")
            .with_query("from", "2025-09-01")
            .with_query("to", "2025-09-30");
        let url = transport.url_for(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/job-posts/search?from=2025-09-01&to=2025-09-30"
        );
    }

    #[test]
    fn keeps_base_path_prefix() {
        let transport = transport("https://example.com/api");
        let url = transport.url_for(&ApiRequest::get("users/me")).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/users/me");
    }

    #[test]
    fn rejects_invalid_base_url() {
        let err = HttpTransport::new(&ClientConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl(_)));
    }
}
