//! Outbound request descriptor and buffered response.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use strum::{Display, EnumString};

use super::error::ApiError;
use crate::auth::AccessToken;

/// HTTP methods used by the JobBlog API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A single API call: route, payload, headers and the pipeline's retry mark.
///
/// # Example
/// ```
/// use jobblog::client::{ApiRequest, Method};
///
/// let request = ApiRequest::get("/job-posts/search")
///     .with_query("from", "2025-09-01")
///     .with_query("to", "2025-09-30");
/// assert_eq!(request.method(), Method::Get);
/// assert_eq!(request.route(), "/job-posts/search");
/// assert!(!request.is_retried());
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    headers: HeaderMap,
    retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self, ApiError> {
        Ok(self.with_body(serde_json::to_value(body)?))
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path without any inline query string.
    pub fn route(&self) -> &str {
        self.path
            .split_once('?')
            .map_or(self.path.as_str(), |(route, _)| route)
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
    }

    /// Attach `Authorization: Bearer <token>`, replacing any previous value.
    pub fn set_bearer(&mut self, token: &AccessToken) {
        match HeaderValue::from_str(&token.bearer()) {
            Ok(mut value) => {
                value.set_sensitive(true);
                self.headers.insert(AUTHORIZATION, value);
            }
            Err(_) => {
                tracing::warn!("access token is not a valid header value; sending without it");
                self.headers.remove(AUTHORIZATION);
            }
        }
    }

    pub fn is_retried(&self) -> bool {
        self.retried
    }

    /// Set the retry mark. Returns `false` if it was already set.
    pub fn mark_retried(&mut self) -> bool {
        !std::mem::replace(&mut self.retried, true)
    }
}

/// Fully buffered API response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Convenience constructor for tests and in-memory transports.
    pub fn from_status(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, HeaderMap::new(), body.into())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Text payload that may also arrive JSON-quoted (`"value"`).
    pub fn text_value(&self) -> String {
        let raw = self.text();
        let trimmed = raw.trim();
        if trimmed.starts_with('"') {
            if let Ok(unquoted) = serde_json::from_str::<String>(trimmed) {
                return unquoted;
            }
        }
        trimmed.to_string()
    }

    /// Convert a non-success response into [`ApiError::Status`].
    pub fn into_error(self) -> ApiError {
        ApiError::Status {
            status: self.status,
            body: String::from_utf8_lossy(&self.body).into_owned(),
        }
    }
}
