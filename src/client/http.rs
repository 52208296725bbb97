//! Shared unauthenticated HTTP client for presigned storage URLs.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::header::{HeaderValue, CONTENT_TYPE};

use super::error::{ApiError, TransportError};

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
///
/// Storage URLs are pre-signed; they must never see the bearer token or the
/// API cookie jar, so they go through this client rather than the transport.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .pool_max_idle_per_host(4)
            .build()
            .unwrap_or_default()
    })
}

/// `PUT` raw bytes to a presigned URL.
pub async fn put_presigned(url: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), ApiError> {
    let content_type = HeaderValue::from_str(content_type)
        .map_err(|_| ApiError::InvalidAttachment(format!("bad content type: {content_type}")))?;
    let response = shared_client()
        .put(url)
        .header(CONTENT_TYPE, content_type)
        .body(bytes)
        .send()
        .await
        .map_err(TransportError::from)?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status { status, body });
    }
    Ok(())
}

/// `GET` the bytes behind a presigned URL.
pub async fn get_presigned(url: &str) -> Result<Vec<u8>, ApiError> {
    let response = shared_client()
        .get(url)
        .send()
        .await
        .map_err(TransportError::from)?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status { status, body });
    }
    let bytes = response.bytes().await.map_err(TransportError::from)?;
    Ok(bytes.to_vec())
}
