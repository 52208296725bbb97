//! Attachment endpoints: presigned upload, confirmation, download, removal.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::http::{get_presigned, put_presigned};
use crate::client::{ApiError, ApiRequest, AuthPipeline};

/// Largest file the backend accepts.
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
    pub presigned_url: String,
    pub storage_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentConfirm {
    pub storage_key: String,
    pub original_name: String,
    pub content_type: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: i64,
    pub original_name: String,
    pub content_type: String,
    pub size: u64,
}

/// Reject files the backend would refuse before spending an upload on them.
pub fn validate_attachment(content_type: &str, size: u64) -> Result<(), ApiError> {
    if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
        return Err(ApiError::InvalidAttachment(format!(
            "unsupported file type: {content_type}"
        )));
    }
    if size > MAX_ATTACHMENT_BYTES {
        return Err(ApiError::InvalidAttachment(format!(
            "file is {} (limit {})",
            format_file_size(size),
            format_file_size(MAX_ATTACHMENT_BYTES)
        )));
    }
    Ok(())
}

/// Best-effort MIME type from a file name.
pub fn guess_content_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// `1536` -> `"1.5 KB"`, `0` -> `"0 Bytes"`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rendered = format!("{value:.2}");
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{rendered} {}", UNITS[unit])
}

/// Attachment endpoints.
#[derive(Debug, Clone)]
pub struct AttachmentApi {
    pipeline: AuthPipeline,
}

impl AttachmentApi {
    pub fn new(pipeline: AuthPipeline) -> Self {
        Self { pipeline }
    }

    pub async fn request_upload_url(
        &self,
        file_name: &str,
        content_type: &str,
    ) -> Result<PresignedUpload, ApiError> {
        let request = ApiRequest::post("/attachments/presigned-url").with_body(json!({
            "fileName": file_name,
            "contentType": content_type,
        }));
        self.pipeline.send_json(request).await
    }

    pub async fn confirm(&self, confirm: &AttachmentConfirm) -> Result<Attachment, ApiError> {
        self.pipeline
            .send_json(ApiRequest::post("/attachments/confirm").with_json(confirm)?)
            .await
    }

    /// Validate, upload to storage, then register the attachment.
    pub async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Attachment, ApiError> {
        let size = bytes.len() as u64;
        validate_attachment(content_type, size)?;
        let presigned = self.request_upload_url(file_name, content_type).await?;
        tracing::debug!(file = file_name, size, "uploading attachment to storage");
        put_presigned(&presigned.presigned_url, bytes, content_type).await?;
        self.confirm(&AttachmentConfirm {
            storage_key: presigned.storage_key,
            original_name: file_name.to_string(),
            content_type: content_type.to_string(),
            size,
        })
        .await
    }

    pub async fn download_url(&self, id: i64) -> Result<String, ApiError> {
        let response = self
            .pipeline
            .send(ApiRequest::get(format!("/attachments/{id}/download-url")))
            .await?;
        Ok(response.text_value())
    }

    /// Fetch the file contents; the storage request carries no bearer token.
    pub async fn download(&self, id: i64) -> Result<Vec<u8>, ApiError> {
        let url = self.download_url(id).await?;
        get_presigned(&url).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.pipeline
            .send(ApiRequest::delete(format!("/attachments/{id}")))
            .await?;
        Ok(())
    }
}
