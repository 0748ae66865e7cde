//! Google Drive backend
//!
//! Files are created inside one parent folder with a multipart upload, then
//! shared with "anyone with the link" as readers.

use crate::keys::validate_object_name;
use crate::traits::{ObjectStore, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::{BufMut, Bytes, BytesMut};
use regdesk_core::constants::truncate_message;
use regdesk_infra::TokenProvider;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

const DRIVE_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

#[derive(Debug, Deserialize)]
struct CreatedFile {
    id: String,
}

pub struct DriveStorage {
    client: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    folder_id: String,
    upload_base: String,
    api_base: String,
}

impl DriveStorage {
    pub fn new(client: reqwest::Client, tokens: Arc<dyn TokenProvider>, folder_id: String) -> Self {
        Self {
            client,
            tokens,
            folder_id,
            upload_base: DRIVE_UPLOAD_BASE.to_string(),
            api_base: DRIVE_API_BASE.to_string(),
        }
    }

    /// Point the backend at different API hosts (proxies, emulators).
    pub fn with_endpoints(mut self, upload_base: String, api_base: String) -> Self {
        self.upload_base = upload_base.trim_end_matches('/').to_string();
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    /// Public viewer URL for a Drive file id.
    pub fn view_url(file_id: &str) -> String {
        format!("https://drive.google.com/file/d/{}/view", file_id)
    }

    async fn ensure_success(response: reqwest::Response) -> StorageResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StorageError::BackendError {
            status: status.as_u16(),
            message: truncate_message(&body),
        })
    }
}

/// Body of a `multipart/related` upload: JSON metadata part, then the media part.
fn multipart_related_body(
    boundary: &str,
    metadata: &serde_json::Value,
    content_type: &str,
    data: &[u8],
) -> Bytes {
    let metadata = metadata.to_string();
    let mut body = BytesMut::with_capacity(data.len() + metadata.len() + 256);

    body.put_slice(format!("--{}\r\n", boundary).as_bytes());
    body.put_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.put_slice(metadata.as_bytes());
    body.put_slice(format!("\r\n--{}\r\n", boundary).as_bytes());
    body.put_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.put_slice(data);
    body.put_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    body.freeze()
}

#[async_trait]
impl ObjectStore for DriveStorage {
    async fn put(
        &self,
        name: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<StoredObject> {
        validate_object_name(name)?;
        let token = self.tokens.access_token().await?;
        let start = std::time::Instant::now();
        let size = data.len();

        let boundary = format!("regdesk-{}", Uuid::new_v4().simple());
        let metadata = json!({
            "name": name,
            "parents": [self.folder_id],
            "mimeType": content_type,
        });
        let body = multipart_related_body(&boundary, &metadata, content_type, &data);

        let response = self
            .client
            .post(format!(
                "{}/files?uploadType=multipart&fields=id&supportsAllDrives=true",
                self.upload_base
            ))
            .bearer_auth(token)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={}", boundary),
            )
            .body(body)
            .send()
            .await?;

        let created: CreatedFile = Self::ensure_success(response).await?.json().await?;

        tracing::info!(
            storage_name = %name,
            file_id = %created.id,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Drive upload successful"
        );

        Ok(StoredObject { id: created.id })
    }

    async fn grant_public_read(&self, object: &StoredObject) -> StorageResult<String> {
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .post(format!(
                "{}/files/{}/permissions?supportsAllDrives=true",
                self.api_base,
                urlencoding::encode(&object.id)
            ))
            .bearer_auth(token)
            .json(&json!({ "type": "anyone", "role": "reader" }))
            .send()
            .await?;

        Self::ensure_success(response).await?;

        tracing::debug!(file_id = %object.id, "Drive file shared publicly");
        Ok(Self::view_url(&object.id))
    }

    async fn delete(&self, object_id: &str) -> StorageResult<()> {
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .delete(format!(
                "{}/files/{}?supportsAllDrives=true",
                self.api_base,
                urlencoding::encode(object_id)
            ))
            .bearer_auth(token)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::ensure_success(response).await?;

        tracing::info!(file_id = %object_id, "Drive delete successful");
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Drive
    }
}
