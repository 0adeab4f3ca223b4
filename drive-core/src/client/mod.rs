//! Drive v3 REST client.
//!
//! # Usage
//!
//! ```rust,no_run
//! use drive_core::auth::Authenticator;
//! use drive_core::client::DriveClient;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> drive_core::Result<()> {
//!     let auth = Authenticator::from_files(Path::new("oauth.json"), Path::new("token.json"))?;
//!     let client = DriveClient::new(auth)?;
//!     let folders = drive_core::folders::list_root_folders(&client).await?;
//!     println!("{} folders", folders.len());
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

use crate::api::DriveApi;
use crate::auth::Authenticator;
use crate::error::{Error, Result};
use crate::types::{About, DriveFile, FileList, FileMetadata, ListRequest};

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/drive/v3";
pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://www.googleapis.com/upload/drive/v3";

/// Media type for uploads without an explicit MIME type; content is always text
const DEFAULT_MEDIA_TYPE: &str = "text/plain; charset=UTF-8";

/// Fields requested back for created/updated files
const FILE_FIELDS: &str = "id, name, mimeType, parents";

/// Drive API client
#[derive(Clone)]
pub struct DriveClient {
    /// Base URL for metadata requests
    api_base: String,
    /// Base URL for media uploads
    upload_base: String,
    /// Token source
    auth: Arc<Authenticator>,
    /// HTTP client
    client: reqwest::Client,
}

impl DriveClient {
    /// Create a client against the public Google endpoints
    pub fn new(auth: Authenticator) -> Result<Self> {
        Self::with_base_urls(auth, DEFAULT_API_BASE_URL, DEFAULT_UPLOAD_BASE_URL)
    }

    /// Create a client against custom endpoints
    pub fn with_base_urls(
        auth: Authenticator,
        api_base: impl Into<String>,
        upload_base: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("drive-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::communication(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            upload_base: upload_base.into().trim_end_matches('/').to_string(),
            auth: Arc::new(auth),
            client,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // HTTP Helpers
    // ─────────────────────────────────────────────────────────────────────────

    async fn authorized(&self, method: reqwest::Method, url: &str) -> Result<reqwest::RequestBuilder> {
        let token = self.auth.access_token().await?;
        debug!("Drive request: {} {}", method, url);
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            let error_text = resp.text().await.unwrap_or_default();
            Err(Error::communication(format!("Drive API error {}: {}", status, error_text)))
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T> {
        let resp = self.send(req).await?;
        resp.json()
            .await
            .map_err(|e| Error::communication(format!("Failed to parse response: {}", e)))
    }

    async fn send_bytes(&self, req: reqwest::RequestBuilder) -> Result<Vec<u8>> {
        let resp = self.send(req).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    async fn upload(
        &self,
        method: reqwest::Method,
        url: String,
        metadata: &FileMetadata,
        content: &[u8],
    ) -> Result<DriveFile> {
        let (content_type, body) = multipart_related(metadata, content)?;
        let req = self
            .authorized(method, &url)
            .await?
            .query(&[
                ("uploadType", "multipart"),
                ("supportsAllDrives", "true"),
                ("fields", FILE_FIELDS),
            ])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body);
        self.send_json(req).await
    }
}

/// Build a `multipart/related` body: JSON metadata part followed by the media.
fn multipart_related(metadata: &FileMetadata, content: &[u8]) -> Result<(String, Vec<u8>)> {
    let boundary = format!("drive-mcp-{}", uuid::Uuid::new_v4().simple());
    let media_type = metadata.mime_type.as_deref().unwrap_or(DEFAULT_MEDIA_TYPE);

    let mut body = Vec::with_capacity(content.len() + 512);
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(&serde_json::to_vec(metadata)?);
    body.extend_from_slice(format!("\r\n--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", media_type).as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Ok((format!("multipart/related; boundary={}", boundary), body))
}

#[async_trait]
impl DriveApi for DriveClient {
    async fn list_files(&self, request: &ListRequest) -> Result<FileList> {
        let url = format!("{}/files", self.api_base);
        let mut req = self
            .authorized(reqwest::Method::GET, &url)
            .await?
            .query(&[
                ("q", request.query.as_str()),
                ("fields", request.fields.as_str()),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ]);
        if let Some(token) = &request.page_token {
            req = req.query(&[("pageToken", token.as_str())]);
        }
        self.send_json(req).await
    }

    async fn create_folder(&self, metadata: &FileMetadata) -> Result<DriveFile> {
        let url = format!("{}/files", self.api_base);
        let req = self
            .authorized(reqwest::Method::POST, &url)
            .await?
            .query(&[("fields", FILE_FIELDS), ("supportsAllDrives", "true")])
            .json(metadata);
        self.send_json(req).await
    }

    async fn create_file(&self, metadata: &FileMetadata, content: &[u8]) -> Result<DriveFile> {
        let url = format!("{}/files", self.upload_base);
        self.upload(reqwest::Method::POST, url, metadata, content).await
    }

    async fn update_file(
        &self,
        file_id: &str,
        metadata: &FileMetadata,
        content: &[u8],
    ) -> Result<DriveFile> {
        let url = format!("{}/files/{}", self.upload_base, file_id);
        self.upload(reqwest::Method::PATCH, url, metadata, content).await
    }

    async fn export_file(&self, file_id: &str, mime_type: &str) -> Result<Vec<u8>> {
        let url = format!("{}/files/{}/export", self.api_base, file_id);
        let req = self
            .authorized(reqwest::Method::GET, &url)
            .await?
            .query(&[("mimeType", mime_type)]);
        self.send_bytes(req).await
    }

    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>> {
        let url = format!("{}/files/{}", self.api_base, file_id);
        let req = self
            .authorized(reqwest::Method::GET, &url)
            .await?
            .query(&[("alt", "media"), ("supportsAllDrives", "true")]);
        self.send_bytes(req).await
    }

    async fn about(&self) -> Result<About> {
        let url = format!("{}/about", self.api_base);
        let req = self
            .authorized(reqwest::Method::GET, &url)
            .await?
            .query(&[("fields", "user(emailAddress, displayName)")]);
        self.send_json(req).await
    }
}
