//! The remote storage seam.
//!
//! Every operation in this crate talks to Drive through [`DriveApi`]. The
//! production implementation is [`crate::client::DriveClient`]; tests plug in
//! an in-memory fake.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{About, DriveFile, FileList, FileMetadata, ListRequest};

/// Authenticated request/response access to a Drive-like backend.
///
/// Implementations must be safe to share across concurrent tool calls.
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// Fetch a single page of `files.list`.
    async fn list_files(&self, request: &ListRequest) -> Result<FileList>;

    /// Create a metadata-only item (used for folders).
    async fn create_folder(&self, metadata: &FileMetadata) -> Result<DriveFile>;

    /// Create a file with the given media content.
    async fn create_file(&self, metadata: &FileMetadata, content: &[u8]) -> Result<DriveFile>;

    /// Replace the metadata and media of an existing file.
    async fn update_file(
        &self,
        file_id: &str,
        metadata: &FileMetadata,
        content: &[u8],
    ) -> Result<DriveFile>;

    /// Export a native Google document to another format.
    async fn export_file(&self, file_id: &str, mime_type: &str) -> Result<Vec<u8>>;

    /// Download the raw bytes of a stored file.
    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>>;

    /// Information about the signed-in account.
    async fn about(&self) -> Result<About>;
}
