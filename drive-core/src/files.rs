//! File operations: create, update, list, search and read.

use tracing::{debug, info, warn};

use crate::api::DriveApi;
use crate::error::{Error, Result};
use crate::folders::resolve_or_create;
use crate::path::split_file_path;
use crate::query;
use crate::types::{
    DriveFile, FileMetadata, ListRequest, DOCX_EXTENSION, DOCX_MIME_TYPE, GOOGLE_DOC_MIME_TYPE,
    PDF_MIME_TYPE, PLAIN_TEXT_MIME_TYPE,
};

/// How [`read_file_content`] fetches a given MIME type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStrategy {
    /// Native Google document, exported as plain text
    ExportText,
    /// Stored blob, downloaded as-is
    Download,
}

impl ReadStrategy {
    pub fn for_mime_type(mime_type: &str) -> Result<Self> {
        match mime_type {
            GOOGLE_DOC_MIME_TYPE => Ok(Self::ExportText),
            DOCX_MIME_TYPE | PDF_MIME_TYPE => Ok(Self::Download),
            m if m.starts_with("text/") => Ok(Self::Download),
            m => Err(Error::UnsupportedType(m.to_string())),
        }
    }
}

fn require_docx(file_name: &str) -> Result<()> {
    if file_name.to_lowercase().ends_with(DOCX_EXTENSION) {
        Ok(())
    } else {
        Err(Error::validation("file name must have a .docx extension"))
    }
}

/// Create a file at `path` (e.g. `MyFolder/SubFolder/file.txt`), creating
/// missing parent folders.
pub async fn create_file_in_path(api: &dyn DriveApi, path: &str, content: &str) -> Result<DriveFile> {
    let (folder, file_name) = split_file_path(path)?;
    let parent_id = resolve_or_create(api, &folder).await?;
    upload(api, FileMetadata::file(&file_name, parent_id), content).await
}

/// Like [`create_file_in_path`] but only for `.docx` names, tagged with the
/// Word document MIME type.
pub async fn create_docx_file_in_path(
    api: &dyn DriveApi,
    path: &str,
    content: &str,
) -> Result<DriveFile> {
    let (folder, file_name) = split_file_path(path)?;
    require_docx(&file_name)?;

    let parent_id = resolve_or_create(api, &folder).await?;
    let metadata = FileMetadata::file(&file_name, parent_id).with_mime_type(DOCX_MIME_TYPE);
    upload(api, metadata, content).await
}

async fn upload(api: &dyn DriveApi, metadata: FileMetadata, content: &str) -> Result<DriveFile> {
    let name = metadata.name.clone();
    match api.create_file(&metadata, content.as_bytes()).await {
        Ok(file) => {
            info!("Created file '{}' ({})", file.name, file.id);
            Ok(file)
        }
        Err(e) => {
            warn!("Unable to create file '{}': {}", name, e);
            Err(e.context(format!("unable to create file '{}'", name)))
        }
    }
}

/// Find a non-folder item by exact name directly under `parent_id`.
pub async fn find_file_id_by_name(
    api: &dyn DriveApi,
    file_name: &str,
    parent_id: &str,
) -> Result<String> {
    let request = ListRequest::new(query::file_by_name(file_name, parent_id), query::FIELDS_ID_NAME);
    let page = api.list_files(&request).await?;
    page.files.into_iter().next().map(|f| f.id).ok_or_else(|| {
        Error::not_found(format!("file '{}' not found in parent '{}'", file_name, parent_id))
    })
}

/// Replace the content of the existing `.docx` file at `path`.
pub async fn update_docx_file_content(
    api: &dyn DriveApi,
    path: &str,
    content: &str,
) -> Result<DriveFile> {
    let (folder, file_name) = split_file_path(path)?;
    require_docx(&file_name)?;

    let parent_id = resolve_or_create(api, &folder).await?;
    let file_id = find_file_id_by_name(api, &file_name, &parent_id).await?;

    let metadata = FileMetadata {
        name: file_name.clone(),
        ..Default::default()
    }
    .with_mime_type(DOCX_MIME_TYPE);

    let file = api
        .update_file(&file_id, &metadata, content.as_bytes())
        .await
        .map_err(|e| {
            warn!("Unable to update file '{}': {}", file_name, e);
            e.context(format!("unable to update file '{}'", file_name))
        })?;
    info!("Updated file '{}' ({})", file.name, file.id);
    Ok(file)
}

/// List everything directly inside `folder_id`; `None` or empty means root.
pub async fn list_files_and_folders(
    api: &dyn DriveApi,
    folder_id: Option<&str>,
) -> Result<Vec<DriveFile>> {
    let folder_id = folder_id.unwrap_or_default();
    let request = ListRequest::new(query::children_of(folder_id), query::FIELDS_ID_NAME_MIME);
    let page = api.list_files(&request).await?;
    debug!("list_files_and_folders: {} items", page.files.len());
    Ok(page.files)
}

/// Run a Drive search query (e.g. `name contains 'Projects'`) and collect
/// every page of results in order.
pub async fn search_drive_items(api: &dyn DriveApi, search: &str) -> Result<Vec<DriveFile>> {
    if search.trim().is_empty() {
        return Err(Error::validation("query must not be empty"));
    }

    let mut all = Vec::new();
    let mut request = ListRequest::new(search, query::FIELDS_PAGED);
    loop {
        let page = api.list_files(&request).await.map_err(|e| {
            warn!("Unable to search drive items with query '{}': {}", search, e);
            e
        })?;
        let next = page.continuation().map(str::to_string);
        all.extend(page.files);
        match next {
            Some(token) => request = request.with_page_token(token),
            None => break,
        }
    }
    debug!("search_drive_items: {} results", all.len());
    Ok(all)
}

/// Read a file as text, choosing export or download from its MIME type.
///
/// Binary formats (docx, PDF) come back as their raw bytes decoded lossily.
pub async fn read_file_content(api: &dyn DriveApi, file_id: &str, mime_type: &str) -> Result<String> {
    let bytes = match ReadStrategy::for_mime_type(mime_type)? {
        ReadStrategy::ExportText => api
            .export_file(file_id, PLAIN_TEXT_MIME_TYPE)
            .await
            .map_err(|e| e.context(format!("unable to export google doc '{}'", file_id)))?,
        ReadStrategy::Download => api
            .download_file(file_id)
            .await
            .map_err(|e| e.context(format!("unable to download file '{}'", file_id)))?,
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
