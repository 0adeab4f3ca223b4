//! Folder lookup and path resolution.

use tracing::{debug, info};

use crate::api::DriveApi;
use crate::error::{Error, Result};
use crate::path::FolderPath;
use crate::query;
use crate::types::{DriveFile, FileMetadata, ListRequest, ROOT_FOLDER_ID};

/// Fetch the folders at the top of the drive, including folders shared with
/// the account.
pub async fn list_root_folders(api: &dyn DriveApi) -> Result<Vec<DriveFile>> {
    let request = ListRequest::new(query::root_folders(), query::FIELDS_ID_NAME);
    let page = api.list_files(&request).await?;
    debug!("list_root_folders: {} folders", page.files.len());
    Ok(page.files)
}

/// Find a folder by exact name directly under `parent_id` (root when empty).
///
/// Drive does not enforce unique names, so when several folders match the
/// first one returned wins.
pub async fn find_folder_id_by_name(
    api: &dyn DriveApi,
    name: &str,
    parent_id: &str,
) -> Result<String> {
    let request = ListRequest::new(query::folder_by_name(name, parent_id), query::FIELDS_ID);
    let page = api.list_files(&request).await?;
    page.files
        .into_iter()
        .next()
        .map(|f| f.id)
        .ok_or_else(|| Error::not_found(format!("folder '{}' not found", name)))
}

/// Find `name` under `parent_id`, creating it when it does not exist.
pub async fn find_or_create_folder(
    api: &dyn DriveApi,
    name: &str,
    parent_id: &str,
) -> Result<String> {
    match find_folder_id_by_name(api, name, parent_id).await {
        Ok(id) => Ok(id),
        Err(e) if e.is_not_found() => {
            let created = api
                .create_folder(&FileMetadata::folder(name, parent_id))
                .await
                .map_err(|e| e.context(format!("unable to create folder '{}'", name)))?;
            info!("Created folder '{}' ({}) under {}", name, created.id, parent_id);
            Ok(created.id)
        }
        Err(e) => Err(e),
    }
}

/// Walk `path` from the root, creating missing folders on the way, and
/// return the id of the last folder.
///
/// Existing folders are never touched; only the missing tail is created, in
/// order, each under the previous one.
pub async fn resolve_or_create(api: &dyn DriveApi, path: &FolderPath) -> Result<String> {
    let mut current = ROOT_FOLDER_ID.to_string();
    for segment in path.segments() {
        current = find_or_create_folder(api, segment, &current).await?;
    }
    debug!("Resolved '{}' to {}", path, current);
    Ok(current)
}
