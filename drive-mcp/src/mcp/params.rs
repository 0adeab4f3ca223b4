//! Tool parameter types.
//!
//! Required strings are `Option` here so a missing argument reaches the
//! handler and is reported in the tool result instead of failing the call.

use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

/// Parameters for create_file_in_path, create_docx_file_in_path and
/// update_docx_file_content
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct PathContentParams {
    /// The full path including filename (e.g., 'MyFolder/file.txt'). Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// The content of the file. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Parameters for suggest_folder_for_content
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct SuggestFolderParams {
    /// The name of the content to suggest a folder for. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_name: Option<String>,
}

/// Parameters for list_files_and_folders
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListFolderParams {
    /// The ID of the folder to list files and folders from. Defaults to root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
}

/// Parameters for search_drive_items
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Drive search query, e.g. "name contains 'Projects'". Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// Parameters for read_file_content
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ReadFileParams {
    /// The ID of the file to read. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    /// The file's MIME type, as reported by a listing. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Parameters for summarize_content
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct SummarizeParams {
    /// The text to summarize. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}
