//! Drive search query builders.
//!
//! Drive's `q` syntax wraps string literals in single quotes; quotes and
//! backslashes inside a literal must be backslash-escaped.

use crate::types::{FOLDER_MIME_TYPE, ROOT_FOLDER_ID};

/// Field selector for list calls that only need ids.
pub const FIELDS_ID: &str = "files(id)";
/// Field selector for id + name listings.
pub const FIELDS_ID_NAME: &str = "files(id, name)";
/// Field selector for full listings.
pub const FIELDS_ID_NAME_MIME: &str = "files(id, name, mimeType)";
/// Field selector for paginated listings.
pub const FIELDS_PAGED: &str = "nextPageToken, files(id, name, mimeType)";

/// Escape a value for use inside a single-quoted query literal
pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn parent_or_root(parent_id: &str) -> &str {
    if parent_id.is_empty() { ROOT_FOLDER_ID } else { parent_id }
}

/// Folders at the top of the drive plus folders shared with the account
pub fn root_folders() -> String {
    format!(
        "('{}' in parents or sharedWithMe = true) and mimeType = '{}' and trashed = false",
        ROOT_FOLDER_ID, FOLDER_MIME_TYPE
    )
}

/// A folder with an exact name directly under `parent_id` (root when empty)
pub fn folder_by_name(name: &str, parent_id: &str) -> String {
    format!(
        "'{}' in parents and name = '{}' and mimeType = '{}' and trashed = false",
        escape_literal(parent_or_root(parent_id)),
        escape_literal(name),
        FOLDER_MIME_TYPE
    )
}

/// A non-folder item with an exact name directly under `parent_id`
pub fn file_by_name(name: &str, parent_id: &str) -> String {
    format!(
        "name = '{}' and '{}' in parents and trashed = false and mimeType != '{}'",
        escape_literal(name),
        escape_literal(parent_or_root(parent_id)),
        FOLDER_MIME_TYPE
    )
}

/// Everything directly inside `folder_id` (root when empty)
pub fn children_of(folder_id: &str) -> String {
    format!(
        "'{}' in parents and trashed = false",
        escape_literal(parent_or_root(folder_id))
    )
}
