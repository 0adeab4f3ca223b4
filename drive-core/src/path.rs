//! Slash-separated Drive paths.

use crate::error::{Error, Result};

/// Folder names leading from the drive root to a folder.
///
/// An empty path is the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderPath {
    segments: Vec<String>,
}

impl FolderPath {
    /// Parse a folder path. Empty and `.` segments are dropped, so `""`,
    /// `"."` and `"/"` all denote the root.
    pub fn parse(path: &str) -> Self {
        let segments = path
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .map(str::to_string)
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl std::fmt::Display for FolderPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.segments.is_empty() {
            write!(f, "/")
        } else {
            write!(f, "{}", self.segments.join("/"))
        }
    }
}

/// Split a file path into its parent folder path and file name.
///
/// `"Projects/2024/notes.txt"` → (`Projects/2024`, `notes.txt`). Trailing
/// slashes are ignored. Fails when no file name remains.
pub fn split_file_path(path: &str) -> Result<(FolderPath, String)> {
    let trimmed = path.trim_end_matches('/');
    let (dir, name) = match trimmed.rsplit_once('/') {
        Some((dir, name)) => (dir, name),
        None => ("", trimmed),
    };

    if name.is_empty() || name == "." || name == ".." {
        return Err(Error::validation(format!(
            "path '{}' does not contain a file name",
            path
        )));
    }

    Ok((FolderPath::parse(dir), name.to_string()))
}
