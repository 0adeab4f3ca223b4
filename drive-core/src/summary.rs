//! Placeholder summarization.
//!
//! There is no model behind this; long content is cut down to a preview.

use crate::error::{Error, Result};

/// Characters kept before truncating
pub const SUMMARY_MAX_CHARS: usize = 500;

const ELLIPSIS: &str = "...";

/// Return `content` unchanged when short, otherwise its first
/// [`SUMMARY_MAX_CHARS`] characters followed by `...`.
pub fn summarize_content(content: &str) -> Result<String> {
    if content.is_empty() {
        return Err(Error::validation("content must not be empty"));
    }

    match content.char_indices().nth(SUMMARY_MAX_CHARS) {
        None => Ok(content.to_string()),
        Some((cut, _)) => Ok(format!("{}{}", &content[..cut], ELLIPSIS)),
    }
}
