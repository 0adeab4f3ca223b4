//! Keyword-based folder suggestion.

use tracing::debug;

use crate::api::DriveApi;
use crate::error::Result;
use crate::folders::find_or_create_folder;
use crate::types::ROOT_FOLDER_ID;

/// A keyword rule: any keyword found in the lower-cased content name maps
/// the content to `folder`.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionRule {
    pub keywords: &'static [&'static str],
    pub folder: &'static str,
}

impl SuggestionRule {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// Rules in priority order; the first match wins.
pub const SUGGESTION_RULES: &[SuggestionRule] = &[
    SuggestionRule { keywords: &["report"], folder: "Reports" },
    SuggestionRule { keywords: &["image", "photo"], folder: "Images" },
    SuggestionRule { keywords: &["document", "doc"], folder: "Documents" },
    SuggestionRule { keywords: &["code", "src"], folder: "Code" },
];

pub const DEFAULT_FOLDER: &str = "Miscellaneous";

/// Pick the folder name for `content_name`.
pub fn suggest_folder_name(content_name: &str) -> &'static str {
    let lowered = content_name.to_lowercase();
    SUGGESTION_RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.folder)
        .unwrap_or(DEFAULT_FOLDER)
}

/// Suggest a top-level folder for `content_name`, creating it if needed,
/// and return its id.
pub async fn suggest_folder(api: &dyn DriveApi, content_name: &str) -> Result<String> {
    let folder = suggest_folder_name(content_name);
    debug!("suggest_folder: '{}' -> {}", content_name, folder);
    find_or_create_folder(api, folder, ROOT_FOLDER_ID).await
}
