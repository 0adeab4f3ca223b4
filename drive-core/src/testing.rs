//! In-memory [`DriveApi`] used by unit tests.
//!
//! Understands the handful of query shapes built in [`crate::query`] and
//! records every call so tests can assert on remote traffic.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::DriveApi;
use crate::error::{Error, Result};
use crate::types::{
    About, AboutUser, DriveFile, FileList, FileMetadata, ListRequest, FOLDER_MIME_TYPE,
    ROOT_FOLDER_ID,
};

/// A recorded remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(String),
    CreateFolder { name: String, parent: String },
    CreateFile { name: String, parent: String },
    Update { file_id: String },
    Export { file_id: String, mime_type: String },
    Download { file_id: String },
    About,
}

#[derive(Default)]
struct FakeState {
    items: Vec<DriveFile>,
    contents: HashMap<String, Vec<u8>>,
    shared: HashSet<String>,
    pages: HashMap<String, Vec<Vec<DriveFile>>>,
    calls: Vec<Call>,
    next_id: usize,
    fail_lists: bool,
    fail_creates: bool,
}

#[derive(Default)]
pub struct FakeDrive {
    state: Mutex<FakeState>,
}

impl FakeDrive {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut FakeState) -> T) -> T {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    fn insert(&self, name: &str, parent: &str, mime_type: &str, prefix: &str) -> String {
        self.with_state(|s| {
            s.next_id += 1;
            let id = format!("{}-{}", prefix, s.next_id);
            s.items.push(DriveFile {
                id: id.clone(),
                name: name.to_string(),
                mime_type: mime_type.to_string(),
                parents: vec![parent.to_string()],
            });
            id
        })
    }

    /// Seed an existing folder, returning its id
    pub fn add_folder(&self, name: &str, parent: &str) -> String {
        self.insert(name, parent, FOLDER_MIME_TYPE, "folder")
    }

    /// Seed an existing file with content, returning its id
    pub fn add_file(&self, name: &str, parent: &str, mime_type: &str, content: &[u8]) -> String {
        let id = self.insert(name, parent, mime_type, "file");
        self.with_state(|s| s.contents.insert(id.clone(), content.to_vec()));
        id
    }

    /// Mark an item as shared with the account
    pub fn share(&self, id: &str) {
        self.with_state(|s| s.shared.insert(id.to_string()));
    }

    /// Serve `pages` in order for list calls with exactly `query`
    pub fn script_pages(&self, query: &str, pages: Vec<Vec<DriveFile>>) {
        self.with_state(|s| s.pages.insert(query.to_string(), pages));
    }

    pub fn fail_lists(&self) {
        self.with_state(|s| s.fail_lists = true);
    }

    pub fn fail_creates(&self) {
        self.with_state(|s| s.fail_creates = true);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.with_state(|s| s.calls.clone())
    }

    /// Folder creations, in order, as (name, parent)
    pub fn created_folders(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::CreateFolder { name, parent } => Some((name, parent)),
                _ => None,
            })
            .collect()
    }

    pub fn item(&self, id: &str) -> Option<DriveFile> {
        self.with_state(|s| s.items.iter().find(|f| f.id == id).cloned())
    }

    pub fn content(&self, id: &str) -> Option<Vec<u8>> {
        self.with_state(|s| s.contents.get(id).cloned())
    }

    /// Ids of folders named `name` directly under `parent`
    pub fn folders_named(&self, name: &str, parent: &str) -> Vec<String> {
        self.with_state(|s| {
            s.items
                .iter()
                .filter(|f| f.is_folder() && f.name == name && f.parents.iter().any(|p| p == parent))
                .map(|f| f.id.clone())
                .collect()
        })
    }
}

/// Conditions pulled out of a query string
#[derive(Default)]
struct Filter {
    parent: Option<String>,
    name: Option<String>,
    mime_eq: Option<String>,
    mime_ne: Option<String>,
    shared: bool,
}

impl Filter {
    fn parse(query: &str) -> Self {
        let mut filter = Filter {
            shared: query.contains("sharedWithMe = true"),
            ..Default::default()
        };

        let chars: Vec<char> = query.chars().collect();
        let mut i = 0;
        let mut before = String::new();
        while i < chars.len() {
            if chars[i] != '\'' {
                before.push(chars[i]);
                i += 1;
                continue;
            }
            let mut literal = String::new();
            i += 1;
            while i < chars.len() && chars[i] != '\'' {
                if chars[i] == '\\' && i + 1 < chars.len() {
                    i += 1;
                }
                literal.push(chars[i]);
                i += 1;
            }
            i += 1;
            let after: String = chars[i.min(chars.len())..].iter().collect();

            if after.starts_with(" in parents") {
                filter.parent = Some(literal);
            } else if before.ends_with("name = ") {
                filter.name = Some(literal);
            } else if before.ends_with("mimeType = ") {
                filter.mime_eq = Some(literal);
            } else if before.ends_with("mimeType != ") {
                filter.mime_ne = Some(literal);
            }
            before.clear();
        }
        filter
    }

    fn matches(&self, file: &DriveFile, shared: &HashSet<String>) -> bool {
        let in_parent = match &self.parent {
            Some(p) => file.parents.iter().any(|fp| fp == p),
            None => true,
        };
        let location_ok = in_parent || (self.shared && shared.contains(&file.id));
        location_ok
            && self.name.as_ref().is_none_or(|n| &file.name == n)
            && self.mime_eq.as_ref().is_none_or(|m| &file.mime_type == m)
            && self.mime_ne.as_ref().is_none_or(|m| &file.mime_type != m)
    }
}

#[async_trait]
impl DriveApi for FakeDrive {
    async fn list_files(&self, request: &ListRequest) -> Result<FileList> {
        self.with_state(|s| {
            s.calls.push(Call::List(request.query.clone()));
            if s.fail_lists {
                return Err(Error::communication("list failed"));
            }

            if let Some(pages) = s.pages.get(&request.query) {
                let index: usize = request
                    .page_token
                    .as_deref()
                    .and_then(|t| t.strip_prefix("page-"))
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(0);
                let files = pages.get(index).cloned().unwrap_or_default();
                let next_page_token = (index + 1 < pages.len()).then(|| format!("page-{}", index + 1));
                return Ok(FileList { files, next_page_token });
            }

            let filter = Filter::parse(&request.query);
            let files = s
                .items
                .iter()
                .filter(|f| filter.matches(f, &s.shared))
                .cloned()
                .collect();
            Ok(FileList { files, next_page_token: None })
        })
    }

    async fn create_folder(&self, metadata: &FileMetadata) -> Result<DriveFile> {
        let parent = metadata
            .parents
            .first()
            .cloned()
            .unwrap_or_else(|| ROOT_FOLDER_ID.to_string());
        let failed = self.with_state(|s| {
            s.calls.push(Call::CreateFolder {
                name: metadata.name.clone(),
                parent: parent.clone(),
            });
            s.fail_creates
        });
        if failed {
            return Err(Error::communication("create failed"));
        }
        let id = self.add_folder(&metadata.name, &parent);
        Ok(self.item(&id).unwrap_or_default())
    }

    async fn create_file(&self, metadata: &FileMetadata, content: &[u8]) -> Result<DriveFile> {
        let parent = metadata
            .parents
            .first()
            .cloned()
            .unwrap_or_else(|| ROOT_FOLDER_ID.to_string());
        let failed = self.with_state(|s| {
            s.calls.push(Call::CreateFile {
                name: metadata.name.clone(),
                parent: parent.clone(),
            });
            s.fail_creates
        });
        if failed {
            return Err(Error::communication("create failed"));
        }
        let mime_type = metadata.mime_type.clone().unwrap_or_else(|| "text/plain".into());
        let id = self.add_file(&metadata.name, &parent, &mime_type, content);
        Ok(self.item(&id).unwrap_or_default())
    }

    async fn update_file(
        &self,
        file_id: &str,
        metadata: &FileMetadata,
        content: &[u8],
    ) -> Result<DriveFile> {
        self.with_state(|s| {
            s.calls.push(Call::Update { file_id: file_id.to_string() });
            let item = s
                .items
                .iter_mut()
                .find(|f| f.id == file_id)
                .ok_or_else(|| Error::communication("404 file not found"))?;
            item.name = metadata.name.clone();
            if let Some(mime) = &metadata.mime_type {
                item.mime_type = mime.clone();
            }
            let updated = item.clone();
            s.contents.insert(file_id.to_string(), content.to_vec());
            Ok(updated)
        })
    }

    async fn export_file(&self, file_id: &str, mime_type: &str) -> Result<Vec<u8>> {
        self.with_state(|s| {
            s.calls.push(Call::Export {
                file_id: file_id.to_string(),
                mime_type: mime_type.to_string(),
            });
            s.contents
                .get(file_id)
                .cloned()
                .ok_or_else(|| Error::communication("404 file not found"))
        })
    }

    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>> {
        self.with_state(|s| {
            s.calls.push(Call::Download { file_id: file_id.to_string() });
            s.contents
                .get(file_id)
                .cloned()
                .ok_or_else(|| Error::communication("404 file not found"))
        })
    }

    async fn about(&self) -> Result<About> {
        self.with_state(|s| s.calls.push(Call::About));
        Ok(About {
            user: Some(AboutUser {
                email_address: Some("tester@example.com".into()),
                display_name: None,
            }),
        })
    }
}
