//! MCP Server implementation.
//!
//! One tool per Drive operation. Every failure is returned as an error tool
//! result carrying `{"success": false, "error": ...}` rather than as a
//! protocol error.

use drive_core::{DriveFile, Error, files, folders, suggest, summary};
use rmcp::{
    ErrorData, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, warn};

use super::params::{
    ListFolderParams, PathContentParams, ReadFileParams, SearchParams, SuggestFolderParams,
    SummarizeParams,
};
use crate::state::AppState;

/// Drive MCP Server
///
/// Provides MCP tools over the shared Drive client.
#[derive(Clone)]
pub struct DriveMcpServer {
    state: Arc<AppState>,
    tool_router: ToolRouter<Self>,
}

impl DriveMcpServer {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }
}

/// Fetch a required string argument
fn required<'a>(name: &str, value: &'a Option<String>) -> drive_core::Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| Error::validation(format!("required argument \"{}\" not found", name)))
}

fn file_entries(files: &[DriveFile]) -> Vec<Value> {
    files
        .iter()
        .map(|f| json!({"id": f.id, "name": f.name, "mime_type": f.mime_type}))
        .collect()
}

fn created_payload(file: &DriveFile) -> Value {
    json!({"file_id": file.id, "file_name": file.name})
}

/// Turn an operation outcome into a tool result
fn respond(tool: &str, outcome: drive_core::Result<Value>) -> Result<CallToolResult, ErrorData> {
    match outcome {
        Ok(payload) => Ok(CallToolResult::success(vec![Content::text(payload.to_string())])),
        Err(e) => {
            warn!("{} failed: {}", tool, e);
            Ok(CallToolResult::error(vec![Content::text(
                json!({"success": false, "error": e.to_string()}).to_string(),
            )]))
        }
    }
}

#[tool_router]
impl DriveMcpServer {
    #[tool(description = "Fetches the list of root level folders in Google Drive.")]
    async fn list_root_folders(&self) -> Result<CallToolResult, ErrorData> {
        let outcome = folders::list_root_folders(self.state.drive.as_ref())
            .await
            .map(|folders| {
                let folders: Vec<_> = folders
                    .iter()
                    .map(|f| json!({"id": f.id, "name": f.name}))
                    .collect();
                json!({ "folders": folders })
            });
        respond("list_root_folders", outcome)
    }

    #[tool(description = "Creates a file with the given content in the specified Google Drive path. Missing folders along the path are created.")]
    async fn create_file_in_path(
        &self,
        Parameters(params): Parameters<PathContentParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = async {
            let path = required("path", &params.path)?;
            let content = required("content", &params.content)?;
            let file = files::create_file_in_path(self.state.drive.as_ref(), path, content).await?;
            Ok::<_, Error>(created_payload(&file))
        }
        .await;
        respond("create_file_in_path", outcome)
    }

    #[tool(description = "Creates a .docx file with the given content in the specified Google Drive path. The file name must end in .docx.")]
    async fn create_docx_file_in_path(
        &self,
        Parameters(params): Parameters<PathContentParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = async {
            let path = required("path", &params.path)?;
            let content = required("content", &params.content)?;
            let file =
                files::create_docx_file_in_path(self.state.drive.as_ref(), path, content).await?;
            Ok::<_, Error>(created_payload(&file))
        }
        .await;
        respond("create_docx_file_in_path", outcome)
    }

    #[tool(description = "Replaces the content of an existing .docx file at the specified Google Drive path.")]
    async fn update_docx_file_content(
        &self,
        Parameters(params): Parameters<PathContentParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = async {
            let path = required("path", &params.path)?;
            let content = required("content", &params.content)?;
            let file =
                files::update_docx_file_content(self.state.drive.as_ref(), path, content).await?;
            Ok::<_, Error>(created_payload(&file))
        }
        .await;
        respond("update_docx_file_content", outcome)
    }

    #[tool(description = "Suggests a folder based on the content name, creating it at the top of the drive if needed.")]
    async fn suggest_folder_for_content(
        &self,
        Parameters(params): Parameters<SuggestFolderParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = async {
            let content_name = required("content_name", &params.content_name)?;
            let folder_id = suggest::suggest_folder(self.state.drive.as_ref(), content_name).await?;
            Ok::<_, Error>(json!({ "suggested_folder_id": folder_id }))
        }
        .await;
        respond("suggest_folder_for_content", outcome)
    }

    #[tool(description = "Lists files and folders within a specific folder. Defaults to root.")]
    async fn list_files_and_folders(
        &self,
        Parameters(params): Parameters<ListFolderParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = files::list_files_and_folders(
            self.state.drive.as_ref(),
            params.folder_id.as_deref(),
        )
        .await
        .map(|files| json!({ "files": file_entries(&files) }));
        respond("list_files_and_folders", outcome)
    }

    #[tool(description = "Searches files and folders using Google Drive query syntax (e.g. \"name contains 'Projects'\"). Returns every page of results.")]
    async fn search_drive_items(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = async {
            let query = required("query", &params.query)?;
            let files = files::search_drive_items(self.state.drive.as_ref(), query).await?;
            debug!("search_drive_items: returning {} items", files.len());
            Ok::<_, Error>(json!({ "files": file_entries(&files) }))
        }
        .await;
        respond("search_drive_items", outcome)
    }

    #[tool(description = "Reads the content of a file. Google Docs are exported as plain text; .docx, PDF and text files are downloaded as-is.")]
    async fn read_file_content(
        &self,
        Parameters(params): Parameters<ReadFileParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = async {
            let file_id = required("file_id", &params.file_id)?;
            let mime_type = required("mime_type", &params.mime_type)?;
            let content =
                files::read_file_content(self.state.drive.as_ref(), file_id, mime_type).await?;
            Ok::<_, Error>(json!({ "content": content }))
        }
        .await;
        respond("read_file_content", outcome)
    }

    #[tool(description = "Returns a short preview of the given content (truncated to 500 characters).")]
    async fn summarize_content(
        &self,
        Parameters(params): Parameters<SummarizeParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = required("content", &params.content)
            .and_then(summary::summarize_content)
            .map(|summary| json!({ "summary": summary }));
        respond("summarize_content", outcome)
    }
}

#[tool_handler]
impl ServerHandler for DriveMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Google Drive MCP Server - List folders, create and update files by path, suggest folders, search and read content."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "drive-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use drive_core::DriveApi;
    use drive_core::types::{About, FileList, FileMetadata, ListRequest};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Serves canned list pages and echoes creations
    #[derive(Default)]
    struct StubDrive {
        pages: Mutex<VecDeque<FileList>>,
        calls: Mutex<Vec<String>>,
    }

    impl StubDrive {
        fn with_pages(pages: Vec<Vec<DriveFile>>) -> Self {
            let mut queue = VecDeque::new();
            let count = pages.len();
            for (i, files) in pages.into_iter().enumerate() {
                let next_page_token = (i + 1 < count).then(|| format!("p{}", i + 1));
                queue.push_back(FileList { files, next_page_token });
            }
            Self { pages: Mutex::new(queue), ..Default::default() }
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DriveApi for StubDrive {
        async fn list_files(&self, request: &ListRequest) -> drive_core::Result<FileList> {
            self.record(format!("list {}", request.query));
            Ok(self.pages.lock().unwrap().pop_front().unwrap_or_default())
        }

        async fn create_folder(&self, metadata: &FileMetadata) -> drive_core::Result<DriveFile> {
            self.record(format!("create_folder {}", metadata.name));
            Ok(DriveFile { id: format!("id-{}", metadata.name), name: metadata.name.clone(), ..Default::default() })
        }

        async fn create_file(&self, metadata: &FileMetadata, _content: &[u8]) -> drive_core::Result<DriveFile> {
            self.record(format!("create_file {}", metadata.name));
            Ok(DriveFile { id: "new-file".into(), name: metadata.name.clone(), ..Default::default() })
        }

        async fn update_file(&self, file_id: &str, metadata: &FileMetadata, _content: &[u8]) -> drive_core::Result<DriveFile> {
            self.record(format!("update {}", file_id));
            Ok(DriveFile { id: file_id.into(), name: metadata.name.clone(), ..Default::default() })
        }

        async fn export_file(&self, file_id: &str, _mime_type: &str) -> drive_core::Result<Vec<u8>> {
            self.record(format!("export {}", file_id));
            Ok(b"exported text".to_vec())
        }

        async fn download_file(&self, file_id: &str) -> drive_core::Result<Vec<u8>> {
            self.record(format!("download {}", file_id));
            Ok(b"raw text".to_vec())
        }

        async fn about(&self) -> drive_core::Result<About> {
            Ok(About::default())
        }
    }

    fn server_with(drive: Arc<StubDrive>) -> DriveMcpServer {
        DriveMcpServer::new(Arc::new(AppState::new(drive)))
    }

    fn file(id: &str, name: &str, mime: &str) -> DriveFile {
        DriveFile { id: id.into(), name: name.into(), mime_type: mime.into(), ..Default::default() }
    }

    /// Parse the JSON text payload of a tool result
    fn payload(result: &CallToolResult) -> Value {
        let text = result.content[0]
            .as_text()
            .map(|t| t.text.clone())
            .expect("text content");
        serde_json::from_str(&text).expect("json payload")
    }

    fn is_error(result: &CallToolResult) -> bool {
        result.is_error.unwrap_or(false)
    }

    #[tokio::test]
    async fn test_list_root_folders_payload() {
        let drive = Arc::new(StubDrive::with_pages(vec![vec![file("f1", "Work", "")]]));
        let server = server_with(drive);

        let result = server.list_root_folders().await.unwrap();

        assert!(!is_error(&result));
        assert_eq!(payload(&result), json!({"folders": [{"id": "f1", "name": "Work"}]}));
    }

    #[tokio::test]
    async fn test_create_file_payload() {
        let drive = Arc::new(StubDrive::default());
        let server = server_with(drive.clone());

        let params = PathContentParams { path: Some("notes.txt".into()), content: Some("hi".into()) };
        let result = server.create_file_in_path(Parameters(params)).await.unwrap();

        assert_eq!(payload(&result), json!({"file_id": "new-file", "file_name": "notes.txt"}));
        assert_eq!(drive.calls(), vec!["create_file notes.txt".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_parameter_is_error_payload() {
        let drive = Arc::new(StubDrive::default());
        let server = server_with(drive.clone());

        let params = PathContentParams { path: Some("a.txt".into()), content: None };
        let result = server.create_file_in_path(Parameters(params)).await.unwrap();

        assert!(is_error(&result));
        let body = payload(&result);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("content"));
        assert!(drive.calls().is_empty());
    }

    #[tokio::test]
    async fn test_docx_extension_rejected_without_remote_calls() {
        let drive = Arc::new(StubDrive::default());
        let server = server_with(drive.clone());

        let params = PathContentParams { path: Some("Docs/plan.txt".into()), content: Some("x".into()) };
        let result = server.create_docx_file_in_path(Parameters(params)).await.unwrap();

        assert!(is_error(&result));
        assert!(payload(&result)["error"].as_str().unwrap().contains(".docx"));
        assert!(drive.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_docx_payload() {
        // Docs folder lookup, then the file lookup
        let drive = Arc::new(StubDrive::with_pages(vec![]));
        drive.pages.lock().unwrap().extend([
            FileList { files: vec![file("docs", "Docs", "")], next_page_token: None },
            FileList { files: vec![file("doc-7", "plan.docx", "")], next_page_token: None },
        ]);
        let server = server_with(drive.clone());

        let params = PathContentParams { path: Some("Docs/plan.docx".into()), content: Some("v2".into()) };
        let result = server.update_docx_file_content(Parameters(params)).await.unwrap();

        assert_eq!(payload(&result), json!({"file_id": "doc-7", "file_name": "plan.docx"}));
        assert_eq!(drive.calls().last().unwrap(), "update doc-7");
    }

    #[tokio::test]
    async fn test_suggest_folder_payload() {
        let drive = Arc::new(StubDrive::default());
        let server = server_with(drive.clone());

        let params = SuggestFolderParams { content_name: Some("holiday photo.jpg".into()) };
        let result = server.suggest_folder_for_content(Parameters(params)).await.unwrap();

        assert_eq!(payload(&result), json!({"suggested_folder_id": "id-Images"}));
        assert_eq!(drive.calls().last().unwrap(), "create_folder Images");
    }

    #[tokio::test]
    async fn test_list_files_defaults_to_root() {
        let drive = Arc::new(StubDrive::with_pages(vec![vec![file("a", "a.txt", "text/plain")]]));
        let server = server_with(drive.clone());

        let result = server
            .list_files_and_folders(Parameters(ListFolderParams::default()))
            .await
            .unwrap();

        assert_eq!(
            payload(&result),
            json!({"files": [{"id": "a", "name": "a.txt", "mime_type": "text/plain"}]})
        );
        assert!(drive.calls()[0].starts_with("list 'root' in parents"));
    }

    #[tokio::test]
    async fn test_search_aggregates_pages() {
        let drive = Arc::new(StubDrive::with_pages(vec![
            vec![file("1", "one", "text/plain")],
            vec![file("2", "two", "text/plain")],
        ]));
        let server = server_with(drive.clone());

        let params = SearchParams { query: Some("name contains 'o'".into()) };
        let result = server.search_drive_items(Parameters(params)).await.unwrap();

        let body = payload(&result);
        let ids: Vec<_> = body["files"].as_array().unwrap().iter().map(|f| f["id"].clone()).collect();
        assert_eq!(ids, vec![json!("1"), json!("2")]);
        assert_eq!(drive.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_read_file_content_payload() {
        let drive = Arc::new(StubDrive::default());
        let server = server_with(drive.clone());

        let params = ReadFileParams {
            file_id: Some("doc".into()),
            mime_type: Some(drive_core::types::GOOGLE_DOC_MIME_TYPE.into()),
        };
        let result = server.read_file_content(Parameters(params)).await.unwrap();

        assert_eq!(payload(&result), json!({"content": "exported text"}));
    }

    #[tokio::test]
    async fn test_read_unsupported_type_is_error_payload() {
        let drive = Arc::new(StubDrive::default());
        let server = server_with(drive.clone());

        let params = ReadFileParams { file_id: Some("img".into()), mime_type: Some("image/png".into()) };
        let result = server.read_file_content(Parameters(params)).await.unwrap();

        assert!(is_error(&result));
        assert!(payload(&result)["error"].as_str().unwrap().contains("image/png"));
        assert!(drive.calls().is_empty());
    }

    #[tokio::test]
    async fn test_summarize_content() {
        let server = server_with(Arc::new(StubDrive::default()));

        let params = SummarizeParams { content: Some("short note".into()) };
        let result = server.summarize_content(Parameters(params)).await.unwrap();
        assert_eq!(payload(&result), json!({"summary": "short note"}));

        let result = server
            .summarize_content(Parameters(SummarizeParams::default()))
            .await
            .unwrap();
        assert!(is_error(&result));
    }

    #[test]
    fn test_all_tools_registered() {
        let server = server_with(Arc::new(StubDrive::default()));
        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        names.sort();

        assert_eq!(
            names,
            vec![
                "create_docx_file_in_path",
                "create_file_in_path",
                "list_files_and_folders",
                "list_root_folders",
                "read_file_content",
                "search_drive_items",
                "suggest_folder_for_content",
                "summarize_content",
                "update_docx_file_content",
            ]
        );
    }

    #[test]
    fn test_server_info() {
        let server = server_with(Arc::new(StubDrive::default()));
        let info = server.get_info();
        assert_eq!(info.server_info.name, "drive-mcp");
        assert!(info.capabilities.tools.is_some());
    }
}
