//! drive-core - Core library for Drive MCP
//!
//! This crate provides the Google Drive side of the MCP server:
//!
//! - **api**: the `DriveApi` trait every operation goes through
//! - **client**: Drive v3 REST implementation of `DriveApi`
//! - **auth**: OAuth client secret, token storage and refresh
//! - **folders**: folder lookup and path resolution with implicit creation
//! - **files**: create, update, list, search and read files
//! - **suggest**: keyword-based destination folder suggestion
//! - **summary**: placeholder content summarization

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod files;
pub mod folders;
pub mod path;
pub mod query;
pub mod suggest;
pub mod summary;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use api::DriveApi;
pub use client::DriveClient;
pub use error::{Error, Result};
pub use path::FolderPath;
pub use types::DriveFile;
