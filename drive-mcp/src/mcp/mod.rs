//! MCP (Model Context Protocol) server implementation.
//!
//! Drive operations are exposed as tools, served over stdio or streamable
//! HTTP.

pub mod params;
pub mod server;
pub mod transport;

pub use server::DriveMcpServer;
