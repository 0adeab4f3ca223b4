//! Server configuration.
//!
//! Configuration is loaded from multiple sources with precedence:
//! 1. Environment variables (DRIVE_MCP_*)
//! 2. Config file (~/.drive-mcp/config.toml)
//! 3. Default values

use anyhow::{Context, Result};
use drive_core::client::{DEFAULT_API_BASE_URL, DEFAULT_UPLOAD_BASE_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Transport the MCP server listens on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// JSON-RPC over stdin/stdout
    #[default]
    Stdio,
    /// Streamable HTTP at /mcp
    Http,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path the configuration was read from
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub drive: DriveConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// OAuth client secret JSON from the Google Cloud console
    #[serde(default = "default_client_secret_path")]
    pub client_secret_path: PathBuf,

    /// Where the OAuth token is stored
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub transport: Transport,

    /// Listen address for the HTTP transport
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_upload_base_url")]
    pub upload_base_url: String,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("DRIVE_MCP_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".drive-mcp")
}

fn default_client_secret_path() -> PathBuf {
    default_data_dir().join("secrets").join("oauth.json")
}

fn default_token_path() -> PathBuf {
    default_data_dir().join("data").join("token.json")
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_upload_base_url() -> String {
    DEFAULT_UPLOAD_BASE_URL.to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_secret_path: default_client_secret_path(),
            token_path: default_token_path(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            bind: default_bind(),
        }
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            upload_base_url: default_upload_base_url(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: Self::config_path(),
            auth: AuthConfig::default(),
            server: ServerConfig::default(),
            drive: DriveConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Standard directory structure:
    /// ```text
    /// ~/.drive-mcp/
    /// ├── config.toml           # Optional overrides
    /// ├── secrets/
    /// │   └── oauth.json        # OAuth client secret
    /// └── data/
    ///     └── token.json        # Saved OAuth token
    /// ```
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file, then apply env overrides.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut config: Config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
            toml::from_str(&content).context("Failed to parse config file")?
        } else {
            Config::default()
        };
        config.config_path = config_path.to_path_buf();
        config.apply_env();

        // Token directory must exist before the auth flow writes into it
        if let Some(token_dir) = config.auth.token_path.parent() {
            std::fs::create_dir_all(token_dir).with_context(|| {
                format!("Failed to create token directory {}", token_dir.display())
            })?;
        }

        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(path) = std::env::var("DRIVE_MCP_CLIENT_SECRET") {
            self.auth.client_secret_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("DRIVE_MCP_TOKEN") {
            self.auth.token_path = PathBuf::from(path);
        }
        if let Ok(bind) = std::env::var("DRIVE_MCP_BIND") {
            self.server.bind = bind;
        }
    }

    /// Get the config file path.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("DRIVE_MCP_CONFIG") {
            PathBuf::from(path)
        } else {
            default_data_dir().join("config.toml")
        }
    }
}
