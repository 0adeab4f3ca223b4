//! OAuth 2.0 authentication for the Drive API.
//!
//! Provides:
//! - Client secret loading (Google console `installed`/`web` JSON)
//! - Token file persistence (0600)
//! - Authorization-code URL and exchange for first-time setup
//! - [`Authenticator`], which hands out access tokens and refreshes them

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Full read/write access to the user's Drive
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

const DEFAULT_REDIRECT_URI: &str = "http://localhost";

/// Tokens this close to expiry are treated as expired
const EXPIRY_LEEWAY_SECS: i64 = 10;

// ─────────────────────────────────────────────────────────────────────────────
// Client Secret
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
struct SecretSection {
    client_id: String,
    client_secret: String,
    auth_uri: String,
    token_uri: String,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SecretFile {
    installed: Option<SecretSection>,
    web: Option<SecretSection>,
}

/// OAuth client settings parsed from a client secret file
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

impl OAuthConfig {
    /// Parse the JSON downloaded from the Google Cloud console
    pub fn from_json(json: &str, scope: &str) -> Result<Self> {
        let file: SecretFile = serde_json::from_str(json)?;
        let section = file
            .installed
            .or(file.web)
            .ok_or_else(|| Error::Auth("client secret has no 'installed' or 'web' section".into()))?;

        Ok(Self {
            redirect_uri: section
                .redirect_uris
                .first()
                .cloned()
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            client_id: section.client_id,
            client_secret: section.client_secret,
            auth_uri: section.auth_uri,
            token_uri: section.token_uri,
            scopes: vec![scope.to_string()],
        })
    }

    /// Read and parse a client secret file
    pub fn from_file(path: &Path, scope: &str) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            Error::Auth(format!(
                "unable to read client secret file from '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json, scope)
    }

    /// URL the user opens to grant access. `access_type=offline` asks for a
    /// refresh token.
    pub fn auth_code_url(&self, state: &str) -> Result<String> {
        let scope = self.scopes.join(" ");
        let url = reqwest::Url::parse_with_params(
            &self.auth_uri,
            &[
                ("access_type", "offline"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", scope.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| Error::Auth(format!("invalid auth_uri '{}': {}", self.auth_uri, e)))?;
        Ok(url.to_string())
    }

    /// Trade an authorization code for a token
    pub async fn exchange_code(&self, code: &str) -> Result<Token> {
        let http = reqwest::Client::new();
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];
        let response = self.token_request(&http, &params).await?;
        Ok(response.into_token(None))
    }

    /// Get a fresh access token using a refresh token
    pub async fn refresh(&self, http: &reqwest::Client, refresh_token: &str) -> Result<Token> {
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];
        let response = self.token_request(http, &params).await?;
        Ok(response.into_token(Some(refresh_token)))
    }

    async fn token_request(
        &self,
        http: &reqwest::Client,
        params: &[(&str, &str)],
    ) -> Result<TokenResponse> {
        debug!("Token request: POST {}", self.token_uri);
        let resp = http
            .post(&self.token_uri)
            .form(params)
            .send()
            .await
            .map_err(|e| Error::Auth(format!("token request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Auth(format!("token endpoint returned {}: {}", status, body)));
        }
        resp.json()
            .await
            .map_err(|e| Error::Auth(format!("invalid token response: {}", e)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────────────

/// An OAuth token as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_expiry"
    )]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Go's oauth2 writes a token without expiry as the zero time
/// (`0001-01-01T00:00:00Z`); anything at or before the epoch means none.
fn deserialize_expiry<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let expiry = Option::<DateTime<Utc>>::deserialize(deserializer)?;
    Ok(expiry.filter(|t| t.timestamp() > 0))
}

impl Token {
    /// A token that never expires and cannot be refreshed
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: default_token_type(),
            refresh_token: None,
            expiry: None,
        }
    }

    /// Whether the token is expired as of `now`. Tokens without an expiry
    /// never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => expiry - Duration::seconds(EXPIRY_LEEWAY_SECS) <= now,
            None => false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Load a token from a JSON file
    pub fn read_from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Write token to file with restricted permissions (0600)
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string(self)?)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    /// Refresh responses usually omit the refresh token; keep the old one.
    fn into_token(self, previous_refresh: Option<&str>) -> Token {
        Token {
            access_token: self.access_token,
            token_type: self.token_type,
            refresh_token: self
                .refresh_token
                .or_else(|| previous_refresh.map(str::to_string)),
            expiry: self.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authenticator
// ─────────────────────────────────────────────────────────────────────────────

/// Hands out valid access tokens, refreshing (and re-saving) when expired.
pub struct Authenticator {
    oauth: Option<OAuthConfig>,
    token: RwLock<Token>,
    token_path: Option<PathBuf>,
    http: reqwest::Client,
}

impl Authenticator {
    /// Authenticator backed by a client secret and a stored token
    pub fn new(oauth: OAuthConfig, token: Token, token_path: Option<PathBuf>) -> Self {
        Self {
            oauth: Some(oauth),
            token: RwLock::new(token),
            token_path,
            http: reqwest::Client::new(),
        }
    }

    /// Authenticator with a fixed token and no refresh capability
    pub fn with_static_token(token: Token) -> Self {
        Self {
            oauth: None,
            token: RwLock::new(token),
            token_path: None,
            http: reqwest::Client::new(),
        }
    }

    /// Load the client secret and the saved token from disk.
    pub fn from_files(client_secret_path: &Path, token_path: &Path) -> Result<Self> {
        let oauth = OAuthConfig::from_file(client_secret_path, DRIVE_SCOPE)?;
        let token = Token::read_from_file(token_path).map_err(|e| {
            Error::Auth(format!(
                "no usable token at '{}' ({}); run `drive-mcp auth` first",
                token_path.display(),
                e
            ))
        })?;
        Ok(Self::new(oauth, token, Some(token_path.to_path_buf())))
    }

    /// Current access token, refreshed first if it has expired
    pub async fn access_token(&self) -> Result<String> {
        {
            let token = self.token.read().await;
            if !token.is_expired() {
                return Ok(token.access_token.clone());
            }
        }

        let mut token = self.token.write().await;
        // another caller may have refreshed while we waited
        if !token.is_expired() {
            return Ok(token.access_token.clone());
        }

        let oauth = self
            .oauth
            .as_ref()
            .ok_or_else(|| Error::Auth("token expired and no client secret to refresh it".into()))?;
        let refresh_token = token
            .refresh_token
            .clone()
            .ok_or_else(|| Error::Auth("token expired and has no refresh token".into()))?;

        let fresh = oauth.refresh(&self.http, &refresh_token).await?;
        info!("Refreshed Drive access token");

        if let Some(path) = &self.token_path {
            if let Err(e) = fresh.write_to_file(path) {
                warn!("Failed to save refreshed token to {}: {}", path.display(), e);
            }
        }

        *token = fresh;
        Ok(token.access_token.clone())
    }
}
