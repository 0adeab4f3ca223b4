//! Error types for drive-core.

use thiserror::Error;

/// Result type alias using drive-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Drive operations
#[derive(Error, Debug)]
pub enum Error {
    // Remote errors
    #[error("Drive request failed: {0}")]
    Communication(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // Caller errors
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Unsupported mime type for reading: {0}")]
    UnsupportedType(String),

    // Auth errors
    #[error("Authentication error: {0}")]
    Auth(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a communication error
    pub fn communication(message: impl Into<String>) -> Self {
        Self::Communication(message.into())
    }

    /// Prefix a communication error with what was being attempted. Other
    /// kinds already say what went wrong and pass through unchanged.
    pub fn context(self, context: impl std::fmt::Display) -> Self {
        match self {
            Self::Communication(message) => Self::Communication(format!("{}: {}", context, message)),
            other => other,
        }
    }

    /// Whether this error means a lookup came back empty
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Communication(e.to_string())
    }
}
