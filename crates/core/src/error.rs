//! Error types for vizboot-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for vizboot-core
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for vizboot-core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid configuration format
    #[error("Invalid configuration file {}: {reason}", .path.display())]
    InvalidConfig { path: PathBuf, reason: String },

    /// Server REST API errors
    #[error("Server API error: {0}")]
    Api(String),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// An authenticated call was made without signing in first
    #[error("Not signed in: call sign_in before other server operations")]
    SignInRequired,

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Timeout
    #[error("Operation timed out")]
    Timeout,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] toml::de::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else if err.is_connect() {
            Error::Network(err.to_string())
        } else if err.is_request() {
            Error::HttpClient(err.to_string())
        } else {
            Error::Network(err.to_string())
        }
    }
}
