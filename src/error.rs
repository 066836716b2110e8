//! Error types for the drive_roster crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building the shared-drive roster.
#[derive(Error, Debug)]
pub enum DriveError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write roster to {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for DriveError.
pub type Result<T> = std::result::Result<T, DriveError>;
