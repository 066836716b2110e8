//! Run configuration for the roster tool.

use std::path::PathBuf;

/// Google Drive API scope requested during authorization.
///
/// If this changes, delete the token file so a new consent is recorded.
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// Everything a single run needs, passed into each component at construction.
#[derive(Debug, Clone)]
pub struct Config {
    /// Persisted credential file, read at startup and overwritten after any
    /// new-credential or refresh event.
    pub token_path: PathBuf,
    /// Client-registration JSON provisioned from the Google console.
    pub secrets_path: PathBuf,
    /// Destinations for the roster. Files are created if absent and
    /// overwritten if present; previous contents are lost irrecoverably.
    pub output_paths: Vec<PathBuf>,
    /// Records requested per drives.list page.
    pub page_size: u32,
    pub scopes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token_path: PathBuf::from("token.json"),
            secrets_path: PathBuf::from("credentials.json"),
            output_paths: vec![PathBuf::from("output.txt")],
            page_size: 20,
            scopes: vec![DRIVE_SCOPE.to_string()],
        }
    }
}
