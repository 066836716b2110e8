//! Data models for OAuth credentials and Drive API responses.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Name written for a drive record whose source data carries no name.
pub const NAMELESS_DRIVE: &str = "nameless-drive";

/// Buffer subtracted from the expiry when deciding whether a token is still usable.
const EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// A bearer-token bundle persisted between runs.
///
/// The client id and secret are captured at issue time so a refresh exchange
/// does not need the client-registration file again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Absolute expiry as unix seconds.
    pub expires_at: u64,
    pub client_id: String,
    pub client_secret: String,
}

impl StoredCredential {
    /// Whether the access token is past (or within a minute of) its expiry.
    pub fn is_expired(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards");
        now + EXPIRY_BUFFER >= Duration::from_secs(self.expires_at)
    }
}

/// A Google client-registration file for an installed application.
#[derive(Debug, Deserialize)]
pub struct ClientSecretsFile {
    pub installed: ClientSecrets,
}

/// The `installed` section of the client-registration file.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// OAuth2 token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// One shared drive visible to the authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveRecord {
    #[serde(default = "default_drive_name")]
    pub name: String,
    #[serde(default)]
    pub id: String,
}

fn default_drive_name() -> String {
    NAMELESS_DRIVE.to_string()
}

/// Response from the drives.list API endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveListResponse {
    #[serde(default)]
    pub drives: Vec<DriveRecord>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Google API error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: u16,
    pub message: String,
}
