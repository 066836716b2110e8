//! Drive API client for listing shared drives.

use reqwest::Client;

use crate::error::{DriveError, Result};
use crate::models::{ApiErrorResponse, DriveListResponse, DriveRecord};

/// Base URL for Google Drive API v3.
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Client for the drives.list endpoint.
pub struct DriveClient {
    access_token: String,
    base_url: String,
    http: Client,
}

impl DriveClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_url(access_token, DRIVE_API_BASE)
    }

    /// Point the client at a different API base, for tests against a mock server.
    pub fn with_base_url(access_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    /// List every shared drive visible to the authenticated account.
    ///
    /// Pages are fetched sequentially and records keep their arrival order;
    /// the loop ends only when a response carries no continuation cursor.
    /// Any failed page request aborts the whole listing.
    pub async fn list_drives(&self, page_size: u32) -> Result<Vec<DriveRecord>> {
        let page_size = page_size.to_string();
        let mut drives = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(format!("{}/drives", self.base_url))
                .bearer_auth(&self.access_token)
                .query(&[("pageSize", page_size.as_str())]);

            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request.send().await?;
            let status = response.status();

            if !status.is_success() {
                let error_body = response.text().await.unwrap_or_default();
                if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&error_body) {
                    return Err(DriveError::Api {
                        status: api_error.error.code,
                        message: api_error.error.message,
                    });
                }
                return Err(DriveError::Api {
                    status: status.as_u16(),
                    message: error_body,
                });
            }

            let list_response: DriveListResponse = response.json().await?;
            drives.extend(list_response.drives);

            match list_response.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(drives)
    }
}
