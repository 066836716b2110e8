//! OAuth2 credential acquisition for the Drive API.
//!
//! A credential is loaded from the token file when one is present and still
//! parseable, refreshed in place when it has expired but carries a refresh
//! token, and otherwise obtained through the interactive installed-app flow.
//! Any newly issued or refreshed credential is written back to the token file.

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::Client;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::config::Config;
use crate::error::{DriveError, Result};
use crate::models::{ClientSecrets, ClientSecretsFile, StoredCredential, TokenResponse};

/// Google OAuth2 token endpoint.
const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// A blocking source of brand-new credentials.
///
/// The production implementation is [`InstalledAppFlow`]; tests substitute a
/// canned double so no browser interaction is needed.
#[async_trait]
pub trait AuthorizationFlow {
    async fn obtain(&self) -> Result<StoredCredential>;
}

/// Manages the persisted credential file and the refresh exchange.
pub struct Authenticator {
    token_path: PathBuf,
    token_uri: String,
    http: Client,
}

impl Authenticator {
    pub fn new(config: &Config) -> Self {
        Self {
            token_path: config.token_path.clone(),
            token_uri: TOKEN_URI.to_string(),
            http: Client::new(),
        }
    }

    /// Override the token endpoint, for tests against a mock server.
    pub fn with_token_uri(mut self, token_uri: impl Into<String>) -> Self {
        self.token_uri = token_uri.into();
        self
    }

    /// Produce a valid credential, consulting the cache first.
    ///
    /// The interactive `flow` runs only when there is no cached credential and
    /// no usable refresh token. Refreshed or freshly issued credentials are
    /// persisted before this returns.
    pub async fn obtain_credential(
        &self,
        flow: &dyn AuthorizationFlow,
    ) -> Result<StoredCredential> {
        let credential = match self.load_cached() {
            Some(cached) if !cached.is_expired() => return Ok(cached),
            Some(cached) if cached.refresh_token.is_some() => self.refresh(cached).await?,
            _ => flow.obtain().await?,
        };

        self.persist(&credential)?;
        Ok(credential)
    }

    /// A missing or corrupt token file counts as no credential.
    fn load_cached(&self) -> Option<StoredCredential> {
        let content = fs::read_to_string(&self.token_path).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn persist(&self, credential: &StoredCredential) -> Result<()> {
        let json = serde_json::to_string_pretty(credential)?;
        fs::write(&self.token_path, json)?;
        Ok(())
    }

    /// Exchange the refresh token for a new access token.
    async fn refresh(&self, mut credential: StoredCredential) -> Result<StoredCredential> {
        let refresh_token = credential
            .refresh_token
            .clone()
            .ok_or_else(|| DriveError::Authentication("no refresh token".to_string()))?;

        let params = [
            ("client_id", credential.client_id.as_str()),
            ("client_secret", credential.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
        ];

        // Network failures here count as authentication failures.
        let response = self
            .http
            .post(&self.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| DriveError::Authentication(format!("refresh request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::Authentication(format!(
                "refresh failed with status {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| DriveError::Authentication(format!("malformed refresh response: {}", e)))?;

        credential.access_token = token.access_token;
        credential.expires_at = expiry_from_now(token.expires_in);
        // The refresh grant usually omits the refresh token; keep the old one.
        if token.refresh_token.is_some() {
            credential.refresh_token = token.refresh_token;
        }

        Ok(credential)
    }
}

/// Interactive installed-app authorization flow.
///
/// Binds a localhost listener on an ephemeral port, prints the authorization
/// URL for the operator to open in a browser, waits for the provider to
/// redirect back with an authorization code, and exchanges the code for
/// tokens. The client-secrets file is read lazily so a run that never needs
/// the flow never touches it.
pub struct InstalledAppFlow {
    secrets_path: PathBuf,
    scopes: Vec<String>,
    http: Client,
}

impl InstalledAppFlow {
    pub fn new(secrets_path: impl Into<PathBuf>, scopes: Vec<String>) -> Self {
        Self {
            secrets_path: secrets_path.into(),
            scopes,
            http: Client::new(),
        }
    }

    fn load_secrets(&self) -> Result<ClientSecrets> {
        let content = fs::read_to_string(&self.secrets_path)?;
        let file: ClientSecretsFile = serde_json::from_str(&content)?;
        Ok(file.installed)
    }

    /// Accept exactly one callback connection and pull the `code` parameter
    /// out of the request line.
    async fn wait_for_code(listener: TcpListener) -> Result<String> {
        let (mut stream, _) = listener.accept().await?;

        // The request line may arrive split across segments; keep reading
        // until the header terminator or until the peer stops sending.
        let mut raw = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = stream.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            if raw.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        let request = String::from_utf8_lossy(&raw).to_string();

        let code = parse_code(&request).ok_or_else(|| {
            DriveError::Authentication("no authorization code in callback request".to_string())
        })?;

        let body = "<html><body>Authorization complete. You can close this tab.</body></html>";
        let reply = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        stream.write_all(reply.as_bytes()).await?;

        Ok(code)
    }

    async fn exchange_code(
        &self,
        secrets: &ClientSecrets,
        code: &str,
        redirect_uri: &str,
    ) -> Result<StoredCredential> {
        let params = [
            ("client_id", secrets.client_id.as_str()),
            ("client_secret", secrets.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];

        let response = self
            .http
            .post(&secrets.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| DriveError::TokenExchange(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::TokenExchange(format!(
                "status {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| DriveError::TokenExchange(format!("malformed token response: {}", e)))?;

        Ok(StoredCredential {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: expiry_from_now(token.expires_in),
            client_id: secrets.client_id.clone(),
            client_secret: secrets.client_secret.clone(),
        })
    }
}

#[async_trait]
impl AuthorizationFlow for InstalledAppFlow {
    async fn obtain(&self) -> Result<StoredCredential> {
        let secrets = self.load_secrets()?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let redirect_uri = format!("http://127.0.0.1:{}", listener.local_addr()?.port());

        println!("Open this URL in your browser to authorize access:");
        println!("{}", authorize_url(&secrets, &self.scopes, &redirect_uri)?);

        let code = Self::wait_for_code(listener).await?;
        self.exchange_code(&secrets, &code, &redirect_uri).await
    }
}

fn authorize_url(secrets: &ClientSecrets, scopes: &[String], redirect_uri: &str) -> Result<String> {
    let url = reqwest::Url::parse_with_params(
        &secrets.auth_uri,
        &[
            ("response_type", "code"),
            ("access_type", "offline"),
            ("client_id", &secrets.client_id),
            ("redirect_uri", redirect_uri),
            ("scope", &scopes.join(" ")),
        ],
    )
    .map_err(|e| DriveError::Authentication(format!("invalid auth_uri: {}", e)))?;

    Ok(url.to_string())
}

fn expiry_from_now(expires_in: u64) -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs();
    now + expires_in
}

/// Extract the percent-decoded `code` query parameter from the request line.
///
/// Google issues codes containing `/`, which arrive encoded as `%2F`; they
/// must be decoded here because the token exchange form-encodes them again.
fn parse_code(request: &str) -> Option<String> {
    let line = request.lines().next()?;
    let target = line.split_whitespace().nth(1)?;
    let url = reqwest::Url::parse(&format!("http://localhost{}", target)).ok()?;
    url.query_pairs()
        .find(|(key, value)| key == "code" && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}
