//! drive_roster - dump the shared drives visible to a Google account.
//!
//! The tool signs in with an installed-app OAuth flow (caching the credential
//! on disk between runs), pages through the Drive API's `drives.list`
//! endpoint, and writes each drive as a name/id line pair to the configured
//! output files.
//!
//! # Example
//!
//! ```no_run
//! use drive_roster::{write_roster, Authenticator, Config, DriveClient, InstalledAppFlow};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!
//!     let flow = InstalledAppFlow::new(&config.secrets_path, config.scopes.clone());
//!     let credential = Authenticator::new(&config).obtain_credential(&flow).await?;
//!
//!     let drives = DriveClient::new(credential.access_token)
//!         .list_drives(config.page_size)
//!         .await?;
//!     write_roster(&drives, &config.output_paths)?;
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod output;

// Re-exports for convenience
pub use auth::{Authenticator, AuthorizationFlow, InstalledAppFlow};
pub use client::DriveClient;
pub use config::Config;
pub use error::{DriveError, Result};
pub use models::{DriveRecord, StoredCredential};
pub use output::write_roster;
