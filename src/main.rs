//! drive_roster CLI - dump the shared drives visible to a Google account.

use anyhow::{Context, Result};

use drive_roster::{write_roster, Authenticator, Config, DriveClient, InstalledAppFlow};

#[tokio::main]
async fn main() -> Result<()> {
    println!("Running");

    let config = Config::default();

    let flow = InstalledAppFlow::new(&config.secrets_path, config.scopes.clone());
    let credential = Authenticator::new(&config)
        .obtain_credential(&flow)
        .await
        .context("Failed to obtain a valid credential")?;

    let drives = DriveClient::new(credential.access_token)
        .list_drives(config.page_size)
        .await
        .context("Failed to list shared drives")?;

    write_roster(&drives, &config.output_paths).context("Failed to write output files")?;

    println!("Accounts Found: {}", drives.len());
    Ok(())
}
