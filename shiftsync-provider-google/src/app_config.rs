//! App-level configuration for the Google provider.
//!
//! User-provided OAuth client credentials stored at:
//!   ~/.config/shiftsync/providers/google/credentials.json

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

const CREDENTIALS_FILE: &str = "credentials.json";

/// Google OAuth client credentials (user-provided).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// The file downloaded from the Google Cloud console wraps the credentials
/// in an `installed` or `web` object; a hand-written one may not.
#[derive(Deserialize)]
#[serde(untagged)]
enum CredentialsFile {
    Installed { installed: Credentials },
    Web { web: Credentials },
    Flat(Credentials),
}

impl From<CredentialsFile> for Credentials {
    fn from(file: CredentialsFile) -> Self {
        match file {
            CredentialsFile::Installed { installed } => installed,
            CredentialsFile::Web { web } => web,
            CredentialsFile::Flat(creds) => creds,
        }
    }
}

pub fn base_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Could not determine config directory")?
        .join("shiftsync")
        .join("providers")
        .join("google"))
}

pub fn load() -> Result<Credentials> {
    let path = base_dir()?.join(CREDENTIALS_FILE);

    if !path.exists() {
        anyhow::bail!(
            "Google credentials not found.\n\n\
            Download an OAuth client (type \"Desktop app\") from\n\
            https://console.cloud.google.com/apis/credentials\n\
            and save it as {}",
            path.display()
        );
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read credentials from {}", path.display()))?;

    parse(&contents).with_context(|| format!("Failed to parse credentials from {}", path.display()))
}

fn parse(contents: &str) -> Result<Credentials> {
    let file: CredentialsFile = serde_json::from_str(contents)?;
    Ok(file.into())
}
