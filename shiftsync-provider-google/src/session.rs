//! Creates a valid Google session (access token) that we can use to call the gcal API

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use google_calendar::{AccessToken, Client};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::app_config::{self, base_dir};

const SESSION_DIR: &str = "session";

pub struct Session {
    account: String,
    data: SessionData,
}

#[derive(Serialize, Deserialize, Clone)]
struct SessionData {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl From<&AccessToken> for SessionData {
    fn from(tokens: &AccessToken) -> Self {
        let expires_at = Utc::now() + Duration::seconds(tokens.expires_in);

        SessionData {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            expires_at,
        }
    }
}

impl Session {
    fn dir() -> Result<PathBuf> {
        Ok(base_dir()?.join(SESSION_DIR))
    }

    fn path_for_account(account: &str) -> Result<PathBuf> {
        Ok(Self::dir()?.join(session_file_name(account)))
    }

    fn path(&self) -> Result<PathBuf> {
        Self::path_for_account(&self.account)
    }

    pub fn new(account: &str, tokens: &AccessToken) -> Self {
        Session {
            account: account.to_string(),
            data: tokens.into(),
        }
    }

    pub fn client(&self) -> Result<Client> {
        let creds = app_config::load()?;

        Ok(Client::new(
            creds.client_id,
            creds.client_secret,
            String::new(),
            self.data.access_token.clone(),
            self.data.refresh_token.clone(),
        ))
    }

    /// Load the session for `account` (or the only stored one) and refresh
    /// it if expired.
    pub async fn load_valid(account: Option<&str>) -> Result<Self> {
        let account = match account {
            Some(account) => account.to_string(),
            None => pick_account(Self::stored_accounts()?)?,
        };

        let mut session = Self::load(&account)?;

        if session.is_expired() {
            debug!(account = %account, "Session expired, refreshing");
            if let Err(e) = session.refresh().await {
                warn!(account = %account, error = %e, "Token refresh failed, discarding session");
                let _ = std::fs::remove_file(session.path()?);
                return Err(e.context(format!(
                    "Google session for {account} expired. Run `shiftsync auth` again"
                )));
            }
        }

        Ok(session)
    }

    fn stored_accounts() -> Result<Vec<String>> {
        let Ok(entries) = std::fs::read_dir(Self::dir()?) else {
            return Ok(Vec::new());
        };

        let mut accounts: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
            .collect();
        accounts.sort();

        Ok(accounts)
    }

    fn load(account: &str) -> Result<Self> {
        let path = Self::path_for_account(account)?;

        if !path.exists() {
            anyhow::bail!(
                "Google session for {} not found. Run `shiftsync auth` first",
                account
            );
        }

        let contents = std::fs::read_to_string(&path).with_context(|| {
            format!("Failed to read Google session from {}", path.display())
        })?;

        let data: SessionData = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse Google session from {}", path.display())
        })?;

        Ok(Session {
            account: account.to_string(),
            data,
        })
    }

    pub fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(&self.data).context("Failed to serialize session")?;

        let path = self.path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write session to {}", path.display()))?;

        // Owner-only, the file holds OAuth tokens
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }

        Ok(())
    }

    fn is_expired(&self) -> bool {
        Utc::now() >= self.data.expires_at
    }

    async fn refresh(&mut self) -> Result<()> {
        let client = self.client()?;

        let mut tokens = client
            .refresh_access_token()
            .await
            .context("Failed to refresh token")?;

        // Google typically doesn't return a new refresh_token on refresh
        if tokens.refresh_token.is_empty() {
            tokens.refresh_token = self.data.refresh_token.clone();
        }

        self.data = (&tokens).into();
        self.save()?;

        Ok(())
    }
}

fn session_file_name(account: &str) -> String {
    format!("{}.toml", account.replace(['/', '\\', ':'], "_"))
}

/// Without an explicit account, use the only stored session.
fn pick_account(stored: Vec<String>) -> Result<String> {
    match stored.as_slice() {
        [] => anyhow::bail!("No Google session found. Run `shiftsync auth` first"),
        [only] => Ok(only.clone()),
        many => anyhow::bail!(
            "Several Google sessions found ({}). Set `account` in the [calendar] config section",
            many.join(", ")
        ),
    }
}
