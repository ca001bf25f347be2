//! Creates a valid Google session (access token) that we can use to call the gcal API
//!
//! The session is persisted at ~/.config/availsync/google/session.toml.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use google_calendar::{AccessToken, Client};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::app_config::{self, Credentials};

/// Refresh this long before Google considers the token expired
const EXPIRY_MARGIN_SECS: i64 = 60;

pub struct Session {
    path: PathBuf,
    creds: Credentials,
    data: SessionData,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionData {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
    /// Primary calendar id of the authenticated user, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    account_email: Option<String>,
}

impl From<&AccessToken> for SessionData {
    fn from(tokens: &AccessToken) -> Self {
        let expires_at = Utc::now() + Duration::seconds(tokens.expires_in);

        SessionData {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            expires_at,
            account_email: None,
        }
    }
}

impl Session {
    pub fn default_path() -> Result<PathBuf> {
        Ok(app_config::base_dir()?.join("session.toml"))
    }

    pub fn new(path: PathBuf, creds: Credentials, data: SessionData) -> Self {
        Session { path, creds, data }
    }

    pub fn account_email(&self) -> Option<&str> {
        self.data.account_email.as_deref()
    }

    pub fn set_account_email(&mut self, email: impl Into<String>) {
        self.data.account_email = Some(email.into());
    }

    pub fn client(&self) -> Client {
        Client::new(
            self.creds.client_id.clone(),
            self.creds.client_secret.clone(),
            String::new(),
            self.data.access_token.clone(),
            self.data.refresh_token.clone(),
        )
    }

    /// Load the session at `path` and refresh it if expired.
    pub async fn load_valid(path: &Path) -> Result<Self> {
        let mut session = Self::load(path, app_config::load()?)?;

        if session.is_expired() {
            tracing::debug!("Access token expired, refreshing");
            session.refresh().await?;
        }

        Ok(session)
    }

    pub fn load(path: &Path, creds: Credentials) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Google OAuth session not found at {}.\n\
                Run `availsync auth` first.",
                path.display()
            );
        }

        let contents = std::fs::read_to_string(path).with_context(|| {
            format!(
                "Failed to read Google OAuth session from {}",
                path.display()
            )
        })?;

        let data: SessionData = toml::from_str(&contents).with_context(|| {
            format!(
                "Failed to parse Google OAuth session from {}",
                path.display()
            )
        })?;

        Ok(Session {
            path: path.to_path_buf(),
            creds,
            data,
        })
    }

    pub fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(&self.data).context("Failed to serialize session")?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write session to {}", self.path.display()))?;

        // Set to owner-only (0600) since file contains OAuth tokens:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", self.path.display()))?;
        }

        Ok(())
    }

    fn is_expired(&self) -> bool {
        Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) >= self.data.expires_at
    }

    async fn refresh(&mut self) -> Result<()> {
        let mut tokens = self
            .client()
            .refresh_access_token()
            .await
            .context("Failed to refresh token")?;

        // Google typically doesn't return a new refresh_token on refresh
        if tokens.refresh_token.is_empty() {
            tokens.refresh_token = self.data.refresh_token.clone();
        }

        let account_email = self.data.account_email.take();
        self.data = SessionData::from(&tokens);
        self.data.account_email = account_email;
        self.save()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials {
            client_id: "id.apps.googleusercontent.com".to_string(),
            client_secret: "s3cret".to_string(),
        }
    }

    fn data(expires_at: DateTime<Utc>) -> SessionData {
        SessionData {
            access_token: "ya29.token".to_string(),
            refresh_token: "1//refresh".to_string(),
            expires_at,
            account_email: Some("me@example.com".to_string()),
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("google").join("session.toml");
        let expires_at = Utc::now() + Duration::hours(1);

        Session::new(path.clone(), creds(), data(expires_at))
            .save()
            .unwrap();
        let loaded = Session::load(&path, creds()).unwrap();

        assert_eq!(loaded.data, data(expires_at));
        assert_eq!(loaded.account_email(), Some("me@example.com"));
        assert!(!loaded.is_expired());
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        Session::new(path.clone(), creds(), data(Utc::now()))
            .save()
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_expiry_includes_margin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");

        let almost = Session::new(path.clone(), creds(), data(Utc::now() + Duration::seconds(30)));
        assert!(almost.is_expired());

        let fresh = Session::new(path, creds(), data(Utc::now() + Duration::minutes(30)));
        assert!(!fresh.is_expired());
    }

    #[test]
    fn test_missing_session_points_to_auth() {
        let dir = tempfile::tempdir().unwrap();
        let err = match Session::load(&dir.path().join("session.toml"), creds()) {
            Ok(_) => panic!("expected missing session error"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("availsync auth"));
    }
}
