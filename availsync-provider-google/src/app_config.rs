//! OAuth client credentials for the Google provider.
//!
//! User-provided credentials stored at:
//!   ~/.config/availsync/google/credentials.json
//!
//! Both the flat `{"client_id", "client_secret"}` form and the file Google
//! Cloud Console downloads for an installed app (`{"installed": {...}}`) are
//! accepted.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Google OAuth client credentials (user-provided).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CredentialsFile {
    Installed { installed: Credentials },
    Web { web: Credentials },
    Flat(Credentials),
}

pub fn base_dir() -> Result<PathBuf> {
    Ok(availsync_core::config::config_dir()?.join("google"))
}

pub fn load() -> Result<Credentials> {
    load_from(&base_dir()?.join("credentials.json"))
}

pub fn load_from(path: &Path) -> Result<Credentials> {
    if !path.exists() {
        anyhow::bail!(
            "Google credentials not found.\n\n\
            Save the OAuth client file for a desktop app to {}, or create it with:\n\n\
            {{\n  \
              \"client_id\": \"your-client-id.apps.googleusercontent.com\",\n  \
              \"client_secret\": \"your-client-secret\"\n\
            }}\n\n\
            See https://console.cloud.google.com/apis/credentials for setup.",
            path.display()
        );
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read credentials from {}", path.display()))?;

    let file: CredentialsFile = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse credentials from {}", path.display()))?;

    Ok(match file {
        CredentialsFile::Installed { installed } => installed,
        CredentialsFile::Web { web } => web,
        CredentialsFile::Flat(creds) => creds,
    })
}
