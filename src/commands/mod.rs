pub mod auth;
pub mod calendars;
pub mod sync;

use anyhow::Result;
use availsync_core::SyncError;
use availsync_provider_google::{GoogleCalendarClient, Session};

use crate::progress::create_spinner;

/// Connect to Google Calendar, running the consent flow first if no session
/// has been saved yet.
pub async fn connect() -> Result<GoogleCalendarClient> {
    let session_path = Session::default_path()?;
    tracing::debug!(path = %session_path.display(), "Using Google session");

    if !session_path.exists() {
        println!("No Google session found, starting authentication...");
        availsync_provider_google::authenticate(&session_path)
            .await
            .map_err(|e| SyncError::Auth(format!("{:#}", e)))?;
    }

    let spinner = create_spinner("Connecting to Google Calendar".to_string());
    let client = GoogleCalendarClient::connect(&session_path).await;
    spinner.finish_and_clear();

    Ok(client?)
}
