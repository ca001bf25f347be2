//! `CalendarClient` backed by the Google Calendar v3 API.

use async_trait::async_trait;
use availsync_core::{
    Calendar, CalendarClient, CalendarEvent, MirrorEvent, SyncError, SyncResult, TimeWindow,
};
use google_calendar::Client;
use google_calendar::types::{MinAccessRole, OrderBy, SendUpdates};
use std::path::Path;
use tracing::debug;

use crate::convert::{FromGoogle, ToGoogle};
use crate::session::Session;

pub struct GoogleCalendarClient {
    client: Client,
}

impl GoogleCalendarClient {
    pub fn new(client: Client) -> Self {
        GoogleCalendarClient { client }
    }

    /// Build a client from the stored session, refreshing it if needed.
    ///
    /// Any failure here happens before a calendar is touched.
    pub async fn connect(session_path: &Path) -> SyncResult<Self> {
        let session = Session::load_valid(session_path)
            .await
            .map_err(|e| SyncError::Auth(format!("{:#}", e)))?;

        if let Some(email) = session.account_email() {
            debug!(account = email, "Loaded Google session");
        }

        Ok(GoogleCalendarClient::new(session.client()))
    }
}

#[async_trait]
impl CalendarClient for GoogleCalendarClient {
    async fn list_events(
        &self,
        calendar_id: &str,
        window: &TimeWindow,
    ) -> SyncResult<Vec<CalendarEvent>> {
        // Empty strings leave the bound out of the request
        let time_min = window.start_rfc3339().unwrap_or_default();
        let time_max = window.end_rfc3339().unwrap_or_default();

        let response = self
            .client
            .events()
            .list_all(
                calendar_id,
                "",
                0,
                OrderBy::StartTime,
                &[],
                "", // search query
                &[],
                false,
                false,
                true, // single_events: expand recurring events into instances
                &time_max,
                &time_min,
                "",
                "",
            )
            .await
            .map_err(|e| {
                SyncError::Provider(format!(
                    "Failed to fetch events from {}: {}",
                    calendar_id, e
                ))
            })?;

        Ok(response
            .body
            .into_iter()
            .filter(|e| e.status != "cancelled" && !e.id.is_empty())
            .map(CalendarEvent::from_google)
            .collect())
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> SyncResult<()> {
        let result = self
            .client
            .events()
            .delete(calendar_id, event_id, false, SendUpdates::None)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                // Already gone is as good as deleted
                let error_str = e.to_string();
                if error_str.contains("410") || error_str.contains("Gone") {
                    debug!(event_id, "Event already deleted");
                    Ok(())
                } else {
                    Err(SyncError::Provider(format!(
                        "Failed to delete event {}: {}",
                        event_id, error_str
                    )))
                }
            }
        }
    }

    async fn insert_event(&self, calendar_id: &str, event: &MirrorEvent) -> SyncResult<String> {
        let google_event = event.to_google();

        let response = self
            .client
            .events()
            .insert(
                calendar_id,
                0,
                0,
                false,
                SendUpdates::None,
                false,
                &google_event,
            )
            .await
            .map_err(|e| {
                SyncError::Provider(format!(
                    "Failed to create event {} .. {}: {}",
                    event.start, event.end, e
                ))
            })?;

        Ok(response.body.id)
    }

    async fn list_calendars(&self) -> SyncResult<Vec<Calendar>> {
        let response = self
            .client
            .calendar_list()
            .list_all(MinAccessRole::default(), false, false)
            .await
            .map_err(|e| SyncError::Provider(format!("Failed to fetch calendars: {}", e)))?;

        Ok(response
            .body
            .into_iter()
            .filter(|c| !c.id.is_empty())
            .map(|c| Calendar {
                id: c.id,
                name: if c.summary.is_empty() {
                    "(unnamed)".to_string()
                } else {
                    c.summary
                },
                primary: c.primary,
            })
            .collect())
    }
}
