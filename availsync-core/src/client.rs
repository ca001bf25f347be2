//! The seam between the sync routine and a calendar provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SyncResult;
use crate::event::{CalendarEvent, MirrorEvent};
use crate::window::TimeWindow;

/// A calendar from the user's calendar list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    pub id: String,
    pub name: String,
    pub primary: bool,
}

/// Operations the sync routine needs from a calendar provider.
///
/// Implementations hold an authenticated session; every failure is reported
/// as `SyncError::Provider` (or `SyncError::Auth` when the session itself is
/// unusable).
#[async_trait]
pub trait CalendarClient: Send + Sync {
    /// List single event instances overlapping `window`, ordered by start.
    ///
    /// Recurring events are expanded into their instances by the provider.
    async fn list_events(
        &self,
        calendar_id: &str,
        window: &TimeWindow,
    ) -> SyncResult<Vec<CalendarEvent>>;

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> SyncResult<()>;

    /// Insert an event and return the identifier the provider assigned.
    async fn insert_event(&self, calendar_id: &str, event: &MirrorEvent) -> SyncResult<String>;

    async fn list_calendars(&self) -> SyncResult<Vec<Calendar>>;
}
