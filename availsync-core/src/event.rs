//! Provider-neutral event types.
//!
//! Providers convert their API responses into these types, and the sync
//! routine works exclusively with them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// Title given to every event created in the mirror calendar.
pub const MIRROR_EVENT_TITLE: &str = "Busy";

/// Time zone label stamped on every mirror event.
pub const MIRROR_TIME_ZONE: &str = "UTC";

/// A calendar event as returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    /// Only used for log messages, never copied to the mirror
    pub summary: Option<String>,
    /// `None` when the provider sent neither a timestamp nor a date
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    /// Absent means busy
    pub transparency: Option<Transparency>,
}

/// Event transparency (busy/free status)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transparency {
    /// Event blocks time on calendar (default)
    Opaque,
    /// Event does not block time (shows as free)
    Transparent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTime {
    DateTime(DateTime<Utc>),
    /// All-day event date
    Date(NaiveDate),
}

impl EventTime {
    /// The instant this time refers to. All-day dates start at midnight UTC.
    pub fn instant(&self) -> DateTime<Utc> {
        match self {
            EventTime::DateTime(dt) => *dt,
            EventTime::Date(d) => d.and_time(chrono::NaiveTime::MIN).and_utc(),
        }
    }
}

impl std::fmt::Display for EventTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventTime::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl CalendarEvent {
    /// Whether the event occupies the owner's time.
    pub fn is_busy(&self) -> bool {
        self.transparency != Some(Transparency::Transparent)
    }

    /// Start and end of the event, or a data shape error naming what is missing.
    pub fn interval(&self) -> Result<(EventTime, EventTime), SyncError> {
        let start = self.start.ok_or_else(|| SyncError::DataShape {
            event_id: self.id.clone(),
            reason: "event has no start time or date".to_string(),
        })?;
        let end = self.end.ok_or_else(|| SyncError::DataShape {
            event_id: self.id.clone(),
            reason: "event has no end time or date".to_string(),
        })?;
        Ok((start, end))
    }

    /// Label for progress and log output.
    pub fn label(&self) -> &str {
        self.summary.as_deref().unwrap_or(&self.id)
    }
}

/// Body of an event created in the mirror calendar.
///
/// Carries no reference to the source event: the mirror calendar is rebuilt
/// from scratch on every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorEvent {
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
    pub time_zone: String,
}

impl MirrorEvent {
    pub fn busy(start: EventTime, end: EventTime) -> Self {
        MirrorEvent {
            summary: MIRROR_EVENT_TITLE.to_string(),
            start,
            end,
            time_zone: MIRROR_TIME_ZONE.to_string(),
        }
    }

    /// Mirror a source event, or explain why its shape can't be mirrored.
    pub fn from_source(event: &CalendarEvent) -> Result<Self, SyncError> {
        let (start, end) = event.interval()?;
        Ok(MirrorEvent::busy(start, end))
    }
}
