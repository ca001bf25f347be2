//! In-memory calendar provider for exercising the sync routine.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::client::{Calendar, CalendarClient};
use crate::error::{SyncError, SyncResult};
use crate::event::{CalendarEvent, EventTime, MirrorEvent, Transparency};
use crate::window::TimeWindow;

#[derive(Default)]
pub struct InMemoryCalendars {
    calendars: Mutex<HashMap<String, Vec<CalendarEvent>>>,
    next_id: Mutex<usize>,
    /// Event ids whose delete call fails
    failing_deletes: Mutex<HashSet<String>>,
    failing_inserts: Mutex<bool>,
    failing_lists: Mutex<bool>,
    /// Every body passed to `insert_event`, in call order
    pub inserted: Mutex<Vec<(String, MirrorEvent)>>,
    pub deleted: Mutex<Vec<(String, String)>>,
    /// Offset of the calendars' own time zone, used to place all-day events
    utc_offset_secs: i32,
}

impl InMemoryCalendars {
    pub fn with_events(calendar_id: &str, events: Vec<CalendarEvent>) -> Self {
        let fake = InMemoryCalendars::default();
        fake.put(calendar_id, events);
        fake
    }

    /// Place all-day events in a calendar time zone `hours` east of UTC,
    /// the way Google does when matching them against a window.
    pub fn in_time_zone(mut self, hours: i32) -> Self {
        self.utc_offset_secs = hours * 3600;
        self
    }

    pub fn put(&self, calendar_id: &str, events: Vec<CalendarEvent>) {
        self.calendars
            .lock()
            .unwrap()
            .entry(calendar_id.to_string())
            .or_default()
            .extend(events);
    }

    pub fn events(&self, calendar_id: &str) -> Vec<CalendarEvent> {
        self.calendars
            .lock()
            .unwrap()
            .get(calendar_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn fail_delete_of(&self, event_id: &str) {
        self.failing_deletes
            .lock()
            .unwrap()
            .insert(event_id.to_string());
    }

    pub fn fail_inserts(&self) {
        *self.failing_inserts.lock().unwrap() = true;
    }

    pub fn fail_lists(&self) {
        *self.failing_lists.lock().unwrap() = true;
    }
}

impl InMemoryCalendars {
    /// Instant a bound falls on in the calendar's time zone.
    fn placed(&self, time: EventTime) -> DateTime<Utc> {
        match time {
            EventTime::DateTime(dt) => dt,
            EventTime::Date(date) => FixedOffset::east_opt(self.utc_offset_secs)
                .unwrap()
                .from_local_datetime(&date.and_time(NaiveTime::MIN))
                .unwrap()
                .with_timezone(&Utc),
        }
    }
}

#[async_trait]
impl CalendarClient for InMemoryCalendars {
    async fn list_events(
        &self,
        calendar_id: &str,
        window: &TimeWindow,
    ) -> SyncResult<Vec<CalendarEvent>> {
        if *self.failing_lists.lock().unwrap() {
            return Err(SyncError::Provider("429 Rate Limit Exceeded".to_string()));
        }

        // Malformed events come back regardless of window, like a provider
        // that can't place them would.
        let mut events: Vec<CalendarEvent> = self
            .events(calendar_id)
            .into_iter()
            .filter(|e| match (e.start, e.end) {
                (Some(start), Some(end)) => {
                    window.end.is_none_or(|w| self.placed(start) <= w)
                        && window.start.is_none_or(|w| self.placed(end) >= w)
                }
                _ => true,
            })
            .collect();
        events.sort_by_key(|e| e.start.map(|t| self.placed(t)));
        Ok(events)
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> SyncResult<()> {
        if self.failing_deletes.lock().unwrap().contains(event_id) {
            return Err(SyncError::Provider(format!(
                "Failed to delete event: {}",
                event_id
            )));
        }

        let mut calendars = self.calendars.lock().unwrap();
        let events = calendars.entry(calendar_id.to_string()).or_default();
        let before = events.len();
        events.retain(|e| e.id != event_id);
        if events.len() == before {
            return Err(SyncError::Provider(format!("404 Not Found: {}", event_id)));
        }

        self.deleted
            .lock()
            .unwrap()
            .push((calendar_id.to_string(), event_id.to_string()));
        Ok(())
    }

    async fn insert_event(&self, calendar_id: &str, event: &MirrorEvent) -> SyncResult<String> {
        if *self.failing_inserts.lock().unwrap() {
            return Err(SyncError::Provider("403 Forbidden".to_string()));
        }

        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            format!("mirror-{}", next)
        };

        self.put(
            calendar_id,
            vec![CalendarEvent {
                id: id.clone(),
                summary: Some(event.summary.clone()),
                start: Some(event.start),
                end: Some(event.end),
                transparency: Some(Transparency::Opaque),
            }],
        );
        self.inserted
            .lock()
            .unwrap()
            .push((calendar_id.to_string(), event.clone()));

        Ok(id)
    }

    async fn list_calendars(&self) -> SyncResult<Vec<Calendar>> {
        let mut calendars: Vec<Calendar> = self
            .calendars
            .lock()
            .unwrap()
            .keys()
            .map(|id| Calendar {
                id: id.clone(),
                name: id.clone(),
                primary: id == "primary",
            })
            .collect();
        calendars.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(calendars)
    }
}

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

pub fn all_day_event(id: &str, start: NaiveDate, end: NaiveDate) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        summary: Some(format!("Event {}", id)),
        start: Some(EventTime::Date(start)),
        end: Some(EventTime::Date(end)),
        transparency: None,
    }
}

pub fn timed_event(
    id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    transparency: Option<Transparency>,
) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        summary: Some(format!("Event {}", id)),
        start: Some(EventTime::DateTime(start)),
        end: Some(EventTime::DateTime(end)),
        transparency,
    }
}
