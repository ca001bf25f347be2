use availsync_core::{EventTime, MirrorEvent};
use google_calendar::types::EventDateTime;

use super::ToGoogle;

impl ToGoogle<google_calendar::types::Event> for MirrorEvent {
    fn to_google(&self) -> google_calendar::types::Event {
        // id stays empty so Google assigns one
        // (otherwise we'd get "Invalid resource id value")
        google_calendar::types::Event {
            summary: self.summary.clone(),
            start: Some(event_time_to_google(&self.start, &self.time_zone)),
            end: Some(event_time_to_google(&self.end, &self.time_zone)),
            ..Default::default()
        }
    }
}

/// Convert EventTime to Google's EventDateTime, stamped with `time_zone`
fn event_time_to_google(time: &EventTime, time_zone: &str) -> EventDateTime {
    match time {
        EventTime::Date(d) => EventDateTime {
            date: Some(*d),
            date_time: None,
            time_zone: time_zone.to_string(),
        },
        EventTime::DateTime(dt) => EventDateTime {
            date: None,
            date_time: Some(*dt),
            time_zone: time_zone.to_string(),
        },
    }
}
