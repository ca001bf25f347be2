use availsync_core::{CalendarEvent, EventTime, Transparency};
use google_calendar::types::EventDateTime;

use super::FromGoogle;

impl FromGoogle<google_calendar::types::Event> for CalendarEvent {
    fn from_google(event: google_calendar::types::Event) -> Self {
        // Unrecognized values fall back to "unset", which counts as busy
        let transparency = match event.transparency.as_str() {
            "transparent" => Some(Transparency::Transparent),
            "opaque" => Some(Transparency::Opaque),
            _ => None,
        };

        CalendarEvent {
            start: event_time_from_google(event.start.as_ref()),
            end: event_time_from_google(event.end.as_ref()),
            summary: if event.summary.is_empty() {
                None
            } else {
                Some(event.summary)
            },
            id: event.id,
            transparency,
        }
    }
}

/// Prefer the precise timestamp, fall back to the all-day date.
fn event_time_from_google(time: Option<&EventDateTime>) -> Option<EventTime> {
    let time = time?;
    if let Some(dt) = time.date_time {
        Some(EventTime::DateTime(dt))
    } else {
        time.date.map(EventTime::Date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn google_event(transparency: &str) -> google_calendar::types::Event {
        google_calendar::types::Event {
            id: "abc123".to_string(),
            summary: "Scaling Research Group Meeting".to_string(),
            transparency: transparency.to_string(),
            start: Some(EventDateTime {
                date: None,
                date_time: Some(Utc.with_ymd_and_hms(2024, 9, 17, 23, 0, 0).unwrap()),
                time_zone: "America/Los_Angeles".to_string(),
            }),
            end: Some(EventDateTime {
                date: None,
                date_time: Some(Utc.with_ymd_and_hms(2024, 9, 18, 0, 0, 0).unwrap()),
                time_zone: "America/Los_Angeles".to_string(),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_timed_event() {
        let event = CalendarEvent::from_google(google_event(""));

        assert_eq!(event.id, "abc123");
        assert_eq!(
            event.summary.as_deref(),
            Some("Scaling Research Group Meeting")
        );
        assert_eq!(
            event.start,
            Some(EventTime::DateTime(
                Utc.with_ymd_and_hms(2024, 9, 17, 23, 0, 0).unwrap()
            ))
        );
        assert_eq!(event.transparency, None);
        assert!(event.is_busy());
    }

    #[test]
    fn test_transparency_values() {
        assert_eq!(
            CalendarEvent::from_google(google_event("transparent")).transparency,
            Some(Transparency::Transparent)
        );
        assert_eq!(
            CalendarEvent::from_google(google_event("opaque")).transparency,
            Some(Transparency::Opaque)
        );
    }

    #[test]
    fn test_all_day_event_uses_date() {
        let mut g = google_event("");
        g.start = Some(EventDateTime {
            date: NaiveDate::from_ymd_opt(2024, 9, 17),
            date_time: None,
            time_zone: String::new(),
        });

        let event = CalendarEvent::from_google(g);
        assert_eq!(
            event.start,
            Some(EventTime::Date(NaiveDate::from_ymd_opt(2024, 9, 17).unwrap()))
        );
    }

    #[test]
    fn test_missing_times_are_kept_as_none() {
        let mut g = google_event("");
        g.start = None;
        g.end = Some(EventDateTime {
            date: None,
            date_time: None,
            time_zone: String::new(),
        });

        let event = CalendarEvent::from_google(g);
        assert_eq!(event.start, None);
        assert_eq!(event.end, None);
        assert!(event.interval().is_err());
    }
}
