//! Time window a sync run operates on.

use chrono::{DateTime, Duration, Utc};

use crate::event::{CalendarEvent, EventTime};

/// Number of days ahead to mirror when nothing else is configured
pub const DEFAULT_SYNC_DAYS: i64 = 7;

/// Half-open window `[start, end)`.
/// None values mean unbounded in that direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        TimeWindow {
            start: Some(start),
            end: Some(end),
        }
    }

    /// `now` through `now + days`.
    ///
    /// `days` must be within [`crate::config::MAX_SYNC_DAYS`].
    pub fn next_days(now: DateTime<Utc>, days: i64) -> Self {
        TimeWindow::new(now, now + Duration::days(days))
    }

    pub fn unbounded() -> Self {
        TimeWindow {
            start: None,
            end: None,
        }
    }

    /// `start` as RFC3339, or `None` when unbounded.
    pub fn start_rfc3339(&self) -> Option<String> {
        self.start.map(|dt| dt.to_rfc3339())
    }

    /// `end` as RFC3339, or `None` when unbounded.
    pub fn end_rfc3339(&self) -> Option<String> {
        self.end.map(|dt| dt.to_rfc3339())
    }

    /// Closed-interval overlap: `event.start <= end && event.end >= start`.
    ///
    /// Instants are compared after parsing, so timestamps with different
    /// offsets order correctly. Events without a start or end never overlap.
    ///
    /// All-day bounds are compared by calendar date. Google places them in
    /// the calendar's own time zone, which may be up to a day ahead of UTC,
    /// so a date-only start may fall on the day after the window's UTC end.
    pub fn overlaps(&self, event: &CalendarEvent) -> bool {
        let (Some(event_start), Some(event_end)) = (event.start, event.end) else {
            return false;
        };

        let starts_before_end = self.end.is_none_or(|end| match event_start {
            EventTime::DateTime(dt) => dt <= end,
            EventTime::Date(date) => date.pred_opt().is_none_or(|prev| prev <= end.date_naive()),
        });
        let ends_after_start = self.start.is_none_or(|start| match event_end {
            EventTime::DateTime(dt) => dt >= start,
            EventTime::Date(date) => date >= start.date_naive(),
        });

        starts_before_end && ends_after_start
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fmt_bound = |b: Option<DateTime<Utc>>| {
            b.map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| "(unbounded)".to_string())
        };
        write!(f, "{} .. {}", fmt_bound(self.start), fmt_bound(self.end))
    }
}
