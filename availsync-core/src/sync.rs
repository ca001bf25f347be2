//! Clear-then-mirror sync of busy time into the availability calendar.
//!
//! A run has two sequential phases over the same window:
//! 1. `clear_window` deletes every event in the mirror calendar that
//!    overlaps the window.
//! 2. `sync_window` creates one anonymous "Busy" event in the mirror
//!    calendar for each busy event in the source calendar.
//!
//! Nothing is diffed: the mirror is rebuilt from scratch each run, so it
//! must not hold events anyone else cares about.

use tracing::{debug, info, warn};

use crate::client::CalendarClient;
use crate::error::{SyncError, SyncResult};
use crate::event::{CalendarEvent, MirrorEvent};
use crate::window::TimeWindow;

/// How a sweep reacts to individual failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Abort on the first failed delete or insert instead of collecting it
    pub fail_fast: bool,
    /// Plan the sweeps without mutating the mirror calendar
    pub dry_run: bool,
}

/// The two sweeps of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweep {
    Clear,
    Mirror,
}

impl std::fmt::Display for Sweep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sweep::Clear => write!(f, "Deleting availability events"),
            Sweep::Mirror => write!(f, "Creating availability events"),
        }
    }
}

/// Receives progress while a sweep works through its events.
pub trait SweepProgress: Sync {
    fn begin(&self, sweep: Sweep, total: usize);
    fn advance(&self, label: &str);
    fn finish(&self);
}

/// Progress sink that discards everything.
pub struct NoProgress;

impl SweepProgress for NoProgress {
    fn begin(&self, _sweep: Sweep, _total: usize) {}
    fn advance(&self, _label: &str) {}
    fn finish(&self) {}
}

/// An event a sweep could not process.
#[derive(Debug)]
pub struct SweepFailure {
    pub event_id: String,
    pub error: SyncError,
}

/// Outcome of one sweep.
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Events deleted (clear) or created (mirror); planned ones in a dry run
    pub completed: usize,
    /// Human-readable description of each planned change, dry runs only
    pub planned: Vec<String>,
    pub failures: Vec<SweepFailure>,
}

impl SweepReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record_failure(&mut self, event: &CalendarEvent, error: SyncError) {
        warn!(event_id = %event.id, "{}", error);
        self.failures.push(SweepFailure {
            event_id: event.id.clone(),
            error,
        });
    }
}

/// Outcome of a full clear + mirror run.
#[derive(Debug)]
pub struct RunSummary {
    pub window: TimeWindow,
    pub cleared: SweepReport,
    pub mirrored: SweepReport,
}

impl RunSummary {
    pub fn failure_count(&self) -> usize {
        self.cleared.failures.len() + self.mirrored.failures.len()
    }
}

/// List event instances of `calendar_id` within `window`, ordered by start.
pub async fn list_events<C: CalendarClient + ?Sized>(
    client: &C,
    calendar_id: &str,
    window: &TimeWindow,
) -> SyncResult<Vec<CalendarEvent>> {
    debug!(calendar_id, %window, "Listing events");
    let events = client.list_events(calendar_id, window).await?;
    debug!(calendar_id, count = events.len(), "Listed events");
    Ok(events)
}

/// Delete every event in `calendar_id` that overlaps `window`.
///
/// Deletion is blind: events are not checked for having been created by a
/// previous run.
pub async fn clear_window<C: CalendarClient + ?Sized>(
    client: &C,
    calendar_id: &str,
    window: &TimeWindow,
    options: SyncOptions,
    progress: &dyn SweepProgress,
) -> SyncResult<SweepReport> {
    let candidates = list_events(client, calendar_id, window).await?;
    let mut report = SweepReport::default();

    let mut overlapping = Vec::new();
    for event in candidates {
        if let Err(e) = event.interval() {
            report.record_failure(&event, e);
        } else if window.overlaps(&event) {
            overlapping.push(event);
        }
    }

    progress.begin(Sweep::Clear, overlapping.len());

    for event in &overlapping {
        progress.advance(event.label());

        if options.dry_run {
            report.planned.push(format!(
                "delete {} ({})",
                event.label(),
                describe_interval(event)
            ));
            report.completed += 1;
            continue;
        }

        match client.delete_event(calendar_id, &event.id).await {
            Ok(()) => {
                debug!(event_id = %event.id, "Deleted mirror event");
                report.completed += 1;
            }
            Err(e) if options.fail_fast => {
                progress.finish();
                return Err(e);
            }
            Err(e) => report.record_failure(event, e),
        }
    }

    progress.finish();
    Ok(report)
}

/// Create one busy block in `mirror_calendar_id` per busy event of
/// `source_calendar_id` within `window`.
pub async fn sync_window<C: CalendarClient + ?Sized>(
    client: &C,
    source_calendar_id: &str,
    mirror_calendar_id: &str,
    window: &TimeWindow,
    options: SyncOptions,
    progress: &dyn SweepProgress,
) -> SyncResult<SweepReport> {
    let source_events = list_events(client, source_calendar_id, window).await?;
    let mut report = SweepReport::default();

    let busy: Vec<&CalendarEvent> = source_events.iter().filter(|e| e.is_busy()).collect();
    debug!(
        total = source_events.len(),
        busy = busy.len(),
        "Filtered source events"
    );

    progress.begin(Sweep::Mirror, busy.len());

    for event in busy {
        progress.advance(event.label());

        let mirror = match MirrorEvent::from_source(event) {
            Ok(m) => m,
            Err(e) => {
                report.record_failure(event, e);
                continue;
            }
        };

        if options.dry_run {
            report.planned.push(format!(
                "create {} ({} .. {})",
                mirror.summary, mirror.start, mirror.end
            ));
            report.completed += 1;
            continue;
        }

        match client.insert_event(mirror_calendar_id, &mirror).await {
            Ok(id) => {
                debug!(source_id = %event.id, mirror_id = %id, "Created mirror event");
                report.completed += 1;
            }
            Err(e) if options.fail_fast => {
                progress.finish();
                return Err(e);
            }
            Err(e) => report.record_failure(event, e),
        }
    }

    progress.finish();
    Ok(report)
}

fn describe_interval(event: &CalendarEvent) -> String {
    match (event.start, event.end) {
        (Some(start), Some(end)) => format!("{} .. {}", start, end),
        _ => "no time".to_string(),
    }
}

/// Mirrors busy time from one calendar into another.
pub struct AvailabilitySyncer<'a, C: ?Sized> {
    client: &'a C,
    source_calendar_id: String,
    mirror_calendar_id: String,
    options: SyncOptions,
}

impl<'a, C: CalendarClient + ?Sized> AvailabilitySyncer<'a, C> {
    pub fn new(
        client: &'a C,
        source_calendar_id: impl Into<String>,
        mirror_calendar_id: impl Into<String>,
        options: SyncOptions,
    ) -> SyncResult<Self> {
        let source_calendar_id = source_calendar_id.into();
        let mirror_calendar_id = mirror_calendar_id.into();

        if mirror_calendar_id.trim().is_empty() {
            return Err(SyncError::Config(
                "Mirror calendar id is empty".to_string(),
            ));
        }

        // Clearing the source would wipe the user's real events
        if mirror_calendar_id == source_calendar_id {
            return Err(SyncError::Config(format!(
                "Mirror calendar must differ from source calendar ({})",
                source_calendar_id
            )));
        }

        Ok(AvailabilitySyncer {
            client,
            source_calendar_id,
            mirror_calendar_id,
            options,
        })
    }

    /// Clear the mirror calendar over `window`, then mirror the source into it.
    ///
    /// Mutations already committed stay in place if a phase fails.
    pub async fn run(
        &self,
        window: &TimeWindow,
        progress: &dyn SweepProgress,
    ) -> SyncResult<RunSummary> {
        info!(
            source = %self.source_calendar_id,
            mirror = %self.mirror_calendar_id,
            %window,
            dry_run = self.options.dry_run,
            "Starting availability sync"
        );

        let cleared = clear_window(
            self.client,
            &self.mirror_calendar_id,
            window,
            self.options,
            progress,
        )
        .await?;

        let mirrored = sync_window(
            self.client,
            &self.source_calendar_id,
            &self.mirror_calendar_id,
            window,
            self.options,
            progress,
        )
        .await?;

        info!(
            deleted = cleared.completed,
            created = mirrored.completed,
            failures = cleared.failures.len() + mirrored.failures.len(),
            "Finished availability sync"
        );

        Ok(RunSummary {
            window: *window,
            cleared,
            mirrored,
        })
    }
}
