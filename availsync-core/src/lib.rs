//! Core of availsync.
//!
//! This crate provides the provider-neutral pieces shared by the CLI and the
//! calendar provider:
//! - `event` and `window` types
//! - the `CalendarClient` seam a provider implements
//! - the `sync` routine that clears and re-mirrors the availability calendar

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod sync;
pub mod window;

#[cfg(test)]
mod testing;

pub use client::{Calendar, CalendarClient};
pub use error::{SyncError, SyncResult};
pub use event::{CalendarEvent, EventTime, MirrorEvent, Transparency};
pub use sync::{AvailabilitySyncer, RunSummary, SweepProgress, SweepReport, SyncOptions};
pub use window::TimeWindow;
