//! Google Calendar provider for availsync.
//!
//! The provider manages its own credentials and session:
//!   ~/.config/availsync/google/credentials.json
//!   ~/.config/availsync/google/session.toml

pub mod app_config;
pub mod authenticate;
pub mod client;
mod convert;
pub mod session;

pub use authenticate::authenticate;
pub use client::GoogleCalendarClient;
pub use session::Session;
