//! Sync configuration.
//!
//! Read from ~/.config/availsync/config.toml, then overridden by the
//! `AVAILSYNC_MIRROR_CALENDAR_ID` environment variable and command-line flags.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{SyncError, SyncResult};
use crate::sync::SyncOptions;
use crate::window::DEFAULT_SYNC_DAYS;

/// Google's alias for the user's main calendar
pub const DEFAULT_SOURCE_CALENDAR_ID: &str = "primary";

pub const MIRROR_CALENDAR_ENV: &str = "AVAILSYNC_MIRROR_CALENDAR_ID";

/// Upper bound for `days`, about ten years
pub const MAX_SYNC_DAYS: i64 = 3650;

/// Base directory for all availsync configuration and session files.
pub fn config_dir() -> SyncResult<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| SyncError::Config("Could not determine config directory".into()))?
        .join("availsync"))
}

/// Contents of config.toml. Every key is optional.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub mirror_calendar_id: Option<String>,
    pub source_calendar_id: Option<String>,
    pub days: Option<i64>,
    pub fail_fast: Option<bool>,
}

impl ConfigFile {
    pub fn config_path() -> SyncResult<PathBuf> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load ~/.config/availsync/config.toml, or defaults if it doesn't exist.
    pub fn load() -> SyncResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> SyncResult<Self> {
        if !path.exists() {
            return Ok(ConfigFile::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            SyncError::Config(format!("Could not read {}: {}", path.display(), e))
        })?;

        toml::from_str(&contents)
            .map_err(|e| SyncError::Config(format!("Could not parse {}: {}", path.display(), e)))
    }
}

/// Values supplied on the command line; they win over everything else.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub mirror_calendar_id: Option<String>,
    pub source_calendar_id: Option<String>,
    pub days: Option<i64>,
    pub fail_fast: bool,
    pub dry_run: bool,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub source_calendar_id: String,
    pub mirror_calendar_id: String,
    pub days: i64,
    pub options: SyncOptions,
}

impl SyncConfig {
    /// Merge file, environment and flags (in increasing priority).
    pub fn resolve(
        file: ConfigFile,
        env_mirror_calendar_id: Option<String>,
        overrides: ConfigOverrides,
    ) -> SyncResult<Self> {
        let mirror_calendar_id = non_empty(overrides.mirror_calendar_id)
            .or(non_empty(env_mirror_calendar_id))
            .or(non_empty(file.mirror_calendar_id))
            .ok_or_else(missing_mirror_calendar)?;

        let source_calendar_id = overrides
            .source_calendar_id
            .or(file.source_calendar_id)
            .unwrap_or_else(|| DEFAULT_SOURCE_CALENDAR_ID.to_string());

        let days = overrides.days.or(file.days).unwrap_or(DEFAULT_SYNC_DAYS);
        if days <= 0 {
            return Err(SyncError::Config(format!(
                "days must be positive, got {}",
                days
            )));
        }
        if days > MAX_SYNC_DAYS {
            return Err(SyncError::Config(format!(
                "days must be at most {}, got {}",
                MAX_SYNC_DAYS, days
            )));
        }

        Ok(SyncConfig {
            source_calendar_id,
            mirror_calendar_id,
            days,
            options: SyncOptions {
                fail_fast: overrides.fail_fast || file.fail_fast.unwrap_or(false),
                dry_run: overrides.dry_run,
            },
        })
    }

    /// Resolve against the real config file and process environment.
    pub fn load(overrides: ConfigOverrides) -> SyncResult<Self> {
        let env = std::env::var(MIRROR_CALENDAR_ENV).ok();
        Self::resolve(ConfigFile::load()?, env, overrides)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn missing_mirror_calendar() -> SyncError {
    let path = ConfigFile::config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "config.toml".to_string());

    SyncError::Config(format!(
        "No mirror calendar configured.\n\n\
        Add it to {}:\n\n\
        mirror_calendar_id = \"your-calendar-id@group.calendar.google.com\"\n\n\
        or set {}. Run `availsync calendars` to find the id.",
        path, MIRROR_CALENDAR_ENV
    ))
}
