use anyhow::Result;
use availsync_core::config::{ConfigFile, MIRROR_CALENDAR_ENV};
use availsync_provider_google::Session;

pub async fn run() -> Result<()> {
    println!("Authenticating with Google...");

    let session_path = Session::default_path()?;
    let account = availsync_provider_google::authenticate(&session_path).await?;

    println!("Authenticated as: {}\n", account);
    println!("Session saved to {}", session_path.display());
    println!(
        "\nSet mirror_calendar_id in {} (or {}),",
        ConfigFile::config_path()?.display(),
        MIRROR_CALENDAR_ENV
    );
    println!("then run `availsync` to sync. `availsync calendars` lists calendar ids.");

    Ok(())
}
