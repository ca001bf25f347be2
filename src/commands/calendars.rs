use anyhow::Result;
use availsync_core::{Calendar, CalendarClient};
use owo_colors::OwoColorize;

pub async fn run() -> Result<()> {
    let client = super::connect().await?;
    let calendars = client.list_calendars().await?;

    if calendars.is_empty() {
        println!("No calendars found.");
        return Ok(());
    }

    println!("Found {} calendar(s):\n", calendars.len());
    for calendar in &calendars {
        println!("{}", render_calendar(calendar));
    }

    Ok(())
}

fn render_calendar(calendar: &Calendar) -> String {
    let marker = if calendar.primary { " (primary)" } else { "" };
    format!(
        "  {}{}\n    {}",
        calendar.name.bold(),
        marker,
        calendar.id.dimmed()
    )
}
