use anyhow::Result;
use availsync_core::config::{ConfigOverrides, SyncConfig};
use availsync_core::sync::{RunSummary, SweepReport};
use availsync_core::{AvailabilitySyncer, TimeWindow};
use chrono::Utc;
use owo_colors::OwoColorize;

use crate::progress::SweepBars;

pub async fn run(overrides: ConfigOverrides) -> Result<()> {
    let config = SyncConfig::load(overrides)?;
    let window = TimeWindow::next_days(Utc::now(), config.days);

    let client = super::connect().await?;

    let syncer = AvailabilitySyncer::new(
        &client,
        config.source_calendar_id.as_str(),
        config.mirror_calendar_id.as_str(),
        config.options,
    )?;

    println!(
        "Mirroring {} → {}\n  {}",
        config.source_calendar_id.bold(),
        config.mirror_calendar_id.bold(),
        window.dimmed()
    );

    let summary = syncer.run(&window, &SweepBars::stderr()).await?;

    println!("{}", render_summary(&summary, config.options.dry_run));

    let failures = summary.failure_count();
    if failures > 0 {
        anyhow::bail!(
            "{} event(s) could not be synced; the availability calendar may be incomplete",
            failures
        );
    }

    Ok(())
}

fn render_summary(summary: &RunSummary, dry_run: bool) -> String {
    let mut lines = Vec::new();

    if dry_run {
        lines.push("Dry run, nothing was changed:".to_string());
        for planned in summary
            .cleared
            .planned
            .iter()
            .chain(summary.mirrored.planned.iter())
        {
            lines.push(format!("  {}", planned));
        }
    }

    for failure in failures(&summary.cleared).chain(failures(&summary.mirrored)) {
        lines.push(format!("   {}", failure.red()));
    }

    let (deleted, created) = if dry_run {
        ("would delete", "would create")
    } else {
        ("deleted", "created")
    };
    lines.push(format!(
        "\n{} {}, {} {}",
        deleted, summary.cleared.completed, created, summary.mirrored.completed
    ));

    lines.join("\n")
}

fn failures(report: &SweepReport) -> impl Iterator<Item = String> + '_ {
    report
        .failures
        .iter()
        .map(|f| format!("{}: {}", f.event_id, f.error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use availsync_core::SyncError;
    use availsync_core::sync::SweepFailure;

    fn summary(cleared: SweepReport, mirrored: SweepReport) -> RunSummary {
        RunSummary {
            window: TimeWindow::unbounded(),
            cleared,
            mirrored,
        }
    }

    #[test]
    fn test_render_counts() {
        let rendered = render_summary(
            &summary(
                SweepReport {
                    completed: 1,
                    ..Default::default()
                },
                SweepReport {
                    completed: 4,
                    ..Default::default()
                },
            ),
            false,
        );

        assert!(rendered.ends_with("deleted 1, created 4"));
        assert!(!rendered.contains("Dry run"));
    }

    #[test]
    fn test_render_dry_run_lists_plan() {
        let rendered = render_summary(
            &summary(
                SweepReport {
                    completed: 1,
                    planned: vec!["delete Busy (2024-09-17 .. 2024-09-18)".to_string()],
                    ..Default::default()
                },
                SweepReport::default(),
            ),
            true,
        );

        assert!(rendered.starts_with("Dry run"));
        assert!(rendered.contains("delete Busy (2024-09-17 .. 2024-09-18)"));
        assert!(rendered.ends_with("would delete 1, would create 0"));
    }

    #[test]
    fn test_render_failures() {
        let rendered = render_summary(
            &summary(
                SweepReport {
                    failures: vec![SweepFailure {
                        event_id: "m2".to_string(),
                        error: SyncError::Provider("403 Forbidden".to_string()),
                    }],
                    ..Default::default()
                },
                SweepReport::default(),
            ),
            false,
        );

        assert!(rendered.contains("m2: Provider error: 403 Forbidden"));
    }
}
