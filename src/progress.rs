//! Terminal progress output for the two sweeps.
//!
//! Every bar is drawn through one shared `MultiProgress` on stderr, so other
//! stderr output can be written with the bars cleared first.

use std::sync::{LazyLock, Mutex};

use availsync_core::sync::{Sweep, SweepProgress};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

static TERMINAL: LazyLock<MultiProgress> = LazyLock::new(MultiProgress::new);

/// Run `f` with all visible bars hidden, redrawing them afterwards.
pub fn suspend<R>(f: impl FnOnce() -> R) -> R {
    TERMINAL.suspend(f)
}

pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = TERMINAL.add(ProgressBar::new_spinner());
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["-", "\\", "|", "/"])
            .template("{msg} {spinner}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// One progress bar per sweep, drawn to stderr.
pub struct SweepBars {
    attach: fn(ProgressBar) -> ProgressBar,
    current: Mutex<Option<ProgressBar>>,
}

impl SweepBars {
    pub fn stderr() -> Self {
        SweepBars {
            attach: |bar| TERMINAL.add(bar),
            current: Mutex::new(None),
        }
    }

    #[cfg(test)]
    fn hidden() -> Self {
        SweepBars {
            attach: |bar| {
                bar.set_draw_target(indicatif::ProgressDrawTarget::hidden());
                bar
            },
            current: Mutex::new(None),
        }
    }

    fn with_current(&self, f: impl FnOnce(&mut Option<ProgressBar>)) {
        // A poisoned lock only means an earlier draw panicked; keep going
        let mut guard = match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard);
    }
}

impl SweepProgress for SweepBars {
    fn begin(&self, sweep: Sweep, total: usize) {
        let bar = (self.attach)(ProgressBar::new(total as u64));
        bar.set_style(
            ProgressStyle::with_template("{prefix} [{bar:30}] {pos}/{len} {wide_msg}")
                .map(|style| style.progress_chars("=> "))
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_prefix(sweep.to_string());

        self.with_current(|current| {
            if let Some(previous) = current.replace(bar) {
                previous.finish();
            }
        });
    }

    fn advance(&self, label: &str) {
        self.with_current(|current| {
            if let Some(bar) = current {
                bar.set_message(label.to_string());
                bar.inc(1);
            }
        });
    }

    fn finish(&self) {
        self.with_current(|current| {
            if let Some(bar) = current.take() {
                bar.set_message("");
                bar.finish();
            }
        });
    }
}
