//! Diagnostic logging.
//!
//! Controlled with `RUST_LOG` (e.g. `RUST_LOG=availsync_core=debug`);
//! only warnings are shown by default.

use std::io::{self, Write};

use tracing_subscriber::EnvFilter;

use crate::progress;

const DEFAULT_FILTER: &str = "warn";

pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(|| LogWriter)
        .with_target(false)
        .init();
}

/// Stderr writer that clears the progress bars while a log line is written,
/// so lines never land in the middle of a bar.
struct LogWriter;

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        progress::suspend(|| io::stderr().write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        progress::suspend(|| io::stderr().write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use availsync_core::sync::{Sweep, SweepProgress};

    use crate::progress::SweepBars;

    #[test]
    fn test_log_lines_are_written_while_a_bar_is_active() {
        let bars = SweepBars::stderr();
        bars.begin(Sweep::Clear, 2);
        bars.advance("Busy");

        let line = b"WARN Skipping malformed event\n";
        assert_eq!(LogWriter.write(line).unwrap(), line.len());
        LogWriter.write_all(line).unwrap();
        LogWriter.flush().unwrap();

        bars.finish();
    }
}
