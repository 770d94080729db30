//! Progress UI (spinner) for download runs.

use std::time::Duration;

use bookfetch_core::DownloadOutcome;
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner fed by per-book outcomes. Does nothing when disabled.
pub(crate) struct BatchProgress {
    spinner: Option<ProgressBar>,
    done: usize,
}

impl BatchProgress {
    pub(crate) fn new(use_spinner: bool) -> Self {
        let spinner = use_spinner.then(|| {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner.set_message("Searching catalog...");
            spinner
        });
        Self { spinner, done: 0 }
    }

    /// Records one finished book.
    pub(crate) fn record(&mut self, outcome: &DownloadOutcome, total: usize) {
        self.done += 1;
        if let Some(spinner) = &self.spinner {
            spinner.set_message(progress_message(self.done, total, outcome));
        }
    }

    pub(crate) fn finish(self) {
        if let Some(spinner) = self.spinner {
            spinner.finish_and_clear();
        }
    }
}

fn progress_message(done: usize, total: usize, outcome: &DownloadOutcome) -> String {
    format!(
        "[{}/{}] {} {}",
        done.min(total),
        total,
        outcome.key.title(),
        outcome.status
    )
}
