//! `download` command: run the batch over pending (or failed) books.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use bookfetch_core::{BatchReport, HttpClient, OutcomeStatus};

use crate::ProcessExit;
use crate::app::context::RunContext;
use crate::app::exit_handler::determine_exit_outcome;
use crate::app::progress_manager::BatchProgress;
use crate::app::terminal;
use crate::cli::DownloadArgs;

pub async fn run_download_command(
    ctx: &RunContext,
    args: DownloadArgs,
    quiet: bool,
) -> Result<ProcessExit> {
    let client = HttpClient::new().context("Failed to build HTTP client")?;
    let library = ctx.library(client)?;

    let mut progress = BatchProgress::new(terminal::should_use_spinner(
        io::stderr().is_terminal(),
        quiet,
        terminal::is_dumb_terminal(),
    ));
    let result = library
        .process_downloads_with_progress(args.retry, |outcome, total| {
            progress.record(outcome, total);
        })
        .await;
    progress.finish();
    let report = result.context("Downloads failed")?;

    print_summary(&report);
    Ok(determine_exit_outcome(
        report.downloaded() + report.skipped(),
        report.failed(),
    ))
}

fn print_summary(report: &BatchReport) {
    for outcome in &report.outcomes {
        match outcome.status {
            OutcomeStatus::Failed => println!(
                "Error downloading {} by {}",
                outcome.key.title(),
                outcome.key.author()
            ),
            OutcomeStatus::SkippedBeforeCutoff => println!(
                "{} not downloaded because it was added before the cutoff date",
                outcome.key.title()
            ),
            OutcomeStatus::Downloaded => {}
        }
    }
    println!(
        "Downloads complete: {} downloaded, {} skipped, {} failed",
        report.downloaded(),
        report.skipped(),
        report.failed()
    );
}
