//! `update` command: merge new shelf books into the pending list.

use anyhow::{Context, Result};
use bookfetch_core::{HttpClient, ShelfImporter};

use crate::app::context::RunContext;

pub async fn run_update_command(ctx: &RunContext) -> Result<()> {
    let client = HttpClient::new().context("Failed to build HTTP client")?;
    let library = ctx.library(client.clone())?;
    let importer = ShelfImporter::new(client);
    let report = library
        .import_and_merge(&importer, &ctx.config.shelf_url)
        .await
        .context("Update failed")?;
    println!(
        "Database updated: {} new book(s), {} on shelf",
        report.added, report.imported
    );
    if report.skipped > 0 {
        println!(
            "{} shelf book(s) left out: their database key is already taken",
            report.skipped
        );
    }
    Ok(())
}
