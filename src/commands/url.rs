//! `url` command: show or replace the shelf URL.

use anyhow::{Context, Result};
use bookfetch_core::shelf::single_page_url;

use crate::app::context::RunContext;
use crate::cli::UrlArgs;

pub fn run_url_command(mut ctx: RunContext, args: &UrlArgs) -> Result<()> {
    match &args.set {
        Some(url) => {
            single_page_url(url).context("Invalid shelf URL")?;
            ctx.config.shelf_url.clone_from(url);
            ctx.config.save(&ctx.config_path)?;
            println!("Shelf URL set to {url}");
        }
        None => println!("{}", ctx.config.shelf_url),
    }
    Ok(())
}
