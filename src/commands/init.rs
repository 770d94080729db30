//! `init` command: config file, fresh database and downloads directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use bookfetch_core::shelf::single_page_url;
use bookfetch_core::{DEFAULT_CATALOG_URL, Store};
use tracing::info;

use crate::app_config::{
    AppConfig, config_path_or_default, default_database_path, default_downloads_path,
};
use crate::cli::InitArgs;

/// Writes the config, (re)creates the database and the downloads directory.
///
/// Re-running `init` replaces the database. A `catalog_url` from an existing
/// config file is kept.
pub fn run_init_command(explicit_config: Option<&Path>, args: &InitArgs) -> Result<()> {
    single_page_url(&args.shelf_url).context("Invalid shelf URL")?;

    let config_path = config_path_or_default(explicit_config)?;
    let catalog_url = if config_path.exists() {
        AppConfig::load(&config_path)
            .map(|existing| existing.catalog_url)
            .unwrap_or_else(|_| DEFAULT_CATALOG_URL.to_string())
    } else {
        DEFAULT_CATALOG_URL.to_string()
    };

    let config = AppConfig {
        shelf_url: args.shelf_url.clone(),
        database_path: args
            .db_path
            .clone()
            .unwrap_or_else(|| default_database_path(&config_path)),
        downloads_path: args
            .downloads_path
            .clone()
            .unwrap_or_else(default_downloads_path),
        catalog_url,
    };
    config
        .save(&config_path)
        .context("Creating config file failed")?;

    Store::new(&config.database_path)
        .initialize(args.date)
        .context("Creating database failed")?;

    fs::create_dir_all(&config.downloads_path).with_context(|| {
        format!(
            "Creating downloads directory '{}' failed",
            config.downloads_path.display()
        )
    })?;
    info!(config = %config_path.display(), "initialized");

    println!("Config file created at {}", config_path.display());
    println!("The database is {}", config.database_path.display());
    println!(
        "Downloads directory created at {}",
        config.downloads_path.display()
    );
    Ok(())
}
