//! Shared runtime context built from the config file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bookfetch_core::{CatalogAcquirer, HttpClient, Library, Store};

use crate::app_config::{AppConfig, config_path_or_default};

/// Loaded configuration plus the path it came from, so commands can build
/// their collaborators and save changes without re-resolving the path.
pub(crate) struct RunContext {
    pub(crate) config_path: PathBuf,
    pub(crate) config: AppConfig,
}

impl RunContext {
    pub(crate) fn load(explicit_config: Option<&Path>) -> Result<Self> {
        let config_path = config_path_or_default(explicit_config)?;
        let config = AppConfig::load(&config_path)?;
        Ok(Self {
            config_path,
            config,
        })
    }

    pub(crate) fn store(&self) -> Store {
        Store::new(&self.config.database_path)
    }

    /// Builds a coordinator for the database-only commands.
    pub(crate) fn offline_library(&self) -> Library {
        Library::offline(self.store(), &self.config.downloads_path)
    }

    /// Builds the coordinator with the live catalog acquirer on `client`.
    pub(crate) fn library(&self, client: HttpClient) -> Result<Library> {
        let acquirer = CatalogAcquirer::with_client(client, &self.config.catalog_url)
            .context("invalid catalog_url in config")?;
        Ok(Library::new(
            self.store(),
            &self.config.downloads_path,
            Box::new(acquirer),
        ))
    }
}
