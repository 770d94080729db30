//! Book acquisition: catalog search across criteria and categories, then
//! mirror download.

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogError, CatalogResolver, Category, MatchCriteria};
use crate::download::{DownloadError, HttpClient, MirrorDownloader};
use crate::store::BookRecord;

/// Finds and saves the file for one book.
///
/// # Object Safety
///
/// This trait uses `async_trait` so the coordinator can hold a
/// `Box<dyn BookAcquirer>`.
#[async_trait]
pub trait BookAcquirer: Send + Sync {
    /// Saves `record`'s file to `destination` and returns the mirror URL it
    /// came through.
    async fn acquire(&self, record: &BookRecord, destination: &Path) -> Result<String, DownloadError>;
}

/// Live acquirer backed by the mirror catalog.
///
/// For each category (fiction, then nonfiction) the criteria are tried in
/// order (author, title, both); the first criteria that yields links feeds the
/// downloader. A category whose links all fail falls through to the next
/// category.
#[derive(Debug, Clone)]
pub struct CatalogAcquirer {
    resolver: CatalogResolver,
    downloader: MirrorDownloader,
}

impl CatalogAcquirer {
    /// Creates an acquirer from its two stages.
    #[must_use]
    pub fn new(resolver: CatalogResolver, downloader: MirrorDownloader) -> Self {
        Self {
            resolver,
            downloader,
        }
    }

    /// Builds both stages around one shared client.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidBaseUrl`] when `catalog_url` cannot be parsed.
    pub fn with_client(client: HttpClient, catalog_url: &str) -> Result<Self, CatalogError> {
        let resolver = CatalogResolver::new(client.clone(), catalog_url)?;
        Ok(Self::new(resolver, MirrorDownloader::new(client)))
    }

    /// Returns the links from the first criteria that yields any for `category`.
    async fn find_links(&self, record: &BookRecord, category: Category) -> Vec<String> {
        for criteria in MatchCriteria::ALL {
            match self
                .resolver
                .search(&record.title, &record.author, criteria, category)
                .await
            {
                Ok(links) if !links.is_empty() => {
                    debug!(%criteria, %category, links = links.len(), "catalog links found");
                    return links;
                }
                Ok(_) => debug!(%criteria, %category, "no matching catalog rows"),
                Err(CatalogError::NoResults { .. }) => {
                    debug!(%criteria, %category, "catalog returned no results");
                }
                Err(error) => warn!(%criteria, %category, error = %error, "catalog search failed"),
            }
        }
        Vec::new()
    }
}

#[async_trait]
impl BookAcquirer for CatalogAcquirer {
    async fn acquire(&self, record: &BookRecord, destination: &Path) -> Result<String, DownloadError> {
        let mut attempted = 0;
        for category in Category::ALL {
            let links = self.find_links(record, category).await;
            if links.is_empty() {
                continue;
            }
            attempted += links.len();
            if let Some(link) = self.downloader.resolve_and_save(&links, destination).await {
                info!(title = %record.title, %category, mirror = %link, "book acquired");
                return Ok(link);
            }
            debug!(%category, "every mirror failed for category");
        }

        if attempted == 0 {
            Err(DownloadError::NoCandidates {
                title: record.title.clone(),
                author: record.author.clone(),
            })
        } else {
            Err(DownloadError::Exhausted { attempted })
        }
    }
}
