//! Reading shelf import.
//!
//! Fetches a public shelf listing page and turns each row into a normalized
//! [`BookRecord`] keyed by its [`BookKey`].

mod error;
mod parse;

use std::collections::BTreeMap;

use tracing::{info, instrument};
use url::Url;

use crate::download::HttpClient;
use crate::store::{BookKey, BookRecord};

pub use error::ShelfError;
pub use parse::{normalize_author, normalize_title, parse_shelf_date, parse_shelf_page};

/// Page-size value that makes the shelf render every book on one page.
const SINGLE_PAGE_SIZE: &str = "infinite";

/// Fetches and parses the reading shelf.
#[derive(Debug, Clone)]
pub struct ShelfImporter {
    client: HttpClient,
}

impl ShelfImporter {
    /// Creates an importer that uses `client` for the shelf request.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Fetches the shelf at `url` and returns its books keyed by identity.
    ///
    /// # Errors
    ///
    /// - [`ShelfError::InvalidUrl`] when `url` cannot be parsed
    /// - [`ShelfError::Network`] on transport failure or a non-success status
    #[instrument(skip(self))]
    pub async fn fetch_shelf(&self, url: &str) -> Result<BTreeMap<BookKey, BookRecord>, ShelfError> {
        let page_url = single_page_url(url)?;
        let html = self.client.get_text(&page_url).await?;
        let records: BTreeMap<BookKey, BookRecord> = parse_shelf_page(&html)
            .into_iter()
            .map(|record| (record.key(), record))
            .collect();
        info!(books = records.len(), "shelf imported");
        Ok(records)
    }
}

/// Rewrites the shelf URL so the whole shelf is served on one page.
///
/// Any existing `per_page` or `page` parameter is replaced; all other query
/// parameters (shelf name, sort order) are kept.
///
/// # Errors
///
/// Returns [`ShelfError::InvalidUrl`] when `url` cannot be parsed.
pub fn single_page_url(url: &str) -> Result<String, ShelfError> {
    let mut parsed = Url::parse(url.trim()).map_err(|_| ShelfError::InvalidUrl {
        url: url.to_string(),
    })?;
    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(name, _)| name != "per_page" && name != "page")
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();
    parsed
        .query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("per_page", SINGLE_PAGE_SIZE);
    Ok(parsed.to_string())
}
