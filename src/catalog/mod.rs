//! Book catalog search.
//!
//! Queries the mirror catalog for a title/author and returns the first mirror
//! link of every result row whose title matches. The catalog exposes two
//! search endpoints with different result layouts, selected by [`Category`].
//!
//! # Example
//!
//! ```no_run
//! use bookfetch_core::catalog::{CatalogResolver, Category, MatchCriteria};
//! use bookfetch_core::download::HttpClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = CatalogResolver::new(HttpClient::new()?, "https://libgen.is")?;
//! let links = resolver
//!     .search("Dune", "Herbert, Frank", MatchCriteria::Author, Category::Fiction)
//!     .await?;
//! println!("{} mirror(s)", links.len());
//! # Ok(())
//! # }
//! ```

mod error;
mod parse;

use std::fmt;

use tracing::{debug, instrument};
use url::Url;

use crate::download::HttpClient;

pub use error::CatalogError;
pub use parse::{parse_results, titles_match};

/// Default catalog base URL.
pub const DEFAULT_CATALOG_URL: &str = "https://libgen.is";

/// Maximum rows requested from the nonfiction endpoint.
const NONFICTION_PAGE_SIZE: u32 = 100;

/// Which book field(s) populate the catalog query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchCriteria {
    /// Search by author name.
    Author,
    /// Search by title.
    Title,
    /// Search by title and author together.
    Both,
}

impl MatchCriteria {
    /// Criteria in the order they are tried for each book.
    pub const ALL: [Self; 3] = [Self::Author, Self::Title, Self::Both];

    /// Builds the query value for this criteria.
    #[must_use]
    pub fn query_value(self, title: &str, author: &str) -> String {
        match self {
            Self::Author => author.trim().to_string(),
            Self::Title => title.trim().to_string(),
            Self::Both => format!("{} {}", title.trim(), author.trim()),
        }
    }

    /// Column parameter value for `category`'s endpoint. Empty means any field.
    fn column(self, category: Category) -> &'static str {
        match (self, category) {
            (Self::Author, Category::Fiction) => "authors",
            (Self::Author, Category::Nonfiction) => "author",
            (Self::Title, _) => "title",
            (Self::Both, Category::Fiction) => "",
            (Self::Both, Category::Nonfiction) => "def",
        }
    }
}

impl fmt::Display for MatchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Author => "author",
            Self::Title => "title",
            Self::Both => "both",
        };
        write!(f, "{label}")
    }
}

/// Catalog section to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Fiction endpoint: per-row mirror lists.
    Fiction,
    /// Nonfiction endpoint: one mirror column.
    Nonfiction,
}

impl Category {
    /// Categories in the order they are tried for each book.
    pub const ALL: [Self; 2] = [Self::Fiction, Self::Nonfiction];

    /// CSS selector of the results table.
    #[must_use]
    pub fn table_selector(self) -> &'static str {
        match self {
            Self::Fiction => "table.catalog",
            Self::Nonfiction => "table.c",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Fiction => "fiction",
            Self::Nonfiction => "nonfiction",
        };
        write!(f, "{label}")
    }
}

/// Searches the catalog. Holds no per-book state between calls.
#[derive(Debug, Clone)]
pub struct CatalogResolver {
    client: HttpClient,
    base_url: Url,
}

impl CatalogResolver {
    /// Creates a resolver for the catalog at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidBaseUrl`] when `base_url` cannot be parsed.
    pub fn new(client: HttpClient, base_url: &str) -> Result<Self, CatalogError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url = Url::parse(&format!("{trimmed}/")).map_err(|_| {
            CatalogError::InvalidBaseUrl {
                url: base_url.to_string(),
            }
        })?;
        Ok(Self { client, base_url })
    }

    /// Builds the search URL for one query.
    #[must_use]
    pub fn search_url(
        &self,
        title: &str,
        author: &str,
        criteria: MatchCriteria,
        category: Category,
    ) -> String {
        let base = self.base_url.as_str();
        let query = urlencoding::encode(&criteria.query_value(title, author)).into_owned();
        let column = criteria.column(category);
        match category {
            Category::Fiction => format!(
                "{base}fiction/?q={query}&criteria={column}&language=English&format=epub"
            ),
            Category::Nonfiction => format!(
                "{base}search.php?req={query}&column={column}&res={NONFICTION_PAGE_SIZE}&view=simple&phrase=1"
            ),
        }
    }

    /// Searches `category` and returns first-mirror links of matching rows in
    /// row order.
    ///
    /// An empty `Ok` means the catalog answered with results but no row title
    /// matched.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Unreachable`] on transport failure or error status
    /// - [`CatalogError::NoResults`] when the results table is missing or empty
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        title: &str,
        author: &str,
        criteria: MatchCriteria,
        category: Category,
    ) -> Result<Vec<String>, CatalogError> {
        let url = self.search_url(title, author, criteria, category);
        debug!(url = %url, "searching catalog");
        let html = self.client.get_text(&url).await?;
        let links = parse_results(&html, category, title, &self.base_url).ok_or_else(|| {
            CatalogError::NoResults {
                query: criteria.query_value(title, author),
            }
        })?;
        debug!(links = links.len(), "catalog search finished");
        Ok(links)
    }
}
